use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A message between a recruiter and a candidate. Replies link to the thread
/// root via `parent_message_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MessageRow {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub subject: String,
    pub body: String,
    pub message_type: String,
    pub status: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
    pub replied_at: Option<DateTime<Utc>>,
    pub related_job_id: Option<Uuid>,
    pub parent_message_id: Option<Uuid>,
}

impl MessageRow {
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}
