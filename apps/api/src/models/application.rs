use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A candidate's submission against a job. Status lifecycle:
/// applied → review → interview → offer / closed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub applicant_id: Uuid,
    pub job_id: Uuid,
    pub status: String,
    pub cover_note: String,
    pub viewed_by_recruiter: bool,
    pub recruiter_notes: String,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StatusHistoryRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub old_status: String,
    pub new_status: String,
    pub changed_by: Uuid,
    pub notes: String,
    pub changed_at: DateTime<Utc>,
}
