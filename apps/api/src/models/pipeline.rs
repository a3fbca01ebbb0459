use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stage/column in the recruiter pipeline for a specific job.
/// Positions are dense within a job: 0..n.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StageRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub position: i32,
}

/// An application placed in a stage column. Positions are dense within a
/// stage: 0..n.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CardRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub stage_id: Uuid,
    pub position: i32,
    pub added_at: DateTime<Utc>,
}
