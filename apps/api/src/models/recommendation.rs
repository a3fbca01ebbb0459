use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A scored pairing of a candidate profile to a job. Unique per
/// (job, candidate); regeneration refreshes the scores in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecommendationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub profile_id: Uuid,
    pub match_score: f64,
    pub skills_match_score: f64,
    pub experience_match_score: f64,
    pub location_match_score: f64,
    pub status: String,
    pub viewed_by_recruiter: bool,
    pub viewed_at: Option<DateTime<Utc>>,
    pub is_favorite: bool,
    pub recruiter_notes: String,
    pub recommended_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}
