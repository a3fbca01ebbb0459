pub mod handlers;
pub mod visibility;

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::ProfileRow;

/// Fetches the profile attached to a user, if any.
pub async fn profile_for_user(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRow>, AppError> {
    Ok(
        sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?,
    )
}

/// Role gate: the acting user must hold a recruiter profile.
pub async fn require_recruiter(pool: &PgPool, user_id: Uuid) -> Result<ProfileRow, AppError> {
    match profile_for_user(pool, user_id).await? {
        Some(profile) if profile.is_recruiter() => Ok(profile),
        _ => Err(AppError::Forbidden),
    }
}

/// Role gate: the acting user must hold a job-seeker profile.
pub async fn require_job_seeker(pool: &PgPool, user_id: Uuid) -> Result<ProfileRow, AppError> {
    match profile_for_user(pool, user_id).await? {
        Some(profile) if profile.is_job_seeker() => Ok(profile),
        _ => Err(AppError::Forbidden),
    }
}
