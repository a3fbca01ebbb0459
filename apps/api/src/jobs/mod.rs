pub mod handlers;

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobRow;

pub async fn job_by_id(pool: &PgPool, id: Uuid) -> Result<JobRow, AppError> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

/// Fetches a job and verifies it belongs to the given recruiter.
pub async fn job_owned_by(pool: &PgPool, id: Uuid, recruiter_id: Uuid) -> Result<JobRow, AppError> {
    let job = job_by_id(pool, id).await?;
    if job.posted_by != recruiter_id {
        return Err(AppError::Forbidden);
    }
    Ok(job)
}
