pub mod handlers;
pub mod lifecycle;

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::ApplicationRow;

/// The applicant's active (non-closed) application for a job, if any.
/// A closed application does not block re-applying.
pub async fn active_application(
    pool: &PgPool,
    applicant_id: Uuid,
    job_id: Uuid,
) -> Result<Option<ApplicationRow>, AppError> {
    Ok(sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications
         WHERE applicant_id = $1 AND job_id = $2 AND status <> 'closed'
         LIMIT 1",
    )
    .bind(applicant_id)
    .bind(job_id)
    .fetch_optional(pool)
    .await?)
}
