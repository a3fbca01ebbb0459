use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::applications::active_application;
use crate::applications::lifecycle::{stats_from_counts, ApplicationStats, ApplicationStatus};
use crate::errors::AppError;
use crate::models::application::{ApplicationRow, StatusHistoryRow};
use crate::pagination::{page_window, Page};
use crate::profiles::{profile_for_user, require_job_seeker, require_recruiter};
use crate::state::AppState;

const MY_APPLICATIONS_PER_PAGE: u32 = 10;
const RECRUITER_APPLICATIONS_PER_PAGE: u32 = 15;

#[derive(Deserialize)]
pub struct ApplyRequest {
    pub applicant_id: Uuid,
    #[serde(default)]
    pub cover_note: String,
}

/// POST /api/v1/jobs/:job_id/apply
/// One-click apply with an optional personalized note.
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<ApplyRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    let job = sqlx::query_as::<_, crate::models::job::JobRow>(
        "SELECT * FROM jobs WHERE id = $1 AND is_active = true",
    )
    .bind(job_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    require_job_seeker(&state.db, req.applicant_id).await?;

    if let Some(existing) = active_application(&state.db, req.applicant_id, job.id).await? {
        return Err(AppError::Conflict(format!(
            "You have already applied to this job (status: {})",
            existing.status
        )));
    }

    let result = sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications (id, applicant_id, job_id, status, cover_note)
        VALUES ($1, $2, $3, 'applied', $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.applicant_id)
    .bind(job.id)
    .bind(&req.cover_note)
    .fetch_one(&state.db)
    .await;

    match result {
        Ok(application) => Ok(Json(application)),
        // Concurrent double-submit races the active-application check.
        Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(
            "You have already applied to this job".into(),
        )),
        Err(e) => Err(e.into()),
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[derive(Deserialize)]
pub struct ApplicationListQuery {
    pub status: Option<String>,
    pub company: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

/// An application joined with the job it targets.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApplicationListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub job_title: String,
    pub job_company: String,
}

#[derive(Serialize)]
pub struct ApplicationListResponse {
    #[serde(flatten)]
    pub page: Page<ApplicationListItem>,
    pub stats: ApplicationStats,
}

fn push_application_filters(qb: &mut QueryBuilder<Postgres>, params: &ApplicationListQuery) {
    if let Some(status) = params.status.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND a.status = ").push_bind(status.to_string());
    }
    if let Some(company) = params.company.as_deref().filter(|s| !s.trim().is_empty()) {
        qb.push(" AND j.company_name ILIKE ")
            .push_bind(format!("%{}%", company.trim()));
    }
    if let Some(from) = params.date_from {
        qb.push(" AND a.applied_at::date >= ").push_bind(from);
    }
    if let Some(to) = params.date_to {
        qb.push(" AND a.applied_at::date <= ").push_bind(to);
    }
}

/// GET /api/v1/applications?applicant_id=...
/// The applicant's own applications with filters and per-status stats.
pub async fn handle_my_applications(
    State(state): State<AppState>,
    Query(owner): Query<ApplicantQuery>,
    Query(params): Query<ApplicationListQuery>,
) -> Result<Json<ApplicationListResponse>, AppError> {
    require_job_seeker(&state.db, owner.applicant_id).await?;

    if let Some(status) = params.status.as_deref().filter(|s| !s.is_empty()) {
        status.parse::<ApplicationStatus>().map_err(AppError::Validation)?;
    }

    let base = "FROM applications a JOIN jobs j ON j.id = a.job_id WHERE a.applicant_id = ";

    let mut stats_qb: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT a.status, count(*) {base}"));
    stats_qb.push_bind(owner.applicant_id);
    push_application_filters(&mut stats_qb, &params);
    stats_qb.push(" GROUP BY a.status");
    let counts: Vec<(String, i64)> = stats_qb.build_query_as().fetch_all(&state.db).await?;
    let stats = stats_from_counts(&counts);

    let window = page_window(params.page, MY_APPLICATIONS_PER_PAGE, stats.total);

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "SELECT a.*, j.title AS job_title, j.company_name AS job_company {base}"
    ));
    qb.push_bind(owner.applicant_id);
    push_application_filters(&mut qb, &params);
    qb.push(" ORDER BY a.applied_at DESC LIMIT ")
        .push_bind(window.limit)
        .push(" OFFSET ")
        .push_bind(window.offset);
    let items: Vec<ApplicationListItem> = qb.build_query_as().fetch_all(&state.db).await?;

    Ok(Json(ApplicationListResponse {
        page: Page::new(items, stats.total, &window),
        stats,
    }))
}

#[derive(Deserialize)]
pub struct ApplicantQuery {
    pub applicant_id: Uuid,
}

#[derive(Deserialize)]
pub struct ActingUserQuery {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub status_history: Vec<StatusHistoryRow>,
}

/// GET /api/v1/applications/:id
/// Visible to the applicant and to recruiters/admins.
pub async fn handle_application_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(acting): Query<ActingUserQuery>,
) -> Result<Json<ApplicationDetail>, AppError> {
    let application = application_by_id(&state.db, id).await?;

    if application.applicant_id != acting.user_id {
        let viewer = profile_for_user(&state.db, acting.user_id).await?;
        let allowed = viewer.is_some_and(|p| p.is_recruiter() || p.is_admin());
        if !allowed {
            return Err(AppError::Forbidden);
        }
    }

    let status_history = sqlx::query_as::<_, StatusHistoryRow>(
        "SELECT * FROM application_status_history
         WHERE application_id = $1 ORDER BY changed_at DESC",
    )
    .bind(application.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(ApplicationDetail {
        application,
        status_history,
    }))
}

#[derive(Deserialize)]
pub struct WithdrawRequest {
    pub user_id: Uuid,
}

/// POST /api/v1/applications/:id/withdraw
pub async fn handle_withdraw(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<WithdrawRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    let application = application_by_id(&state.db, id).await?;
    if application.applicant_id != req.user_id {
        return Err(AppError::Forbidden);
    }

    let status: ApplicationStatus =
        application.status.parse().map_err(AppError::Validation)?;
    if !status.can_withdraw() {
        return Err(AppError::Validation(
            "This application cannot be withdrawn at this stage".into(),
        ));
    }

    let mut tx = state.db.begin().await?;
    sqlx::query(
        "INSERT INTO application_status_history
            (id, application_id, old_status, new_status, changed_by, notes)
         VALUES ($1, $2, $3, 'closed', $4, 'Application withdrawn by applicant')",
    )
    .bind(Uuid::new_v4())
    .bind(application.id)
    .bind(&application.status)
    .bind(req.user_id)
    .execute(&mut *tx)
    .await?;
    let updated = sqlx::query_as::<_, ApplicationRow>(
        "UPDATE applications SET status = 'closed', updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(application.id)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(Json(updated))
}

#[derive(Deserialize)]
pub struct RecruiterQuery {
    pub recruiter_id: Uuid,
}

/// GET /api/v1/recruiter/applications?recruiter_id=...
/// Applications against the recruiter's job postings.
pub async fn handle_recruiter_applications(
    State(state): State<AppState>,
    Query(owner): Query<RecruiterQuery>,
    Query(params): Query<ApplicationListQuery>,
) -> Result<Json<Page<ApplicationListItem>>, AppError> {
    require_recruiter(&state.db, owner.recruiter_id).await?;

    if let Some(status) = params.status.as_deref().filter(|s| !s.is_empty()) {
        status.parse::<ApplicationStatus>().map_err(AppError::Validation)?;
    }

    let base = "FROM applications a JOIN jobs j ON j.id = a.job_id WHERE j.posted_by = ";

    let mut count_qb: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT count(*) {base}"));
    count_qb.push_bind(owner.recruiter_id);
    push_application_filters(&mut count_qb, &params);
    let total: i64 = count_qb.build_query_scalar().fetch_one(&state.db).await?;

    let window = page_window(params.page, RECRUITER_APPLICATIONS_PER_PAGE, total);

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "SELECT a.*, j.title AS job_title, j.company_name AS job_company {base}"
    ));
    qb.push_bind(owner.recruiter_id);
    push_application_filters(&mut qb, &params);
    qb.push(" ORDER BY a.applied_at DESC LIMIT ")
        .push_bind(window.limit)
        .push(" OFFSET ")
        .push_bind(window.offset);
    let items: Vec<ApplicationListItem> = qb.build_query_as().fetch_all(&state.db).await?;

    Ok(Json(Page::new(items, total, &window)))
}

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub recruiter_id: Uuid,
    pub status: String,
    #[serde(default)]
    pub notes: String,
    pub recruiter_notes: Option<String>,
}

/// POST /api/v1/applications/:id/status
/// Recruiter-side status update: records history on change and marks the
/// application viewed.
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    let application = application_by_id(&state.db, id).await?;
    crate::jobs::job_owned_by(&state.db, application.job_id, req.recruiter_id).await?;

    let new_status: ApplicationStatus =
        req.status.parse().map_err(AppError::Validation)?;

    let mut tx = state.db.begin().await?;
    if application.status != new_status.as_str() {
        let notes = if req.notes.is_empty() {
            "Status updated by recruiter".to_string()
        } else {
            req.notes.clone()
        };
        sqlx::query(
            "INSERT INTO application_status_history
                (id, application_id, old_status, new_status, changed_by, notes)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(Uuid::new_v4())
        .bind(application.id)
        .bind(&application.status)
        .bind(new_status.as_str())
        .bind(req.recruiter_id)
        .bind(notes)
        .execute(&mut *tx)
        .await?;
    }
    let updated = sqlx::query_as::<_, ApplicationRow>(
        "UPDATE applications
         SET status = $2, viewed_by_recruiter = true,
             recruiter_notes = COALESCE($3, recruiter_notes), updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(application.id)
    .bind(new_status.as_str())
    .bind(req.recruiter_notes.as_deref())
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(Json(updated))
}

async fn application_by_id(
    pool: &sqlx::PgPool,
    id: Uuid,
) -> Result<ApplicationRow, AppError> {
    sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}
