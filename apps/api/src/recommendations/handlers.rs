use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::job_owned_by;
use crate::models::job::JobRow;
use crate::models::recommendation::RecommendationRow;
use crate::pagination::{page_window, Page};
use crate::profiles::require_recruiter;
use crate::recommendations::generator::{
    generate_recommendations_for_job, refresh_recommendations_for_job, DEFAULT_LIMIT,
};
use crate::state::AppState;

pub const RECOMMENDATION_STATUSES: &[&str] =
    &["new", "viewed", "contacted", "applied", "dismissed"];

const JOB_RECOMMENDATIONS_PER_PAGE: u32 = 10;
const ALL_RECOMMENDATIONS_PER_PAGE: u32 = 15;

#[derive(Deserialize)]
pub struct RecruiterBody {
    pub recruiter_id: Uuid,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub generated: usize,
    pub recommendations: Vec<RecommendationRow>,
}

/// POST /api/v1/jobs/:job_id/recommendations/refresh
pub async fn handle_refresh(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<RecruiterBody>,
) -> Result<Json<RefreshResponse>, AppError> {
    require_recruiter(&state.db, req.recruiter_id).await?;
    let job = job_owned_by(&state.db, job_id, req.recruiter_id).await?;

    let recommendations = refresh_recommendations_for_job(&state.db, &job).await?;
    Ok(Json(RefreshResponse {
        generated: recommendations.len(),
        recommendations,
    }))
}

/// A recommendation joined with candidate and job display fields.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RecommendationListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub recommendation: RecommendationRow,
    pub candidate_username: String,
    pub candidate_first_name: String,
    pub candidate_last_name: String,
    pub candidate_headline: String,
    pub job_title: String,
}

#[derive(Deserialize)]
pub struct JobRecommendationsQuery {
    pub recruiter_id: Uuid,
    pub status: Option<String>,
    pub search: Option<String>,
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

const LIST_JOINS: &str = "FROM recommendations r
    JOIN users u ON u.id = r.candidate_id
    JOIN profiles p ON p.id = r.profile_id
    JOIN jobs j ON j.id = r.job_id";

const LIST_COLUMNS: &str = "r.*, u.username AS candidate_username,
    u.first_name AS candidate_first_name, u.last_name AS candidate_last_name,
    p.headline AS candidate_headline, j.title AS job_title";

fn push_search_filter(qb: &mut QueryBuilder<Postgres>, search: &str, include_job_title: bool) {
    let pattern = format!("%{}%", search.trim());
    qb.push(" AND (u.username ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR u.first_name ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR u.last_name ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR p.headline ILIKE ")
        .push_bind(pattern.clone());
    if include_job_title {
        qb.push(" OR j.title ILIKE ").push_bind(pattern);
    }
    qb.push(")");
}

fn validate_status(status: &str) -> Result<(), AppError> {
    if RECOMMENDATION_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Unknown recommendation status '{status}'"
        )))
    }
}

/// GET /api/v1/jobs/:job_id/recommendations
pub async fn handle_job_recommendations(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<JobRecommendationsQuery>,
) -> Result<Json<Page<RecommendationListItem>>, AppError> {
    require_recruiter(&state.db, params.recruiter_id).await?;
    let job = job_owned_by(&state.db, job_id, params.recruiter_id).await?;

    if let Some(status) = params.status.as_deref().filter(|s| !s.is_empty()) {
        validate_status(status)?;
    }

    // First view of a job's recommendations seeds them.
    let existing: i64 =
        sqlx::query_scalar("SELECT count(*) FROM recommendations WHERE job_id = $1")
            .bind(job.id)
            .fetch_one(&state.db)
            .await?;
    if existing == 0 {
        generate_recommendations_for_job(&state.db, &job, DEFAULT_LIMIT, true).await?;
    }

    let push_filters = |qb: &mut QueryBuilder<Postgres>| {
        qb.push(" WHERE r.job_id = ").push_bind(job.id);
        if let Some(status) = params.status.as_deref().filter(|s| !s.is_empty()) {
            qb.push(" AND r.status = ").push_bind(status.to_string());
        }
        if let Some(search) = params.search.as_deref().filter(|s| !s.trim().is_empty()) {
            push_search_filter(qb, search, false);
        }
    };

    let mut count_qb: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT count(*) {LIST_JOINS}"));
    push_filters(&mut count_qb);
    let total: i64 = count_qb.build_query_scalar().fetch_one(&state.db).await?;

    let window = page_window(params.page, JOB_RECOMMENDATIONS_PER_PAGE, total);

    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {LIST_COLUMNS} {LIST_JOINS}"));
    push_filters(&mut qb);
    qb.push(" ORDER BY r.match_score DESC, r.recommended_at DESC LIMIT ")
        .push_bind(window.limit)
        .push(" OFFSET ")
        .push_bind(window.offset);
    let items: Vec<RecommendationListItem> = qb.build_query_as().fetch_all(&state.db).await?;

    Ok(Json(Page::new(items, total, &window)))
}

#[derive(Deserialize)]
pub struct AllRecommendationsQuery {
    pub recruiter_id: Uuid,
    pub job_id: Option<Uuid>,
    pub status: Option<String>,
    #[serde(default)]
    pub unviewed: bool,
    pub search: Option<String>,
    #[serde(default = "first_page")]
    pub page: u32,
}

#[derive(Serialize)]
pub struct AllRecommendationsResponse {
    #[serde(flatten)]
    pub page: Page<RecommendationListItem>,
    /// Active jobs for the filter dropdown.
    pub jobs: Vec<JobRow>,
}

/// GET /api/v1/recommendations — across all of the recruiter's jobs.
pub async fn handle_all_recommendations(
    State(state): State<AppState>,
    Query(params): Query<AllRecommendationsQuery>,
) -> Result<Json<AllRecommendationsResponse>, AppError> {
    require_recruiter(&state.db, params.recruiter_id).await?;

    if let Some(status) = params.status.as_deref().filter(|s| !s.is_empty()) {
        validate_status(status)?;
    }

    let push_filters = |qb: &mut QueryBuilder<Postgres>| {
        qb.push(" WHERE j.posted_by = ").push_bind(params.recruiter_id);
        if let Some(job_id) = params.job_id {
            qb.push(" AND r.job_id = ").push_bind(job_id);
        }
        if let Some(status) = params.status.as_deref().filter(|s| !s.is_empty()) {
            qb.push(" AND r.status = ").push_bind(status.to_string());
        }
        if params.unviewed {
            qb.push(" AND r.viewed_by_recruiter = false");
        }
        if let Some(search) = params.search.as_deref().filter(|s| !s.trim().is_empty()) {
            push_search_filter(qb, search, true);
        }
    };

    let mut count_qb: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT count(*) {LIST_JOINS}"));
    push_filters(&mut count_qb);
    let total: i64 = count_qb.build_query_scalar().fetch_one(&state.db).await?;

    let window = page_window(params.page, ALL_RECOMMENDATIONS_PER_PAGE, total);

    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {LIST_COLUMNS} {LIST_JOINS}"));
    push_filters(&mut qb);
    qb.push(" ORDER BY r.match_score DESC, r.recommended_at DESC LIMIT ")
        .push_bind(window.limit)
        .push(" OFFSET ")
        .push_bind(window.offset);
    let items: Vec<RecommendationListItem> = qb.build_query_as().fetch_all(&state.db).await?;

    let jobs = sqlx::query_as::<_, JobRow>(
        "SELECT * FROM jobs WHERE posted_by = $1 AND is_active = true
         ORDER BY created_at DESC",
    )
    .bind(params.recruiter_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(AllRecommendationsResponse {
        page: Page::new(items, total, &window),
        jobs,
    }))
}

/// POST /api/v1/recommendations/:id/viewed
pub async fn handle_mark_viewed(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RecruiterBody>,
) -> Result<Json<RecommendationRow>, AppError> {
    let rec = owned_recommendation(&state.db, id, req.recruiter_id).await?;
    Ok(Json(mark_viewed(&state.db, rec.id).await?))
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub recruiter_id: Uuid,
    pub status: String,
}

/// POST /api/v1/recommendations/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<RecommendationRow>, AppError> {
    let rec = owned_recommendation(&state.db, id, req.recruiter_id).await?;
    validate_status(&req.status)?;

    // Moving into 'viewed' also stamps the viewed metadata.
    if req.status == "viewed" && !rec.viewed_by_recruiter {
        mark_viewed(&state.db, rec.id).await?;
    }

    let updated = sqlx::query_as::<_, RecommendationRow>(
        "UPDATE recommendations SET status = $2, last_updated = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(rec.id)
    .bind(&req.status)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(updated))
}

#[derive(Deserialize)]
pub struct NotesRequest {
    pub recruiter_id: Uuid,
    pub notes: String,
}

/// PATCH /api/v1/recommendations/:id/notes
pub async fn handle_update_notes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<NotesRequest>,
) -> Result<Json<RecommendationRow>, AppError> {
    let rec = owned_recommendation(&state.db, id, req.recruiter_id).await?;

    let updated = sqlx::query_as::<_, RecommendationRow>(
        "UPDATE recommendations SET recruiter_notes = $2, last_updated = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(rec.id)
    .bind(&req.notes)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(updated))
}

/// POST /api/v1/recommendations/:id/favorite — toggles the flag.
pub async fn handle_toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RecruiterBody>,
) -> Result<Json<RecommendationRow>, AppError> {
    let rec = owned_recommendation(&state.db, id, req.recruiter_id).await?;

    let updated = sqlx::query_as::<_, RecommendationRow>(
        "UPDATE recommendations SET is_favorite = NOT is_favorite, last_updated = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(rec.id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(updated))
}

/// Fetches a recommendation and verifies it belongs to one of the
/// recruiter's jobs.
async fn owned_recommendation(
    pool: &PgPool,
    id: Uuid,
    recruiter_id: Uuid,
) -> Result<RecommendationRow, AppError> {
    require_recruiter(pool, recruiter_id).await?;
    let rec = sqlx::query_as::<_, RecommendationRow>(
        "SELECT r.* FROM recommendations r
         JOIN jobs j ON j.id = r.job_id
         WHERE r.id = $1 AND j.posted_by = $2",
    )
    .bind(id)
    .bind(recruiter_id)
    .fetch_optional(pool)
    .await?;
    rec.ok_or_else(|| AppError::NotFound(format!("Recommendation {id} not found")))
}

async fn mark_viewed(pool: &PgPool, id: Uuid) -> Result<RecommendationRow, AppError> {
    Ok(sqlx::query_as::<_, RecommendationRow>(
        r#"
        UPDATE recommendations
        SET viewed_by_recruiter = true,
            viewed_at = COALESCE(viewed_at, now()),
            status = CASE WHEN status = 'new' THEN 'viewed' ELSE status END,
            last_updated = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await?)
}
