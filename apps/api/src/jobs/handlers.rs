use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::{job_by_id, job_owned_by};
use crate::models::job::{JobRow, EMPLOYMENT_TYPES, EXPERIENCE_LEVELS};
use crate::pagination::{page_window, Page};
use crate::profiles::handlers::GeocodeResponse;
use crate::profiles::require_recruiter;
use crate::state::AppState;

const JOBS_PER_PAGE: u32 = 10;

#[derive(Deserialize)]
pub struct JobListQuery {
    pub search: Option<String>,
    pub location: Option<String>,
    pub remote: Option<bool>,
    pub employment_type: Option<String>,
    pub experience_level: Option<String>,
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

fn push_job_filters(qb: &mut QueryBuilder<Postgres>, params: &JobListQuery) {
    qb.push(" WHERE is_active = true");
    if let Some(search) = params.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = format!("%{}%", search.trim());
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR company_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(location) = params.location.as_deref().filter(|s| !s.trim().is_empty()) {
        qb.push(" AND location ILIKE ")
            .push_bind(format!("%{}%", location.trim()));
    }
    if let Some(remote) = params.remote {
        qb.push(" AND is_remote = ").push_bind(remote);
    }
    if let Some(et) = params
        .employment_type
        .as_deref()
        .filter(|s| !s.is_empty())
    {
        qb.push(" AND employment_type = ").push_bind(et.to_string());
    }
    if let Some(level) = params
        .experience_level
        .as_deref()
        .filter(|s| !s.is_empty())
    {
        qb.push(" AND experience_level = ").push_bind(level.to_string());
    }
}

/// GET /api/v1/jobs — active jobs, filtered and paginated, newest first.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> Result<Json<Page<JobRow>>, AppError> {
    let mut count_qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT count(*) FROM jobs");
    push_job_filters(&mut count_qb, &params);
    let total: i64 = count_qb.build_query_scalar().fetch_one(&state.db).await?;

    let window = page_window(params.page, JOBS_PER_PAGE, total);

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM jobs");
    push_job_filters(&mut qb, &params);
    qb.push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(window.limit)
        .push(" OFFSET ")
        .push_bind(window.offset);
    let jobs: Vec<JobRow> = qb.build_query_as().fetch_all(&state.db).await?;

    Ok(Json(Page::new(jobs, total, &window)))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    Ok(Json(job_by_id(&state.db, id).await?))
}

#[derive(Deserialize)]
pub struct CreateJobRequest {
    pub posted_by: Uuid,
    pub title: String,
    pub company_name: String,
    #[serde(default)]
    pub location: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    #[serde(default = "default_employment_type")]
    pub employment_type: String,
    #[serde(default = "default_experience_level")]
    pub experience_level: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub benefits: String,
    #[serde(default)]
    pub skills_required: String,
    #[serde(default)]
    pub is_remote: bool,
    #[serde(default)]
    pub visa_sponsorship: bool,
}

fn default_employment_type() -> String {
    "full-time".to_string()
}

fn default_experience_level() -> String {
    "entry".to_string()
}

fn validate_job_fields(
    title: &str,
    company: &str,
    employment_type: &str,
    experience_level: &str,
    salary_min: Option<i32>,
    salary_max: Option<i32>,
) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::Validation("Job title is required".into()));
    }
    if company.trim().is_empty() {
        return Err(AppError::Validation("Company name is required".into()));
    }
    if !EMPLOYMENT_TYPES.contains(&employment_type) {
        return Err(AppError::Validation(format!(
            "Invalid employment type '{employment_type}'"
        )));
    }
    if !EXPERIENCE_LEVELS.contains(&experience_level) {
        return Err(AppError::Validation(format!(
            "Invalid experience level '{experience_level}'"
        )));
    }
    if let (Some(min), Some(max)) = (salary_min, salary_max) {
        if min > max {
            return Err(AppError::Validation(
                "Minimum salary cannot exceed maximum salary".into(),
            ));
        }
    }
    Ok(())
}

/// POST /api/v1/jobs — recruiters only.
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<Json<JobRow>, AppError> {
    require_recruiter(&state.db, req.posted_by).await?;
    validate_job_fields(
        &req.title,
        &req.company_name,
        &req.employment_type,
        &req.experience_level,
        req.salary_min,
        req.salary_max,
    )?;

    let job = sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs
            (id, title, company_name, location, salary_min, salary_max,
             employment_type, experience_level, description, requirements,
             benefits, skills_required, is_remote, visa_sponsorship, posted_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.title.trim())
    .bind(req.company_name.trim())
    .bind(&req.location)
    .bind(req.salary_min)
    .bind(req.salary_max)
    .bind(&req.employment_type)
    .bind(&req.experience_level)
    .bind(&req.description)
    .bind(&req.requirements)
    .bind(&req.benefits)
    .bind(&req.skills_required)
    .bind(req.is_remote)
    .bind(req.visa_sponsorship)
    .bind(req.posted_by)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(job))
}

#[derive(Deserialize)]
pub struct UpdateJobRequest {
    pub recruiter_id: Uuid,
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<Option<i32>>,
    pub salary_max: Option<Option<i32>>,
    pub employment_type: Option<String>,
    pub experience_level: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub skills_required: Option<String>,
    pub is_remote: Option<bool>,
    pub visa_sponsorship: Option<bool>,
    pub is_active: Option<bool>,
}

/// PATCH /api/v1/jobs/:id — only the posting recruiter may edit.
/// Deactivation happens here via `is_active: false`.
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateJobRequest>,
) -> Result<Json<JobRow>, AppError> {
    let mut job = job_owned_by(&state.db, id, req.recruiter_id).await?;

    if let Some(v) = req.title {
        job.title = v;
    }
    if let Some(v) = req.company_name {
        job.company_name = v;
    }
    if let Some(v) = req.location {
        job.location = v;
        job.latitude = None;
        job.longitude = None;
    }
    if let Some(v) = req.salary_min {
        job.salary_min = v;
    }
    if let Some(v) = req.salary_max {
        job.salary_max = v;
    }
    if let Some(v) = req.employment_type {
        job.employment_type = v;
    }
    if let Some(v) = req.experience_level {
        job.experience_level = v;
    }
    if let Some(v) = req.description {
        job.description = v;
    }
    if let Some(v) = req.requirements {
        job.requirements = v;
    }
    if let Some(v) = req.benefits {
        job.benefits = v;
    }
    if let Some(v) = req.skills_required {
        job.skills_required = v;
    }
    if let Some(v) = req.is_remote {
        job.is_remote = v;
    }
    if let Some(v) = req.visa_sponsorship {
        job.visa_sponsorship = v;
    }
    if let Some(v) = req.is_active {
        job.is_active = v;
    }

    validate_job_fields(
        &job.title,
        &job.company_name,
        &job.employment_type,
        &job.experience_level,
        job.salary_min,
        job.salary_max,
    )?;

    let updated = sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs SET
            title = $2, company_name = $3, location = $4, salary_min = $5,
            salary_max = $6, employment_type = $7, experience_level = $8,
            description = $9, requirements = $10, benefits = $11,
            skills_required = $12, is_remote = $13, visa_sponsorship = $14,
            is_active = $15, latitude = $16, longitude = $17, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(job.id)
    .bind(&job.title)
    .bind(&job.company_name)
    .bind(&job.location)
    .bind(job.salary_min)
    .bind(job.salary_max)
    .bind(&job.employment_type)
    .bind(&job.experience_level)
    .bind(&job.description)
    .bind(&job.requirements)
    .bind(&job.benefits)
    .bind(&job.skills_required)
    .bind(job.is_remote)
    .bind(job.visa_sponsorship)
    .bind(job.is_active)
    .bind(job.latitude)
    .bind(job.longitude)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(updated))
}

/// POST /api/v1/jobs/:id/geocode
pub async fn handle_geocode_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GeocodeResponse>, AppError> {
    let job = job_by_id(&state.db, id).await?;

    if job.location.trim().is_empty() {
        return Err(AppError::Validation("Job has no location set".into()));
    }

    match state.geocoder.geocode(&job.location).await? {
        Some(point) => {
            sqlx::query(
                "UPDATE jobs SET latitude = $2, longitude = $3, updated_at = now() WHERE id = $1",
            )
            .bind(job.id)
            .bind(point.latitude)
            .bind(point.longitude)
            .execute(&state.db)
            .await?;
            Ok(Json(GeocodeResponse {
                matched: true,
                latitude: Some(point.latitude),
                longitude: Some(point.longitude),
            }))
        }
        None => Ok(Json(GeocodeResponse {
            matched: false,
            latitude: None,
            longitude: None,
        })),
    }
}
