use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{
    EducationRow, ProfileRow, ProjectRow, SkillRow, WorkExperienceRow,
};
use crate::profiles::visibility::{
    can_view_profile, section_visibility, VISIBILITY_CHOICES,
};
use crate::profiles::profile_for_user;
use crate::state::AppState;

pub const PROFICIENCY_LEVELS: &[&str] = &["beginner", "intermediate", "advanced", "expert"];

#[derive(Deserialize)]
pub struct ViewerQuery {
    pub viewer_id: Option<Uuid>,
}

/// A profile as seen by a particular viewer: redacted fields and omitted
/// sections according to the owner's privacy settings.
#[derive(Serialize)]
pub struct ProfileView {
    pub profile: ProfileRow,
    pub is_own_profile: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<SkillRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<EducationRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<WorkExperienceRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<ProjectRow>>,
}

/// GET /api/v1/profiles/:user_id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<ViewerQuery>,
) -> Result<Json<ProfileView>, AppError> {
    let profile = profile_for_user(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for user {user_id} not found")))?;

    let viewer = match params.viewer_id {
        Some(id) => profile_for_user(&state.db, id).await?,
        None => None,
    };
    if !can_view_profile(viewer.as_ref(), &profile) {
        return Err(AppError::Forbidden);
    }

    let is_own = params.viewer_id == Some(user_id);
    let sections = section_visibility(is_own, &profile);

    let skills = if sections.skills {
        Some(
            sqlx::query_as::<_, SkillRow>(
                "SELECT * FROM profile_skills WHERE profile_id = $1 ORDER BY name",
            )
            .bind(profile.id)
            .fetch_all(&state.db)
            .await?,
        )
    } else {
        None
    };
    let education = if sections.education {
        Some(
            sqlx::query_as::<_, EducationRow>(
                "SELECT * FROM profile_education WHERE profile_id = $1
                 ORDER BY end_date DESC NULLS FIRST, start_date DESC",
            )
            .bind(profile.id)
            .fetch_all(&state.db)
            .await?,
        )
    } else {
        None
    };
    let experience = if sections.experience {
        Some(
            sqlx::query_as::<_, WorkExperienceRow>(
                "SELECT * FROM profile_experience WHERE profile_id = $1
                 ORDER BY end_date DESC NULLS FIRST, start_date DESC",
            )
            .bind(profile.id)
            .fetch_all(&state.db)
            .await?,
        )
    } else {
        None
    };
    // No per-section flag exists for projects; they follow overall visibility.
    let projects = Some(
        sqlx::query_as::<_, ProjectRow>(
            "SELECT * FROM profile_projects WHERE profile_id = $1
             ORDER BY is_featured DESC, end_date DESC NULLS FIRST, start_date DESC",
        )
        .bind(profile.id)
        .fetch_all(&state.db)
        .await?,
    );

    let mut profile = profile;
    if !sections.contact_info {
        profile.phone = String::new();
    }
    if !sections.links {
        profile.linkedin_url = String::new();
        profile.github_url = String::new();
        profile.portfolio_url = String::new();
    }

    Ok(Json(ProfileView {
        profile,
        is_own_profile: is_own,
        skills,
        education,
        experience,
        projects,
    }))
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub skills_text: Option<String>,
    pub projects_text: Option<String>,
}

/// PATCH /api/v1/profiles/:user_id
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileRow>, AppError> {
    let mut profile = profile_for_user(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for user {user_id} not found")))?;

    if let Some(v) = req.headline {
        profile.headline = v;
    }
    if let Some(v) = req.bio {
        profile.bio = v;
    }
    if let Some(v) = req.phone {
        profile.phone = v;
    }
    if let Some(v) = req.location {
        profile.location = v;
        // Stored coordinates no longer describe the new location.
        profile.latitude = None;
        profile.longitude = None;
    }
    if let Some(v) = req.linkedin_url {
        profile.linkedin_url = v;
    }
    if let Some(v) = req.github_url {
        profile.github_url = v;
    }
    if let Some(v) = req.portfolio_url {
        profile.portfolio_url = v;
    }
    if let Some(v) = req.skills_text {
        profile.skills_text = v;
    }
    if let Some(v) = req.projects_text {
        profile.projects_text = v;
    }

    let updated = sqlx::query_as::<_, ProfileRow>(
        r#"
        UPDATE profiles SET
            headline = $2, bio = $3, phone = $4, location = $5,
            linkedin_url = $6, github_url = $7, portfolio_url = $8,
            skills_text = $9, projects_text = $10,
            latitude = $11, longitude = $12, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(profile.id)
    .bind(&profile.headline)
    .bind(&profile.bio)
    .bind(&profile.phone)
    .bind(&profile.location)
    .bind(&profile.linkedin_url)
    .bind(&profile.github_url)
    .bind(&profile.portfolio_url)
    .bind(&profile.skills_text)
    .bind(&profile.projects_text)
    .bind(profile.latitude)
    .bind(profile.longitude)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(updated))
}

#[derive(Deserialize)]
pub struct PrivacyRequest {
    pub profile_visibility: Option<String>,
    pub show_contact_info: Option<bool>,
    pub show_skills: Option<bool>,
    pub show_education: Option<bool>,
    pub show_experience: Option<bool>,
    pub show_links: Option<bool>,
}

/// PATCH /api/v1/profiles/:user_id/privacy
pub async fn handle_update_privacy(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<PrivacyRequest>,
) -> Result<Json<ProfileRow>, AppError> {
    let mut profile = profile_for_user(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for user {user_id} not found")))?;

    if let Some(v) = req.profile_visibility {
        if !VISIBILITY_CHOICES.contains(&v.as_str()) {
            return Err(AppError::Validation(format!(
                "Invalid profile visibility '{v}'"
            )));
        }
        profile.profile_visibility = v;
    }
    if let Some(v) = req.show_contact_info {
        profile.show_contact_info = v;
    }
    if let Some(v) = req.show_skills {
        profile.show_skills = v;
    }
    if let Some(v) = req.show_education {
        profile.show_education = v;
    }
    if let Some(v) = req.show_experience {
        profile.show_experience = v;
    }
    if let Some(v) = req.show_links {
        profile.show_links = v;
    }

    let updated = sqlx::query_as::<_, ProfileRow>(
        r#"
        UPDATE profiles SET
            profile_visibility = $2, show_contact_info = $3, show_skills = $4,
            show_education = $5, show_experience = $6, show_links = $7,
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(profile.id)
    .bind(&profile.profile_visibility)
    .bind(profile.show_contact_info)
    .bind(profile.show_skills)
    .bind(profile.show_education)
    .bind(profile.show_experience)
    .bind(profile.show_links)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(updated))
}

#[derive(Deserialize)]
pub struct SkillInput {
    pub name: String,
    #[serde(default = "default_proficiency")]
    pub proficiency_level: String,
}

fn default_proficiency() -> String {
    "intermediate".to_string()
}

#[derive(Deserialize)]
pub struct SkillsRequest {
    pub skills: Vec<SkillInput>,
}

/// PUT /api/v1/profiles/:user_id/skills — replaces the full skill set.
pub async fn handle_replace_skills(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<SkillsRequest>,
) -> Result<Json<Vec<SkillRow>>, AppError> {
    let profile = profile_for_user(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for user {user_id} not found")))?;

    let mut seen = std::collections::HashSet::new();
    for skill in &req.skills {
        if skill.name.trim().is_empty() {
            return Err(AppError::Validation("Skill name cannot be empty".into()));
        }
        if !PROFICIENCY_LEVELS.contains(&skill.proficiency_level.as_str()) {
            return Err(AppError::Validation(format!(
                "Invalid proficiency level '{}'",
                skill.proficiency_level
            )));
        }
        if !seen.insert(skill.name.trim().to_lowercase()) {
            return Err(AppError::Validation(format!(
                "Duplicate skill '{}'",
                skill.name.trim()
            )));
        }
    }

    let mut tx = state.db.begin().await?;
    sqlx::query("DELETE FROM profile_skills WHERE profile_id = $1")
        .bind(profile.id)
        .execute(&mut *tx)
        .await?;
    for skill in &req.skills {
        sqlx::query(
            "INSERT INTO profile_skills (id, profile_id, name, proficiency_level)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(profile.id)
        .bind(skill.name.trim())
        .bind(&skill.proficiency_level)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    let rows = sqlx::query_as::<_, SkillRow>(
        "SELECT * FROM profile_skills WHERE profile_id = $1 ORDER BY name",
    )
    .bind(profile.id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct EducationInput {
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub field_of_study: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub gpa: Option<f64>,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
pub struct EducationRequest {
    pub education: Vec<EducationInput>,
}

/// PUT /api/v1/profiles/:user_id/education — replaces all education entries.
pub async fn handle_replace_education(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<EducationRequest>,
) -> Result<Json<Vec<EducationRow>>, AppError> {
    let profile = profile_for_user(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for user {user_id} not found")))?;

    for entry in &req.education {
        if entry.institution.trim().is_empty() || entry.degree.trim().is_empty() {
            return Err(AppError::Validation(
                "Institution and degree are required".into(),
            ));
        }
    }

    let mut tx = state.db.begin().await?;
    sqlx::query("DELETE FROM profile_education WHERE profile_id = $1")
        .bind(profile.id)
        .execute(&mut *tx)
        .await?;
    for entry in &req.education {
        sqlx::query(
            "INSERT INTO profile_education
                (id, profile_id, institution, degree, field_of_study,
                 start_date, end_date, gpa, description)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(Uuid::new_v4())
        .bind(profile.id)
        .bind(entry.institution.trim())
        .bind(entry.degree.trim())
        .bind(&entry.field_of_study)
        .bind(entry.start_date)
        .bind(entry.end_date)
        .bind(entry.gpa)
        .bind(&entry.description)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    let rows = sqlx::query_as::<_, EducationRow>(
        "SELECT * FROM profile_education WHERE profile_id = $1
         ORDER BY end_date DESC NULLS FIRST, start_date DESC",
    )
    .bind(profile.id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct ExperienceInput {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_current: bool,
}

#[derive(Deserialize)]
pub struct ExperienceRequest {
    pub experience: Vec<ExperienceInput>,
}

/// PUT /api/v1/profiles/:user_id/experience — replaces all work experience.
pub async fn handle_replace_experience(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<ExperienceRequest>,
) -> Result<Json<Vec<WorkExperienceRow>>, AppError> {
    let profile = profile_for_user(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for user {user_id} not found")))?;

    for entry in &req.experience {
        if entry.company.trim().is_empty() || entry.position.trim().is_empty() {
            return Err(AppError::Validation(
                "Company and position are required".into(),
            ));
        }
        if let Some(end) = entry.end_date {
            if end < entry.start_date {
                return Err(AppError::Validation(
                    "End date cannot be before start date".into(),
                ));
            }
        }
    }

    let mut tx = state.db.begin().await?;
    sqlx::query("DELETE FROM profile_experience WHERE profile_id = $1")
        .bind(profile.id)
        .execute(&mut *tx)
        .await?;
    for entry in &req.experience {
        sqlx::query(
            "INSERT INTO profile_experience
                (id, profile_id, company, position, location,
                 start_date, end_date, description, is_current)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(Uuid::new_v4())
        .bind(profile.id)
        .bind(entry.company.trim())
        .bind(entry.position.trim())
        .bind(&entry.location)
        .bind(entry.start_date)
        .bind(entry.end_date)
        .bind(&entry.description)
        .bind(entry.is_current)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    let rows = sqlx::query_as::<_, WorkExperienceRow>(
        "SELECT * FROM profile_experience WHERE profile_id = $1
         ORDER BY end_date DESC NULLS FIRST, start_date DESC",
    )
    .bind(profile.id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub technologies: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub project_url: String,
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Deserialize)]
pub struct ProjectsRequest {
    pub projects: Vec<ProjectInput>,
}

/// PUT /api/v1/profiles/:user_id/projects — replaces all projects.
pub async fn handle_replace_projects(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<ProjectsRequest>,
) -> Result<Json<Vec<ProjectRow>>, AppError> {
    let profile = profile_for_user(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for user {user_id} not found")))?;

    for entry in &req.projects {
        if entry.title.trim().is_empty() {
            return Err(AppError::Validation("Project title is required".into()));
        }
    }

    let mut tx = state.db.begin().await?;
    sqlx::query("DELETE FROM profile_projects WHERE profile_id = $1")
        .bind(profile.id)
        .execute(&mut *tx)
        .await?;
    for entry in &req.projects {
        sqlx::query(
            "INSERT INTO profile_projects
                (id, profile_id, title, description, technologies,
                 start_date, end_date, project_url, is_featured)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(Uuid::new_v4())
        .bind(profile.id)
        .bind(entry.title.trim())
        .bind(&entry.description)
        .bind(&entry.technologies)
        .bind(entry.start_date)
        .bind(entry.end_date)
        .bind(&entry.project_url)
        .bind(entry.is_featured)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    let rows = sqlx::query_as::<_, ProjectRow>(
        "SELECT * FROM profile_projects WHERE profile_id = $1
         ORDER BY is_featured DESC, end_date DESC NULLS FIRST, start_date DESC",
    )
    .bind(profile.id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

#[derive(Serialize)]
pub struct GeocodeResponse {
    pub matched: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// POST /api/v1/profiles/:user_id/geocode
/// Resolves the profile's free-text location to coordinates.
pub async fn handle_geocode_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<GeocodeResponse>, AppError> {
    let profile = profile_for_user(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for user {user_id} not found")))?;

    if profile.location.trim().is_empty() {
        return Err(AppError::Validation("Profile has no location set".into()));
    }

    let point = state.geocoder.geocode(&profile.location).await?;
    match point {
        Some(point) => {
            sqlx::query(
                "UPDATE profiles SET latitude = $2, longitude = $3, updated_at = now()
                 WHERE id = $1",
            )
            .bind(profile.id)
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
