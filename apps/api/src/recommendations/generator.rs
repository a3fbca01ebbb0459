//! Recommendation generation — scores visible candidates against a job,
//! filters by threshold, and upserts (job, candidate) recommendation rows.

use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobRow;
use crate::models::profile::{ProfileRow, ProjectRow, SkillRow, WorkExperienceRow};
use crate::models::recommendation::RecommendationRow;
use crate::recommendations::scoring::score_candidate;
use crate::recommendations::skills::{candidate_skill_set, has_skill_signal, job_skill_set};

/// Candidates scoring below this overall threshold are not recommended.
pub const SCORE_THRESHOLD: f64 = 30.0;
pub const DEFAULT_LIMIT: usize = 20;
pub const REFRESH_LIMIT: usize = 50;

struct CandidateBundle {
    profile: ProfileRow,
    skills: Vec<SkillRow>,
    projects: Vec<ProjectRow>,
    experience: Vec<WorkExperienceRow>,
}

/// Generates candidate recommendations for a job: scores every visible
/// job-seeker profile, drops those below the threshold, upserts the
/// (job, candidate) rows, and returns them ranked by match score, capped at
/// `limit`.
pub async fn generate_recommendations_for_job(
    pool: &PgPool,
    job: &JobRow,
    limit: usize,
    exclude_applied: bool,
) -> Result<Vec<RecommendationRow>, AppError> {
    let job_skills = job_skill_set(job);
    let today = Utc::now().date_naive();

    let candidates = load_candidate_bundles(pool, job.id, exclude_applied).await?;

    let mut recommendations = Vec::new();
    for bundle in &candidates {
        if !has_skill_signal(&bundle.profile, &bundle.skills) {
            continue;
        }

        let candidate_skills = candidate_skill_set(
            &bundle.profile,
            &bundle.skills,
            &bundle.projects,
            &bundle.experience,
        );
        let breakdown = score_candidate(
            &job_skills,
            &job.experience_level,
            job.is_remote,
            &job.location,
            &candidate_skills,
            &bundle.experience,
            &bundle.profile.location,
            today,
        );

        if breakdown.overall < SCORE_THRESHOLD {
            continue;
        }

        let row = upsert_recommendation(pool, job.id, &bundle.profile, &breakdown).await?;
        recommendations.push(row);
    }

    recommendations.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    recommendations.truncate(limit);

    info!(
        "Generated {} recommendations for job {} ({})",
        recommendations.len(),
        job.id,
        job.title
    );
    Ok(recommendations)
}

/// Refresh variant used by the recruiter-facing endpoint: always excludes
/// applied candidates and uses the larger cap.
pub async fn refresh_recommendations_for_job(
    pool: &PgPool,
    job: &JobRow,
) -> Result<Vec<RecommendationRow>, AppError> {
    generate_recommendations_for_job(pool, job, REFRESH_LIMIT, true).await
}

async fn load_candidate_bundles(
    pool: &PgPool,
    job_id: Uuid,
    exclude_applied: bool,
) -> Result<Vec<CandidateBundle>, AppError> {
    let profiles = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT * FROM profiles
        WHERE user_type = 'regular'
          AND profile_visibility IN ('public', 'recruiters')
          AND ($2 = false OR user_id NOT IN
               (SELECT applicant_id FROM applications WHERE job_id = $1))
        "#,
    )
    .bind(job_id)
    .bind(exclude_applied)
    .fetch_all(pool)
    .await?;

    let mut bundles = Vec::with_capacity(profiles.len());
    for profile in profiles {
        let skills = sqlx::query_as::<_, SkillRow>(
            "SELECT * FROM profile_skills WHERE profile_id = $1",
        )
        .bind(profile.id)
        .fetch_all(pool)
        .await?;
        let projects = sqlx::query_as::<_, ProjectRow>(
            "SELECT * FROM profile_projects WHERE profile_id = $1",
        )
        .bind(profile.id)
        .fetch_all(pool)
        .await?;
        let experience = sqlx::query_as::<_, WorkExperienceRow>(
            "SELECT * FROM profile_experience WHERE profile_id = $1",
        )
        .bind(profile.id)
        .fetch_all(pool)
        .await?;
        bundles.push(CandidateBundle {
            profile,
            skills,
            projects,
            experience,
        });
    }
    Ok(bundles)
}

async fn upsert_recommendation(
    pool: &PgPool,
    job_id: Uuid,
    profile: &ProfileRow,
    breakdown: &crate::recommendations::scoring::MatchBreakdown,
) -> Result<RecommendationRow, AppError> {
    // New rows start as 'new'; refreshes keep the recruiter-facing status
    // and only update the scores.
    let row = sqlx::query_as::<_, RecommendationRow>(
        r#"
        INSERT INTO recommendations
            (id, job_id, candidate_id, profile_id,
             match_score, skills_match_score, experience_match_score, location_match_score,
             status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'new')
        ON CONFLICT (job_id, candidate_id) DO UPDATE SET
            match_score = EXCLUDED.match_score,
            skills_match_score = EXCLUDED.skills_match_score,
            experience_match_score = EXCLUDED.experience_match_score,
            location_match_score = EXCLUDED.location_match_score,
            last_updated = now()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job_id)
    .bind(profile.user_id)
    .bind(profile.id)
    .bind(breakdown.overall)
    .bind(breakdown.skills)
    .bind(breakdown.experience)
    .bind(breakdown.location)
    .fetch_one(pool)
    .await?;
    Ok(row)
}
