use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::job_owned_by;
use crate::models::pipeline::{CardRow, StageRow};
use crate::models::profile::ProfileRow;
use crate::pagination::{page_window, Page};
use crate::profiles::require_recruiter;
use crate::recruiter::kanban::{move_across, reorder_within, DEFAULT_STAGES};
use crate::state::AppState;

const CANDIDATES_PER_PAGE: u32 = 10;

#[derive(Deserialize)]
pub struct RecruiterQuery {
    pub recruiter_id: Uuid,
}

#[derive(Serialize)]
pub struct DashboardCounts {
    pub active_jobs: i64,
    pub total_applications: i64,
    pub unviewed_recommendations: i64,
    pub unread_messages: i64,
}

/// GET /api/v1/recruiter/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Query(params): Query<RecruiterQuery>,
) -> Result<Json<DashboardCounts>, AppError> {
    require_recruiter(&state.db, params.recruiter_id).await?;

    let active_jobs: i64 = sqlx::query_scalar(
        "SELECT count(*) FROM jobs WHERE posted_by = $1 AND is_active = true",
    )
    .bind(params.recruiter_id)
    .fetch_one(&state.db)
    .await?;
    let total_applications: i64 = sqlx::query_scalar(
        "SELECT count(*) FROM applications a
         JOIN jobs j ON j.id = a.job_id WHERE j.posted_by = $1",
    )
    .bind(params.recruiter_id)
    .fetch_one(&state.db)
    .await?;
    let unviewed_recommendations: i64 = sqlx::query_scalar(
        "SELECT count(*) FROM recommendations r
         JOIN jobs j ON j.id = r.job_id
         WHERE j.posted_by = $1 AND r.viewed_by_recruiter = false",
    )
    .bind(params.recruiter_id)
    .fetch_one(&state.db)
    .await?;
    let unread_messages: i64 = sqlx::query_scalar(
        "SELECT count(*) FROM messages WHERE recipient_id = $1 AND read_at IS NULL",
    )
    .bind(params.recruiter_id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(DashboardCounts {
        active_jobs,
        total_applications,
        unviewed_recommendations,
        unread_messages,
    }))
}

#[derive(Deserialize)]
pub struct CandidateSearchQuery {
    pub recruiter_id: Uuid,
    pub skills: Option<String>,
    pub location: Option<String>,
    pub projects: Option<String>,
    pub search: Option<String>,
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CandidateSearchItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub profile: ProfileRow,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

fn push_candidate_filters(qb: &mut QueryBuilder<Postgres>, params: &CandidateSearchQuery) {
    qb.push(
        " WHERE p.user_type = 'regular'
          AND p.profile_visibility IN ('public', 'recruiters')",
    );

    if let Some(skills) = params.skills.as_deref().filter(|s| !s.trim().is_empty()) {
        let terms: Vec<String> = skills
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| format!("%{t}%"))
            .collect();
        if !terms.is_empty() {
            qb.push(" AND (");
            for (i, term) in terms.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                qb.push("EXISTS (SELECT 1 FROM profile_skills sk
                          WHERE sk.profile_id = p.id AND sk.name ILIKE ")
                    .push_bind(term.clone())
                    .push(") OR p.skills_text ILIKE ")
                    .push_bind(term.clone());
            }
            qb.push(")");
        }
    }

    if let Some(location) = params.location.as_deref().filter(|s| !s.trim().is_empty()) {
        qb.push(" AND p.location ILIKE ")
            .push_bind(format!("%{}%", location.trim()));
    }

    if let Some(projects) = params.projects.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = format!("%{}%", projects.trim());
        qb.push(" AND (EXISTS (SELECT 1 FROM profile_projects pr
                  WHERE pr.profile_id = p.id AND (pr.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR pr.description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR pr.technologies ILIKE ")
            .push_bind(pattern.clone())
            .push(")) OR p.projects_text ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(search) = params.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = format!("%{}%", search.trim());
        qb.push(" AND (u.first_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR u.last_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.headline ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.bio ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.location ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.skills_text ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.projects_text ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR EXISTS (SELECT 1 FROM profile_skills sk
                      WHERE sk.profile_id = p.id AND sk.name ILIKE ")
            .push_bind(pattern.clone())
            .push(") OR EXISTS (SELECT 1 FROM profile_projects pr
                      WHERE pr.profile_id = p.id AND (pr.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR pr.description ILIKE ")
            .push_bind(pattern)
            .push(")))");
    }
}

/// GET /api/v1/recruiter/candidates — search visible job-seeker profiles.
pub async fn handle_candidate_search(
    State(state): State<AppState>,
    Query(params): Query<CandidateSearchQuery>,
) -> Result<Json<Page<CandidateSearchItem>>, AppError> {
    require_recruiter(&state.db, params.recruiter_id).await?;

    let joins = "FROM profiles p JOIN users u ON u.id = p.user_id";

    let mut count_qb: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT count(*) {joins}"));
    push_candidate_filters(&mut count_qb, &params);
    let total: i64 = count_qb.build_query_scalar().fetch_one(&state.db).await?;

    let window = page_window(params.page, CANDIDATES_PER_PAGE, total);

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "SELECT p.*, u.username, u.first_name, u.last_name {joins}"
    ));
    push_candidate_filters(&mut qb, &params);
    qb.push(" ORDER BY p.updated_at DESC LIMIT ")
        .push_bind(window.limit)
        .push(" OFFSET ")
        .push_bind(window.offset);
    let items: Vec<CandidateSearchItem> = qb.build_query_as().fetch_all(&state.db).await?;

    Ok(Json(Page::new(items, total, &window)))
}

// ── Kanban board ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CardView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub card: CardRow,
    pub application_status: String,
    pub applicant_username: String,
}

#[derive(Serialize)]
pub struct StageColumn {
    #[serde(flatten)]
    pub stage: StageRow,
    pub cards: Vec<CardView>,
}

#[derive(Serialize)]
pub struct BoardView {
    pub job_id: Uuid,
    pub stages: Vec<StageColumn>,
}

/// GET /api/v1/recruiter/kanban/:job_id
/// Seeds the default stage set on first fetch and files card-less
/// applications into the first column.
pub async fn handle_board(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<RecruiterQuery>,
) -> Result<Json<BoardView>, AppError> {
    require_recruiter(&state.db, params.recruiter_id).await?;
    let job = job_owned_by(&state.db, job_id, params.recruiter_id).await?;

    let mut tx = state.db.begin().await?;

    let mut stages = sqlx::query_as::<_, StageRow>(
        "SELECT * FROM pipeline_stages WHERE job_id = $1 ORDER BY position",
    )
    .bind(job.id)
    .fetch_all(&mut *tx)
    .await?;

    if stages.is_empty() {
        for (position, name) in DEFAULT_STAGES.iter().enumerate() {
            sqlx::query(
                "INSERT INTO pipeline_stages (id, job_id, name, position)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(Uuid::new_v4())
            .bind(job.id)
            .bind(name)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }
        stages = sqlx::query_as::<_, StageRow>(
            "SELECT * FROM pipeline_stages WHERE job_id = $1 ORDER BY position",
        )
        .bind(job.id)
        .fetch_all(&mut *tx)
        .await?;
    }

    // File applications that have no card yet into the first column.
    let first_stage = stages[0].id;
    sqlx::query(
        r#"
        INSERT INTO pipeline_cards (id, application_id, stage_id, position)
        SELECT gen_random_uuid(), a.id, $2,
               COALESCE((SELECT max(position) + 1 FROM pipeline_cards
                         WHERE stage_id = $2), 0)
               + row_number() OVER (ORDER BY a.applied_at) - 1
        FROM applications a
        WHERE a.job_id = $1
          AND NOT EXISTS (SELECT 1 FROM pipeline_cards c WHERE c.application_id = a.id)
        "#,
    )
    .bind(job.id)
    .bind(first_stage)
    .execute(&mut *tx)
    .await?;

    let mut columns = Vec::with_capacity(stages.len());
    for stage in stages {
        let cards = sqlx::query_as::<_, CardView>(
            "SELECT c.*, a.status AS application_status, u.username AS applicant_username
             FROM pipeline_cards c
             JOIN applications a ON a.id = c.application_id
             JOIN users u ON u.id = a.applicant_id
             WHERE c.stage_id = $1
             ORDER BY c.position",
        )
        .bind(stage.id)
        .fetch_all(&mut *tx)
        .await?;
        columns.push(StageColumn { stage, cards });
    }

    tx.commit().await?;

    Ok(Json(BoardView {
        job_id: job.id,
        stages: columns,
    }))
}

#[derive(Deserialize)]
pub struct CreateStageRequest {
    pub recruiter_id: Uuid,
    pub job_id: Uuid,
    pub name: String,
}

/// POST /api/v1/recruiter/kanban/stages — appends a new column.
pub async fn handle_create_stage(
    State(state): State<AppState>,
    Json(req): Json<CreateStageRequest>,
) -> Result<Json<StageRow>, AppError> {
    require_recruiter(&state.db, req.recruiter_id).await?;
    let job = job_owned_by(&state.db, req.job_id, req.recruiter_id).await?;
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Stage name is required".into()));
    }

    let stage = sqlx::query_as::<_, StageRow>(
        r#"
        INSERT INTO pipeline_stages (id, job_id, name, position)
        VALUES ($1, $2, $3,
                COALESCE((SELECT max(position) + 1 FROM pipeline_stages
                          WHERE job_id = $2), 0))
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job.id)
    .bind(req.name.trim())
    .fetch_one(&state.db)
    .await?;

    Ok(Json(stage))
}

#[derive(Deserialize)]
pub struct MoveCardRequest {
    pub recruiter_id: Uuid,
    pub card_id: Uuid,
    pub to_stage_id: Uuid,
    pub to_position: u32,
}

/// POST /api/v1/recruiter/kanban/move
/// Relocates a card and compacts positions in both affected columns.
pub async fn handle_move_card(
    State(state): State<AppState>,
    Json(req): Json<MoveCardRequest>,
) -> Result<Json<CardRow>, AppError> {
    require_recruiter(&state.db, req.recruiter_id).await?;

    let card = sqlx::query_as::<_, CardRow>("SELECT * FROM pipeline_cards WHERE id = $1")
        .bind(req.card_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Card {} not found", req.card_id)))?;

    let source_stage = stage_by_id(&state.db, card.stage_id).await?;
    let dest_stage = stage_by_id(&state.db, req.to_stage_id).await?;
    if dest_stage.job_id != source_stage.job_id {
        return Err(AppError::Validation(
            "Cannot move a card to another job's pipeline".into(),
        ));
    }
    job_owned_by(&state.db, source_stage.job_id, req.recruiter_id).await?;

    let mut tx = state.db.begin().await?;

    let source_order = stage_card_ids(&mut tx, source_stage.id).await?;
    if source_stage.id == dest_stage.id {
        let order = reorder_within(&source_order, card.id, req.to_position as usize);
        write_positions(&mut tx, dest_stage.id, &order).await?;
    } else {
        let dest_order = stage_card_ids(&mut tx, dest_stage.id).await?;
        let (new_source, new_dest) =
            move_across(&source_order, &dest_order, card.id, req.to_position as usize);
        write_positions(&mut tx, source_stage.id, &new_source).await?;
        write_positions(&mut tx, dest_stage.id, &new_dest).await?;
    }

    let moved = sqlx::query_as::<_, CardRow>("SELECT * FROM pipeline_cards WHERE id = $1")
        .bind(card.id)
        .fetch_one(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(Json(moved))
}

async fn stage_by_id(pool: &PgPool, id: Uuid) -> Result<StageRow, AppError> {
    sqlx::query_as::<_, StageRow>("SELECT * FROM pipeline_stages WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Stage {id} not found")))
}

async fn stage_card_ids(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    stage_id: Uuid,
) -> Result<Vec<Uuid>, AppError> {
    Ok(sqlx::query_scalar(
        "SELECT id FROM pipeline_cards WHERE stage_id = $1 ORDER BY position",
    )
    .bind(stage_id)
    .fetch_all(&mut **tx)
    .await?)
}

/// Rewrites the stage and dense positions for an ordered card list.
/// The (stage, position) unique constraint is deferred, so the shuffle is
/// safe inside the transaction.
async fn write_positions(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    stage_id: Uuid,
    order: &[Uuid],
) -> Result<(), AppError> {
    for (position, card_id) in order.iter().enumerate() {
        sqlx::query("UPDATE pipeline_cards SET stage_id = $2, position = $3 WHERE id = $1")
            .bind(card_id)
            .bind(stage_id)
            .bind(position as i32)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}
