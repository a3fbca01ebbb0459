use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::errors::AppError;
use crate::messaging::{reply_subject, MessageStatus, MESSAGE_TYPES};
use crate::models::message::MessageRow;
use crate::pagination::{page_window, Page};
use crate::profiles::{profile_for_user, require_recruiter};
use crate::state::AppState;

const INBOX_PER_PAGE: u32 = 20;

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub subject: String,
    pub body: String,
    #[serde(default = "default_message_type")]
    pub message_type: String,
    pub related_job_id: Option<Uuid>,
}

fn default_message_type() -> String {
    "general".to_string()
}

/// POST /api/v1/messages
/// Recruiter-initiated contact with a candidate. The recipient must hold a
/// job-seeker profile.
pub async fn handle_send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<MessageRow>, AppError> {
    require_recruiter(&state.db, req.sender_id).await?;

    let recipient = profile_for_user(&state.db, req.recipient_id).await?;
    if !recipient.is_some_and(|p| p.is_job_seeker()) {
        return Err(AppError::Validation("Invalid candidate".into()));
    }

    if req.subject.trim().is_empty() {
        return Err(AppError::Validation("Subject is required".into()));
    }
    if req.body.trim().is_empty() {
        return Err(AppError::Validation("Message body is required".into()));
    }
    if !MESSAGE_TYPES.contains(&req.message_type.as_str()) {
        return Err(AppError::Validation(format!(
            "Invalid message type '{}'",
            req.message_type
        )));
    }

    let message = sqlx::query_as::<_, MessageRow>(
        r#"
        INSERT INTO messages
            (id, sender_id, recipient_id, subject, body, message_type, status, related_job_id)
        VALUES ($1, $2, $3, $4, $5, $6, 'sent', $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.sender_id)
    .bind(req.recipient_id)
    .bind(req.subject.trim())
    .bind(&req.body)
    .bind(&req.message_type)
    .bind(req.related_job_id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(message))
}

#[derive(Deserialize)]
pub struct InboxQuery {
    pub user_id: Uuid,
    pub search: Option<String>,
    pub message_type: Option<String>,
    pub status: Option<String>,
    /// "sent" | "received" | "unread"
    pub filter: Option<String>,
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

fn push_inbox_filters(qb: &mut QueryBuilder<Postgres>, params: &InboxQuery) {
    qb.push(" WHERE (m.sender_id = ")
        .push_bind(params.user_id)
        .push(" OR m.recipient_id = ")
        .push_bind(params.user_id)
        .push(")");

    if let Some(search) = params.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = format!("%{}%", search.trim());
        qb.push(" AND (m.subject ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR m.body ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR s.username ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR r.username ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(mt) = params.message_type.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND m.message_type = ").push_bind(mt.to_string());
    }
    if let Some(status) = params.status.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND m.status = ").push_bind(status.to_string());
    }
    match params.filter.as_deref() {
        Some("sent") => {
            qb.push(" AND m.sender_id = ").push_bind(params.user_id);
        }
        Some("received") => {
            qb.push(" AND m.recipient_id = ").push_bind(params.user_id);
        }
        Some("unread") => {
            qb.push(" AND m.recipient_id = ")
                .push_bind(params.user_id)
                .push(" AND m.read_at IS NULL");
        }
        _ => {}
    }
}

/// A message joined with sender/recipient usernames for list display.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct InboxItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub message: MessageRow,
    pub sender_username: String,
    pub recipient_username: String,
}

/// GET /api/v1/messages — inbox for a user (sent + received).
pub async fn handle_inbox(
    State(state): State<AppState>,
    Query(params): Query<InboxQuery>,
) -> Result<Json<Page<InboxItem>>, AppError> {
    if let Some(status) = params.status.as_deref().filter(|s| !s.is_empty()) {
        status.parse::<MessageStatus>().map_err(AppError::Validation)?;
    }

    let joins = "FROM messages m
                 JOIN users s ON s.id = m.sender_id
                 JOIN users r ON r.id = m.recipient_id";

    let mut count_qb: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT count(*) {joins}"));
    push_inbox_filters(&mut count_qb, &params);
    let total: i64 = count_qb.build_query_scalar().fetch_one(&state.db).await?;

    let window = page_window(params.page, INBOX_PER_PAGE, total);

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "SELECT m.*, s.username AS sender_username, r.username AS recipient_username {joins}"
    ));
    push_inbox_filters(&mut qb, &params);
    qb.push(" ORDER BY m.sent_at DESC LIMIT ")
        .push_bind(window.limit)
        .push(" OFFSET ")
        .push_bind(window.offset);
    let items: Vec<InboxItem> = qb.build_query_as().fetch_all(&state.db).await?;

    Ok(Json(Page::new(items, total, &window)))
}

#[derive(Deserialize)]
pub struct ActingUserQuery {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct MessageDetail {
    #[serde(flatten)]
    pub message: MessageRow,
    /// The full thread (root first, replies in send order).
    pub thread: Vec<MessageRow>,
}

/// GET /api/v1/messages/:id
/// Marks the message read when the viewer is the recipient.
pub async fn handle_message_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(acting): Query<ActingUserQuery>,
) -> Result<Json<MessageDetail>, AppError> {
    let mut message = message_by_id(&state.db, id).await?;
    if message.sender_id != acting.user_id && message.recipient_id != acting.user_id {
        return Err(AppError::Forbidden);
    }

    if message.recipient_id == acting.user_id && !message.is_read() {
        message = sqlx::query_as::<_, MessageRow>(
            "UPDATE messages SET read_at = now(), status = 'read'
             WHERE id = $1 RETURNING *",
        )
        .bind(message.id)
        .fetch_one(&state.db)
        .await?;
    }

    let thread = fetch_thread(&state.db, &message).await?;
    Ok(Json(MessageDetail { message, thread }))
}

#[derive(Deserialize)]
pub struct ReplyRequest {
    pub user_id: Uuid,
    pub body: String,
}

/// POST /api/v1/messages/:id/reply
/// Either participant may reply; the reply goes to the other party and
/// links to the thread root.
pub async fn handle_reply(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReplyRequest>,
) -> Result<Json<MessageRow>, AppError> {
    let parent = message_by_id(&state.db, id).await?;
    if parent.sender_id != req.user_id && parent.recipient_id != req.user_id {
        return Err(AppError::Forbidden);
    }
    if req.body.trim().is_empty() {
        return Err(AppError::Validation("Message body is required".into()));
    }

    let recipient_id = if req.user_id == parent.recipient_id {
        parent.sender_id
    } else {
        parent.recipient_id
    };
    let root_id = parent.parent_message_id.unwrap_or(parent.id);

    let mut tx = state.db.begin().await?;
    let reply = sqlx::query_as::<_, MessageRow>(
        r#"
        INSERT INTO messages
            (id, sender_id, recipient_id, subject, body, message_type, status,
             related_job_id, parent_message_id)
        VALUES ($1, $2, $3, $4, $5, $6, 'sent', $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.user_id)
    .bind(recipient_id)
    .bind(reply_subject(&parent.subject))
    .bind(&req.body)
    .bind(&parent.message_type)
    .bind(parent.related_job_id)
    .bind(root_id)
    .fetch_one(&mut *tx)
    .await?;
    sqlx::query(
        "UPDATE messages SET replied_at = now(), status = 'replied'
         WHERE id = $1 AND replied_at IS NULL",
    )
    .bind(parent.id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(Json(reply))
}

/// POST /api/v1/messages/:id/read — explicit mark-read for the recipient.
pub async fn handle_mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ActingUserQuery>,
) -> Result<Json<MessageRow>, AppError> {
    let message = message_by_id(&state.db, id).await?;
    if message.recipient_id != req.user_id {
        return Err(AppError::Forbidden);
    }

    let updated = sqlx::query_as::<_, MessageRow>(
        "UPDATE messages
         SET read_at = COALESCE(read_at, now()),
             status = CASE WHEN read_at IS NULL THEN 'read' ELSE status END
         WHERE id = $1 RETURNING *",
    )
    .bind(message.id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(updated))
}

async fn message_by_id(pool: &PgPool, id: Uuid) -> Result<MessageRow, AppError> {
    sqlx::query_as::<_, MessageRow>("SELECT * FROM messages WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Message {id} not found")))
}

/// All messages in the same thread as `message`, chronological.
async fn fetch_thread(pool: &PgPool, message: &MessageRow) -> Result<Vec<MessageRow>, AppError> {
    let root_id = message.parent_message_id.unwrap_or(message.id);
    Ok(sqlx::query_as::<_, MessageRow>(
        "SELECT * FROM messages
         WHERE id = $1 OR parent_message_id = $1
         ORDER BY sent_at ASC",
    )
    .bind(root_id)
    .fetch_all(pool)
    .await?)
}
