//! CRUD handlers for `/questions`.
//!
//! Writes go through `QuestionDraft::validate`; ids that do not parse as
//! ObjectIds are reported exactly like absent ones.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use service_core::error::AppError;

use crate::models::{parse_question_id, QuestionDraft, QuestionResponse, Subject};
use crate::startup::AppState;
use crate::utils::JsonBody;

#[derive(Debug, Deserialize)]
pub struct ListQuestionsQuery {
    pub subject: Option<String>,
}

fn question_id(raw: &str) -> Result<ObjectId, AppError> {
    parse_question_id(raw).ok_or_else(AppError::not_found)
}

#[tracing::instrument(skip(state, draft))]
pub async fn create_question(
    State(state): State<AppState>,
    JsonBody(draft): JsonBody<QuestionDraft>,
) -> Result<(StatusCode, Json<QuestionResponse>), AppError> {
    let valid = draft.validate().map_err(|e| {
        tracing::warn!(path = e.path(), "Question rejected: {}", e);
        e
    })?;

    let question = state.store.insert(valid).await?;
    tracing::info!(question_id = %question.id, subject = %question.subject, "Question created");

    Ok((StatusCode::CREATED, Json(QuestionResponse::from(question))))
}

/// Insert each candidate in order, stopping at the first failure. Earlier
/// records stay persisted.
#[tracing::instrument(skip(state, body))]
pub async fn bulk_create_questions(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<serde_json::Value>,
) -> Result<(StatusCode, Json<Vec<QuestionResponse>>), AppError> {
    let candidates = match body {
        serde_json::Value::Array(items) if !items.is_empty() => items,
        _ => {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Request body must be a non-empty array of questions"
            )))
        }
    };

    let total = candidates.len();
    let mut created = Vec::with_capacity(total);

    for (index, candidate) in candidates.into_iter().enumerate() {
        let valid = serde_json::from_value::<QuestionDraft>(candidate)
            .map_err(|e| e.to_string())
            .and_then(|draft| draft.validate().map_err(|e| e.message()))
            .map_err(|message| {
                tracing::warn!(
                    index,
                    persisted = created.len(),
                    "Bulk insert stopped: {}",
                    message
                );
                AppError::BadRequest(anyhow::anyhow!(
                    "Question at index {} is invalid: {}",
                    index,
                    message
                ))
            })?;

        let question = state.store.insert(valid).await.map_err(|e| {
            tracing::warn!(index, persisted = created.len(), "Bulk insert stopped: {}", e);
            e
        })?;
        created.push(QuestionResponse::from(question));
    }

    tracing::info!(count = total, "Questions bulk created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// An unknown `subject` value matches nothing; an empty one means no filter.
#[tracing::instrument(skip(state))]
pub async fn list_questions(
    State(state): State<AppState>,
    Query(params): Query<ListQuestionsQuery>,
) -> Result<Json<Vec<QuestionResponse>>, AppError> {
    let subject = match params.subject.as_deref() {
        None | Some("") => None,
        Some(raw) => match raw.parse::<Subject>() {
            Ok(subject) => Some(subject),
            Err(_) => return Ok(Json(Vec::new())),
        },
    };

    let questions = state.store.list(subject).await?;
    Ok(Json(
        questions.into_iter().map(QuestionResponse::from).collect(),
    ))
}

#[tracing::instrument(skip(state))]
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QuestionResponse>, AppError> {
    let id = question_id(&id)?;
    let question = state
        .store
        .find_by_id(&id)
        .await?
        .ok_or_else(AppError::not_found)?;

    Ok(Json(QuestionResponse::from(question)))
}

/// Merge the body onto the stored record, revalidate the whole document and
/// write it back.
#[tracing::instrument(skip(state, patch))]
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<QuestionDraft>,
) -> Result<Json<QuestionResponse>, AppError> {
    let id = question_id(&id)?;
    let existing = state
        .store
        .find_by_id(&id)
        .await?
        .ok_or_else(AppError::not_found)?;

    let valid = patch.merge_onto(&existing).validate().map_err(|e| {
        tracing::warn!(question_id = %id, path = e.path(), "Update rejected: {}", e);
        e
    })?;

    // Deleted between the read and the write.
    let updated = state
        .store
        .replace(&id, valid)
        .await?
        .ok_or_else(AppError::not_found)?;
    tracing::info!(question_id = %id, "Question updated");

    Ok(Json(QuestionResponse::from(updated)))
}

#[tracing::instrument(skip(state))]
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = question_id(&id)?;
    if !state.store.delete(&id).await? {
        return Err(AppError::not_found());
    }

    tracing::info!(question_id = %id, "Question deleted");
    Ok(StatusCode::NO_CONTENT)
}
