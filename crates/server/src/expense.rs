//! Expense endpoints.

use api_types::expense::{ExpenseCreated, ExpenseDetail, ExpenseNew, ExpenseUpdate};
use api_types::notification::RemindResponse;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};
use engine::{CreateExpenseCmd, MoneyCents, UpdateExpenseCmd, users};

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseCreated>), ServerError> {
    let mut cmd = CreateExpenseCmd::new(
        payload.title,
        payload.currency,
        MoneyCents::new(payload.total_minor),
        user.id,
    )
    .participants(payload.participants);
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }

    let expense = state.engine.create_expense(cmd).await?;

    Ok((StatusCode::CREATED, Json(ExpenseCreated { id: expense.id })))
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<ExpenseDetail>, ServerError> {
    let (expense, participants) = state.engine.expense(id, user.id).await?;

    Ok(Json(ExpenseDetail {
        id: expense.id,
        title: expense.title,
        currency: expense.currency,
        total_minor: expense.total_minor,
        note: expense.note,
        created_at: expense.created_at.fixed_offset(),
        participants,
    }))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<StatusCode, ServerError> {
    let mut cmd = UpdateExpenseCmd::new(
        id,
        payload.title,
        payload.currency,
        MoneyCents::new(payload.total_minor),
        user.id,
    )
    .participants(payload.participants);
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }

    state.engine.update_expense(cmd).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(id, user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Mark the requester's own share as paid.
pub async fn pay(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.mark_paid(id, user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Create one in-app reminder per participant share, skipping the payer's own.
pub async fn remind(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<RemindResponse>, ServerError> {
    let created = state.engine.remind_participants(id, user.id).await?;

    Ok(Json(RemindResponse { created }))
}
