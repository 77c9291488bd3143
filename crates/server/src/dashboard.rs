//! Aggregate balances endpoint.

use api_types::dashboard::{DashboardResponse, OwedShareView, PaidExpenseView, ShareView};
use axum::{Extension, Json, extract::State};

use crate::{ServerError, server::ServerState};
use engine::users;

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<DashboardResponse>, ServerError> {
    let dashboard = state.engine.dashboard(user.id).await?;

    let paid_expenses = dashboard
        .paid_expenses
        .into_iter()
        .map(|expense| PaidExpenseView {
            id: expense.id,
            title: expense.title,
            currency: expense.currency,
            total_minor: expense.total.cents(),
            note: expense.note,
            split_amount_minor: expense.split_amount.cents(),
            participants: expense
                .participants
                .into_iter()
                .map(|share| ShareView {
                    user_id: share.user_id,
                    username: share.username,
                    amount_minor: share.amount.cents(),
                    paid: share.paid,
                })
                .collect(),
        })
        .collect();

    let owed_shares = dashboard
        .owed_shares
        .into_iter()
        .map(|share| OwedShareView {
            expense_id: share.expense_id,
            title: share.title,
            currency: share.currency,
            payer: share.payer,
            amount_minor: share.amount.cents(),
            paid: share.paid,
            note: share.note,
        })
        .collect();

    Ok(Json(DashboardResponse {
        paid_expenses,
        owed_shares,
        you_are_owed_minor: dashboard.you_are_owed.cents(),
        you_owe_minor: dashboard.you_owe.cents(),
    }))
}
