//! Account endpoints.

use api_types::user::{Register, UserView, UsersResponse};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState};
use engine::users;

/// Create an account. The only route that skips the auth middleware.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<Register>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let user = state
        .engine
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserView {
            id: user.id,
            username: user.username,
        }),
    ))
}

/// Everyone except the requester, for the participant picker.
pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<UsersResponse>, ServerError> {
    let users = state.engine.list_users(user.id).await?;

    Ok(Json(UsersResponse {
        users: users
            .into_iter()
            .map(|user| UserView {
                id: user.id,
                username: user.username,
            })
            .collect(),
    }))
}
