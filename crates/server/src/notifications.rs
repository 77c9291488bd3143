//! Notification endpoints.

use api_types::notification::{NotificationView, NotificationsResponse};
use axum::{Extension, Json, extract::State};

use crate::{ServerError, server::ServerState};
use engine::users;

/// Return the requester's unread notifications and mark them read.
pub async fn drain(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<NotificationsResponse>, ServerError> {
    let notifications = state.engine.drain_unread(user.id).await?;

    Ok(Json(NotificationsResponse {
        notifications: notifications
            .into_iter()
            .map(|notification| NotificationView {
                id: notification.id,
                message: notification.message,
                created_at: notification.created_at.fixed_offset(),
            })
            .collect(),
    }))
}
