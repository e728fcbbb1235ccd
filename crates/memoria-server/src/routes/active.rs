//! Active-image routes.
//!
//! `GET /api/activeUserImage/{user_id}` is the main endpoint: it resolves the
//! user's active item and answers with the captioned image URL as plain text.
//! `GET /api/activeUserItem/{user_id}` returns the same resolution as JSON,
//! and `POST /api/activeUserImage/{user_id}/cursor` moves the cursor.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use memoria_core::caption::apply_caption_with;
use memoria_core::config::CaptionStyle;
use memoria_core::{ActiveItem, CursorUpdate, Error, FolderItem, Result, UserId};
use memoria_store::queries::{cursors, users};

use crate::context::AppContext;
use crate::error::AppError;
use crate::middleware::request_id::RequestId;
use crate::resolver::{self, Resolution};

fn user_not_found() -> Response {
    (StatusCode::NOT_FOUND, "User not found").into_response()
}

fn no_active_item() -> Response {
    (StatusCode::NOT_FOUND, "No active item").into_response()
}

fn error_response(e: Error, request_id: &RequestId) -> Response {
    AppError::from(e)
        .with_request_id(request_id.0.clone())
        .into_response()
}

/// Resolve the user's active item, or the response to send instead.
async fn lookup_active_item(
    ctx: &AppContext,
    user_id: &UserId,
    request_id: &RequestId,
) -> std::result::Result<ActiveItem, Response> {
    let pointer = match users::get_active_folder(ctx.store.as_ref(), user_id).await {
        Ok(Some(pointer)) => pointer,
        Ok(None) => return Err(user_not_found()),
        Err(e @ Error::InvalidReference(_)) => {
            tracing::warn!(user = %user_id, error = %e, "unusable active folder pointer");
            return Err(no_active_item());
        }
        Err(e) => return Err(error_response(e, request_id)),
    };

    match resolver::resolve(ctx.store.as_ref(), user_id, Some(&pointer)).await {
        Resolution::Active(active) => Ok(active),
        Resolution::EmptyFolder { folder_id } => {
            tracing::debug!(user = %user_id, folder = %folder_id, "active folder is empty");
            Err(error_response(
                Error::EmptyFolder {
                    folder_id: folder_id.to_string(),
                },
                request_id,
            ))
        }
        Resolution::NoSelection | Resolution::Unavailable => Err(no_active_item()),
    }
}

/// Captioned URL for an item's image; the description is the caption.
fn captioned_url(style: &CaptionStyle, item: &FolderItem) -> Result<String> {
    let image = item
        .image
        .as_ref()
        .ok_or_else(|| Error::transform(format!("item {} has no image", item.id)))?;
    apply_caption_with(style, image, item.description.as_deref().unwrap_or_default())
}

/// GET /api/activeUserImage/{user_id}
pub async fn active_user_image(
    State(ctx): State<AppContext>,
    Extension(user_id): Extension<UserId>,
    Extension(request_id): Extension<RequestId>,
) -> Response {
    let active = match lookup_active_item(&ctx, &user_id, &request_id).await {
        Ok(active) => active,
        Err(response) => return response,
    };

    match captioned_url(&ctx.config.caption, &active.item) {
        Ok(url) => (StatusCode::OK, url).into_response(),
        Err(e) => {
            tracing::warn!(user = %user_id, item = %active.item.id, error = %e, "cannot caption image");
            error_response(e, &request_id)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveItemResponse {
    #[serde(flatten)]
    pub active: ActiveItem,
    pub image_url: String,
}

/// GET /api/activeUserItem/{user_id}
pub async fn active_user_item(
    State(ctx): State<AppContext>,
    Extension(user_id): Extension<UserId>,
    Extension(request_id): Extension<RequestId>,
) -> Response {
    let active = match lookup_active_item(&ctx, &user_id, &request_id).await {
        Ok(active) => active,
        Err(response) => return response,
    };

    match captioned_url(&ctx.config.caption, &active.item) {
        Ok(image_url) => Json(ActiveItemResponse { active, image_url }).into_response(),
        Err(e) => error_response(e, &request_id),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorRequest {
    pub delta: Option<i64>,
    pub set_to: Option<i64>,
}

/// POST /api/activeUserImage/{user_id}/cursor
///
/// Shifts or sets the cursor of the user's active folder. Out-of-range
/// values are stored as given and wrapped on the next resolution.
pub async fn update_cursor(
    State(ctx): State<AppContext>,
    Extension(user_id): Extension<UserId>,
    Extension(request_id): Extension<RequestId>,
    Json(payload): Json<CursorRequest>,
) -> std::result::Result<StatusCode, AppError> {
    apply_cursor_request(&ctx, &user_id, payload)
        .await
        .map_err(|e| AppError::from(e).with_request_id(request_id.0))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn apply_cursor_request(
    ctx: &AppContext,
    user_id: &UserId,
    payload: CursorRequest,
) -> Result<()> {
    let update = CursorUpdate::from_parts(payload.delta, payload.set_to)?;

    let pointer = users::get_active_folder(ctx.store.as_ref(), user_id)
        .await?
        .ok_or_else(|| Error::not_found("active folder", user_id))?;

    cursors::set_or_shift_index(
        ctx.store.as_ref(),
        user_id,
        &pointer.folder_id,
        pointer.folder_category,
        update,
    )
    .await
}
