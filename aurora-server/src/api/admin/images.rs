use aurora_core::media::{DestroyImage, DestroyOutcome};
use aurora_sdk::objects::ApiResponse;
use axum::{
    Json,
    extract::{Path, State},
};
use kanau::processor::Processor;

use crate::api::ApiError;
use crate::state::AppState;

/// `DELETE /{kind}/delete-image/{public_id}`: Remove an uploaded image from
/// the media host. The entity keeps its image list until the admin saves it.
pub async fn delete_image(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let client = state
        .media
        .read()
        .await
        .clone()
        .ok_or(ApiError::Unavailable("Image storage is not configured."))?;

    match client.process(DestroyImage { public_id }).await? {
        DestroyOutcome::Deleted => Ok(Json(ApiResponse::message("Image deleted."))),
        DestroyOutcome::NotFound => Err(ApiError::NotFound("Image not found.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn test_image_deletion_without_media_host() {
        let err = delete_image(
            State(test_support::state()),
            Path("aurora/ring-01".to_string()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.to_string(), "Image storage is not configured.");
    }
}
