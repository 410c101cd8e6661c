//! Study endpoints

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::{RecordProgressRequest, RecordProgressResponse};
use crate::routes::auth::CurrentUser;
use crate::schemas::require_positive_id;
use crate::AppState;

/// POST /api/study/progress
/// Records one study event for the caller and the given card. Repeated
/// calls land on the same progress row and bump its review count.
pub async fn record_progress(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<RecordProgressRequest>,
) -> Result<Json<RecordProgressResponse>> {
    require_positive_id(payload.card_id, "card")?;
    state.db.authorize_card(payload.card_id, &user.user_id).await?;

    let progress = state
        .db
        .record_card_review(&user.user_id, payload.card_id, payload.correct)
        .await?;

    Ok(Json(RecordProgressResponse {
        card_id: progress.card_id,
        review_count: progress.review_count,
        is_studied: true,
    }))
}
