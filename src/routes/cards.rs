//! Card endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::error::Result;
use crate::models::Card;
use crate::routes::auth::CurrentUser;
use crate::schemas::{require_positive_id, CreateCardInput, UpdateCardInput};
use crate::AppState;

/// POST /api/cards
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateCardInput>,
) -> Result<(StatusCode, Json<Card>)> {
    payload.validate()?;
    state.db.authorize_deck(payload.deck_id, &user.user_id).await?;

    let card = state.db.create_card(&payload).await?;

    Ok((StatusCode::CREATED, Json(card)))
}

/// PUT /api/cards/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(card_id): Path<i32>,
    Json(payload): Json<UpdateCardInput>,
) -> Result<StatusCode> {
    require_positive_id(card_id, "card")?;
    payload.validate()?;
    state.db.authorize_card(card_id, &user.user_id).await?;

    state.db.update_card(card_id, &payload).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/cards/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(card_id): Path<i32>,
) -> Result<StatusCode> {
    require_positive_id(card_id, "card")?;
    state.db.authorize_card(card_id, &user.user_id).await?;

    state.db.delete_card(card_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
