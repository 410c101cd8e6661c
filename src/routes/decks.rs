//! Deck endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::CurrentUser;
use crate::schemas::{require_positive_id, CreateDeckInput, UpdateDeckInput};
use crate::AppState;

/// GET /api/decks
/// Lists the caller's decks with card counts; `?limit=N` caps the result
/// to the N most recently updated decks.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<DeckListQuery>,
) -> Result<Json<DeckListResponse>> {
    let decks = match query.limit {
        Some(limit) => {
            if limit < 1 {
                return Err(ApiError::BadRequest("Invalid limit".to_string()));
            }
            state
                .db
                .get_recent_decks_with_card_counts(&user.user_id, limit)
                .await?
        }
        None => state.db.get_all_decks_with_card_counts(&user.user_id).await?,
    };

    Ok(Json(DeckListResponse { decks }))
}

/// GET /api/decks/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(deck_id): Path<i32>,
) -> Result<Json<DeckDetail>> {
    let deck = state
        .db
        .get_deck_by_id(deck_id, &user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Deck {} not found", deck_id)))?;

    Ok(Json(deck))
}

/// GET /api/decks/:id/cards
/// Cards for a deck annotated with the caller's study status. A deck that
/// does not exist or is not owned by the caller yields an empty list.
pub async fn cards(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(deck_id): Path<i32>,
) -> Result<Json<Vec<CardWithStudyStatus>>> {
    let cards = state
        .db
        .get_cards_with_study_status(deck_id, &user.user_id)
        .await?;

    Ok(Json(cards))
}

/// POST /api/decks
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateDeckInput>,
) -> Result<(StatusCode, Json<Deck>)> {
    // The owner is always the authenticated caller, whatever the body says.
    let input = CreateDeckInput {
        user_id: user.user_id,
        ..payload
    };
    input.validate()?;

    let deck = state.db.create_deck(&input).await?;

    tracing::info!("Created deck {} for user {}", deck.id, deck.user_id);

    Ok((StatusCode::CREATED, Json(deck)))
}

/// PUT /api/decks/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(deck_id): Path<i32>,
    Json(payload): Json<UpdateDeckInput>,
) -> Result<StatusCode> {
    require_positive_id(deck_id, "deck")?;
    payload.validate()?;
    state.db.authorize_deck(deck_id, &user.user_id).await?;

    state.db.update_deck(deck_id, &payload).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/decks/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(deck_id): Path<i32>,
) -> Result<StatusCode> {
    require_positive_id(deck_id, "deck")?;
    state.db.authorize_deck(deck_id, &user.user_id).await?;

    state.db.delete_deck(deck_id).await?;

    tracing::info!("Deleted deck {} for user {}", deck_id, user.user_id);

    Ok(StatusCode::NO_CONTENT)
}
