//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// === Database Entity Types ===

/// Authenticated user account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(skip_serializing)]
    pub token: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Deck row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub user_id: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Card row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: i32,
    pub deck_id: i32,
    pub front: String,
    pub back: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-user per-card study progress row.
///
/// `difficulty` and `next_review` are persisted for a future scheduler but
/// never consulted by any read or write path.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub id: i32,
    pub user_id: String,
    pub card_id: i32,
    pub difficulty: i32,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_review: Option<DateTime<Utc>>,
    pub review_count: i32,
    pub correct_count: i32,
    pub incorrect_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// === Query Result Types ===

/// Deck annotated with its card count, for listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DeckSummary {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub card_count: i64,
}

/// Single deck with aggregate study stats for the requesting user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DeckDetail {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub card_count: i64,
    pub studied_cards: i64,
}

/// Card projection for deck listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub id: i32,
    pub front: String,
    pub back: String,
    pub created_at: DateTime<Utc>,
}

/// Card annotated with whether the requesting user has studied it
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CardWithStudyStatus {
    pub id: i32,
    pub front: String,
    pub back: String,
    pub created_at: DateTime<Utc>,
    pub is_studied: bool,
}

/// Aggregate counts for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_cards: i64,
    pub total_decks: i64,
    pub total_study_sessions: i64,
    pub mastery_rate: i32,
}

// === API Request/Response Types ===

/// POST /api/auth/register request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// POST /api/auth/register response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: String,
    pub token: String,
}

/// GET /api/auth/me response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// GET /api/decks response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckListResponse {
    pub decks: Vec<DeckSummary>,
}

/// GET /api/decks query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct DeckListQuery {
    pub limit: Option<i64>,
}

/// POST /api/study/progress request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordProgressRequest {
    pub card_id: i32,
    /// When present, also counts the review toward the mastery rate
    pub correct: Option<bool>,
}

/// POST /api/study/progress response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordProgressResponse {
    pub card_id: i32,
    pub review_count: i32,
    pub is_studied: bool,
}
