//! PostgreSQL database operations

use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::schemas::{CreateCardInput, CreateDeckInput, UpdateCardInput, UpdateDeckInput};

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === User Repository ===

    /// Create a new user with a generated id and bearer token
    pub async fn create_user(&self, name: Option<&str>, email: Option<&str>) -> Result<User> {
        let id = Uuid::new_v4().to_string();
        let token = Uuid::new_v4().to_string();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, token, name, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, token, name, email, created_at, last_seen_at
            "#,
        )
        .bind(&id)
        .bind(&token)
        .bind(name)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by bearer token
    pub async fn get_user_by_token(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, token, name, email, created_at, last_seen_at
            FROM users
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user last_seen_at timestamp
    pub async fn touch_last_seen(&self, user_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Ownership Gate ===
    //
    // Every entry point that reads or mutates a deck, card, or progress row
    // goes through one of these instead of embedding its own user_id filter.

    /// Check that a deck exists and is owned by the user
    pub async fn authorize_deck(&self, deck_id: i32, user_id: &str) -> Result<()> {
        let exists: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT 1 FROM decks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(deck_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        exists
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(format!("Deck {} not found", deck_id)))
    }

    /// Check that a card exists and belongs to a deck owned by the user
    pub async fn authorize_card(&self, card_id: i32, user_id: &str) -> Result<()> {
        let exists: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT 1
            FROM cards c
            JOIN decks d ON d.id = c.deck_id
            WHERE c.id = $1 AND d.user_id = $2
            "#,
        )
        .bind(card_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        exists
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(format!("Card {} not found", card_id)))
    }

    // === Deck Repository ===

    /// Insert a deck and return the inserted row
    pub async fn create_deck(&self, input: &CreateDeckInput) -> Result<Deck> {
        let deck = sqlx::query_as::<_, Deck>(
            r#"
            INSERT INTO decks (name, description, user_id, is_public)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, user_id, is_public, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.user_id)
        .bind(input.is_public)
        .fetch_one(&self.pool)
        .await?;

        Ok(deck)
    }

    /// Update only the supplied fields of a deck; returns affected row count
    pub async fn update_deck(&self, deck_id: i32, input: &UpdateDeckInput) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE decks
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                is_public = COALESCE($4, is_public),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(deck_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.is_public)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete a deck; cards and their progress rows cascade
    pub async fn delete_deck(&self, deck_id: i32) -> Result<u64> {
        let result = sqlx::query("DELETE FROM decks WHERE id = $1")
            .bind(deck_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Get all decks owned by a user, each with its card count,
    /// most recently updated first
    pub async fn get_all_decks_with_card_counts(&self, user_id: &str) -> Result<Vec<DeckSummary>> {
        let decks = sqlx::query_as::<_, DeckSummary>(
            r#"
            SELECT d.id, d.name, d.description, d.is_public, d.created_at, d.updated_at,
                   COUNT(c.id) AS card_count
            FROM decks d
            LEFT JOIN cards c ON c.deck_id = d.id
            WHERE d.user_id = $1
            GROUP BY d.id
            ORDER BY d.updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(decks)
    }

    /// Get the most recently updated decks for a user, with card counts
    pub async fn get_recent_decks_with_card_counts(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<DeckSummary>> {
        let decks = sqlx::query_as::<_, DeckSummary>(
            r#"
            SELECT d.id, d.name, d.description, d.is_public, d.created_at, d.updated_at,
                   COUNT(c.id) AS card_count
            FROM decks d
            LEFT JOIN cards c ON c.deck_id = d.id
            WHERE d.user_id = $1
            GROUP BY d.id
            ORDER BY d.updated_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(decks)
    }

    /// Get a single owned deck annotated with its total card count and the
    /// number of cards the user has studied at least once
    pub async fn get_deck_by_id(&self, deck_id: i32, user_id: &str) -> Result<Option<DeckDetail>> {
        let deck = sqlx::query_as::<_, DeckDetail>(
            r#"
            SELECT d.id, d.name, d.description, d.is_public, d.created_at, d.updated_at,
                   COUNT(DISTINCT c.id) AS card_count,
                   COUNT(DISTINCT up.id) AS studied_cards
            FROM decks d
            LEFT JOIN cards c ON c.deck_id = d.id
            LEFT JOIN user_progress up ON up.card_id = c.id AND up.user_id = $2
            WHERE d.id = $1 AND d.user_id = $2
            GROUP BY d.id
            "#,
        )
        .bind(deck_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deck)
    }

    // === Card Repository ===

    /// Insert a card and return the inserted row
    pub async fn create_card(&self, input: &CreateCardInput) -> Result<Card> {
        let card = sqlx::query_as::<_, Card>(
            r#"
            INSERT INTO cards (deck_id, front, back)
            VALUES ($1, $2, $3)
            RETURNING id, deck_id, front, back, created_at, updated_at
            "#,
        )
        .bind(input.deck_id)
        .bind(&input.front)
        .bind(&input.back)
        .fetch_one(&self.pool)
        .await?;

        Ok(card)
    }

    /// Update only the supplied fields of a card; returns affected row count
    pub async fn update_card(&self, card_id: i32, input: &UpdateCardInput) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE cards
            SET front = COALESCE($2, front),
                back = COALESCE($3, back),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(card_id)
        .bind(&input.front)
        .bind(&input.back)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete a card; its progress rows cascade
    pub async fn delete_card(&self, card_id: i32) -> Result<u64> {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(card_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Get all cards for a deck, newest first
    pub async fn get_cards_by_deck_id(&self, deck_id: i32) -> Result<Vec<CardSummary>> {
        let cards = sqlx::query_as::<_, CardSummary>(
            r#"
            SELECT id, front, back, created_at
            FROM cards
            WHERE deck_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(deck_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    /// Get cards for an owned deck, each flagged with whether the user has
    /// at least one progress row for it, newest first.
    ///
    /// Scoping by deck ownership means a foreign or unknown deck yields an
    /// empty list rather than leaking another user's cards.
    pub async fn get_cards_with_study_status(
        &self,
        deck_id: i32,
        user_id: &str,
    ) -> Result<Vec<CardWithStudyStatus>> {
        let cards = sqlx::query_as::<_, CardWithStudyStatus>(
            r#"
            SELECT c.id, c.front, c.back, c.created_at,
                   (up.id IS NOT NULL) AS is_studied
            FROM cards c
            JOIN decks d ON d.id = c.deck_id
            LEFT JOIN user_progress up ON up.card_id = c.id AND up.user_id = $2
            WHERE c.deck_id = $1 AND d.user_id = $2
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(deck_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    // === Progress Repository ===

    /// Record one study event for (user, card) as a single atomic upsert.
    ///
    /// The UNIQUE (user_id, card_id) constraint plus ON CONFLICT makes
    /// concurrent clicks safe: both requests land on the same row and each
    /// increments the review count once.
    pub async fn record_card_review(
        &self,
        user_id: &str,
        card_id: i32,
        correct: Option<bool>,
    ) -> Result<UserProgress> {
        let correct_inc: i32 = if correct == Some(true) { 1 } else { 0 };
        let incorrect_inc: i32 = if correct == Some(false) { 1 } else { 0 };

        let progress = sqlx::query_as::<_, UserProgress>(
            r#"
            INSERT INTO user_progress (user_id, card_id, review_count, correct_count,
                                       incorrect_count, last_reviewed)
            VALUES ($1, $2, 1, $3, $4, NOW())
            ON CONFLICT (user_id, card_id) DO UPDATE SET
                review_count = user_progress.review_count + 1,
                correct_count = user_progress.correct_count + EXCLUDED.correct_count,
                incorrect_count = user_progress.incorrect_count + EXCLUDED.incorrect_count,
                last_reviewed = NOW(),
                updated_at = NOW()
            RETURNING id, user_id, card_id, difficulty, last_reviewed, next_review,
                      review_count, correct_count, incorrect_count, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(card_id)
        .bind(correct_inc)
        .bind(incorrect_inc)
        .fetch_one(&self.pool)
        .await?;

        Ok(progress)
    }

    /// Get the progress row for (user, card), if any
    pub async fn get_progress(&self, user_id: &str, card_id: i32) -> Result<Option<UserProgress>> {
        let progress = sqlx::query_as::<_, UserProgress>(
            r#"
            SELECT id, user_id, card_id, difficulty, last_reviewed, next_review,
                   review_count, correct_count, incorrect_count, created_at, updated_at
            FROM user_progress
            WHERE user_id = $1 AND card_id = $2
            "#,
        )
        .bind(user_id)
        .bind(card_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(progress)
    }

    // === Dashboard Repository ===

    /// Aggregate counts for a user's dashboard
    pub async fn get_dashboard_stats(&self, user_id: &str) -> Result<DashboardStats> {
        let total_cards: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM cards c
            JOIN decks d ON d.id = c.deck_id
            WHERE d.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let total_decks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM decks WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let total_study_sessions: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_progress WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(correct_count + incorrect_count), 0)::INT8 AS total_reviews,
                   COALESCE(SUM(correct_count), 0)::INT8 AS correct_reviews
            FROM user_progress
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let total_reviews: i64 = row.get("total_reviews");
        let correct_reviews: i64 = row.get("correct_reviews");

        Ok(DashboardStats {
            total_cards,
            total_decks,
            total_study_sessions,
            mastery_rate: mastery_rate(correct_reviews, total_reviews),
        })
    }
}

/// Percentage of total reviews that were correct, rounded; 0 with no reviews
fn mastery_rate(correct: i64, total: i64) -> i32 {
    if total > 0 {
        ((correct as f64 / total as f64) * 100.0).round() as i32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::mastery_rate;

    #[test]
    fn mastery_rate_zero_without_reviews() {
        assert_eq!(mastery_rate(0, 0), 0);
    }

    #[test]
    fn mastery_rate_rounds() {
        assert_eq!(mastery_rate(3, 4), 75);
        assert_eq!(mastery_rate(1, 3), 33);
        assert_eq!(mastery_rate(2, 3), 67);
        assert_eq!(mastery_rate(5, 5), 100);
    }
}
