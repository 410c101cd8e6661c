//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up the test environment with a database
//! - Helper functions for creating test data
//! - Authentication helpers
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL).

pub mod fixtures;

use std::sync::Arc;

use axum::Router;

use flashdecks::db::Database;
use flashdecks::{app, AppState};

/// Test context containing database connection and test router.
///
/// Use this to set up integration tests with a real database connection.
/// Requires the DATABASE_URL environment variable to be set.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations().await.expect("Failed to run migrations");

        let db = Arc::new(db);
        let app = app(AppState { db: db.clone() });

        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test user and return its id and token.
    pub async fn create_test_user(&self) -> (String, String) {
        let user = self
            .db
            .create_user(Some("Test User"), Some("test@example.com"))
            .await
            .expect("Failed to create test user");
        (user.id, user.token)
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Clean up test data for a user.
    ///
    /// Call this after tests to remove test data.
    pub async fn cleanup_user(&self, user_id: &str) {
        // Progress rows first, then cards via their decks, then the decks
        let _ = sqlx::query("DELETE FROM user_progress WHERE user_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query(
            "DELETE FROM cards WHERE deck_id IN (SELECT id FROM decks WHERE user_id = $1)",
        )
        .bind(user_id)
        .execute(self.db.pool())
        .await;

        let _ = sqlx::query("DELETE FROM decks WHERE user_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }
}
