//! Declarative input validation for create/update operations.
//!
//! Every mutation payload is validated here before the query layer is
//! touched; a failure surfaces as HTTP 400 without mutating state.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ApiError, Result};

/// Input for creating a deck.
///
/// `user_id` is filled in server-side from the authenticated caller, never
/// trusted from the request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeckInput {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    #[validate(length(min = 1, message = "User ID is required"))]
    pub user_id: String,
}

/// Input for updating a deck; only supplied fields are touched
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeckInput {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

/// Input for creating a card
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardInput {
    #[validate(range(min = 1, message = "Deck ID is required"))]
    pub deck_id: i32,
    #[validate(length(min = 1, message = "Front content is required"))]
    pub front: String,
    #[validate(length(min = 1, message = "Back content is required"))]
    pub back: String,
}

/// Input for updating a card; only supplied fields are touched
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardInput {
    #[validate(length(min = 1, message = "Front content is required"))]
    pub front: Option<String>,
    #[validate(length(min = 1, message = "Back content is required"))]
    pub back: Option<String>,
}

/// Guard for id path/body parameters on update and delete operations
pub fn require_positive_id(id: i32, what: &str) -> Result<()> {
    if id < 1 {
        return Err(ApiError::BadRequest(format!("Invalid {} ID", what)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn create_deck_rejects_empty_name() {
        let input = CreateDeckInput {
            name: String::new(),
            description: None,
            is_public: false,
            user_id: "u1".to_string(),
        };
        let err = input.validate().unwrap_err();
        assert!(err.field_errors().contains_key("name"));
    }

    #[test]
    fn create_deck_rejects_overlong_name() {
        let input = CreateDeckInput {
            name: "x".repeat(256),
            description: None,
            is_public: false,
            user_id: "u1".to_string(),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn create_deck_rejects_missing_user() {
        let input = CreateDeckInput {
            name: "Spanish".to_string(),
            description: None,
            is_public: false,
            user_id: String::new(),
        };
        let err = input.validate().unwrap_err();
        assert!(err.field_errors().contains_key("user_id"));
    }

    #[test]
    fn create_deck_accepts_valid_input_and_defaults_is_public() {
        let input: CreateDeckInput =
            serde_json::from_value(json!({ "name": "Spanish", "userId": "u1" })).unwrap();
        assert!(input.validate().is_ok());
        assert_eq!(input.is_public, false);
        assert_eq!(input.description, None);
    }

    #[test]
    fn update_deck_accepts_partial_input() {
        let input: UpdateDeckInput = serde_json::from_value(json!({ "isPublic": true })).unwrap();
        assert!(input.validate().is_ok());
        assert_eq!(input.name, None);
        assert_eq!(input.is_public, Some(true));
    }

    #[test]
    fn update_deck_rejects_empty_name_when_present() {
        let input: UpdateDeckInput = serde_json::from_value(json!({ "name": "" })).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn create_card_rejects_nonpositive_deck_id() {
        let input = CreateCardInput {
            deck_id: 0,
            front: "Q".to_string(),
            back: "A".to_string(),
        };
        let err = input.validate().unwrap_err();
        assert!(err.field_errors().contains_key("deck_id"));
    }

    #[test]
    fn create_card_rejects_empty_sides() {
        let input = CreateCardInput {
            deck_id: 1,
            front: String::new(),
            back: String::new(),
        };
        let err = input.validate().unwrap_err();
        assert!(err.field_errors().contains_key("front"));
        assert!(err.field_errors().contains_key("back"));
    }

    #[test]
    fn update_card_allows_single_side() {
        let input: UpdateCardInput =
            serde_json::from_value(json!({ "front": "New front" })).unwrap();
        assert!(input.validate().is_ok());
        assert_eq!(input.back, None);
    }

    #[test]
    fn positive_id_guard() {
        assert!(require_positive_id(1, "deck").is_ok());
        assert!(require_positive_id(0, "deck").is_err());
        assert!(require_positive_id(-5, "card").is_err());
    }
}
