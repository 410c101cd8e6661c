//! Test fixtures and factory functions for creating test data.

use serde_json::json;
use uuid::Uuid;

/// Create a deck creation request body.
pub fn create_deck_request(name: &str, description: Option<&str>) -> serde_json::Value {
    match description {
        Some(d) => json!({ "name": name, "description": d }),
        None => json!({ "name": name }),
    }
}

/// Create a deck update request body from optional fields.
pub fn update_deck_request(
    name: Option<&str>,
    is_public: Option<bool>,
) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    if let Some(n) = name {
        obj.insert("name".to_string(), json!(n));
    }
    if let Some(p) = is_public {
        obj.insert("isPublic".to_string(), json!(p));
    }
    serde_json::Value::Object(obj)
}

/// Create a card creation request body.
pub fn create_card_request(deck_id: i64, front: &str, back: &str) -> serde_json::Value {
    json!({ "deckId": deck_id, "front": front, "back": back })
}

/// Create a study progress request body.
pub fn progress_request(card_id: i64, correct: Option<bool>) -> serde_json::Value {
    match correct {
        Some(c) => json!({ "cardId": card_id, "correct": c }),
        None => json!({ "cardId": card_id }),
    }
}

/// Generate a unique test deck name to avoid collisions.
pub fn unique_deck_name(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().to_string()[..8])
}
