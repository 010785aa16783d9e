//! API handlers.

use serde::Serialize;
use serde_json::Value;

pub mod assessments;
pub mod attendance;
pub mod auth;
pub mod batches;
pub mod health;
pub mod reviews;
pub mod trainees;
pub mod trainers;

/// Bare success acknowledgement.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Always `"success"`.
    pub status: &'static str,
}

impl StatusResponse {
    /// The success acknowledgement.
    #[must_use]
    pub fn success() -> Self {
        Self { status: "success" }
    }
}

/// Text form of a JSON scalar as it is stored in a cell.
///
/// Clients send capacities and scores as numbers; cells hold strings.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A stored cell as JSON: a number when it reads as an integer, otherwise
/// the string itself.
pub(crate) fn cell_json(text: &str) -> Value {
    text.trim()
        .parse::<i64>()
        .map_or_else(|_| Value::String(text.to_string()), Value::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_become_cell_text() {
        assert_eq!(scalar_text(&json!(85)), "85");
        assert_eq!(scalar_text(&json!(92.5)), "92.5");
        assert_eq!(scalar_text(&json!("A")), "A");
        assert_eq!(scalar_text(&Value::Null), "");
    }

    #[test]
    fn integer_cells_become_numbers() {
        assert_eq!(cell_json("30"), json!(30));
        assert_eq!(cell_json("thirty"), json!("thirty"));
        assert_eq!(cell_json(""), json!(""));
    }
}
