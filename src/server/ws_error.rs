/// Centralized helper for raw WebSocket error frames.
///
/// Used for failures that happen before a frame reaches the lobby (bad JSON,
/// bans, serialization errors). Produces the same shape as `ServerWsMessage::Error`.
use serde_json::Value;

/// Formats a WebSocket error message as a JSON string.
///
/// # Arguments
/// - `code`: Unique error code (e.g. "INVALID_MESSAGE").
/// - `message`: Human-readable error message.
/// - `context`: Optional extra data (e.g. ban duration).
pub fn ws_error_message(code: &str, message: &str, context: Option<Value>) -> String {
    let mut data = serde_json::json!({
        "code": code,
        "message": message,
    });
    if let Some(context) = context {
        data["context"] = context;
    }
    serde_json::json!({ "action": "Error", "data": data }).to_string()
}
