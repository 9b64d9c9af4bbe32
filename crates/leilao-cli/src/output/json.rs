use serde_json::Value;
use tracing::error;

/// Pretty-print JSON to stdout.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => error!(%e, "JSON serialization error"),
    }
}
