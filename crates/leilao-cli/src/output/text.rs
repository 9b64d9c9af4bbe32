use serde_json::Value;

use super::table;

/// Print the rendered report text when the output carries one; anything
/// else falls back to a table.
pub fn print_text(value: &Value) {
    match value
        .get("result")
        .and_then(|r| r.get("report_text"))
        .and_then(Value::as_str)
    {
        Some(text) => {
            print!("{text}");
            print_warnings(value);
        }
        None => table::print_table(value),
    }
}

fn print_warnings(value: &Value) {
    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nAvisos:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }
}
