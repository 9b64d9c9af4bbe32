use serde_json::Value;
use std::io::{self, Read};
use tracing::debug;

/// Document piped on stdin, if any. A terminal stdin yields `None` so the
/// caller can fall back to flags or interactive prompts.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped(buffer: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    debug!(bytes = trimmed.len(), "read piped document from stdin");
    let value = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse JSON from stdin: {e}"))?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_pipe_is_no_input() {
        assert!(parse_piped("  \n").unwrap().is_none());
    }

    #[test]
    fn test_piped_json() {
        let value = parse_piped("{\"bid_amount\": \"300000\"}\n").unwrap().unwrap();
        assert_eq!(value["bid_amount"], "300000");
    }

    #[test]
    fn test_bad_pipe_names_stdin() {
        let err = parse_piped("bid_amount=1").unwrap_err();
        assert!(err.to_string().contains("stdin"));
    }
}
