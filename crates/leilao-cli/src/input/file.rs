use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Load an answers or cost-input document. `.yaml`/`.yml` files are read as
/// YAML, anything else as JSON.
pub fn read_document(path: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let file = resolve_path(path)?;
    let contents = fs::read_to_string(&file)
        .map_err(|e| format!("Failed to read '{}': {}", file.display(), e))?;
    parse_document(&contents, &file)
}

fn parse_document(contents: &str, file: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let is_yaml = file
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let value = if is_yaml {
        serde_yaml::from_str(contents)
            .map_err(|e| format!("Failed to parse '{}': {}", file.display(), e))?
    } else {
        serde_json::from_str(contents)
            .map_err(|e| format!("Failed to parse '{}': {}", file.display(), e))?
    };
    Ok(value)
}

/// Relative paths are taken from the working directory. The target must be
/// an existing regular file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let file = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !file.is_file() {
        let reason = if file.exists() { "Not a file" } else { "File not found" };
        return Err(format!("{reason}: {}", file.display()).into());
    }
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_yaml_answers_document() {
        let value = parse_document(
            "bid_amount: 300000\noccupancy: occupied\n",
            Path::new("respostas.yml"),
        )
        .unwrap();
        assert_eq!(value, json!({"bid_amount": 300000, "occupancy": "occupied"}));
    }

    #[test]
    fn test_json_is_the_fallback() {
        let value = parse_document(r#"{"bid_amount": 1}"#, Path::new("input.txt")).unwrap();
        assert_eq!(value["bid_amount"], 1);
        assert!(parse_document("bid_amount: 1", Path::new("input.json")).is_err());
    }

    #[test]
    fn test_directory_is_rejected() {
        let dir = std::env::temp_dir();
        let err = read_document(&dir.display().to_string()).unwrap_err();
        assert!(err.to_string().starts_with("Not a file"));
        assert!(read_document("/nonexistent/respostas.json").is_err());
    }
}
