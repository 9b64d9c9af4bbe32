use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use leilao_core::rates::RateDefaults;

/// Optional settings file (`--config`), YAML or JSON by extension.
///
/// ```yaml
/// rates:
///   transfer_tax_pct: 3.0
///   registry_pct: 1.0
///   down_payment_pct: 20
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LeilaoConfig {
    pub rates: RateDefaults,
}

pub fn load(path: Option<&str>) -> Result<LeilaoConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(LeilaoConfig::default());
    };

    let p = Path::new(path);
    let contents = fs::read_to_string(p)
        .map_err(|e| format!("Failed to read config '{}': {}", p.display(), e))?;

    let config = parse(&contents, p)?;
    debug!(path = %p.display(), ?config, "loaded configuration");
    Ok(config)
}

fn parse(contents: &str, p: &Path) -> Result<LeilaoConfig, Box<dyn std::error::Error>> {
    let is_json = p
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let config = if is_json {
        serde_json::from_str(contents)
            .map_err(|e| format!("Failed to parse '{}': {}", p.display(), e))?
    } else {
        serde_yaml::from_str(contents)
            .map_err(|e| format!("Failed to parse '{}': {}", p.display(), e))?
    };
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_yaml_partial_rates() {
        let cfg = parse("rates:\n  transfer_tax_pct: 3.0\n", Path::new("leilao.yaml")).unwrap();
        assert_eq!(cfg.rates.transfer_tax_pct, dec!(3));
        assert_eq!(cfg.rates.registry_pct, dec!(1.2));
    }

    #[test]
    fn test_json_config() {
        let cfg = parse(
            r#"{"rates": {"down_payment_pct": 30}}"#,
            Path::new("leilao.json"),
        )
        .unwrap();
        assert_eq!(cfg.rates.down_payment_pct, dec!(30));
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(load(Some("/nonexistent/leilao.yaml")).is_err());
        assert!(load(None).is_ok());
    }
}
