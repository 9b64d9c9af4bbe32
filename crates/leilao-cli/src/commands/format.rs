use clap::Args;
use serde_json::{json, Value};

use leilao_core::format::{format_brl, parse_brl};

/// Arguments for formatting a value as BRL currency text
#[derive(Args)]
pub struct FormatArgs {
    /// Amount to format; omitted renders an empty string
    pub value: Option<String>,
}

pub fn run_format_brl(args: FormatArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let value = args.value.as_deref().map(parse_brl).transpose()?;
    Ok(json!({
        "result": {
            "value": value.map(|v| v.to_string()),
            "formatted": format_brl(value),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        let out = run_format_brl(FormatArgs {
            value: Some("1234567.89".into()),
        })
        .unwrap();
        assert_eq!(out["result"]["formatted"], "1.234.567,89");
    }

    #[test]
    fn test_format_missing_value() {
        let out = run_format_brl(FormatArgs { value: None }).unwrap();
        assert_eq!(out["result"]["formatted"], "");
        assert!(out["result"]["value"].is_null());
    }
}
