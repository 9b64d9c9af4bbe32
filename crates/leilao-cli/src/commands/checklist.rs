use clap::Args;
use serde_json::Value;
use std::io;
use tracing::info;

use leilao_core::checklist::{build_report, ChecklistAnswers};
use leilao_core::rates::RateDefaults;

use crate::config::LeilaoConfig;
use crate::input;
use crate::prompt::Questionnaire;

/// Arguments for the checklist report
#[derive(Args)]
pub struct ChecklistArgs {
    /// Path to a JSON or YAML file with previously collected answers
    #[arg(long)]
    pub input: Option<String>,

    /// Ask every question on the terminal even when stdin is not a TTY
    #[arg(long, conflicts_with = "input")]
    pub interactive: bool,
}

pub fn run_checklist(
    args: ChecklistArgs,
    config: &LeilaoConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let rates = config.rates.clamped();

    let supplied = if args.interactive {
        None
    } else {
        input::supplied_document(args.input.as_deref())?
    };

    let answers = match supplied {
        Some(data) => answers_from_json(data, rates)?,
        None => {
            info!("no answers supplied, starting interactive checklist");
            let stdin = io::stdin();
            let stderr = io::stderr();
            Questionnaire::new(stdin.lock(), stderr.lock(), rates).run()?
        }
    };

    let report = build_report(&answers)?;
    Ok(serde_json::to_value(report)?)
}

/// Overlay supplied answers on blank answers seeded with the configured rates,
/// so omitted rates follow the configuration rather than the built-in defaults.
fn answers_from_json(
    supplied: Value,
    rates: RateDefaults,
) -> Result<ChecklistAnswers, Box<dyn std::error::Error>> {
    let mut merged = serde_json::to_value(ChecklistAnswers::with_rates(rates))?;
    match (&mut merged, supplied) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                base.insert(key, value);
            }
        }
        (_, other) => {
            return Err(format!("Checklist answers must be a JSON object, got {other}").into())
        }
    }
    Ok(serde_json::from_value(merged)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_configured_rates_fill_omitted_fields() {
        let rates = RateDefaults {
            transfer_tax_pct: dec!(3),
            ..RateDefaults::default()
        };
        let answers =
            answers_from_json(json!({"bid_amount": 100000, "registry_pct": 1.5}), rates).unwrap();
        assert_eq!(answers.transfer_tax_pct, dec!(3));
        assert_eq!(answers.registry_pct, dec!(1.5));
        assert_eq!(answers.bid_amount, dec!(100000));
    }

    #[test]
    fn test_non_object_answers_rejected() {
        assert!(answers_from_json(json!([1, 2]), RateDefaults::default()).is_err());
    }
}
