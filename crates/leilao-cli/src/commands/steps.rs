use clap::Args;
use serde_json::{json, Value};

use leilao_core::checklist::STEPS;

/// Arguments for listing the checklist steps
#[derive(Args)]
pub struct StepsArgs {
    /// Include every question with its kind and help text
    #[arg(long)]
    pub questions: bool,
}

pub fn run_steps(args: StepsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.questions {
        return Ok(serde_json::to_value(STEPS)?);
    }

    let rows: Vec<Value> = STEPS
        .iter()
        .map(|s| {
            json!({
                "step": s.number,
                "title": s.title,
                "questions": s.questions.len(),
            })
        })
        .collect();
    Ok(Value::Array(rows))
}
