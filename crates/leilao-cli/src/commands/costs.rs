use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use leilao_core::costs::{self, CostInput, PaymentMethod};
use leilao_core::format::parse_brl;

use crate::config::LeilaoConfig;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PaymentArg {
    /// Full payment at once
    Cash,
    /// Bank financing with a down payment
    Financed,
    /// Court installment plan (CPC art. 895)
    Installments,
}

/// Accept money flags in Brazilian ("300.000,00") or plain ("300000") notation.
pub fn parse_money(s: &str) -> Result<Decimal, String> {
    parse_brl(s).map_err(|e| e.to_string())
}

/// Arguments for the acquisition cost calculation
#[derive(Args)]
pub struct CostsArgs {
    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Expected winning bid
    #[arg(long, value_parser = parse_money)]
    pub bid: Option<Decimal>,

    /// Transfer tax (ITBI) percentage, 1.0–5.0
    #[arg(long)]
    pub transfer_tax_pct: Option<Decimal>,

    /// Registry fee percentage, 0.5–2.0
    #[arg(long)]
    pub registry_pct: Option<Decimal>,

    /// Outstanding IPTU, condominium and utility debts
    #[arg(long, value_parser = parse_money, default_value = "0")]
    pub past_debts: Decimal,

    /// Amount agreed with the occupant to vacate
    #[arg(long, value_parser = parse_money, default_value = "0")]
    pub occupant_settlement: Decimal,

    /// Renovation budget
    #[arg(long, value_parser = parse_money, default_value = "0")]
    pub renovation: Decimal,

    /// Lawyer fees
    #[arg(long, value_parser = parse_money)]
    pub legal_fees: Option<Decimal>,

    /// Property insurance
    #[arg(long, value_parser = parse_money)]
    pub insurance: Option<Decimal>,

    /// Payment method
    #[arg(long, value_enum, default_value = "cash")]
    pub payment: PaymentArg,

    /// Down payment percentage when financing, 5–90
    #[arg(long)]
    pub down_payment_pct: Option<Decimal>,
}

pub fn run_costs(args: CostsArgs, config: &LeilaoConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let rates = config.rates.clamped();

    let cost_input: CostInput = if let Some(data) = input::supplied_document(args.input.as_deref())? {
        serde_json::from_value(data)?
    } else {
        let bid = args.bid.ok_or("--bid is required (or provide --input)")?;

        let payment = match args.payment {
            PaymentArg::Cash => PaymentMethod::Cash,
            PaymentArg::Financed => PaymentMethod::Financed {
                down_payment_pct: args.down_payment_pct.unwrap_or(rates.down_payment_pct),
            },
            PaymentArg::Installments => PaymentMethod::JudicialInstallments,
        };

        CostInput {
            bid_amount: bid,
            transfer_tax_pct: args.transfer_tax_pct.unwrap_or(rates.transfer_tax_pct),
            registry_pct: args.registry_pct.unwrap_or(rates.registry_pct),
            past_debts: args.past_debts,
            occupant_settlement: args.occupant_settlement,
            renovation_cost: args.renovation,
            legal_fees: args.legal_fees,
            insurance: args.insurance,
            payment,
        }
    };

    let result = costs::calculate_costs(&cost_input)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_money_flag() {
        assert_eq!(parse_money("300.000,00").unwrap(), dec!(300000));
        assert_eq!(parse_money("1500").unwrap(), dec!(1500));
        assert!(parse_money("três mil").is_err());
    }
}
