use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::LeilaoError;
use crate::format::format_percent;
use crate::rates::{RateBounds, COMMISSION_PCT, DOWN_PAYMENT, REGISTRY_FEE, TRANSFER_TAX};
use crate::types::*;
use crate::LeilaoResult;

/// How the bid is going to be paid
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Full payment at once (à vista)
    #[default]
    Cash,
    /// Bank financing: an upfront share of the bid plus a financed remainder
    Financed {
        #[serde(default = "default_down_payment_pct")]
        down_payment_pct: Percent,
    },
    /// Court installment plan (CPC art. 895)
    JudicialInstallments,
}

pub const PAYMENT_METHOD_LABELS: &[&str] = &[
    "À Vista",
    "Financiamento Caixa",
    "Parcelamento Judicial (CPC 895)",
];

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => PAYMENT_METHOD_LABELS[0],
            PaymentMethod::Financed { .. } => PAYMENT_METHOD_LABELS[1],
            PaymentMethod::JudicialInstallments => PAYMENT_METHOD_LABELS[2],
        }
    }

    /// Map a position in [`PAYMENT_METHOD_LABELS`] to a method. Financing starts
    /// from `down_payment_pct`.
    pub fn from_index(index: usize, down_payment_pct: Percent) -> Option<Self> {
        match index {
            0 => Some(PaymentMethod::Cash),
            1 => Some(PaymentMethod::Financed { down_payment_pct }),
            2 => Some(PaymentMethod::JudicialInstallments),
            _ => None,
        }
    }
}

/// Inputs to the acquisition cost aggregation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostInput {
    /// Expected winning bid (valor de arrematação)
    pub bid_amount: Money,
    /// Municipal transfer tax (ITBI) as percentage of the bid
    #[serde(default = "default_transfer_tax_pct")]
    pub transfer_tax_pct: Percent,
    /// Registry office fee as percentage of the bid
    #[serde(default = "default_registry_pct")]
    pub registry_pct: Percent,
    /// Outstanding property tax, condominium and utility debts
    #[serde(default)]
    pub past_debts: Money,
    /// Payment agreed with an occupant in exchange for vacating
    #[serde(default)]
    pub occupant_settlement: Money,
    #[serde(default)]
    pub renovation_cost: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_fees: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance: Option<Money>,
    #[serde(default)]
    pub payment: PaymentMethod,
}

fn default_transfer_tax_pct() -> Percent {
    TRANSFER_TAX.default
}

fn default_registry_pct() -> Percent {
    REGISTRY_FEE.default
}

fn default_down_payment_pct() -> Percent {
    DOWN_PAYMENT.default
}

/// Largest amount accepted for any single monetary input. Keeps every derived
/// sum far inside `Decimal`'s range.
pub const MAX_AMOUNT: Money = dec!(1000000000000000);

/// Reject amounts that are negative or above [`MAX_AMOUNT`].
pub fn validate_amount(field: &str, value: Money) -> LeilaoResult<Money> {
    if value < Decimal::ZERO {
        return Err(LeilaoError::InvalidInput {
            field: field.into(),
            reason: "Amount cannot be negative".into(),
        });
    }
    if value > MAX_AMOUNT {
        return Err(LeilaoError::InvalidInput {
            field: field.into(),
            reason: format!("Amount cannot exceed {MAX_AMOUNT}"),
        });
    }
    Ok(value)
}

/// Upfront and financed portions of the bid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingSplit {
    pub down_payment_pct: Percent,
    pub down_payment: Money,
    pub financed_amount: Money,
}

/// Derived line items and totals for one acquisition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Every component in derivation order
    pub line_items: Vec<LineItem>,
    pub bid_amount: Money,
    pub commission: Money,
    /// ITBI rate actually applied
    pub transfer_tax_pct: Percent,
    pub transfer_tax: Money,
    /// Registry rate actually applied
    pub registry_pct: Percent,
    pub registry_fee: Money,
    pub past_debts: Money,
    pub occupant_settlement: Money,
    /// Bid plus every acquisition cost, before renovation
    pub acquisition_subtotal: Money,
    pub renovation_cost: Money,
    /// Acquisition subtotal plus renovation
    pub investment_total: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_fees: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance: Option<Money>,
    /// Investment total plus legal fees and insurance, when given
    pub grand_total: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financing: Option<FinancingSplit>,
}

/// `base × pct / 100`
pub fn percent_of(base: Money, pct: Percent) -> Money {
    base * (pct / dec!(100))
}

/// Split a financed bid into down payment and financed remainder. The
/// remainder is floored at zero.
pub fn financing_split(bid_amount: Money, down_payment_pct: Percent) -> FinancingSplit {
    let down_payment = percent_of(bid_amount, down_payment_pct);
    let financed_amount = (bid_amount - down_payment).max(Decimal::ZERO);
    FinancingSplit {
        down_payment_pct,
        down_payment,
        financed_amount,
    }
}

/// Aggregate acquisition costs. Total over pre-validated input: never fails
/// and performs no rounding.
pub fn aggregate_costs(input: &CostInput) -> CostBreakdown {
    let bid = input.bid_amount;

    let commission = percent_of(bid, COMMISSION_PCT);
    let transfer_tax = percent_of(bid, input.transfer_tax_pct);
    let registry_fee = percent_of(bid, input.registry_pct);

    let acquisition_subtotal =
        bid + commission + transfer_tax + registry_fee + input.past_debts + input.occupant_settlement;
    let investment_total = acquisition_subtotal + input.renovation_cost;
    let grand_total = investment_total
        + input.legal_fees.unwrap_or(Decimal::ZERO)
        + input.insurance.unwrap_or(Decimal::ZERO);

    let financing = match input.payment {
        PaymentMethod::Financed { down_payment_pct } => {
            Some(financing_split(bid, down_payment_pct))
        }
        _ => None,
    };

    let mut line_items = vec![
        LineItem::new("Lance", bid),
        LineItem::new(
            format!("Comissão do Leiloeiro ({}%)", format_percent(COMMISSION_PCT)),
            commission,
        ),
        LineItem::new(
            format!("ITBI ({}%)", format_percent(input.transfer_tax_pct)),
            transfer_tax,
        ),
        LineItem::new(
            format!("Registro em Cartório ({}%)", format_percent(input.registry_pct)),
            registry_fee,
        ),
        LineItem::new("Dívidas Passadas", input.past_debts),
        LineItem::new("Acordo com Ocupante", input.occupant_settlement),
        LineItem::new("Reforma", input.renovation_cost),
    ];
    if let Some(fees) = input.legal_fees {
        line_items.push(LineItem::new("Honorários Advocatícios", fees));
    }
    if let Some(insurance) = input.insurance {
        line_items.push(LineItem::new("Seguro do Imóvel", insurance));
    }

    debug!(%bid, %acquisition_subtotal, %grand_total, "aggregated acquisition costs");

    CostBreakdown {
        line_items,
        bid_amount: bid,
        commission,
        transfer_tax_pct: input.transfer_tax_pct,
        transfer_tax,
        registry_pct: input.registry_pct,
        registry_fee,
        past_debts: input.past_debts,
        occupant_settlement: input.occupant_settlement,
        acquisition_subtotal,
        renovation_cost: input.renovation_cost,
        investment_total,
        legal_fees: input.legal_fees,
        insurance: input.insurance,
        grand_total,
        financing,
    }
}

/// Validate and normalise raw form input, then aggregate.
///
/// Negative amounts and amounts above [`MAX_AMOUNT`] are rejected.
/// Percentages outside their bounds are clamped, with one warning per clamped
/// rate.
pub fn calculate_costs(input: &CostInput) -> LeilaoResult<ComputationOutput<CostBreakdown>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let amounts = [
        ("bid_amount", Some(input.bid_amount)),
        ("past_debts", Some(input.past_debts)),
        ("occupant_settlement", Some(input.occupant_settlement)),
        ("renovation_cost", Some(input.renovation_cost)),
        ("legal_fees", input.legal_fees),
        ("insurance", input.insurance),
    ];
    for (field, amount) in amounts {
        if let Some(v) = amount {
            validate_amount(field, v)?;
        }
    }

    let mut sanitized = input.clone();
    sanitized.transfer_tax_pct =
        clamp_rate("transfer_tax_pct", input.transfer_tax_pct, &TRANSFER_TAX, &mut warnings);
    sanitized.registry_pct =
        clamp_rate("registry_pct", input.registry_pct, &REGISTRY_FEE, &mut warnings);
    if let PaymentMethod::Financed { down_payment_pct } = input.payment {
        sanitized.payment = PaymentMethod::Financed {
            down_payment_pct: clamp_rate(
                "down_payment_pct",
                down_payment_pct,
                &DOWN_PAYMENT,
                &mut warnings,
            ),
        };
    }

    let output = aggregate_costs(&sanitized);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Auction acquisition cost aggregation",
        &serde_json::json!({
            "bid_amount": sanitized.bid_amount.to_string(),
            "commission_pct": COMMISSION_PCT.to_string(),
            "transfer_tax_pct": sanitized.transfer_tax_pct.to_string(),
            "registry_pct": sanitized.registry_pct.to_string(),
            "payment_method": sanitized.payment.label(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn clamp_rate(
    field: &str,
    pct: Percent,
    bounds: &RateBounds,
    warnings: &mut Vec<String>,
) -> Percent {
    let clamped = bounds.clamp(pct);
    if clamped != pct {
        warn!(field, %pct, %clamped, "rate outside bounds, clamped");
        warnings.push(format!(
            "{field} {pct}% outside [{}%, {}%], clamped to {clamped}%",
            bounds.min, bounds.max
        ));
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base_input() -> CostInput {
        CostInput {
            bid_amount: dec!(300000),
            transfer_tax_pct: dec!(2.5),
            registry_pct: dec!(1.2),
            past_debts: dec!(5000),
            occupant_settlement: Decimal::ZERO,
            renovation_cost: dec!(20000),
            legal_fees: None,
            insurance: None,
            payment: PaymentMethod::Cash,
        }
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(dec!(300000), dec!(2.5)), dec!(7500));
        assert_eq!(percent_of(dec!(0), dec!(90)), dec!(0));
        assert_eq!(percent_of(dec!(1000), dec!(0)), dec!(0));
    }

    #[test]
    fn test_reference_scenario() {
        let out = aggregate_costs(&base_input());
        assert_eq!(out.commission, dec!(15000));
        assert_eq!(out.transfer_tax, dec!(7500));
        assert_eq!(out.registry_fee, dec!(3600));
        assert_eq!(out.acquisition_subtotal, dec!(331100));
        assert_eq!(out.investment_total, dec!(351100));
        assert_eq!(out.grand_total, dec!(351100));
        assert!(out.financing.is_none());
    }

    #[test]
    fn test_grand_total_includes_legal_fees_and_insurance() {
        let mut input = base_input();
        input.legal_fees = Some(dec!(8000));
        input.insurance = Some(dec!(1200));
        let out = aggregate_costs(&input);
        assert_eq!(out.investment_total, dec!(351100));
        assert_eq!(out.grand_total, dec!(360300));
    }

    #[test]
    fn test_financed_split() {
        let input = CostInput {
            bid_amount: dec!(200000),
            payment: PaymentMethod::Financed {
                down_payment_pct: dec!(25),
            },
            ..base_input()
        };
        let split = aggregate_costs(&input).financing.unwrap();
        assert_eq!(split.down_payment, dec!(50000));
        assert_eq!(split.financed_amount, dec!(150000));
    }

    #[test]
    fn test_financed_amount_never_negative() {
        let split = financing_split(dec!(100), dec!(150));
        assert_eq!(split.financed_amount, Decimal::ZERO);
    }

    #[test]
    fn test_line_item_order() {
        let out = aggregate_costs(&base_input());
        let labels: Vec<&str> = out.line_items.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Lance",
                "Comissão do Leiloeiro (5.0%)",
                "ITBI (2.5%)",
                "Registro em Cartório (1.2%)",
                "Dívidas Passadas",
                "Acordo com Ocupante",
                "Reforma",
            ]
        );
    }

    #[test]
    fn test_calculate_costs_clamps_rates_with_warnings() {
        let mut input = base_input();
        input.transfer_tax_pct = dec!(8);
        input.payment = PaymentMethod::Financed {
            down_payment_pct: dec!(1),
        };
        let result = calculate_costs(&input).unwrap();
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.result.transfer_tax, dec!(15000));
        assert_eq!(
            result.result.financing.unwrap().down_payment_pct,
            dec!(5)
        );
    }

    #[test]
    fn test_breakdown_carries_applied_rates() {
        let mut input = base_input();
        input.registry_pct = dec!(0.1);
        let out = calculate_costs(&input).unwrap().result;
        assert_eq!(out.registry_pct, dec!(0.5));
        assert_eq!(out.registry_fee, dec!(1500));
        assert_eq!(out.transfer_tax_pct, dec!(2.5));
    }

    #[test]
    fn test_calculate_costs_rejects_amount_above_ceiling() {
        let mut input = base_input();
        input.bid_amount = Decimal::MAX;
        match calculate_costs(&input) {
            Err(LeilaoError::InvalidInput { field, .. }) => assert_eq!(field, "bid_amount"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }

        input.bid_amount = MAX_AMOUNT;
        input.renovation_cost = MAX_AMOUNT;
        input.legal_fees = Some(MAX_AMOUNT);
        assert!(calculate_costs(&input).is_ok());
    }

    #[test]
    fn test_financed_without_pct_uses_default() {
        let method: PaymentMethod = serde_json::from_str(r#"{"method": "financed"}"#).unwrap();
        assert_eq!(
            method,
            PaymentMethod::Financed {
                down_payment_pct: dec!(25)
            }
        );
    }

    #[test]
    fn test_calculate_costs_rejects_negative_amount() {
        let mut input = base_input();
        input.past_debts = dec!(-1);
        match calculate_costs(&input) {
            Err(LeilaoError::InvalidInput { field, .. }) => assert_eq!(field, "past_debts"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}
