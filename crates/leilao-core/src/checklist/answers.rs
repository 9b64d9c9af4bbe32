use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::costs::{validate_amount, CostInput, PaymentMethod};
use crate::error::LeilaoError;
use crate::rates::{RateDefaults, DOWN_PAYMENT, REGISTRY_FEE, TRANSFER_TAX};
use crate::types::{Money, Percent};
use crate::LeilaoResult;

/// Main purpose of the purchase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    #[default]
    Unspecified,
    OwnResidence,
    Resale,
    Rental,
    Other,
}

pub const OBJECTIVE_LABELS: &[&str] = &[
    "(Selecione)",
    "Moradia Própria",
    "Investimento (Revenda)",
    "Investimento (Locação)",
    "Outros",
];

impl Objective {
    const ALL: [Objective; 5] = [
        Objective::Unspecified,
        Objective::OwnResidence,
        Objective::Resale,
        Objective::Rental,
        Objective::Other,
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[default]
    House,
    Apartment,
    Land,
    Other,
}

pub const PROPERTY_TYPE_LABELS: &[&str] = &["Casa", "Apartamento", "Lote/Terreno", "Outros"];

impl PropertyType {
    const ALL: [PropertyType; 4] = [
        PropertyType::House,
        PropertyType::Apartment,
        PropertyType::Land,
        PropertyType::Other,
    ];
}

/// Judicial (court-ordered, CPC art. 879+) or extrajudicial (fiduciary
/// foreclosure by a bank, Lei 9.514/97)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionType {
    #[default]
    Judicial,
    Extrajudicial,
}

pub const AUCTION_TYPE_LABELS: &[&str] = &["Judicial", "Extrajudicial"];

impl AuctionType {
    const ALL: [AuctionType; 2] = [AuctionType::Judicial, AuctionType::Extrajudicial];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupancy {
    #[default]
    Vacant,
    Occupied,
}

pub const OCCUPANCY_LABELS: &[&str] = &["Desocupado", "Ocupado"];

impl Occupancy {
    const ALL: [Occupancy; 2] = [Occupancy::Vacant, Occupancy::Occupied];
}

macro_rules! labelled {
    ($ty:ty, $labels:ident) => {
        impl $ty {
            pub fn label(&self) -> &'static str {
                let idx = Self::ALL.iter().position(|v| v == self).unwrap_or(0);
                $labels[idx]
            }

            pub fn from_index(index: usize) -> Option<Self> {
                Self::ALL.get(index).copied()
            }
        }
    };
}

labelled!(Objective, OBJECTIVE_LABELS);
labelled!(PropertyType, PROPERTY_TYPE_LABELS);
labelled!(AuctionType, AUCTION_TYPE_LABELS);
labelled!(Occupancy, OCCUPANCY_LABELS);

/// Identifies which answer a checklist question fills in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerField {
    BuyerName,
    Objective,
    BudgetMax,
    FinancingPrechecked,
    Location,
    PropertyType,
    Visited,
    ConsultedBrokers,
    MarketValue,
    UnregisteredWorksChecked,
    AuctionType,
    NoticeRead,
    RegistryRecordChecked,
    FormerOwnerNotified,
    LawsuitsChecked,
    Occupancy,
    AmicableAgreement,
    SettlementAmount,
    LeaseChecked,
    AuctioneerRegistration,
    AuctionDateChecked,
    BidAmount,
    PaymentMethod,
    DownPaymentPct,
    TransferTaxPct,
    RegistryPct,
    PastDebts,
    RenovationCost,
    LegalFees,
    Insurance,
}

/// A parsed answer to one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerValue {
    Text(String),
    Flag(bool),
    Choice(usize),
    Amount(Money),
    Percent(Percent),
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Every answer collected by the checklist. Passed by value into report
/// generation; omitted JSON fields take their form defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecklistAnswers {
    pub buyer_name: Option<String>,
    pub date: NaiveDate,

    // Step 1
    pub objective: Objective,
    pub budget_max: Money,
    pub financing_prechecked: bool,

    // Step 2
    pub location: String,
    pub property_type: PropertyType,
    pub visited: bool,
    pub consulted_brokers: bool,
    pub market_value: Money,
    pub unregistered_works_checked: bool,

    // Step 3
    pub auction_type: AuctionType,
    pub notice_read: bool,
    pub registry_record_checked: bool,
    /// Only asked for extrajudicial auctions
    pub former_owner_notified: Option<bool>,
    pub lawsuits_checked: bool,

    // Step 4
    pub occupancy: Occupancy,
    /// Only asked when occupied
    pub amicable_agreement: Option<bool>,
    pub settlement_amount: Money,
    pub lease_checked: bool,

    // Step 5
    pub auctioneer_registration: bool,
    pub auction_date_checked: bool,

    // Step 6
    pub bid_amount: Money,
    pub payment: PaymentMethod,
    pub transfer_tax_pct: Percent,
    pub registry_pct: Percent,
    pub past_debts: Money,

    // Step 8
    pub renovation_cost: Money,

    // Step 10
    pub legal_fees: Money,
    pub insurance: Money,
}

impl Default for ChecklistAnswers {
    fn default() -> Self {
        Self::with_rates(RateDefaults::default())
    }
}

impl ChecklistAnswers {
    /// Blank answers whose adjustable rates start from `rates`.
    pub fn with_rates(rates: RateDefaults) -> Self {
        let rates = rates.clamped();
        Self {
            buyer_name: None,
            date: today(),
            objective: Objective::default(),
            budget_max: Decimal::ZERO,
            financing_prechecked: false,
            location: String::new(),
            property_type: PropertyType::default(),
            visited: false,
            consulted_brokers: false,
            market_value: Decimal::ZERO,
            unregistered_works_checked: false,
            auction_type: AuctionType::default(),
            notice_read: false,
            registry_record_checked: false,
            former_owner_notified: None,
            lawsuits_checked: false,
            occupancy: Occupancy::default(),
            amicable_agreement: None,
            settlement_amount: Decimal::ZERO,
            lease_checked: false,
            auctioneer_registration: false,
            auction_date_checked: false,
            bid_amount: Decimal::ZERO,
            payment: PaymentMethod::default(),
            transfer_tax_pct: rates.transfer_tax_pct,
            registry_pct: rates.registry_pct,
            past_debts: Decimal::ZERO,
            renovation_cost: Decimal::ZERO,
            legal_fees: Decimal::ZERO,
            insurance: Decimal::ZERO,
        }
    }

    /// True when the occupant agreed to leave in exchange for a settlement.
    pub fn has_settlement(&self) -> bool {
        self.occupancy == Occupancy::Occupied && self.amicable_agreement == Some(true)
    }

    /// Down-payment share currently selected, or the form default.
    pub fn down_payment_pct(&self) -> Percent {
        match self.payment {
            PaymentMethod::Financed { down_payment_pct } => down_payment_pct,
            _ => DOWN_PAYMENT.default,
        }
    }

    /// Set one field from a parsed answer.
    pub fn apply(&mut self, field: AnswerField, value: AnswerValue) -> LeilaoResult<()> {
        use AnswerField as F;
        use AnswerValue as V;

        match (field, value) {
            (F::BuyerName, V::Text(s)) => {
                let s = s.trim().to_string();
                self.buyer_name = if s.is_empty() { None } else { Some(s) };
            }
            (F::Location, V::Text(s)) => self.location = s.trim().to_string(),

            (F::Objective, V::Choice(i)) => self.objective = choice(field, Objective::from_index(i))?,
            (F::PropertyType, V::Choice(i)) => {
                self.property_type = choice(field, PropertyType::from_index(i))?
            }
            (F::AuctionType, V::Choice(i)) => {
                self.auction_type = choice(field, AuctionType::from_index(i))?
            }
            (F::Occupancy, V::Choice(i)) => self.occupancy = choice(field, Occupancy::from_index(i))?,
            (F::PaymentMethod, V::Choice(i)) => {
                let pct = self.down_payment_pct();
                self.payment = choice(field, PaymentMethod::from_index(i, pct))?;
            }

            (F::FinancingPrechecked, V::Flag(b)) => self.financing_prechecked = b,
            (F::Visited, V::Flag(b)) => self.visited = b,
            (F::ConsultedBrokers, V::Flag(b)) => self.consulted_brokers = b,
            (F::UnregisteredWorksChecked, V::Flag(b)) => self.unregistered_works_checked = b,
            (F::NoticeRead, V::Flag(b)) => self.notice_read = b,
            (F::RegistryRecordChecked, V::Flag(b)) => self.registry_record_checked = b,
            (F::FormerOwnerNotified, V::Flag(b)) => self.former_owner_notified = Some(b),
            (F::LawsuitsChecked, V::Flag(b)) => self.lawsuits_checked = b,
            (F::AmicableAgreement, V::Flag(b)) => self.amicable_agreement = Some(b),
            (F::LeaseChecked, V::Flag(b)) => self.lease_checked = b,
            (F::AuctioneerRegistration, V::Flag(b)) => self.auctioneer_registration = b,
            (F::AuctionDateChecked, V::Flag(b)) => self.auction_date_checked = b,

            (F::BudgetMax, V::Amount(v)) => self.budget_max = amount(field, v)?,
            (F::MarketValue, V::Amount(v)) => self.market_value = amount(field, v)?,
            (F::SettlementAmount, V::Amount(v)) => self.settlement_amount = amount(field, v)?,
            (F::BidAmount, V::Amount(v)) => self.bid_amount = amount(field, v)?,
            (F::PastDebts, V::Amount(v)) => self.past_debts = amount(field, v)?,
            (F::RenovationCost, V::Amount(v)) => self.renovation_cost = amount(field, v)?,
            (F::LegalFees, V::Amount(v)) => self.legal_fees = amount(field, v)?,
            (F::Insurance, V::Amount(v)) => self.insurance = amount(field, v)?,

            (F::DownPaymentPct, V::Percent(p)) => {
                self.payment = PaymentMethod::Financed {
                    down_payment_pct: DOWN_PAYMENT.clamp(p),
                }
            }
            (F::TransferTaxPct, V::Percent(p)) => self.transfer_tax_pct = TRANSFER_TAX.clamp(p),
            (F::RegistryPct, V::Percent(p)) => self.registry_pct = REGISTRY_FEE.clamp(p),

            (field, value) => {
                return Err(LeilaoError::InvalidInput {
                    field: format!("{field:?}"),
                    reason: format!("Unexpected answer {value:?}"),
                })
            }
        }
        Ok(())
    }

    /// Aggregator input derived from these answers. The settlement only
    /// counts when the property is occupied and an agreement exists.
    pub fn cost_input(&self) -> CostInput {
        CostInput {
            bid_amount: self.bid_amount,
            transfer_tax_pct: self.transfer_tax_pct,
            registry_pct: self.registry_pct,
            past_debts: self.past_debts,
            occupant_settlement: if self.has_settlement() {
                self.settlement_amount
            } else {
                Decimal::ZERO
            },
            renovation_cost: self.renovation_cost,
            legal_fees: Some(self.legal_fees),
            insurance: Some(self.insurance),
            payment: self.payment,
        }
    }
}

fn choice<T>(field: AnswerField, value: Option<T>) -> LeilaoResult<T> {
    value.ok_or_else(|| LeilaoError::InvalidInput {
        field: format!("{field:?}"),
        reason: "Option out of range".into(),
    })
}

fn amount(field: AnswerField, value: Money) -> LeilaoResult<Money> {
    validate_amount(&format!("{field:?}"), value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_labels_follow_index() {
        assert_eq!(Objective::from_index(2), Some(Objective::Resale));
        assert_eq!(Objective::Resale.label(), "Investimento (Revenda)");
        assert_eq!(Occupancy::Occupied.label(), "Ocupado");
        assert_eq!(PropertyType::from_index(9), None);
    }

    #[test]
    fn test_settlement_ignored_when_vacant() {
        let mut a = ChecklistAnswers::default();
        a.amicable_agreement = Some(true);
        a.settlement_amount = dec!(5000);
        assert_eq!(a.cost_input().occupant_settlement, Decimal::ZERO);

        a.occupancy = Occupancy::Occupied;
        assert_eq!(a.cost_input().occupant_settlement, dec!(5000));

        a.amicable_agreement = Some(false);
        assert_eq!(a.cost_input().occupant_settlement, Decimal::ZERO);
    }

    #[test]
    fn test_apply_payment_then_down_payment() {
        let mut a = ChecklistAnswers::default();
        a.apply(AnswerField::PaymentMethod, AnswerValue::Choice(1)).unwrap();
        assert_eq!(
            a.payment,
            PaymentMethod::Financed {
                down_payment_pct: dec!(25)
            }
        );
        a.apply(AnswerField::DownPaymentPct, AnswerValue::Percent(dec!(30)))
            .unwrap();
        assert_eq!(a.down_payment_pct(), dec!(30));
    }

    #[test]
    fn test_apply_rejects_mismatched_value() {
        let mut a = ChecklistAnswers::default();
        assert!(a
            .apply(AnswerField::BidAmount, AnswerValue::Flag(true))
            .is_err());
        assert!(a
            .apply(AnswerField::BidAmount, AnswerValue::Amount(dec!(-10)))
            .is_err());
        assert!(a
            .apply(AnswerField::Occupancy, AnswerValue::Choice(7))
            .is_err());
        assert!(a
            .apply(AnswerField::BidAmount, AnswerValue::Amount(Decimal::MAX))
            .is_err());
    }

    #[test]
    fn test_apply_clamps_rates() {
        let mut a = ChecklistAnswers::default();
        a.apply(AnswerField::TransferTaxPct, AnswerValue::Percent(dec!(8)))
            .unwrap();
        a.apply(AnswerField::RegistryPct, AnswerValue::Percent(dec!(0.1)))
            .unwrap();
        assert_eq!(a.transfer_tax_pct, dec!(5));
        assert_eq!(a.registry_pct, dec!(0.5));
    }

    #[test]
    fn test_blank_buyer_name_is_none() {
        let mut a = ChecklistAnswers::default();
        a.apply(AnswerField::BuyerName, AnswerValue::Text("   ".into()))
            .unwrap();
        assert_eq!(a.buyer_name, None);
    }

    #[test]
    fn test_deserialize_partial_json() {
        let a: ChecklistAnswers = serde_json::from_str(
            r#"{"bid_amount": 200000, "occupancy": "occupied",
                "payment": {"method": "financed", "down_payment_pct": 20}}"#,
        )
        .unwrap();
        assert_eq!(a.bid_amount, dec!(200000));
        assert_eq!(a.occupancy, Occupancy::Occupied);
        assert_eq!(a.transfer_tax_pct, dec!(2.5));
        assert_eq!(a.down_payment_pct(), dec!(20));
    }
}
