use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Percent;

/// Auctioneer commission, fixed at 5% of the bid regardless of jurisdiction.
pub const COMMISSION_PCT: Percent = dec!(5);

/// Closed interval a percentage input is allowed to take, plus its starting
/// value and increment on the form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateBounds {
    pub min: Percent,
    pub max: Percent,
    pub default: Percent,
    pub step: Percent,
}

/// Municipal transfer tax (ITBI)
pub const TRANSFER_TAX: RateBounds = RateBounds {
    min: dec!(1.0),
    max: dec!(5.0),
    default: dec!(2.5),
    step: dec!(0.5),
};

/// Registry office (cartório) fee
pub const REGISTRY_FEE: RateBounds = RateBounds {
    min: dec!(0.5),
    max: dec!(2.0),
    default: dec!(1.2),
    step: dec!(0.1),
};

/// Down-payment share of the bid when financing
pub const DOWN_PAYMENT: RateBounds = RateBounds {
    min: dec!(5.0),
    max: dec!(90.0),
    default: dec!(25.0),
    step: dec!(5.0),
};

impl RateBounds {
    pub fn contains(&self, pct: Percent) -> bool {
        pct >= self.min && pct <= self.max
    }

    pub fn clamp(&self, pct: Percent) -> Percent {
        pct.max(self.min).min(self.max)
    }
}

/// Starting values for the adjustable rates. Loaded from configuration by the
/// CLI; always clamped into the declared bounds before use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateDefaults {
    pub transfer_tax_pct: Percent,
    pub registry_pct: Percent,
    pub down_payment_pct: Percent,
}

impl Default for RateDefaults {
    fn default() -> Self {
        Self {
            transfer_tax_pct: TRANSFER_TAX.default,
            registry_pct: REGISTRY_FEE.default,
            down_payment_pct: DOWN_PAYMENT.default,
        }
    }
}

impl RateDefaults {
    pub fn clamped(self) -> Self {
        Self {
            transfer_tax_pct: TRANSFER_TAX.clamp(self.transfer_tax_pct),
            registry_pct: REGISTRY_FEE.clamp(self.registry_pct),
            down_payment_pct: DOWN_PAYMENT.clamp(self.down_payment_pct),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_below_min() {
        assert_eq!(TRANSFER_TAX.clamp(dec!(0.2)), dec!(1.0));
    }

    #[test]
    fn test_clamp_above_max() {
        assert_eq!(REGISTRY_FEE.clamp(dec!(3)), dec!(2.0));
        assert_eq!(DOWN_PAYMENT.clamp(dec!(100)), dec!(90));
    }

    #[test]
    fn test_clamp_inside_bounds_is_identity() {
        assert_eq!(TRANSFER_TAX.clamp(dec!(3.5)), dec!(3.5));
        assert!(TRANSFER_TAX.contains(dec!(3.5)));
        assert!(!TRANSFER_TAX.contains(dec!(5.5)));
    }

    #[test]
    fn test_defaults_inside_bounds() {
        let d = RateDefaults::default();
        assert_eq!(d, d.clamped());
        assert_eq!(d.transfer_tax_pct, dec!(2.5));
        assert_eq!(d.registry_pct, dec!(1.2));
        assert_eq!(d.down_payment_pct, dec!(25));
    }

    #[test]
    fn test_configured_defaults_clamped() {
        let d = RateDefaults {
            transfer_tax_pct: dec!(9),
            registry_pct: dec!(0),
            down_payment_pct: dec!(50),
        }
        .clamped();
        assert_eq!(d.transfer_tax_pct, dec!(5));
        assert_eq!(d.registry_pct, dec!(0.5));
        assert_eq!(d.down_payment_pct, dec!(50));
    }
}
