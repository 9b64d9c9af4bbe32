use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::error::LeilaoError;
use crate::types::{Money, Percent};
use crate::LeilaoResult;

const DATE_BR: &str = "%d/%m/%Y";

/// Placeholder for the decimal point while the thousands separators are swapped.
const SENTINEL: char = 'X';

/// Format a monetary value in the Brazilian style: `1234567.89` -> `"1.234.567,89"`.
///
/// Always two decimal digits, rounded half away from zero. A missing value
/// renders as an empty string.
pub fn format_brl(value: Option<Money>) -> String {
    match value {
        Some(v) => format_brl_amount(v),
        None => String::new(),
    }
}

/// Non-optional form of [`format_brl`].
pub fn format_brl_amount(value: Money) -> String {
    swap_separators(&format_grouped(value))
}

/// Two decimals, comma thousands, period decimal: `"1,234,567.89"`.
fn format_grouped(value: Money) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(plain.len() + digits.len() / 3 + 1);
    if negative {
        grouped.push('-');
    }
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    grouped.push('.');
    grouped.push_str(frac_part);
    grouped
}

fn swap_separators(grouped: &str) -> String {
    grouped
        .replace('.', &SENTINEL.to_string())
        .replace(',', ".")
        .replace(SENTINEL, ",")
}

/// Render a percentage the way the report prints rates: `2.5`, `25.0`, `1.2`.
pub fn format_percent(pct: Percent) -> String {
    let normalized = pct.normalize();
    if normalized.scale() == 0 {
        format!("{normalized}.0")
    } else {
        normalized.to_string()
    }
}

/// Parse a typed monetary amount. Accepts Brazilian notation (`"1.234,56"`,
/// `"R$ 300.000"`) as well as plain decimals (`"1234.56"`).
pub fn parse_brl(input: &str) -> LeilaoResult<Money> {
    let cleaned: String = input
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(LeilaoError::InvalidInput {
            field: "amount".into(),
            reason: "Empty monetary value".into(),
        });
    }

    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else if is_thousands_grouped(&cleaned) {
        cleaned.replace('.', "")
    } else {
        cleaned
    };

    Decimal::from_str(&normalized).map_err(|e| LeilaoError::InvalidInput {
        field: "amount".into(),
        reason: format!("'{}' is not a monetary value: {e}", input.trim()),
    })
}

/// `2024-03-05` -> `"05/03/2024"`
pub fn format_date_br(date: NaiveDate) -> String {
    date.format(DATE_BR).to_string()
}

/// Parse a day-first date such as `"05/03/2024"`.
pub fn parse_date_br(input: &str) -> LeilaoResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_BR).map_err(|e| LeilaoError::InvalidInput {
        field: "date".into(),
        reason: format!("'{}' is not a dd/mm/yyyy date: {e}", input.trim()),
    })
}

/// `"300.000"` and `"1.234.567"` use periods as thousands separators;
/// `"1.5"` and `"1234.56"` do not.
fn is_thousands_grouped(s: &str) -> bool {
    let mut groups = s.trim_start_matches('-').split('.');
    let head = groups.next().unwrap_or_default();
    let rest: Vec<&str> = groups.collect();

    !rest.is_empty()
        && !head.is_empty()
        && head.len() <= 3
        && rest
            .iter()
            .all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_millions() {
        assert_eq!(format_brl(Some(dec!(1234567.89))), "1.234.567,89");
    }

    #[test]
    fn test_format_zero() {
        assert_eq!(format_brl(Some(Decimal::ZERO)), "0,00");
    }

    #[test]
    fn test_format_none_is_empty() {
        assert_eq!(format_brl(None), "");
    }

    #[test]
    fn test_format_small_values() {
        assert_eq!(format_brl_amount(dec!(5)), "5,00");
        assert_eq!(format_brl_amount(dec!(999.5)), "999,50");
        assert_eq!(format_brl_amount(dec!(1000)), "1.000,00");
        assert_eq!(format_brl_amount(dec!(120000)), "120.000,00");
    }

    #[test]
    fn test_format_rounds_half_away_from_zero() {
        assert_eq!(format_brl_amount(dec!(2.675)), "2,68");
        assert_eq!(format_brl_amount(dec!(0.004)), "0,00");
        assert_eq!(format_brl_amount(dec!(999999.995)), "1.000.000,00");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_brl_amount(dec!(-1500.5)), "-1.500,50");
        assert_eq!(format_brl_amount(dec!(-0.001)), "0,00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(2.5)), "2.5");
        assert_eq!(format_percent(dec!(25)), "25.0");
        assert_eq!(format_percent(dec!(1.20)), "1.2");
    }

    #[test]
    fn test_parse_brazilian_notation() {
        assert_eq!(parse_brl("1.234,56").unwrap(), dec!(1234.56));
        assert_eq!(parse_brl("R$ 300.000").unwrap(), dec!(300000));
        assert_eq!(parse_brl("600.822.115,84").unwrap(), dec!(600822115.84));
        assert_eq!(parse_brl("5000,5").unwrap(), dec!(5000.5));
    }

    #[test]
    fn test_parse_plain_decimal() {
        assert_eq!(parse_brl("1234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_brl("1.5").unwrap(), dec!(1.5));
        assert_eq!(parse_brl(" 20000 ").unwrap(), dec!(20000));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_brl("").is_err());
        assert!(parse_brl("R$").is_err());
        assert!(parse_brl("abc").is_err());
    }

    #[test]
    fn test_date_round_trip_day_first() {
        let date = parse_date_br(" 05/03/2024 ").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(format_date_br(date), "05/03/2024");
        assert!(parse_date_br("2024-03-05").is_err());
        assert!(parse_date_br("31/02/2024").is_err());
    }
}
