use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::debug;

use leilao_core::checklist::{AnswerField, AnswerValue, ChecklistAnswers, Question, QuestionKind, STEPS};
use leilao_core::format::{
    format_brl_amount, format_date_br, format_percent, parse_brl, parse_date_br,
};
use leilao_core::costs::MAX_AMOUNT;
use leilao_core::rates::{RateBounds, RateDefaults};

/// Terminal driver for the checklist: asks every visible question in step
/// order and fills a [`ChecklistAnswers`].
///
/// An empty line (or end of input) accepts the question's default.
pub struct Questionnaire<R, W> {
    reader: R,
    writer: W,
    rates: RateDefaults,
}

impl<R: BufRead, W: Write> Questionnaire<R, W> {
    pub fn new(reader: R, writer: W, rates: RateDefaults) -> Self {
        Self {
            reader,
            writer,
            rates: rates.clamped(),
        }
    }

    pub fn run(mut self) -> Result<ChecklistAnswers, Box<dyn std::error::Error>> {
        let mut answers = ChecklistAnswers::with_rates(self.rates);
        self.ask_date(&mut answers)?;

        for step in STEPS {
            writeln!(self.writer)?;
            writeln!(self.writer, "=== PASSO {}: {} ===", step.number, step.title)?;
            writeln!(self.writer, "{}", step.guidance)?;

            for question in step.questions {
                if !question.is_visible(&answers) {
                    continue;
                }
                let value = self.ask(question, &answers)?;
                debug!(field = ?question.field, ?value, "answered");
                answers.apply(question.field, value)?;
            }
        }

        self.writer.flush()?;
        Ok(answers)
    }

    fn ask(
        &mut self,
        question: &Question,
        answers: &ChecklistAnswers,
    ) -> Result<AnswerValue, Box<dyn std::error::Error>> {
        let default = self.default_answer(question, answers);

        loop {
            self.write_prompt(question, &default)?;

            let line = match self.read_line()? {
                Some(line) if !line.is_empty() => line,
                _ => return Ok(default),
            };

            match parse_answer(&question.kind, &line) {
                Ok(value) => return Ok(value),
                Err(msg) => writeln!(self.writer, "  {msg}")?,
            }
        }
    }

    /// Report date, day first. Defaults to the date already on `answers`.
    fn ask_date(&mut self, answers: &mut ChecklistAnswers) -> Result<(), Box<dyn std::error::Error>> {
        loop {
            writeln!(self.writer)?;
            write!(
                self.writer,
                "Data do relatório (dd/mm/aaaa) [{}] > ",
                format_date_br(answers.date)
            )?;
            self.writer.flush()?;

            let line = match self.read_line()? {
                Some(line) if !line.is_empty() => line,
                _ => return Ok(()),
            };
            match parse_date_br(&line) {
                Ok(date) => {
                    answers.date = date;
                    return Ok(());
                }
                Err(_) => writeln!(self.writer, "  Data inválida: '{line}'. Ex.: 05/03/2024")?,
            }
        }
    }

    fn write_prompt(
        &mut self,
        question: &Question,
        default: &AnswerValue,
    ) -> std::io::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", question.prompt)?;
        writeln!(self.writer, "  ({})", question.help)?;
        if let QuestionKind::Choice(labels) = question.kind {
            for (i, label) in labels.iter().enumerate() {
                writeln!(self.writer, "  {}) {}", i + 1, label)?;
            }
        }
        match describe_default(&question.kind, default) {
            Some(d) => write!(self.writer, "[{d}] > ")?,
            None => write!(self.writer, "> ")?,
        }
        self.writer.flush()
    }

    fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim().to_string()))
    }

    fn default_answer(&self, question: &Question, answers: &ChecklistAnswers) -> AnswerValue {
        match question.kind {
            QuestionKind::Text => AnswerValue::Text(String::new()),
            QuestionKind::YesNo => AnswerValue::Flag(false),
            QuestionKind::Choice(_) => AnswerValue::Choice(0),
            QuestionKind::Money => AnswerValue::Amount(Decimal::ZERO),
            QuestionKind::Percent(bounds) => AnswerValue::Percent(match question.field {
                AnswerField::TransferTaxPct => answers.transfer_tax_pct,
                AnswerField::RegistryPct => answers.registry_pct,
                AnswerField::DownPaymentPct => self.rates.down_payment_pct,
                _ => bounds.default,
            }),
        }
    }
}

fn describe_default(kind: &QuestionKind, default: &AnswerValue) -> Option<String> {
    match (kind, default) {
        (QuestionKind::YesNo, AnswerValue::Flag(b)) => {
            Some(if *b { "S/n" } else { "s/N" }.to_string())
        }
        (QuestionKind::Choice(labels), AnswerValue::Choice(i)) => {
            labels.get(*i).map(|l| format!("{} - {}", i + 1, l))
        }
        (QuestionKind::Money, AnswerValue::Amount(v)) => Some(format!("R$ {}", format_brl_amount(*v))),
        (QuestionKind::Percent(b), AnswerValue::Percent(p)) => Some(format!(
            "{}% ({}–{})",
            format_percent(*p),
            format_percent(b.min),
            format_percent(b.max)
        )),
        _ => None,
    }
}

/// Parse one typed line for a question of the given kind. The error is the
/// message shown before asking again.
pub fn parse_answer(kind: &QuestionKind, line: &str) -> Result<AnswerValue, String> {
    match kind {
        QuestionKind::Text => Ok(AnswerValue::Text(line.to_string())),
        QuestionKind::YesNo => parse_yes_no(line).map(AnswerValue::Flag),
        QuestionKind::Choice(labels) => parse_choice(labels, line).map(AnswerValue::Choice),
        QuestionKind::Money => {
            let v = parse_brl(line).map_err(|_| format!("Valor inválido: '{line}'. Ex.: 150.000,00"))?;
            if v < Decimal::ZERO {
                return Err("O valor mínimo é 0.".to_string());
            }
            if v > MAX_AMOUNT {
                return Err(format!("O valor máximo é {}.", format_brl_amount(MAX_AMOUNT)));
            }
            Ok(AnswerValue::Amount(v))
        }
        QuestionKind::Percent(bounds) => parse_percent(bounds, line).map(AnswerValue::Percent),
    }
}

fn parse_yes_no(line: &str) -> Result<bool, String> {
    match line.to_lowercase().as_str() {
        "s" | "sim" | "y" | "yes" => Ok(true),
        "n" | "não" | "nao" | "no" => Ok(false),
        _ => Err("Responda s (sim) ou n (não).".to_string()),
    }
}

fn parse_choice(labels: &[&str], line: &str) -> Result<usize, String> {
    if let Ok(n) = line.parse::<usize>() {
        if (1..=labels.len()).contains(&n) {
            return Ok(n - 1);
        }
    }
    let wanted = line.to_lowercase();
    labels
        .iter()
        .position(|l| l.to_lowercase() == wanted)
        .ok_or_else(|| format!("Escolha um número de 1 a {}.", labels.len()))
}

fn parse_percent(bounds: &RateBounds, line: &str) -> Result<Decimal, String> {
    let cleaned = line.trim_end_matches('%').trim().replace(',', ".");
    let pct = Decimal::from_str(&cleaned).map_err(|_| format!("Percentual inválido: '{line}'."))?;
    if !bounds.contains(pct) {
        return Err(format!(
            "Informe um valor entre {} e {}.",
            format_percent(bounds.min),
            format_percent(bounds.max)
        ));
    }
    Ok(pct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use leilao_core::checklist::answers::{AuctionType, Objective, Occupancy, PropertyType};
    use leilao_core::costs::PaymentMethod;
    use leilao_core::rates::TRANSFER_TAX;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    fn run_script(script: &str, rates: RateDefaults) -> (ChecklistAnswers, String) {
        let mut out = Vec::new();
        let answers = Questionnaire::new(Cursor::new(script.as_bytes()), &mut out, rates)
            .run()
            .unwrap();
        (answers, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_full_walk_through() {
        let script = [
            // Report date
            "",
            // Step 1: name, objective, budget, financing pre-check
            "Ana", "3", "400.000", "s",
            // Step 2: location, type, visit, brokers, market value, works
            "Goiânia", "", "s", "n", "450000", "n",
            // Step 3: auction type, notice, record, notified, lawsuits
            "2", "s", "s", "s", "s",
            // Step 4: occupancy, agreement, settlement, lease
            "2", "s", "5.000,00", "n",
            // Step 5
            "s", "s",
            // Step 6: bid, payment, down payment, ITBI, registry, debts
            "300000", "2", "30", "", "", "5000",
            // Step 8
            "20000",
            // Step 10: legal fees, insurance
            "0", "",
        ]
        .join("\n");

        let (a, _) = run_script(&script, RateDefaults::default());

        assert_eq!(a.buyer_name.as_deref(), Some("Ana"));
        assert_eq!(a.objective, Objective::Resale);
        assert_eq!(a.budget_max, dec!(400000));
        assert_eq!(a.property_type, PropertyType::House);
        assert_eq!(a.market_value, dec!(450000));
        assert_eq!(a.auction_type, AuctionType::Extrajudicial);
        assert_eq!(a.former_owner_notified, Some(true));
        assert_eq!(a.occupancy, Occupancy::Occupied);
        assert_eq!(a.settlement_amount, dec!(5000));
        assert_eq!(a.bid_amount, dec!(300000));
        assert_eq!(
            a.payment,
            PaymentMethod::Financed {
                down_payment_pct: dec!(30)
            }
        );
        assert_eq!(a.transfer_tax_pct, dec!(2.5));
        assert_eq!(a.registry_pct, dec!(1.2));
        assert_eq!(a.past_debts, dec!(5000));
        assert_eq!(a.renovation_cost, dec!(20000));
    }

    #[test]
    fn test_empty_input_takes_defaults() {
        let (a, out) = run_script("", RateDefaults::default());
        assert_eq!(a.bid_amount, Decimal::ZERO);
        assert_eq!(a.payment, PaymentMethod::Cash);
        assert_eq!(a.occupancy, Occupancy::Vacant);
        assert_eq!(a.former_owner_notified, None);
        assert!(out.contains("=== PASSO 11: Documentos Complementares e Conclusão ==="));
        // Conditional questions stay hidden
        assert!(!out.contains("Haverá acordo amigável?"));
    }

    #[test]
    fn test_invalid_answer_asks_again() {
        let script = "\n\n\n\ntalvez\ns\n";
        let (a, out) = run_script(script, RateDefaults::default());
        assert!(a.financing_prechecked);
        assert!(out.contains("Responda s (sim) ou n (não)."));
    }

    #[test]
    fn test_report_date_is_asked_first() {
        let (a, out) = run_script("20/01/2025\n", RateDefaults::default());
        assert_eq!(format_date_br(a.date), "20/01/2025");
        assert!(out.trim_start().starts_with("Data do relatório (dd/mm/aaaa) ["));

        let (a, out) = run_script("2025-01-20\n05/03/2024\n", RateDefaults::default());
        assert_eq!(format_date_br(a.date), "05/03/2024");
        assert!(out.contains("Data inválida: '2025-01-20'."));
    }

    #[test]
    fn test_configured_rate_is_default() {
        let rates = RateDefaults {
            transfer_tax_pct: dec!(3),
            ..RateDefaults::default()
        };
        let (a, out) = run_script("", rates);
        assert_eq!(a.transfer_tax_pct, dec!(3));
        assert!(out.contains("[3.0% (1.0–5.0)] > "));
    }

    #[test]
    fn test_parse_answer_kinds() {
        assert_eq!(
            parse_answer(&QuestionKind::Money, "R$ 1.234,56"),
            Ok(AnswerValue::Amount(dec!(1234.56)))
        );
        assert!(parse_answer(&QuestionKind::Money, "-5").is_err());
        assert_eq!(
            parse_answer(&QuestionKind::Money, "75000000000000000000000000000"),
            Err("O valor máximo é 1.000.000.000.000.000,00.".to_string())
        );
        assert_eq!(
            parse_answer(&QuestionKind::Choice(&["Judicial", "Extrajudicial"]), "extrajudicial"),
            Ok(AnswerValue::Choice(1))
        );
        assert!(parse_answer(&QuestionKind::Choice(&["Judicial"]), "4").is_err());
        assert_eq!(
            parse_answer(&QuestionKind::Percent(TRANSFER_TAX), "3,5%"),
            Ok(AnswerValue::Percent(dec!(3.5)))
        );
        assert!(parse_answer(&QuestionKind::Percent(TRANSFER_TAX), "7").is_err());
        assert_eq!(
            parse_answer(&QuestionKind::YesNo, "Não"),
            Ok(AnswerValue::Flag(false))
        );
    }
}
