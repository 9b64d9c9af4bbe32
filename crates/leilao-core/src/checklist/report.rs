use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Instant;
use tracing::debug;

use super::answers::{AuctionType, ChecklistAnswers, Occupancy};
use super::steps::STEPS;
use crate::costs::{calculate_costs, CostBreakdown};
use crate::format::{format_brl_amount, format_date_br, format_percent};
use crate::rates::COMMISSION_PCT;
use crate::types::*;
use crate::LeilaoResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: String,
    pub lines: Vec<String>,
}

/// Final summary of a completed checklist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistReport {
    /// Report date as dd/mm/yyyy
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_name: Option<String>,
    pub sections: Vec<ReportSection>,
    pub costs: CostBreakdown,
    pub alerts: Vec<String>,
    /// Grand total as "R$ 1.234,56"
    pub final_total: String,
    pub report_text: String,
}

fn brl(value: Money) -> String {
    format!("R$ {}", format_brl_amount(value))
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Sim"
    } else {
        "Não"
    }
}

fn section_title(number: u8) -> String {
    let title = STEPS
        .iter()
        .find(|s| s.number == number)
        .map(|s| s.title)
        .unwrap_or_default();
    format!("PASSO {number}: {title}")
}

/// Build the final report from a completed set of answers.
pub fn build_report(
    answers: &ChecklistAnswers,
) -> LeilaoResult<ComputationOutput<ChecklistReport>> {
    let start = Instant::now();

    let computed = calculate_costs(&answers.cost_input())?;
    let warnings = computed.warnings;
    let costs = computed.result;

    let sections = vec![
        ReportSection {
            title: section_title(1),
            lines: vec![
                format!("Objetivo: {}", answers.objective.label()),
                format!("Orçamento Máximo: {}", brl(answers.budget_max)),
                format!(
                    "Verificou Financiamento previamente? {}",
                    yes_no(answers.financing_prechecked)
                ),
            ],
        },
        ReportSection {
            title: section_title(2),
            lines: vec![
                format!("Local (GO): {}", answers.location),
                format!("Tipo de Imóvel: {}", answers.property_type.label()),
                format!("Visita In Loco? {}", yes_no(answers.visited)),
                format!(
                    "Conversou com corretores/pesquisa online? {}",
                    yes_no(answers.consulted_brokers)
                ),
                format!("Valor de Mercado Estimado: {}", brl(answers.market_value)),
                format!(
                    "Conferiu possíveis ampliações não averbadas? {}",
                    yes_no(answers.unregistered_works_checked)
                ),
            ],
        },
        ReportSection {
            title: section_title(3),
            lines: document_lines(answers),
        },
        ReportSection {
            title: section_title(4),
            lines: occupancy_lines(answers),
        },
        ReportSection {
            title: section_title(5),
            lines: vec![
                format!(
                    "Cadastro no leiloeiro feito? {}",
                    yes_no(answers.auctioneer_registration)
                ),
                format!(
                    "Verificou data/hora do leilão? {}",
                    yes_no(answers.auction_date_checked)
                ),
            ],
        },
        ReportSection {
            title: section_title(6),
            lines: payment_lines(answers, &costs),
        },
        ReportSection {
            title: section_title(7),
            lines: vec![
                "Pagar lance/comissão no prazo, pagar ITBI, registrar o imóvel.".to_string(),
            ],
        },
        ReportSection {
            title: section_title(8),
            lines: vec![format!("Custo de Reforma: {}", brl(costs.renovation_cost))],
        },
        ReportSection {
            title: section_title(9),
            lines: vec![
                format!("Subtotal de Aquisição: {}", brl(costs.acquisition_subtotal)),
                format!(
                    "Investimento Total (Compra + Reforma): {}",
                    brl(costs.investment_total)
                ),
            ],
        },
        ReportSection {
            title: section_title(10),
            lines: vec![
                format!("Honorários advocatícios: {}", brl(answers.legal_fees)),
                format!("Seguro do Imóvel: {}", brl(answers.insurance)),
                format!(
                    "Total Geral (Compra + Reforma + Honorários + Seguro): {}",
                    brl(costs.grand_total)
                ),
            ],
        },
        ReportSection {
            title: section_title(11),
            lines: vec![
                "Guarde todos os comprovantes e documentos (edital, matrícula, recibos de pagamento)."
                    .to_string(),
                "Atualize cadastros de água, luz, IPTU e, se for o caso, disponibilize o imóvel para venda/locação."
                    .to_string(),
            ],
        },
    ];

    let alerts = collect_alerts(answers, &costs);
    let mut report = ChecklistReport {
        date: format_date_br(answers.date),
        buyer_name: answers.buyer_name.clone(),
        sections,
        final_total: brl(costs.grand_total),
        costs,
        alerts,
        report_text: String::new(),
    };
    report.report_text = render_text(&report);

    debug!(
        sections = report.sections.len(),
        alerts = report.alerts.len(),
        "built checklist report"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Auction purchase checklist report",
        &serde_json::json!({
            "auction_type": answers.auction_type.label(),
            "payment_method": answers.payment.label(),
            "bid_amount": answers.bid_amount.to_string(),
        }),
        warnings,
        elapsed,
        report,
    ))
}

fn document_lines(answers: &ChecklistAnswers) -> Vec<String> {
    let mut lines = vec![
        format!("Tipo de Leilão: {}", answers.auction_type.label()),
        format!("Edital lido? {}", yes_no(answers.notice_read)),
        format!(
            "Matrícula verificada? {}",
            yes_no(answers.registry_record_checked)
        ),
    ];
    if answers.auction_type == AuctionType::Extrajudicial {
        lines.push(format!(
            "Antigo dono notificado? {}",
            yes_no(answers.former_owner_notified.unwrap_or(false))
        ));
    }
    lines.push(format!(
        "Pesquisou processos no TJGO? {}",
        yes_no(answers.lawsuits_checked)
    ));
    lines
}

fn occupancy_lines(answers: &ChecklistAnswers) -> Vec<String> {
    let mut lines = vec![format!(
        "Ocupação do Imóvel: {}",
        answers.occupancy.label()
    )];
    if answers.occupancy == Occupancy::Occupied {
        let agreement = answers.amicable_agreement.unwrap_or(false);
        lines.push(format!("  - Acordo amigável? {}", yes_no(agreement)));
        if agreement {
            lines.push(format!(
                "  - Valor de acordo: {}",
                brl(answers.settlement_amount)
            ));
        }
    }
    lines.push(format!(
        "Contrato de locação verificado? {}",
        yes_no(answers.lease_checked)
    ));
    lines
}

fn payment_lines(answers: &ChecklistAnswers, costs: &CostBreakdown) -> Vec<String> {
    let mut lines = vec![
        format!("Valor do Lance: {}", brl(costs.bid_amount)),
        format!("Forma de Pagamento: {}", answers.payment.label()),
    ];
    if let Some(split) = &costs.financing {
        lines.push(format!(
            "  - % de Entrada: {}%",
            format_percent(split.down_payment_pct)
        ));
        lines.push(format!(
            "  - Valor de Entrada (aprox.): {}",
            brl(split.down_payment)
        ));
        lines.push(format!(
            "  - Valor Financiado (aprox.): {}",
            brl(split.financed_amount)
        ));
    }
    lines.push(format!(
        "Comissão do Leiloeiro ({}%): {}",
        format_percent(COMMISSION_PCT),
        brl(costs.commission)
    ));
    lines.push(format!(
        "ITBI ({}%): {}",
        format_percent(costs.transfer_tax_pct),
        brl(costs.transfer_tax)
    ));
    lines.push(format!(
        "Registro em Cartório ({}%): {}",
        format_percent(costs.registry_pct),
        brl(costs.registry_fee)
    ));
    lines.push(format!(
        "Dívidas Passadas (IPTU/condomínio): {}",
        brl(costs.past_debts)
    ));
    if costs.occupant_settlement > Decimal::ZERO {
        lines.push(format!(
            "Valor de Acordo Ocupante: {}",
            brl(costs.occupant_settlement)
        ));
    }
    lines.push(format!(
        "Subtotal de Aquisição: {}",
        brl(costs.acquisition_subtotal)
    ));
    lines
}

fn collect_alerts(answers: &ChecklistAnswers, costs: &CostBreakdown) -> Vec<String> {
    let mut alerts = Vec::new();

    if answers.occupancy == Occupancy::Occupied && answers.amicable_agreement != Some(true) {
        alerts.push(
            "[ALERTA] O ocupante não pretende sair amigavelmente; considere a ação de imissão na posse."
                .to_string(),
        );
    }
    if answers.auction_type == AuctionType::Extrajudicial
        && answers.former_owner_notified != Some(true)
    {
        alerts.push(
            "[ALERTA] Notificação do antigo dono não confirmada; falhas podem anular o leilão."
                .to_string(),
        );
    }
    if answers.budget_max > Decimal::ZERO && costs.grand_total > answers.budget_max {
        alerts.push(format!(
            "[ALERTA] Total geral ({}) excede o orçamento máximo ({}).",
            brl(costs.grand_total),
            brl(answers.budget_max)
        ));
    }

    alerts
}

/// Plain text rendering of a report.
pub fn render_text(report: &ChecklistReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "RELATÓRIO FINAL DO CHECKLIST");
    let _ = writeln!(out, "Data: {}", report.date);
    if let Some(name) = &report.buyer_name {
        let _ = writeln!(out, "Nome do Comprador: {name}");
    }

    for section in &report.sections {
        let _ = writeln!(out);
        let _ = writeln!(out, "### {}", section.title);
        for line in &section.lines {
            if line.starts_with("  ") {
                let _ = writeln!(out, "{line}");
            } else {
                let _ = writeln!(out, "- {line}");
            }
        }
    }

    if !report.alerts.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Alertas:");
        for alert in &report.alerts {
            let _ = writeln!(out, "- {alert}");
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Checklist concluído! Valor Final c/ Honorários e Seguro: {}",
        report.final_total
    );
    out
}
