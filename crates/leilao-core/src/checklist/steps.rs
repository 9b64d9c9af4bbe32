use serde::Serialize;

use super::answers::{
    AnswerField, AuctionType, ChecklistAnswers, Occupancy, AUCTION_TYPE_LABELS, OBJECTIVE_LABELS,
    OCCUPANCY_LABELS, PROPERTY_TYPE_LABELS,
};
use crate::costs::{PaymentMethod, PAYMENT_METHOD_LABELS};
use crate::rates::{RateBounds, DOWN_PAYMENT, REGISTRY_FEE, TRANSFER_TAX};

/// What kind of value a question expects
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "kind", content = "options", rename_all = "snake_case")]
pub enum QuestionKind {
    Text,
    YesNo,
    Choice(&'static [&'static str]),
    Money,
    Percent(RateBounds),
}

/// A single form field of the checklist
#[derive(Clone, Copy, Serialize)]
pub struct Question {
    pub field: AnswerField,
    pub prompt: &'static str,
    pub help: &'static str,
    pub kind: QuestionKind,
    /// Only asked when this returns true for the answers collected so far
    #[serde(skip)]
    pub visible_when: Option<fn(&ChecklistAnswers) -> bool>,
}

impl Question {
    pub fn is_visible(&self, answers: &ChecklistAnswers) -> bool {
        self.visible_when.map_or(true, |f| f(answers))
    }
}

#[derive(Clone, Copy, Serialize)]
pub struct Step {
    pub number: u8,
    pub title: &'static str,
    pub guidance: &'static str,
    pub questions: &'static [Question],
}

const fn ask(
    field: AnswerField,
    prompt: &'static str,
    help: &'static str,
    kind: QuestionKind,
) -> Question {
    Question {
        field,
        prompt,
        help,
        kind,
        visible_when: None,
    }
}

const fn ask_when(
    field: AnswerField,
    prompt: &'static str,
    help: &'static str,
    kind: QuestionKind,
    visible_when: fn(&ChecklistAnswers) -> bool,
) -> Question {
    Question {
        field,
        prompt,
        help,
        kind,
        visible_when: Some(visible_when),
    }
}

fn is_extrajudicial(a: &ChecklistAnswers) -> bool {
    a.auction_type == AuctionType::Extrajudicial
}

fn is_occupied(a: &ChecklistAnswers) -> bool {
    a.occupancy == Occupancy::Occupied
}

fn has_agreement(a: &ChecklistAnswers) -> bool {
    a.has_settlement()
}

fn is_financed(a: &ChecklistAnswers) -> bool {
    matches!(a.payment, PaymentMethod::Financed { .. })
}

use AnswerField as F;
use QuestionKind as K;

pub static STEPS: &[Step] = &[
    Step {
        number: 1,
        title: "Definição de Objetivos e Orçamento",
        guidance: "Defina se a aquisição é para moradia própria, revenda ou locação, e quanto \
                   pode aplicar ao todo (lance, comissão, ITBI, registro, dívidas, reforma).",
        questions: &[
            ask(
                F::BuyerName,
                "Seu nome (Pessoa Física)",
                "Nome completo ou como deseja ser identificado no relatório.",
                K::Text,
            ),
            ask(
                F::Objective,
                "Qual seu principal objetivo?",
                "Escolha a categoria que mais se aproxima do seu propósito.",
                K::Choice(OBJECTIVE_LABELS),
            ),
            ask(
                F::BudgetMax,
                "Orçamento máximo global (R$)",
                "Inclua aqui tudo que você pode gastar, não apenas o lance.",
                K::Money,
            ),
            ask(
                F::FinancingPrechecked,
                "Consultei a instituição financeira / Caixa sobre crédito e financiamento?",
                "Pré-aprovação de crédito, FGTS disponível, score.",
                K::YesNo,
            ),
        ],
    },
    Step {
        number: 2,
        title: "Pesquisa e Análise de Mercado",
        guidance: "Escolha região e tipo de imóvel, visite o local e compare preços com \
                   corretores e portais para não pagar acima do valor de mercado.",
        questions: &[
            ask(
                F::Location,
                "Cidade/Bairro do imóvel (GO)",
                "Ex.: Goiânia, setor, bairro.",
                K::Text,
            ),
            ask(
                F::PropertyType,
                "Tipo de imóvel",
                "Selecione o tipo principal.",
                K::Choice(PROPERTY_TYPE_LABELS),
            ),
            ask(
                F::Visited,
                "Realizei (ou vou realizar) a visita in loco?",
                "Converse com vizinhos, síndico e porteiro sobre pendências.",
                K::YesNo,
            ),
            ask(
                F::ConsultedBrokers,
                "Conversei com corretores e/ou pesquisei valores na região?",
                "Ajuda a comparar com o lance mínimo do leilão.",
                K::YesNo,
            ),
            ask(
                F::MarketValue,
                "Valor de mercado estimado (R$)",
                "Média de preço que você considera justa na região.",
                K::Money,
            ),
            ask(
                F::UnregisteredWorksChecked,
                "Verifiquei se há construções não averbadas?",
                "Ampliações sem registro podem exigir regularização.",
                K::YesNo,
            ),
        ],
    },
    Step {
        number: 3,
        title: "Verificação Documental (Matrícula, Edital, Notificações)",
        guidance: "Leia o edital inteiro, obtenha a certidão de inteiro teor da matrícula e \
                   confirme a notificação do devedor em leilões extrajudiciais.",
        questions: &[
            ask(
                F::AuctionType,
                "Tipo de leilão",
                "Extrajudicial é tipicamente leilão de banco por inadimplência.",
                K::Choice(AUCTION_TYPE_LABELS),
            ),
            ask(
                F::NoticeRead,
                "Li e compreendi o edital do leilão?",
                "Valor mínimo, datas, comissão, dívidas incluídas, desocupação.",
                K::YesNo,
            ),
            ask(
                F::RegistryRecordChecked,
                "Verifiquei a matrícula atualizada e vi se há ônus?",
                "Penhoras, usufrutos, hipotecas, consolidação.",
                K::YesNo,
            ),
            ask_when(
                F::FormerOwnerNotified,
                "Confirmado que o antigo dono foi notificado corretamente?",
                "Falhas na intimação (Lei 9.514/97) podem anular o leilão.",
                K::YesNo,
                is_extrajudicial,
            ),
            ask(
                F::LawsuitsChecked,
                "Consultei processos no TJGO em nome do devedor/proprietário?",
                "Usucapião, falência, inventário, outras penhoras.",
                K::YesNo,
            ),
        ],
    },
    Step {
        number: 4,
        title: "Ocupação do Imóvel",
        guidance: "Imóvel desocupado facilita a posse. Se ocupado, avalie acordo amigável \
                   ou ação de imissão na posse.",
        questions: &[
            ask(
                F::Occupancy,
                "Situação de ocupação",
                "Ocupante pode ser ex-proprietário, inquilino ou invasor.",
                K::Choice(OCCUPANCY_LABELS),
            ),
            ask_when(
                F::AmicableAgreement,
                "Haverá acordo amigável?",
                "Se não, avalie ação de despejo ou desistir do leilão.",
                K::YesNo,
                is_occupied,
            ),
            ask_when(
                F::SettlementAmount,
                "Valor de compensação (R$)",
                "Ex.: 5.000 para mudança.",
                K::Money,
                has_agreement,
            ),
            ask(
                F::LeaseChecked,
                "Verifiquei se há contrato de locação em vigor?",
                "O novo dono pode denunciar a locação em 90 dias.",
                K::YesNo,
            ),
        ],
    },
    Step {
        number: 5,
        title: "Cadastro no Leiloeiro e Participação",
        guidance: "Habilite-se no site do leiloeiro com antecedência e acompanhe possíveis \
                   adiamentos ou suspensões.",
        questions: &[
            ask(
                F::AuctioneerRegistration,
                "Fiz ou vou fazer o cadastro no site do leiloeiro / portal do tribunal?",
                "Sem habilitação não é possível dar lances.",
                K::YesNo,
            ),
            ask(
                F::AuctionDateChecked,
                "Verifiquei a data/hora do leilão?",
                "É comum haver mudança de data se o devedor paga a dívida.",
                K::YesNo,
            ),
        ],
    },
    Step {
        number: 6,
        title: "Forma de Pagamento e Cálculos de Custos",
        guidance: "Informe o lance estimado e a forma de pagamento. A comissão do leiloeiro \
                   é fixa em 5%; ITBI e registro são percentuais do lance.",
        questions: &[
            ask(
                F::BidAmount,
                "Valor estimado de arrematação (R$)",
                "Quanto você imagina que o imóvel será arrematado.",
                K::Money,
            ),
            ask(
                F::PaymentMethod,
                "Forma de pagamento",
                "Verifique no edital se permitem financiamento ou parcelamento.",
                K::Choice(PAYMENT_METHOD_LABELS),
            ),
            ask_when(
                F::DownPaymentPct,
                "Percentual de entrada (Financiamento) (%)",
                "Geralmente 20% a 30% do lance; o restante é financiado.",
                K::Percent(DOWN_PAYMENT),
                is_financed,
            ),
            ask(
                F::TransferTaxPct,
                "Taxa de ITBI (%)",
                "Altere conforme a sua prefeitura, ex.: 2,5%.",
                K::Percent(TRANSFER_TAX),
            ),
            ask(
                F::RegistryPct,
                "Porcentagem de registro em cartório (%)",
                "Ex.: 1,2% do valor do imóvel.",
                K::Percent(REGISTRY_FEE),
            ),
            ask(
                F::PastDebts,
                "Valor estimado de dívidas (R$)",
                "IPTU, condomínio, água. Verifique no edital quem paga.",
                K::Money,
            ),
        ],
    },
    Step {
        number: 7,
        title: "Checagens Pós-Arremate",
        guidance: "Deposite o lance e a comissão no prazo do edital, aguarde a homologação ou \
                   assine a escritura, pague o ITBI e registre o imóvel em cartório.",
        questions: &[],
    },
    Step {
        number: 8,
        title: "Reforma e Revenda",
        guidance: "Planeje itens estruturais, elétrica, hidráulica e acabamentos. Para \
                   revenda, pesquise o preço pós-reforma e o prazo de legalização.",
        questions: &[ask(
            F::RenovationCost,
            "Custo estimado da reforma (R$)",
            "Baseie-se em orçamentos de profissionais confiáveis.",
            K::Money,
        )],
    },
    Step {
        number: 9,
        title: "Resumo Final",
        guidance: "Consolida o subtotal de aquisição e o investimento total (compra + reforma).",
        questions: &[],
    },
    Step {
        number: 10,
        title: "Honorários, Seguros e Verificações Avançadas",
        guidance: "Inclua honorários de advogado e seguro do imóvel durante a obra. Confira \
                   certidões do ex-proprietário e débitos de condomínio não declarados.",
        questions: &[
            ask(
                F::LegalFees,
                "Honorários advocatícios estimados (R$)",
                "Se houver advogado para acompanhar o processo.",
                K::Money,
            ),
            ask(
                F::Insurance,
                "Custo estimado de seguro (R$)",
                "Ex.: seguro residencial básico, anual.",
                K::Money,
            ),
        ],
    },
    Step {
        number: 11,
        title: "Documentos Complementares e Conclusão",
        guidance: "Guarde edital, comprovantes, matrícula atualizada e escritura ou carta de \
                   arrematação. Transfira água, luz e IPTU para seu nome.",
        questions: &[],
    },
];

/// Questions that should be asked given the answers collected so far.
pub fn visible_questions<'a>(
    step: &'a Step,
    answers: &'a ChecklistAnswers,
) -> impl Iterator<Item = &'a Question> + 'a {
    step.questions.iter().filter(move |q| q.is_visible(answers))
}
