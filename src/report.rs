use crate::models::{ContextItem, EvaluationReport};
use serde::Serialize;
use serde_json::Value;

/// Display text longer than this is truncated in the context table.
pub const DISPLAY_TEXT_LIMIT: usize = 100;

/// Sentinel shown when a context item carries no source URL.
pub const NO_SOURCE_URL: &str = "N/A";

/// One row of the fixed three-row scores table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoreRow {
    pub metric: &'static str,
    /// Verbatim service score, never rounded.
    pub score: f64,
}

/// Hallucination section content: a positive indicator or the service's
/// rows in their original order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum HallucinationView {
    NoneDetected,
    Items(Vec<String>),
}

/// Retrieved-context section content.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum ContextTable {
    Empty,
    Ranked(Vec<ContextRow>),
}

/// One row of the ranked-context table, pre-formatted for display.
/// Truncation is display-only: `item` keeps the untruncated text and URL
/// for the full-details view.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContextRow {
    /// 1-based, in the service's rank order
    pub rank: usize,
    pub similarity: String,
    pub source_url: String,
    pub display_text: String,
    pub item: ContextItem,
}

/// One collapsible explanation entry.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExplanationEntry {
    pub title: String,
    pub body: String,
}

/// Report sections in their fixed rendering order (scores first, raw body
/// last). Renderers must not reorder or interleave them.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum ReportSection {
    Scores { rows: Vec<ScoreRow> },
    GeneratedResponse { text: String },
    /// Collapsible: must be retrievable but need not be rendered eagerly.
    Prompt { text: String },
    Metrics { latency: String, cost: String },
    Hallucinations { view: HallucinationView },
    RetrievedContext { table: ContextTable },
    /// Present only when the service returned at least one explanation.
    Explanations { entries: Vec<ExplanationEntry> },
    /// Complete, unmodified response body, retrievable on demand.
    RawResponse { body: Value },
}

/// Transform a verdict into the ordered section list. Deterministic and
/// pure given the report; `raw` is the unmodified response body.
pub fn assemble(report: &EvaluationReport, raw: &Value) -> Vec<ReportSection> {
    let mut sections = vec![
        ReportSection::Scores {
            rows: vec![
                ScoreRow { metric: "Relevance", score: report.relevance_score },
                ScoreRow { metric: "Completeness", score: report.completeness_score },
                ScoreRow { metric: "Accuracy", score: report.accuracy_score },
            ],
        },
        ReportSection::GeneratedResponse {
            text: report.generated_response.clone(),
        },
        ReportSection::Prompt {
            text: report.prompt_used.clone(),
        },
        ReportSection::Metrics {
            latency: format!("{:.2} ms", report.latency_ms),
            cost: format!("${:.4}", report.cost_usd),
        },
        ReportSection::Hallucinations {
            view: hallucination_view(&report.hallucinations),
        },
        ReportSection::RetrievedContext {
            table: context_table(&report.retrieved_context),
        },
    ];

    if !report.explanations.is_empty() {
        sections.push(ReportSection::Explanations {
            entries: explanation_entries(report),
        });
    }

    sections.push(ReportSection::RawResponse { body: raw.clone() });
    sections
}

fn hallucination_view(hallucinations: &[String]) -> HallucinationView {
    if hallucinations.is_empty() {
        HallucinationView::NoneDetected
    } else {
        HallucinationView::Items(hallucinations.to_vec())
    }
}

fn context_table(items: &[ContextItem]) -> ContextTable {
    if items.is_empty() {
        return ContextTable::Empty;
    }

    let rows = items
        .iter()
        .enumerate()
        .map(|(i, item)| ContextRow {
            rank: i + 1,
            similarity: format!("{:.4}", item.similarity_score),
            source_url: item
                .source_url
                .clone()
                .unwrap_or_else(|| NO_SOURCE_URL.to_string()),
            display_text: truncate_display(&item.text),
            item: item.clone(),
        })
        .collect();

    ContextTable::Ranked(rows)
}

/// Explanations come as an unordered mapping; sort by key so assembly is
/// deterministic.
fn explanation_entries(report: &EvaluationReport) -> Vec<ExplanationEntry> {
    let mut keys: Vec<&String> = report.explanations.keys().collect();
    keys.sort();

    keys.into_iter()
        .map(|key| ExplanationEntry {
            title: title_case(key),
            body: report.explanations[key].clone(),
        })
        .collect()
}

/// First 100 characters plus an ellipsis marker; shorter text is untouched.
fn truncate_display(text: &str) -> String {
    if text.chars().count() > DISPLAY_TEXT_LIMIT {
        let cut: String = text.chars().take(DISPLAY_TEXT_LIMIT).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// "context_relevance" -> "Context Relevance".
fn title_case(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
