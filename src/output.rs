use crate::report::{ContextTable, HallucinationView, ReportSection};
use clap::ValueEnum;

/// Indicator shown when the service detected no hallucinations.
pub const NO_HALLUCINATIONS: &str = "No hallucinations detected";

/// Indicator shown when the service returned no context passages.
pub const NO_CONTEXT: &str = "No context retrieved";

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

/// Print the assembled report in the specified format.
pub fn print_report(sections: &[ReportSection], format: OutputFormat) {
    match format {
        OutputFormat::Plain => print_plain(sections),
        OutputFormat::Json => print_json(sections),
    }
}

/// Print sections in plain text, in their fixed order.
fn print_plain(sections: &[ReportSection]) {
    println!("=== Evaluation Report ===");

    for section in sections {
        match section {
            ReportSection::Scores { rows } => {
                heading("EVALUATION SCORES");
                println!("{:<15} {:<10}", "Metric", "Score (1-10)");
                println!("{}", "-".repeat(27));
                for row in rows {
                    println!("{:<15} {}", row.metric, row.score);
                }
            }
            ReportSection::GeneratedResponse { text } => {
                heading("GENERATED RESPONSE");
                println!("{}", text);
            }
            ReportSection::Prompt { text } => {
                heading("PROMPT USED FOR GENERATION");
                println!("{}", text);
            }
            ReportSection::Metrics { latency, cost } => {
                heading("PERFORMANCE METRICS");
                println!("{:<15} {}", "Latency", latency);
                println!("{:<15} {}", "Cost", cost);
            }
            ReportSection::Hallucinations { view } => {
                heading("DETECTED HALLUCINATIONS");
                match view {
                    HallucinationView::NoneDetected => println!("{}", NO_HALLUCINATIONS),
                    HallucinationView::Items(rows) => {
                        for (i, row) in rows.iter().enumerate() {
                            println!("{}. {}", i + 1, row);
                        }
                    }
                }
            }
            ReportSection::RetrievedContext { table } => {
                heading("RETRIEVED CONTEXT (RANKED BY SIMILARITY)");
                match table {
                    ContextTable::Empty => println!("{}", NO_CONTEXT),
                    ContextTable::Ranked(rows) => {
                        for row in rows {
                            println!(
                                "#{:<3} {:<8} {:<30} {}",
                                row.rank, row.similarity, row.source_url, row.display_text
                            );
                        }
                        println!();
                        println!("Full context details:");
                        for row in rows {
                            println!("Context #{} (Similarity: {})", row.rank, row.similarity);
                            println!("  Source URL: {}", row.source_url);
                            println!("  Text: {}", row.item.text);
                        }
                    }
                }
            }
            ReportSection::Explanations { entries } => {
                heading("EVALUATION EXPLANATIONS");
                for entry in entries {
                    println!("• {}", entry.title);
                    println!("  {}", entry.body);
                }
            }
            ReportSection::RawResponse { body } => {
                heading("RAW JSON RESPONSE");
                match serde_json::to_string_pretty(body) {
                    Ok(json) => println!("{}", json),
                    Err(e) => eprintln!("Error serializing raw response: {}", e),
                }
            }
        }
    }
}

fn heading(title: &str) {
    println!();
    println!("{}", title);
    println!("{}", "-".repeat(title.len()));
}

/// Print the full section list as JSON, for scripting.
fn print_json(sections: &[ReportSection]) {
    match serde_json::to_string_pretty(sections) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing report to JSON: {}", e),
    }
}
