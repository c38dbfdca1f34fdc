// Colored terminal summaries for collect, process and reddit runs.
//
// Everything here prints; the data it prints is computed elsewhere.

use std::path::PathBuf;

use colored::Colorize;

use super::truncate_chars;
use crate::io::FileSummary;
use crate::models::{IntentClass, IntentReport, IssueCode, QualityReport};
use crate::pipeline::collect::CollectSummary;
use crate::pipeline::process::ProcessOutcome;

const MAX_LABEL_CHARS: usize = 40;

/// Summary of a collect run.
pub fn display_collect_summary(summary: &CollectSummary) {
    println!("\n{}", "=== Collect ===".bold());
    println!("  {:<14} {}", "Added".dimmed(), summary.added.to_string().green());
    println!("  {:<14} {}", "Already seen".dimmed(), summary.already_seen);
    println!("  {:<14} {}", "Blocked".dimmed(), summary.blocked);
    if summary.failed_pages > 0 {
        println!(
            "  {:<14} {}",
            "Failed pages".dimmed(),
            summary.failed_pages.to_string().yellow()
        );
    }
    if let Some(reason) = summary.stopped {
        println!("  {} stopped early: {}", "~".yellow(), reason);
    }
}

/// Cluster table and quality warnings for a processing run.
pub fn display_process_summary(outcome: &ProcessOutcome, written: &[PathBuf]) {
    println!(
        "\n{}",
        format!(
            "=== Processed {} raw results into {} items ===",
            outcome.raw_count,
            outcome.items.len()
        )
        .bold()
    );
    println!();

    if outcome.clusters.clusters.is_empty() {
        println!("  No clusters configured. Add [[clustering.clusters]] to the config.");
    } else {
        println!(
            "  {:<24} {:>6}  {:<32}",
            "Cluster".dimmed(),
            "Items".dimmed(),
            "Top terms".dimmed(),
        );
        println!("  {}", "-".repeat(66).dimmed());
        for cluster in &outcome.clusters.clusters {
            let terms = cluster
                .top_terms
                .iter()
                .take(4)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            let count = if cluster.items.is_empty() {
                "0".dimmed().to_string()
            } else {
                cluster.items.len().to_string()
            };
            println!(
                "  {:<24} {:>6}  {}",
                truncate_chars(&cluster.cluster_id, 21),
                count,
                truncate_chars(&terms, 32),
            );
        }
    }

    println!();
    display_quality(&outcome.quality);

    println!();
    for path in written {
        println!("  {} {}", "wrote".dimmed(), path.display());
    }
}

/// Quality metrics and any warnings.
pub fn display_quality(quality: &QualityReport) {
    println!(
        "  Dedupe ratio: {:.2}%   Intent density: {:.2}",
        quality.dedupe_ratio * 100.0,
        quality.intent_density
    );
    if let Some(top) = quality.top_domains.first() {
        println!("  Top domain: {} ({})", top.domain, top.count);
    }

    if quality.issues.is_empty() {
        println!("  {}", "No quality issues".green());
        return;
    }
    for issue in &quality.issues {
        let hint = match issue.code {
            IssueCode::DomainMonoculture => "one domain dominates; add queries or block it",
            IssueCode::LowIntentDensity => "few intent tags; widen keywords or tag patterns",
        };
        println!(
            "  {} {:?}: {}",
            "!".yellow().bold(),
            issue.code,
            hint.dimmed()
        );
    }
}

/// Intent list after a reddit run.
pub fn display_intents(report: &IntentReport, added: usize) {
    println!(
        "\n{}",
        format!(
            "=== Reddit intents ({} new posts, {} intents) ===",
            added,
            report.intents.len()
        )
        .bold()
    );
    println!();

    let structural = report
        .intents
        .iter()
        .filter(|i| i.classification == IntentClass::Structural)
        .count();
    let temporal = report.intents.len() - structural;

    for intent in report.intents.iter().take(20) {
        let evidence = intent
            .evidence_counts
            .iter()
            .map(|(window, count)| format!("{window}:{count}"))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "  {:<42} {:<10}  {}",
            truncate_chars(&intent.label, MAX_LABEL_CHARS),
            colorize_class(intent.classification),
            evidence.dimmed(),
        );
    }
    if report.intents.len() > 20 {
        println!("  {}", format!("... and {} more", report.intents.len() - 20).dimmed());
    }

    println!();
    println!("  {} structural, {} temporal", structural, temporal);
}

/// Print a `count` summary as pretty JSON.
pub fn display_file_summary(summary: &FileSummary) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

fn colorize_class(class: IntentClass) -> colored::ColoredString {
    match class {
        IntentClass::Structural => class.as_str().cyan(),
        IntentClass::Temporal => class.as_str().yellow(),
    }
}
