use colored::Colorize;
use preview_allowlist_core::ReconcileOutcome;
use serde_json::{Value, json};

use crate::cli::OutputFormat;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_outcome(outcome: &ReconcileOutcome, client_id: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let doc = outcome_json(outcome, client_id);
            println!(
                "{}",
                serde_json::to_string_pretty(&doc).unwrap_or_else(|_| doc.to_string())
            );
        }
        OutputFormat::Text => print_outcome_text(outcome, client_id),
    }
}

fn print_outcome_text(outcome: &ReconcileOutcome, client_id: &str) {
    match outcome {
        ReconcileOutcome::Unchanged { .. } => {
            print_success(&format!(
                "URL has already been added to client {}",
                client_id.cyan()
            ));
        }
        ReconcileOutcome::Updated { .. } => {
            print_success(&format!("Successfully patched client {}", client_id.cyan()));
            print_allowed(outcome.allowed_clients());
        }
        ReconcileOutcome::Planned { payload, .. } => {
            println!(
                "{} Dry run: client {} would be patched with",
                "•".yellow(),
                client_id.cyan()
            );
            match serde_json::to_string_pretty(payload) {
                Ok(body) => println!("{body}"),
                Err(_) => print_allowed(outcome.allowed_clients()),
            }
        }
    }
}

fn print_allowed(allowed: &[String]) {
    println!("{}:", "Allowed URLs".cyan());
    for url in allowed {
        println!("  {url}");
    }
}

/// JSON report of a run.
pub fn outcome_json(outcome: &ReconcileOutcome, client_id: &str) -> Value {
    let mut doc = json!({
        "status": outcome.status(),
        "client_id": client_id,
        "allowed_clients": outcome.allowed_clients(),
    });
    if let Some(payload) = outcome.payload() {
        doc["payload"] = json!(payload);
    }
    doc
}
