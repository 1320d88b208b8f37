use anyhow::Result;
use colored::Colorize;
use sbrecon_core::{Diagnostic, Diagnostics, EndpointState, ReconcileStatus, Severity};

use crate::cli::OutputFormat;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_diagnostics(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics {
        print_diagnostic(diagnostic);
    }
}

fn print_diagnostic(diagnostic: &Diagnostic) {
    let label = match diagnostic.severity {
        Severity::Error => "Error:".red().bold(),
        Severity::Warning => "Warning:".yellow().bold(),
    };
    eprintln!("{} {}", label, diagnostic.summary.bold());
    if !diagnostic.detail.is_empty() {
        eprintln!("  {}", diagnostic.detail);
    }
}

pub fn print_state(state: &EndpointState, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(state)?),
        OutputFormat::Text => {
            println!("{}: {}", "Endpoint".cyan(), state.endpoint_name);
            println!("{}: {}", "Topic".cyan(), state.topic_name);
            println!(
                "{}: {} MB{}",
                "Queue size".cyan(),
                state.queue_options.max_size_in_megabytes,
                if state.queue_options.enable_partitioning {
                    " (partitioned)"
                } else {
                    ""
                }
            );
            print_list("Subscriptions", &state.subscriptions);
            print_list("Additional queues", &state.additional_queues);
            print_status(&state.status());
        }
    }
    Ok(())
}

pub fn print_status(status: &ReconcileStatus) {
    let text = match status {
        ReconcileStatus::Settled => "settled".green(),
        ReconcileStatus::NotCreated { queue, endpoint } => {
            let mut missing = Vec::new();
            if *queue {
                missing.push("queue");
            }
            if *endpoint {
                missing.push("endpoint");
            }
            format!("not created ({})", missing.join(", ")).yellow()
        }
        ReconcileStatus::Drifted(reasons) => {
            let reasons: Vec<String> = reasons.iter().map(|r| format!("{r:?}")).collect();
            format!("drifted ({})", reasons.join(", ")).red()
        }
    };
    println!("{}: {}", "Status".cyan(), text);
}

fn print_list(label: &str, items: &[String]) {
    if items.is_empty() {
        println!("{}: -", label.cyan());
        return;
    }
    println!("{}:", label.cyan());
    for item in items {
        println!("  - {item}");
    }
}
