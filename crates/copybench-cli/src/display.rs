//! Terminal rendering for reports and capability tables

use console::{style, StyledObject};
use copybench_engine::StrategyReport;
use copybench_strategies::capabilities::mechanism;
use copybench_strategies::CapabilityTable;
use copybench_types::{Availability, CopyOutcome};

/// Print a benchmark report with colors
pub fn print_report(report: &StrategyReport) {
    println!();
    println!("{}", style("Benchmark Report:").bold().underlined());
    println!("  Source: {}", style(report.source().display()).cyan());
    match (report.source_size(), report.probe_error()) {
        (Some(size), _) => println!(
            "  Size: {} ({} bytes)",
            style(format_bytes(size)).cyan(),
            size
        ),
        (None, Some(message)) => println!("  Size: {}", style(message).red()),
        (None, None) => {}
    }
    println!("  Run at: {}", style(report.generated_at().to_rfc3339()).dim());
    println!();

    for entry in report.entries() {
        let name = format!("{:<12}", entry.kind.display_name());
        match (entry.elapsed, &entry.outcome) {
            (None, _) => println!(
                "  {} {}",
                style(name).dim(),
                style(format!("unsupported ({})", entry.availability)).yellow()
            ),
            (Some(elapsed), CopyOutcome::Success { .. }) => println!(
                "  {} {} -> {}",
                style(name).bold(),
                style(format!("{} us", elapsed.as_micros())).green(),
                style(entry.destination.display()).dim()
            ),
            (Some(_), CopyOutcome::Failure { message, .. }) => println!(
                "  {} {}",
                style(name).bold(),
                style(format!("FAILED: {}", message)).red()
            ),
        }
    }

    println!();
    println!(
        "{}",
        style("Performance comparison (lower is better):").bold().underlined()
    );
    for comparison in report.comparisons() {
        println!(
            "  {:<12} {}",
            comparison.kind.display_name(),
            style_percent(comparison.percent)
        );
    }
}

/// Print the capability table
pub fn print_capabilities(table: &CapabilityTable) {
    println!("{}", style("Copy strategies:").bold().underlined());
    for entry in table.entries() {
        let availability = match entry.availability {
            Availability::Available => style(entry.availability.to_string()).green(),
            Availability::Unsupported => style(entry.availability.to_string()).yellow(),
            Availability::UnsupportedOnThisBuild => style(entry.availability.to_string()).dim(),
        };
        println!(
            "  {:<12} {:<28} {}",
            entry.kind.display_name(),
            mechanism(entry.kind),
            availability
        );
    }
}

/// Color a relative percentage: faster than baseline green, slower red
fn style_percent(percent: Option<f64>) -> StyledObject<String> {
    match percent {
        None => style("n/a".to_string()).dim(),
        Some(p) if p < 100.0 => style(format_percent(p)).green().bold(),
        Some(p) if p > 100.0 => style(format_percent(p)).red(),
        Some(p) => style(format_percent(p)).bold(),
    }
}

fn format_percent(percent: f64) -> String {
    format!("{:.2}%", percent)
}

/// Format bytes in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}

/// Display a warning message with proper formatting
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), style(message).yellow());
}

/// Display an error message with proper formatting
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), style(message).red());
}

/// Display an info message with proper formatting
pub fn display_info(message: &str) {
    println!("{} {}", style("ℹ").blue().bold(), style(message).blue());
}
