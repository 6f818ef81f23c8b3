// Output formatting and display for CLI

use crate::scan::ProcessRecord;
use crate::supervisor::{Classified, CycleReport, RestartMethod, RestartReport, Verdict};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

/// Print a full cycle report
pub fn print_report(report: &CycleReport) {
    match report.verdict {
        Verdict::Healthy => println!("{}", "✓ Process topology is healthy".green().bold()),
        Verdict::NeedsRestart => println!(
            "{}",
            "⚠ Process topology needs a restart".yellow().bold()
        ),
    }

    println!(
        "  {}: {}",
        "Managed app".bold(),
        format!("{} instance(s)", report.managed_count)
    );
    println!(
        "  {}: {} survivor(s), {} before cleanup",
        "Workers".bold(),
        report.worker_survivors,
        report.workers_before
    );

    if !report.terminated_pids.is_empty() {
        let pids: Vec<String> = report.terminated_pids.iter().map(|p| p.to_string()).collect();
        println!("  {}: {}", "Evicted PIDs".bold(), pids.join(", "));
    }

    match &report.restart {
        None => {}
        Some(RestartReport::Succeeded { method }) => {
            let method = match method {
                RestartMethod::InPlace => "restarted in place",
                RestartMethod::Recreated => "service entry recreated",
            };
            println!("  {}: {} {}", "Restart".bold(), "✓".green(), method);
        }
        Some(RestartReport::Failed { diagnostic }) => {
            println!("  {}: {} {}", "Restart".bold(), "✗".red(), diagnostic);
        }
    }

    println!(
        "{}",
        format!("Completed at {}", report.completed_at.format("%H:%M:%S"))
            .dimmed()
            .italic()
    );
}

/// Print the one-line summary used by watch mode
pub fn print_cycle_line(report: &CycleReport) {
    let verdict = match report.verdict {
        Verdict::Healthy => "healthy".green().to_string(),
        Verdict::NeedsRestart => "needs restart".yellow().to_string(),
    };

    let restart = match &report.restart {
        None => String::new(),
        Some(RestartReport::Succeeded { .. }) => format!(", restart {}", "✓".green()),
        Some(RestartReport::Failed { .. }) => format!(", restart {}", "✗".red()),
    };

    println!(
        "{} {} — {} managed, {} worker(s){}",
        format!("[{}]", report.completed_at.format("%H:%M:%S")).dimmed(),
        verdict,
        report.managed_count,
        report.worker_survivors,
        restart
    );
}

/// Print the classified snapshot as tables (scan command)
pub fn print_classified(classified: &Classified) {
    if classified.managed.is_empty() {
        println!("{}", "No managed-app process found".yellow());
    } else {
        println!("\n{}", "Managed application".bold().underline());
        print_process_table(&classified.managed);
    }

    if classified.workers.is_empty() {
        println!("{}", "No worker-binary candidates found".yellow());
    } else {
        println!("\n{}", "Worker binaries".bold().underline());
        print_process_table(&classified.workers);
    }

    println!(
        "{}",
        format!(
            "Total: {} managed, {} worker(s)",
            classified.managed.len(),
            classified.workers.len()
        )
        .dimmed()
        .italic()
    );
}

/// Print a formatted table of process records
fn print_process_table(records: &[ProcessRecord]) {
    #[derive(Tabled)]
    struct ProcessRow {
        #[tabled(rename = "PID")]
        pid: u32,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Memory")]
        memory: String,
        #[tabled(rename = "Command")]
        command: String,
    }

    let rows: Vec<ProcessRow> = records
        .iter()
        .map(|r| ProcessRow {
            pid: r.pid,
            name: truncate(&r.name, 20),
            memory: format_memory(r.memory_bytes),
            command: truncate(&r.joined_cmdline(), 48),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    println!("\n{}\n", table);
}

/// Print an error message to stderr
pub fn print_error(error: &str) {
    eprintln!("{} {}", "✗ Error:".red().bold(), error);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Spinner shown while a cycle is in flight
pub fn cycle_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message("scanning processes");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Format memory usage in human-readable format
fn format_memory(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes < KB {
        format!("{}B", bytes)
    } else if bytes < MB {
        format!("{:.1}KB", bytes as f64 / KB as f64)
    } else if bytes < GB {
        format!("{:.1}MB", bytes as f64 / MB as f64)
    } else {
        format!("{:.2}GB", bytes as f64 / GB as f64)
    }
}

/// Truncate a string to a maximum length
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}
