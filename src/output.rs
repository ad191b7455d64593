//! Terminal rendering of tasks and diff results.

use colored::{ColoredString, Colorize};
use tasksync::diff::{DiffInfo, DiffResult, DiffType};
use tasksync::scan::ScanOutcome;
use tasksync::ParsedTask;

/// Print extracted tasks grouped by file.
pub fn print_tasks(tasks: &[ParsedTask]) {
    println!("\n{} {} found", "Tasks:".cyan().bold(), tasks.len());
    println!("{}", "─".repeat(60));

    if tasks.is_empty() {
        println!("   No tagged comments found");
        return;
    }

    let mut current_file: Option<&str> = None;
    for task in tasks {
        if current_file != Some(task.file.as_str()) {
            println!("\n   {}", task.file.bold());
            current_file = Some(task.file.as_str());
        }
        println!(
            "   {:>5}  {:<6} {}",
            task.line.to_string().dimmed(),
            task.tag.yellow(),
            task.text
        );
    }
}

/// Print per-file counters of a scan.
pub fn print_scan_stats(outcome: &ScanOutcome) {
    println!();
    println!(
        "   {} files scanned, {} ignored, {} skipped",
        outcome.files_scanned, outcome.files_ignored, outcome.files_skipped
    );
}

fn type_label(diff_type: DiffType) -> ColoredString {
    let label = format!("{:<6}", diff_type.as_str());
    match diff_type {
        DiffType::Same => label.dimmed(),
        DiffType::Move => label.blue().bold(),
        DiffType::Update => label.yellow().bold(),
        DiffType::New => label.green().bold(),
        DiffType::Delete => label.red().bold(),
    }
}

fn location(info: &DiffInfo) -> String {
    format!("{}:{}", info.file, info.line)
}

/// Print diff results, one block per result.
pub fn print_diff(results: &[DiffResult]) {
    println!("\n{} {} result(s)", "Diff:".cyan().bold(), results.len());
    println!("{}", "─".repeat(60));

    if results.is_empty() {
        println!("   No tasks recorded or found");
        return;
    }

    for result in results {
        let label = type_label(result.diff_type);
        let (old, new) = (result.data.old.as_ref(), result.data.new.as_ref());

        match (result.diff_type, old, new) {
            (DiffType::Move, Some(old), Some(new)) => println!(
                "   {} [{}] {}  {} → {}",
                label,
                result.tag,
                new.text,
                location(old).dimmed(),
                location(new)
            ),
            (DiffType::Update, Some(old), Some(new)) => {
                println!("   {} [{}] {}", label, result.tag, location(new));
                println!("          {} {}", "-".red(), old.text);
                println!("          {} {}", "+".green(), new.text);
            }
            _ => {
                if let Some(info) = result.current() {
                    println!(
                        "   {} [{}] {}  {}",
                        label,
                        result.tag,
                        info.text,
                        location(info).dimmed()
                    );
                }
            }
        }
    }
}
