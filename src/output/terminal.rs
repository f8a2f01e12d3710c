// Colored terminal output for the `check` command.

use colored::Colorize;

use crate::checker::CheckResult;

/// Width of the probability bar, in characters.
const BAR_WIDTH: usize = 30;

/// Display the verdict for a single question pair.
pub fn display_check_result(result: &CheckResult) {
    println!("\n{}", "=== Duplicate Check ===".bold());
    println!("  Q1: {}", super::truncate_chars(&result.q1, 100).dimmed());
    println!("  Q2: {}", super::truncate_chars(&result.q2, 100).dimmed());
    println!();

    let verdict = if result.prediction.is_duplicate {
        "DUPLICATE".red().bold()
    } else {
        "NOT DUPLICATE".green().bold()
    };
    println!("  Verdict: {verdict}");

    let dup = result.prediction.probability_duplicate;
    let not_dup = result.prediction.probability_not_duplicate;
    println!(
        "  Duplicate:     {} {:>5.1}%",
        probability_bar(dup).red(),
        dup * 100.0
    );
    println!(
        "  Not duplicate: {} {:>5.1}%",
        probability_bar(not_dup).green(),
        not_dup * 100.0
    );
    println!();
}

/// Render a probability in [0, 1] as a fixed-width bar.
fn probability_bar(p: f64) -> String {
    let filled = (p.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}
