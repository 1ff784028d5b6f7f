//! Terminal rendering of the browse view model.

use browser::{ComparisonView, PrimaryView, Status, ViewModel};
use colored::Colorize;
use comparison::ComparisonRow;

/// Characters of a full-width score bar.
pub const BAR_WIDTH: usize = 30;

/// Horizontal bar proportional to `width` (expected in `[0, 1]`).
pub fn bar(width: f32) -> String {
    let width = if width.is_finite() { width.clamp(0.0, 1.0) } else { 0.0 };
    "█".repeat((width * BAR_WIDTH as f32).round() as usize)
}

/// Overlap summary line, e.g. `1/3 (Jaccard ~ 33.3%)`.
pub fn overlap_summary(intersection: usize, union: usize, jaccard_percent: f64) -> String {
    format!("{}/{} (Jaccard ~ {:.1}%)", intersection, union, jaccard_percent)
}

pub fn print_view(view: &ViewModel) {
    match view.status() {
        Status::Loading => {
            println!("{}", "Loading...".yellow());
            return;
        }
        Status::Error(message) => println!("{} {}", "Error:".red().bold(), message),
        Status::Idle => {}
    }

    if let Some(primary) = &view.primary {
        print_primary(primary);
    }
    if let Some(comparison) = &view.comparison {
        println!();
        print_comparison(comparison);
    }
}

pub fn print_primary(primary: &PrimaryView) {
    let page = &primary.page;
    println!(
        "{}",
        format!(
            "{} recommendations (page {}/{}, {} results):",
            primary.algorithm.label(),
            page.page,
            page.total_pages,
            page.total_results
        )
        .bold()
        .blue()
    );

    if page.is_empty() {
        println!("  {}", "No recommendations".dimmed());
    }
    for (rank, item) in page.items.iter().enumerate() {
        println!(
            "{}. {} - Score: {:.4}",
            (rank + 1).to_string().green(),
            item.display_title(),
            item.score
        );
    }

    if primary.show_pagination {
        let prev = primary.prev_page.map(|p| format!("prev: {}", p)).unwrap_or_default();
        let next = primary.next_page.map(|p| format!("next: {}", p)).unwrap_or_default();
        println!("{}", format!("  {}  {}", prev, next).dimmed());
    }
}

pub fn print_comparison(comparison: &ComparisonView) {
    let label_a = comparison.label_a();
    let label_b = comparison.label_b();
    println!(
        "{}",
        format!("Comparison: {} vs {}", label_a, label_b).bold().blue()
    );

    let result = &comparison.result;
    if result.is_empty {
        println!("  {}", "Both algorithms returned nothing".dimmed());
        return;
    }

    for row in &result.rows {
        print_row(row, &label_a, &label_b);
    }

    println!(
        "{} {}",
        "Overlap:".bold(),
        overlap_summary(result.intersection_count, result.union_count, result.jaccard_percent)
    );
}

fn print_row(row: &ComparisonRow, label_a: &str, label_b: &str) {
    println!("{} {}", row.movie_id.to_string().cyan(), row.title);
    println!(
        "  {:<10} {:<width$} {:.4}",
        label_a,
        bar(row.width_a).green(),
        row.score_a,
        width = BAR_WIDTH
    );
    println!(
        "  {:<10} {:<width$} {:.4}",
        label_b,
        bar(row.width_b).magenta(),
        row.score_b,
        width = BAR_WIDTH
    );
    println!("  {}", format!("delta {:+.4}", row.delta()).dimmed());
}
