//! Harvest statistics
//!
//! Summarises a finished [`HarvestReport`] per category and prints it to
//! stdout at the end of a run.

use crate::crawler::{HarvestReport, Termination};

/// Result line for one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStatistics {
    pub name: String,
    pub accepted: usize,
    pub pages_visited: usize,
    pub termination: String,
    pub failed: bool,
}

/// Harvest statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestStatistics {
    /// One entry per category, in crawl order
    pub categories: Vec<CategoryStatistics>,

    /// Total accepted records
    pub total_records: usize,

    /// Total listing pages visited
    pub total_pages: usize,

    /// Categories that ended on a page-level defect
    pub failed_categories: usize,

    /// Categories that stopped on the cap while more pages existed
    pub capped_categories: usize,

    pub duration_seconds: i64,
}

impl HarvestStatistics {
    /// Builds statistics from a harvest report
    pub fn from_report(report: &HarvestReport) -> Self {
        let categories: Vec<CategoryStatistics> = report
            .categories
            .iter()
            .map(|c| CategoryStatistics {
                name: c.name.clone(),
                accepted: c.accepted_count,
                pages_visited: c.pages_visited,
                termination: c.termination.to_string(),
                failed: matches!(c.termination, Termination::PageError(_)),
            })
            .collect();

        Self {
            total_records: report.records.len(),
            total_pages: categories.iter().map(|c| c.pages_visited).sum(),
            failed_categories: report.failed_categories(),
            capped_categories: report
                .categories
                .iter()
                .filter(|c| c.termination == Termination::CapReached)
                .count(),
            duration_seconds: report.duration_seconds(),
            categories,
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &HarvestStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Overview:");
    println!("  Categories crawled: {}", stats.categories.len());
    println!("  Records accepted: {}", stats.total_records);
    println!("  Pages visited: {}", stats.total_pages);
    println!("  Duration: {}s", stats.duration_seconds);
    println!();

    println!("Categories:");
    for category in &stats.categories {
        let marker = if category.failed { "✗" } else { "✓" };
        println!(
            "  {} {}: {} records over {} pages, {}",
            marker, category.name, category.accepted, category.pages_visited, category.termination
        );
    }
    println!();

    if stats.capped_categories > 0 {
        println!(
            "Capped categories: {} (more pages were available)",
            stats.capped_categories
        );
    }

    let success_rate = if stats.categories.is_empty() {
        0.0
    } else {
        let succeeded = stats.categories.len() - stats.failed_categories;
        (succeeded as f64 / stats.categories.len() as f64) * 100.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} categories completed without page errors)",
        success_rate,
        stats.categories.len() - stats.failed_categories,
        stats.categories.len()
    );
}
