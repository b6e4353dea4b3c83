//! Output formatting for CLI reports

use crate::pipeline::{PhaseSummary, TrainingReport};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Format `count` out of the phase's episodes with its percentage
fn format_share(count: usize, summary: &PhaseSummary) -> String {
    let pct = if summary.episodes == 0 {
        0.0
    } else {
        count as f64 * 100.0 / summary.episodes as f64
    };
    format!("{} / {} ({pct:.1}%)", format_number(count), format_number(summary.episodes))
}

/// Print the counts of one phase
pub fn print_phase(name: &str, summary: &PhaseSummary) {
    println!("  {name}");
    print_kv("  Goals", &format_share(summary.goals, summary));
    print_kv("  Deaths", &format_share(summary.deaths, summary));
    print_kv("  Timeouts", &format_share(summary.timeouts, summary));
    print_kv("  Mean turns", &format!("{:.1}", summary.mean_turns));
    print_kv("  Furthest column", &summary.best_x.to_string());
}

/// Print a full training report, one subsection per level
pub fn print_report(report: &TrainingReport) {
    print_section("Training Complete");
    print_kv("Learner", &report.learner);
    print_kv("Known states", &format_number(report.table_size));
    print_kv(
        "Evaluation goals",
        &format_number(report.evaluation_goals()),
    );

    for level in &report.levels {
        print_subsection(&level.level);
        print_phase("Training", &level.training);
        print_phase("Evaluation", &level.evaluation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_groups_thousands() {
        assert_eq!(format_number(7), "7");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_share_handles_empty_phase() {
        let summary = PhaseSummary::default();
        assert_eq!(format_share(0, &summary), "0 / 0 (0.0%)");
    }
}
