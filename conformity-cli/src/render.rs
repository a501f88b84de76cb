//! Terminal rendering
//!
//! Formatting helpers shared by the status view, the report viewer and the
//! on-demand actions.

use colored::*;
use conformity_core::domain::job::ComplianceSummary;
use conformity_core::dto::locate::DocumentExcerpt;
use conformity_core::explain::ExplanationLine;
use conformity_core::view::{Card, PanelEntry, ReportView};

use crate::store::Theme;

/// Width of the compliance meter in cells
pub const METER_WIDTH: usize = 30;

/// Plain-text compliance meter, e.g. `[█████░░░░░] 50%`
pub fn meter(summary: &ComplianceSummary, width: usize) -> String {
    let filled = summary.meter_cells(width);
    format!(
        "[{}{}] {:.0}%",
        "█".repeat(filled),
        "░".repeat(width - filled),
        summary.percent()
    )
}

fn accent(text: &str, theme: Theme) -> ColoredString {
    match theme {
        Theme::Light => text.blue(),
        Theme::Dark => text.bright_cyan(),
    }
}

/// Print the compliance meter and conclusion of a completed job
pub fn print_summary(summary: &ComplianceSummary, theme: Theme) {
    println!();
    println!("{}", "Total compliance:".bold());
    println!("  {}", accent(&meter(summary, METER_WIDTH), theme));
    if !summary.conclusion.trim().is_empty() {
        println!("{}", "Conclusion:".bold());
        println!("  {}", summary.conclusion);
    }
    println!();
}

/// Print every visible card of the report
pub fn print_report(view: &ReportView, theme: Theme) {
    if view.is_empty() {
        println!("{}", "The report is empty.".yellow());
        return;
    }

    let shown = view.visible().count();
    println!(
        "{}",
        format!("Compliance report: {} of {} requirement(s)", shown, view.len()).bold()
    );
    println!("{}", "─".repeat(80).dimmed());
    for (index, card) in view.visible() {
        print_card(index, card, theme);
    }
    println!("{}", "─".repeat(80).dimmed());
}

/// Print one card; the detail panel only when expanded
pub fn print_card(index: usize, card: &Card, theme: Theme) {
    let marker = if card.highlighted {
        accent("▶", theme)
    } else {
        "▸".normal()
    };
    let requirement = if card.highlighted {
        card.entry.requirement.bold()
    } else {
        card.entry.requirement.normal()
    };
    let status = if card.entry.is_compliant() {
        card.entry.status.green()
    } else {
        card.entry.status.red()
    };

    println!("{} {} {}", marker, format!("[{}]", index + 1).dimmed(), requirement);
    println!("    Status:      {}", status);

    if card.expanded {
        println!("    Criticality: {}", card.entry.criticality);
        println!("    Analysis:    {}", card.entry.analysis);
        println!("    Section:     {}", card.entry.section().dimmed());
    }
    println!();
}

/// Print the explanation side panel of a keyword search
pub fn print_panel(panel: &[PanelEntry], theme: Theme) {
    if panel.is_empty() {
        return;
    }

    println!("{}", "Explanation".bold());
    for (n, entry) in panel.iter().enumerate() {
        println!("  {} {}", accent("●", theme), entry.requirement.bold());
        println!("    {}", entry.analysis);
        println!(
            "    {} ТЗ, {}",
            format!("(:ref {})", n + 1).dimmed(),
            entry.section
        );
    }
    println!();
}

/// Print an explanation with its labels emphasized
pub fn print_explanation(lines: &[ExplanationLine]) {
    for line in lines {
        match line {
            ExplanationLine::Labeled { label, body } => println!("  {} {}", label.bold(), body),
            ExplanationLine::Plain(text) => println!("  {}", text),
        }
    }
}

/// Print source document excerpts found for a requirement
pub fn print_excerpts(excerpts: &[DocumentExcerpt]) {
    println!("{}", "Found in the document:".bold());
    for excerpt in excerpts {
        println!("{}", "─".repeat(80).dimmed());
        println!("{}", excerpt.content);
    }
    println!("{}", "─".repeat(80).dimmed());
}

/// Print a blocking notice
pub fn print_alert(message: &str) {
    eprintln!("{} {}", "!".yellow().bold(), message.yellow());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meter_is_proportional() {
        let summary = ComplianceSummary {
            total_compliance: 87.0,
            conclusion: "OK".to_string(),
        };
        let bar = meter(&summary, 100);
        assert_eq!(bar.matches('█').count(), 87);
        assert_eq!(bar.matches('░').count(), 13);
        assert!(bar.ends_with("] 87%"));
    }

    #[test]
    fn test_meter_handles_extremes() {
        let full = ComplianceSummary {
            total_compliance: 100.0,
            conclusion: String::new(),
        };
        let empty = ComplianceSummary {
            total_compliance: 0.0,
            conclusion: String::new(),
        };
        assert_eq!(meter(&full, 4), "[████] 100%");
        assert_eq!(meter(&empty, 4), "[░░░░] 0%");
    }
}
