//! Console summary printed at the end of every completed run

use crate::error::ScanError;
use crate::findings::ReportBundle;
use comfy_table::{Cell, CellAlignment, Color, Table};
use console::style;

/// Per-category counts and the grand total as a table.
pub fn summary_table(bundle: &ReportBundle) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Count"]);

    for (category, count) in bundle.counts() {
        let count_cell = if count > 0 {
            Cell::new(count).fg(Color::Yellow)
        } else {
            Cell::new(count).fg(Color::Green)
        };
        table.add_row(vec![
            Cell::new(category.description()),
            count_cell.set_alignment(CellAlignment::Right),
        ]);
    }

    table.add_row(vec![
        Cell::new("Total cost optimization opportunities"),
        Cell::new(bundle.total()).set_alignment(CellAlignment::Right),
    ]);
    table
}

pub fn print_summary(bundle: &ReportBundle, scan_errors: &[ScanError]) {
    println!();
    println!("{}", "=".repeat(60));
    println!("{}", style("OCI DEV/TEST RESOURCE COST CHEF SUMMARY").bold());
    println!("{}", "=".repeat(60));
    println!("{}", summary_table(bundle));

    if !scan_errors.is_empty() {
        println!();
        println!(
            "{}",
            style(format!(
                "{} check(s) failed; their categories may be incomplete:",
                scan_errors.len()
            ))
            .yellow()
        );
        for error in scan_errors {
            println!("  {} {}", style("-").dim(), error);
        }
    }
    println!();
}
