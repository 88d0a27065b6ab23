//! Output formatters for the stats and export reports.

use anyhow::Result;
use colored::*;
use serde::Serialize;

use crate::{ExportReport, StatsReport};
use acadex_core::analytics::FrequencyEntry;

/// Print a stats report in human-readable format with colors.
pub fn print_stats_human(report: &StatsReport) {
    println!("{}", format!("Archivo: {}", report.file).bold());
    println!(
        "Filas procesadas: {} de {}",
        report.rows_parsed, report.rows_scanned
    );
    print_warnings(&report.warnings);
    println!();

    println!("{}", "Resumen de indicadores:".bold().underline());
    for entry in &report.summary {
        println!("  {:<22} {}", entry.label, entry.count);
    }
    println!();

    print_frequency("Distribución por sexo:", &report.gender);
    print_frequency("Distribución por grado:", &report.degree);
    print_frequency("Tipos de publicación:", &report.publication_types);
    print_frequency("Tesis por año:", &report.theses_by_year);

    println!(
        "{} {}",
        "Publicaciones por año (filtro:".bold().underline(),
        format!("{})", report.indexation_filter).bold().underline()
    );
    if report.pivot.rows.is_empty() {
        println!("  {}", "sin datos".bright_black());
    }
    for row in &report.pivot.rows {
        let cells: Vec<String> = report
            .pivot
            .categories
            .iter()
            .map(|category| {
                format!(
                    "{}: {}",
                    category.cyan(),
                    row.counts.get(category).copied().unwrap_or(0)
                )
            })
            .collect();
        println!("  {}  {}", row.year.bold(), cells.join("  "));
    }
    println!();
    println!(
        "Filtros disponibles: {}",
        report.pivot.selector.join(", ").bright_black()
    );
}

/// Print an export confirmation in human-readable format.
pub fn print_export_human(report: &ExportReport) {
    print_warnings(&report.warnings);
    println!(
        "{} {} ({} registros de {} filas)",
        "✓ Exportado:".green().bold(),
        report.output,
        report.total_records,
        report.rows_parsed
    );
}

/// Print any report as pretty JSON.
pub fn print_json<T: Serialize>(report: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn print_frequency(title: &str, entries: &[FrequencyEntry]) {
    println!("{}", title.bold().underline());
    if entries.is_empty() {
        println!("  {}", "sin datos".bright_black());
    }
    for entry in entries {
        println!("  {:<22} {}", entry.name, entry.value);
    }
    println!();
}

fn print_warnings(warnings: &[acadex_core::RowWarning]) {
    for warning in warnings {
        println!(
            "{} fila {}: {}",
            "WARN".yellow().bold(),
            warning.row,
            warning.message
        );
    }
}
