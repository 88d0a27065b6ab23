use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

use acadex_core::analytics::{
    self, ALL_INDEXATIONS, FrequencyEntry, PublicationPivot,
};
use acadex_core::{EXPORT_FILE_NAME, Pipeline, PipelineConfig, RowWarning};

mod formatter;

#[derive(Parser)]
#[command(name = "acadex")]
#[command(about = "Carga, consolida y exporta planillas de datos académicos", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a workbook and print summary statistics
    Stats {
        /// Path to the Excel file (.xlsx/.xls)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Indexation filter for the publications pivot
        #[arg(short, long, default_value = ALL_INDEXATIONS)]
        indexation: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Path to configuration file (TOML)
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,
    },
    /// Load a workbook and export the consolidated dataset
    Export {
        /// Path to the Excel file (.xlsx/.xls)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the exported workbook
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Path to configuration file (TOML)
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output for scripting
    Json,
}

#[derive(Serialize)]
pub(crate) struct CategoryCount {
    pub label: &'static str,
    pub count: usize,
}

#[derive(Serialize)]
pub(crate) struct StatsReport {
    pub file: String,
    pub rows_scanned: usize,
    pub rows_parsed: usize,
    pub warnings: Vec<RowWarning>,
    pub summary: Vec<CategoryCount>,
    pub gender: Vec<FrequencyEntry>,
    pub degree: Vec<FrequencyEntry>,
    pub publication_types: Vec<FrequencyEntry>,
    pub theses_by_year: Vec<FrequencyEntry>,
    pub indexation_filter: String,
    pub pivot: PublicationPivot,
}

#[derive(Serialize)]
pub(crate) struct ExportReport {
    pub file: String,
    pub output: String,
    pub rows_parsed: usize,
    pub total_records: usize,
    pub warnings: Vec<RowWarning>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Stats {
            file,
            indexation,
            format,
            config,
        } => {
            let pipeline = load_pipeline(&file, config.as_deref())?;
            let report = build_stats_report(&pipeline, &file, &indexation)?;
            match format {
                OutputFormat::Human => formatter::print_stats_human(&report),
                OutputFormat::Json => formatter::print_json(&report)?,
            }
        }
        Command::Export {
            file,
            output,
            format,
            config,
        } => {
            let pipeline = load_pipeline(&file, config.as_deref())?;
            let output = output.unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME));
            pipeline
                .export_to_path(&output)
                .with_context(|| format!("Failed to export to {}", output.display()))?;

            let summary = pipeline
                .summary()
                .context("pipeline holds no load summary")?;
            let report = ExportReport {
                file: file.display().to_string(),
                output: output.display().to_string(),
                rows_parsed: summary.rows_parsed,
                total_records: pipeline
                    .dataset()
                    .map(|d| d.total_records())
                    .unwrap_or_default(),
                warnings: summary.warnings.clone(),
            };
            match format {
                OutputFormat::Human => formatter::print_export_human(&report),
                OutputFormat::Json => formatter::print_json(&report)?,
            }
        }
    }

    Ok(())
}

fn load_pipeline(file: &std::path::Path, config_path: Option<&std::path::Path>) -> Result<Pipeline> {
    let config = if let Some(path) = config_path {
        PipelineConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?
    } else {
        // Pick up a local config file if one exists.
        let default_config_path = PathBuf::from("acadex.toml");
        if default_config_path.exists() {
            PipelineConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            PipelineConfig::default()
        }
    };

    let mut pipeline = Pipeline::with_config(config);
    pipeline
        .load_path(file)
        .with_context(|| format!("Failed to load file: {}", file.display()))?;
    Ok(pipeline)
}

fn build_stats_report(
    pipeline: &Pipeline,
    file: &std::path::Path,
    indexation: &str,
) -> Result<StatsReport> {
    let dataset = pipeline.dataset().context("pipeline holds no dataset")?;
    let summary = pipeline
        .summary()
        .context("pipeline holds no load summary")?;

    Ok(StatsReport {
        file: file.display().to_string(),
        rows_scanned: summary.rows_scanned,
        rows_parsed: summary.rows_parsed,
        warnings: summary.warnings.clone(),
        summary: dataset
            .summary()
            .into_iter()
            .map(|(category, count)| CategoryCount {
                label: category.summary_label(),
                count,
            })
            .collect(),
        gender: analytics::gender_distribution(&dataset.academic_members),
        degree: analytics::degree_distribution(&dataset.academic_members),
        publication_types: analytics::publication_types(&dataset.publications),
        theses_by_year: analytics::theses_by_year(&dataset.supervised_theses),
        indexation_filter: indexation.to_string(),
        pivot: analytics::publications_by_year(&dataset.publications, indexation),
    })
}
