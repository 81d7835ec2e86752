//! Command-line front end for converting work instruction sheets.
//!
//! # Usage
//!
//! Convert a sheet into the bulk archive:
//! ```sh
//! bindline convert work_instructions.xlsx -o out/
//! ```
//!
//! Write loose XML records only, without the width rule:
//! ```sh
//! bindline convert work_instructions.csv -o out/ --xml-only --no-adjust
//! ```
//!
//! Preview what a sheet will produce:
//! ```sh
//! bindline inspect work_instructions.csv
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bindline::common::format_number;
use bindline::export::{self, SkipReason};
use bindline::render::{DataMatrixPdfRenderer, PageLayout};
use bindline::{PipelineConfig, Session, Table};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Convert work instruction sheets into XML records and DataMatrix barcodes
#[derive(Parser, Debug)]
#[command(name = "bindline", version, about, long_about = None)]
struct Args {
    /// Show per-row detail in the log
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a sheet and write the results
    Convert {
        /// Input sheet (.csv, .tsv, .txt, .xlsx, .xls, .xlsb, .ods)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// YAML configuration file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Do not apply the production-route width rule
        #[arg(long)]
        no_adjust: bool,

        /// Write loose XML files instead of the archive
        #[arg(long)]
        xml_only: bool,
    },
    /// Print a preview of the records a sheet produces
    Inspect {
        /// Input sheet
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// YAML configuration file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match args.command {
        Command::Convert {
            input,
            output,
            config,
            no_adjust,
            xml_only,
        } => {
            let mut config = load_config(config.as_deref())?;
            if no_adjust {
                config = config.with_production_rule(false);
            }
            let session = load_session(&input, config)?;
            convert(&session, &output, xml_only).await?;
        },
        Command::Inspect { input, config } => {
            let session = load_session(&input, load_config(config.as_deref())?)?;
            print_preview(&session);
        },
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> bindline::Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_yaml_file(path),
        None => Ok(PipelineConfig::default()),
    }
}

fn load_session(input: &Path, config: PipelineConfig) -> bindline::Result<Session> {
    let table = Table::open_with_config(input, config.text_config()?)?;
    info!(path = %input.display(), rows = table.len(), "sheet read");
    Ok(Session::load(table, config))
}

async fn convert(session: &Session, output: &Path, xml_only: bool) -> bindline::Result<()> {
    if session.is_empty() {
        println!("No data rows found, nothing written.");
        return Ok(());
    }

    if xml_only {
        let written = export::write_xml_files(session, output).await?;
        println!("Wrote {} XML files to {}", written.len(), output.display());
        return Ok(());
    }

    tokio::fs::create_dir_all(output).await?;
    let renderer = Arc::new(DataMatrixPdfRenderer::new(PageLayout::default()));
    let bundle = export::export_archive(session, renderer).await?;
    let path = bundle.write_to_dir(output).await?;

    let report = &bundle.report;
    println!(
        "Wrote {} ({} XML files, {} barcodes)",
        path.display(),
        report.xml_files,
        report.barcode_files
    );
    for skipped in &report.skipped {
        let reason = match &skipped.reason {
            SkipReason::Ineligible => "no valid barcode data".to_string(),
            SkipReason::RenderFailed(err) => format!("rendering failed: {}", err),
            SkipReason::XmlUnavailable => "XML record unavailable".to_string(),
        };
        println!("  skipped row {} ({}): {}", skipped.row + 1, skipped.wi_number, reason);
    }
    Ok(())
}

fn print_preview(session: &Session) {
    let marker = format!(" (+{})", format_number(session.config().rule.width_increment));

    let mut lines = vec![[
        "WI Number".to_string(),
        "ISBN".to_string(),
        "Title".to_string(),
        "Production Route".to_string(),
        "Trim Width".to_string(),
        "Barcode".to_string(),
    ]];
    for (index, (xml, barcode)) in session
        .xml_records()
        .iter()
        .zip(session.barcode_records())
        .enumerate()
    {
        let mut trim_width = xml.trim_width.clone();
        if session.is_adjusted(index) {
            trim_width.push_str(&marker);
        }
        let payload = barcode
            .payload
            .as_ref()
            .map_or_else(|| "N/A".to_string(), |p| p.to_string());
        lines.push([
            xml.wi_number.clone(),
            xml.isbn.clone(),
            xml.title.clone(),
            xml.production_route.clone(),
            trim_width,
            payload,
        ]);
    }

    let mut widths = [0usize; 6];
    for line in &lines {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }
    for line in &lines {
        let cells: Vec<String> = line
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }
    println!(
        "\n{} rows, {} adjusted, {} barcodes",
        session.len(),
        session.adjusted_rows().len(),
        session.eligible_barcodes().count()
    );
}
