#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the payroll ledger tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use payroll_ledger_cli_utils::IndicatifProgress;
use payroll_ledger_ingest::{LedgerConfig, process_document, report, run};
use payroll_ledger_ledger::xlsx::XlsxLedger;
use payroll_ledger_ledger::{LedgerStore, Workbook};
use payroll_ledger_pdf::PdfExtractor;

#[derive(Parser)]
#[command(
    name = "payroll_ledger",
    about = "Merges payroll statement PDFs into a per-year workbook ledger"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every PDF in the source directory (the default)
    Run {
        #[command(flatten)]
        paths: PathArgs,
        /// Write the run summary as JSON to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Extract one PDF and print its identity and rows without touching
    /// the ledger
    Inspect {
        /// Path to the PDF
        pdf: PathBuf,
    },
    /// List the sheets of the ledger workbook
    Sheets {
        #[command(flatten)]
        paths: PathArgs,
    },
}

#[derive(Args, Default)]
struct PathArgs {
    /// TOML file with `source_directory` and/or `ledger_path`
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory to scan for PDFs (overrides config and `PAYROLL_LEDGER_SOURCE_DIR`)
    #[arg(long)]
    source_dir: Option<PathBuf>,
    /// Workbook to update (overrides config and `PAYROLL_LEDGER_PATH`)
    #[arg(long)]
    ledger: Option<PathBuf>,
}

impl PathArgs {
    fn resolve(self) -> Result<LedgerConfig, payroll_ledger_ingest::config::ConfigError> {
        LedgerConfig::resolve(self.config.as_deref(), self.source_dir, self.ledger)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = payroll_ledger_cli_utils::init_logger();
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Run {
        paths: PathArgs::default(),
        report: None,
    });

    match command {
        Commands::Run {
            paths,
            report: report_path,
        } => {
            let config = paths.resolve()?;
            let progress = IndicatifProgress::documents_bar(&multi, "Processing statements");

            let summary = run(&config, &PdfExtractor::new(), &progress).inspect_err(|e| {
                log::error!("Aborting run: {e}");
            })?;

            report::log_summary(&summary);
            if let Some(path) = report_path {
                report::write_report(&summary, &path)?;
            }
        }
        Commands::Inspect { pdf } => {
            let processed = process_document(&PdfExtractor::new(), &pdf)?;
            let identity = &processed.identity;

            println!("File:       {}", processed.file);
            println!("Name:       {}", identity.display_name());
            println!("Tax id:     {}", identity.display_tax_id());
            println!("Admission:  {}", identity.display_admission_date());
            println!("Year sheet: {}", identity.year_label());

            match processed.table {
                Some(table) => {
                    println!(
                        "Table:      {} raw row(s), {} normalized",
                        table.raw_rows,
                        table.rows.len()
                    );
                    println!("{}", "-".repeat(50));
                    for row in &table.rows {
                        println!("{}", row.fields().join(" | "));
                    }
                }
                None => println!("Table:      not found"),
            }
        }
        Commands::Sheets { paths } => {
            let config = paths.resolve()?;
            let book = XlsxLedger::new(&config.ledger_path).open()?;
            for name in book.sheet_names() {
                println!("{name}");
            }
        }
    }

    Ok(())
}
