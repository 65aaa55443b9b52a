//! Hobart CLI binary.
//!
//! Builds normalized financial statements from SEC XBRL company facts
//! and verifies previously exported statements against fresh data.

use clap::{Parser, Subcommand};
use hobart_core::{FactStore, FormType, StatementBuilder, Tolerance, VerificationStatus, Verifier};
use hobart_data::{CompanyFacts, EdgarClient, SqliteCache};
use hobart_output::{
    BatchSummary, ExportFormat, Exporter, StatementExport, load_statement, render_console,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process;

/// Cached company-facts payloads older than this are refetched.
const FACTS_MAX_AGE_DAYS: i64 = 7;

#[derive(Parser)]
#[command(name = "hobart")]
#[command(about = "Hobart: normalized financial statements from SEC XBRL data", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and export a statement for a company and fiscal year
    Export {
        /// Stock ticker symbol
        ticker: String,

        /// Fiscal year to build
        #[arg(long)]
        year: i32,

        /// Build from the 10-Q instead of the 10-K
        #[arg(long)]
        quarterly: bool,

        /// Output format (csv, json, pretty-json)
        #[arg(long, default_value = "pretty-json")]
        format: String,

        /// Output directory
        #[arg(long, default_value = ".")]
        output: PathBuf,

        /// Disable caching (always fetch fresh data)
        #[arg(long)]
        no_cache: bool,

        /// Force refresh cached data
        #[arg(long)]
        refresh: bool,
    },

    /// Verify an exported statement against fresh SEC data
    Verify {
        /// Exported statement JSON file
        file: PathBuf,

        /// Relative tolerance component
        #[arg(long, default_value = "0.001")]
        tolerance_relative: f64,

        /// Absolute tolerance component
        #[arg(long, default_value = "0.01")]
        tolerance_absolute: f64,

        /// Disable caching (always fetch fresh data)
        #[arg(long)]
        no_cache: bool,
    },

    /// Verify every exported statement in a directory
    BatchVerify {
        /// Directory of exported statement JSON files
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Markdown summary report path
        #[arg(long, default_value = "batch_verification_summary.md")]
        report: PathBuf,

        /// Relative tolerance component
        #[arg(long, default_value = "0.001")]
        tolerance_relative: f64,

        /// Absolute tolerance component
        #[arg(long, default_value = "0.01")]
        tolerance_absolute: f64,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            ticker,
            year,
            quarterly,
            format,
            output,
            no_cache,
            refresh,
        } => {
            let form = if quarterly {
                FormType::Quarterly
            } else {
                FormType::Annual
            };
            let format = ExportFormat::parse(&format)?;
            export_statement(&ticker, year, form, format, &output, !no_cache, refresh).await?;
        }
        Commands::Verify {
            file,
            tolerance_relative,
            tolerance_absolute,
            no_cache,
        } => {
            let tolerance = Tolerance {
                relative: tolerance_relative,
                absolute: tolerance_absolute,
            };
            let result = verify_file(&file, tolerance, !no_cache).await?;
            if result != VerificationStatus::Pass {
                process::exit(1);
            }
        }
        Commands::BatchVerify {
            dir,
            report,
            tolerance_relative,
            tolerance_absolute,
        } => {
            let tolerance = Tolerance {
                relative: tolerance_relative,
                absolute: tolerance_absolute,
            };
            let all_passed = batch_verify(&dir, &report, tolerance).await?;
            if !all_passed {
                process::exit(1);
            }
        }
    }

    Ok(())
}

/// Open the on-disk cache under the platform cache directory.
fn open_cache() -> Result<SqliteCache, Box<dyn std::error::Error>> {
    let dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hobart");
    std::fs::create_dir_all(&dir)?;
    Ok(SqliteCache::new(dir.join("edgar.db"))?)
}

/// Fetch a company's fact set, through the cache when allowed.
async fn fetch_facts(
    client: &EdgarClient,
    cache: &SqliteCache,
    ticker: &str,
    use_cache: bool,
    refresh: bool,
) -> Result<CompanyFacts, Box<dyn std::error::Error>> {
    let cik = match cache.get_cik(ticker)? {
        Some(cik) if use_cache => cik,
        _ => {
            let cik = client.get_company_cik(ticker).await?;
            cache.put_cik(ticker, &cik, None)?;
            cik
        }
    };
    log::info!("{ticker}: CIK {cik}");

    let cached = if use_cache && !refresh {
        cache.get_company_facts(&cik, FACTS_MAX_AGE_DAYS)?
    } else {
        None
    };

    let raw = match cached {
        Some(raw) => raw,
        None => {
            let raw = client.fetch_company_facts_raw(&cik).await?;
            if use_cache {
                cache.put_company_facts(&cik, &raw)?;
            }
            raw
        }
    };

    Ok(CompanyFacts::parse_json(&raw)?)
}

async fn export_statement(
    ticker: &str,
    year: i32,
    form: FormType,
    format: ExportFormat,
    output: &Path,
    use_cache: bool,
    refresh: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let ticker = ticker.to_uppercase();
    let client = EdgarClient::new()?;
    let cache = open_cache()?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner.set_message(format!("Fetching company facts for {ticker}..."));

    let company = fetch_facts(&client, &cache, &ticker, use_cache, refresh).await?;
    spinner.finish_with_message(format!(
        "Fetched {} facts for {}",
        company.facts.len(),
        company.entity_name
    ));

    let entity_name = company.entity_name.clone();
    let store = FactStore::index(company.facts);
    let statement = StatementBuilder::new(&store).build(year, form)?;

    let export = StatementExport::new(ticker, entity_name, statement);
    let path = output.join(export.file_name(format));
    export.export_to_file(&path, format)?;

    println!(
        "Exported {} FY{} {} statement to {}",
        export.entity_name,
        year,
        form,
        path.display()
    );
    Ok(())
}

async fn verify_file(
    file: &Path,
    tolerance: Tolerance,
    use_cache: bool,
) -> Result<VerificationStatus, Box<dyn std::error::Error>> {
    let export = load_statement(file)?;
    let client = EdgarClient::new()?;
    let cache = open_cache()?;

    let company = fetch_facts(&client, &cache, &export.ticker, use_cache, false).await?;

    // Best effort: show which filing the target period comes from.
    if let Ok(filings) = client.get_company_filings(&company.cik).await
        && let Ok(filing) = filings.find(export.statement.form, export.statement.fiscal_year)
    {
        println!("Filing: {} ({})", filing.accession, filing.form);
        if let Some(date) = filing.filing_date {
            println!("Filed: {date}");
        }
        if let Some(date) = filing.report_date {
            println!("Report date: {date}");
        }
    }

    let fresh = FactStore::index(company.facts);

    let result = Verifier::new(tolerance).verify(&export.statement, &fresh)?;
    print!("{}", render_console(&export.ticker, &result));
    Ok(result.status)
}

async fn batch_verify(
    dir: &Path,
    report: &Path,
    tolerance: Tolerance,
) -> Result<bool, Box<dyn std::error::Error>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(format!("no exported statements found in {}", dir.display()).into());
    }

    let client = EdgarClient::new()?;
    let cache = open_cache()?;
    let verifier = Verifier::new(tolerance);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );

    let mut batch = BatchSummary::default();
    for file in &files {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        pb.set_message(name.clone());

        let export = match load_statement(file) {
            Ok(export) => export,
            Err(e) => {
                log::warn!("{name}: unreadable export: {e}");
                pb.inc(1);
                continue;
            }
        };

        let result = match fetch_facts(&client, &cache, &export.ticker, true, false).await {
            Ok(company) => {
                let fresh = FactStore::index(company.facts);
                verifier
                    .verify(&export.statement, &fresh)
                    .unwrap_or_else(|e| {
                        hobart_core::VerificationResult::fetch_error(
                            export.statement.fiscal_year,
                            export.statement.form,
                            e.to_string(),
                        )
                    })
            }
            Err(e) => hobart_core::VerificationResult::fetch_error(
                export.statement.fiscal_year,
                export.statement.form,
                e.to_string(),
            ),
        };

        batch.push(name, export.ticker, result);
        pb.inc(1);
    }
    pb.finish_with_message("done");

    batch.write_markdown(report)?;

    println!("\nVerified {} statements:", batch.entries.len());
    println!("  Passed: {}", batch.count(VerificationStatus::Pass));
    println!("  Failed: {}", batch.count(VerificationStatus::Fail));
    println!("  Errors: {}", batch.count(VerificationStatus::Error));
    println!("Summary written to {}", report.display());

    Ok(batch.all_passed())
}
