use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use tracing::{debug, info};

use timesheet_invoice::dates::parse_reference_date;
use timesheet_invoice::{App, AppConfig, EmailOutcome, RunOptions, SmtpMailer, init_tracing};

// ==========================================
// CLI
// ==========================================

#[derive(Parser)]
#[command(name = "timesheet-invoice", version, about = "Generate and email the recurring timesheet invoice")]
struct Cli {
    /// Invoice number, used in the title and the file name
    #[arg(short, long)]
    number: Option<String>,

    /// Reference date (YYYY-MM-DD); defaults to today
    #[arg(short, long)]
    date: Option<String>,

    /// Amount subtracted from the total; must be between 0 and the gross amount
    #[arg(short, long, allow_negative_numbers = true)]
    adjust: Option<f64>,

    /// Write the PDF but do not email it
    #[arg(long)]
    no_email: bool,

    /// Config file (defaults to the per-user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the PDF is written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

// ==========================================
// Main Function
// ==========================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "loaded .env");
    }

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_env()?;

    let reference_date = match cli.date.as_deref() {
        Some(raw) => parse_reference_date(raw)?,
        None => Local::now().date_naive(),
    };

    let mailer = Arc::new(SmtpMailer::new(config.email.clone()));
    let app = App::new(config, mailer);

    let report = app
        .run(RunOptions {
            number: cli.number,
            reference_date,
            adjust_amount: cli.adjust,
            send_email: !cli.no_email,
            out_dir: cli.out_dir,
        })
        .await
        .context("invoice run failed")?;

    info!(path = %report.artifact.display(), "done");
    println!("✅ PDF Generated: {}", report.artifact.display());
    match &report.email {
        EmailOutcome::Sent => println!("📧 Emailed invoice #{}", report.invoice.number_label()),
        EmailOutcome::Failed(reason) => eprintln!("⚠️  Invoice not emailed: {reason}"),
        EmailOutcome::Skipped => {}
    }
    Ok(())
}
