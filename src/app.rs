use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::dispatch::{Dispatch, Dispatcher, Mailer};
use crate::error::{AppError, DispatchError};
use crate::model::{Invoice, QUANTITY};
use crate::render;

/// Inputs of one invocation.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub number: Option<String>,
    pub reference_date: NaiveDate,
    pub adjust_amount: Option<f64>,
    pub send_email: bool,
    pub out_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailOutcome {
    Skipped,
    Sent,
    Failed(String),
}

#[derive(Debug)]
pub struct RunReport {
    pub invoice: Invoice,
    pub artifact: PathBuf,
    pub email: EmailOutcome,
}

pub struct App {
    config: AppConfig,
    mailer: Arc<dyn Mailer>,
}

impl App {
    pub fn new(config: AppConfig, mailer: Arc<dyn Mailer>) -> Self {
        Self { config, mailer }
    }

    /// Builds, renders and (optionally) emails one invoice.
    ///
    /// Config, date and render problems abort the run. Email problems are
    /// logged and reported in [`RunReport::email`] only.
    pub async fn run(&self, options: RunOptions) -> Result<RunReport, AppError> {
        let billing = self.config.billing()?;
        check_adjustment(options.adjust_amount, billing.rate)?;

        if options.number.is_none() {
            warn!("no invoice number given; the file will be named after a placeholder");
        }

        let invoice = Invoice::build(
            options.reference_date,
            options.number,
            options.adjust_amount,
            &billing,
        );
        info!(
            number = invoice.number_label(),
            date = invoice.date(),
            amount = invoice.amount(),
            "invoice built"
        );

        let artifact = render::render_to_file(&invoice, &options.out_dir)?;

        let dispatcher = Dispatcher::new(Arc::clone(&self.mailer), self.config.email.clone());
        let email = match dispatcher.dispatch(invoice.number_label(), &artifact, options.send_email)
        {
            Ok(Dispatch::Skipped) => EmailOutcome::Skipped,
            Ok(Dispatch::Pending(handle)) => {
                let result = handle
                    .await
                    .unwrap_or_else(|e| Err(DispatchError::Task(e.to_string())));
                log_dispatch(result)
            }
            Err(e) => log_dispatch(Err(e)),
        };

        Ok(RunReport {
            invoice,
            artifact,
            email,
        })
    }
}

fn check_adjustment(adjust_amount: Option<f64>, rate: f64) -> Result<(), AppError> {
    let Some(adjust) = adjust_amount else {
        return Ok(());
    };
    if !adjust.is_finite() {
        return Err(AppError::InvalidAdjustment(adjust));
    }
    if adjust < 0.0 {
        return Err(AppError::NegativeAdjustment(adjust));
    }
    let gross = f64::from(QUANTITY) * rate;
    if adjust > gross {
        return Err(AppError::NegativeTotal { adjust, gross });
    }
    Ok(())
}

fn log_dispatch(result: Result<(), DispatchError>) -> EmailOutcome {
    match result {
        Ok(()) => {
            info!("invoice email sent");
            EmailOutcome::Sent
        }
        Err(e) => {
            error!(error = %e, "failed to send invoice email");
            EmailOutcome::Failed(e.to_string())
        }
    }
}
