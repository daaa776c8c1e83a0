//! Builds the recurring timesheet invoice, renders it to a one-page PDF and
//! optionally emails it.

pub mod app;
pub mod config;
pub mod currency;
pub mod dates;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod render;

pub use app::{App, EmailOutcome, RunOptions, RunReport};
pub use config::{AppConfig, BillingConfig, EmailConfig};
pub use dispatch::{Dispatcher, Mailer, OutgoingEmail, SmtpMailer};
pub use error::{AppError, ConfigError, DispatchError, InvoiceError, RenderError};
pub use model::Invoice;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs the global `tracing` subscriber; `RUST_LOG` overrides the default level.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("timesheet_invoice=info"));

        fmt().with_env_filter(filter).with_target(false).init();
    });
}
