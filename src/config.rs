use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, DispatchError};

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Raw settings as read from `config.toml` and the environment.
///
/// Every field is optional here; [`AppConfig::billing`] and the
/// [`EmailConfig`] accessors decide what a run actually needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: Option<String>,
    pub address: Option<String>,
    pub state: Option<String>,
    pub company: Option<String>,
    pub client_address: Option<String>,
    pub client_state: Option<String>,
    pub rate: Option<f64>,
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub from: Option<String>,
    pub to: Option<String>,
    pub bcc: Option<String>,
    pub smtp_host: Option<String>,
    pub username: Option<String>,
    /// Usually supplied through `EMAIL_SECRET` rather than the file.
    pub secret: Option<String>,
}

/// Party details and rate handed to the invoice builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BillingConfig {
    pub name: String,
    pub address: String,
    pub state: String,
    pub company: String,
    pub client_address: String,
    pub client_state: String,
    pub rate: f64,
}

/// Who the invoice email goes to and comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub from: String,
    pub to: String,
    pub bcc: Option<String>,
}

/// SMTP login, checked to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub username: String,
    pub secret: String,
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "timesheet-invoice", "app")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

impl AppConfig {
    /// Reads `path`, or the per-user default location when `path` is `None`.
    ///
    /// An explicit path must exist; a missing default file yields an empty
    /// config so the environment alone can drive a run.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_config_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !required && !path.exists() {
            debug!(path = %path.display(), "no config file, using environment only");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Overlays process environment variables on top of file values.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Overlays variables from `lookup`; empty values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let strings: [(&str, &mut Option<String>); 12] = [
            ("NAME", &mut self.name),
            ("ADDRESS", &mut self.address),
            ("STATE", &mut self.state),
            ("COMPANY", &mut self.company),
            ("BINST_ADDRESS", &mut self.client_address),
            ("BINST_STATE", &mut self.client_state),
            ("EMAIL_FROM", &mut self.email.from),
            ("EMAIL_TO", &mut self.email.to),
            ("EMAIL_BCC", &mut self.email.bcc),
            ("SMTP_HOST", &mut self.email.smtp_host),
            ("SMTP_USER", &mut self.email.username),
            ("EMAIL_SECRET", &mut self.email.secret),
        ];
        for (key, slot) in strings {
            if let Some(value) = get(key) {
                *slot = Some(value);
            }
        }

        if let Some(raw) = get("RATE") {
            let rate = raw.trim().parse::<f64>().map_err(|_| ConfigError::InvalidNumber {
                var: "RATE",
                value: raw.clone(),
            })?;
            self.rate = Some(rate);
        }
        Ok(())
    }

    /// Resolves the builder's inputs. Blank party fields are allowed but warned about.
    ///
    /// The rate must be a finite, non-negative number.
    pub fn billing(&self) -> Result<BillingConfig, ConfigError> {
        let rate = self.rate.ok_or(ConfigError::MissingRate)?;
        if !rate.is_finite() || rate < 0.0 {
            return Err(ConfigError::InvalidNumber {
                var: "rate",
                value: rate.to_string(),
            });
        }

        let field = |label: &str, value: &Option<String>| {
            let value = value.clone().unwrap_or_default();
            if value.trim().is_empty() {
                warn!(field = label, "party field is empty; it will render blank");
            }
            value
        };

        Ok(BillingConfig {
            name: field("name", &self.name),
            address: field("address", &self.address),
            state: field("state", &self.state),
            company: field("company", &self.company),
            client_address: field("client_address", &self.client_address),
            client_state: field("client_state", &self.client_state),
            rate,
        })
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.trim().is_empty())
}

impl EmailConfig {
    pub fn envelope(&self) -> Result<Envelope, DispatchError> {
        Ok(Envelope {
            from: present(&self.from)
                .ok_or(DispatchError::NotConfigured("missing sender address (EMAIL_FROM)"))?,
            to: present(&self.to)
                .ok_or(DispatchError::NotConfigured("missing recipient address (EMAIL_TO)"))?,
            bcc: present(&self.bcc),
        })
    }

    /// SMTP login; the username falls back to the sender address.
    pub fn smtp(&self) -> Result<SmtpSettings, DispatchError> {
        let secret = present(&self.secret)
            .ok_or(DispatchError::NotConfigured("missing credential (EMAIL_SECRET)"))?;
        let username = present(&self.username)
            .or_else(|| present(&self.from))
            .ok_or(DispatchError::NotConfigured("missing SMTP username (SMTP_USER)"))?;

        Ok(SmtpSettings {
            host: present(&self.smtp_host).unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            username,
            secret,
        })
    }
}
