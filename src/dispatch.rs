use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, Message, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{SmtpTransport, Transport};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::{EmailConfig, Envelope};
use crate::error::DispatchError;

/// A fully addressed invoice email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub bcc: Option<String>,
    pub subject: String,
    pub body: String,
    pub attachment: PathBuf,
}

impl OutgoingEmail {
    /// Subject and body are both "Invoice #{number}".
    pub fn invoice(envelope: &Envelope, number: &str, attachment: &Path) -> Self {
        let subject = format!("Invoice #{number}");
        Self {
            from: envelope.from.clone(),
            to: envelope.to.clone(),
            bcc: envelope.bcc.clone(),
            body: subject.clone(),
            subject,
            attachment: attachment.to_path_buf(),
        }
    }
}

/// The email-sending capability. Implementations may block.
pub trait Mailer: Send + Sync {
    fn send(&self, email: &OutgoingEmail) -> Result<(), DispatchError>;
}

/// Sends through an SMTP relay over TLS.
pub struct SmtpMailer {
    config: EmailConfig,
}

impl SmtpMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<(), DispatchError> {
        let smtp = self.config.smtp()?;
        let message = build_message(email)?;

        let transport = SmtpTransport::relay(&smtp.host)
            .map_err(|e| DispatchError::Transport(format!("invalid SMTP host {}: {e}", smtp.host)))?
            .credentials(Credentials::new(smtp.username, smtp.secret))
            .build();

        debug!(host = %smtp.host, "sending invoice email");
        transport
            .send(&message)
            .map_err(|e| DispatchError::Transport(e.to_string()))?;
        Ok(())
    }
}

fn mailbox(address: &str) -> Result<Mailbox, DispatchError> {
    address.parse().map_err(|e: lettre::address::AddressError| DispatchError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

/// Builds the MIME message: plain-text body plus the PDF as attachment.
pub fn build_message(email: &OutgoingEmail) -> Result<Message, DispatchError> {
    let bytes = fs::read(&email.attachment).map_err(|source| DispatchError::Attachment {
        path: email.attachment.clone(),
        source,
    })?;
    let filename = email
        .attachment
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "invoice.pdf".to_string());
    let content_type = ContentType::parse("application/pdf")
        .map_err(|e| DispatchError::Message(e.to_string()))?;

    let mut builder = Message::builder()
        .from(mailbox(&email.from)?)
        .to(mailbox(&email.to)?)
        .subject(email.subject.clone());
    if let Some(bcc) = &email.bcc {
        builder = builder.bcc(mailbox(bcc)?);
    }

    builder
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(email.body.clone()))
                .singlepart(Attachment::new(filename).body(bytes, content_type)),
        )
        .map_err(|e| DispatchError::Message(e.to_string()))
}

/// What [`Dispatcher::dispatch`] started.
#[derive(Debug)]
pub enum Dispatch {
    /// Sending was disabled; nothing was contacted.
    Skipped,
    /// The send is running on a blocking task.
    Pending(JoinHandle<Result<(), DispatchError>>),
}

pub struct Dispatcher {
    mailer: Arc<dyn Mailer>,
    email: EmailConfig,
}

impl Dispatcher {
    pub fn new(mailer: Arc<dyn Mailer>, email: EmailConfig) -> Self {
        Self { mailer, email }
    }

    /// Emails the rendered invoice when `should_send` is set.
    ///
    /// Must be called inside a tokio runtime. Address problems are reported
    /// before anything is spawned; transport failures come back through the
    /// task handle.
    pub fn dispatch(
        &self,
        number: &str,
        artifact: &Path,
        should_send: bool,
    ) -> Result<Dispatch, DispatchError> {
        if !should_send {
            info!(number, "email disabled, not sending");
            return Ok(Dispatch::Skipped);
        }

        let envelope = self.email.envelope()?;
        let email = OutgoingEmail::invoice(&envelope, number, artifact);
        let mailer = Arc::clone(&self.mailer);

        info!(number, to = %email.to, "emailing invoice");
        Ok(Dispatch::Pending(tokio::task::spawn_blocking(move || {
            mailer.send(&email)
        })))
    }
}
