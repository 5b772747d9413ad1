use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use questline_core::{AppConfig, RESET_CODE_TTL_SECS};

use crate::error::ServiceError;

const RESET_SUBJECT: &str = "Your Questline verification code";
const STARTTLS_PORT: u16 = 587;

/// Delivery of password reset codes.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_reset_code(&self, email: &str, code: &str) -> Result<(), ServiceError>;
}

/// Pick the SMTP mailer when `MAIL_USER`/`MAIL_PASS` are set, the log otherwise.
///
/// A sender that cannot be used is logged and falls back to [`LogMailer`].
pub fn mailer_from_config(config: &AppConfig) -> Arc<dyn Mailer> {
    if let (Some(user), Some(pass)) = (config.mail_user.as_deref(), config.mail_pass.as_deref()) {
        match SmtpMailer::new(&config.mail_host, config.mail_port, user, pass) {
            Ok(mailer) => {
                tracing::info!(host = %config.mail_host, port = config.mail_port, "reset codes sent by SMTP");
                return Arc::new(mailer);
            },
            Err(e) => tracing::warn!(error = %e, "SMTP mailer disabled, logging reset codes"),
        }
    }
    Arc::new(LogMailer::new(config.mail_user.clone()))
}

/// Plain-text body of the reset mail.
pub(crate) fn reset_body(code: &str) -> String {
    let minutes = RESET_CODE_TTL_SECS / 60;
    format!(
        "Your verification code is {code}.\n\n\
         It expires in {minutes} minutes. If you did not ask to reset your password, ignore this mail."
    )
}

/// Sends reset codes through an authenticated SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Port 587 negotiates STARTTLS; any other port uses implicit TLS.
    pub fn new(host: &str, port: u16, user: &str, pass: &str) -> Result<Self, ServiceError> {
        let from: Mailbox = user
            .parse()
            .map_err(|e| ServiceError::InvalidInput(format!("MAIL_USER is not a mail address: {e}")))?;
        let builder = if port == STARTTLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        }
        .map_err(|e| ServiceError::Internal(format!("SMTP relay {host}: {e}")))?;

        let transport = builder
            .port(port)
            .credentials(Credentials::new(user.to_owned(), pass.to_owned()))
            .build();
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_reset_code(&self, email: &str, code: &str) -> Result<(), ServiceError> {
        let to: Mailbox = email
            .parse()
            .map_err(|e| ServiceError::InvalidInput(format!("email is not valid: {e}")))?;
        let message = lettre::Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(RESET_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(reset_body(code))
            .map_err(|e| ServiceError::Internal(format!("building reset mail: {e}")))?;

        self.transport.send(message).await.map_err(|e| {
            tracing::warn!(to = %email, error = %e, "reset mail delivery failed");
            ServiceError::Internal(format!("sending reset mail: {e}"))
        })?;
        tracing::info!(to = %email, "reset code mailed");
        Ok(())
    }
}

/// Writes reset codes to the log instead of sending mail.
#[derive(Debug, Clone, Default)]
pub struct LogMailer {
    sender: Option<String>,
}

impl LogMailer {
    #[must_use]
    pub const fn new(sender: Option<String>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_reset_code(&self, email: &str, code: &str) -> Result<(), ServiceError> {
        match &self.sender {
            Some(sender) => tracing::info!(
                from = %sender,
                to = %email,
                code = %code,
                "password reset code (MAIL_PASS not set, logged instead)"
            ),
            None => tracing::info!(to = %email, code = %code, "password reset code"),
        }
        Ok(())
    }
}
