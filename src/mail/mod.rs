use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;

use crate::config::MailConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address {0}")]
    Address(String),
    #[error("failed to build message: {0}")]
    Build(String),
    #[error("SMTP error: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

pub fn reset_link(frontend_url: &str, token: &str) -> String {
    format!("{}/reset-password?token={}", frontend_url.trim_end_matches('/'), token)
}

pub fn password_reset_mail(to: &str, link: &str, ttl_minutes: i64) -> OutgoingMail {
    OutgoingMail {
        to: to.to_string(),
        subject: "Reset your PrepSphere password".to_string(),
        body: format!(
            "We received a request to reset your PrepSphere password.\n\n\
             Open the link below to choose a new one. It expires in {} minutes.\n\n\
             {}\n\n\
             If you did not ask for this, you can ignore this email.\n",
            ttl_minutes, link
        ),
    }
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let from_address = if config.from_address.is_empty() {
            &config.smtp_username
        } else {
            &config.from_address
        };
        let from: Mailbox = from_address
            .parse()
            .map_err(|_| MailError::Address(from_address.to_string()))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.smtp_port)
            .credentials(Credentials::new(config.smtp_username.clone(), config.smtp_password.clone()))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let to: Mailbox = mail.to.parse().map_err(|_| MailError::Address(mail.to.clone()))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body)
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        tracing::info!("Sent mail to {}", mail.to);
        Ok(())
    }
}

/// Used when SMTP is not configured; the mail only reaches the log.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        tracing::warn!(
            "SMTP not configured; mail to {} not sent. Subject: {}\n{}",
            mail.to,
            mail.subject,
            mail.body
        );
        Ok(())
    }
}

pub fn build_mailer(config: &MailConfig) -> Result<Box<dyn Mailer>, MailError> {
    if config.smtp_enabled() {
        Ok(Box::new(SmtpMailer::new(config)?))
    } else {
        Ok(Box::new(LogMailer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_points_at_frontend() {
        assert_eq!(
            reset_link("http://localhost:3003/", "abc-_1"),
            "http://localhost:3003/reset-password?token=abc-_1"
        );
    }

    #[test]
    fn reset_mail_mentions_expiry_and_link() {
        let mail = password_reset_mail("s@example.com", "http://x/reset-password?token=t", 60);
        assert_eq!(mail.to, "s@example.com");
        assert!(mail.body.contains("60 minutes"));
        assert!(mail.body.contains("http://x/reset-password?token=t"));
    }

    #[tokio::test]
    async fn log_mailer_accepts_everything() {
        let mail = password_reset_mail("s@example.com", "http://x", 60);
        assert!(LogMailer.send(mail).await.is_ok());
    }

    #[test]
    fn smtp_mailer_rejects_bad_sender() {
        let config = MailConfig {
            smtp_host: "smtp.example.com".into(),
            smtp_port: 587,
            smtp_username: "not an address".into(),
            smtp_password: "pw".into(),
            from_address: String::new(),
            frontend_url: "http://localhost:3003".into(),
        };
        assert!(matches!(SmtpMailer::new(&config), Err(MailError::Address(_))));
    }
}
