//! Notification sink invoked after order creation.
//!
//! The sink is fire-and-forget from the caller's perspective: delivery
//! failures are the caller's to log, never to propagate into the response.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, subject: &str, body: &str, recipient: &str) -> anyhow::Result<()>;
}

/// Delivers notifications over an implicit-TLS SMTP relay.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(host: &str, port: u16, user: String, pass: String) -> anyhow::Result<Self> {
        let from: Mailbox = user.parse()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
            .port(port)
            .credentials(Credentials::new(user, pass))
            .build();
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, subject: &str, body: &str, recipient: &str) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient.parse()?)
            .subject(subject)
            .body(body.to_string())?;
        self.transport.send(message).await?;
        Ok(())
    }
}

/// Records notifications in the log instead of delivering them. Used when
/// SMTP is not configured, and in tests.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, subject: &str, _body: &str, recipient: &str) -> anyhow::Result<()> {
        info!(%subject, %recipient, "notification logged (smtp not configured)");
        Ok(())
    }
}
