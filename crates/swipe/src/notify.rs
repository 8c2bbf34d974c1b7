//! Outbound e-mail boundary used by the expiry sweeps.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

pub const EMAIL_SUBJECT: &str = "SWIPE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Email {
    pub fn notice(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: EMAIL_SUBJECT.to_string(),
            body: body.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
    #[error("recipient rejected: {0}")]
    Rejected(String),
}

/// Mail transport hook (SMTP relay, provider API, or a log sink).
pub trait Mailer: Send + Sync {
    fn send(&self, email: Email) -> Result<(), MailError>;
}

/// Emits each message as a structured log line instead of delivering it.
#[derive(Debug, Clone)]
pub struct TracingMailer {
    sender: String,
}

impl TracingMailer {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

impl Mailer for TracingMailer {
    fn send(&self, email: Email) -> Result<(), MailError> {
        tracing::info!(
            from = %self.sender,
            to = %email.to,
            subject = %email.subject,
            body = %email.body,
            "outbound e-mail"
        );
        Ok(())
    }
}

/// Collects messages in memory; handy for demos and tests.
#[derive(Debug, Clone, Default)]
pub struct OutboxMailer {
    sent: Arc<Mutex<Vec<Email>>>,
}

impl OutboxMailer {
    pub fn sent(&self) -> Vec<Email> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

impl Mailer for OutboxMailer {
    fn send(&self, email: Email) -> Result<(), MailError> {
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| MailError::Transport("outbox lock poisoned".to_string()))?;
        sent.push(email);
        Ok(())
    }
}

impl<M: Mailer + ?Sized> Mailer for Arc<M> {
    fn send(&self, email: Email) -> Result<(), MailError> {
        (**self).send(email)
    }
}
