use std::sync::Arc;

use tracing::info;

use crate::config::{MailConfig, MailTransport};

/// Outbound notification channel
pub trait MailService: Send + Sync {
    fn send(&self, subject: &str, message: &str);
}

/// Development transport: writes the mail to the log
#[derive(Debug, Clone)]
pub struct LocalMailService {
    mail_to: String,
    mail_from: String,
}

impl LocalMailService {
    pub fn new(config: &MailConfig) -> Self {
        Self {
            mail_to: config.mail_to.clone(),
            mail_from: config.mail_from.clone(),
        }
    }
}

impl MailService for LocalMailService {
    fn send(&self, subject: &str, message: &str) {
        info!(
            transport = "local",
            from = %self.mail_from,
            to = %self.mail_to,
            subject,
            message,
            "Mail sent"
        );
    }
}

/// Stand-in for a hosted mail provider; records the hand-off in the log
#[derive(Debug, Clone)]
pub struct CloudMailService {
    mail_to: String,
    mail_from: String,
}

impl CloudMailService {
    pub fn new(config: &MailConfig) -> Self {
        Self {
            mail_to: config.mail_to.clone(),
            mail_from: config.mail_from.clone(),
        }
    }
}

impl MailService for CloudMailService {
    fn send(&self, subject: &str, message: &str) {
        info!(
            transport = "cloud",
            from = %self.mail_from,
            to = %self.mail_to,
            subject,
            message,
            "Mail handed to cloud provider"
        );
    }
}

pub fn mail_service_from_config(config: &MailConfig) -> Arc<dyn MailService> {
    match config.transport {
        MailTransport::Local => Arc::new(LocalMailService::new(config)),
        MailTransport::Cloud => Arc::new(CloudMailService::new(config)),
    }
}
