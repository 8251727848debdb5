pub mod mail_service;

pub use mail_service::{mail_service_from_config, CloudMailService, LocalMailService, MailService};
