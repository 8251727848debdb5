use std::sync::Arc;

use crate::auth::{CityPolicy, DemoUserStore, TokenIssuer, UserStore};
use crate::config::AppConfig;
use crate::database::{CityInfoRepository, CityInfoStore};
use crate::services::{mail_service_from_config, MailService};

/// Shared handles cloned into every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn CityInfoStore>,
    pub tokens: TokenIssuer,
    pub users: Arc<dyn UserStore>,
    pub mail: Arc<dyn MailService>,
    pub city_policy: CityPolicy,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn CityInfoStore>) -> Self {
        let mail = mail_service_from_config(&config.mail);
        Self {
            tokens: TokenIssuer::from_config(&config.authentication),
            city_policy: CityPolicy::new(config.authorization.required_city.clone()),
            users: Arc::new(DemoUserStore),
            mail,
            store,
            config: Arc::new(config),
        }
    }

    pub fn with_mail(mut self, mail: Arc<dyn MailService>) -> Self {
        self.mail = mail;
        self
    }

    /// Fresh repository with an empty staging buffer
    pub fn repository(&self) -> CityInfoRepository {
        CityInfoRepository::new(self.store.clone())
    }
}
