pub mod policy;
pub mod users;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthenticationConfig;

pub use policy::CityPolicy;
pub use users::{CityInfoUser, DemoUserStore, UserStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub given_name: String,
    pub family_name: String,
    /// City the caller claims to live in; absent on tokens minted elsewhere
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("{0}")]
    Invalid(String),
}

/// Signs and validates HS256 bearer tokens with the configured key, issuer and audience
#[derive(Clone)]
pub struct TokenIssuer {
    secret: Vec<u8>,
    issuer: String,
    audience: String,
    lifetime: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn from_config(config: &AuthenticationConfig) -> Self {
        Self {
            secret: config.secret_for_key.as_bytes().to_vec(),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            lifetime: Duration::minutes(config.token_lifetime_minutes),
        }
    }

    pub fn claims_for(&self, user: &CityInfoUser) -> Claims {
        let now = Utc::now();
        Claims {
            sub: user.user_id.to_string(),
            given_name: user.first_name.clone(),
            family_name: user.last_name.clone(),
            city: Some(user.city.clone()),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        }
    }

    pub fn issue(&self, user: &CityInfoUser) -> Result<String, JwtError> {
        self.encode(&self.claims_for(user))
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        if self.secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        let encoding_key = EncodingKey::from_secret(&self.secret);
        encode(&Header::new(Algorithm::HS256), claims, &encoding_key)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Checks signature, expiry, not-before, issuer and audience
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        if self.secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_nbf = true;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map(|data| data.claims)
            .map_err(|e| JwtError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn issuer() -> TokenIssuer {
        TokenIssuer::from_config(&AppConfig::development().authentication)
    }

    #[test]
    fn issued_token_round_trips_with_demo_claims() {
        let issuer = issuer();
        let user = DemoUserStore.validate_credentials(Some("kevin"), Some("anything")).unwrap();
        let token = issuer.issue(&user).unwrap();

        let claims = issuer.validate(&token).unwrap();
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.given_name, "Kevin");
        assert_eq!(claims.family_name, "Dockx");
        assert_eq!(claims.city.as_deref(), Some("Antwerp"));
        assert_eq!(claims.aud, "cityinfoapi");
    }

    #[test]
    fn token_expires_one_hour_after_issue() {
        let claims = issuer().claims_for(&DemoUserStore::demo_user("kevin"));
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.nbf, claims.iat);
    }

    #[test]
    fn rejects_token_signed_with_another_key() {
        let mut other_config = AppConfig::development().authentication;
        other_config.secret_for_key = "a-completely-different-secret-of-enough-length".to_string();
        let foreign = TokenIssuer::from_config(&other_config)
            .issue(&DemoUserStore::demo_user("kevin"))
            .unwrap();

        assert!(matches!(issuer().validate(&foreign), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn rejects_wrong_audience_and_expired_tokens() {
        let issuer = issuer();
        let user = DemoUserStore::demo_user("kevin");

        let mut claims = issuer.claims_for(&user);
        claims.aud = "someone-else".to_string();
        let token = issuer.encode(&claims).unwrap();
        assert!(issuer.validate(&token).is_err());

        let mut claims = issuer.claims_for(&user);
        claims.iat -= 7200;
        claims.nbf -= 7200;
        claims.exp -= 7200;
        let token = issuer.encode(&claims).unwrap();
        assert!(issuer.validate(&token).is_err());
    }

    #[test]
    fn empty_secret_cannot_sign() {
        let mut config = AppConfig::development().authentication;
        config.secret_for_key.clear();
        let issuer = TokenIssuer::from_config(&config);
        assert!(matches!(
            issuer.issue(&DemoUserStore::demo_user("kevin")),
            Err(JwtError::InvalidSecret)
        ));
    }
}
