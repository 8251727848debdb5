use crate::middleware::AuthUser;

/// Requires the caller's `city` claim to equal a configured city
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityPolicy {
    pub required_city: String,
}

impl CityPolicy {
    pub const NAME: &'static str = "MustBeFromCity";

    pub fn new(required_city: impl Into<String>) -> Self {
        Self {
            required_city: required_city.into(),
        }
    }

    pub fn allows(&self, user: &AuthUser) -> bool {
        !self.required_city.is_empty() && user.city.as_deref() == Some(self.required_city.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(city: Option<&str>) -> AuthUser {
        AuthUser {
            user_id: "1".to_string(),
            given_name: "Kevin".to_string(),
            family_name: "Dockx".to_string(),
            city: city.map(str::to_string),
        }
    }

    #[test]
    fn allows_only_the_configured_city() {
        let policy = CityPolicy::new("Antwerp");
        assert!(policy.allows(&user(Some("Antwerp"))));
        assert!(!policy.allows(&user(Some("Paris"))));
        assert!(!policy.allows(&user(Some("antwerp"))));
        assert!(!policy.allows(&user(None)));
    }

    #[test]
    fn configured_city_is_not_hard_coded() {
        let policy = CityPolicy::new("Paris");
        assert!(policy.allows(&user(Some("Paris"))));
        assert!(!policy.allows(&user(Some("Antwerp"))));
    }

    #[test]
    fn empty_policy_city_allows_nobody() {
        let policy = CityPolicy::new("");
        assert!(!policy.allows(&user(Some(""))));
        assert!(!policy.allows(&user(None)));
    }
}
