use serde::{Deserialize, Serialize};

/// Identity resolved from a successful credential check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityInfoUser {
    pub user_id: i32,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
}

/// Resolves credentials to a user. Returns `None` when they are rejected.
pub trait UserStore: Send + Sync {
    fn validate_credentials(&self, user_name: Option<&str>, password: Option<&str>) -> Option<CityInfoUser>;
}

/// Demo-only store: any non-empty user name with any password is accepted and
/// resolves to the same fixed identity. Replace before exposing the API.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoUserStore;

impl DemoUserStore {
    pub fn demo_user(user_name: &str) -> CityInfoUser {
        CityInfoUser {
            user_id: 1,
            user_name: user_name.to_string(),
            first_name: "Kevin".to_string(),
            last_name: "Dockx".to_string(),
            city: "Antwerp".to_string(),
        }
    }
}

impl UserStore for DemoUserStore {
    fn validate_credentials(&self, user_name: Option<&str>, _password: Option<&str>) -> Option<CityInfoUser> {
        let user_name = user_name.map(str::trim).filter(|name| !name.is_empty())?;
        Some(Self::demo_user(user_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_non_empty_user_name_is_accepted() {
        let store = DemoUserStore;
        for (user, password) in [("kevin", Some("secret")), ("someone", None), ("x", Some(""))] {
            let resolved = store.validate_credentials(Some(user), password).unwrap();
            assert_eq!(resolved.user_name, user);
            assert_eq!(resolved.city, "Antwerp");
        }
    }

    #[test]
    fn empty_user_name_is_rejected() {
        let store = DemoUserStore;
        assert!(store.validate_credentials(None, Some("secret")).is_none());
        assert!(store.validate_credentials(Some(""), Some("secret")).is_none());
        assert!(store.validate_credentials(Some("   "), Some("secret")).is_none());
    }
}
