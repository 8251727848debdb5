//! Shared types used across the codebase

/// API versions served side by side. Both share one set of handlers;
/// v2 additionally puts point-of-interest routes behind the city policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    V1,
    V2,
}

impl ApiVersion {
    pub const ALL: [ApiVersion; 2] = [ApiVersion::V1, ApiVersion::V2];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
        }
    }

    /// Path prefix for the versioned routes, e.g. `/api/v2`
    pub fn prefix(&self) -> String {
        format!("/api/{}", self.as_str())
    }

    pub fn requires_city_policy(&self) -> bool {
        matches!(self, ApiVersion::V2)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().trim_start_matches(['v', 'V']) {
            "1" | "1.0" => Some(ApiVersion::V1),
            "2" | "2.0" => Some(ApiVersion::V2),
            _ => None,
        }
    }
}
