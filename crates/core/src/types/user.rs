//! Authenticated user profile.

use serde::{Deserialize, Serialize};

/// Profile of an authenticated customer.
///
/// Returned by the signup/login endpoints alongside the bearer token and
/// persisted locally so a restored session can render the account header
/// without a network round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-assigned user ID.
    #[serde(alias = "_id")]
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address used as the login identifier.
    pub email: String,
}

impl User {
    /// Full display name, e.g. for an account header.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_accepts_mongo_style_id() {
        let user: User = serde_json::from_str(
            r#"{"_id":"u-1","firstName":"Ada","lastName":"Lovelace","email":"ada@example.com"}"#,
        )
        .unwrap();
        assert_eq!(user.id, "u-1");
        assert_eq!(user.display_name(), "Ada Lovelace");
    }
}
