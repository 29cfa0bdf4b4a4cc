use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Session lifetime from creation
pub const SESSION_TTL_DAYS: i64 = 7;

/// Opaque bearer token correlating requests to an identity.
///
/// `Debug` is redacted so tokens never end up in logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

impl From<String> for SessionToken {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for SessionToken {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Anonymous user bound to a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    #[serde(skip_serializing)]
    pub session_token: SessionToken,
    pub avatar_url: String,
    /// Name assigned by the avatar catalog
    pub character_name: String,
    /// Holder-chosen override
    pub custom_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Identity {
    /// Name shown next to posts and comments
    pub fn display_name(&self) -> &str {
        self.custom_name
            .as_deref()
            .unwrap_or(self.character_name.as_str())
    }

    /// Advisory only; expired sessions still resolve.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn expiry_for(created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + Duration::days(SESSION_TTL_DAYS)
    }
}

/// One (name, avatar) pair from the external avatar catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(rename = "image")]
    pub avatar_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(custom_name: Option<&str>) -> Identity {
        let created_at = Utc::now();
        Identity {
            session_token: SessionToken::new("secret-token"),
            avatar_url: "https://avatars.test/1.jpeg".to_string(),
            character_name: "Rick Sanchez".to_string(),
            custom_name: custom_name.map(str::to_string),
            created_at,
            expires_at: Identity::expiry_for(created_at),
        }
    }

    #[test]
    fn test_display_name_prefers_custom_name() {
        assert_eq!(identity(None).display_name(), "Rick Sanchez");
        assert_eq!(identity(Some("Pickle")).display_name(), "Pickle");
    }

    #[test]
    fn test_session_lasts_seven_days() {
        let id = identity(None);
        assert_eq!(id.expires_at - id.created_at, Duration::days(7));
        assert!(!id.is_expired(id.created_at));
        assert!(id.is_expired(id.expires_at));
    }

    #[test]
    fn test_token_is_never_rendered() {
        let id = identity(None);
        assert!(!format!("{:?}", id).contains("secret-token"));
        let json = serde_json::to_string(&id).unwrap();
        assert!(!json.contains("secret-token"));
    }

    #[test]
    fn test_catalog_entry_decodes_catalog_payload() {
        let entry: CatalogEntry = serde_json::from_str(
            r#"{"id": 1, "name": "Rick Sanchez", "image": "https://cdn.test/1.jpeg", "status": "Alive"}"#,
        )
        .unwrap();
        assert_eq!(entry.name, "Rick Sanchez");
        assert_eq!(entry.avatar_url, "https://cdn.test/1.jpeg");
    }
}
