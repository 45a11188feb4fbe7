// ─── Offline Session ───
// Username → stable synthetic identity for launching without an account.

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_USERNAME: &str = "Player";
pub const OFFLINE_ACCESS_TOKEN: &str = "00000000-0000-0000-0000-000000000000";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LaunchAccountProfile {
    pub username: String,
    pub uuid: String,
    pub access_token: String,
    pub xuid: String,
    pub user_type: String,
    pub client_id: String,
}

impl Default for LaunchAccountProfile {
    fn default() -> Self {
        Self::offline(DEFAULT_USERNAME)
    }
}

impl LaunchAccountProfile {
    /// Offline session. The same username always yields the same uuid.
    pub fn offline(username: &str) -> Self {
        let username = match username.trim() {
            "" => DEFAULT_USERNAME,
            name => name,
        };
        let uuid = offline_uuid(username);
        debug!("Offline session for {} ({})", username, uuid);

        Self {
            username: username.to_string(),
            uuid: uuid.to_string(),
            access_token: OFFLINE_ACCESS_TOKEN.into(),
            xuid: "0".into(),
            user_type: "legacy".into(),
            client_id: "0".into(),
        }
    }

    /// Fill blank fields of a deserialized profile with offline placeholders.
    pub fn sanitized(mut self) -> Self {
        if self.username.trim().is_empty() {
            self.username = DEFAULT_USERNAME.into();
        }
        if self.uuid.trim().is_empty() {
            self.uuid = offline_uuid(&self.username).to_string();
        }
        if self.access_token.trim().is_empty() {
            self.access_token = OFFLINE_ACCESS_TOKEN.into();
        }
        if self.xuid.trim().is_empty() {
            self.xuid = "0".into();
        }
        if self.user_type.trim().is_empty() {
            self.user_type = "legacy".into();
        }
        if self.client_id.trim().is_empty() {
            self.client_id = "0".into();
        }
        self
    }
}

/// Name-based (version 3, MD5) uuid of `OfflinePlayer:<username>`, the id
/// vanilla servers assign offline players.
pub fn offline_uuid(username: &str) -> Uuid {
    let digest = Md5::digest(format!("OfflinePlayer:{}", username).as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest);
    uuid::Builder::from_md5_bytes(bytes).into_uuid()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_uuid_is_stable_and_versioned() {
        let a = LaunchAccountProfile::offline("Notch");
        let b = LaunchAccountProfile::offline("Notch");
        assert_eq!(a.uuid, b.uuid);

        let parsed = Uuid::parse_str(&a.uuid).unwrap();
        assert_eq!(parsed.get_version_num(), 3);
        assert_ne!(a.uuid, LaunchAccountProfile::offline("Jeb").uuid);
    }

    #[test]
    fn offline_uuid_matches_known_value() {
        // Same derivation as Java's UUID.nameUUIDFromBytes("OfflinePlayer:Notch").
        assert_eq!(
            offline_uuid("Notch").to_string(),
            "b50ad385-829d-3141-a216-7e7d7539ba7f"
        );
    }

    #[test]
    fn session_carries_offline_placeholders() {
        let session = LaunchAccountProfile::offline("  Steve ");
        assert_eq!(session.username, "Steve");
        assert_eq!(session.user_type, "legacy");
        assert_eq!(session.access_token, OFFLINE_ACCESS_TOKEN);
        assert_eq!(session.xuid, "0");
        assert_eq!(session.client_id, "0");
    }

    #[test]
    fn blank_username_becomes_player() {
        assert_eq!(LaunchAccountProfile::offline("   ").username, "Player");

        let blank = LaunchAccountProfile {
            username: String::new(),
            uuid: String::new(),
            access_token: String::new(),
            xuid: String::new(),
            user_type: String::new(),
            client_id: String::new(),
        }
        .sanitized();
        assert_eq!(blank, LaunchAccountProfile::offline("Player"));
    }
}
