use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::task::OrganizationId;

pub type MemberId = String;
pub type UserId = String;

/// Palette new members pick their avatar colour from.
pub const MEMBER_COLORS: [&str; 8] = [
    "#3B82F6", "#EF4444", "#10B981", "#F59E0B", "#8B5CF6", "#06B6D4", "#EC4899", "#14B8A6",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Admin,
    #[default]
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: MemberId,
    pub organization_id: OrganizationId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub initials: String,
    pub color: String,
    #[serde(default)]
    pub role: MemberRole,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl TeamMember {
    pub fn new(organization_id: OrganizationId, name: String, email: Option<String>) -> Self {
        let now = Utc::now();
        let initials = Self::derive_initials(&name);
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id,
            user_id: None,
            name,
            email,
            initials,
            color: MEMBER_COLORS[0].to_string(),
            role: MemberRole::Member,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// First letter of each word, upper-cased, at most three letters.
    pub fn derive_initials(name: &str) -> String {
        name.split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(|c| c.to_uppercase())
            .take(3)
            .collect()
    }

    pub fn has_email(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_initials() {
        assert_eq!(TeamMember::derive_initials("ada lovelace"), "AL");
        assert_eq!(
            TeamMember::derive_initials("Jean Luc Picard Enterprise"),
            "JLP"
        );
        assert_eq!(TeamMember::derive_initials("   "), "");
    }

    #[test]
    fn test_new_member_defaults() {
        let m = TeamMember::new("org".into(), "Grace Hopper".into(), None);
        assert_eq!(m.initials, "GH");
        assert_eq!(m.role, MemberRole::Member);
        assert!(m.is_active);
        assert_eq!(serde_json::to_string(&MemberRole::Owner).unwrap(), "\"owner\"");
    }

    #[test]
    fn test_has_email() {
        let mut m = TeamMember::new("org".into(), "Grace".into(), Some(" ".into()));
        assert!(!m.has_email());
        m.email = Some("grace@example.com".into());
        assert!(m.has_email());
    }
}
