use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::task::{LegacyStatus, OrganizationId};

pub type ColumnId = String;

/// Title and colour of the columns every new board starts with.
pub const DEFAULT_COLUMNS: [(&str, &str); 4] = [
    ("To Do", "gray"),
    ("In Progress", "blue"),
    ("Review", "yellow"),
    ("Done", "green"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub organization_id: OrganizationId,
    pub title: String,
    pub position: i32,
    #[serde(default = "default_color")]
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_color() -> String {
    "gray".to_string()
}

impl Column {
    pub fn new(organization_id: OrganizationId, title: String, position: i32, color: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id,
            title,
            position,
            color,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn defaults(organization_id: &str) -> Vec<Self> {
        DEFAULT_COLUMNS
            .iter()
            .enumerate()
            .map(|(i, (title, color))| {
                Self::new(
                    organization_id.to_string(),
                    title.to_string(),
                    i as i32,
                    color.to_string(),
                )
            })
            .collect()
    }

    pub fn rename(&mut self, title: String) {
        self.title = title;
        self.updated_at = Utc::now();
    }

    pub fn update_position(&mut self, position: i32) {
        self.position = position;
        self.updated_at = Utc::now();
    }

    /// The legacy status a task takes on when it lands in this column.
    /// Only set when the slugified title is exactly a canonical status, so
    /// "Review" maps but "To Do" (`to-do`) and "D.O.N.E" do not.
    pub fn legacy_status(&self) -> Option<LegacyStatus> {
        LegacyStatus::from_slug(&slugify(&self.title))
    }

    /// Whether a task's legacy status places it in this column.
    pub fn matches_status(&self, status: &str) -> bool {
        if self.id == status {
            return true;
        }
        let key = normalize_key(status);
        !key.is_empty() && key == normalize_key(&self.title)
    }
}

/// Lowercase with whitespace runs collapsed to single hyphens.
pub fn slugify(title: &str) -> String {
    title
        .split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Lowercase alphanumerics only. Used to compare labels that differ in
/// casing or separators.
pub fn normalize_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("In Progress"), "in-progress");
        assert_eq!(slugify("  QA   Sign Off "), "qa-sign-off");
        assert_eq!(slugify("Done"), "done");
    }

    #[test]
    fn test_defaults_are_dense() {
        let cols = Column::defaults("org");
        let titles: Vec<_> = cols.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["To Do", "In Progress", "Review", "Done"]);
        let positions: Vec<_> = cols.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_legacy_status_for_default_titles() {
        let cols = Column::defaults("org");
        let statuses: Vec<_> = cols.iter().map(|c| c.legacy_status()).collect();
        assert_eq!(
            statuses,
            vec![
                None,
                Some(LegacyStatus::InProgress),
                Some(LegacyStatus::Review),
                Some(LegacyStatus::Done),
            ]
        );

        let custom = Column::new("org".into(), "Blocked".into(), 4, "red".into());
        assert_eq!(custom.legacy_status(), None);
    }

    #[test]
    fn test_legacy_status_needs_exact_slug() {
        let status =
            |title: &str| Column::new("org".into(), title.into(), 0, "gray".into()).legacy_status();
        assert_eq!(status("  DONE "), Some(LegacyStatus::Done));
        assert_eq!(status("todo"), Some(LegacyStatus::Todo));
        assert_eq!(status("D.O.N.E"), None);
        assert_eq!(status("In_Progress"), None);
    }

    #[test]
    fn test_matches_status_by_id_or_title() {
        let mut col = Column::new("org".into(), "In Progress".into(), 1, "blue".into());
        assert!(col.matches_status("in-progress"));
        assert!(!col.matches_status("review"));

        col.id = "todo".to_string();
        col.title = "Backlog".to_string();
        assert!(col.matches_status("todo"));
        assert!(!col.matches_status(""));
    }
}
