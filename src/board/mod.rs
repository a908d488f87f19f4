pub mod filter;
pub mod snapshot;

use chrono::{DateTime, Utc};

/// Columns provisioned for every new board, in display order.
pub const DEFAULT_COLUMNS: [&str; 5] = ["Backlog", "Todo", "In Progress", "Review", "Done"];

pub const MAX_BOARD_NAME: usize = 100;
pub const MAX_COLUMN_NAME: usize = 50;
pub const MAX_CARD_TITLE: usize = 200;

/// A kanban board. Owns its columns; deleting a board cascades.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An ordered stage of a board.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub id: String,
    pub board_id: String,
    pub name: String,
    pub position: i64,
    /// Maximum number of active cards. `None` = unlimited.
    pub wip_limit: Option<u32>,
}

/// Priority levels for cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Next in the cycle urgent, high, medium, low.
    pub fn next(self) -> Self {
        match self {
            Self::Urgent => Self::High,
            Self::High => Self::Medium,
            Self::Medium => Self::Low,
            Self::Low => Self::Urgent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(format!("invalid priority '{other}': use low, medium, high, urgent")),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single kanban card.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: String,
    pub column_id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// Ascending = display order within the column.
    pub position: i64,
    /// Comma-joined label set.
    pub labels: String,
    pub external_ref: Option<String>,
    pub archived_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    pub fn new(id: String, column_id: String, title: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            column_id,
            title,
            description: String::new(),
            priority: Priority::default(),
            position: 0,
            labels: String::new(),
            external_ref: None,
            archived_at: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Labels split on commas, trimmed, empty entries dropped.
    pub fn label_list(&self) -> Vec<&str> {
        self.labels
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect()
    }

    /// Exact, case-insensitive label membership.
    pub fn has_label(&self, label: &str) -> bool {
        let wanted = label.trim().to_lowercase();
        !wanted.is_empty() && self.label_list().iter().any(|l| l.to_lowercase() == wanted)
    }
}

/// Rejected input, detected before any storage call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),
    #[error("{field} cannot exceed {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn validate_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

pub fn validate_board_name(name: &str) -> Result<(), ValidationError> {
    validate_len("board name", name, MAX_BOARD_NAME)
}

pub fn validate_column_name(name: &str) -> Result<(), ValidationError> {
    validate_len("column name", name, MAX_COLUMN_NAME)
}

pub fn validate_card_title(title: &str) -> Result<(), ValidationError> {
    validate_len("card title", title, MAX_CARD_TITLE)
}

/// Parse a WIP limit as typed by the user. Empty or `0` clears the limit.
pub fn parse_wip_limit(input: &str) -> Result<Option<u32>, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<u32>() {
        Ok(0) => Ok(None),
        Ok(n) => Ok(Some(n)),
        Err(_) => Err(ValidationError::Invalid {
            field: "WIP limit",
            reason: format!("'{trimmed}' is not a non-negative integer"),
        }),
    }
}

/// Normalise user-entered labels: trim, drop empties, rejoin with ", ".
pub fn normalize_labels(input: &str) -> String {
    input
        .split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_with_labels(labels: &str) -> Card {
        let mut card = Card::new("c1".into(), "col".into(), "Title".into());
        card.labels = labels.into();
        card
    }

    #[test]
    fn test_priority_parse_case_insensitive() {
        assert_eq!("LOW".parse::<Priority>(), Ok(Priority::Low));
        assert_eq!("Medium".parse::<Priority>(), Ok(Priority::Medium));
        assert_eq!("urgent".parse::<Priority>(), Ok(Priority::Urgent));
        assert!("critical".parse::<Priority>().is_err());
        assert!("".parse::<Priority>().is_err());
    }

    #[test]
    fn test_priority_next_wraps() {
        assert_eq!(Priority::Urgent.next(), Priority::High);
        assert_eq!(Priority::High.next(), Priority::Medium);
        assert_eq!(Priority::Medium.next(), Priority::Low);
        assert_eq!(Priority::Low.next(), Priority::Urgent);
    }

    #[test]
    fn test_label_list_trims_and_drops_empty() {
        assert!(card_with_labels("").label_list().is_empty());
        assert_eq!(card_with_labels(" bug , feature ").label_list(), vec!["bug", "feature"]);
        assert_eq!(card_with_labels("bug,").label_list(), vec!["bug"]);
    }

    #[test]
    fn test_has_label_exact_case_insensitive() {
        let card = card_with_labels("bug, Feature, UI");
        assert!(card.has_label("bug"));
        assert!(card.has_label("BUG"));
        assert!(card.has_label("feature"));
        assert!(!card.has_label("bu"));
        assert!(!card.has_label("backend"));
        assert!(!card.has_label(""));
    }

    #[test]
    fn test_validate_card_title_bounds() {
        assert!(validate_card_title("Fix bug").is_ok());
        assert_eq!(validate_card_title(""), Err(ValidationError::Empty("card title")));
        assert!(validate_card_title(&"a".repeat(200)).is_ok());
        assert!(matches!(
            validate_card_title(&"a".repeat(201)),
            Err(ValidationError::TooLong { max: 200, .. })
        ));
    }

    #[test]
    fn test_validate_names_bounds() {
        assert!(validate_board_name(&"a".repeat(100)).is_ok());
        assert!(validate_board_name(&"a".repeat(101)).is_err());
        assert!(validate_column_name(&"a".repeat(50)).is_ok());
        assert!(validate_column_name(&"a".repeat(51)).is_err());
        assert!(validate_column_name("").is_err());
    }

    #[test]
    fn test_title_length_counts_chars_not_bytes() {
        // 200 multi-byte chars is still a valid title.
        assert!(validate_card_title(&"é".repeat(200)).is_ok());
    }

    #[test]
    fn test_parse_wip_limit() {
        assert_eq!(parse_wip_limit(""), Ok(None));
        assert_eq!(parse_wip_limit("0"), Ok(None));
        assert_eq!(parse_wip_limit(" 3 "), Ok(Some(3)));
        assert!(parse_wip_limit("-1").is_err());
        assert!(parse_wip_limit("many").is_err());
    }

    #[test]
    fn test_normalize_labels() {
        assert_eq!(normalize_labels(" bug,, ui ,"), "bug, ui");
        assert_eq!(normalize_labels(""), "");
    }

    #[test]
    fn test_default_columns() {
        assert_eq!(DEFAULT_COLUMNS, ["Backlog", "Todo", "In Progress", "Review", "Done"]);
    }
}
