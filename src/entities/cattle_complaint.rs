use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "cattle_complaints")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(skip_deserializing)]
    pub id: Uuid,
    pub reporter_name: String,
    pub reporter_phone: String,
    pub reporter_email: Option<String>,
    pub reporter_location: String,
    pub cattle_count: i32,
    pub cattle_type: String,
    pub cattle_condition: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub photo_path: Option<String>,
    pub spotted_date: DateTime,
    #[sea_orm(column_type = "Text")]
    pub exact_location: String,
    pub gps_latitude: Option<f64>,
    pub gps_longitude: Option<f64>,
    pub nearest_landmark: Option<String>,
    /// Always one of the four `ComplaintStatus` display strings.
    pub status: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// The fixed status vocabulary. Transitions are a free assignment validated
/// only against membership; a closed complaint can be reopened.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ComplaintStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 4] = [
        ComplaintStatus::Open,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
        ComplaintStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Open => "Open",
            ComplaintStatus::InProgress => "In Progress",
            ComplaintStatus::Resolved => "Resolved",
            ComplaintStatus::Closed => "Closed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == value)
    }
}

#[cfg(test)]
mod tests {
    use super::ComplaintStatus;

    #[test]
    fn parses_exactly_the_four_display_strings() {
        assert_eq!(ComplaintStatus::parse("Open"), Some(ComplaintStatus::Open));
        assert_eq!(
            ComplaintStatus::parse("In Progress"),
            Some(ComplaintStatus::InProgress)
        );
        assert_eq!(
            ComplaintStatus::parse("Resolved"),
            Some(ComplaintStatus::Resolved)
        );
        assert_eq!(
            ComplaintStatus::parse("Closed"),
            Some(ComplaintStatus::Closed)
        );
    }

    #[test]
    fn rejects_values_outside_the_vocabulary() {
        assert_eq!(ComplaintStatus::parse("Deleted"), None);
        assert_eq!(ComplaintStatus::parse("open"), None);
        assert_eq!(ComplaintStatus::parse("InProgress"), None);
        assert_eq!(ComplaintStatus::parse(""), None);
    }
}
