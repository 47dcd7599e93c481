use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Tags shared by every row of one uploaded tournament
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTags {
    pub league: String,
    pub tournament: String,
    pub date: String,
}

/// One player's performance in one tournament, as uploaded
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub name: String,
    pub secondary_token: Option<String>,
    pub username: Option<String>,
    /// Raw cell text, checked against the points policy when scored
    pub points: Option<String>,
    pub rank: Option<u32>,
    pub tags: BatchTags,
}

impl ResultRow {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            secondary_token: None,
            username: None,
            points: None,
            rank: None,
            tags: BatchTags::default(),
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.secondary_token = Some(token.to_string());
        self
    }

    pub fn with_points(mut self, points: &str) -> Self {
        self.points = Some(points.to_string());
        self
    }

    pub fn with_username(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self
    }

    pub fn with_tags(mut self, tags: BatchTags) -> Self {
        self.tags = tags;
        self
    }

    /// The secondary token, if present and not blank
    pub fn token(&self) -> Option<&str> {
        present(self.secondary_token.as_deref())
    }
}

/// A result row with its derived and canonical identifiers
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub row: ResultRow,
    pub player_uid: String,
    pub normalized_uid: String,
}

/// Running total of one player in a league's cumulative table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRecord {
    #[serde(rename = "NormalizedUID")]
    pub normalized_uid: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Username")]
    pub username: Option<String>,
    #[serde(rename = "Points")]
    pub points: f64,
}

/// A normalized row with its points resolved, kept for snapshot standings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(rename = "League")]
    pub league: String,
    #[serde(rename = "Tournament")]
    pub tournament: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "NormalizedUID")]
    pub normalized_uid: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Username")]
    pub username: Option<String>,
    #[serde(rename = "SecondaryToken")]
    pub secondary_token: Option<String>,
    #[serde(rename = "Points")]
    pub points: f64,
    #[serde(rename = "Rank")]
    pub rank: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub name: String,
    pub created_at: Option<NaiveDateTime>,
}

/// Treats blank strings as absent
pub fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Everything stored for one league
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeagueTables {
    pub standings: Vec<StandingRecord>,
    pub history: Vec<HistoryRecord>,
}
