use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the star-count ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortOrder {
    #[default]
    #[value(name = "desc")]
    Descending,
    #[value(name = "asc")]
    Ascending,
}

impl SortOrder {
    pub const ALL: [SortOrder; 2] = [SortOrder::Descending, SortOrder::Ascending];

    pub fn as_api_str(&self) -> &'static str {
        match self {
            SortOrder::Descending => "desc",
            SortOrder::Ascending => "asc",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Descending => SortOrder::Ascending,
            SortOrder::Ascending => SortOrder::Descending,
        }
    }

    /// Position inside [`SortOrder::ALL`], used by the select popup.
    pub fn index(self) -> usize {
        match self {
            SortOrder::Descending => 0,
            SortOrder::Ascending => 1,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Descending => write!(f, "Descendente"),
            SortOrder::Ascending => write!(f, "Ascendente"),
        }
    }
}

/// Repository as returned by `GET /users/{username}/repos`
#[derive(Debug, Clone, Deserialize)]
pub struct RawRepository {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub stargazers_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub stars: u64,
}

impl From<RawRepository> for Repository {
    fn from(raw: RawRepository) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            stars: raw.stargazers_count,
        }
    }
}
