//! The `Link` entity: typed, directed edges between memories (spec §3, §4.6).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CortexError, CortexResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Related,
    Contradicts,
    Supports,
    Supersedes,
    Refines,
    References,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Related => "related",
            Self::Contradicts => "contradicts",
            Self::Supports => "supports",
            Self::Supersedes => "supersedes",
            Self::Refines => "refines",
            Self::References => "references",
        }
    }

    pub fn parse(s: &str) -> CortexResult<Self> {
        match s {
            "related" => Ok(Self::Related),
            "contradicts" => Ok(Self::Contradicts),
            "supports" => Ok(Self::Supports),
            "supersedes" => Ok(Self::Supersedes),
            "refines" => Ok(Self::Refines),
            "references" => Ok(Self::References),
            other => Err(CortexError::Validation(format!(
                "unknown relationship: {other}"
            ))),
        }
    }
}

impl Default for Relationship {
    fn default() -> Self {
        Self::Related
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub id: i64,
    pub source_id: i64,
    pub target_id: i64,
    pub relationship: Relationship,
    pub strength: f64,
    pub created_at: DateTime<Utc>,
}
