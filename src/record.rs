//! Catalog record types: the stored demon, the insert payload, and the alignment set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A demon as persisted, including its store-assigned id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub race: String,
    pub alignment: String,
    #[sqlx(rename = "imageUrl")]
    pub image_url: String,
}

/// Column values for an insert. Absent optional text is stored as an empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub race: String,
    pub alignment: String,
    #[serde(default)]
    pub image_url: String,
}

/// Accepted alignments. Legacy single-axis values and compound values are both valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Law,
    Neutral,
    Chaos,
    Unknown,
    LightLaw,
    DarkChaos,
    NeutralNeutral,
}

impl Alignment {
    pub const ALL: [Alignment; 7] = [
        Alignment::Law,
        Alignment::Neutral,
        Alignment::Chaos,
        Alignment::Unknown,
        Alignment::LightLaw,
        Alignment::DarkChaos,
        Alignment::NeutralNeutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Law => "Law",
            Alignment::Neutral => "Neutral",
            Alignment::Chaos => "Chaos",
            Alignment::Unknown => "unknown",
            Alignment::LightLaw => "Light-Law",
            Alignment::DarkChaos => "Dark-Chaos",
            Alignment::NeutralNeutral => "Neutral-Neutral",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alignment {
    type Err = String;

    /// Exact, case-sensitive match against the accepted spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Alignment::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown alignment '{}'", s))
    }
}
