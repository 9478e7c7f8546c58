//! Domain records served to the frontend
//!
//! Every record is built fresh from one realm reply and serialized once;
//! nothing here is cached or mutated after construction.

use serde::{Deserialize, Serialize};

/// A bounty as stored by the realm
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounty {
    /// Taken from the query key, never from the payload
    pub id: String,
    pub title: String,
    pub issue_url: String,
    pub description: String,
    /// Decimal digit string (ugnot)
    pub amount: String,
    pub creator: String,
    /// Placeholder, never populated
    pub created_at: String,
    pub is_claimed: bool,
    pub claimer: String,
    /// Placeholder, never populated
    pub claimed_at: String,
}

/// Review state of an application (realm enum codes 0/1/2)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    #[default]
    Unknown,
}

impl ApplicationStatus {
    pub fn from_code(code: &str) -> Self {
        match code {
            "0" => Self::Pending,
            "1" => Self::Approved,
            "2" => Self::Rejected,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BountyApplication {
    pub id: String,
    pub bounty_id: String,
    pub applicant: String,
    pub pr_link: String,
    /// Placeholder, never populated
    pub applied_at: String,
    pub status: ApplicationStatus,
    /// Only attached to pending applications
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub address: String,
    pub bounties_created: u64,
    pub bounties_applied: u64,
    pub validations_performed: u64,
    pub score: u64,
}

/// An application seen from the applicant's dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserApplication {
    #[serde(flatten)]
    pub application: BountyApplication,
    pub bounty_title: String,
    pub bounty_amount: String,
}

/// Sort key for ids that are decimal strings; unparsable ids sort last
pub fn numeric_id(id: &str) -> u64 {
    id.parse().unwrap_or(0)
}
