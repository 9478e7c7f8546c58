//! Domain mappers
//!
//! Each mapper applies the field decoders at the positions the realm's
//! struct layout fixes and assembles a record. Decoding is two-step: first a
//! `*Fields` struct that keeps every [`Decoded`] outcome, then a flat record
//! where misses become zero values.
//!
//! Parse mismatches never fail a request. At worst a field stays empty, or a
//! record whose identity did not decode is dropped.

use super::fields::{
    addresses, decode_address, decode_amount, decode_claimed, decode_status, decode_string,
    decode_uint, first_number, quoted_strings, Decoded,
};
use super::lexer::Token;
use super::scanner::{Field, Payload, Record, Sequence};
use crate::models::types::{ApplicationStatus, Bounty, BountyApplication, LeaderboardEntry};
use crate::utils::constants::{APPLICATION_MIN_FIELDS, LEADERBOARD_MIN_FIELDS};

// ============================================
// Bounty
// ============================================

/// Decoded bounty fields, before flattening
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BountyFields {
    pub title: Decoded<String>,
    pub issue_url: Decoded<String>,
    pub description: Decoded<String>,
    pub amount: Decoded<String>,
    pub creator: Decoded<String>,
    pub claimer: Decoded<String>,
    pub is_claimed: bool,
}

impl BountyFields {
    pub fn into_bounty(self, id: &str) -> Bounty {
        Bounty {
            id: id.to_string(),
            title: self.title.unwrap_or_default(),
            issue_url: self.issue_url.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            amount: self.amount.unwrap_or_default(),
            creator: self.creator.unwrap_or_default(),
            created_at: String::new(),
            is_claimed: self.is_claimed,
            claimer: self.claimer.unwrap_or_default(),
            claimed_at: String::new(),
        }
    }
}

/// Strategy for pulling bounty fields out of a whole reply
pub trait BountyDecoder {
    fn decode(&self, tokens: &[Token<'_>]) -> BountyFields;
}

/// Order-based extraction over the entire record: the first three quoted
/// strings are title, issue URL and description; the first and second
/// address-shaped tokens are creator and claimer.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalScan;

impl BountyDecoder for GlobalScan {
    fn decode(&self, tokens: &[Token<'_>]) -> BountyFields {
        let strings: Vec<String> = quoted_strings(tokens).take(3).map(|s| s.into_owned()).collect();
        let [title, issue_url, description] = match <[String; 3]>::try_from(strings) {
            Ok(three) => three.map(Decoded::Value),
            Err(fewer) if fewer.is_empty() => {
                [Decoded::Missing, Decoded::Missing, Decoded::Missing]
            }
            Err(_) => [Decoded::Mismatch, Decoded::Mismatch, Decoded::Mismatch],
        };

        let mut found = addresses(tokens).map(|a| Decoded::Value(a.to_string()));
        let creator = found.next().unwrap_or(Decoded::Missing);
        let claimer = found.next().unwrap_or(Decoded::Missing);

        BountyFields {
            title,
            issue_url,
            description,
            amount: decode_amount(tokens),
            creator,
            claimer,
            is_claimed: decode_claimed(tokens),
        }
    }
}

/// Map a `GetBounty` reply; `id` comes from the caller
pub fn map_bounty(id: &str, text: &str) -> Bounty {
    map_bounty_with(&GlobalScan, id, text)
}

pub fn map_bounty_with<D: BountyDecoder + ?Sized>(decoder: &D, id: &str, text: &str) -> Bounty {
    let payload = Payload::new(text);
    decoder.decode(payload.tokens()).into_bounty(id)
}

/// A single-entity reply that carries the realm's `nil` sentinel
pub fn is_not_found(text: &str) -> bool {
    Payload::new(text).mentions_nil()
}

// ============================================
// BountyApplication
// ============================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationFields {
    pub id: Decoded<u64>,
    pub applicant: Decoded<String>,
    pub pr_link: Decoded<String>,
    pub status: Decoded<ApplicationStatus>,
}

impl ApplicationFields {
    /// Positions: 0 ID, 1 BountyID (unused), 2 Applicant, 3 PRLink,
    /// 4 AppliedAt (unused), 5 Status
    pub fn decode(record: &Record<'_>) -> Self {
        let fields = record.fields();
        if fields.len() < APPLICATION_MIN_FIELDS {
            return Self {
                id: Decoded::Missing,
                applicant: Decoded::Missing,
                pr_link: Decoded::Missing,
                status: Decoded::Missing,
            };
        }

        let at = |i: usize| fields.get(i).copied();
        Self {
            id: decode_uint(at(0)),
            applicant: decode_address(at(2)),
            pr_link: decode_string(at(3)),
            status: decode_status(at(5)),
        }
    }

    /// `None` when the id did not decode
    pub fn into_application(self, bounty_id: &str) -> Option<BountyApplication> {
        let id = self.id.into_option()?;
        Some(BountyApplication {
            id: id.to_string(),
            bounty_id: bounty_id.to_string(),
            applicant: self.applicant.unwrap_or_default(),
            pr_link: self.pr_link.unwrap_or_default(),
            applied_at: String::new(),
            status: self.status.unwrap_or(ApplicationStatus::Unknown),
            validators: Vec::new(),
        })
    }
}

/// Map a `GetApplicationsForBounty` reply
pub fn map_applications(bounty_id: &str, text: &str) -> Vec<BountyApplication> {
    map_records(text, |record| {
        ApplicationFields::decode(record).into_application(bounty_id)
    })
}

// ============================================
// LeaderboardEntry
// ============================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardFields {
    pub address: Decoded<String>,
    pub bounties_created: Decoded<u64>,
    pub bounties_applied: Decoded<u64>,
    pub validations_performed: Decoded<u64>,
    pub score: Decoded<u64>,
}

impl LeaderboardFields {
    /// Positions 0-4 in struct order
    pub fn decode(record: &Record<'_>) -> Self {
        let fields = record.fields();
        let fields: &[Field<'_>] = if fields.len() < LEADERBOARD_MIN_FIELDS {
            &[]
        } else {
            &fields
        };
        let at = |i: usize| fields.get(i).copied();

        Self {
            address: decode_address(at(0)),
            bounties_created: decode_uint(at(1)),
            bounties_applied: decode_uint(at(2)),
            validations_performed: decode_uint(at(3)),
            score: decode_uint(at(4)),
        }
    }

    /// `None` when the address did not decode
    pub fn into_entry(self) -> Option<LeaderboardEntry> {
        Some(LeaderboardEntry {
            address: self.address.into_option()?,
            bounties_created: self.bounties_created.unwrap_or_default(),
            bounties_applied: self.bounties_applied.unwrap_or_default(),
            validations_performed: self.validations_performed.unwrap_or_default(),
            score: self.score.unwrap_or_default(),
        })
    }
}

/// Map a `GetLeaderboard` reply
pub fn map_leaderboard(text: &str) -> Vec<LeaderboardEntry> {
    map_records(text, |record| LeaderboardFields::decode(record).into_entry())
}

// ============================================
// Validators & count
// ============================================

/// Addresses in a `GetValidatorsForApplication` reply, in order.
///
/// When the reply carries no sequence marker at all, every address-shaped
/// token in the reply counts.
pub fn map_validators(text: &str) -> Vec<String> {
    let payload = Payload::new(text);
    match payload.sequence() {
        Sequence::Empty => Vec::new(),
        Sequence::Body(body) => addresses(body.tokens).map(str::to_string).collect(),
        Sequence::Absent => addresses(payload.tokens()).map(str::to_string).collect(),
    }
}

/// Bounty count from `(N uint64)`; anything unreadable counts as zero
pub fn map_count(text: &str) -> u64 {
    let payload = Payload::new(text);
    first_number(payload.tokens()).unwrap_or_default()
}

fn map_records<T>(text: &str, map: impl Fn(&Record<'_>) -> Option<T>) -> Vec<T> {
    let payload = Payload::new(text);
    let records = match payload.sequence() {
        Sequence::Body(body) => body.records(),
        Sequence::Empty | Sequence::Absent => Vec::new(),
    };
    records.iter().filter_map(map).collect()
}
