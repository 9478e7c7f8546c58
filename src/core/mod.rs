//! Core Module - Payload Parsing & Bounty Logic
//!
//! Turns the realm's textual value encoding into records and sequences the
//! realm round trips behind each HTTP operation.

pub mod fields;
pub mod lexer;
pub mod mappers;
pub mod scanner;
pub mod service;

pub use fields::Decoded;
pub use mappers::{
    is_not_found, map_applications, map_bounty, map_bounty_with, map_count, map_leaderboard,
    map_validators, BountyDecoder, GlobalScan,
};
pub use scanner::{Payload, Sequence};
pub use service::BountyService;
