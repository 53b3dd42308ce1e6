//! Voting Settings
//!
//! Support and quorum are fixed-point fractions of `PCT_BASE` (10^18), the
//! convention of the voting contracts. Durations are in seconds.

use lib_abi::{Token, Uint256};
use serde::{Deserialize, Deserializer, Serialize};

/// Fixed-point base of voting fractions: 10^18 == 100%
pub const PCT_BASE: u64 = 1_000_000_000_000_000_000;

/// One percent on the `PCT_BASE` scale
pub const ONE_PERCENT: u64 = PCT_BASE / 100;

pub const MINUTES: u64 = 60;
pub const HOURS: u64 = 60 * MINUTES;
pub const DAYS: u64 = 24 * HOURS;
pub const WEEKS: u64 = 7 * DAYS;

/// Voting parameters for one unit's voting app
///
/// Sent to the template as the `uint64[3]` triple
/// `[support_required, min_acceptance_quorum, vote_duration]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingSettings {
    /// Share of cast votes that must be in favour
    #[serde(deserialize_with = "fraction")]
    pub support_required: u64,
    /// Share of total supply that must vote in favour
    #[serde(deserialize_with = "fraction")]
    pub min_acceptance_quorum: u64,
    /// Seconds a vote stays open
    pub vote_duration: u64,
}

impl VotingSettings {
    pub const fn new(support_required: u64, min_acceptance_quorum: u64, vote_duration: u64) -> Self {
        Self {
            support_required,
            min_acceptance_quorum,
            vote_duration,
        }
    }

    /// Build from whole percentages, e.g. `from_percentages(50, 5, WEEKS)`
    pub const fn from_percentages(support_pct: u64, quorum_pct: u64, vote_duration: u64) -> Self {
        Self::new(support_pct * ONE_PERCENT, quorum_pct * ONE_PERCENT, vote_duration)
    }

    pub fn as_triple(&self) -> [u64; 3] {
        [self.support_required, self.min_acceptance_quorum, self.vote_duration]
    }

    /// `uint64[3]` argument token
    pub fn to_token(&self) -> Token {
        Token::fixed_array(self.as_triple())
    }

    /// Human-readable percentage of a fraction, e.g. `"50%"` or `"12.5%"`
    pub fn format_pct(value: u64) -> String {
        let whole = value / ONE_PERCENT;
        let rest = value % ONE_PERCENT;
        if rest == 0 {
            format!("{}%", whole)
        } else {
            let frac = format!("{:016}", rest);
            format!("{}.{}%", whole, frac.trim_end_matches('0'))
        }
    }
}

/// Accept integers or the scientific literal form (`"50e16"`)
fn fraction<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Uint256::deserialize(deserializer)?;
    value
        .to_u64()
        .ok_or_else(|| serde::de::Error::custom(format!("fraction {} exceeds 64 bits", value)))
}
