//! Plan Lint
//!
//! Advisory checks over a deployment plan. Nothing here blocks a deployment:
//! the template contract is the authority on what it accepts, and a plan
//! with mismatched lists is still sent unchanged so the failure surfaces
//! where it belongs.

use std::collections::HashSet;
use std::fmt;

use lib_abi::Address;

use crate::plan::DeploymentPlan;
use crate::unit::UnitDescriptor;
use crate::voting::{VotingSettings, PCT_BASE};

/// A consistency issue found in a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanWarning {
    // =========================================================================
    // Unit membership
    // =========================================================================
    /// `members` and `stakes` lengths differ; the template will revert
    MemberStakeMismatch {
        unit: String,
        members: usize,
        stakes: usize,
    },
    /// Unit has no members at all
    EmptyMembers { unit: String },
    /// Same address listed twice in one unit
    DuplicateMember { unit: String, member: Address },
    /// Two units share a token symbol
    DuplicateSymbol { symbol: String },

    // =========================================================================
    // Voting settings
    // =========================================================================
    /// Support or quorum above 100%
    FractionOutOfRange {
        settings: &'static str,
        field: &'static str,
        value: u64,
    },
    /// Quorum stricter than support
    QuorumAboveSupport { settings: &'static str },
    /// Votes would close immediately
    ZeroVoteDuration { settings: &'static str },
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanWarning::MemberStakeMismatch { unit, members, stakes } => write!(
                f,
                "{}: {} member(s) but {} stake(s); the template will reject the distribution",
                unit, members, stakes
            ),
            PlanWarning::EmptyMembers { unit } => write!(f, "{}: no members", unit),
            PlanWarning::DuplicateMember { unit, member } => {
                write!(f, "{}: member {} listed more than once", unit, member.to_checksum())
            }
            PlanWarning::DuplicateSymbol { symbol } => {
                write!(f, "token symbol '{}' used by more than one unit", symbol)
            }
            PlanWarning::FractionOutOfRange { settings, field, value } => write!(
                f,
                "{}: {} is {} (above 100%)",
                settings,
                field,
                VotingSettings::format_pct(*value)
            ),
            PlanWarning::QuorumAboveSupport { settings } => {
                write!(f, "{}: minimum acceptance quorum exceeds required support", settings)
            }
            PlanWarning::ZeroVoteDuration { settings } => {
                write!(f, "{}: vote duration is zero", settings)
            }
        }
    }
}

/// Collect every warning for a plan, management first, then departments
/// in plan order.
pub fn lint_plan(plan: &DeploymentPlan) -> Vec<PlanWarning> {
    let mut warnings = Vec::new();

    check_unit(&plan.management, &mut warnings);
    for department in &plan.departments {
        check_unit(department, &mut warnings);
    }

    let mut symbols = HashSet::new();
    for unit in std::iter::once(&plan.management).chain(&plan.departments) {
        if !symbols.insert(unit.symbol.as_str()) {
            warnings.push(PlanWarning::DuplicateSymbol {
                symbol: unit.symbol.clone(),
            });
        }
    }

    check_voting("management_voting", &plan.management_voting, &mut warnings);
    check_voting("department_voting", &plan.department_voting, &mut warnings);

    warnings
}

fn check_unit(unit: &UnitDescriptor, warnings: &mut Vec<PlanWarning>) {
    if unit.members.is_empty() {
        warnings.push(PlanWarning::EmptyMembers {
            unit: unit.name.clone(),
        });
    }
    if !unit.is_balanced() {
        warnings.push(PlanWarning::MemberStakeMismatch {
            unit: unit.name.clone(),
            members: unit.members.len(),
            stakes: unit.stakes.len(),
        });
    }

    let mut seen = HashSet::new();
    for member in &unit.members {
        if !seen.insert(*member) {
            warnings.push(PlanWarning::DuplicateMember {
                unit: unit.name.clone(),
                member: *member,
            });
        }
    }
}

fn check_voting(settings: &'static str, voting: &VotingSettings, warnings: &mut Vec<PlanWarning>) {
    for (field, value) in [
        ("support_required", voting.support_required),
        ("min_acceptance_quorum", voting.min_acceptance_quorum),
    ] {
        if value > PCT_BASE {
            warnings.push(PlanWarning::FractionOutOfRange { settings, field, value });
        }
    }
    if voting.min_acceptance_quorum > voting.support_required {
        warnings.push(PlanWarning::QuorumAboveSupport { settings });
    }
    if voting.vote_duration == 0 {
        warnings.push(PlanWarning::ZeroVoteDuration { settings });
    }
}
