//! Built-in Deployment Plans
//!
//! - `usa-federal-government`: an Executive management body with four
//!   departments, one-week votes.
//! - `test-fixture`: a management body and two departments with one-minute
//!   votes, for local development chains. Member addresses come from the
//!   node's unlocked accounts.

use lib_abi::{Address, Uint256};

use crate::errors::{GovernanceError, GovernanceResult};
use crate::plan::{DeploymentId, DeploymentPlan};
use crate::unit::UnitDescriptor;
use crate::voting::{VotingSettings, WEEKS};

pub const FEDERAL_GOVERNMENT: &str = "usa-federal-government";
pub const TEST_FIXTURE: &str = "test-fixture";

/// Names accepted by [`preset`]
pub const PRESETS: &[&str] = &[FEDERAL_GOVERNMENT, TEST_FIXTURE];

/// Holders consumed by the test fixture: 3 management, 2 + 3 department
pub const FIXTURE_HOLDERS: usize = 8;

/// Seconds a vote stays open in the test fixture
pub const FIXTURE_VOTE_DURATION: u64 = 60;

const FEDERAL_STAKE: &str = "100000e18";
const FIXTURE_STAKE: &str = "1e18";

const ALICE: &str = "0x27644a3F5D51dEA8705DC7FB1CD67100D73273B1";
const BOB: &str = "0xa52422BB8c29E4d55243d310fB6BAe793162452e";
const CAROL: &str = "0xFd90411B0c246743aE0000BB18c723A3BB909Dee";
const DAVE: &str = "0x04EcEB77965BB426C54EE70d7fcEB2a9bDBdAfed";
const ERIN: &str = "0x99d0cc84a9b00bbB596463a415631886b02a9a70";
const FRANK: &str = "0x2B7cFb1aA760d5050F5096d8fa123980Cb874EcC";

fn unit(name: &str, symbol: &str, members: &[&str], stake: &str) -> GovernanceResult<UnitDescriptor> {
    let stake = Uint256::parse_amount(stake)?;
    let members = members
        .iter()
        .map(|m| m.parse::<Address>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(UnitDescriptor::new(name, symbol).with_equal_stakes(members, stake))
}

/// Executive plus Interior, Education, Defense and EPA
pub fn federal_government() -> GovernanceResult<DeploymentPlan> {
    let plan = DeploymentPlan::new(
        DeploymentId::new(FEDERAL_GOVERNMENT)?,
        unit("Executive", "EXEC", &[ALICE, BOB, CAROL], FEDERAL_STAKE)?,
        VotingSettings::from_percentages(50, 40, WEEKS),
        VotingSettings::from_percentages(50, 5, WEEKS),
    )
    .with_department(unit(
        "Department of the Interior",
        "INT",
        &[ALICE, BOB, DAVE],
        FEDERAL_STAKE,
    )?)
    .with_department(unit(
        "Department of Education",
        "EDU",
        &[CAROL, BOB, DAVE, ALICE],
        FEDERAL_STAKE,
    )?)
    .with_department(unit(
        "Department of Defense",
        "DOD",
        &[CAROL, ERIN, ALICE],
        FEDERAL_STAKE,
    )?)
    .with_department(unit(
        "Environmental Protection Agency",
        "EPA",
        &[FRANK, DAVE, ALICE, BOB],
        FEDERAL_STAKE,
    )?);
    Ok(plan)
}

/// Management plus two departments over caller-supplied holders
///
/// # Rules
///
/// - At least [`FIXTURE_HOLDERS`] holders are required
/// - Holders 0..3 form management, 3..5 department 1, 5..8 department 2
/// - Every holder receives one whole token (10^18 base units)
pub fn test_fixture(holders: &[Address]) -> GovernanceResult<DeploymentPlan> {
    if holders.len() < FIXTURE_HOLDERS {
        return Err(GovernanceError::InvalidValue(format!(
            "{} needs {} holder accounts, got {}",
            TEST_FIXTURE,
            FIXTURE_HOLDERS,
            holders.len()
        )));
    }
    let stake = Uint256::parse_amount(FIXTURE_STAKE)?;
    let voting = VotingSettings::from_percentages(50, 20, FIXTURE_VOTE_DURATION);

    let plan = DeploymentPlan::new(
        DeploymentId::randomized("liquid-democracy")?,
        UnitDescriptor::new("Management Token", "MGMT")
            .with_equal_stakes(holders[0..3].iter().copied(), stake),
        voting,
        voting,
    )
    .with_department(
        UnitDescriptor::new("Department 1 Token", "DEPT1")
            .with_equal_stakes(holders[3..5].iter().copied(), stake),
    )
    .with_department(
        UnitDescriptor::new("Department 2 Token", "DEPT2")
            .with_equal_stakes(holders[5..8].iter().copied(), stake),
    );
    Ok(plan)
}

/// Look up a preset by name
pub fn preset(name: &str, holders: &[Address]) -> GovernanceResult<DeploymentPlan> {
    match name {
        FEDERAL_GOVERNMENT => federal_government(),
        TEST_FIXTURE => test_fixture(holders),
        other => Err(GovernanceError::UnknownPreset(other.to_string())),
    }
}
