//! Shared helpers for the deployment commands
//!
//! Plan resolution, sender selection and receipt policy, used by
//! `deploy-dao`, `deploy-template` and `plan`.

use std::path::PathBuf;

use lib_abi::Address;
use lib_governance::presets::{FIXTURE_HOLDERS, TEST_FIXTURE};
use lib_governance::{load_plan, preset, DeploymentId, DeploymentPlan};
use tracing::debug;

use crate::argument_parsing::PlanSource;
use crate::cli_config::RuntimeSettings;
use crate::error::{CliError, CliResult};
use crate::rpc::{LedgerTransport, ReceiptPolicy};
use crate::template::CallOptions;

/// Leading node accounts the test fixture leaves alone (deployer, owner,
/// token and authorized accounts of a development chain)
pub const FIXTURE_RESERVED_ACCOUNTS: usize = 4;

/// Resolved origin of a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanChoice {
    File(PathBuf),
    Preset(String),
}

/// Pick the plan origin.
///
/// # Rules
///
/// - `--plan` or `--preset` on the command line win
/// - then `defaults.plan`, then `defaults.preset` from the config
/// - no origin at all is an error
pub fn choose_plan_source(source: &PlanSource, settings: &RuntimeSettings) -> CliResult<PlanChoice> {
    if let Some(path) = &source.plan {
        return Ok(PlanChoice::File(path.clone()));
    }
    if let Some(name) = &source.preset {
        return Ok(PlanChoice::Preset(name.clone()));
    }
    if let Some(path) = &settings.plan {
        return Ok(PlanChoice::File(path.clone()));
    }
    if let Some(name) = &settings.preset {
        return Ok(PlanChoice::Preset(name.clone()));
    }
    Err(CliError::InvalidArgument(
        "No plan given: pass --plan or --preset, or set defaults.plan in the config".to_string(),
    ))
}

/// Holders for the test fixture: node accounts past the reserved ones
/// when there are enough, otherwise all of them
pub fn fixture_holders(accounts: &[Address]) -> &[Address] {
    if accounts.len() >= FIXTURE_RESERVED_ACCOUNTS + FIXTURE_HOLDERS {
        &accounts[FIXTURE_RESERVED_ACCOUNTS..]
    } else {
        accounts
    }
}

/// Load the chosen plan. Only the test fixture touches the node.
pub async fn load_plan_choice<T: LedgerTransport + ?Sized>(
    choice: &PlanChoice,
    transport: &T,
) -> CliResult<DeploymentPlan> {
    match choice {
        PlanChoice::File(path) => Ok(load_plan(path)?),
        PlanChoice::Preset(name) if name == TEST_FIXTURE => {
            let accounts = transport.accounts().await?;
            debug!("Node reports {} account(s) for the test fixture", accounts.len());
            Ok(preset(name, fixture_holders(&accounts))?)
        }
        PlanChoice::Preset(name) => Ok(preset(name, &[])?),
    }
}

/// Replace the plan's id with `id`, or randomize it
pub fn apply_id(plan: DeploymentPlan, id: Option<&str>, random: bool) -> CliResult<DeploymentPlan> {
    if let Some(id) = id {
        return Ok(plan.with_id(DeploymentId::new(id)?));
    }
    if random {
        let id = DeploymentId::randomized(plan.id.as_str())?;
        return Ok(plan.with_id(id));
    }
    Ok(plan)
}

/// Configured sender, else the node's first account
pub async fn resolve_sender<T: LedgerTransport + ?Sized>(
    transport: &T,
    settings: &RuntimeSettings,
) -> CliResult<Address> {
    if let Some(from) = settings.from {
        return Ok(from);
    }
    transport
        .accounts()
        .await?
        .first()
        .copied()
        .ok_or(CliError::NoAccounts)
}

pub fn receipt_policy(settings: &RuntimeSettings) -> ReceiptPolicy {
    ReceiptPolicy {
        poll_interval: settings.poll_interval,
        timeout: settings.receipt_timeout,
    }
}

pub fn call_options(settings: &RuntimeSettings) -> CallOptions {
    CallOptions {
        gas_price: settings.gas_price,
        gas: None,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::cli_config::{resolve_settings, CliConfig, SettingsOverrides};
    use std::time::Duration;

    /// Settings for an unconfigured machine with fast polling
    pub fn settings() -> RuntimeSettings {
        let mut settings = resolve_settings(&CliConfig::default(), &SettingsOverrides::default()).unwrap();
        settings.poll_interval = Duration::from_millis(1);
        settings.receipt_timeout = Duration::from_secs(1);
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::settings;
    use super::*;
    use crate::testing::MockLedger;

    #[test]
    fn test_command_line_source_wins() {
        let mut settings = settings();
        settings.preset = Some("usa-federal-government".to_string());
        let source = PlanSource {
            plan: Some(PathBuf::from("plan.toml")),
            preset: None,
        };
        assert_eq!(
            choose_plan_source(&source, &settings).unwrap(),
            PlanChoice::File(PathBuf::from("plan.toml"))
        );
        assert_eq!(
            choose_plan_source(&PlanSource::default(), &settings).unwrap(),
            PlanChoice::Preset("usa-federal-government".to_string())
        );
    }

    #[test]
    fn test_missing_source_is_an_error() {
        assert!(matches!(
            choose_plan_source(&PlanSource::default(), &settings()),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_fixture_holders_skip_reserved_accounts() {
        let accounts: Vec<Address> = (0..12u8).map(|b| Address([b; 20])).collect();
        assert_eq!(fixture_holders(&accounts)[0], Address([4u8; 20]));
        assert_eq!(fixture_holders(&accounts[..9]).len(), 9);
    }

    #[test]
    fn test_apply_id() {
        let plan = lib_governance::federal_government().unwrap();
        let renamed = apply_id(plan.clone(), Some("city-hall"), false).unwrap();
        assert_eq!(renamed.id.as_str(), "city-hall");

        let random = apply_id(plan.clone(), None, true).unwrap();
        assert!(random.id.as_str().starts_with("usa-federal-government-"));

        assert_eq!(apply_id(plan.clone(), None, false).unwrap(), plan);
        assert!(apply_id(plan, Some("bad id"), false).is_err());
    }

    #[tokio::test]
    async fn test_sender_falls_back_to_first_account() {
        let ledger = MockLedger::new();
        let sender = resolve_sender(&ledger, &settings()).await.unwrap();
        assert_eq!(sender, Address([1u8; 20]));

        let mut configured = settings();
        configured.from = Some(Address([9u8; 20]));
        assert_eq!(resolve_sender(&ledger, &configured).await.unwrap(), Address([9u8; 20]));
    }

    #[tokio::test]
    async fn test_fixture_preset_uses_node_accounts() {
        let ledger = MockLedger::new();
        let plan = load_plan_choice(&PlanChoice::Preset(TEST_FIXTURE.to_string()), &ledger)
            .await
            .unwrap();
        assert_eq!(plan.management.members[0], Address([5u8; 20]));
        assert_eq!(plan.departments.len(), 2);
    }
}
