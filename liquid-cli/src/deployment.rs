//! DAO deployment orchestration
//!
//! Runs a [`DeploymentPlan`] against a template, strictly in order:
//! prepare, install and distribute per department, finalize. Every step
//! waits for its receipt before the next one is sent. The first failure
//! stops the run; nothing is retried or rolled back, and the error names
//! the steps that already went through so the operator can inspect the
//! partially configured DAO.

use std::collections::BTreeMap;

use lib_abi::{decode_events, decode_log, Address, DecodedEvent, Event, Interface, Receipt, Token, H256};
use lib_governance::{DeploymentId, DeploymentPlan, UnitDescriptor};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::abis::{dao_factory_interface, kernel_interface};
use crate::error::{CliError, CliResult};
use crate::logic::apps::group_installed_apps;
use crate::logic::steps::{plan_steps, DeployStep};
use crate::rpc::LedgerTransport;
use crate::template::{CallOptions, TemplateClient};

/// A confirmed step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step: DeployStep,
    pub label: String,
    pub tx_hash: H256,
}

/// Outcome of a complete deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentReport {
    pub id: DeploymentId,
    pub template: Address,
    pub dao: Address,
    pub steps: Vec<StepRecord>,
    /// App name (or hex app id) to proxy addresses, in install order
    pub installed_apps: BTreeMap<String, Vec<Address>>,
}

impl DeploymentReport {
    pub fn to_json(&self) -> Value {
        let steps: Vec<Value> = self
            .steps
            .iter()
            .map(|s| {
                json!({
                    "step": s.label,
                    "function": s.step.function_name(),
                    "transactionHash": s.tx_hash.to_string(),
                })
            })
            .collect();
        let apps: BTreeMap<&String, Vec<String>> = self
            .installed_apps
            .iter()
            .map(|(name, proxies)| (name, proxies.iter().map(Address::to_checksum).collect()))
            .collect();
        json!({
            "id": self.id.as_str(),
            "template": self.template.to_checksum(),
            "dao": self.dao.to_checksum(),
            "steps": steps,
            "installedApps": apps,
        })
    }
}

/// DAO address from the `DeployDAO` event of a prepare receipt
pub fn dao_address(receipt: &Receipt, factory: &Interface) -> CliResult<Address> {
    let events = decode_events(receipt, factory, "DeployDAO")?;
    if events.len() > 1 {
        warn!(
            "{} DeployDAO events in {}; using the first",
            events.len(),
            receipt.transaction_hash
        );
    }
    events
        .first()
        .and_then(|e| e.arg("dao"))
        .and_then(Token::as_address)
        .filter(|dao| !dao.is_zero())
        .ok_or(CliError::DaoAddressMissing {
            tx_hash: receipt.transaction_hash,
        })
}

/// `NewAppProxy` events of one receipt. Logs that fail to decode are
/// skipped with a warning; app grouping only feeds the report.
fn installed_app_events(receipt: &Receipt, event: &Event, topic: &H256) -> Vec<DecodedEvent> {
    receipt
        .logs
        .iter()
        .filter(|log| log.topics.first() == Some(topic))
        .filter_map(|log| match decode_log(event, log) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(
                    "Skipping undecodable NewAppProxy log in {}: {}",
                    receipt.transaction_hash, e
                );
                None
            }
        })
        .collect()
}

fn department(plan: &DeploymentPlan, index: usize) -> CliResult<&UnitDescriptor> {
    plan.departments
        .get(index)
        .ok_or_else(|| CliError::InvalidArgument(format!("plan has no department #{}", index + 1)))
}

async fn run_step<T: LedgerTransport>(
    template: &TemplateClient<T>,
    plan: &DeploymentPlan,
    step: DeployStep,
    options: &CallOptions,
) -> CliResult<Receipt> {
    match step {
        DeployStep::Prepare => {
            template
                .prepare_instance(&plan.management, &plan.management_voting, plan.token_index, options)
                .await
        }
        DeployStep::Install(i) => {
            template
                .install_department(department(plan, i)?, &plan.department_voting, plan.token_index, options)
                .await
        }
        DeployStep::Distribute(i) => {
            template
                .distribute_department_tokens(department(plan, i)?, options)
                .await
        }
        DeployStep::Finalize => {
            template
                .finalize_instance(
                    &plan.id,
                    &plan.management,
                    plan.token_index,
                    plan.use_agent_as_vault,
                    options,
                )
                .await
        }
    }
}

/// Deploy a DAO from `plan` through `template`.
///
/// Lint warnings are logged and never change what is sent. Member and
/// stake lists reach the template exactly as the plan holds them.
pub async fn deploy_dao<T: LedgerTransport>(
    template: &TemplateClient<T>,
    plan: &DeploymentPlan,
    options: &CallOptions,
) -> CliResult<DeploymentReport> {
    for warning in plan.lint() {
        warn!("Plan '{}': {}", plan.id, warning);
    }

    let factory = dao_factory_interface()?;
    let kernel = kernel_interface()?;
    let new_app_proxy = kernel.event("NewAppProxy")?;
    let proxy_topic = new_app_proxy.topic()?;
    let steps = plan_steps(plan);
    let total = steps.len();

    let mut records: Vec<StepRecord> = Vec::with_capacity(total);
    let mut dao = None;
    let mut app_events = Vec::new();

    for (index, step) in steps.into_iter().enumerate() {
        let label = step.describe(plan);
        info!("[{}/{}] {}", index + 1, total, label);

        let receipt = match run_step(template, plan, step, options).await {
            Ok(receipt) => receipt,
            Err(e) => {
                error!("{} failed after {} completed step(s): {}", label, records.len(), e);
                return Err(CliError::DeploymentAborted {
                    step: label,
                    completed: records.len(),
                    reason: e.to_string(),
                });
            }
        };

        if step == DeployStep::Prepare {
            // the prepare transaction is mined, so the DAO shell exists either way
            let address = dao_address(&receipt, &factory).map_err(|e| {
                error!("{} mined without a usable DAO address: {}", label, e);
                CliError::DeploymentAborted {
                    step: label.clone(),
                    completed: records.len() + 1,
                    reason: e.to_string(),
                }
            })?;
            info!("DAO deployed at {}", address.to_checksum());
            dao = Some(address);
        }
        app_events.extend(installed_app_events(&receipt, new_app_proxy, &proxy_topic));

        records.push(StepRecord {
            step,
            label,
            tx_hash: receipt.transaction_hash,
        });
    }

    let dao = dao.ok_or_else(|| CliError::Other("deployment ran without a prepare step".to_string()))?;
    let installed_apps = group_installed_apps(&app_events);
    info!(
        "Deployment '{}' finished: {} transaction(s), {} app kind(s) installed",
        plan.id,
        records.len(),
        installed_apps.len()
    );

    Ok(DeploymentReport {
        id: plan.id.clone(),
        template: template.address(),
        dao,
        steps: records,
        installed_apps,
    })
}
