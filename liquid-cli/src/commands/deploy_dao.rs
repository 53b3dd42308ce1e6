//! DAO deployment command
//!
//! Architecture: Functional Core, Imperative Shell (FCIS)
//!
//! - **Pure Logic**: Template address resolution, report rendering rows
//! - **Imperative Shell**: Node access, transaction submission, printing
//! - **Error Handling**: Step failures surface as `DeploymentAborted`
//! - **Testability**: Transport and Output injection

use crate::argument_parsing::{DeployDaoArgs, LiquidCli};
use crate::cli_config::{parse_address, RuntimeSettings};
use crate::commands::common::{
    apply_id, call_options, choose_plan_source, load_plan_choice, receipt_policy, resolve_sender,
};
use crate::deployment::{deploy_dao, DeploymentReport};
use crate::error::{CliError, CliResult};
use crate::output::Output;
use crate::rpc::{JsonRpcClient, LedgerTransport};
use crate::template::TemplateClient;
use lib_abi::Address;

// ============================================================================
// PURE LOGIC - No side effects, fully testable
// ============================================================================

/// Template from the command line, else `defaults.template`
pub fn resolve_template(arg: Option<&str>, settings: &RuntimeSettings) -> CliResult<Address> {
    match arg {
        Some(raw) => parse_address("template", raw),
        None => settings.template.ok_or_else(|| {
            CliError::InvalidArgument(
                "No template address: pass one or set defaults.template in the config".to_string(),
            )
        }),
    }
}

/// `label value` rows of the installed apps section
pub fn app_rows(report: &DeploymentReport) -> Vec<(String, String)> {
    report
        .installed_apps
        .iter()
        .flat_map(|(name, proxies)| {
            proxies
                .iter()
                .map(move |proxy| (name.clone(), proxy.to_checksum()))
        })
        .collect()
}

// ============================================================================
// IMPERATIVE SHELL - All side effects here
// ============================================================================

pub async fn handle_deploy_dao_command(
    args: DeployDaoArgs,
    cli: &LiquidCli,
    settings: &RuntimeSettings,
) -> CliResult<()> {
    let output = crate::output::ConsoleOutput;
    let client = JsonRpcClient::new(settings.rpc_url.clone());
    handle_deploy_dao_command_impl(args, &cli.format, settings, &client, &output).await
}

async fn handle_deploy_dao_command_impl<T: LedgerTransport + ?Sized>(
    args: DeployDaoArgs,
    format: &str,
    settings: &RuntimeSettings,
    transport: &T,
    output: &dyn Output,
) -> CliResult<()> {
    let template_address = resolve_template(args.template.as_deref(), settings)?;
    let choice = choose_plan_source(&args.source, settings)?;
    let plan = load_plan_choice(&choice, transport).await?;
    let plan = apply_id(plan, args.id.as_deref(), args.random_id)?;
    let from = resolve_sender(transport, settings).await?;

    let template = TemplateClient::new(transport, template_address, from, receipt_policy(settings))?;
    let report = deploy_dao(&template, &plan, &call_options(settings)).await?;

    if format == "json" {
        return output.print_json(&report.to_json());
    }

    output.print(&format!("DAO deployed at {}", report.dao.to_checksum()))?;
    output.field("id", report.id.as_str())?;
    output.field("template", &report.template.to_checksum())?;

    output.header("Transactions")?;
    let total = report.steps.len();
    for (index, record) in report.steps.iter().enumerate() {
        output.step(index + 1, total, &record.label)?;
        output.field("tx", &record.tx_hash.to_string())?;
    }

    output.header("Installed apps")?;
    for (name, proxy) in app_rows(&report) {
        output.field(&name, &proxy)?;
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
