//! Plan inspection commands
//!
//! `plan show` prints the resolved plan, `plan check` lints it, `plan presets`
//! lists the built-in plans. Nothing here sends a transaction; only the
//! test fixture asks the node for its accounts.

use crate::argument_parsing::{LiquidCli, PlanAction, PlanArgs, PlanSource};
use crate::cli_config::RuntimeSettings;
use crate::commands::common::{choose_plan_source, load_plan_choice};
use crate::error::CliResult;
use crate::output::Output;
use crate::rpc::{JsonRpcClient, LedgerTransport};
use lib_governance::presets::{FEDERAL_GOVERNMENT, TEST_FIXTURE};
use lib_governance::{DeploymentPlan, PRESETS};
use serde_json::json;

// ============================================================================
// PURE LOGIC
// ============================================================================

pub fn preset_description(name: &str) -> &'static str {
    match name {
        FEDERAL_GOVERNMENT => "Executive management unit and four federal departments",
        TEST_FIXTURE => "Two departments over eight of the node's accounts, one-minute votes",
        _ => "",
    }
}

/// One-line shape of a plan
pub fn plan_summary(plan: &DeploymentPlan) -> String {
    format!(
        "Plan '{}': {} ({}), {} department(s), {} transaction(s)",
        plan.id,
        plan.management.name,
        plan.management.symbol,
        plan.departments.len(),
        plan.transaction_count()
    )
}

// ============================================================================
// IMPERATIVE SHELL
// ============================================================================

pub async fn handle_plan_command(args: PlanArgs, cli: &LiquidCli, settings: &RuntimeSettings) -> CliResult<()> {
    let output = crate::output::ConsoleOutput;
    let client = JsonRpcClient::new(settings.rpc_url.clone());
    handle_plan_command_impl(args, &cli.format, settings, &client, &output).await
}

async fn handle_plan_command_impl<T: LedgerTransport + ?Sized>(
    args: PlanArgs,
    format: &str,
    settings: &RuntimeSettings,
    transport: &T,
    output: &dyn Output,
) -> CliResult<()> {
    match args.action {
        PlanAction::Show { source } => {
            let plan = resolve_plan(&source, settings, transport).await?;
            if format == "json" {
                output.print_json(&serde_json::to_value(&plan)?)
            } else {
                output.print(&plan.to_toml_string()?)
            }
        }
        PlanAction::Check { source } => {
            let plan = resolve_plan(&source, settings, transport).await?;
            let warnings = plan.lint();
            if format == "json" {
                let warnings: Vec<String> = warnings.iter().map(ToString::to_string).collect();
                return output.print_json(&json!({
                    "id": plan.id.as_str(),
                    "transactions": plan.transaction_count(),
                    "warnings": warnings,
                }));
            }
            output.print(&plan_summary(&plan))?;
            if warnings.is_empty() {
                return output.success("No warnings");
            }
            for warning in &warnings {
                output.warning(&warning.to_string())?;
            }
            Ok(())
        }
        PlanAction::Presets => {
            if format == "json" {
                let presets: Vec<_> = PRESETS
                    .iter()
                    .map(|name| json!({ "name": name, "description": preset_description(name) }))
                    .collect();
                return output.print_json(&json!(presets));
            }
            for name in PRESETS {
                output.field(name, preset_description(name))?;
            }
            Ok(())
        }
    }
}

async fn resolve_plan<T: LedgerTransport + ?Sized>(
    source: &PlanSource,
    settings: &RuntimeSettings,
    transport: &T,
) -> CliResult<DeploymentPlan> {
    let choice = choose_plan_source(source, settings)?;
    load_plan_choice(&choice, transport).await
}

// ============================================================================
// TESTS
// ============================================================================
