//! Template deployment command
//!
//! Deploys `LiquidDemocracyTemplate` from its build artifact, wiring in the
//! DAO factory, ENS registry, token factory and AragonID addresses.

use std::fs;

use crate::argument_parsing::{DeployTemplateArgs, LiquidCli};
use crate::cli_config::{parse_address, RuntimeSettings};
use crate::commands::common::{call_options, receipt_policy, resolve_sender};
use crate::error::{CliError, CliResult};
use crate::output::Output;
use crate::rpc::{JsonRpcClient, LedgerTransport};
use crate::template::deploy_contract;
use lib_abi::{Artifact, Token};
use serde_json::json;

// ============================================================================
// PURE LOGIC
// ============================================================================

/// Constructor arguments in declaration order
pub fn constructor_args(args: &DeployTemplateArgs) -> CliResult<Vec<Token>> {
    Ok(vec![
        Token::from(parse_address("DAO factory", &args.dao_factory)?),
        Token::from(parse_address("ENS", &args.ens)?),
        Token::from(parse_address("MiniMe factory", &args.minime_factory)?),
        Token::from(parse_address("AragonID", &args.aragon_id)?),
    ])
}

// ============================================================================
// IMPERATIVE SHELL
// ============================================================================

pub async fn handle_deploy_template_command(
    args: DeployTemplateArgs,
    cli: &LiquidCli,
    settings: &RuntimeSettings,
) -> CliResult<()> {
    let output = crate::output::ConsoleOutput;
    let client = JsonRpcClient::new(settings.rpc_url.clone());
    handle_deploy_template_command_impl(args, &cli.format, settings, &client, &output).await
}

async fn handle_deploy_template_command_impl<T: LedgerTransport + ?Sized>(
    args: DeployTemplateArgs,
    format: &str,
    settings: &RuntimeSettings,
    transport: &T,
    output: &dyn Output,
) -> CliResult<()> {
    let constructor = constructor_args(&args)?;
    let raw = fs::read_to_string(&args.artifact).map_err(|e| {
        CliError::InvalidArgument(format!("artifact {}: {}", args.artifact.display(), e))
    })?;
    let artifact = Artifact::from_json(&raw)?;
    let from = resolve_sender(transport, settings).await?;

    let (address, receipt) = deploy_contract(
        transport,
        &artifact,
        &constructor,
        from,
        &call_options(settings),
        &receipt_policy(settings),
    )
    .await?;

    if format == "json" {
        return output.print_json(&json!({
            "contract": artifact.contract_name,
            "address": address.to_checksum(),
            "transactionHash": receipt.transaction_hash.to_string(),
        }));
    }
    output.success(&format!("{} deployed at {}", artifact.contract_name, address.to_checksum()))?;
    output.field("tx", &receipt.transaction_hash.to_string())
}

// ============================================================================
// TESTS
// ============================================================================
