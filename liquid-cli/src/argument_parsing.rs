//! Liquid democracy deployment CLI
//!
//! Command-line surface: global connection flags, one subcommand per
//! operation, and the runner that wires configuration, logging and the
//! command handlers together.

use crate::cli_config::{load_config, resolve_settings, RuntimeSettings, SettingsOverrides};
use crate::commands;
use crate::error::{CliError, CliResult};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Liquid democracy DAO deployment tool
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(name = "liquid-cli")]
pub struct LiquidCli {
    /// JSON-RPC endpoint of the node (overrides the network profile)
    #[arg(long, env = "LIQUID_RPC")]
    pub rpc: Option<String>,

    /// Named network profile from the CLI config
    #[arg(short, long, env = "LIQUID_NETWORK")]
    pub network: Option<String>,

    /// Sending account (defaults to the node's first account)
    #[arg(long, env = "LIQUID_FROM")]
    pub from: Option<String>,

    /// Gas price in wei, decimal or scientific (`60e9`)
    #[arg(long, env = "LIQUID_GAS_PRICE")]
    pub gas_price: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = "LIQUID_CONFIG")]
    pub config: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", env = "LIQUID_FORMAT")]
    pub format: String,

    /// Enable debug logging
    #[arg(short, long, env = "LIQUID_VERBOSE")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: LiquidCommand,
}

impl LiquidCli {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            rpc: self.rpc.clone(),
            network: self.network.clone(),
            from: self.from.clone(),
            gas_price: self.gas_price.clone(),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum LiquidCommand {
    /// Deploy the LiquidDemocracyTemplate contract
    DeployTemplate(DeployTemplateArgs),

    /// Deploy a DAO through an existing template
    DeployDao(DeployDaoArgs),

    /// Decode events from a saved transaction receipt
    Decode(DecodeArgs),

    /// Inspect deployment plans
    Plan(PlanArgs),

    /// Print the app id of an app repository
    AppId(AppIdArgs),

    /// Show version and build information
    Version(VersionArgs),
}

/// Where a deployment plan comes from
#[derive(Args, Debug, Clone, Default)]
pub struct PlanSource {
    /// Plan file (TOML)
    #[arg(long, conflicts_with = "preset")]
    pub plan: Option<PathBuf>,

    /// Built-in plan (usa-federal-government, test-fixture)
    #[arg(long)]
    pub preset: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DeployTemplateArgs {
    /// Build artifact of the template (JSON with abi and bytecode)
    #[arg(long)]
    pub artifact: PathBuf,

    /// DAOFactory address
    #[arg(long)]
    pub dao_factory: String,

    /// ENS registry address
    #[arg(long)]
    pub ens: String,

    /// Delegable MiniMe token factory address
    #[arg(long)]
    pub minime_factory: String,

    /// AragonID address
    #[arg(long)]
    pub aragon_id: String,
}

#[derive(Args, Debug, Clone)]
pub struct DeployDaoArgs {
    /// Template address (defaults to `defaults.template` in the config)
    pub template: Option<String>,

    #[command(flatten)]
    pub source: PlanSource,

    /// Register the DAO under this id instead of the plan's
    #[arg(long, conflicts_with = "random_id")]
    pub id: Option<String>,

    /// Append a random suffix to the plan's id
    #[arg(long)]
    pub random_id: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// Receipt JSON as returned by eth_getTransactionReceipt
    #[arg(long)]
    pub receipt: PathBuf,

    /// Contract interface JSON (bare array or build artifact)
    #[arg(long)]
    pub abi: PathBuf,

    /// Event name
    #[arg(long, default_value = "DeployDAO")]
    pub event: String,
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[command(subcommand)]
    pub action: PlanAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PlanAction {
    /// Print the resolved plan
    Show {
        #[command(flatten)]
        source: PlanSource,
    },
    /// Lint the plan and print warnings
    Check {
        #[command(flatten)]
        source: PlanSource,
    },
    /// List the built-in plans
    Presets,
}

#[derive(Args, Debug, Clone)]
pub struct AppIdArgs {
    /// App repository name, e.g. `voting` or `delegable-voting`
    pub name: String,

    /// Use the open registry even for apps not known to live there
    #[arg(long)]
    pub open: bool,
}

#[derive(Args, Debug, Clone)]
pub struct VersionArgs {
    /// Include git and build details
    #[arg(long)]
    pub full: bool,
}

/// Install the fmt subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn settings_for(cli: &LiquidCli) -> CliResult<RuntimeSettings> {
    let config = load_config(cli.config.as_deref())?;
    resolve_settings(&config, &cli.overrides())
}

/// Main CLI runner
pub async fn run_cli() -> Result<()> {
    let cli = LiquidCli::parse();
    init_tracing(cli.verbose);
    validate_output_format(&cli.format).map_err(anyhow::Error::msg)?;

    match &cli.command {
        LiquidCommand::DeployTemplate(args) => {
            let settings = settings_for(&cli).map_err(anyhow::Error::msg)?;
            commands::deploy_template::handle_deploy_template_command(args.clone(), &cli, &settings)
                .await
                .map_err(anyhow::Error::msg)
        }
        LiquidCommand::DeployDao(args) => {
            let settings = settings_for(&cli).map_err(anyhow::Error::msg)?;
            commands::deploy_dao::handle_deploy_dao_command(args.clone(), &cli, &settings)
                .await
                .map_err(anyhow::Error::msg)
        }
        LiquidCommand::Plan(args) => {
            let settings = settings_for(&cli).map_err(anyhow::Error::msg)?;
            commands::plan::handle_plan_command(args.clone(), &cli, &settings)
                .await
                .map_err(anyhow::Error::msg)
        }
        LiquidCommand::Decode(args) => commands::decode::handle_decode_command(args.clone(), &cli)
            .await
            .map_err(anyhow::Error::msg),
        LiquidCommand::AppId(args) => commands::app_id::handle_app_id_command(args.clone(), &cli)
            .await
            .map_err(anyhow::Error::msg),
        LiquidCommand::Version(args) => commands::version::handle_version_command(args.clone())
            .await
            .map_err(anyhow::Error::msg),
    }
}

pub fn validate_output_format(format: &str) -> CliResult<()> {
    match format {
        "table" | "json" => Ok(()),
        other => Err(CliError::InvalidArgument(format!(
            "Unsupported output format: {}. Use 'table' or 'json'",
            other
        ))),
    }
}
