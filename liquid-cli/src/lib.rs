//! Liquid democracy deployment CLI
//!
//! Deploys a liquid democracy DAO through `LiquidDemocracyTemplate`: one
//! `prepareInstance`, an `installDepartment`/`distributeDepartmentTokens`
//! pair per department, then `finalizeInstance`. Also decodes `DeployDAO`
//! (or any other event) out of saved receipts.
//!
//! ## Architecture
//!
//! Functional Core, Imperative Shell:
//!
//! - **Functional Core** (`logic/`): step planning, call arguments, app bookkeeping
//! - **Imperative Shell** (`commands/`, `deployment`): node access and printing
//! - **Transport** (`rpc`): [`LedgerTransport`] over JSON-RPC, swappable in tests
//! - **Error Handling** (`error`): one [`CliError`] for every failure
//! - **Output Abstraction** (`output`): testable printing interface

pub mod abis;
pub mod argument_parsing;
pub mod cli_config;
pub mod commands;
pub mod deployment;
pub mod error;
pub mod logic;
pub mod output;
pub mod rpc;
pub mod template;

#[cfg(test)]
pub mod testing;

pub use argument_parsing::{run_cli, LiquidCli, LiquidCommand};
pub use deployment::{deploy_dao, DeploymentReport};
pub use error::{CliError, CliResult};
pub use output::Output;
pub use rpc::{JsonRpcClient, LedgerTransport};
pub use template::{CallOptions, TemplateClient};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const AUTHOR: &str = "Liquid Democracy Template Team";
