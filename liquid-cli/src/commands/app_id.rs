//! App id command
//!
//! Prints the namehash an app repository is registered under, the value
//! kernels report in `NewAppProxy` and `SetApp`.

use crate::argument_parsing::{AppIdArgs, LiquidCli};
use crate::error::CliResult;
use crate::logic::apps::KNOWN_APPS;
use crate::output::Output;
use lib_abi::hash::{APM_REGISTRY, OPEN_APM_REGISTRY};
use lib_abi::{app_id, H256};
use serde_json::json;

// ============================================================================
// PURE LOGIC
// ============================================================================

/// Registry domain for an app: known apps keep their registry, anything
/// else goes to the main one unless `open` is forced
pub fn registry_for(name: &str, open: bool) -> bool {
    open || KNOWN_APPS
        .iter()
        .any(|(known, on_open)| *known == name && *on_open)
}

pub fn registry_domain(open: bool) -> &'static str {
    if open {
        OPEN_APM_REGISTRY
    } else {
        APM_REGISTRY
    }
}

pub fn resolve_app_id(name: &str, open: bool) -> (bool, H256) {
    let open = registry_for(name, open);
    (open, app_id(name, open))
}

// ============================================================================
// IMPERATIVE SHELL
// ============================================================================

pub async fn handle_app_id_command(args: AppIdArgs, cli: &LiquidCli) -> CliResult<()> {
    let output = crate::output::ConsoleOutput;
    handle_app_id_command_impl(args, &cli.format, &output).await
}

async fn handle_app_id_command_impl(args: AppIdArgs, format: &str, output: &dyn Output) -> CliResult<()> {
    let (open, id) = resolve_app_id(&args.name, args.open);
    if format == "json" {
        return output.print_json(&json!({
            "name": args.name,
            "registry": registry_domain(open),
            "appId": id.to_string(),
        }));
    }
    output.print(&id.to_string())
}
