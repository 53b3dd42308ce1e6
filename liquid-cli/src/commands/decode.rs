//! Receipt decoding command
//!
//! Reads a receipt saved from `eth_getTransactionReceipt` and prints every
//! log matching one event of the given interface. With the default
//! `DeployDAO` event and the DAOFactory interface this recovers the address
//! of a DAO created by `prepareInstance`.

use std::fs;
use std::path::Path;

use crate::argument_parsing::{DecodeArgs, LiquidCli};
use crate::error::{CliError, CliResult};
use crate::output::Output;
use lib_abi::{decode_events, DecodedEvent, Interface, Receipt};
use serde_json::Value;

// ============================================================================
// PURE LOGIC
// ============================================================================

/// `name value` rows for one event, values rendered as JSON scalars
pub fn event_rows(event: &DecodedEvent) -> Vec<(String, String)> {
    event
        .args
        .iter()
        .map(|arg| {
            let rendered = match arg.value.to_json() {
                Value::String(s) => s,
                other => other.to_string(),
            };
            let label = if arg.indexed {
                format!("{} (indexed)", arg.name)
            } else {
                arg.name.clone()
            };
            (label, rendered)
        })
        .collect()
}

fn read_file(label: &str, path: &Path) -> CliResult<String> {
    fs::read_to_string(path)
        .map_err(|e| CliError::InvalidArgument(format!("{} {}: {}", label, path.display(), e)))
}

// ============================================================================
// IMPERATIVE SHELL
// ============================================================================

pub async fn handle_decode_command(args: DecodeArgs, cli: &LiquidCli) -> CliResult<()> {
    let output = crate::output::ConsoleOutput;
    handle_decode_command_impl(args, &cli.format, &output).await
}

async fn handle_decode_command_impl(args: DecodeArgs, format: &str, output: &dyn Output) -> CliResult<()> {
    let receipt: Value = serde_json::from_str(&read_file("receipt", &args.receipt)?)?;
    let receipt = Receipt::from_json_value(receipt)?;
    let interface = Interface::from_json(&read_file("interface", &args.abi)?)?;

    let events = decode_events(&receipt, &interface, &args.event)?;

    if format == "json" {
        let events: Vec<Value> = events.iter().map(DecodedEvent::to_json).collect();
        return output.print_json(&Value::Array(events));
    }

    if events.is_empty() {
        return output.warning(&format!(
            "No '{}' event in {}",
            args.event, receipt.transaction_hash
        ));
    }
    for event in &events {
        output.header(&format!("{} from {}", event.event, event.address.to_checksum()))?;
        for (label, value) in event_rows(event) {
            output.field(&label, &value)?;
        }
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abis::DAO_FACTORY_ABI;
    use crate::output::testing::MockOutput;
    use serde_json::json;
    use tempfile::TempDir;

    const DAO: &str = "0x5d94e3e7aec542ab0f9129b9a7badeb5b3ca0f77";

    fn write_inputs(dir: &TempDir, with_log: bool) -> DecodeArgs {
        let topic = Interface::from_json(DAO_FACTORY_ABI)
            .unwrap()
            .event("DeployDAO")
            .unwrap()
            .topic()
            .unwrap();
        let logs = if with_log {
            json!([{
                "address": "0x1111111111111111111111111111111111111111",
                "topics": [topic.to_string()],
                "data": format!("0x000000000000000000000000{}", &DAO[2..]),
                "logIndex": "0x0",
                "transactionHash": format!("0x{}", "ab".repeat(32)),
            }])
        } else {
            json!([])
        };
        let receipt = json!({
            "transactionHash": format!("0x{}", "ab".repeat(32)),
            "blockNumber": "0x10",
            "status": "0x1",
            "logs": logs,
        });

        let receipt_path = dir.path().join("receipt.json");
        let abi_path = dir.path().join("DAOFactory.json");
        fs::write(&receipt_path, receipt.to_string()).unwrap();
        fs::write(&abi_path, DAO_FACTORY_ABI).unwrap();
        DecodeArgs {
            receipt: receipt_path,
            abi: abi_path,
            event: "DeployDAO".to_string(),
        }
    }

    #[tokio::test]
    async fn test_decodes_dao_address() {
        let dir = TempDir::new().unwrap();
        let output = MockOutput::new();

        handle_decode_command_impl(write_inputs(&dir, true), "table", &output)
            .await
            .unwrap();

        output.assert_contains_message("DeployDAO from 0x1111111111111111111111111111111111111111");
        output.assert_contains_message("dao");
        let expected = DAO.parse::<lib_abi::Address>().unwrap().to_checksum();
        output.assert_contains_message(&expected);
    }

    #[tokio::test]
    async fn test_json_output_is_an_array() {
        let dir = TempDir::new().unwrap();
        let output = MockOutput::new();

        handle_decode_command_impl(write_inputs(&dir, true), "json", &output)
            .await
            .unwrap();

        let parsed: Value = serde_json::from_str(&output.get_messages()[0]).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
        assert_eq!(parsed[0]["event"], "DeployDAO");
    }

    #[tokio::test]
    async fn test_receipt_without_event_warns() {
        let dir = TempDir::new().unwrap();
        let output = MockOutput::new();

        handle_decode_command_impl(write_inputs(&dir, false), "table", &output)
            .await
            .unwrap();

        output.assert_contains_message("No 'DeployDAO' event");
    }

    #[tokio::test]
    async fn test_unknown_event_fails() {
        let dir = TempDir::new().unwrap();
        let output = MockOutput::new();
        let mut args = write_inputs(&dir, true);
        args.event = "DeployDao".to_string();

        let err = handle_decode_command_impl(args, "table", &output).await.unwrap_err();
        assert!(err.to_string().contains("DeployDao"));
    }
}
