//! In-memory ledger for orchestration tests
//!
//! `MockLedger` plays the node and the template at once: it decodes each
//! call through the template interface, records it, and answers with a
//! receipt carrying the logs the real contracts would emit. Distribution
//! calls whose holder and stake lists differ in length revert, as the
//! template does.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use lib_abi::codec::encode;
use lib_abi::{
    app_id, keccak256, Address, HexBytes, Interface, Log, Quantity, Receipt, Token, H256,
};

use crate::abis::{dao_factory_interface, kernel_interface, template_interface};
use crate::error::{CliError, CliResult};
use crate::logic::calls::{DISTRIBUTE_DEPARTMENT_TOKENS, FINALIZE_INSTANCE, INSTALL_DEPARTMENT, PREPARE_INSTANCE};
use crate::rpc::{LedgerTransport, TxRequest};

/// One decoded template call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub function: String,
    pub args: Vec<Token>,
}

#[derive(Default)]
struct LedgerState {
    nonce: u64,
    sent: Vec<TxRequest>,
    calls: Vec<RecordedCall>,
    receipts: HashMap<H256, Receipt>,
}

pub struct MockLedger {
    template: Interface,
    factory: Interface,
    kernel: Interface,
    accounts: Vec<Address>,
    factory_address: Address,
    dao: Address,
    revert_function: Option<String>,
    rpc_error: Option<String>,
    emit_deploy_dao: bool,
    malformed_app_log: bool,
    state: Mutex<LedgerState>,
}

fn derived_address(seed: &[u8]) -> Address {
    let hash = keccak256(seed);
    Address::from_slice(&hash[12..]).unwrap()
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            template: template_interface().unwrap(),
            factory: dao_factory_interface().unwrap(),
            kernel: kernel_interface().unwrap(),
            accounts: (1..=12u8).map(|b| Address([b; 20])).collect(),
            factory_address: derived_address(b"dao-factory"),
            dao: derived_address(b"dao"),
            revert_function: None,
            rpc_error: None,
            emit_deploy_dao: true,
            malformed_app_log: false,
            state: Mutex::new(LedgerState::default()),
        }
    }

    /// Every call to `function` is mined with status `0x0`
    pub fn reverting(mut self, function: &str) -> Self {
        self.revert_function = Some(function.to_string());
        self
    }

    /// Every submission fails with a JSON-RPC error
    pub fn rejecting(mut self, message: &str) -> Self {
        self.rpc_error = Some(message.to_string());
        self
    }

    /// Prepare receipts carry no `DeployDAO` log
    pub fn without_deploy_dao(mut self) -> Self {
        self.emit_deploy_dao = false;
        self
    }

    /// Install receipts also carry a `NewAppProxy` log with no data
    pub fn with_malformed_app_log(mut self) -> Self {
        self.malformed_app_log = true;
        self
    }

    pub fn dao(&self) -> Address {
        self.dao
    }

    pub fn holders(&self) -> &[Address] {
        &self.accounts[4..]
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn function_names(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.function).collect()
    }

    pub fn sent(&self) -> Vec<TxRequest> {
        self.state.lock().unwrap().sent.clone()
    }

    fn new_app_proxy(&self, seed: u64, name: &str, open: bool) -> Log {
        let proxy = derived_address(format!("{}-{}", name, seed).as_bytes());
        let event = self.kernel.event("NewAppProxy").unwrap();
        Log {
            address: self.dao,
            topics: vec![event.topic().unwrap()],
            data: HexBytes(encode(&[
                Token::from(proxy),
                Token::from(true),
                Token::FixedBytes(app_id(name, open).0.to_vec()),
            ])),
            log_index: None,
            transaction_hash: None,
        }
    }

    fn logs_for(&self, function: &str, seed: u64) -> Vec<Log> {
        let mut logs = Vec::new();
        match function {
            PREPARE_INSTANCE => {
                if self.emit_deploy_dao {
                    let event = self.factory.event("DeployDAO").unwrap();
                    logs.push(Log {
                        address: self.factory_address,
                        topics: vec![event.topic().unwrap()],
                        data: HexBytes(encode(&[Token::from(self.dao)])),
                        log_index: None,
                        transaction_hash: None,
                    });
                }
                logs.push(self.new_app_proxy(seed, "delegable-token-manager", true));
                logs.push(self.new_app_proxy(seed, "delegable-voting", true));
            }
            INSTALL_DEPARTMENT => {
                logs.push(self.new_app_proxy(seed, "delegable-token-manager", true));
                logs.push(self.new_app_proxy(seed, "delegable-voting", true));
                if self.malformed_app_log {
                    let mut truncated = self.new_app_proxy(seed, "broken", false);
                    truncated.data = HexBytes(Vec::new());
                    logs.push(truncated);
                }
            }
            FINALIZE_INSTANCE => {
                logs.push(self.new_app_proxy(seed, "agent", false));
                logs.push(self.new_app_proxy(seed, "finance", false));
            }
            _ => {}
        }
        logs
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn array_len(token: Option<&Token>) -> Option<usize> {
    token.and_then(Token::as_array).map(<[Token]>::len)
}

/// Holder and stake lists must be the same length
fn lists_match(function: &str, args: &[Token]) -> bool {
    match function {
        DISTRIBUTE_DEPARTMENT_TOKENS => array_len(args.first()) == array_len(args.get(1)),
        FINALIZE_INSTANCE => array_len(args.get(1)) == array_len(args.get(2)),
        _ => true,
    }
}

#[async_trait]
impl LedgerTransport for MockLedger {
    async fn accounts(&self) -> CliResult<Vec<Address>> {
        Ok(self.accounts.clone())
    }

    async fn send_transaction(&self, tx: &TxRequest) -> CliResult<H256> {
        if let Some(message) = &self.rpc_error {
            return Err(CliError::RpcError {
                code: -32000,
                message: message.clone(),
            });
        }

        let mut state = self.state.lock().unwrap();
        state.nonce += 1;
        let nonce = state.nonce;
        let tx_hash = H256(keccak256(nonce.to_be_bytes()));
        state.sent.push(tx.clone());

        let (succeeded, logs, contract_address) = match tx.to {
            None => (true, Vec::new(), Some(derived_address(&nonce.to_be_bytes()))),
            Some(_) => {
                let (function, args) = self.template.decode_call(&tx.data.0)?;
                let name = function.name.clone();
                let succeeded =
                    self.revert_function.as_deref() != Some(name.as_str()) && lists_match(&name, &args);
                state.calls.push(RecordedCall {
                    function: name.clone(),
                    args,
                });
                let logs = if succeeded { self.logs_for(&name, nonce) } else { Vec::new() };
                (succeeded, logs, None)
            }
        };

        let logs = logs
            .into_iter()
            .enumerate()
            .map(|(i, mut log)| {
                log.log_index = Some(Quantity(i as u64));
                log.transaction_hash = Some(tx_hash);
                log
            })
            .collect();

        state.receipts.insert(
            tx_hash,
            Receipt {
                transaction_hash: tx_hash,
                block_number: Some(Quantity(nonce)),
                contract_address,
                gas_used: Some(Quantity(21_000)),
                status: Some(Quantity(if succeeded { 1 } else { 0 })),
                logs,
            },
        );
        Ok(tx_hash)
    }

    async fn transaction_receipt(&self, tx_hash: &H256) -> CliResult<Option<Receipt>> {
        Ok(self.state.lock().unwrap().receipts.get(tx_hash).cloned())
    }
}
