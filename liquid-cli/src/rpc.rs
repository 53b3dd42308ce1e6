//! Ledger transport
//!
//! The deployment only needs three things from a node: the unlocked
//! accounts, a way to submit a transaction, and a way to fetch its
//! receipt. [`LedgerTransport`] captures exactly that, so orchestration
//! can run against [`JsonRpcClient`] or an in-memory ledger in tests.
//!
//! # Usage
//!
//! ```ignore
//! let client = JsonRpcClient::new("http://127.0.0.1:8545");
//! let hash = client.send_transaction(&tx).await?;
//! let receipt = wait_for_receipt(&client, hash, &ReceiptPolicy::default()).await?;
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use lib_abi::{Address, HexBytes, Quantity, Receipt, Uint256, H256};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::cli_config::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_RECEIPT_TIMEOUT_SECS};
use crate::error::{CliError, CliResult};

/// Access to a ledger node
#[async_trait]
pub trait LedgerTransport: Send + Sync {
    /// Accounts the node can sign for
    async fn accounts(&self) -> CliResult<Vec<Address>>;

    /// Submit a transaction for the node to sign; returns its hash
    async fn send_transaction(&self, tx: &TxRequest) -> CliResult<H256>;

    /// Receipt of a mined transaction, `None` while pending
    async fn transaction_receipt(&self, tx_hash: &H256) -> CliResult<Option<Receipt>>;
}

#[async_trait]
impl<T: LedgerTransport + ?Sized> LedgerTransport for &T {
    async fn accounts(&self) -> CliResult<Vec<Address>> {
        (**self).accounts().await
    }

    async fn send_transaction(&self, tx: &TxRequest) -> CliResult<H256> {
        (**self).send_transaction(tx).await
    }

    async fn transaction_receipt(&self, tx_hash: &H256) -> CliResult<Option<Receipt>> {
        (**self).transaction_receipt(tx_hash).await
    }
}

fn quantity_hex<S: Serializer>(value: &Option<Uint256>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_str(&v.to_quantity_hex()),
        None => serializer.serialize_none(),
    }
}

/// Transaction submitted through `eth_sendTransaction`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxRequest {
    pub from: Address,
    /// `None` for contract creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    pub data: HexBytes,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "quantity_hex")]
    pub gas_price: Option<Uint256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<Quantity>,
}

/// How long and how often to wait for a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            timeout: Duration::from_secs(DEFAULT_RECEIPT_TIMEOUT_SECS),
        }
    }
}

/// Poll until the transaction is mined.
///
/// A mined receipt with status `0x0` is a remote failure and is returned
/// as [`CliError::TransactionReverted`]. There is no retry.
pub async fn wait_for_receipt<T: LedgerTransport + ?Sized>(
    transport: &T,
    tx_hash: H256,
    policy: &ReceiptPolicy,
) -> CliResult<Receipt> {
    let started = Instant::now();
    loop {
        if let Some(receipt) = transport.transaction_receipt(&tx_hash).await? {
            if !receipt.succeeded() {
                warn!("Transaction {} reverted", tx_hash);
                return Err(CliError::TransactionReverted { tx_hash });
            }
            debug!(
                "Transaction {} mined in block {:?} after {:?}",
                tx_hash,
                receipt.block_number.map(|b| b.as_u64()),
                started.elapsed()
            );
            return Ok(receipt);
        }
        if started.elapsed() >= policy.timeout {
            return Err(CliError::ReceiptTimeout {
                tx_hash,
                waited_secs: policy.timeout.as_secs(),
            });
        }
        sleep(policy.poll_interval).await;
    }
}

/// Submit and wait for the receipt
pub async fn send_and_confirm<T: LedgerTransport + ?Sized>(
    transport: &T,
    tx: &TxRequest,
    policy: &ReceiptPolicy,
) -> CliResult<Receipt> {
    let tx_hash = transport.send_transaction(tx).await?;
    debug!("Submitted transaction {}", tx_hash);
    wait_for_receipt(transport, tx_hash, policy).await
}

// ============================================================================
// HTTP JSON-RPC
// ============================================================================

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

/// JSON-RPC 2.0 client over HTTP
pub struct JsonRpcClient {
    url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one call and deserialize its `result`
    pub async fn call<R: DeserializeOwned>(&self, method: &str, params: Value) -> CliResult<R> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!("-> {} #{} to {}", method, id, self.url);

        let response: RpcResponse = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(CliError::RpcError {
                code: error.code,
                message: error.message,
            });
        }
        let result = response.result.unwrap_or(Value::Null);
        serde_json::from_value(result).map_err(|e| CliError::InvalidRpcResponse {
            method: method.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl LedgerTransport for JsonRpcClient {
    async fn accounts(&self) -> CliResult<Vec<Address>> {
        self.call("eth_accounts", json!([])).await
    }

    async fn send_transaction(&self, tx: &TxRequest) -> CliResult<H256> {
        self.call("eth_sendTransaction", json!([tx])).await
    }

    async fn transaction_receipt(&self, tx_hash: &H256) -> CliResult<Option<Receipt>> {
        self.call("eth_getTransactionReceipt", json!([tx_hash])).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Returns `None` a fixed number of times, then the stored receipt
    struct SlowLedger {
        pending_polls: Mutex<usize>,
        receipt: Option<Receipt>,
    }

    #[async_trait]
    impl LedgerTransport for SlowLedger {
        async fn accounts(&self) -> CliResult<Vec<Address>> {
            Ok(vec![])
        }

        async fn send_transaction(&self, _tx: &TxRequest) -> CliResult<H256> {
            Ok(H256([7u8; 32]))
        }

        async fn transaction_receipt(&self, _tx_hash: &H256) -> CliResult<Option<Receipt>> {
            let mut pending = self.pending_polls.lock().unwrap();
            if *pending > 0 {
                *pending -= 1;
                return Ok(None);
            }
            Ok(self.receipt.clone())
        }
    }

    fn receipt(status: u64) -> Receipt {
        Receipt {
            transaction_hash: H256([7u8; 32]),
            block_number: Some(Quantity(3)),
            contract_address: None,
            gas_used: None,
            status: Some(Quantity(status)),
            logs: vec![],
        }
    }

    fn fast_policy() -> ReceiptPolicy {
        ReceiptPolicy {
            poll_interval: Duration::from_millis(1),
            timeout: Duration::from_millis(200),
        }
    }

    #[test]
    fn test_tx_request_wire_format() {
        let tx = TxRequest {
            from: Address([0x11; 20]),
            to: None,
            data: HexBytes(vec![0xde, 0xad]),
            gas_price: Some(Uint256::from_u64(60_000_000_001)),
            gas: None,
        };
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["from"], json!(format!("0x{}", "11".repeat(20))));
        assert_eq!(value["data"], json!("0xdead"));
        assert_eq!(value["gasPrice"], json!("0xdf8475801"));
        assert!(value.get("to").is_none());
        assert!(value.get("gas").is_none());
    }

    #[tokio::test]
    async fn test_wait_polls_until_mined() {
        let ledger = SlowLedger {
            pending_polls: Mutex::new(2),
            receipt: Some(receipt(1)),
        };
        let mined = wait_for_receipt(&ledger, H256([7u8; 32]), &fast_policy()).await.unwrap();
        assert_eq!(mined.block_number, Some(Quantity(3)));
        assert_eq!(*ledger.pending_polls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reverted_receipt_is_an_error() {
        let ledger = SlowLedger {
            pending_polls: Mutex::new(0),
            receipt: Some(receipt(0)),
        };
        let err = send_and_confirm(&ledger, &TxRequest {
            from: Address::ZERO,
            to: Some(Address([1u8; 20])),
            data: HexBytes(vec![]),
            gas_price: None,
            gas: None,
        }, &fast_policy())
        .await
        .unwrap_err();
        assert!(matches!(err, CliError::TransactionReverted { .. }));
    }

    #[tokio::test]
    async fn test_missing_receipt_times_out() {
        let ledger = SlowLedger {
            pending_polls: Mutex::new(0),
            receipt: None,
        };
        let policy = ReceiptPolicy {
            poll_interval: Duration::from_millis(1),
            timeout: Duration::from_millis(10),
        };
        let err = wait_for_receipt(&ledger, H256([7u8; 32]), &policy).await.unwrap_err();
        assert!(matches!(err, CliError::ReceiptTimeout { .. }));
    }
}
