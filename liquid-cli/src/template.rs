//! Template client
//!
//! Typed access to a deployed `LiquidDemocracyTemplate`. Each method sends
//! one transaction from the configured account and waits for its receipt.
//! Fee pricing is passed through from [`CallOptions`]; nothing here picks a
//! gas price.

use lib_abi::{Address, Artifact, HexBytes, Interface, Quantity, Receipt, Token, Uint256};
use lib_governance::{DeploymentId, UnitDescriptor, VotingSettings};
use tracing::{debug, info};

use crate::abis::template_interface;
use crate::error::{CliError, CliResult};
use crate::logic::calls::{
    distribution_args, finalize_args, unit_setup_args, DISTRIBUTE_DEPARTMENT_TOKENS,
    FINALIZE_INSTANCE, INSTALL_DEPARTMENT, PREPARE_INSTANCE,
};
use crate::rpc::{send_and_confirm, LedgerTransport, ReceiptPolicy, TxRequest};

/// Per-transaction options forwarded to the node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOptions {
    pub gas_price: Option<Uint256>,
    pub gas: Option<u64>,
}

impl CallOptions {
    pub fn with_gas_price(gas_price: Uint256) -> Self {
        Self {
            gas_price: Some(gas_price),
            gas: None,
        }
    }

    fn request(&self, from: Address, to: Option<Address>, data: Vec<u8>) -> TxRequest {
        TxRequest {
            from,
            to,
            data: HexBytes(data),
            gas_price: self.gas_price,
            gas: self.gas.map(Quantity),
        }
    }
}

/// Client for one template instance
pub struct TemplateClient<T> {
    transport: T,
    address: Address,
    from: Address,
    interface: Interface,
    policy: ReceiptPolicy,
}

impl<T: LedgerTransport> TemplateClient<T> {
    /// Client using the bundled template interface
    pub fn new(transport: T, address: Address, from: Address, policy: ReceiptPolicy) -> CliResult<Self> {
        Ok(Self::with_interface(transport, address, from, template_interface()?, policy))
    }

    pub fn with_interface(
        transport: T,
        address: Address,
        from: Address,
        interface: Interface,
        policy: ReceiptPolicy,
    ) -> Self {
        Self {
            transport,
            address,
            from,
            interface,
            policy,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn sender(&self) -> Address {
        self.from
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn call(&self, function: &str, args: &[Token], options: &CallOptions) -> CliResult<Receipt> {
        let data = self.interface.encode_call(function, args)?;
        debug!("{} call data: {} bytes", function, data.len());
        let tx = options.request(self.from, Some(self.address), data);
        let receipt = send_and_confirm(&self.transport, &tx, &self.policy).await?;
        info!("{} confirmed in {}", function, receipt.transaction_hash);
        Ok(receipt)
    }

    /// Create the DAO shell with the management token and voting app
    pub async fn prepare_instance(
        &self,
        management: &UnitDescriptor,
        voting: &VotingSettings,
        token_index: u64,
        options: &CallOptions,
    ) -> CliResult<Receipt> {
        let args = unit_setup_args(management, voting, token_index);
        self.call(PREPARE_INSTANCE, &args, options).await
    }

    /// Add one department's token and voting app
    pub async fn install_department(
        &self,
        department: &UnitDescriptor,
        voting: &VotingSettings,
        token_index: u64,
        options: &CallOptions,
    ) -> CliResult<Receipt> {
        let args = unit_setup_args(department, voting, token_index);
        self.call(INSTALL_DEPARTMENT, &args, options).await
    }

    /// Mint the most recently installed department's tokens
    pub async fn distribute_department_tokens(
        &self,
        department: &UnitDescriptor,
        options: &CallOptions,
    ) -> CliResult<Receipt> {
        let args = distribution_args(department);
        self.call(DISTRIBUTE_DEPARTMENT_TOKENS, &args, options).await
    }

    /// Register the DAO under `id` and mint the management tokens
    pub async fn finalize_instance(
        &self,
        id: &DeploymentId,
        management: &UnitDescriptor,
        token_index: u64,
        use_agent_as_vault: bool,
        options: &CallOptions,
    ) -> CliResult<Receipt> {
        let args = finalize_args(id, management, token_index, use_agent_as_vault);
        self.call(FINALIZE_INSTANCE, &args, options).await
    }
}

/// Deploy a contract from its build artifact.
///
/// Returns the new contract address and the creation receipt.
pub async fn deploy_contract<T: LedgerTransport + ?Sized>(
    transport: &T,
    artifact: &Artifact,
    constructor_args: &[Token],
    from: Address,
    options: &CallOptions,
    policy: &ReceiptPolicy,
) -> CliResult<(Address, Receipt)> {
    let data = artifact
        .interface
        .encode_deploy(&artifact.bytecode, constructor_args)?;
    info!(
        "Deploying {} ({} bytes of creation code)",
        artifact.contract_name,
        data.len()
    );
    let tx = options.request(from, None, data);
    let receipt = send_and_confirm(transport, &tx, policy).await?;
    let address = receipt
        .contract_address
        .ok_or(CliError::ContractAddressMissing {
            tx_hash: receipt.transaction_hash,
        })?;
    info!("{} deployed at {}", artifact.contract_name, address.to_checksum());
    Ok((address, receipt))
}
