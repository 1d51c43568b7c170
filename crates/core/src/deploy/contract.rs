use alloy::{
    dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt},
    json_abi::{Function, JsonAbi, StateMutability},
    network::TransactionBuilder,
    primitives::{Address, U256},
    providers::Provider,
    rpc::types::TransactionRequest,
};
use tracing::{info, warn};

use super::{send_and_wait, ContractError, ReceiptSummary};
use crate::{
    abi::{coerce_args, find_function, ArgContext, ScriptArg},
    provider::NetworkConnection,
};

/// Result of invoking a contract method.
#[derive(Debug, Clone)]
pub enum Invocation {
    /// Read-only call, decoded outputs.
    Call(Vec<DynSolValue>),
    /// Mined transaction.
    Transaction(ReceiptSummary),
}

/// A contract that lives at `address` on the connection's network.
pub struct DeployedContract<'a> {
    pub name: String,
    pub abi: JsonAbi,
    pub address: Address,
    connection: &'a NetworkConnection,
    /// Receipt of the deployment when this handle came from a factory.
    pub deployment: Option<ReceiptSummary>,
}

fn is_read_only(function: &Function) -> bool {
    matches!(function.state_mutability, StateMutability::View | StateMutability::Pure)
}

impl<'a> DeployedContract<'a> {
    pub fn new(
        name: String,
        abi: JsonAbi,
        address: Address,
        connection: &'a NetworkConnection,
        deployment: Option<ReceiptSummary>,
    ) -> Self {
        Self { name, abi, address, connection, deployment }
    }

    /// Placeholder context with this contract's address filled in.
    pub fn arg_context(&self, deployer: Option<Address>) -> ArgContext {
        ArgContext {
            signers: self.connection.get_signers().to_vec(),
            deployer,
            contract: Some(self.address),
        }
    }

    fn encode(
        &self,
        function: &Function,
        args: &[ScriptArg],
        context: &ArgContext,
    ) -> Result<Vec<u8>, ContractError> {
        let values = coerce_args(&function.name, &function.inputs, args, context)?;
        Ok(function.abi_encode_input(&values)?)
    }

    /// Executes a read-only `eth_call` and decodes the outputs.
    pub async fn call(
        &self,
        method: &str,
        args: &[ScriptArg],
        context: &ArgContext,
        from: Option<Address>,
    ) -> Result<Vec<DynSolValue>, ContractError> {
        let function = find_function(&self.abi, &self.name, method)?;
        if !is_read_only(function) {
            warn!(
                "{}.{} is not view or pure, eth_call only simulates it and nothing is sent",
                self.name, function.name
            );
        }
        let input = self.encode(function, args, context)?;

        let tx = TransactionRequest::default()
            .with_to(self.address)
            .with_input(input)
            .with_from(from.unwrap_or_else(|| self.connection.default_sender()));

        let output = self
            .connection
            .provider()
            .call(tx)
            .await
            .map_err(|e| ContractError::CallFailed(format!("{}.{}", self.name, method), e))?;

        Ok(function.abi_decode_output(&output)?)
    }

    /// Sends a state-mutating transaction and waits for its receipt.
    pub async fn send(
        &self,
        method: &str,
        args: &[ScriptArg],
        context: &ArgContext,
        from: Option<Address>,
        value: Option<U256>,
    ) -> Result<ReceiptSummary, ContractError> {
        let function = find_function(&self.abi, &self.name, method)?;
        let context_name = format!("{}.{}", self.name, function.name);

        if value.is_some() && function.state_mutability != StateMutability::Payable {
            return Err(ContractError::NotPayable(context_name));
        }

        let input = self.encode(function, args, context)?;
        let from = from.unwrap_or_else(|| self.connection.default_sender());

        let mut tx = TransactionRequest::default().with_to(self.address).with_input(input);
        if let Some(value) = value {
            tx = tx.with_value(value);
        }
        let tx = self.connection.prepare(tx, from);

        info!("Calling {} from {}", context_name, from);

        let receipt = send_and_wait(self.connection, tx)
            .await
            .map_err(|e| ContractError::from_send(&context_name, e))?;
        let summary = ReceiptSummary::from(&receipt);

        if !summary.status {
            return Err(ContractError::Reverted {
                context: context_name,
                hash: summary.transaction_hash,
            });
        }

        Ok(summary)
    }

    /// Calls view and pure functions, sends a transaction for anything else.
    pub async fn invoke(
        &self,
        method: &str,
        args: &[ScriptArg],
        context: &ArgContext,
        from: Option<Address>,
        value: Option<U256>,
    ) -> Result<Invocation, ContractError> {
        let function = find_function(&self.abi, &self.name, method)?;

        if is_read_only(function) && value.is_none() {
            self.call(method, args, context, from).await.map(Invocation::Call)
        } else {
            self.send(method, args, context, from, value).await.map(Invocation::Transaction)
        }
    }
}
