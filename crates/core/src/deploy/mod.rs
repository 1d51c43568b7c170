mod contract;
pub use contract::{DeployedContract, Invocation};

mod error;
pub use error::ContractError;

mod factory;
pub use factory::ContractFactory;

mod receipt;
pub use receipt::{send_and_wait, wait_for_receipt, ReceiptSummary, SendError, WaitError};

#[cfg(test)]
pub(crate) mod mock;
