mod chain_id;
pub use chain_id::{ChainId, ParseChainIdError};

mod gas_price;
pub use gas_price::GasPrice;

mod network_id;
pub use network_id::NetworkId;
