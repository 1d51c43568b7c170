mod profile;
pub use profile::{NetworkProfile, DEFAULT_CONFIRMATIONS, DEFAULT_PORT, DEFAULT_TIMEOUT_BLOCKS};

mod types;
pub use types::*;
