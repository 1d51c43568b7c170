mod signing_key;
pub use signing_key::{KeystoreSigningKey, MnemonicSigningKey, SigningKey};

mod loader;
pub use loader::{load_signers, LoadSignersError};
