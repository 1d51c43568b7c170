use std::path::Path;

use alloy::signers::local::{
    coins_bip39::English, LocalSignerError, MnemonicBuilder, PrivateKeySigner,
};
use thiserror::Error;
use tracing::debug;

use super::SigningKey;

#[derive(Error, Debug)]
pub enum LoadSignersError {
    #[error("Signing key is invalid: {0}")]
    InvalidSigningKey(String),

    #[error("Private key at index {0} is invalid: {1}")]
    InvalidPrivateKey(usize, String),

    #[error("Could not derive account {0} from mnemonic: {1}")]
    MnemonicDerivation(u32, LocalSignerError),

    #[error("Could not decrypt keystore {0}: {1}")]
    Keystore(String, LocalSignerError),
}

/// Turns a configured signing key into local signers.
///
/// Relative keystore paths are resolved against `project_path`.
pub fn load_signers(
    project_path: &Path,
    signing_key: &SigningKey,
) -> Result<Vec<PrivateKeySigner>, LoadSignersError> {
    signing_key.validate().map_err(LoadSignersError::InvalidSigningKey)?;

    if let Some(private_keys) = &signing_key.private_keys {
        return private_keys
            .iter()
            .enumerate()
            .map(|(index, key)| {
                key.trim()
                    .parse::<PrivateKeySigner>()
                    .map_err(|e| LoadSignersError::InvalidPrivateKey(index, e.to_string()))
            })
            .collect();
    }

    if let Some(mnemonic) = &signing_key.mnemonic {
        let mut signers = Vec::with_capacity(mnemonic.count as usize);
        for index in mnemonic.index..mnemonic.index + mnemonic.count {
            let signer = MnemonicBuilder::<English>::default()
                .phrase(mnemonic.phrase.trim())
                .index(index)
                .and_then(|builder| builder.build())
                .map_err(|e| LoadSignersError::MnemonicDerivation(index, e))?;
            debug!("Derived mnemonic account {} at index {}", signer.address(), index);
            signers.push(signer);
        }
        return Ok(signers);
    }

    if let Some(keystore) = &signing_key.keystore {
        let path = project_path.join(&keystore.path);
        let signer = PrivateKeySigner::decrypt_keystore(&path, &keystore.password)
            .map_err(|e| LoadSignersError::Keystore(path.display().to_string(), e))?;
        return Ok(vec![signer]);
    }

    Err(LoadSignersError::InvalidSigningKey("Signing key is not set".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::MnemonicSigningKey;
    use alloy::primitives::address;

    const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";

    #[test]
    fn test_private_keys_with_and_without_prefix() {
        let key = SigningKey::from_private_keys(vec![
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".to_string(),
            "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d".to_string(),
        ]);

        let signers = load_signers(Path::new("."), &key).unwrap();

        assert_eq!(signers.len(), 2);
        assert_eq!(signers[0].address(), address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        assert_eq!(signers[1].address(), address!("70997970C51812dc3A010C7d01b50e0d17dc79C8"));
    }

    #[test]
    fn test_invalid_private_key_reports_index() {
        let key = SigningKey::from_private_keys(vec!["not-a-key".to_string()]);

        match load_signers(Path::new("."), &key) {
            Err(LoadSignersError::InvalidPrivateKey(0, _)) => {}
            other => panic!("unexpected result: {:?}", other.map(|s| s.len())),
        }
    }

    #[test]
    fn test_mnemonic_derives_consecutive_accounts() {
        let key = SigningKey::from_mnemonic(MnemonicSigningKey {
            phrase: TEST_MNEMONIC.to_string(),
            index: 1,
            count: 2,
        });

        let signers = load_signers(Path::new("."), &key).unwrap();

        assert_eq!(signers.len(), 2);
        assert_eq!(signers[0].address(), address!("70997970C51812dc3A010C7d01b50e0d17dc79C8"));
        assert_eq!(signers[1].address(), address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC"));
    }

    #[test]
    fn test_missing_keystore_is_an_error() {
        let key = SigningKey::from_keystore(crate::signing::KeystoreSigningKey {
            path: "does-not-exist.json".to_string(),
            password: "secret".to_string(),
        });

        assert!(matches!(
            load_signers(Path::new("/nonexistent"), &key),
            Err(LoadSignersError::Keystore(_, _))
        ));
    }
}
