use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MnemonicSigningKey {
    pub phrase: String,
    /// First address index derived from `m/44'/60'/0'/0/{index}`.
    #[serde(default)]
    pub index: u32,
    #[serde(default = "default_mnemonic_count")]
    pub count: u32,
}

fn default_mnemonic_count() -> u32 {
    1
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct KeystoreSigningKey {
    pub path: String,
    pub password: String,
}

/// Credentials used to sign transactions for a network.
///
/// Exactly one method may be configured.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SigningKey {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub private_keys: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mnemonic: Option<MnemonicSigningKey>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub keystore: Option<KeystoreSigningKey>,
}

impl SigningKey {
    pub fn from_private_keys(private_keys: Vec<String>) -> Self {
        Self { private_keys: Some(private_keys), ..Default::default() }
    }

    pub fn from_mnemonic(mnemonic: MnemonicSigningKey) -> Self {
        Self { mnemonic: Some(mnemonic), ..Default::default() }
    }

    pub fn from_keystore(keystore: KeystoreSigningKey) -> Self {
        Self { keystore: Some(keystore), ..Default::default() }
    }

    /// Short human readable name of the configured method.
    pub fn method(&self) -> &'static str {
        if self.private_keys.is_some() {
            "private keys"
        } else if self.mnemonic.is_some() {
            "mnemonic"
        } else if self.keystore.is_some() {
            "keystore"
        } else {
            "none"
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let configured_methods = [
            self.private_keys.is_some(),
            self.mnemonic.is_some(),
            self.keystore.is_some(),
        ]
        .iter()
        .filter(|&&x| x)
        .count();

        match configured_methods {
            0 => return Err("Signing key is not set".to_string()),
            1 => {}
            _ => return Err("Only one signing key method can be configured at a time".to_string()),
        }

        if let Some(private_keys) = &self.private_keys {
            if private_keys.is_empty() {
                return Err("private_keys cannot be empty".to_string());
            }
            for (index, key) in private_keys.iter().enumerate() {
                if key.trim().is_empty() {
                    return Err(format!("Private key at index {} cannot be empty", index));
                }
            }
        }

        if let Some(mnemonic) = &self.mnemonic {
            if mnemonic.phrase.trim().is_empty() {
                return Err("Mnemonic phrase cannot be empty".to_string());
            }
            if mnemonic.count == 0 {
                return Err("Mnemonic count must be at least 1".to_string());
            }
            if mnemonic.index.checked_add(mnemonic.count - 1).is_none() {
                return Err("Mnemonic index range overflows".to_string());
            }
        }

        if let Some(keystore) = &self.keystore {
            if keystore.path.trim().is_empty() {
                return Err("Keystore path cannot be empty".to_string());
            }
        }

        Ok(())
    }
}
