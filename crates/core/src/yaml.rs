use std::{
    collections::{HashMap, HashSet},
    env, fs::File, io::Read, path::Path};

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{compiler::CompilerSettings, network::NetworkProfile, signing::SigningKey};

pub const CONFIG_FILE_NAME: &str = "rdeploy.yaml";

fn default_contracts_directory() -> String {
    "contracts".to_string()
}

fn default_artifacts_directory() -> String {
    "artifacts".to_string()
}

fn default_deployments_directory() -> String {
    "deployments".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub compiler: Option<CompilerSettings>,
    #[serde(default = "default_contracts_directory")]
    pub contracts_directory: String,
    #[serde(default = "default_artifacts_directory")]
    pub artifacts_directory: String,
    #[serde(default = "default_deployments_directory")]
    pub deployments_directory: String,
    /// Used by every network that does not define its own key.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub signing_key: Option<SigningKey>,
    pub networks: Vec<NetworkProfile>,
}

impl ProjectConfig {
    pub fn network(&self, name: &str) -> Result<&NetworkProfile, UnknownNetworkError> {
        self.networks.iter().find(|network| network.name == name).ok_or_else(|| {
            UnknownNetworkError {
                name: name.to_string(),
                known: self
                    .networks
                    .iter()
                    .map(|network| network.name.clone())
                    .collect::<Vec<_>>()
                    .join(", "),
            }
        })
    }

    /// The network's own key, else the project-wide key. `None` means the
    /// node manages the accounts.
    pub fn signing_key_for<'a>(&'a self, network: &'a NetworkProfile) -> Option<&'a SigningKey> {
        network.signing_key.as_ref().or(self.signing_key.as_ref())
    }

    pub fn validate(&self) -> Result<(), ReadYamlError> {
        if self.networks.is_empty() {
            return Err(ReadYamlError::NoNetworksEnabled);
        }

        let mut seen = HashSet::new();
        for network in &self.networks {
            network.validate().map_err(ReadYamlError::NetworkInvalid)?;

            if !seen.insert(network.name.as_str()) {
                return Err(ReadYamlError::DuplicateNetwork(network.name.clone()));
            }
        }

        if let Some(signing_key) = &self.signing_key {
            signing_key.validate().map_err(ReadYamlError::SigningKeyYamlError)?;
        }

        if let Some(compiler) = &self.compiler {
            compiler.validate().map_err(ReadYamlError::CompilerInvalid)?;
        }

        Ok(())
    }
}

#[derive(Error, Debug)]
#[error("Network {name} is not defined in {CONFIG_FILE_NAME} (known networks: {known})")]
pub struct UnknownNetworkError {
    pub name: String,
    pub known: String,
}

/// Substitutes `${VAR}` occurrences with values from the environment.
pub fn substitute_env_variables(contents: &str) -> Result<String, ReadYamlError> {
    let re = Regex::new(r"\$\{([^}]+)\}")?;

    let mut missing = None;
    let result = re.replace_all(contents, |caps: &Captures| {
        let var_name = caps[1].trim();
        match env::var(var_name) {
            Ok(val) => val,
            Err(_) => {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(var_name) => Err(ReadYamlError::EnvironmentVariableNotFound(var_name)),
        None => Ok(result.into_owned()),
    }
}

#[derive(Error, Debug)]
pub enum ReadYamlError {
    #[error("Can not find yaml at {0}")]
    CanNotFindYaml(String),

    #[error("Can not read yaml: {0}")]
    CanNotReadYaml(std::io::Error),

    #[error("Config is invalid yaml and does not match the struct - {0}")]
    SetupConfigInvalidYaml(String),

    #[error("Environment variable {0} not found")]
    EnvironmentVariableNotFound(String),

    #[error("Environment substitution pattern failed: {0}")]
    SubstitutionPattern(#[from] regex::Error),

    #[error("No networks enabled in the yaml")]
    NoNetworksEnabled,

    #[error("Network {0} is defined more than once")]
    DuplicateNetwork(String),

    #[error("{0}")]
    NetworkInvalid(String),

    #[error("Signing key yaml bad format: {0}")]
    SigningKeyYamlError(String),

    #[error("Compiler settings are invalid: {0}")]
    CompilerInvalid(String),
}

/// Reads a yaml file into a string, substituting environment variables
/// unless `raw_yaml` is set.
pub(crate) fn read_substituted(file_path: &Path, raw_yaml: bool) -> Result<String, ReadYamlError> {
    let mut file = File::open(file_path)
        .map_err(|_| ReadYamlError::CanNotFindYaml(file_path.display().to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(ReadYamlError::CanNotReadYaml)?;

    if raw_yaml {
        Ok(contents)
    } else {
        substitute_env_variables(&contents)
    }
}

/// Reads, parses and validates the project configuration file.
pub fn read(file_path: &Path, raw_yaml: bool) -> Result<ProjectConfig, ReadYamlError> {
    let contents = read_substituted(file_path, raw_yaml)?;

    let config: ProjectConfig = serde_yaml::from_str(&contents)
        .map_err(|e| ReadYamlError::SetupConfigInvalidYaml(e.to_string()))?;

    config.validate()?;

    Ok(config)
}

#[derive(Deserialize)]
struct RawNetworkEndpoint {
    name: String,
    #[serde(default)]
    url: Option<serde_yaml::Value>,
    #[serde(default)]
    host: Option<serde_yaml::Value>,
}

#[derive(Deserialize)]
struct RawNetworks {
    #[serde(default)]
    networks: Vec<RawNetworkEndpoint>,
}

/// Endpoints of networks whose `url` or `host` is written with `${VAR}`
/// placeholders, keyed by network name and kept exactly as written.
///
/// Used to print endpoints without leaking the secrets they are built from.
pub fn unsubstituted_endpoints(file_path: &Path) -> Result<HashMap<String, String>, ReadYamlError> {
    let contents = read_substituted(file_path, true)?;
    let raw: RawNetworks = serde_yaml::from_str(&contents)
        .map_err(|e| ReadYamlError::SetupConfigInvalidYaml(e.to_string()))?;

    Ok(raw
        .networks
        .into_iter()
        .filter_map(|network| {
            let endpoint = network.url.or(network.host)?;
            match endpoint {
                serde_yaml::Value::String(text) if text.contains("${") => {
                    Some((network.name, text))
                }
                _ => None,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkId;

    const TRUFFLE_STYLE: &str = r#"
name: dydx
compiler:
  version: 0.5.7
  parser: solcjs
  evm_version: byzantium
  optimizer:
    enabled: true
    runs: 10000
networks:
  - name: test
    host: 0.0.0.0
    port: 8545
    gas_price: 1
    network_id: '1001'
  - name: kovan
    url: https://kovan.example.org
    network_id: '42'
    gas_price: 10 gwei
    gas: 6900000
    timeout_blocks: 500
    signing_key:
      private_keys: ["0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"]
  - name: coverage
    host: 127.0.0.1
    network_id: '1002'
    port: 8555
    gas: 0xffffffffff
"#;

    fn parse(yaml: &str) -> Result<ProjectConfig, ReadYamlError> {
        let config: ProjectConfig = serde_yaml::from_str(yaml)
            .map_err(|e| ReadYamlError::SetupConfigInvalidYaml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn test_parse_truffle_style_profiles() {
        let config = parse(TRUFFLE_STYLE).unwrap();

        assert_eq!(config.networks.len(), 3);
        assert_eq!(config.artifacts_directory, "artifacts");

        let test = config.network("test").unwrap();
        assert_eq!(test.rpc_url().unwrap(), "http://0.0.0.0:8545");
        assert_eq!(test.network_id, NetworkId::Id(1001));
        assert_eq!(test.gas_price.unwrap().into_u128(), 1);

        let kovan = config.network("kovan").unwrap();
        assert_eq!(kovan.gas_price.unwrap().into_u128(), 10_000_000_000);
        assert_eq!(kovan.gas, Some(6_900_000));
        assert_eq!(kovan.timeout_blocks(), 500);

        let coverage = config.network("coverage").unwrap();
        assert_eq!(coverage.gas, Some(0xffffffffff));

        let compiler = config.compiler.unwrap();
        assert_eq!(compiler.evm_version.as_deref(), Some("byzantium"));
        assert_eq!(compiler.optimizer.runs, 10000);
    }

    #[test]
    fn test_unknown_network_lists_known_names() {
        let config = parse(TRUFFLE_STYLE).unwrap();
        let err = config.network("mainnet").unwrap_err();
        assert_eq!(err.known, "test, kovan, coverage");
    }

    #[test]
    fn test_signing_key_falls_back_to_project_key() {
        let yaml = r#"
name: uniswap
signing_key:
  private_keys: ["0x01"]
networks:
  - name: ccnbeta
    url: http://localhost:8545
    chain_id: 9700
  - name: own
    url: http://localhost:8545
    signing_key:
      mnemonic:
        phrase: test test test test test test test test test test test junk
"#;
        let config = parse(yaml).unwrap();

        let ccnbeta = config.network("ccnbeta").unwrap();
        assert_eq!(config.signing_key_for(ccnbeta).unwrap().method(), "private keys");

        let own = config.network("own").unwrap();
        assert_eq!(config.signing_key_for(own).unwrap().method(), "mnemonic");
    }

    #[test]
    fn test_rejects_duplicate_networks() {
        let yaml = r#"
name: dup
networks:
  - name: dev
    host: localhost
  - name: dev
    url: http://localhost:8545
"#;
        assert!(matches!(parse(yaml), Err(ReadYamlError::DuplicateNetwork(name)) if name == "dev"));
    }

    #[test]
    fn test_rejects_empty_networks() {
        assert!(matches!(parse("name: x\nnetworks: []\n"), Err(ReadYamlError::NoNetworksEnabled)));
    }

    #[test]
    fn test_rejects_profile_without_endpoint() {
        let yaml = "name: x\nnetworks:\n  - name: broken\n    network_id: '*'\n";
        assert!(matches!(parse(yaml), Err(ReadYamlError::NetworkInvalid(_))));
    }

    #[test]
    fn test_rejects_invalid_compiler() {
        let yaml = "name: x\ncompiler:\n  version: latest\nnetworks:\n  - name: dev\n    host: localhost\n";
        assert!(matches!(parse(yaml), Err(ReadYamlError::CompilerInvalid(_))));
    }

    #[test]
    fn test_substitute_env_variables() {
        env::set_var("RDEPLOY_TEST_SUBSTITUTE_URL", "http://node:8545");

        let out = substitute_env_variables("url: ${RDEPLOY_TEST_SUBSTITUTE_URL}\n").unwrap();
        assert_eq!(out, "url: http://node:8545\n");
    }

    #[test]
    fn test_substitute_env_variables_missing() {
        let err = substitute_env_variables("key: ${RDEPLOY_TEST_DEFINITELY_UNSET}").unwrap_err();
        assert!(
            matches!(err, ReadYamlError::EnvironmentVariableNotFound(name) if name == "RDEPLOY_TEST_DEFINITELY_UNSET")
        );
    }

    #[test]
    fn test_typed_fields_from_environment() {
        env::set_var("RDEPLOY_TEST_GAS_PRICE", "20 gwei");
        env::set_var("RDEPLOY_TEST_DEPLOYER", "0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
        env::set_var("RDEPLOY_TEST_CHAIN_ID", "9700");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "name: dwdn\nnetworks:\n  - name: mainnet\n    url: https://node.example.org\n    chain_id: ${RDEPLOY_TEST_CHAIN_ID}\n    gas_price: ${RDEPLOY_TEST_GAS_PRICE}\n    from: ${RDEPLOY_TEST_DEPLOYER}\n",
        )
        .unwrap();

        let config = read(&path, false).unwrap();
        let network = config.network("mainnet").unwrap();
        assert_eq!(network.gas_price.unwrap().into_u128(), 20_000_000_000);
        assert_eq!(network.chain_id.unwrap().u64(), 9700);
        assert_eq!(
            network.from.unwrap().to_string(),
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
        );
    }

    #[test]
    fn test_unsubstituted_endpoints_keep_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "name: dwdn\nnetworks:\n  - name: dev\n    host: localhost\n  - name: ccnbeta\n    url: https://rpc.example.org/${RDEPLOY_TEST_UNSET_API_KEY}\n",
        )
        .unwrap();

        let endpoints = unsubstituted_endpoints(&path).unwrap();
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints["ccnbeta"], "https://rpc.example.org/${RDEPLOY_TEST_UNSET_API_KEY}");
    }

    #[test]
    fn test_placeholders_without_braces_are_left_alone() {
        let out = substitute_env_variables("args: [\"$signer:1\", \"$deployer\"]").unwrap();
        assert_eq!(out, "args: [\"$signer:1\", \"$deployer\"]");
    }
}
