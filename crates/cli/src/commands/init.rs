use std::path::Path;

use dialoguer::Confirm;
use rdeploy_core::{write_file, CONFIG_FILE_NAME};

use crate::{
    commands::error::InitError,
    console::{print_success_message, print_warn_message},
};

const CONFIG_TEMPLATE: &str = r#"name: my-project
description: Contract deployments
compiler:
  version: 0.8.24
  optimizer:
    enabled: true
    runs: 200
contracts_directory: contracts
artifacts_directory: artifacts
deployments_directory: deployments
networks:
  # local node with unlocked accounts (ganache, anvil, hardhat node)
  - name: dev
    host: 127.0.0.1
    port: 8545
    network_id: "*"
  - name: testnet
    url: ${TESTNET_RPC_URL}
    chain_id: 11155111
    timeout_blocks: 200
    signing_key:
      private_keys:
        - ${TESTNET_PRIVATE_KEY}
"#;

const SCRIPT_TEMPLATE: &str = r#"contract: MyContract
constructor_args: []
steps: []
"#;

const ENV_TEMPLATE: &str = r#"TESTNET_RPC_URL=
TESTNET_PRIVATE_KEY=
"#;

const GITIGNORE_TEMPLATE: &str = r#".env
"#;

fn write(path: &Path, contents: &str) -> Result<(), InitError> {
    write_file(path, contents).map_err(|e| InitError::Write(path.display().to_string(), e))
}

pub fn handle_init(path: &Path, force: bool) -> Result<(), InitError> {
    let config_path = path.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        let overwrite = Confirm::new()
            .with_prompt(format!("{} already exists, overwrite it?", config_path.display()))
            .default(false)
            .interact()?;

        if !overwrite {
            print_warn_message("Init cancelled, nothing was written");
            return Ok(());
        }
    }

    write(&config_path, CONFIG_TEMPLATE)?;
    write(&path.join("scripts").join("deploy.yaml"), SCRIPT_TEMPLATE)?;

    // never clobber a real .env
    if !path.join(".env").exists() {
        write(&path.join(".env"), ENV_TEMPLATE)?;
    }
    if !path.join(".gitignore").exists() {
        write(&path.join(".gitignore"), GITIGNORE_TEMPLATE)?;
    }

    print_success_message(&format!("Project initialized in {}", path.display()));
    Ok(())
}
