use alloy::{
    dyn_abi::DynSolValue,
    primitives::{address, Address, Bytes, TxHash, B256, U64},
    providers::mock::Asserter,
};
use serde_json::{json, Value};

use crate::{network::NetworkProfile, provider::NetworkConnection};

pub(crate) const DEPLOYER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub(crate) const OPERATOR: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
pub(crate) const CONTRACT: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");

pub(crate) const DWDN_ABI: &str = r#"[
  {"type":"function","name":"getAddresses","inputs":[],"outputs":[{"name":"","type":"address[]"}],"stateMutability":"view"},
  {"type":"function","name":"addUserToBlacklist","inputs":[{"name":"user","type":"address"}],"outputs":[],"stateMutability":"nonpayable"},
  {"type":"function","name":"getBlackListAddresses","inputs":[],"outputs":[{"name":"","type":"address[]"}],"stateMutability":"view"}
]"#;

pub(crate) fn dwdn_artifact_json() -> String {
    format!(r#"{{"contractName":"DWDN","abi":{},"bytecode":"0x6080604052"}}"#, DWDN_ABI)
}

pub(crate) fn connection(asserter: &Asserter) -> NetworkConnection {
    NetworkConnection::mocked(
        asserter.clone(),
        vec![DEPLOYER, OPERATOR],
        NetworkProfile::new("dev", "http://localhost:8545"),
    )
}

pub(crate) fn receipt(
    hash: TxHash,
    success: bool,
    to: Option<Address>,
    contract_address: Option<Address>,
) -> Value {
    json!({
        "type": "0x2",
        "status": if success { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x5208",
        "logs": [],
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "transactionHash": hash,
        "transactionIndex": "0x0",
        "blockHash": B256::repeat_byte(0xbb),
        "blockNumber": "0x64",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "from": DEPLOYER,
        "to": to,
        "contractAddress": contract_address,
    })
}

/// Queues the responses for one transaction mined at block 100: the hash,
/// the start block, the receipt and the block seen when it is polled.
pub(crate) fn push_mined(asserter: &Asserter, hash: TxHash, receipt: Value) {
    asserter.push_success(&hash);
    asserter.push_success(&U64::from(100));
    asserter.push_success(&receipt);
    asserter.push_success(&U64::from(100));
}

/// `eth_call` return data for a function returning `address[]`.
pub(crate) fn encoded_addresses(addresses: &[Address]) -> Bytes {
    let values = addresses.iter().map(|address| DynSolValue::Address(*address)).collect();
    DynSolValue::Tuple(vec![DynSolValue::Array(values)]).abi_encode_params().into()
}
