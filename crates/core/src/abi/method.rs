use alloy::json_abi::{Function, JsonAbi};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FindFunctionError {
    #[error("Contract {contract} has no function {name}")]
    NotFound { contract: String, name: String },

    #[error(
        "Function {name} is overloaded on {contract}, use the full signature (one of: {candidates})"
    )]
    Ambiguous { contract: String, name: String, candidates: String },
}

/// Looks up a function by name, or by full signature such as
/// `transfer(address,uint256)` when the name is overloaded.
pub fn find_function<'a>(
    abi: &'a JsonAbi,
    contract: &str,
    name_or_signature: &str,
) -> Result<&'a Function, FindFunctionError> {
    let name_or_signature = name_or_signature.trim();
    let not_found = || FindFunctionError::NotFound {
        contract: contract.to_string(),
        name: name_or_signature.to_string(),
    };

    if let Some((name, _)) = name_or_signature.split_once('(') {
        let wanted = name_or_signature.replace(' ', "");
        return abi
            .function(name)
            .and_then(|overloads| overloads.iter().find(|function| function.signature() == wanted))
            .ok_or_else(not_found);
    }

    let overloads = abi.function(name_or_signature).ok_or_else(not_found)?;
    match overloads.as_slice() {
        [function] => Ok(function),
        [] => Err(not_found()),
        _ => Err(FindFunctionError::Ambiguous {
            contract: contract.to_string(),
            name: name_or_signature.to_string(),
            candidates: overloads
                .iter()
                .map(|function| function.signature())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abi() -> JsonAbi {
        JsonAbi::parse([
            "function getAddresses() external view returns (address[])",
            "function safeTransferFrom(address from, address to, uint256 id)",
            "function safeTransferFrom(address from, address to, uint256 id, bytes data)",
        ])
        .unwrap()
    }

    #[test]
    fn test_unique_name() {
        let abi = abi();
        let function = find_function(&abi, "DWDN", "getAddresses").unwrap();
        assert_eq!(function.signature(), "getAddresses()");
    }

    #[test]
    fn test_overloaded_name_needs_signature() {
        let abi = abi();
        assert!(matches!(
            find_function(&abi, "NFT", "safeTransferFrom"),
            Err(FindFunctionError::Ambiguous { .. })
        ));

        let function =
            find_function(&abi, "NFT", "safeTransferFrom(address, address, uint256)").unwrap();
        assert_eq!(function.inputs.len(), 3);
    }

    #[test]
    fn test_missing() {
        let abi = abi();
        assert!(matches!(find_function(&abi, "DWDN", "nope"), Err(FindFunctionError::NotFound { .. })));
        assert!(matches!(
            find_function(&abi, "DWDN", "getAddresses(uint256)"),
            Err(FindFunctionError::NotFound { .. })
        ));
    }
}
