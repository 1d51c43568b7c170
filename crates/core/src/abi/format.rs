use alloy::dyn_abi::DynSolValue;

/// Renders a decoded ABI value for terminal output.
pub fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(value) => value.to_string(),
        DynSolValue::Int(value, _) => value.to_string(),
        DynSolValue::Uint(value, _) => value.to_string(),
        DynSolValue::FixedBytes(word, size) => format!("0x{}", hex::encode(&word[..*size])),
        DynSolValue::Address(address) => address.to_string(),
        DynSolValue::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        DynSolValue::String(value) => format!("{:?}", value),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
            format!("[{}]", format_values(items))
        }
        DynSolValue::Tuple(items) => format!("({})", format_values(items)),
        other => format!("{:?}", other),
    }
}

pub fn format_values(values: &[DynSolValue]) -> String {
    values.iter().map(format_value).collect::<Vec<_>>().join(", ")
}
