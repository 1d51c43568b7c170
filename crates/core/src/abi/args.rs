use alloy::{
    dyn_abi::{DynSolType, DynSolValue, Specifier},
    json_abi::Param,
    primitives::Address,
};
use std::fmt;

use serde::{
    de::{self, SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArgError {
    #[error("{context} expects {expected} argument(s), got {actual}")]
    WrongCount { context: String, expected: usize, actual: usize },

    #[error("Parameter {param} has an unsupported type: {reason}")]
    UnsupportedType { param: String, reason: String },

    #[error("Argument '{value}' is not a valid {ty} for parameter {param}: {reason}")]
    Coerce { param: String, ty: String, value: String, reason: String },

    #[error("Placeholder {0} refers to signer {1} but only {2} signer(s) are available")]
    SignerOutOfRange(String, usize, usize),

    #[error("Placeholder {0} can not be used before the contract is deployed")]
    ContractNotDeployed(String),

    #[error("Unknown placeholder {0} (use $signer:N, $deployer or $contract)")]
    UnknownPlaceholder(String),
}

/// An argument as written in a script: a scalar or a (nested) list.
///
/// Lists map onto array, fixed array and tuple parameters element by element.
/// Integers up to `u128::MAX` may be written bare; anything larger has to be
/// quoted (or use units, e.g. `"1000 ether"`) since YAML reads it as a float.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScriptArg {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    List(Vec<ScriptArg>),
}

struct ScriptArgVisitor;

impl<'de> Visitor<'de> for ScriptArgVisitor {
    type Value = ScriptArg;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a bool, number, string or list of arguments")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(ScriptArg::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(ScriptArg::Int(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(i64::try_from(value).map(ScriptArg::Int).unwrap_or(ScriptArg::UInt(value)))
    }

    fn visit_i128<E: de::Error>(self, value: i128) -> Result<Self::Value, E> {
        Ok(ScriptArg::Text(value.to_string()))
    }

    fn visit_u128<E: de::Error>(self, value: u128) -> Result<Self::Value, E> {
        Ok(ScriptArg::Text(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        if value.fract() == 0.0 && value.abs() > u128::MAX as f64 {
            return Err(E::custom(format!(
                "integer {} is too large for an unquoted number, quote it to keep every digit",
                value
            )));
        }
        Ok(ScriptArg::Float(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(ScriptArg::Text(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(ScriptArg::Text(value))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(ScriptArg::List(items))
    }
}

impl<'de> Deserialize<'de> for ScriptArg {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ScriptArgVisitor)
    }
}

impl From<&str> for ScriptArg {
    fn from(value: &str) -> Self {
        ScriptArg::Text(value.to_string())
    }
}

/// Addresses that placeholders resolve to.
#[derive(Debug, Clone, Default)]
pub struct ArgContext {
    pub signers: Vec<Address>,
    pub deployer: Option<Address>,
    pub contract: Option<Address>,
}

impl ArgContext {
    fn resolve_placeholder(&self, text: &str) -> Result<Option<String>, ArgError> {
        let Some(name) = text.strip_prefix('$') else {
            return Ok(None);
        };

        if let Some(index) = name.strip_prefix("signer:") {
            let index: usize =
                index.parse().map_err(|_| ArgError::UnknownPlaceholder(text.to_string()))?;
            return self
                .signers
                .get(index)
                .map(|address| Some(address.to_string()))
                .ok_or_else(|| {
                    ArgError::SignerOutOfRange(text.to_string(), index, self.signers.len())
                });
        }

        match name {
            "deployer" => self
                .deployer
                .or_else(|| self.signers.first().copied())
                .map(|address| Some(address.to_string()))
                .ok_or_else(|| ArgError::SignerOutOfRange(text.to_string(), 0, 0)),
            "contract" => self
                .contract
                .map(|address| Some(address.to_string()))
                .ok_or_else(|| ArgError::ContractNotDeployed(text.to_string())),
            _ => Err(ArgError::UnknownPlaceholder(text.to_string())),
        }
    }

    /// Renders an argument as text, expanding placeholders on the way.
    pub fn render(&self, arg: &ScriptArg) -> Result<String, ArgError> {
        match arg {
            ScriptArg::Bool(value) => Ok(value.to_string()),
            ScriptArg::Int(value) => Ok(value.to_string()),
            ScriptArg::UInt(value) => Ok(value.to_string()),
            ScriptArg::Float(value) => Ok(value.to_string()),
            ScriptArg::Text(text) => {
                let text = text.trim();
                Ok(self.resolve_placeholder(text)?.unwrap_or_else(|| text.to_string()))
            }
            ScriptArg::List(items) => {
                let rendered =
                    items.iter().map(|item| self.render(item)).collect::<Result<Vec<_>, _>>()?;
                Ok(format!("[{}]", rendered.join(", ")))
            }
        }
    }

    /// Builds the value for `ty`. Lists are matched element by element
    /// against array and tuple types, scalars go through `coerce_str`.
    fn coerce(&self, param: &str, ty: &DynSolType, arg: &ScriptArg) -> Result<DynSolValue, ArgError> {
        let shape_error = |reason: String| ArgError::Coerce {
            param: param.to_string(),
            ty: ty.sol_type_name().to_string(),
            value: describe(arg),
            reason,
        };

        match (ty, arg) {
            (DynSolType::Array(inner), ScriptArg::List(items)) => items
                .iter()
                .map(|item| self.coerce(param, inner, item))
                .collect::<Result<Vec<_>, _>>()
                .map(DynSolValue::Array),
            (DynSolType::FixedArray(inner, len), ScriptArg::List(items)) => {
                if items.len() != *len {
                    return Err(shape_error(format!("expected {} item(s)", len)));
                }
                items
                    .iter()
                    .map(|item| self.coerce(param, inner, item))
                    .collect::<Result<Vec<_>, _>>()
                    .map(DynSolValue::FixedArray)
            }
            (DynSolType::Tuple(types), ScriptArg::List(items)) => {
                if items.len() != types.len() {
                    return Err(shape_error(format!("expected {} tuple field(s)", types.len())));
                }
                types
                    .iter()
                    .zip(items)
                    .map(|(field_ty, item)| self.coerce(param, field_ty, item))
                    .collect::<Result<Vec<_>, _>>()
                    .map(DynSolValue::Tuple)
            }
            (_, ScriptArg::List(_)) => {
                Err(shape_error("a list only fits array and tuple parameters".to_string()))
            }
            (DynSolType::String, ScriptArg::Text(_)) => Ok(DynSolValue::String(self.render(arg)?)),
            _ => {
                let rendered = self.render(arg)?;
                ty.coerce_str(&rendered).map_err(|e| ArgError::Coerce {
                    param: param.to_string(),
                    ty: ty.sol_type_name().to_string(),
                    value: rendered,
                    reason: e.to_string(),
                })
            }
        }
    }
}

fn describe(arg: &ScriptArg) -> String {
    match arg {
        ScriptArg::Bool(value) => value.to_string(),
        ScriptArg::Int(value) => value.to_string(),
        ScriptArg::UInt(value) => value.to_string(),
        ScriptArg::Float(value) => value.to_string(),
        ScriptArg::Text(text) => text.clone(),
        ScriptArg::List(items) => {
            format!("[{}]", items.iter().map(describe).collect::<Vec<_>>().join(", "))
        }
    }
}

fn param_label(param: &Param, index: usize) -> String {
    if param.name.is_empty() {
        format!("#{}", index)
    } else {
        param.name.clone()
    }
}

/// Coerces script arguments into ABI values for `params`.
///
/// `context_name` names the function or constructor in error messages.
pub fn coerce_args(
    context_name: &str,
    params: &[Param],
    args: &[ScriptArg],
    context: &ArgContext,
) -> Result<Vec<DynSolValue>, ArgError> {
    if params.len() != args.len() {
        return Err(ArgError::WrongCount {
            context: context_name.to_string(),
            expected: params.len(),
            actual: args.len(),
        });
    }

    params
        .iter()
        .zip(args)
        .enumerate()
        .map(|(index, (param, arg))| {
            let ty: DynSolType = param.resolve().map_err(|e| ArgError::UnsupportedType {
                param: param_label(param, index),
                reason: e.to_string(),
            })?;
            context.coerce(&param_label(param, index), &ty, arg)
        })
        .collect()
}
