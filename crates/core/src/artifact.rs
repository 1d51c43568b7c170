use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::{json_abi::JsonAbi, primitives::Bytes};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Artifacts directory {0} does not exist, compile your contracts first")]
    DirectoryNotFound(String),

    #[error("No artifact named {name} found under {directory}")]
    NotFound { name: String, directory: String },

    #[error("Artifact name {name} is ambiguous, found: {matches}")]
    Ambiguous { name: String, matches: String },

    #[error("Could not read artifact {0}: {1}")]
    CanNotRead(String, std::io::Error),

    #[error("Artifact {0} is not valid json: {1}")]
    InvalidJson(String, serde_json::Error),

    #[error("Artifact {0} bytecode is not valid hex: {1}")]
    InvalidBytecode(String, hex::FromHexError),

    #[error("Contract {0} has no bytecode, it is an interface or abstract contract")]
    NotDeployable(String),

    #[error("Contract {0} has unlinked library references, link the libraries before deploying")]
    UnlinkedLibraries(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(String),
    Object { object: String },
}

impl RawBytecode {
    fn into_hex(self) -> String {
        match self {
            RawBytecode::Hex(hex) => hex,
            RawBytecode::Object { object } => object,
        }
    }
}

#[derive(Deserialize)]
struct RawCompiler {
    #[serde(default)]
    version: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    #[serde(default)]
    contract_name: Option<String>,
    abi: JsonAbi,
    #[serde(default)]
    bytecode: Option<RawBytecode>,
    #[serde(default)]
    compiler: Option<RawCompiler>,
}

/// ABI and creation bytecode of one compiled contract.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub contract_name: String,
    pub abi: JsonAbi,
    bytecode_hex: String,
    pub compiler_version: Option<String>,
    pub path: PathBuf,
}

impl ContractArtifact {
    /// Parses Hardhat, Truffle and Foundry style artifact json.
    ///
    /// `fallback_name` is used when the json carries no `contractName`.
    pub fn from_json(
        json: &str,
        fallback_name: &str,
        path: &Path,
    ) -> Result<Self, ArtifactError> {
        let raw: RawArtifact = serde_json::from_str(json)
            .map_err(|e| ArtifactError::InvalidJson(path.display().to_string(), e))?;

        Ok(Self {
            contract_name: raw.contract_name.unwrap_or_else(|| fallback_name.to_string()),
            abi: raw.abi,
            bytecode_hex: raw.bytecode.map(RawBytecode::into_hex).unwrap_or_default(),
            compiler_version: raw.compiler.and_then(|compiler| compiler.version),
            path: path.to_path_buf(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let json = fs::read_to_string(path)
            .map_err(|e| ArtifactError::CanNotRead(path.display().to_string(), e))?;
        let fallback_name =
            path.file_stem().map(|stem| stem.to_string_lossy().to_string()).unwrap_or_default();
        Self::from_json(&json, &fallback_name, path)
    }

    /// Creation bytecode, ready to be prefixed to encoded constructor args.
    pub fn bytecode(&self) -> Result<Bytes, ArtifactError> {
        let hex_code = self.bytecode_hex.trim();
        let hex_code = hex_code.strip_prefix("0x").unwrap_or(hex_code);

        if hex_code.is_empty() {
            return Err(ArtifactError::NotDeployable(self.contract_name.clone()));
        }

        // solc leaves `__$<hash>$__` (or `__Name____`) where library addresses go
        if hex_code.contains("__") {
            return Err(ArtifactError::UnlinkedLibraries(self.contract_name.clone()));
        }

        hex::decode(hex_code)
            .map(Bytes::from)
            .map_err(|e| ArtifactError::InvalidBytecode(self.path.display().to_string(), e))
    }
}

fn collect_matches(dir: &Path, file_name: &str, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            // Hardhat keeps build-info alongside the artifacts
            if path.file_name().is_some_and(|name| name == "build-info") {
                continue;
            }
            collect_matches(&path, file_name, out)?;
        } else if path.file_name().is_some_and(|name| name == file_name) {
            out.push(path);
        }
    }
    Ok(())
}

/// Finds `<name>.json` anywhere below `artifacts_dir`.
///
/// `name` may also be a path relative to `artifacts_dir` (with or without
/// the `.json` suffix) to pick between contracts sharing a name.
pub fn find_artifact(artifacts_dir: &Path, name: &str) -> Result<ContractArtifact, ArtifactError> {
    if !artifacts_dir.is_dir() {
        return Err(ArtifactError::DirectoryNotFound(artifacts_dir.display().to_string()));
    }

    if name.contains('/') {
        let mut direct = artifacts_dir.join(name);
        if direct.extension().is_none_or(|extension| extension != "json") {
            direct.set_extension("json");
        }
        if direct.is_file() {
            return ContractArtifact::load(&direct);
        }
    }

    let file_name = format!("{}.json", name);
    let mut matches = Vec::new();
    collect_matches(artifacts_dir, &file_name, &mut matches)
        .map_err(|e| ArtifactError::CanNotRead(artifacts_dir.display().to_string(), e))?;

    match matches.len() {
        0 => Err(ArtifactError::NotFound {
            name: name.to_string(),
            directory: artifacts_dir.display().to_string(),
        }),
        1 => ContractArtifact::load(&matches[0]),
        _ => {
            matches.sort();
            Err(ArtifactError::Ambiguous {
                name: name.to_string(),
                matches: matches
                    .iter()
                    .map(|path| {
                        path.strip_prefix(artifacts_dir).unwrap_or(path).display().to_string()
                    })
                    .collect::<Vec<_>>()
                    .join(", "),
            })
        }
    }
}
