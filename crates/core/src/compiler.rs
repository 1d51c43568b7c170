use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SOLC_VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^v?(\d+)\.(\d+)\.(\d+)([-+][0-9A-Za-z.+-]+)?$").expect("static regex is valid")
});

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OptimizerSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_runs")]
    pub runs: u32,
}

fn default_runs() -> u32 {
    200
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self { enabled: false, runs: default_runs() }
    }
}

/// solc settings the artifacts are expected to have been built with.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CompilerSettings {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parser: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub evm_version: Option<String>,
    #[serde(default)]
    pub optimizer: OptimizerSettings,
}

impl CompilerSettings {
    pub fn validate(&self) -> Result<(), String> {
        if !SOLC_VERSION.is_match(self.version.trim()) {
            return Err(format!(
                "Compiler version '{}' is not a valid solc version (expected MAJOR.MINOR.PATCH)",
                self.version
            ));
        }

        if self.optimizer.enabled && self.optimizer.runs == 0 {
            return Err("Optimizer runs must be greater than 0 when enabled".to_string());
        }

        Ok(())
    }

    /// `(major, minor, patch)` of the configured version.
    pub fn semver(&self) -> Option<(u64, u64, u64)> {
        parse_semver(&self.version)
    }

    /// Whether a version string embedded in an artifact (for example
    /// `0.5.16+commit.9c3226ce.Emscripten.clang`) was produced by this compiler.
    pub fn matches_artifact_version(&self, artifact_version: &str) -> bool {
        match (self.semver(), parse_semver(artifact_version)) {
            (Some(expected), Some(actual)) => expected == actual,
            _ => true,
        }
    }
}

fn parse_semver(version: &str) -> Option<(u64, u64, u64)> {
    let captures = SOLC_VERSION.captures(version.trim())?;
    Some((captures[1].parse().ok()?, captures[2].parse().ok()?, captures[3].parse().ok()?))
}
