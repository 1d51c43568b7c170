use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use rdeploy_core::{CONFIG_FILE_NAME, ProjectConfig, read, unsubstituted_endpoints};

use crate::commands::error::ProjectLocationError;

#[derive(Debug, Clone)]
pub struct ProjectLocation {
    project_dir: PathBuf,
}

impl ProjectLocation {
    pub fn new(project_dir: PathBuf) -> Self {
        Self { project_dir }
    }

    pub fn path(&self) -> &Path {
        &self.project_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.project_dir.join(CONFIG_FILE_NAME)
    }

    /// Reads rdeploy.yaml with environment variables substituted.
    pub fn setup_config(&self) -> Result<ProjectConfig, ProjectLocationError> {
        if !self.config_path().is_file() {
            return Err(ProjectLocationError::NotAProject(self.project_dir.display().to_string()));
        }

        Ok(read(&self.config_path(), false)?)
    }

    /// Endpoints built from `${VAR}` placeholders, as written in rdeploy.yaml.
    pub fn unsubstituted_endpoints(&self) -> Result<HashMap<String, String>, ProjectLocationError> {
        Ok(unsubstituted_endpoints(&self.config_path())?)
    }

    pub fn artifacts_dir(&self, config: &ProjectConfig) -> PathBuf {
        self.project_dir.join(&config.artifacts_directory)
    }

    pub fn deployments_dir(&self, config: &ProjectConfig) -> PathBuf {
        self.project_dir.join(&config.deployments_directory)
    }

    /// Resolves a user supplied file path, trying the project dir when it
    /// does not exist relative to the working directory.
    pub fn resolve_file(&self, file: &str) -> PathBuf {
        let path = PathBuf::from(file);
        if path.is_absolute() || path.exists() { path } else { self.project_dir.join(path) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_not_a_project() {
        let dir = tempfile::tempdir().unwrap();
        let location = ProjectLocation::new(dir.path().to_path_buf());

        assert!(matches!(location.setup_config(), Err(ProjectLocationError::NotAProject(_))));
    }

    #[test]
    fn test_endpoint_placeholders_are_not_expanded_for_display() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "name: dwdn\nnetworks:\n  - name: dev\n    host: localhost\n  - name: ccnbeta\n    url: ${RDEPLOY_CLI_TEST_CCNBETA_URL}\n",
        )
        .unwrap();
        let location = ProjectLocation::new(dir.path().to_path_buf());

        let endpoints = location.unsubstituted_endpoints().unwrap();
        assert_eq!(endpoints.get("ccnbeta").map(String::as_str), Some("${RDEPLOY_CLI_TEST_CCNBETA_URL}"));
        assert!(!endpoints.contains_key("dev"));
    }
}
