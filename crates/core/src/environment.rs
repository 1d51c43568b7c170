use std::path::Path;

use dotenvy::{dotenv, from_path};

/// Loads environment variables from a .env file in the project directory.
///
/// Falls back to a .env in the current working directory (or its parents)
/// when the project has none. Variables already set in the process win.
pub fn load_env_from_project_path(project_path: &Path) {
    if from_path(project_path.join(".env")).is_err() {
        dotenv().ok();
    }
}
