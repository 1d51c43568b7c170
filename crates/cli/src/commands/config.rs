use rdeploy_core::compiler::CompilerSettings;

use crate::{
    commands::error::ProjectLocationError,
    console::{print_success_message, print_table, print_warn_message},
    project_location::ProjectLocation,
};

fn compiler_rows(compiler: &CompilerSettings) -> Vec<Vec<String>> {
    let optimizer = if compiler.optimizer.enabled {
        format!("enabled, {} runs", compiler.optimizer.runs)
    } else {
        "disabled".to_string()
    };

    vec![
        vec!["version".to_string(), compiler.version.clone()],
        vec!["parser".to_string(), compiler.parser.clone().unwrap_or_else(|| "default".to_string())],
        vec![
            "evm version".to_string(),
            compiler.evm_version.clone().unwrap_or_else(|| "default".to_string()),
        ],
        vec!["optimizer".to_string(), optimizer],
    ]
}

pub fn handle_config(project_path: &ProjectLocation) -> Result<(), ProjectLocationError> {
    let config = project_path.setup_config()?;

    print_success_message(&format!(
        "{} is valid: project {}, {} network(s)",
        project_path.config_path().display(),
        config.name,
        config.networks.len()
    ));

    match &config.compiler {
        Some(compiler) => print_table(vec!["Compiler", ""], compiler_rows(compiler), None),
        None => print_warn_message("No compiler settings, artifact versions will not be checked"),
    }

    let artifacts_dir = project_path.artifacts_dir(&config);
    if !artifacts_dir.is_dir() {
        print_warn_message(&format!(
            "Artifacts directory {} does not exist yet, compile your contracts first",
            artifacts_dir.display()
        ));
    }

    Ok(())
}
