use clap::Args;
use rdeploy_core::{
    abi::format_values,
    connect,
    deploy::ReceiptSummary,
    script::{run, DeployScript, RunOptions, ScriptReport, StepOutcome},
};

use crate::{
    commands::error::{DeployError, ProjectLocationError},
    console::{print_success_message, print_warn_message},
    project_location::ProjectLocation,
};

#[derive(Args)]
pub struct DeployArgs {
    /// Network profile name
    #[clap(long, short)]
    pub network: String,

    /// Deployment script, relative to the working directory or the project
    pub script: String,

    /// Estimate the deployment without sending anything
    #[clap(long)]
    pub dry_run: bool,

    /// Do not write a deployment record
    #[clap(long)]
    pub no_record: bool,
}

pub async fn handle_deploy(
    args: &DeployArgs,
    project_path: &ProjectLocation,
) -> Result<(), DeployError> {
    let config = project_path.setup_config()?;
    let network = config.network(&args.network).map_err(ProjectLocationError::from)?;
    let script = DeployScript::read(&project_path.resolve_file(&args.script))?;

    let connection = connect(project_path.path(), &config, network).await?;

    let options = RunOptions { dry_run: args.dry_run, no_record: args.no_record };
    let report = run(project_path.path(), &config, &connection, &script, &options).await?;

    print_report(&report);

    Ok(())
}

fn describe_receipt(receipt: &ReceiptSummary) -> String {
    let block = receipt.block_number.map(|b| b.to_string()).unwrap_or_else(|| "?".to_string());
    format!(
        "tx {} mined in block {} (gas used {}, {} log(s))",
        receipt.transaction_hash, block, receipt.gas_used, receipt.logs
    )
}

fn print_report(report: &ScriptReport) {
    println!("Signers on {}:", report.network);
    for (index, signer) in report.signers.iter().enumerate() {
        println!("  [{}] {}", index, signer);
    }

    let Some(address) = report.address else {
        let gas = report.estimated_gas.map(|g| g.to_string()).unwrap_or_else(|| "?".to_string());
        print_warn_message(&format!(
            "Dry run: {} would deploy from {} using an estimated {} gas, nothing was sent",
            report.contract, report.deployer, gas
        ));
        return;
    };

    print_success_message(&format!("{} deployed to: {}", report.contract, address));
    if let Some(deployment) = &report.deployment {
        println!("  {}", describe_receipt(deployment));
    }
    if let Some(record_path) = &report.record_path {
        println!("  record written to {}", record_path.display());
    }

    for step in &report.steps {
        match step {
            StepOutcome::Call { method, values } => {
                println!("{}: {}", method, format_values(values));
            }
            StepOutcome::Send { method, receipt } => {
                println!("{}: {}", method, describe_receipt(receipt));
            }
        }
    }
}
