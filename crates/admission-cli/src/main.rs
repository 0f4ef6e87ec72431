//! CLI binary for checking trigger admission configuration.

mod request;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use admission_engine::{
    admits, check_conditions, deduplicate, interpolate, interpolate_requirements,
    resolve_parameters, validate, with_default_os_arch,
};
use request::AdmissionRequest;

#[derive(Parser)]
#[command(name = "admit", version, about = "Check whether a stage, job or hook would be admitted")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpolate a template against the request parameters
    Interpolate {
        /// Path to the admission request .json file
        #[arg(short, long)]
        request: PathBuf,

        /// Template containing {{.key}} placeholders
        template: String,
    },

    /// Evaluate the request conditions against its parameters
    Conditions {
        /// Path to the admission request .json file
        #[arg(short, long)]
        request: PathBuf,
    },

    /// Validate the request requirements and print the prepared list
    Requirements {
        /// Path to the admission request .json file
        #[arg(short, long)]
        request: PathBuf,

        /// Default OS added as an os-architecture requirement when no model is pinned
        #[arg(long, default_value = "")]
        os: String,

        /// Default architecture added alongside --os
        #[arg(long, default_value = "")]
        arch: String,
    },

    /// Check the request event against its hook filter
    Hook {
        /// Path to the admission request .json file
        #[arg(short, long)]
        request: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Interpolate { request, template } => cmd_interpolate(&request, &template)?,
        Commands::Conditions { request } => cmd_conditions(&request)?,
        Commands::Requirements { request, os, arch } => cmd_requirements(&request, &os, &arch)?,
        Commands::Hook { request } => cmd_hook(&request)?,
    }

    Ok(())
}

fn load_request(path: &Path) -> anyhow::Result<AdmissionRequest> {
    let request = AdmissionRequest::load(path)?;
    tracing::debug!(
        path = %path.display(),
        parameters = request.parameters.len(),
        conditions = request.conditions.len(),
        requirements = request.requirements.len(),
        "Request loaded"
    );
    Ok(request)
}

fn cmd_interpolate(path: &Path, template: &str) -> anyhow::Result<()> {
    let request = load_request(path)?;
    let vars = resolve_parameters(&request.parameters)?;
    println!("{}", interpolate(template, &vars)?);
    Ok(())
}

fn cmd_conditions(path: &Path) -> anyhow::Result<()> {
    let request = load_request(path)?;
    if check_conditions(&request.conditions, &request.parameters)? {
        println!("pass");
        return Ok(());
    }
    println!("fail");
    std::process::exit(1);
}

fn cmd_requirements(path: &Path, os: &str, arch: &str) -> anyhow::Result<()> {
    let request = load_request(path)?;
    let vars = resolve_parameters(&request.parameters)?;

    let requirements = deduplicate(&request.requirements);
    let requirements = with_default_os_arch(&requirements, os, arch);
    let requirements = interpolate_requirements(&requirements, &vars)?;
    validate(&requirements)?;

    println!("Requirements are valid");
    for r in &requirements {
        println!("  {} [{}] {}", r.name, r.kind, r.value);
    }
    Ok(())
}

fn cmd_hook(path: &Path) -> anyhow::Result<()> {
    let request = load_request(path)?;
    if admits(&request.hook, &request.event) {
        println!("admitted");
        return Ok(());
    }
    println!("rejected");
    std::process::exit(1);
}
