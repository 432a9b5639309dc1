use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use enable_ecr_login::commands::{self, EnableOptions, Outcome, DEFAULT_HELPER};
use enable_ecr_login::config::{expand_user_path, Updater};
use enable_ecr_login::identity::{AwsCli, EcrEndpoints};
use enable_ecr_login::Result;

/// Point Docker at the ECR credential helper for every registry of the current AWS account.
#[derive(Debug, Parser)]
#[command(name = "enable-ecr-login", version, about)]
struct Cli {
    /// Credential helper name written for each registry
    #[arg(long, default_value = DEFAULT_HELPER)]
    helper: String,

    /// Docker config file to update (default: ~/.docker/config.json)
    #[arg(long, value_name = "PATH")]
    config: Option<String>,

    /// AWS region; skips region lookup
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// AWS account id; skips the STS call
    #[arg(long)]
    account: Option<String>,

    /// AWS CLI profile used for lookups
    #[arg(long, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// Extra registry hostname to map (repeatable)
    #[arg(long = "registry", value_name = "HOST")]
    registries: Vec<String>,

    /// Report whether the file would change without writing it
    #[arg(long)]
    dry_run: bool,

    /// More logging on stderr (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();
}

fn updater_for(cli: &Cli) -> Result<Updater> {
    match &cli.config {
        Some(p) => Ok(Updater::at(expand_user_path(p))),
        None => Updater::for_current_user(),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let updater = match updater_for(&cli) {
        Ok(u) => u,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
    };

    let resolver = AwsCli::new()
        .profile(cli.profile.clone())
        .region(cli.region.clone())
        .account(cli.account.clone());
    let opts = EnableOptions {
        helper: cli.helper.clone(),
        extra_registries: cli.registries.clone(),
        dry_run: cli.dry_run,
    };

    match commands::run(&updater, &resolver, &EcrEndpoints, &opts) {
        Ok(Outcome::Updated) => {
            println!("Updated Docker config file: {}", updater.path().display());
        }
        Ok(Outcome::WouldUpdate) => {
            println!("Would update Docker config file: {}", updater.path().display());
        }
        Ok(Outcome::Unchanged) => {}
        Ok(Outcome::NoRegistries) => {
            eprintln!("WARNING: No ECR endpoints found for the current AWS partition");
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
