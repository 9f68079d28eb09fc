mod cli;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "form-shield", version, about = "Form Shield: layered spam protection for contact forms")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every layer on a submission and print the verdict
    Check {
        /// Pipeline config (TOML). Falls back to FORM_SHIELD_* env vars
        #[arg(long)]
        config: Option<PathBuf>,
        /// Submission JSON file (defaults to stdin)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Client IP, attached to decoy reports
        #[arg(long)]
        ip: Option<String>,
        /// Do not log rejections
        #[arg(long)]
        no_log: bool,
    },
    /// Run only the content filter
    Content {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Run only the decoy field check
    Decoy {
        /// Decoy field name
        #[arg(long, default_value = form_shield::constants::DEFAULT_DECOY_FIELD)]
        field: String,
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Verify a captcha token against the remote service
    Verify {
        token: String,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print a config skeleton with default values
    Config,
}

/// Exit code for a rejected submission or failed check.
const EXIT_REJECTED: i32 = 2;

fn main() {
    form_shield::tracing_init::init_stderr_tracing();
    let app = App::parse();

    let result = match app.command {
        Commands::Check { config, input, ip, no_log } => {
            cli::check::run(config.as_deref(), input.as_deref(), ip.as_deref(), !no_log)
        }
        Commands::Content { config, input } => cli::check::run_content(config.as_deref(), input.as_deref()),
        Commands::Decoy { field, input } => cli::check::run_decoy(&field, input.as_deref()),
        Commands::Verify { token, config } => cli::check::run_verify(&token, config.as_deref()),
        Commands::Config => cli::config::run_show().map(|_| true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_REJECTED),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
