//! Sscm CLI - Command line interface for the Surround SCM bridge
//!
//! Browse, fetch and label Surround SCM repositories through the sscm client.

mod commands;

use clap::{Parser, Subcommand};
use sscm_core::{Config, ServerOverrides, SurroundClient};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{CatArgs, GetArgs, GetLabeledArgs, LabelArgs, LsArgs, ReleasesArgs};

/// Surround SCM bridge: browse, fetch and label through the sscm client
#[derive(Parser, Debug)]
#[command(name = "sscm-bridge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the sscm executable (overrides config and env)
    #[arg(long, global = true, env = "SSCM_EXE_PATH")]
    exe_path: Option<String>,

    /// Surround server as host[:port] (overrides config and env)
    #[arg(long, global = true, env = "SSCM_SERVER")]
    server: Option<String>,

    /// User name (overrides config and env)
    #[arg(long, global = true, env = "SSCM_USER")]
    user: Option<String>,

    /// Password; only sent together with a user name
    #[arg(long, global = true, env = "SSCM_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Show current configuration
    Config,

    /// Check that sscm can be launched and reach the server
    Validate,

    /// List repositories, branches or a directory tree
    Ls(LsArgs),

    /// Recursively get the latest files
    Get(GetArgs),

    /// Recursively get the files carrying a label
    GetLabeled(GetLabeledArgs),

    /// Print the contents of a single file
    Cat(CatArgs),

    /// Apply a label recursively
    Label(LabelArgs),

    /// Show which folders belong to a release
    Releases(ReleasesArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    // Load configuration with overrides
    let config = Config::load_with_overrides(ServerOverrides {
        exe_path: cli.exe_path.clone(),
        server: cli.server.clone(),
        username: cli.user.clone(),
        password: cli.password.clone(),
    })?;

    if cli.verbose {
        tracing::info!(
            exe_path = %config.server.exe_path,
            server = %config.server.server_with_port(),
            user = %config.server.username,
            "Configuration loaded"
        );
    }

    let client = SurroundClient::new(config.server.clone());

    match cli.command {
        Some(Commands::Version) => {
            println!("sscm-bridge {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Config) => print_config(&config),
        Some(Commands::Validate) => {
            for line in client.validate_connection().await? {
                println!("{}", line);
            }
        }
        Some(Commands::Ls(args)) => args.execute(cli.verbose, &client).await?,
        Some(Commands::Get(args)) => args.execute(&client).await?,
        Some(Commands::GetLabeled(args)) => args.execute(&client).await?,
        Some(Commands::Cat(args)) => args.execute(&client).await?,
        Some(Commands::Label(args)) => args.execute(&client).await?,
        Some(Commands::Releases(args)) => args.execute(&config)?,
        None => {
            println!("sscm-bridge - Surround SCM browsing, fetching and labeling");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn print_config(config: &Config) {
    let or_unset = |value: &str| {
        if value.is_empty() {
            "(not set)".to_string()
        } else {
            value.to_string()
        }
    };

    println!("Surround SCM Bridge Configuration");
    println!("=================================");
    println!();
    println!("Server Settings:");
    println!("  exe_path: {}", config.server.exe_path);
    println!("  server: {}", or_unset(&config.server.server_with_port()));
    println!("  username: {}", or_unset(&config.server.username));
    println!(
        "  password: {}",
        if config.server.password.is_empty() { "(not set)" } else { "****" }
    );
    if !config.server.password.is_empty() && config.server.username.is_empty() {
        println!("  (password is ignored without a username)");
    }
    println!();
    println!("Label Settings:");
    println!(
        "  release_filter: {}",
        config.labels.release_filter.as_deref().unwrap_or("(default: %RELNO%)")
    );
    println!();
    if let Some(path) = Config::default_config_path() {
        println!("Config file: {}", path.display());
        if path.exists() {
            println!("  (exists)");
        } else {
            println!("  (not found - using defaults)");
        }
    }
}
