mod commands;
mod context;
mod reporter;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chatanoo")]
#[command(about = "Provision Chatanoo media environments on AWS", long_about = None)]
struct Cli {
    /// Environment name (CHATANOO_ENV)
    #[arg(short = 'e', long = "env", env = "CHATANOO_ENV", global = true)]
    env: Option<String>,

    /// Show provider calls and persistence details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage environment documents
    #[command(subcommand)]
    Env(EnvCommands),
    /// Hosted zone of a domain
    #[command(subcommand)]
    Domain(DomainCommands),
    /// Storage bucket, optionally served through a CDN alias
    #[command(subcommand)]
    Storage(StorageCommands),
    /// IAM role with its own policy
    #[command(subcommand)]
    Identity(IdentityCommands),
    /// Transcoding presets, role and pipeline
    #[command(subcommand)]
    Transcoder(TranscoderCommands),
    /// Provision the domain and the media center
    Provision,
    /// Remove everything created by provision
    Deprovision,
    /// Hosted zone and the CDN bucket
    #[command(name = "provision-domain")]
    ProvisionDomain,
    /// Remove the CDN bucket and the hosted zone
    #[command(name = "deprovision-domain")]
    DeprovisionDomain,
    /// Media buckets and the transcoder
    #[command(name = "provision-media")]
    ProvisionMedia,
    /// Remove the transcoder and the media buckets
    #[command(name = "deprovision-media")]
    DeprovisionMedia,
    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum EnvCommands {
    /// Create a new environment document
    Init {
        /// Environment name (lowercase letters, digits and '-')
        name: String,
        #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
        access_key_id: String,
        #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
        secret_access_key: String,
        #[arg(long, env = "AWS_DEFAULT_REGION", default_value = "us-east-1")]
        region: String,
        /// Domain served by the environment
        #[arg(long)]
        domain: String,
    },
    /// List environments
    List,
    /// Show the resources tracked by the selected environment
    Show,
}

#[derive(Subcommand)]
enum DomainCommands {
    /// Create a hosted zone
    Create {
        /// Domain (defaults to the environment's domain)
        domain: Option<String>,
    },
    /// Delete a hosted zone
    Delete {
        /// Domain (defaults to the environment's domain)
        domain: Option<String>,
    },
}

#[derive(Subcommand)]
enum StorageCommands {
    /// Create a bucket, with a CDN alias when a domain is given
    Create {
        /// Logical bucket name (cdn, medias-input, ...)
        name: String,
        /// Domain to alias the bucket on
        domain: Option<String>,
    },
    /// Delete a bucket, disabling its CDN alias when a domain is given
    Delete {
        /// Logical bucket name
        name: String,
        /// Domain the bucket was aliased on
        domain: Option<String>,
    },
}

#[derive(Subcommand)]
enum IdentityCommands {
    /// Create a role and attach a new policy to it
    #[command(name = "create-role")]
    CreateRole {
        /// Logical role name
        name: String,
        /// Policy document: a JSON file path or inline JSON (stdin when omitted)
        policy: Option<String>,
    },
    /// Delete a role and its policy
    #[command(name = "delete-role")]
    DeleteRole {
        /// Logical role name
        name: String,
    },
}

#[derive(Subcommand)]
enum TranscoderCommands {
    /// Create presets, the pipeline role and the pipeline
    Create {
        /// Logical name of the input bucket
        #[arg(default_value = chatanoo_cloud::naming::MEDIA_INPUT_BUCKET)]
        input: String,
        /// Logical name of the output bucket
        #[arg(default_value = chatanoo_cloud::naming::MEDIA_OUTPUT_BUCKET)]
        output: String,
    },
    /// Delete the pipeline, the presets and the role
    Delete,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        report_error(&e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Commands that need no environment
    match cli.command {
        Commands::Version => {
            println!("chatanoo {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Commands::Env(cmd) => return commands::env::handle(cmd, cli.env).await,
        _ => {}
    }

    let ctx = context::Context::open(cli.env).await?;

    match cli.command {
        Commands::Domain(cmd) => commands::domain::handle(&ctx, cmd).await,
        Commands::Storage(cmd) => commands::storage::handle(&ctx, cmd).await,
        Commands::Identity(cmd) => commands::identity::handle(&ctx, cmd).await,
        Commands::Transcoder(cmd) => commands::transcoder::handle(&ctx, cmd).await,
        Commands::Provision => commands::workflow::provision(&ctx).await,
        Commands::Deprovision => commands::workflow::deprovision(&ctx).await,
        Commands::ProvisionDomain => commands::workflow::provision_domain(&ctx).await,
        Commands::DeprovisionDomain => commands::workflow::deprovision_domain(&ctx).await,
        Commands::ProvisionMedia => commands::workflow::provision_media(&ctx).await,
        Commands::DeprovisionMedia => commands::workflow::deprovision_media(&ctx).await,
        Commands::Version | Commands::Env(_) => {
            unreachable!("handled before the environment is opened")
        }
    }
}

fn report_error(err: &anyhow::Error) {
    eprintln!();
    match err.downcast_ref::<chatanoo_cloud::CloudError>() {
        Some(cloud) if cloud.step().is_some() => {
            eprintln!("{} {}", "✗".red().bold(), cloud.to_string().red());
            eprintln!(
                "{}",
                "Completed steps are recorded in the environment; fix the cause and re-run the failed command."
                    .yellow()
            );
        }
        _ => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
        }
    }
}
