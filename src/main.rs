use anyhow::Result;
use clap::{Parser, Subcommand};
use repdesk::cli::user::Role;

/// repdesk - field visit planning for medical sales teams
#[derive(Parser)]
#[command(name = "repdesk")]
#[command(about = "Administration portal for medical sales representatives", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create an account
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        full_name: String,
        #[arg(long, value_enum, default_value_t = Role::Rep)]
        role: Role,
    },
    /// Change the role of an existing account
    SetRole {
        #[arg(long)]
        email: String,
        #[arg(long, value_enum)]
        role: Role,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = repdesk::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    repdesk::observability::init_observability(
        "repdesk",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => repdesk::cli::server::serve(config, host, port).await,
        Commands::Migrate => repdesk::migrate::migrate(&config).await,
        Commands::Reset => repdesk::migrate::reset(&config).await,
        Commands::User { command } => match command {
            UserCommands::Create {
                email,
                password,
                full_name,
                role,
            } => repdesk::cli::user::create(config, email, password, full_name, role).await,
            UserCommands::SetRole { email, role } => {
                repdesk::cli::user::set_role(config, email, role).await
            }
        },
    }
}
