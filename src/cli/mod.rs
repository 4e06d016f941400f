pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "prepsphere-api")]
#[command(about = "PrepSphere placement API - server and maintenance commands")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,

        #[arg(long, help = "Do not apply pending migrations on startup")]
        skip_migrations: bool,
    },

    #[command(about = "Apply pending database migrations and exit")]
    Migrate,

    #[command(about = "Insert demo TPO, student, jobs and events (idempotent)")]
    Seed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = AppConfig::from_env();

    let command = cli.command.unwrap_or(Commands::Serve {
        port: None,
        skip_migrations: false,
    });

    match command {
        Commands::Serve { port, skip_migrations } => commands::serve::handle(config, port, skip_migrations).await,
        Commands::Migrate => commands::migrate::handle(config, output_format).await,
        Commands::Seed => commands::seed::handle(config, output_format).await,
    }
}
