mod api;
mod commands;
mod context;
mod output;
mod terraform;
mod traits;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use api::EntityType;
use commands::remove::{OutputFormat, RemoveKind};
use commands::{ExportCommand, ListCommand, RemoveCommand};
use context::Context;

#[derive(Parser)]
#[command(name = "tg")]
#[command(about = "CLI for managing Twingate resources and exporting them as Terraform", long_about = None)]
#[command(version)]
struct Cli {
    /// Twingate account name
    #[arg(short, long, global = true, env = "TG_ACCOUNT")]
    account_name: Option<String>,

    /// Twingate API key
    #[arg(short = 'k', long, global = true, env = "TG_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the account configuration
    Export {
        #[command(subcommand)]
        target: ExportTarget,
    },

    /// List entities of one type
    List {
        /// Entity type to list
        #[arg(value_enum)]
        entity: ListEntity,
    },

    /// Remove an entity by id
    Remove {
        /// Entity kind to remove
        #[arg(value_enum)]
        kind: RemoveKind,

        /// Entity id
        id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output_format: OutputFormat,
    },
}

#[derive(Subcommand)]
enum ExportTarget {
    /// Export as a Terraform module plus import script
    Terraform {
        /// Output directory (defaults to ./terraform)
        #[arg(short, long)]
        output_directory: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ListEntity {
    Networks,
    Connectors,
    Groups,
    Resources,
}

impl From<ListEntity> for EntityType {
    fn from(entity: ListEntity) -> Self {
        match entity {
            ListEntity::Networks => EntityType::RemoteNetwork,
            ListEntity::Connectors => EntityType::Connector,
            ListEntity::Groups => EntityType::Group,
            ListEntity::Resources => EntityType::Resource,
        }
    }
}

fn run(ctx: &Context, cli: Cli) -> Result<()> {
    let account = cli.account_name.as_deref();
    let api_key = cli.api_key.as_deref();

    match cli.command {
        Commands::Export { target } => match target {
            ExportTarget::Terraform { output_directory } => {
                ExportCommand::execute(ctx, account, api_key, output_directory.as_deref())?;
            }
        },
        Commands::List { entity } => {
            ListCommand::execute(ctx, account, api_key, entity.into())?;
        }
        Commands::Remove {
            kind,
            id,
            output_format,
        } => {
            RemoveCommand::execute(ctx, account, api_key, kind, &id, output_format)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let ctx = Context::new();

    if let Err(err) = run(&ctx, cli) {
        output::error(&format!("{:#}", err));
        std::process::exit(1);
    }
}
