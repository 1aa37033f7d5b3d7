pub mod api_client;
mod commands;
pub mod error;
mod utils;


use clap::{Parser, Subcommand};

use commands::todo::{self, ListTodosFilter};
use error::CliResult;

#[derive(Parser)]
#[command(name = "todo")]
#[command(author, version, about = "Todo feed CLI", long_about = None)]
pub struct Cli {
    /// Override the API URL (default: TODO_FEED_API_URL env or http://localhost:3000)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of the feed, newest first
    List {
        /// Page number, starting at 1
        #[arg(long)]
        page: Option<u32>,
        /// Todos per page
        #[arg(long, default_value_t = todo::FEED_PAGE_SIZE)]
        limit: u32,
        /// Only show todos whose content contains this text (case-insensitive)
        #[arg(long)]
        search: Option<String>,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Add a todo
    Add {
        /// What needs doing
        content: String,
    },
    /// Toggle the done flag of a todo
    Toggle {
        /// Todo ID
        id: String,
    },
    /// Replace the content of a todo
    Update {
        /// Todo ID
        id: String,
        /// New content
        content: String,
    },
    /// Delete a todo
    Delete {
        /// Todo ID
        id: String,
    },
}

pub async fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let api_client = api_client::ApiClient::new(cli.api_url);

    let output = match cli.command {
        Some(Commands::List {
            page,
            limit,
            search,
            format,
        }) => {
            let filter = ListTodosFilter {
                page,
                limit: Some(limit),
                search: search.as_deref(),
            };
            todo::list_todos(&api_client, filter, &format).await?
        }
        Some(Commands::Add { content }) => todo::create_todo(&api_client, &content).await?,
        Some(Commands::Toggle { id }) => todo::toggle_todo(&api_client, &id).await?,
        Some(Commands::Update { id, content }) => {
            todo::update_todo(&api_client, &id, &content).await?
        }
        Some(Commands::Delete { id }) => todo::delete_todo(&api_client, &id).await?,
        None => {
            // Show help when no command provided
            let _ = Cli::parse_from(["todo", "--help"]);
            return Ok(());
        }
    };

    println!("{}", output);
    Ok(())
}
