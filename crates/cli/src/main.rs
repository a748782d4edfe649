//! graph-kit CLI: run resumable graphs from the terminal.

mod commands;
mod render;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Run resumable step graphs with suspend/resume and tool dispatch.
#[derive(Parser)]
#[command(name = "graph-kit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a graph, prompting on stdin whenever it suspends
    Run {
        /// Name of a built-in or configured graph
        graph: String,

        /// Session id the run is checkpointed under
        #[arg(short, long, default_value = "0")]
        session: String,

        /// Project root containing `.graph-kit/`
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Print lifecycle events as JSON lines on stderr
        #[arg(long)]
        events: bool,
    },

    /// List built-in and configured graphs
    Graphs {
        /// Project root containing `.graph-kit/`
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
    },
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows `-v`. Logs go to
/// stderr so that stdout only carries the conversation.
fn setup_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            graph,
            session,
            root,
            events,
        } => commands::run(&root, &graph, &session, events).await,
        Commands::Graphs { root } => commands::list_graphs(&root).await,
    }
}
