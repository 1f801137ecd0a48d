use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod guard;
mod views;

#[derive(Parser)]
#[command(
    name = "zenlock",
    version,
    about = "Zenlock -- locked focus sessions in your terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Focus session control
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Quote provider API key management
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Print a single focus catalyst quote
    Quote {
        /// Session length in minutes used as the quote context
        #[arg(short, long, default_value_t = 10)]
        minutes: u64,
    },
    /// Print three deep-work tips
    Tips,
    /// Generate shell completions
    Completions { shell: clap_complete::Shell },
}

fn main() {
    let filter = EnvFilter::try_from_env("ZENLOCK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Session { action } => commands::session::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Quote { minutes } => commands::quote::run_quote(minutes),
        Commands::Tips => commands::quote::run_tips(),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "zenlock",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
