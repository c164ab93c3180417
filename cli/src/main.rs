use clap::{Parser, Subcommand};
use splash_cli::app_state::AppState;
use splash_cli::commands;
use splash_cli::{init_logging, readline};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

#[tokio::main]
async fn main() -> Result<(), String> {
    let _log_guard = init_logging();

    let settings = splash_core::load_settings();
    tracing::info!(key = %settings.storage_key, "Starting splash cli");
    let state = Arc::new(RwLock::new(AppState::new(settings)));

    loop {
        let line = readline()?;
        if line.is_empty() {
            // EOF
            commands::exit(Arc::clone(&state)).await;
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, Arc::clone(&state)).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "splash")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a config file (one object or an array)
    Publish {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        assets: Option<PathBuf>,
    },
    Show,
    Hide,
    Status,
    Meta,
    SetKey {
        #[arg(short, long)]
        key: String,
    },
    Clear,
    Exit,
}

async fn respond(line: &str, state: Arc<RwLock<AppState>>) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "splash".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Publish { config, assets }) => {
            commands::publish(config, assets.as_deref(), Arc::clone(&state)).await?
        }
        Some(Commands::Show) => commands::show(Arc::clone(&state)).await?,
        Some(Commands::Hide) => commands::hide(Arc::clone(&state)).await?,
        Some(Commands::Status) => commands::show_status(Arc::clone(&state)).await?,
        Some(Commands::Meta) => commands::show_meta(Arc::clone(&state)).await?,
        Some(Commands::SetKey { key }) => commands::set_key(key, Arc::clone(&state)).await?,
        Some(Commands::Clear) => commands::clear(Arc::clone(&state)).await?,
        Some(Commands::Exit) => {
            commands::exit(state).await;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
