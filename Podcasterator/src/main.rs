mod commands;

use commands::{App, Command, Flow};
use podconfig::Config;
use podplaylist::{DEFAULT_ARTWORK_SIZE, Library};
use podserver::{LoggingOptions, ServerController, init_logging};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ========== PHASE 1 : Configuration et logs ==========

    let config = Config::load_config("")?;
    let log_handle = init_logging(&LoggingOptions::from_config(&config));
    info!("Configuration loaded from {}", config.config_dir().display());

    // ========== PHASE 2 : Bibliothèque ==========

    let artwork_size = u32::try_from(config.get_artwork_size()).unwrap_or_else(|_| {
        warn!("Artwork size out of range, using {}", DEFAULT_ARTWORK_SIZE);
        DEFAULT_ARTWORK_SIZE
    });
    let library = Library::open(
        config.get_cache_dir()?,
        config.get_state_path(),
        config.get_default_title(),
    )?
    .with_artwork_size(artwork_size)
    .into_shared();

    let app = App::new(
        library,
        ServerController::new_configured(&config),
        log_handle,
    );

    // Les chemins passés en argument sont ajoutés au démarrage
    for arg in std::env::args_os().skip(1) {
        if let Err(e) = app.execute(Command::Add(PathBuf::from(arg))).await {
            println!("Error: {:#}", e);
        }
    }
    app.execute(Command::List).await?;

    // ========== PHASE 3 : Boucle de commandes ==========

    println!("Type 'help' for the list of commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // Écouté pendant la lecture comme pendant l'exécution d'une commande
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = &mut ctrl_c => {
                info!("Ctrl+C received, shutting down");
                break;
            }
        };

        // Fin de l'entrée standard
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        let flow = tokio::select! {
            flow = app.execute(command) => flow,
            _ = &mut ctrl_c => {
                info!("Ctrl+C received during a command, shutting down");
                break;
            }
        };
        match flow {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => println!("Error: {:#}", e),
        }
    }

    app.shutdown().await;
    Ok(())
}
