/// Workmate - terminal player for Workmate playlists
use clap::{Parser, Subcommand};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::{mpsc, watch};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workmate_cli::{display, input, AppConfig, SimulatedBackend};
use workmate_client::WorkmateClient;
use workmate_core::{PersistenceGateway, SessionService};
use workmate_playback::{Input, Player};

#[derive(Parser)]
#[command(name = "workmate")]
#[command(about = "Play your Workmate playlist from the terminal", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "WORKMATE_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive player (default)
    Play,
    /// Show the current session
    Session,
    /// List the tracks of the session's playlist
    Tracks,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "workmate=info,workmate_playback=info,workmate_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let client = connect(&config).await?;

    match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => play(config, client).await?,
        Commands::Session => show_session(&client).await?,
        Commands::Tracks => list_tracks(&client).await?,
    }

    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<WorkmateClient> {
    let client = WorkmateClient::new(config.server_config())?;
    tracing::info!("Server: {}", client.url());

    if let Some((username, password)) = config.credentials() {
        client.login(username, password).await?;
    }

    Ok(client)
}

async fn play(config: AppConfig, client: WorkmateClient) -> anyhow::Result<()> {
    let (event_tx, event_rx) = mpsc::channel(64);
    let (input_tx, input_rx) = mpsc::channel(16);

    let backend = SimulatedBackend::new(event_tx, config.simulated_track_length())
        .with_unavailable(config.playback.simulated_unavailable.iter().cloned());

    let mut player = Player::new(backend, Arc::new(client), config.player_config())
        .with_max_session_age(config.max_session_age());

    if let Err(e) = player.bootstrap().await {
        tracing::warn!("Starting without a playlist: {}", e);
    }
    if player.session().is_none() {
        println!("No valid session. Set account.username / account.password and restart.");
    }

    let (status_tx, mut status_rx) = watch::channel(player.status());

    // Stdin triggers, on a plain thread so a pending read never holds up exit
    let stdin_tx = input_tx.clone();
    std::thread::spawn(move || input::forward_lines(std::io::stdin().lock(), &stdin_tx));

    // Ctrl-C
    let shutdown_tx = input_tx;
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(Input::Shutdown).await;
        }
    });

    // Status printer
    let printer = tokio::spawn(async move {
        println!("{}", input::HELP);
        let mut last = status_rx.borrow_and_update().clone();
        println!("{}", display::render(&last));

        while status_rx.changed().await.is_ok() {
            let status = status_rx.borrow_and_update().clone();
            if display::differs(&last, &status) {
                println!("{}", display::render(&status));
            }
            last = status;
        }
    });

    let player = player.run(input_rx, event_rx, status_tx).await;
    drop(player);
    let _ = printer.await;

    tracing::info!("Bye");
    Ok(())
}

async fn show_session(client: &WorkmateClient) -> anyhow::Result<()> {
    let session = client.session().await?;

    if !session.is_valid {
        println!("No valid session");
        return Ok(());
    }

    println!("User:     {}", session.username.as_deref().unwrap_or("-"));
    println!("Playlist: {}", session.playlist_id.as_deref().unwrap_or("-"));

    let left = client.time_left().await?;
    if left.expired {
        println!("Session expired");
    } else {
        println!("Expires in {} min", left.time_left / 60_000);
    }

    Ok(())
}

async fn list_tracks(client: &WorkmateClient) -> anyhow::Result<()> {
    let session = client.session().await?;
    let Some(playlist_id) = session.playlist() else {
        println!("No valid session");
        return Ok(());
    };

    let playlist = client.fetch(playlist_id).await?;

    println!("{}:", playlist.title);
    for (i, track) in playlist.tracks.iter().enumerate() {
        println!(
            "  {:>3}. {} - {}",
            i + 1,
            track.title.as_deref().unwrap_or("(untitled)"),
            track.url
        );
    }

    Ok(())
}
