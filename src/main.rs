use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use vivace::config::Settings;
use vivace::library::{Catalog, CatalogEntry, Librarian, RefreshOutcome, TierTable};
use vivace::player::{AudioBackend, LoftyProbe, Player, PlayerCmd, RodioBackend};
use vivace::storage::{LocalStorage, StorageBackend};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = Settings::load()?;
    settings.validate().map_err(io::Error::other)?;

    let root = env::args().nth(1).unwrap_or_else(|| settings.storage.root.clone());

    let mut local = LocalStorage::new(&root, &settings.library.extensions);
    if let Some(base) = &settings.storage.base_url {
        local = local.with_base_url(base.clone());
    }
    let storage: Arc<dyn StorageBackend> = Arc::new(local);

    let catalog = Catalog::new();
    let librarian = Librarian::new(
        storage,
        TierTable::with_fallback(settings.library.fallback_tag.clone()),
        catalog.clone(),
    );
    librarian.refresh()?;
    info!("indexed {} tracks under {:?}", catalog.len(), root);

    let player = Player::new(
        catalog.clone(),
        || {
            let backend = RodioBackend::new().expect("ERR: No audio output device");
            Box::new(backend) as Box<dyn AudioBackend>
        },
        Box::new(LoftyProbe),
        settings.playback.clone(),
    );

    run_shell(&catalog, &librarian, &player)?;

    player.shutdown();
    Ok(())
}

/// Minimal interactive adapter over the engine: reads commands from stdin,
/// forwards them to the player and prints snapshots. Holds only the filter
/// criteria; all playback state lives in the engine.
fn run_shell(
    catalog: &Catalog,
    librarian: &Librarian,
    player: &Player,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut artist: Option<String> = None;
    let mut query = String::new();

    print_view(&catalog.filtered(artist.as_deref(), &query));
    print!("> ");
    io::stdout().flush()?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "list" => print_view(&catalog.filtered(artist.as_deref(), &query)),
            "artists" => {
                for name in catalog.artists() {
                    println!("  {name}");
                }
            }
            "play" => match rest.parse::<usize>() {
                Ok(n) if n >= 1 => player.send(PlayerCmd::SelectAndPlay(n - 1))?,
                _ => println!("usage: play <track number>"),
            },
            "pause" => player.send(PlayerCmd::Pause)?,
            "resume" => player.send(PlayerCmd::Resume)?,
            "stop" => player.send(PlayerCmd::Stop)?,
            "next" => player.send(PlayerCmd::Next)?,
            "prev" => player.send(PlayerCmd::Previous)?,
            "shuffle" => player.send(PlayerCmd::SetShuffle(rest == "on"))?,
            "repeat" => player.send(PlayerCmd::SetRepeat(rest == "on"))?,
            "vol" => match rest.parse::<u8>() {
                Ok(v) => player.send(PlayerCmd::SetVolume(v))?,
                Err(_) => println!("usage: vol <0-100>"),
            },
            "artist" => {
                artist = match rest {
                    "" | "all" => None,
                    name => Some(name.to_string()),
                };
                apply_filter(player, &artist, &query)?;
                print_view(&catalog.filtered(artist.as_deref(), &query));
            }
            "find" => {
                query = rest.to_string();
                apply_filter(player, &artist, &query)?;
                print_view(&catalog.filtered(artist.as_deref(), &query));
            }
            "refresh" => {
                match librarian.refresh()? {
                    RefreshOutcome::Completed { published, .. } => {
                        println!("{published} tracks loaded");
                    }
                    RefreshOutcome::AlreadyRunning => println!("refresh already running"),
                }
                apply_filter(player, &artist, &query)?;
                print_view(&catalog.filtered(artist.as_deref(), &query));
            }
            "status" => print_status(catalog, player, &artist, &query),
            "help" => print_help(),
            "quit" | "exit" => break,
            other => println!("unknown command {other:?} (try: help)"),
        }

        print!("> ");
        io::stdout().flush()?;
    }

    Ok(())
}

fn apply_filter(
    player: &Player,
    artist: &Option<String>,
    query: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    player.send(PlayerCmd::ApplyFilter {
        artist: artist.clone(),
        query: query.to_string(),
    })?;
    Ok(())
}

fn print_view(entries: &[CatalogEntry]) {
    for (i, entry) in entries.iter().enumerate() {
        let tag = if entry.tag.is_empty() {
            String::new()
        } else {
            format!(" [{}]", entry.tag)
        };
        println!("{:>4}. {} - {}{}", i + 1, entry.artist, entry.display, tag);
    }
    println!("{} tracks loaded", entries.len());
}

fn print_status(catalog: &Catalog, player: &Player, artist: &Option<String>, query: &str) {
    let snap = player.snapshot();
    let view = catalog.filtered(artist.as_deref(), query);
    let now_playing = snap
        .current_index
        .and_then(|i| view.get(i))
        .map(|e| e.display.clone())
        .unwrap_or_else(|| "None".to_string());

    let state = match (snap.playing, snap.paused) {
        (true, false) => "playing",
        (true, true) => "paused",
        _ => "stopped",
    };

    println!(
        "{state}: {now_playing}  {} / {}  shuffle={} repeat={}",
        fmt_time(snap.elapsed),
        fmt_time(snap.track_length),
        snap.shuffle,
        snap.repeat,
    );
    if let Some(path) = &snap.unplayable {
        println!("unplayable: {path}");
    }
}

fn fmt_time(d: Duration) -> String {
    let seconds = d.as_secs();
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn print_help() {
    println!(
        "commands: list | artists | play <n> | pause | resume | stop | next | prev\n          \
         shuffle on|off | repeat on|off | vol <0-100> | artist <name|all>\n          \
         find <text> | refresh | status | quit"
    );
}
