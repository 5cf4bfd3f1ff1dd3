// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! ClubRank terminal client
//!
//! Renders the dashboard and club screens from the client cache and
//! drives store actions from subcommands.

use clap::{Parser, Subcommand};
use clubrank_client::{
    config::Config,
    models::{avatar::AVATAR_PRESETS, AvatarDisplay, UserStats},
    routes::{self, Navigation, Route},
    services::Notifier,
    storage::FileStore,
    time_utils::time_ago,
    AppStore,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

#[derive(Parser)]
#[command(name = "clubrank", version, about = "Compete with friends in ClubRank clubs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the screen for a path (`/`, `/dashboard`, `/club/{id}`)
    Open { path: String },
    Login {
        username: String,
        #[arg(long, env = "CLUBRANK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and log in
    Signup {
        username: String,
        #[arg(long, env = "CLUBRANK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Whoami,
    /// Set your avatar, or list the available ones
    Avatar { id: Option<String> },
    /// List your clubs
    Clubs,
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Unit of progress, e.g. "Pages"
        #[arg(long, default_value = "Points")]
        unit: String,
    },
    Join { club_id: String },
    Leave { club_id: String },
    /// Show a club's leaderboard and chat
    Club { club_id: String },
    /// Add one to your score in a club
    Score { club_id: String },
    Send {
        club_id: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    Stats { club_id: String },
    Theme {
        #[arg(long)]
        toggle: bool,
    },
}

impl Command {
    /// Screen a command runs on, for session guarding.
    fn route(&self) -> Route {
        match self {
            Command::Open { .. }
            | Command::Login { .. }
            | Command::Signup { .. }
            | Command::Logout
            | Command::Theme { .. } => Route::Landing,
            Command::Whoami | Command::Avatar { .. } | Command::Clubs | Command::Create { .. } => {
                Route::Dashboard
            }
            Command::Join { club_id }
            | Command::Leave { club_id }
            | Command::Club { club_id }
            | Command::Score { club_id }
            | Command::Send { club_id, .. }
            | Command::Stats { club_id } => Route::Club(club_id.clone()),
        }
    }
}

/// Prints notifications to stderr.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        eprintln!("! {}", message);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    tracing::debug!(api = %config.api_base_url, state = %config.state_path.display(), "Configuration loaded");

    let storage = Arc::new(FileStore::open(&config.state_path)?);
    let mut store = AppStore::open(config, storage, Arc::new(ConsoleNotifier))?;

    let route = cli.command.route();
    if route.requires_session() && !store.is_authenticated() {
        eprintln!("Not logged in. Run `clubrank login <username>` first.");
        std::process::exit(1);
    }

    match cli.command {
        Command::Open { path } => open(&mut store, &path).await?,
        Command::Login { username, password } => match store.login(&username, &password).await {
            Ok(()) => open(&mut store, "/").await?,
            Err(e) => fail(&format!("Login failed: {}", e)),
        },
        Command::Signup { username, password } => {
            match store.signup(&username, &password).await {
                Ok(()) => open(&mut store, "/dashboard").await?,
                Err(e) => fail(&format!("Signup failed: {}", e)),
            }
        }
        Command::Logout => {
            store.logout();
            println!("Logged out.");
        }
        Command::Whoami => {
            if let Some(user) = store.current_user() {
                let avatar = AvatarDisplay::resolve(user.avatar_id.as_deref(), &user.username);
                println!("{} {} (id {})", avatar.render(), user.username, user.id);
            }
        }
        Command::Avatar { id: None } => {
            for preset in AVATAR_PRESETS.iter() {
                println!("{:>3}  {}  {}", preset.id, preset.emoji, preset.label);
            }
        }
        Command::Avatar { id: Some(id) } => {
            if store.update_avatar(&id).await.is_ok() {
                println!("Avatar updated.");
            }
        }
        Command::Clubs => {
            store.refresh_clubs().await?;
            render_dashboard(&store);
        }
        Command::Create {
            name,
            description,
            unit,
        } => {
            store.create_club(&name, &description, &unit).await;
            render_dashboard(&store);
        }
        Command::Join { club_id } => {
            store.join_club(&club_id).await;
            render_dashboard(&store);
        }
        Command::Leave { club_id } => match store.leave_club(&club_id).await {
            Ok(()) => render_dashboard(&store),
            Err(_) => open(&mut store, &Route::Club(club_id).path()).await?,
        },
        Command::Club { club_id } => open(&mut store, &Route::Club(club_id).path()).await?,
        Command::Score { club_id } => {
            if store.increment_score(&club_id).await {
                println!("+1!");
            }
            render_club(&store, &club_id);
        }
        Command::Send { club_id, text } => {
            store.send_message(&club_id, &text.join(" ")).await;
            render_club(&store, &club_id);
        }
        Command::Stats { club_id } => {
            let stats = store.fetch_stats(&club_id).await?;
            render_stats(&stats);
        }
        Command::Theme { toggle } => {
            let theme = if toggle {
                store.toggle_theme()
            } else {
                store.theme()
            };
            println!("Theme: {}", theme);
        }
    }

    Ok(())
}

/// Route a path through the session guards and render the resulting screen.
async fn open(store: &mut AppStore, path: &str) -> anyhow::Result<()> {
    let navigation = routes::navigate(path, store.is_authenticated());
    if let Navigation::Redirect(to) = &navigation {
        tracing::debug!(from = path, to = %to, "Redirecting");
    }

    match navigation.target().clone() {
        Route::Landing => {
            println!("ClubRank: compete with friends, one point at a time.");
            println!("Run `clubrank login <username>` or `clubrank signup <username>`.");
        }
        Route::Dashboard => {
            store.refresh_clubs().await?;
            render_dashboard(store);
        }
        Route::Club(club_id) => {
            if store.clubs().is_empty() {
                let _ = store.refresh_clubs().await;
            }
            store.load_club_data(&club_id).await?;
            render_club(store, &club_id);
        }
    }
    Ok(())
}

fn render_dashboard(store: &AppStore) {
    if let Some(user) = store.current_user() {
        println!("Hi, {}!", user.username);
    }
    if store.clubs().is_empty() {
        println!("You are not in any clubs yet. Create one or join with an ID.");
        return;
    }
    for club in store.clubs() {
        println!(
            "[{}] {}  ({} members, counting {})",
            club.id, club.name, club.member_count, club.unit_label
        );
        if !club.description.is_empty() {
            println!("      {}", club.description);
        }
    }
}

fn render_club(store: &AppStore, club_id: &str) {
    let now = chrono::Utc::now();
    let unit = store
        .cache()
        .club(club_id)
        .map(|c| c.unit_label.as_str())
        .unwrap_or("Points");

    match store.cache().club(club_id) {
        Some(club) => println!(
            "== {} ==  (+1 every {} min)",
            club.name,
            club.cooldown().num_minutes()
        ),
        None => println!("== Club {} ==", club_id),
    }

    println!("-- Leaderboard --");
    for (rank, member) in store.members(club_id).iter().enumerate() {
        let avatar = AvatarDisplay::resolve(member.avatar_id.as_deref(), &member.username);
        println!(
            "{:>3}. {} {:<16} {:>6} {}  streak {}  ({})",
            rank + 1,
            avatar.render(),
            member.username,
            member.score,
            unit,
            member.streak,
            time_ago(member.last_update, now)
        );
    }

    println!("-- Chat --");
    for message in store.messages(club_id) {
        if message.is_system() {
            println!("   * {}", message.text);
        } else {
            println!(
                "   {} [{}]: {}",
                message.username.as_deref().unwrap_or("Unknown"),
                time_ago(message.timestamp, now),
                message.text
            );
        }
    }
}

fn render_stats(stats: &UserStats) {
    println!(
        "Score {}  rank #{}  percentile {}",
        stats.score,
        stats.rank,
        stats.percentile_label()
    );
    println!(
        "Streak {} (best {})",
        stats.current_streak, stats.longest_streak
    );
    for point in &stats.graph_data {
        println!(
            "{:<4} you {:>4}  leader {:>4}",
            point.day,
            point.own_score(),
            point.leader_score()
        );
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

/// Initialize logging to stderr; JSON when `CLUBRANK_LOG_FORMAT=json`.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("clubrank_client=info,clubrank=info,warn")
    });

    let json = std::env::var("CLUBRANK_LOG_FORMAT").is_ok_and(|v| v == "json");
    let format = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .with_current_span(true)
            .flatten_event(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(format)
        .with(filter)
        .init();
}
