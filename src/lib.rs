//! Lunar Commands: administrative command dispatch for the Lunar game server.
//!
//! The host hands the dispatcher an actor, a command name and already
//! tokenized arguments. The dispatcher decides whether the actor may run the
//! command, converts the arguments to typed values, calls the handler and
//! reports failures back to the actor as Alerts.
//!
//! # Pipeline
//!
//! 1. **Lookup** in the [`core::registry::CommandRegistry`] (aliases resolve here)
//! 2. **Authorize** against the [`core::role::RoleHierarchy`]; a denial stops here
//! 3. **Coerce** raw tokens with [`core::coerce::coerce`] per the command's schema
//! 4. **Invoke** the handler with a [`core::dispatch::CommandContext`]
//!
//! Dispatch never returns an error to the host. Startup (role table and
//! registry construction) is the only place a [`core::error::ConfigError`]
//! surfaces, and it is fatal.
//!
//! # Concurrency
//!
//! Role table and registry are immutable after startup and shared via `Arc`.
//! Actor and world state belong to the host, which must serialize dispatches
//! that touch the same actor or map.
//!
//! # Example
//!
//! ```no_run
//! use lunar_commands::core::config::ServerConfig;
//! use lunar_commands::core::dispatch::CommandDispatcher;
//! use lunar_commands::core::feedback::FeedbackLog;
//! use lunar_commands::plugins::admin::{admin_registry, AdminServices};
//! use lunar_commands::plugins::memory_world::MemoryWorld;
//! use std::sync::Arc;
//!
//! let config = ServerConfig::default();
//! let roles = Arc::new(config.role_hierarchy().unwrap());
//! let (world, mut players) = MemoryWorld::from_config(&config, &roles).unwrap();
//! let services = AdminServices::from_world(Arc::new(world));
//! let registry = admin_registry(&roles, &config.commands, &services).unwrap();
//! let dispatcher = CommandDispatcher::new(roles, Arc::new(registry), Arc::new(FeedbackLog::new()));
//! if let Some(player) = players.first_mut() {
//!     let _ = dispatcher.dispatch(player, "warpTo", &["10", "20"]);
//! }
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: roles, coercion, feedback, registry, dispatcher, world interfaces, config
//! - [`plugins`]: the admin command set and the in-memory reference world

pub mod core;
pub mod plugins;

use crate::core::config::{self, CONFIG_FILE_NAME, ServerConfig};
use crate::core::dispatch::CommandDispatcher;
use crate::core::feedback::{ConsoleFeedback, ConsoleFormat};
use crate::core::world::Actor;
use crate::plugins::admin::{AdminServices, admin_registry};
use crate::plugins::memory_world::{MemoryWorld, Player};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use rustc_hash::FxHashMap;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[clap(
    name = "lunar-commands",
    version = env!("CARGO_PKG_VERSION"),
    about = "Operator console for the Lunar administrative command set"
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read commands from stdin and dispatch them as a configured player
    Console(ConsoleCli),
    /// Print the registered command schema as JSON
    Schema(SchemaCli),
}

#[derive(clap::Args, Debug)]
struct ConsoleCli {
    /// Path to the server config (defaults to ./lunar.toml).
    #[clap(long)]
    config: Option<PathBuf>,
    /// Name of the player issuing commands.
    #[clap(long = "as")]
    actor: String,
    /// Output format: 'text' or 'json'.
    #[clap(long, default_value = "text")]
    format: String,
}

#[derive(clap::Args, Debug)]
struct SchemaCli {
    /// Path to the server config (defaults to ./lunar.toml).
    #[clap(long)]
    config: Option<PathBuf>,
}

/// Everything the console needs, built from one config.
struct Server {
    dispatcher: CommandDispatcher,
    world: Arc<MemoryWorld>,
    players: FxHashMap<String, Player>,
}

fn load(path: Option<PathBuf>) -> anyhow::Result<ServerConfig> {
    let path = path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    config::load_config(&path).with_context(|| format!("loading {}", path.display()))
}

fn build_server(config: &ServerConfig, format: ConsoleFormat) -> anyhow::Result<Server> {
    let roles = Arc::new(config.role_hierarchy().context("building role hierarchy")?);
    let (world, players) = MemoryWorld::from_config(config, &roles).context("seeding world")?;
    let world = Arc::new(world);
    let services = AdminServices::from_world(world.clone());
    let registry = admin_registry(&roles, &config.commands, &services)
        .context("registering admin commands")?;

    let dispatcher = CommandDispatcher::new(
        roles,
        Arc::new(registry),
        Arc::new(ConsoleFeedback::new(format)),
    );
    let players = players
        .into_iter()
        .map(|p| (p.name().to_string(), p))
        .collect();

    Ok(Server {
        dispatcher,
        world,
        players,
    })
}

/// Split a console line into command and arguments. A leading `/` is allowed.
fn split_line(line: &str) -> Option<(&str, Vec<&str>)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let mut tokens = trimmed.split_whitespace();
    let command = tokens.next()?.trim_start_matches('/');
    Some((command, tokens.collect()))
}

fn run_console(cli: ConsoleCli) -> anyhow::Result<()> {
    let format = match cli.format.as_str() {
        "text" => ConsoleFormat::Text,
        "json" => ConsoleFormat::Json,
        other => bail!("unknown format '{}': expected 'text' or 'json'", other),
    };
    let config = load(cli.config)?;
    let mut server = build_server(&config, format)?;

    let Some(actor) = server.players.get_mut(&cli.actor) else {
        bail!("player '{}' is not defined in the config", cli.actor);
    };

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let Some((command, args)) = split_line(&line) else {
            continue;
        };
        let _ = server.dispatcher.dispatch(actor, command, args.as_slice());
        server.world.track(actor);
    }
    Ok(())
}

fn run_schema(cli: SchemaCli) -> anyhow::Result<()> {
    let config = load(cli.config)?;
    let server = build_server(&config, ConsoleFormat::Text)?;
    let schema = server.dispatcher.registry().schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Console(c) => run_console(c),
        Command::Schema(s) => run_schema(s),
    }
}
