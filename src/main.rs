mod commands;
mod gateway;
mod health;

use clap::{Parser, Subcommand};
use promptwright_channels::telegram::TelegramChannel;
use promptwright_core::{
    config::{self, BotConfig, Config, ConfigSource, RemoteMode},
    orchestrator::Orchestrator,
    traits::{Channel, PromptRunner},
};
use promptwright_remote::agenta::AgentaClient;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "promptwright",
    version,
    about = "Promptwright — turns short ideas into full prompts from a remote registry"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot.
    Start,
    /// Show which settings are present.
    Status,
    /// Render one prompt and print it.
    Render {
        /// The user's idea.
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A missing .env is fine.
    dotenv::dotenv().ok();

    let (mut cfg, source) = config::load(&cli.config)?;
    cfg.apply_env(|key| std::env::var(key).ok())?;

    let _guard = init_logging(&cfg.bot)?;
    match source {
        ConfigSource::File => info!("loaded config from {}", cli.config),
        ConfigSource::Defaults => info!("config file not found at {}, using defaults", cli.config),
    }

    match cli.command {
        Commands::Start => {
            cfg.validate()?;

            let client = Arc::new(AgentaClient::from_config(&cfg.remote)?);
            let orchestrator = build_orchestrator(&cfg, client.clone());
            let runner: Option<Arc<dyn PromptRunner>> = match cfg.remote.mode {
                RemoteMode::Run => Some(client),
                RemoteMode::Render => None,
            };

            // Build channels.
            let mut channels: HashMap<String, Arc<dyn Channel>> = HashMap::new();
            if let Some(ref tg) = cfg.channel.telegram {
                if tg.enabled {
                    let channel = TelegramChannel::new(tg.clone());
                    channels.insert("telegram".to_string(), Arc::new(channel));
                }
            }

            if channels.is_empty() {
                anyhow::bail!(
                    "No channels enabled. Set BOT_TOKEN or enable [channel.telegram] in config.toml."
                );
            }

            println!("Promptwright — Starting {}...", cfg.bot.name);
            let gw = Arc::new(gateway::Gateway::new(
                channels,
                orchestrator,
                runner,
                cfg.prompt.clone(),
                cfg.health.clone(),
                cfg.messages.clone(),
            ));
            gw.run().await?;
        }
        Commands::Status => {
            println!("Promptwright — Status Check\n");
            println!("Config: {}", cli.config);
            println!(
                "Registry: {} ({}/{}, key '{}')",
                cfg.remote.host,
                cfg.remote.app_slug,
                cfg.remote.environment_slug,
                cfg.remote.prompt_key
            );
            println!(
                "  api key: {}",
                if cfg.remote.api_key.is_empty() {
                    "missing"
                } else {
                    "set"
                }
            );
            println!(
                "  mode: {}",
                match cfg.remote.mode {
                    RemoteMode::Render => "render",
                    RemoteMode::Run => "run",
                }
            );
            println!();

            if let Some(ref tg) = cfg.channel.telegram {
                println!(
                    "  telegram: {}",
                    if tg.enabled && !tg.bot_token.is_empty() {
                        "configured"
                    } else if tg.enabled {
                        "enabled but missing bot_token"
                    } else {
                        "disabled"
                    }
                );
            } else {
                println!("  telegram: not configured");
            }
            println!(
                "  health: {}",
                if cfg.health.enabled {
                    format!("{}:{}", cfg.health.host, cfg.health.port)
                } else {
                    "disabled".to_string()
                }
            );

            match cfg.validate() {
                Ok(()) => println!("\nReady."),
                Err(e) => println!("\nNot ready: {e}"),
            }
        }
        Commands::Render { text } => {
            if text.is_empty() {
                anyhow::bail!("no text provided. Usage: promptwright render <idea>");
            }
            cfg.validate_remote()?;

            let client = Arc::new(AgentaClient::from_config(&cfg.remote)?);
            let orchestrator = build_orchestrator(&cfg, client);
            match orchestrator.handle_request(&text.join(" ")).await {
                Ok(prompt) => println!("{prompt}"),
                Err(e) => {
                    tracing::error!("render failed: {e}");
                    anyhow::bail!(e.user_message());
                }
            }
        }
    }

    Ok(())
}

/// Wire the registry client into an orchestrator for the configured app.
fn build_orchestrator(cfg: &Config, client: Arc<AgentaClient>) -> Orchestrator {
    Orchestrator::new(
        client,
        cfg.remote.app_slug.clone(),
        cfg.remote.environment_slug.clone(),
        cfg.prompt.input_label.clone(),
    )
}

/// Install the global subscriber: stdout always, plus a daily file when
/// `log_dir` is set. `RUST_LOG` wins over `bot.log_level`.
///
/// The returned guard must live until exit so buffered lines are flushed.
fn init_logging(bot: &BotConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&bot.log_level))?;

    let (file_layer, guard) = match bot.log_dir.as_deref() {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, "promptwright.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    Ok(guard)
}
