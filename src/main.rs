use clap::{Parser, Subcommand};
use std::sync::Arc;

use cordwain::application::messaging::MessageDispatcher;
use cordwain::domain::traits::Bot;
use cordwain::infrastructure::adapters::console::console_client;
use cordwain::infrastructure::config::Config;
use cordwain::infrastructure::plugins::ManifestLoader;
use cordwain::plugins::builtin::core_plugin;
use cordwain::plugins::PluginManager;
use cordwain::BotError;

#[derive(Parser)]
#[command(name = "cordwain")]
#[command(about = "Command and plugin host for chat bots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Command prefix (overrides config)
    #[arg(short, long)]
    prefix: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot on the console
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
    /// List plugin manifests in the plugins directory
    Plugins,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => load_config(&cli.config, cli.prefix).and_then(run_bot),
        Commands::Version => {
            println!("cordwain v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(&cli.config),
        Commands::Plugins => load_config(&cli.config, cli.prefix).and_then(list_plugins),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(path: &str, prefix_override: Option<String>) -> Result<Config, BotError> {
    let mut config = if std::path::Path::new(path).exists() {
        Config::load(path)?.with_env()
    } else {
        tracing::info!("No config at {}, using defaults", path);
        Config::load_env()
    };

    if let Some(prefix) = prefix_override {
        config.client.prefix = prefix;
    }
    Ok(config)
}

fn run_bot(config: Config) -> Result<(), BotError> {
    tracing::info!("Starting {} with prefix '{}'", config.bot.name, config.client.prefix);

    let client = console_client();
    let mut manager = PluginManager::new(config.client.clone());
    manager.load_client(Arc::clone(&client) as Arc<dyn Bot>);
    manager.register(core_plugin()?)?;

    for manifest in ManifestLoader::new(&config.client.plugins_dir).load_all()? {
        // Manifests only describe plugins; their commands come from code.
        tracing::info!(
            "Found manifest for {} v{} without a registered loader",
            manifest.details.id,
            manifest.details.version
        );
    }

    let mut dispatcher = MessageDispatcher::new(&config.client);
    if let Some(id) = &config.bot.user_id {
        dispatcher = dispatcher.with_bot_user(id.clone());
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        client.start().await?;
        println!("Type commands (e.g. {}ping), /quit to exit", config.client.prefix);
        client.run(&manager, &dispatcher).await
    })
}

fn init_config(path: &str) -> Result<(), BotError> {
    if std::path::Path::new(path).exists() {
        tracing::warn!("{} already exists, leaving it untouched", path);
        return Ok(());
    }
    std::fs::write(path, Config::default().to_yaml()?)?;
    println!("Wrote default config to {}", path);
    Ok(())
}

fn list_plugins(config: Config) -> Result<(), BotError> {
    let manifests = ManifestLoader::new(&config.client.plugins_dir).load_all()?;
    if manifests.is_empty() {
        println!("No plugins in {}", config.client.plugins_dir.display());
    }
    for manifest in manifests {
        let d = &manifest.details;
        let state = if config.client.is_plugin_enabled(&d.id) { "enabled" } else { "disabled" };
        println!("{} v{} by {} ({}) - {}", d.name, d.version, d.author, state, d.description);
    }
    Ok(())
}
