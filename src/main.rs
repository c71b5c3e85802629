use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use nimbus_backdrop::{
    tables, BackdropCache, BackdropResolver, MediaFormat, WeatherCondition, WeatherKey,
};
use nimbus_core::{AppError, Config, ConfigError};

#[derive(Debug, Parser)]
#[command(name = "nimbus", version, about = "Weather background resolver")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a weather key to a background URL
    Resolve {
        /// Weather key (thunder, heavy-rain, rain, wind, sunny, cloud, neutral)
        #[arg(required_unless_present = "wmo", conflicts_with = "wmo")]
        key: Option<String>,

        /// Derive the key from a WMO weather code instead
        #[arg(long, allow_negative_numbers = true)]
        wmo: Option<i32>,

        /// Current wind speed in km/h; strong wind on a dry day selects `wind`
        #[arg(long, requires = "wmo", default_value_t = 0.0)]
        wind: f64,

        /// Prefer video renditions
        #[arg(long)]
        video: bool,

        /// Media-search API key, overriding config and environment
        #[arg(long)]
        api_key: Option<String>,
    },
    /// List known weather keys with their search terms and fallback images
    Keys,
    /// Validate the configuration file
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    nimbus_core::init()?;

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        let error = AppError::from_anyhow(e);
        tracing::error!("{}", error);
        eprintln!("error: {}\n{}", error, error.user_message());
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Resolve {
            key,
            wmo,
            wind,
            video,
            api_key,
        } => {
            let (config, _) = Config::load_validated()?;
            let key = match (key, wmo) {
                (Some(key), _) => key,
                (None, Some(code)) => {
                    let condition = WeatherCondition::from_wmo_code(code);
                    let key = WeatherKey::classify(condition, wind);
                    tracing::info!(
                        "WMO code {} ({}, wind {} km/h) maps to {}",
                        code,
                        condition.description(),
                        wind,
                        key
                    );
                    key.to_string()
                }
                (None, None) => anyhow::bail!("Either a weather key or --wmo is required"),
            };

            let resolver = BackdropResolver::from_config(&config.backdrop, BackdropCache::new())
                .context("Failed to create background resolver")?;
            let format = MediaFormat::from_prefer_video(video || config.backdrop.prefer_video);

            let url = resolver.resolve(&key, api_key.as_deref(), format).await;
            tracing::info!("Resolved background for {}", key);
            println!("{}", url);
        }
        Command::Keys => {
            for key in WeatherKey::ALL {
                println!(
                    "{:<12} {:<24} {}",
                    key.as_str(),
                    tables::search_term(key.as_str()),
                    tables::fallback_url(key.as_str())
                );
            }
        }
        Command::CheckConfig => {
            let config = Config::load()?;
            let validation = config.validate();

            for warning in &validation.warnings {
                println!("warning: {}", warning);
            }
            for error in &validation.errors {
                println!("error: {}", error);
            }

            if !validation.is_valid() {
                return Err(ConfigError::Invalid(validation.error_summary()).into());
            }
            println!("Configuration OK ({})", Config::config_path()?.display());
        }
    }

    Ok(())
}
