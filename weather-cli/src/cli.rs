use std::{
    io::{self, Write},
    path::Path,
};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use tracing::debug;
use serde_json::Value;
use weather_client::{
    Config, DEFAULT_FORECAST_DAYS, WeatherApiClient,
    model::{ERROR_KEY, field_or_na, is_error_response},
};

use crate::report::{self, DEMO_API_KEY, DemoArgs};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather API client")]
pub struct Cli {
    /// API key; overrides the one stored by `weather configure`.
    #[arg(long, env = "WEATHER_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// API base URL; overrides the stored one.
    #[arg(long, env = "WEATHER_API_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Runs the demo walkthrough when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate the key, then show weather, forecast and cities.
    Demo(DemoArgs),

    /// Print current weather for a city as JSON.
    Current {
        city: String,
    },

    /// Print the forecast for a city as JSON.
    Forecast {
        city: String,

        #[arg(long, default_value_t = DEFAULT_FORECAST_DAYS)]
        days: u32,
    },

    /// Print the cities of a country as JSON.
    Cities {
        country: String,
    },

    /// Check whether the API accepts the key.
    Validate,

    /// Store the API key (prompted for unless --api-key is given) and base URL.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli {
            api_key,
            base_url,
            command,
        } = self;

        let mut out = io::stdout().lock();

        // A broken config file fails the raw requests only.
        let strict = || -> anyhow::Result<Config> {
            Ok(Config::load()?.with_overrides(api_key.clone(), base_url.clone()))
        };

        match command.unwrap_or_else(|| Command::Demo(DemoArgs::default())) {
            Command::Demo(args) => {
                let config =
                    Config::load_or_default().with_overrides(api_key.clone(), base_url.clone());
                debug!("Using weather API at {}", config.base_url());

                let api_key = config.api_key.as_deref().unwrap_or(DEMO_API_KEY);
                let client = WeatherApiClient::new(api_key, config.base_url())?;
                report::run_demo(&client, &args, &mut out).await?;
            }
            Command::Current { city } => {
                let client = WeatherApiClient::from_config(&strict()?)?;
                let value = client.get_current_weather(&city).await;
                print_json(&mut out, &value)?;
                fail_on_error_response(&value)?;
            }
            Command::Forecast { city, days } => {
                let client = WeatherApiClient::from_config(&strict()?)?;
                let value = client.get_forecast(&city, days).await;
                print_json(&mut out, &value)?;
                fail_on_error_response(&value)?;
            }
            Command::Cities { country } => {
                let client = WeatherApiClient::from_config(&strict()?)?;
                print_json(&mut out, &client.get_cities_by_country(&country).await)?;
            }
            Command::Validate => {
                let client = WeatherApiClient::from_config(&strict()?)?;
                writeln!(out, "{}", client.validate_api_key().await)?;
            }
            Command::Configure => {
                let path = Config::config_file_path()?;
                configure(&path, api_key, base_url, &mut out)?;
            }
        }

        Ok(())
    }
}

fn configure(
    path: &Path,
    api_key: Option<String>,
    base_url: Option<String>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let api_key = match api_key {
        Some(key) => key,
        None => Password::new("API key:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?,
    };

    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    let mut config = Config::load_or_default_from(path);
    config.api_key = Some(api_key.to_string());
    if base_url.is_some() {
        config.base_url = base_url;
    }

    config.save_to(path)?;
    writeln!(out, "Configuration saved to {}", path.display())?;

    Ok(())
}

/// The JSON is printed either way; a fallback mapping still makes the command fail.
fn fail_on_error_response(value: &Value) -> anyhow::Result<()> {
    if is_error_response(value) {
        bail!("Request failed: {}", field_or_na(value, ERROR_KEY));
    }
    Ok(())
}

fn print_json(out: &mut impl Write, value: &impl serde::Serialize) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render JSON")?;
    writeln!(out, "{rendered}")?;
    Ok(())
}
