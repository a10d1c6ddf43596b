//! Human-friendly rendering of the demo walkthrough.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use weather_client::{ForecastDay, WeatherApi, model::field_or_na};

/// Key used by the demo when none is configured.
pub const DEMO_API_KEY: &str = "demo-key-123";

const CITY_PREVIEW: usize = 5;

#[derive(Debug, Clone, Args, PartialEq, Eq)]
pub struct DemoArgs {
    /// City to show current weather and forecast for.
    #[arg(long, default_value = "London")]
    pub city: String,

    /// Country whose cities are listed.
    #[arg(long, default_value = "UK")]
    pub country: String,

    /// Number of forecast days to request.
    #[arg(long, default_value_t = 3)]
    pub days: u32,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            city: "London".to_string(),
            country: "UK".to_string(),
            days: 3,
        }
    }
}

/// Walk through all four API operations and print the results.
pub async fn run_demo(api: &dyn WeatherApi, args: &DemoArgs, out: &mut impl Write) -> Result<()> {
    writeln!(out, "🌤️  Weather API Client Demo")?;
    writeln!(out, "{}", "=".repeat(40))?;

    writeln!(out, "API Key Valid: {}", api.validate_api_key().await)?;

    let city = args.city.as_str();
    let current = api.get_current_weather(city).await;
    writeln!(out, "\nCurrent weather in {city}:")?;
    writeln!(out, "Temperature: {}°C", field_or_na(&current, "temperature"))?;
    writeln!(out, "Condition: {}", field_or_na(&current, "condition"))?;

    let forecast = api.get_forecast(city, args.days).await;
    writeln!(out, "\n{}-day forecast for {city}:", args.days)?;
    match ForecastDay::list(&forecast) {
        Some(days) => {
            for day in days {
                writeln!(out, "  {}: {} - {}°C", day.date, day.condition, day.temp)?;
            }
        }
        None => writeln!(out, "  Forecast data not available")?,
    }

    let country = args.country.as_str();
    let cities = api.get_cities_by_country(country).await;
    writeln!(out, "\nCities in {country}: {}", city_preview(&cities))?;

    Ok(())
}

fn city_preview(cities: &[String]) -> String {
    let shown = cities.iter().take(CITY_PREVIEW).map(String::as_str).collect::<Vec<_>>();
    let more = if cities.len() > CITY_PREVIEW { "..." } else { "" };
    format!("{}{more}", shown.join(", "))
}
