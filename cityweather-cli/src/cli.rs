use anyhow::Context;
use clap::{Parser, Subcommand};
use cityweather_core::{
    CityNameResolver, Config, Navigation, QueryParams, Route, WeatherLookupService,
    check_city_name,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "City weather lookups")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather for a city name or a coordinate pair.
    Find {
        /// City name, e.g. "Paris" or "Paris,FR".
        city: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Find the city a free-text name refers to, ignoring case and accents.
    Resolve {
        name: String,
    },

    /// Check a route's `cityName` parameter, e.g. "/forecast?cityName=Munchen".
    Navigate {
        route: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Find { city, lat, lon, json } => {
                let service = service()?;
                let cities = service.fetch_params(QueryParams { city, lat, lon }).await?;

                if let Some(error) = service.error() {
                    anyhow::bail!("Weather lookup failed: {error}");
                }

                if json {
                    println!("{}", serde_json::to_string_pretty(&*cities)?);
                } else {
                    print!("{}", output::city_table(&cities));
                }
                Ok(())
            }
            Command::Resolve { name } => {
                let service = service()?;

                match CityNameResolver::resolve(&name, &[], &service).await {
                    Some(city) => print!("{}", output::city_table(std::slice::from_ref(&city))),
                    None => {
                        if let Some(error) = service.error() {
                            eprintln!("Weather lookup failed: {error}");
                        }
                        println!("No city named '{name}' found.");
                    }
                }
                Ok(())
            }
            Command::Navigate { route } => {
                let route = Route::parse(&route)
                    .with_context(|| format!("Invalid route '{route}'"))?;
                let service = service()?;

                match check_city_name(&route, &service).await {
                    Navigation::Proceed => println!("proceed {route}"),
                    Navigation::Redirect { to, replace } => {
                        let mode = if replace { "replace" } else { "push" };
                        println!("redirect ({mode}) {to}");
                    }
                }
                Ok(())
            }
        }
    }
}

fn service() -> anyhow::Result<WeatherLookupService> {
    let config = Config::load()?;
    WeatherLookupService::from_config(&config)
}

fn configure() -> anyhow::Result<()> {
    // Read the file alone so an OPENWEATHER_API_KEY override is never persisted.
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    if config.is_configured() {
        println!("An API key is already stored in {}; it will be replaced.", path.display());
    }

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .with_help_message("Create one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key.to_string());
    config.save_to(&path)?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}
