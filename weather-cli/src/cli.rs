use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use inquire::{Password, PasswordDisplayMode, Select};
use weather_core::{Config, Coordinates, DisplayWeather, Units, WeatherError, WeatherService};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a city, with a matching theme")]
pub struct Cli {
    /// Log request flow to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and default units.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name, forwarded to the provider as typed.
        city: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show weather for a location fix, resolved to a city first.
    Locate {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Defaults to the configured units.
    #[arg(long, value_enum)]
    pub units: Option<UnitsArg>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnitsArg {
    Metric,
    Imperial,
    Standard,
}

impl From<UnitsArg> for Units {
    fn from(value: UnitsArg) -> Self {
        match value {
            UnitsArg::Metric => Units::Metric,
            UnitsArg::Imperial => Units::Imperial,
            UnitsArg::Standard => Units::Standard,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, output } => {
                let service = build_service(&output)?;
                let result = service.handle(&city).await;
                report(result, output.json)
            }
            Command::Locate { lat, lon, output } => {
                let service = build_service(&output)?;
                let result = service.handle_location(Some(Coordinates::new(lat, lon))).await;
                report(result, output.json)
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());

    let options = Units::all().to_vec();
    let current = options.iter().position(|u| *u == config.units).unwrap_or(0);
    config.units = Select::new("Default units:", options)
        .with_starting_cursor(current)
        .prompt()
        .context("Failed to read units")?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn build_service(output: &OutputArgs) -> anyhow::Result<WeatherService> {
    let config = Config::load()?;
    let units = output.units.map(Units::from).unwrap_or(config.units);
    Ok(WeatherService::from_config(&config)?.with_units(units))
}

fn report(result: Result<DisplayWeather, WeatherError>, json: bool) -> anyhow::Result<()> {
    let display = match result {
        Ok(display) => display,
        Err(err) => {
            let message = err.user_message().to_string();
            return Err(anyhow::Error::new(err).context(message));
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&display)?);
    } else {
        print!("{}", render(&display));
    }
    Ok(())
}

fn render(display: &DisplayWeather) -> String {
    format!(
        "{city}\n\
         {day}, {date}\n\
         {temp}° {condition}\n\
         {min} | {max}\n\
         Humidity: {humidity}\n\
         Wind:     {wind}\n\
         Pressure: {pressure}\n\
         Sunrise:  {sunrise}\n\
         Sunset:   {sunset}\n\
         Theme:    {theme} ({background}, {animation})\n",
        city = display.city_name,
        day = display.day_label,
        date = display.date_label,
        temp = display.temperature_rounded,
        condition = display.condition,
        min = display.temp_min_label,
        max = display.temp_max_label,
        humidity = display.humidity_label,
        wind = display.wind_label,
        pressure = display.pressure_label,
        sunrise = display.sunrise_label,
        sunset = display.sunset_label,
        theme = display.theme,
        background = display.theme.background(),
        animation = display.theme.animation(),
    )
}
