use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use nimbus_core::{AppError, Config, Language};
use nimbus_summary::{GeminiClient, Summarizer};
use nimbus_ui::{Dashboard, DisplayPreferences, HeadlessMap};
use nimbus_weather::WeatherFetcher;
use tokio::io::{AsyncBufReadExt, BufReader};

mod command;

use command::Command;

#[derive(Parser, Debug)]
#[command(version, about = "Terminal weather dashboard", long_about = None)]
struct Args {
    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Interface language: fa, en or ar
    #[arg(long)]
    lang: Option<Language>,

    /// City to show first instead of the language default
    #[arg(long)]
    city: Option<String>,

    /// Render once after the first search and exit
    #[arg(long, default_value_t = false)]
    once: bool,

    /// Write a default config file and exit
    #[arg(long, default_value_t = false)]
    write_default_config: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    nimbus_core::init()?;
    let args = Args::parse();

    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("{}", e.user_message());
            Err(e.into())
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let path = match args.config {
        Some(path) => path,
        None => Config::config_path()?,
    };

    if args.write_default_config {
        Config::default().save_to(&path)?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let config = if path.exists() {
        Config::load_from(&path)?
    } else {
        tracing::debug!("No config file at {}, using defaults", path.display());
        Config::default()
    };
    let (config, _) = config.into_validated()?;

    let mut preferences = DisplayPreferences::from_config(&config.ui);
    if let Some(language) = args.lang {
        preferences.language = language;
    }

    let fetcher = WeatherFetcher::from_config(&config)?;
    let summarizer = Summarizer::new(Arc::new(GeminiClient::new(&config.summary)?));
    let mut dashboard = Dashboard::new(
        fetcher,
        summarizer,
        HeadlessMap::new(),
        config.map.clone(),
        preferences,
    );

    match args.city.as_deref() {
        Some(city) if dashboard.submit_search(city) => {}
        _ => dashboard.start(),
    }

    if args.once {
        while dashboard.is_busy() {
            match dashboard.next_message().await {
                Some(message) => dashboard.handle_message(message),
                None => break,
            }
        }
        println!("{}", dashboard.render());
        dashboard.shutdown();
        return Ok(());
    }

    tracing::info!("Nimbus started");
    redraw(&dashboard)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match command::parse(&line) {
                    Command::Quit => break,
                    Command::Help => {
                        println!("{}", command::HELP);
                        continue;
                    }
                    Command::Invalid(message) => {
                        println!("{}", message);
                        continue;
                    }
                    Command::Empty => {}
                    Command::Search(query) => {
                        dashboard.submit_search(&query);
                    }
                    Command::Set(preference) => dashboard.set_preference(preference),
                }
            }
            Some(message) = dashboard.next_message() => dashboard.handle_message(message),
        }
        redraw(&dashboard)?;
    }

    dashboard.shutdown();
    tracing::info!("Nimbus stopped");
    Ok(())
}

fn redraw(dashboard: &Dashboard) -> Result<(), AppError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "\n{}", dashboard.render())?;
    write!(stdout, "> ")?;
    stdout.flush()?;
    Ok(())
}
