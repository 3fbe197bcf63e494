//! Interactive command parsing.

use nimbus_core::ParsePreferenceError;
use nimbus_ui::Preference;

pub const HELP: &str = "\
Commands:
  search <city>                 look up a city (bare text works too)
  lang <fa|en|ar>               interface and analysis language
  unit <c|f>                    temperature unit
  wind <kmh|mph|ms>             wind speed unit
  layer <clouds|precipitation>  map overlay
  help                          show this help
  quit                          exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Search(String),
    Set(Preference),
    Help,
    Quit,
    Invalid(String),
}

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }

    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_ascii_lowercase().as_str() {
        "quit" | "exit" | "q" => Command::Quit,
        "help" | "?" => Command::Help,
        "search" | "s" if rest.is_empty() => Command::Invalid("usage: search <city>".into()),
        "search" | "s" => Command::Search(rest.to_string()),
        "lang" => preference(rest.parse().map(Preference::Language)),
        "unit" => preference(rest.parse().map(Preference::TemperatureUnit)),
        "wind" => preference(rest.parse().map(Preference::WindSpeedUnit)),
        "layer" => preference(rest.parse().map(Preference::MapLayer)),
        _ => Command::Search(line.to_string()),
    }
}

fn preference(parsed: Result<Preference, ParsePreferenceError>) -> Command {
    match parsed {
        Ok(p) => Command::Set(p),
        Err(e) => Command::Invalid(e.to_string()),
    }
}
