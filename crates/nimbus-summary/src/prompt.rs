use nimbus_core::Language;
use nimbus_weather::WeatherSnapshot;

/// Build the meteorologist prompt for a snapshot, asking for the answer in `lang`.
///
/// Values are embedded in metric units regardless of display preferences.
pub fn build_prompt(snapshot: &WeatherSnapshot, lang: Language) -> String {
    format!(
        "As a senior meteorologist, analyze the weather for {city} with these details:\n\
         Temp: {temp:.0}°C\n\
         Condition: {condition}\n\
         Humidity: {humidity}%\n\
         Wind: {wind:.0} km/h\n\
         Storm Chance: {storm}%\n\
         Clouds: {clouds}%\n\
         \n\
         Please provide a short and practical analysis in {language} including:\n\
         1. General overview for today.\n\
         2. Safety advice (e.g., if there's high wind or storm).\n\
         3. Suggested activities for this weather.\n\
         Respond in short paragraphs.",
        city = snapshot.city,
        temp = snapshot.temperature_c,
        condition = snapshot.condition.description(),
        humidity = snapshot.humidity,
        wind = snapshot.wind_speed_kmh,
        storm = snapshot.storm_chance,
        clouds = snapshot.clouds,
        language = lang.display_name(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_weather::{Condition, ForecastDay, DEFAULT_DESCRIPTION_KEY};

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            city: "Cairo".into(),
            temperature_c: 27.6,
            condition: Condition::PartlyCloudy,
            description_key: DEFAULT_DESCRIPTION_KEY.into(),
            humidity: 41,
            clouds: 30,
            storm_chance: 12,
            wind_speed_kmh: 18.2,
            wind_direction_deg: 90,
            pressure_hpa: 1012.0,
            rain_mm: 0.0,
            uv_index: 8,
            latitude: 30.0444,
            longitude: 31.2357,
            forecast: std::array::from_fn(|i| ForecastDay {
                day: i.to_string(),
                max_c: 30.0,
                min_c: 20.0,
                condition: Condition::Clear,
                rain_probability: 0,
            }),
        }
    }

    #[test]
    fn test_prompt_embeds_readings() {
        let prompt = build_prompt(&snapshot(), Language::English);
        assert!(prompt.starts_with("As a senior meteorologist, analyze the weather for Cairo"));
        assert!(prompt.contains("Temp: 28°C"));
        assert!(prompt.contains("Condition: Partly Cloudy"));
        assert!(prompt.contains("Humidity: 41%"));
        assert!(prompt.contains("Wind: 18 km/h"));
        assert!(prompt.contains("Storm Chance: 12%"));
        assert!(prompt.contains("Clouds: 30%"));
    }

    #[test]
    fn test_prompt_names_response_language() {
        assert!(build_prompt(&snapshot(), Language::Persian).contains("analysis in Persian (Farsi)"));
        assert!(build_prompt(&snapshot(), Language::Arabic).contains("analysis in Arabic"));
    }

    #[test]
    fn test_prompt_asks_for_three_sections() {
        let prompt = build_prompt(&snapshot(), Language::English);
        assert!(prompt.contains("1. General overview for today."));
        assert!(prompt.contains("2. Safety advice"));
        assert!(prompt.contains("3. Suggested activities for this weather."));
        assert!(prompt.ends_with("Respond in short paragraphs."));
    }
}
