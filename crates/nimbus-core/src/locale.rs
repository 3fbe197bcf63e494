//! UI languages and the label set each one renders with.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::ParsePreferenceError;

/// Text direction of a UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Rtl,
    Ltr,
}

/// UI language preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "fa")]
    Persian,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ar")]
    Arabic,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Persian, Language::English, Language::Arabic];

    /// Short code used on the command line and in config ("fa", "en", "ar").
    pub fn code(self) -> &'static str {
        match self {
            Language::Persian => "fa",
            Language::English => "en",
            Language::Arabic => "ar",
        }
    }

    pub fn direction(self) -> TextDirection {
        match self {
            Language::English => TextDirection::Ltr,
            Language::Persian | Language::Arabic => TextDirection::Rtl,
        }
    }

    /// Name used when asking the text-generation service to answer in this language.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::Persian => "Persian (Farsi)",
            Language::English => "English",
            Language::Arabic => "Arabic",
        }
    }

    /// City searched automatically when the dashboard starts.
    pub fn default_city(self) -> &'static str {
        match self {
            Language::Persian => "تهران",
            Language::English => "London",
            Language::Arabic => "القاهرة",
        }
    }

    pub fn strings(self) -> &'static Strings {
        match self {
            Language::Persian => &PERSIAN,
            Language::English => &ENGLISH,
            Language::Arabic => &ARABIC,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ParsePreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fa" | "persian" | "farsi" => Ok(Language::Persian),
            "en" | "english" => Ok(Language::English),
            "ar" | "arabic" => Ok(Language::Arabic),
            other => Err(ParsePreferenceError::new("language", other)),
        }
    }
}

/// Labels for one language.
///
/// `days` starts at Saturday (day index 0). `directions` follows compass order
/// N, NE, E, SE, S, SW, W, NW. `conditions` follows the weather condition enum
/// order: clear, partly cloudy, cloudy, rainy, stormy, snowy.
#[derive(Debug)]
pub struct Strings {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub loading: &'static str,
    pub humidity: &'static str,
    pub clouds: &'static str,
    pub storm_chance: &'static str,
    pub uv_index: &'static str,
    pub wind_status: &'static str,
    pub ai_analysis: &'static str,
    pub analyzing: &'static str,
    pub map_title: &'static str,
    pub map_subtitle: &'static str,
    pub clouds_layer: &'static str,
    pub precip_layer: &'static str,
    pub map_online: &'static str,
    pub auto_update: &'static str,
    pub forecast_title: &'static str,
    pub max_temp: &'static str,
    pub min_temp: &'static str,
    pub precip_prob: &'static str,
    pub weather_desc: &'static str,
    pub error_finding_city: &'static str,
    pub city_not_found: &'static str,
    pub lookup_failed: &'static str,
    pub footer: &'static str,
    pub days: [&'static str; 7],
    pub directions: [&'static str; 8],
    pub conditions: [&'static str; 6],
}

impl Strings {
    /// Look up a description key. The generic description is the only entry,
    /// so unknown keys resolve to it as well.
    pub fn description(&self, _key: &str) -> &'static str {
        self.weather_desc
    }

    /// Day name for a text day index; anything unparsable is shown as-is.
    pub fn day_name<'a>(&self, day: &'a str) -> &'a str {
        day.parse::<usize>()
            .ok()
            .and_then(|i| self.days.get(i).copied())
            .unwrap_or(day)
    }
}

static ENGLISH: Strings = Strings {
    title: "Nimbus Weather",
    subtitle: "Live conditions, forecast and AI analysis",
    loading: "Fetching weather data...",
    humidity: "Humidity",
    clouds: "Clouds",
    storm_chance: "Storm chance",
    uv_index: "UV index",
    wind_status: "Wind status",
    ai_analysis: "AI weather analysis",
    analyzing: "Analyzing weather conditions...",
    map_title: "Live weather map",
    map_subtitle: "Satellite and radar view over",
    clouds_layer: "Clouds",
    precip_layer: "Precipitation",
    map_online: "Live map",
    auto_update: "Updates every 10 minutes",
    forecast_title: "7-day forecast",
    max_temp: "Max",
    min_temp: "Min",
    precip_prob: "rain",
    weather_desc: "Conditions are typical for the season.",
    error_finding_city: "Error finding city",
    city_not_found: "Could not locate this city. Please enter a more precise name.",
    lookup_failed: "The location service could not be reached.",
    footer: "Map data (c) OpenStreetMap contributors, overlays by RainViewer",
    days: [
        "Saturday",
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
    ],
    directions: [
        "North",
        "Northeast",
        "East",
        "Southeast",
        "South",
        "Southwest",
        "West",
        "Northwest",
    ],
    conditions: ["Clear", "Partly cloudy", "Cloudy", "Rainy", "Stormy", "Snowy"],
};

static PERSIAN: Strings = Strings {
    title: "هواشناسی نیمبوس",
    subtitle: "وضعیت لحظه‌ای، پیش‌بینی و تحلیل هوشمند",
    loading: "در حال دریافت اطلاعات هواشناسی...",
    humidity: "رطوبت",
    clouds: "ابرناکی",
    storm_chance: "احتمال طوفان",
    uv_index: "شاخص UV",
    wind_status: "وضعیت باد",
    ai_analysis: "تحلیل هوشمند هوا",
    analyzing: "در حال تحلیل شرایط جوی...",
    map_title: "نقشه زنده هواشناسی",
    map_subtitle: "نمای ماهواره و رادار بر فراز",
    clouds_layer: "ابرها",
    precip_layer: "بارش",
    map_online: "نقشه زنده",
    auto_update: "به‌روزرسانی هر ۱۰ دقیقه",
    forecast_title: "پیش‌بینی ۷ روزه",
    max_temp: "بیشینه",
    min_temp: "کمینه",
    precip_prob: "بارش",
    weather_desc: "شرایط جوی متناسب با فصل است.",
    error_finding_city: "خطا در یافتن شهر",
    city_not_found: "موقعیت جغرافیایی این شهر یافت نشد. لطفاً نام را دقیق‌تر وارد کنید.",
    lookup_failed: "ارتباط با سرویس موقعیت‌یابی برقرار نشد.",
    footer: "داده‌های نقشه از OpenStreetMap و لایه‌های هواشناسی از RainViewer",
    days: [
        "شنبه",
        "یکشنبه",
        "دوشنبه",
        "سه‌شنبه",
        "چهارشنبه",
        "پنجشنبه",
        "جمعه",
    ],
    directions: [
        "شمال",
        "شمال شرقی",
        "شرق",
        "جنوب شرقی",
        "جنوب",
        "جنوب غربی",
        "غرب",
        "شمال غربی",
    ],
    conditions: ["صاف", "نیمه ابری", "ابری", "بارانی", "طوفانی", "برفی"],
};

static ARABIC: Strings = Strings {
    title: "طقس نيمبوس",
    subtitle: "الأحوال الحالية والتوقعات والتحليل الذكي",
    loading: "جارٍ جلب بيانات الطقس...",
    humidity: "الرطوبة",
    clouds: "الغيوم",
    storm_chance: "احتمال العاصفة",
    uv_index: "مؤشر الأشعة فوق البنفسجية",
    wind_status: "حالة الرياح",
    ai_analysis: "تحليل الطقس الذكي",
    analyzing: "جارٍ تحليل الأحوال الجوية...",
    map_title: "خريطة الطقس المباشرة",
    map_subtitle: "عرض الأقمار الصناعية والرادار فوق",
    clouds_layer: "الغيوم",
    precip_layer: "الهطول",
    map_online: "خريطة مباشرة",
    auto_update: "تحديث كل 10 دقائق",
    forecast_title: "توقعات 7 أيام",
    max_temp: "العظمى",
    min_temp: "الصغرى",
    precip_prob: "مطر",
    weather_desc: "الأحوال الجوية معتادة لهذا الموسم.",
    error_finding_city: "خطأ في العثور على المدينة",
    city_not_found: "تعذر تحديد موقع هذه المدينة. يرجى إدخال اسم أدق.",
    lookup_failed: "تعذر الاتصال بخدمة تحديد المواقع.",
    footer: "بيانات الخريطة من OpenStreetMap وطبقات الطقس من RainViewer",
    days: [
        "السبت",
        "الأحد",
        "الاثنين",
        "الثلاثاء",
        "الأربعاء",
        "الخميس",
        "الجمعة",
    ],
    directions: [
        "شمال",
        "شمال شرق",
        "شرق",
        "جنوب شرق",
        "جنوب",
        "جنوب غرب",
        "غرب",
        "شمال غرب",
    ],
    conditions: ["صافٍ", "غائم جزئياً", "غائم", "ممطر", "عاصف", "مثلج"],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes_round_trip_through_from_str() {
        for lang in Language::ALL {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        let err = "de".parse::<Language>().unwrap_err();
        assert!(err.to_string().contains("language"));
    }

    #[test]
    fn test_direction() {
        assert_eq!(Language::English.direction(), TextDirection::Ltr);
        assert_eq!(Language::Persian.direction(), TextDirection::Rtl);
        assert_eq!(Language::Arabic.direction(), TextDirection::Rtl);
    }

    #[test]
    fn test_default_cities() {
        assert_eq!(Language::English.default_city(), "London");
        assert_eq!(Language::Persian.default_city(), "تهران");
        assert_eq!(Language::Arabic.default_city(), "القاهرة");
    }

    #[test]
    fn test_day_name_falls_back_to_raw_value() {
        let strings = Language::English.strings();
        assert_eq!(strings.day_name("0"), "Saturday");
        assert_eq!(strings.day_name("6"), "Friday");
        assert_eq!(strings.day_name("7"), "7");
        assert_eq!(strings.day_name("mon"), "mon");
    }

    #[test]
    fn test_serde_uses_short_codes() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            language: Language,
        }
        let parsed: Wrapper = toml::from_str("language = \"ar\"").unwrap();
        assert_eq!(parsed.language, Language::Arabic);
    }
}
