//! Mapping tables from raw present-weather codes (NOAA LCD
//! `HourlyPresentWeatherType`) to categorical labels.
//!
//! Hourly and daily cleaning use two separate tables: the hourly one keeps
//! intensity and obscuration detail needed for the severe-weather flag, the
//! daily one only tells rain from snow.

use std::fmt;

/// Reduces a raw present-weather value to its lookup key.
///
/// Only the automated segment (before the first `|`) is used. Tokens lose
/// their `:NN` suffixes and are joined by single spaces, so
/// `"-RA:02 BR:1 |RA |"` becomes `"-RA BR"`.
pub fn normalize_code(raw: &str) -> Option<String> {
    let automated = raw.split('|').next().unwrap_or_default();
    let tokens: Vec<&str> = automated
        .split_whitespace()
        .map(|token| token.split(':').next().unwrap_or(token))
        .filter(|token| !token.is_empty())
        .collect();
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" "))
    }
}

/// Categorical hourly weather label.
///
/// `Sunny` and `Unknown` are never produced by the code table; they are the
/// overrides applied when precipitation is zero or everything is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HourlyWeatherType {
    Sunny,
    Unknown,
    Mist,
    Haze,
    Fog,
    FreezingFog,
    LightDrizzle,
    Drizzle,
    LightRain,
    Rain,
    HeavyRain,
    LightRainMist,
    RainMist,
    HeavyRainMist,
    HeavyRainFog,
    LightFreezingRain,
    FreezingRain,
    LightSnow,
    Snow,
    HeavySnow,
    LightSnowMist,
    SnowMist,
    HeavySnowFog,
    FreezingFogSnow,
    IcePellets,
    Thunderstorm,
    ThunderstormRain,
    UnknownPrecipitation,
}

impl HourlyWeatherType {
    /// Looks up a normalized code, see [`normalize_code`].
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "BR" => Some(HourlyWeatherType::Mist),
            "HZ" => Some(HourlyWeatherType::Haze),
            "FG" => Some(HourlyWeatherType::Fog),
            "FZFG" => Some(HourlyWeatherType::FreezingFog),
            "-DZ" | "-DZ BR" => Some(HourlyWeatherType::LightDrizzle),
            "DZ" | "DZ BR" => Some(HourlyWeatherType::Drizzle),
            "-RA" => Some(HourlyWeatherType::LightRain),
            "RA" => Some(HourlyWeatherType::Rain),
            "+RA" => Some(HourlyWeatherType::HeavyRain),
            "-RA BR" => Some(HourlyWeatherType::LightRainMist),
            "RA BR" => Some(HourlyWeatherType::RainMist),
            "+RA BR" => Some(HourlyWeatherType::HeavyRainMist),
            "+RA FG" | "RA FG" => Some(HourlyWeatherType::HeavyRainFog),
            "-FZRA" | "-FZRA BR" => Some(HourlyWeatherType::LightFreezingRain),
            "FZRA" | "+FZRA" | "FZRA BR" => Some(HourlyWeatherType::FreezingRain),
            "-SN" => Some(HourlyWeatherType::LightSnow),
            "SN" => Some(HourlyWeatherType::Snow),
            "+SN" => Some(HourlyWeatherType::HeavySnow),
            "-SN BR" => Some(HourlyWeatherType::LightSnowMist),
            "SN BR" => Some(HourlyWeatherType::SnowMist),
            "+SN FG" | "+SN BR" | "SN FG" => Some(HourlyWeatherType::HeavySnowFog),
            "-SN FZFG" | "SN FZFG" | "+SN FZFG" => Some(HourlyWeatherType::FreezingFogSnow),
            "PL" | "-PL" | "+PL" => Some(HourlyWeatherType::IcePellets),
            "TS" | "VCTS" => Some(HourlyWeatherType::Thunderstorm),
            "TSRA" | "-TSRA" | "+TSRA" | "TS RA" | "TS -RA" | "TS +RA" => {
                Some(HourlyWeatherType::ThunderstormRain)
            }
            "UP" | "-UP" => Some(HourlyWeatherType::UnknownPrecipitation),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HourlyWeatherType::Sunny => "sunny",
            HourlyWeatherType::Unknown => "unknown",
            HourlyWeatherType::Mist => "mist",
            HourlyWeatherType::Haze => "haze",
            HourlyWeatherType::Fog => "fog",
            HourlyWeatherType::FreezingFog => "freezing fog",
            HourlyWeatherType::LightDrizzle => "light drizzle",
            HourlyWeatherType::Drizzle => "drizzle",
            HourlyWeatherType::LightRain => "light rain",
            HourlyWeatherType::Rain => "rain",
            HourlyWeatherType::HeavyRain => "heavy rain",
            HourlyWeatherType::LightRainMist => "light rain and mist",
            HourlyWeatherType::RainMist => "rain and mist",
            HourlyWeatherType::HeavyRainMist => "heavy rain and mist",
            HourlyWeatherType::HeavyRainFog => "heavy rain and fog",
            HourlyWeatherType::LightFreezingRain => "light freezing rain",
            HourlyWeatherType::FreezingRain => "freezing rain",
            HourlyWeatherType::LightSnow => "light snow",
            HourlyWeatherType::Snow => "snow",
            HourlyWeatherType::HeavySnow => "heavy snow",
            HourlyWeatherType::LightSnowMist => "light snow and mist",
            HourlyWeatherType::SnowMist => "snow and mist",
            HourlyWeatherType::HeavySnowFog => "heavy snow and fog",
            HourlyWeatherType::FreezingFogSnow => "freezing fog and snow",
            HourlyWeatherType::IcePellets => "ice pellets",
            HourlyWeatherType::Thunderstorm => "thunderstorm",
            HourlyWeatherType::ThunderstormRain => "thunderstorm and rain",
            HourlyWeatherType::UnknownPrecipitation => "unknown precipitation",
        }
    }

    /// Severe-weather flag: `None` for [`HourlyWeatherType::Unknown`].
    pub fn is_severe(&self) -> Option<bool> {
        match self {
            HourlyWeatherType::Unknown => None,
            HourlyWeatherType::HeavyRain
            | HourlyWeatherType::HeavyRainMist
            | HourlyWeatherType::HeavyRainFog
            | HourlyWeatherType::FreezingFog
            | HourlyWeatherType::FreezingFogSnow
            | HourlyWeatherType::LightFreezingRain
            | HourlyWeatherType::FreezingRain
            | HourlyWeatherType::HeavySnow
            | HourlyWeatherType::HeavySnowFog
            | HourlyWeatherType::IcePellets
            | HourlyWeatherType::Thunderstorm
            | HourlyWeatherType::ThunderstormRain => Some(true),
            _ => Some(false),
        }
    }
}

impl fmt::Display for HourlyWeatherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse daily weather category. Unmapped codes fall into `Other`.
///
/// No severe-weather flag is derived at daily resolution: the finer labels a
/// daily severe list would need do not exist in this three-way mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DailyWeatherType {
    #[default]
    Other,
    Rain,
    Snow,
}

impl DailyWeatherType {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some(
                "-RA" | "RA" | "+RA" | "-RA BR" | "RA BR" | "+RA BR" | "+RA FG" | "RA FG" | "-DZ"
                | "DZ" | "-DZ BR" | "DZ BR" | "-FZRA" | "FZRA" | "+FZRA" | "TSRA" | "-TSRA"
                | "+TSRA",
            ) => DailyWeatherType::Rain,
            Some(
                "-SN" | "SN" | "+SN" | "-SN BR" | "SN BR" | "+SN BR" | "+SN FG" | "SN FG"
                | "-SN FZFG" | "SN FZFG" | "+SN FZFG" | "PL" | "-PL" | "+PL",
            ) => DailyWeatherType::Snow,
            _ => DailyWeatherType::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DailyWeatherType::Other => "other",
            DailyWeatherType::Rain => "rain",
            DailyWeatherType::Snow => "snow",
        }
    }

    /// Day-level category: snow beats rain, rain beats everything else.
    pub fn dominant(types: impl IntoIterator<Item = DailyWeatherType>) -> Self {
        types.into_iter().max().unwrap_or(DailyWeatherType::Other)
    }
}

impl fmt::Display for DailyWeatherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
