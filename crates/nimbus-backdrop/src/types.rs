use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wind speed (km/h) at which an otherwise dry day is shown as windy.
pub const WINDY_THRESHOLD_KMH: f64 = 40.0;

/// Known weather background categories.
///
/// The resolver itself works on plain string keys so that unknown keys still
/// resolve (to the neutral background); this enum names the supported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherKey {
    Thunder,
    HeavyRain,
    Rain,
    Wind,
    Sunny,
    Cloud,
    #[default]
    Neutral,
}

impl WeatherKey {
    pub const ALL: [WeatherKey; 7] = [
        Self::Thunder,
        Self::HeavyRain,
        Self::Rain,
        Self::Wind,
        Self::Sunny,
        Self::Cloud,
        Self::Neutral,
    ];

    /// The string form used as cache and table key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thunder => "thunder",
            Self::HeavyRain => "heavy-rain",
            Self::Rain => "rain",
            Self::Wind => "wind",
            Self::Sunny => "sunny",
            Self::Cloud => "cloud",
            Self::Neutral => "neutral",
        }
    }

    /// Pick a background category for a condition and current wind speed.
    ///
    /// Precipitation and storms take priority over wind.
    pub fn classify(condition: WeatherCondition, wind_speed_kmh: f64) -> Self {
        let key = Self::from(condition);
        match key {
            Self::Sunny | Self::Cloud | Self::Neutral if wind_speed_kmh >= WINDY_THRESHOLD_KMH => {
                Self::Wind
            }
            other => other,
        }
    }
}

impl From<WeatherCondition> for WeatherKey {
    fn from(condition: WeatherCondition) -> Self {
        match condition {
            WeatherCondition::Clear => Self::Sunny,
            WeatherCondition::PartlyCloudy | WeatherCondition::Cloudy => Self::Cloud,
            WeatherCondition::Drizzle | WeatherCondition::Rain | WeatherCondition::Sleet => {
                Self::Rain
            }
            WeatherCondition::HeavyRain => Self::HeavyRain,
            WeatherCondition::Thunderstorm => Self::Thunder,
            WeatherCondition::Fog | WeatherCondition::Snow => Self::Neutral,
        }
    }
}

impl fmt::Display for WeatherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the known weather keys
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown weather key: {0}")]
pub struct UnknownWeatherKey(pub String);

impl FromStr for WeatherKey {
    type Err = UnknownWeatherKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownWeatherKey(s.to_string()))
    }
}

/// Weather condition categories mapped from WMO codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    Sleet,
    Thunderstorm,
}

impl WeatherCondition {
    /// Convert WMO weather code to WeatherCondition
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1..=2 => Self::PartlyCloudy,
            3 => Self::Cloudy,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            56 | 57 | 66 | 67 => Self::Sleet, // Freezing drizzle / rain
            61 | 63 | 80 => Self::Rain,
            65 | 81 | 82 => Self::HeavyRain,
            71 | 73 | 75 | 77 | 85 | 86 => Self::Snow,
            95 | 96 | 99 => Self::Thunderstorm,
            _ => Self::Clear,
        }
    }

    /// Human-readable description, also used for the background's accessibility label
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Sleet => "Sleet",
            Self::Thunderstorm => "Thunderstorm",
        }
    }
}

/// Which rendition of a search result the caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    /// Animated image (GIF/WebP)
    #[default]
    Standard,
    /// MP4 video when the result carries one
    Video,
}

impl MediaFormat {
    pub fn from_prefer_video(prefer_video: bool) -> Self {
        if prefer_video {
            Self::Video
        } else {
            Self::Standard
        }
    }

    /// Path segment of the search endpoint for this format
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Standard => "gifs",
            Self::Video => "videos",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_strings_round_trip_through_from_str() {
        for key in WeatherKey::ALL {
            assert_eq!(key.as_str().parse::<WeatherKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_key_parse_is_case_insensitive() {
        assert_eq!("Heavy-Rain".parse::<WeatherKey>().unwrap(), WeatherKey::HeavyRain);
        assert_eq!(" sunny ".parse::<WeatherKey>().unwrap(), WeatherKey::Sunny);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = "hail".parse::<WeatherKey>().unwrap_err();
        assert_eq!(err, UnknownWeatherKey("hail".to_string()));
    }

    #[test]
    fn test_key_serde_uses_kebab_case() {
        let json = serde_json::to_string(&WeatherKey::HeavyRain).unwrap();
        assert_eq!(json, "\"heavy-rain\"");
    }

    #[test]
    fn test_wmo_code_mapping() {
        assert_eq!(WeatherCondition::from_wmo_code(0), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_wmo_code(2), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherCondition::from_wmo_code(48), WeatherCondition::Fog);
        assert_eq!(WeatherCondition::from_wmo_code(57), WeatherCondition::Sleet);
        assert_eq!(WeatherCondition::from_wmo_code(82), WeatherCondition::HeavyRain);
        assert_eq!(WeatherCondition::from_wmo_code(86), WeatherCondition::Snow);
        assert_eq!(WeatherCondition::from_wmo_code(99), WeatherCondition::Thunderstorm);
        assert_eq!(WeatherCondition::from_wmo_code(-1), WeatherCondition::Clear);
    }

    #[test]
    fn test_wmo_code_to_key() {
        assert_eq!(WeatherKey::from(WeatherCondition::from_wmo_code(0)), WeatherKey::Sunny);
        assert_eq!(WeatherKey::from(WeatherCondition::from_wmo_code(3)), WeatherKey::Cloud);
        assert_eq!(WeatherKey::from(WeatherCondition::from_wmo_code(51)), WeatherKey::Rain);
        assert_eq!(WeatherKey::from(WeatherCondition::from_wmo_code(65)), WeatherKey::HeavyRain);
        assert_eq!(WeatherKey::from(WeatherCondition::from_wmo_code(95)), WeatherKey::Thunder);
        assert_eq!(WeatherKey::from(WeatherCondition::from_wmo_code(73)), WeatherKey::Neutral);
    }

    #[test]
    fn test_classify_wind_only_overrides_dry_conditions() {
        assert_eq!(WeatherKey::classify(WeatherCondition::Clear, 55.0), WeatherKey::Wind);
        assert_eq!(WeatherKey::classify(WeatherCondition::Cloudy, 40.0), WeatherKey::Wind);
        assert_eq!(WeatherKey::classify(WeatherCondition::Clear, 10.0), WeatherKey::Sunny);
        assert_eq!(WeatherKey::classify(WeatherCondition::Rain, 80.0), WeatherKey::Rain);
        assert_eq!(
            WeatherKey::classify(WeatherCondition::Thunderstorm, 80.0),
            WeatherKey::Thunder
        );
    }

    #[test]
    fn test_media_format_endpoints() {
        assert_eq!(MediaFormat::from_prefer_video(false), MediaFormat::Standard);
        assert_eq!(MediaFormat::from_prefer_video(true), MediaFormat::Video);
        assert_eq!(MediaFormat::Standard.endpoint(), "gifs");
        assert_eq!(MediaFormat::Video.endpoint(), "videos");
    }

    #[test]
    fn test_condition_description() {
        assert_eq!(WeatherCondition::Clear.description(), "Clear");
        assert_eq!(WeatherCondition::Thunderstorm.description(), "Thunderstorm");
    }
}
