//! Static lookup tables keyed by weather key.

/// Background used for keys with no entry of their own.
pub const NEUTRAL_FALLBACK_URL: &str =
    "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=1920&q=80";

/// Search phrase used for keys with no entry of their own.
pub const DEFAULT_SEARCH_TERM: &str = "weather";

const FALLBACK_URLS: &[(&str, &str)] = &[
    (
        "thunder",
        "https://images.unsplash.com/photo-1605727216801-e27ce1d0cc28?w=1920&q=80",
    ),
    (
        "heavy-rain",
        "https://images.unsplash.com/photo-1519692933481-e162a57d6721?w=1920&q=80",
    ),
    (
        "rain",
        "https://images.unsplash.com/photo-1527482797697-8795b05a13fe?w=1920&q=80",
    ),
    (
        "wind",
        "https://images.unsplash.com/photo-1504608524841-42fe6f032b4b?w=1920&q=80",
    ),
    (
        "sunny",
        "https://images.unsplash.com/photo-1601297183305-6df142704ea2?w=1920&q=80",
    ),
    (
        "cloud",
        "https://images.unsplash.com/photo-1534088568595-a066f410bcda?w=1920&q=80",
    ),
    ("neutral", NEUTRAL_FALLBACK_URL),
];

const SEARCH_TERMS: &[(&str, &str)] = &[
    ("thunder", "thunderstorm lightning"),
    ("heavy-rain", "heavy rain storm"),
    ("rain", "rain drops window"),
    ("wind", "windy trees"),
    ("sunny", "sunny sky"),
    ("cloud", "cloudy sky"),
    ("neutral", "nature landscape"),
];

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Static background for `key`, or the neutral one when the key is unknown.
pub fn fallback_url(key: &str) -> &'static str {
    lookup(FALLBACK_URLS, key).unwrap_or(NEUTRAL_FALLBACK_URL)
}

/// Media-search phrase for `key`, or a generic term when the key is unknown.
pub fn search_term(key: &str) -> &'static str {
    lookup(SEARCH_TERMS, key).unwrap_or(DEFAULT_SEARCH_TERM)
}
