//! Display labels: country code names and camera model aliases.

use std::collections::BTreeMap;

/// Lookup tables injected into the gallery and the admin commands.
#[derive(Debug, Clone, Default)]
pub struct Labels {
    countries: BTreeMap<String, String>,
    cameras: BTreeMap<String, String>,
}

impl Labels {
    pub fn new(countries: BTreeMap<String, String>, cameras: BTreeMap<String, String>) -> Self {
        Self { countries, cameras }
    }

    /// Display name for a country code, or the code itself when unmapped.
    pub fn country_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.countries.get(code).map(String::as_str).unwrap_or(code)
    }

    /// Canonical name for a camera model, or the model itself when unmapped.
    pub fn camera_name<'a>(&'a self, model: &'a str) -> &'a str {
        self.cameras.get(model).map(String::as_str).unwrap_or(model)
    }
}

pub fn default_countries() -> BTreeMap<String, String> {
    [
        ("at", "Austria"),
        ("be", "Belgium"),
        ("ch", "Switzerland"),
        ("de", "Germany"),
        ("dk", "Denmark"),
        ("ee", "Estonia"),
        ("fi", "Finland"),
        ("fr", "France"),
        ("jp", "Japan"),
        ("li", "Liechtenstein"),
        ("lu", "Luxembourg"),
        ("nl", "Netherlands"),
        ("se", "Sweden"),
        ("unknown", "-"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub fn default_cameras() -> BTreeMap<String, String> {
    [
        ("DMC-GF1", "Panasonic DMC-GF1"),
        ("FinePix F50fd", "Fuji FinePix F50fd"),
        ("iPhone 4", "Apple iPhone 4"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
