//! Configuration for butterfly-viz
//!
//! Reads the API credential from the environment and holds the trip, the
//! upstream endpoints and the initial map view.

use crate::core::directions::LatLng;
use crate::core::error::{Error, Result};
use crate::core::render::StepFilter;

/// Environment variable holding the Google Maps Platform key
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Default trip origin
pub const DEFAULT_ORIGIN: &str = "Rond Point Victoire, Kinshasa";

/// Default trip destination
pub const DEFAULT_DESTINATION: &str = "Gare Centrale, Kinshasa";

/// Default language for instructions and summaries
pub const DEFAULT_LANGUAGE: &str = "fr";

/// Upstream service endpoints
#[derive(Debug, Clone, PartialEq)]
pub struct ApiEndpoints {
    /// Directions JSON endpoint
    pub directions_url: String,

    /// Static map image endpoint used for popup thumbnails
    pub static_map_url: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            directions_url: "https://maps.googleapis.com/maps/api/directions/json".to_string(),
            static_map_url: "https://maps.googleapis.com/maps/api/staticmap".to_string(),
        }
    }
}

/// The two fixed points the map is drawn between
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub origin: String,
    pub destination: String,
    /// Language passed to the directions service
    pub language: String,
}

impl Default for Trip {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            destination: DEFAULT_DESTINATION.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Initial center and zoom of the rendered map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        // Kinshasa city center
        Self {
            center: LatLng { lat: -4.325, lng: 15.322 },
            zoom: 13,
        }
    }
}

/// Complete runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API credential, passed explicitly to every client that needs it
    pub api_key: String,
    pub trip: Trip,
    pub endpoints: ApiEndpoints,
    pub view: MapView,
    pub step_filter: StepFilter,
}

impl Config {
    /// Create a configuration with defaults around the given credential
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            trip: Trip::default(),
            endpoints: ApiEndpoints::default(),
            view: MapView::default(),
            step_filter: StepFilter::default(),
        }
    }

    /// Load the configuration from the process environment
    ///
    /// Fails with [`Error::MissingCredential`] when `GOOGLE_API_KEY` is unset or blank.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::MissingCredential(API_KEY_VAR.to_string()))?;

        Ok(Self::new(api_key))
    }
}
