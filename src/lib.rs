//! # Butterfly-viz Library
//!
//! Fetches driving and walking route alternatives between two places from the
//! Google Directions API and renders them as an interactive Leaflet map.
//!
//! ## Features
//!
//! - **Alternatives per mode**: every route the service offers, one color each
//! - **Layered map**: street and satellite base layers, one toggleable group per mode
//! - **Rich popups**: satellite thumbnail, instruction, distance and duration per step
//! - **Fault tolerant**: a failing mode is logged and left empty, the map still renders
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads GOOGLE_API_KEY from the environment
//!     let html = butterfly_viz::render_html().await?;
//!     std::fs::write("trajet.html", html)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Custom Trip
//!
//! ```rust,no_run
//! use butterfly_viz::{Config, MapComposer};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::from_env()?;
//! config.trip.origin = "Place de la Gare, Kinshasa".to_string();
//! config.trip.destination = "Stade des Martyrs, Kinshasa".to_string();
//!
//! let composer = MapComposer::new(config)?;
//! let map = composer.compose().await;
//! println!("{} overlay groups", map.overlay_groups.len());
//! # Ok(())
//! # }
//! ```

pub use crate::core::config::{ApiEndpoints, MapView, Trip};
pub use crate::core::directions::{DirectionsClient, DirectionsRequest, LatLng, Route, Step, TravelMode};
pub use crate::core::error::{Error, Result};
pub use crate::core::map::MapDocument;
pub use crate::core::polyline::decode_polyline;
pub use crate::core::render::{ModeStyle, Palette, StepFilter};
pub use crate::core::{Config, MapComposer};

pub mod core;
pub mod server;

/// Compose the map for the default trip and return it as HTML
///
/// The credential is read from `GOOGLE_API_KEY`; its absence is the only error
/// besides client construction.
pub async fn render_html() -> Result<String> {
    let composer = MapComposer::new(Config::from_env()?)?;
    composer.compose().await.to_html()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_defaults() {
        let config = Config::new("k");
        assert_eq!(config.trip.origin, "Rond Point Victoire, Kinshasa");
        assert_eq!(config.trip.destination, "Gare Centrale, Kinshasa");
        assert_eq!(config.trip.language, "fr");
        assert_eq!(config.step_filter, StepFilter::default());
    }
}
