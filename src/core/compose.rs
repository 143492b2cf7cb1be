//! Map composition for butterfly-viz
//!
//! Fetches both transport modes, renders them and assembles the final map.

use chrono::Utc;
use log::info;

use crate::core::config::Config;
use crate::core::directions::{DirectionsClient, Route, StaticMapUrl, TravelMode};
use crate::core::error::Result;
use crate::core::map::{Icon, LayerControl, MapDocument, Marker, Popup, TileLayer};
use crate::core::render::{Endpoints, ModeStyle, RouteRenderer};

/// Builds the complete map for the configured trip
#[derive(Debug, Clone)]
pub struct MapComposer {
    config: Config,
    client: DirectionsClient,
    static_maps: StaticMapUrl,
    modes: Vec<ModeStyle>,
}

impl MapComposer {
    /// Create a composer drawing driving then walking routes
    pub fn new(config: Config) -> Result<Self> {
        let client = DirectionsClient::new(config.api_key.clone(), &config.endpoints)?;
        let static_maps = StaticMapUrl::new(&config.endpoints.static_map_url, config.api_key.clone())?;

        Ok(Self {
            config,
            client,
            static_maps,
            modes: vec![ModeStyle::driving(), ModeStyle::walking()],
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch every mode in order and build the map
    ///
    /// Upstream failures only empty the affected mode; this never fails.
    pub async fn compose(&self) -> MapDocument {
        let trip = &self.config.trip;
        info!("📍 From: {}", trip.origin);
        info!("🏁 To: {}", trip.destination);

        let departure_time = Utc::now();
        let mut fetched = Vec::with_capacity(self.modes.len());
        for style in &self.modes {
            let routes = self.client.fetch_routes(trip, style.mode, departure_time).await;
            fetched.push((style.mode, routes));
        }

        let map = self.assemble(&fetched);
        info!("✅ Map generated!");
        map
    }

    /// Build the map from already fetched routes
    ///
    /// A mode missing from `fetched` is treated as having no routes.
    pub fn assemble(&self, fetched: &[(TravelMode, Vec<Route>)]) -> MapDocument {
        let trip = &self.config.trip;
        let title = format!("{} → {}", trip.origin, trip.destination);
        let mut map = MapDocument::new(&title, self.config.view);

        map.add_tile_layer(TileLayer::openstreetmap("🗺️ Plan de Ville (Défaut)"));
        map.add_tile_layer(TileLayer::esri_world_imagery("🛰️ Vue Satellite (Ciel)"));

        let renderer = RouteRenderer::new(&self.static_maps, &self.config.step_filter);
        let mut driving_endpoints = None;

        for style in &self.modes {
            let routes = fetched
                .iter()
                .find(|(mode, _)| *mode == style.mode)
                .map(|(_, routes)| routes.as_slice())
                .unwrap_or_default();

            let rendered = renderer.render(routes, style);
            if style.mode == TravelMode::Driving {
                driving_endpoints = rendered.endpoints;
            }
            map.add_overlay_group(rendered.group);
        }

        // Driving coordinates keep the pins on a drivable road
        if let Some(endpoints) = driving_endpoints {
            for marker in endpoint_markers(&endpoints, &trip.origin, &trip.destination) {
                map.add_marker(marker);
            }
        }

        map.set_layer_control(LayerControl::default());
        map
    }
}

/// Start and end pins at the exact leg coordinates
fn endpoint_markers(endpoints: &Endpoints, origin: &str, destination: &str) -> [Marker; 2] {
    [
        Marker {
            location: endpoints.start,
            popup: Popup {
                html: format!("<b>{}</b><br>Point de Départ", place_label(origin)),
                max_width: 300,
            },
            tooltip: "Départ".to_string(),
            icon: Icon::font_awesome("green", "play"),
        },
        Marker {
            location: endpoints.end,
            popup: Popup {
                html: format!("<b>{}</b><br>Terminus", place_label(destination)),
                max_width: 300,
            },
            tooltip: "Arrivée".to_string(),
            icon: Icon::font_awesome("darkred", "flag"),
        },
    ]
}

/// Upper-cased first segment of an address, e.g. `GARE CENTRALE`
fn place_label(address: &str) -> String {
    let name = address.split(',').next().unwrap_or(address).trim();
    crate::core::map::escape_html(&name.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::directions::{EncodedPolyline, LatLng, Leg, Step, TextValue};

    fn route(start: LatLng, end: LatLng) -> Route {
        Route {
            summary: "Boulevard du 30 Juin".to_string(),
            legs: vec![Leg {
                start_location: start,
                end_location: end,
                start_address: String::new(),
                end_address: String::new(),
                distance: TextValue::default(),
                duration: TextValue {
                    text: "9 min".to_string(),
                    value: 540,
                },
                steps: vec![Step {
                    html_instructions: "Prendre la direction nord".to_string(),
                    distance: TextValue::default(),
                    duration: TextValue::default(),
                    start_location: start,
                    end_location: end,
                    maneuver: None,
                }],
            }],
            overview_polyline: EncodedPolyline {
                points: "_p~iF~ps|U".to_string(),
            },
        }
    }

    fn composer() -> MapComposer {
        MapComposer::new(Config::new("test-key")).unwrap()
    }

    const CAR_START: LatLng = LatLng { lat: -4.33012, lng: 15.31021 };
    const CAR_END: LatLng = LatLng { lat: -4.30121, lng: 15.31254 };
    const WALK_START: LatLng = LatLng { lat: -4.33, lng: 15.31 };
    const WALK_END: LatLng = LatLng { lat: -4.30, lng: 15.31 };

    #[test]
    fn test_assemble_driving_two_walking_none() {
        let composer = composer();
        let fetched = vec![
            (TravelMode::Driving, vec![route(CAR_START, CAR_END), route(WALK_START, WALK_END)]),
            (TravelMode::Walking, Vec::new()),
        ];
        let map = composer.assemble(&fetched);

        let driving = map.overlay_group("🚗 Trajets Voiture").unwrap();
        let walking = map.overlay_group("🚶 Trajets Piéton").unwrap();
        assert_eq!(driving.paths.len(), 2);
        assert!(walking.is_empty());

        assert_eq!(map.markers.len(), 2);
        assert_eq!(map.markers[0].location, CAR_START);
        assert_eq!(map.markers[1].location, CAR_END);

        let entries = map.control_entries();
        assert!(entries.contains(&"🚗 Trajets Voiture"));
        assert!(entries.contains(&"🚶 Trajets Piéton"));
    }

    #[test]
    fn test_assemble_uses_driving_endpoints_not_walking() {
        let composer = composer();
        let fetched = vec![
            (TravelMode::Walking, vec![route(WALK_START, WALK_END)]),
            (TravelMode::Driving, vec![route(CAR_START, CAR_END)]),
        ];
        let map = composer.assemble(&fetched);

        assert_eq!(map.markers[0].location, CAR_START);
        assert_eq!(map.markers[1].location, CAR_END);
    }

    #[test]
    fn test_assemble_no_driving_means_no_fixed_markers() {
        let composer = composer();
        let fetched = vec![
            (TravelMode::Driving, Vec::new()),
            (TravelMode::Walking, vec![route(WALK_START, WALK_END)]),
        ];
        let map = composer.assemble(&fetched);

        assert!(map.markers.is_empty());
        assert_eq!(map.overlay_group("🚶 Trajets Piéton").unwrap().paths.len(), 1);
    }

    #[test]
    fn test_assemble_nothing_fetched() {
        let map = composer().assemble(&[]);

        assert_eq!(map.tile_layers.len(), 2);
        assert!(map.overlay_groups.iter().all(|group| group.is_empty()));
        assert!(map.markers.is_empty());
        assert!(map.layer_control.is_some());
        assert!(map.to_html().is_ok());
    }

    #[test]
    fn test_assemble_base_layers_and_view() {
        let map = composer().assemble(&[]);

        assert_eq!(map.tile_layers[0].name, "🗺️ Plan de Ville (Défaut)");
        assert!(map.tile_layers[0].show);
        assert_eq!(map.tile_layers[1].name, "🛰️ Vue Satellite (Ciel)");
        assert!(!map.tile_layers[1].show);
        assert_eq!(map.center, LatLng { lat: -4.325, lng: 15.322 });
        assert_eq!(map.zoom, 13);
        assert_eq!(map.title, "Rond Point Victoire, Kinshasa → Gare Centrale, Kinshasa");
    }

    #[test]
    fn test_endpoint_marker_details() {
        let endpoints = Endpoints {
            start: CAR_START,
            end: CAR_END,
        };
        let [start, end] = endpoint_markers(
            &endpoints,
            "Rond Point Victoire, Kinshasa",
            "Gare Centrale, Kinshasa",
        );

        assert_eq!(start.popup.html, "<b>ROND POINT VICTOIRE</b><br>Point de Départ");
        assert_eq!(start.tooltip, "Départ");
        assert_eq!(start.icon, Icon::font_awesome("green", "play"));
        assert_eq!(end.popup.html, "<b>GARE CENTRALE</b><br>Terminus");
        assert_eq!(end.tooltip, "Arrivée");
        assert_eq!(end.icon.color, "darkred");
        assert_eq!(end.icon.icon, "flag");
    }

    #[test]
    fn test_place_label() {
        assert_eq!(place_label("Gare Centrale, Kinshasa"), "GARE CENTRALE");
        assert_eq!(place_label("Matonge"), "MATONGE");
        assert_eq!(place_label("A & B, Kinshasa"), "A &amp; B");
    }
}
