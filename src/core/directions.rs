//! Directions service client for butterfly-viz
//!
//! Fetches route alternatives per transport mode and builds the static
//! satellite thumbnail URLs used in step popups.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{info, warn};
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::config::{ApiEndpoints, Trip};
use crate::core::error::{Error, Result};

/// A WGS84 coordinate as returned by the directions service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Transport modes drawn on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Driving,
    Walking,
}

impl TravelMode {
    /// Value of the `mode` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human readable text paired with its numeric value (meters or seconds)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TextValue {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub value: u64,
}

/// Encoded overview geometry of a route
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EncodedPolyline {
    #[serde(default)]
    pub points: String,
}

/// One maneuver within a leg
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    /// Instruction as provider HTML (may contain `<b>` and `<div>` markup)
    #[serde(default)]
    pub html_instructions: String,
    #[serde(default)]
    pub distance: TextValue,
    #[serde(default)]
    pub duration: TextValue,
    pub start_location: LatLng,
    pub end_location: LatLng,
    #[serde(default)]
    pub maneuver: Option<String>,
}

/// The part of a route between origin and destination
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Leg {
    pub start_location: LatLng,
    pub end_location: LatLng,
    #[serde(default)]
    pub start_address: String,
    #[serde(default)]
    pub end_address: String,
    #[serde(default)]
    pub distance: TextValue,
    #[serde(default)]
    pub duration: TextValue,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One route alternative for a transport mode
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub legs: Vec<Leg>,
    #[serde(default)]
    pub overview_polyline: EncodedPolyline,
}

impl Route {
    /// The first (and, without waypoints, only) leg
    pub fn first_leg(&self) -> Option<&Leg> {
        self.legs.first()
    }

    /// Total distance in meters over all legs
    pub fn distance_m(&self) -> u64 {
        self.legs.iter().map(|leg| leg.distance.value).sum()
    }

    /// Total duration in seconds over all legs
    pub fn duration_s(&self) -> u64 {
        self.legs.iter().map(|leg| leg.duration.value).sum()
    }
}

/// Top-level body of a directions response
#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

/// Parameters of a single directions lookup
#[derive(Debug, Clone)]
pub struct DirectionsRequest<'a> {
    pub origin: &'a str,
    pub destination: &'a str,
    pub mode: TravelMode,
    pub alternatives: bool,
    pub language: &'a str,
    /// Departure time, used by the service for traffic-aware driving estimates
    pub departure_time: DateTime<Utc>,
}

/// Client for the directions service, carrying its own credential
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    http: Client,
    api_key: String,
    directions_url: String,
}

impl DirectionsClient {
    /// Create a client for the given credential and endpoints
    pub fn new(api_key: impl Into<String>, endpoints: &ApiEndpoints) -> Result<Self> {
        let http = ClientBuilder::new()
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("butterfly-viz/{}", env!("BUTTERFLY_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            directions_url: endpoints.directions_url.clone(),
        })
    }

    /// Look up routes for one request
    ///
    /// `ZERO_RESULTS` and `NOT_FOUND` are an empty result rather than an error.
    pub async fn directions(&self, request: &DirectionsRequest<'_>) -> Result<Vec<Route>> {
        let query = [
            ("origin", request.origin.to_string()),
            ("destination", request.destination.to_string()),
            ("mode", request.mode.as_str().to_string()),
            ("alternatives", request.alternatives.to_string()),
            ("language", request.language.to_string()),
            ("departure_time", request.departure_time.timestamp().to_string()),
            ("key", self.api_key.clone()),
        ];

        let response = self
            .http
            .get(&self.directions_url)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!(
                "Directions request for {} failed: {status}",
                request.mode
            )));
        }

        let body: DirectionsResponse = response.json().await?;
        match body.status.as_str() {
            "OK" => Ok(body.routes),
            "ZERO_RESULTS" | "NOT_FOUND" => Ok(Vec::new()),
            _ => Err(Error::ApiError {
                status: body.status,
                message: body.error_message,
            }),
        }
    }

    /// Fetch route alternatives for a mode, never failing
    ///
    /// Any error, or an empty answer, is logged and yields no routes so the
    /// caller can skip the mode.
    pub async fn fetch_routes(
        &self,
        trip: &Trip,
        mode: TravelMode,
        departure_time: DateTime<Utc>,
    ) -> Vec<Route> {
        info!("⚡ Computing routes for {}...", mode.as_str().to_uppercase());

        let request = DirectionsRequest {
            origin: &trip.origin,
            destination: &trip.destination,
            mode,
            alternatives: true,
            language: &trip.language,
            departure_time,
        };

        match self.directions(&request).await {
            Ok(routes) if routes.is_empty() => {
                warn!("⚠️  No route found for {mode}.");
                routes
            }
            Ok(routes) => {
                info!("✅ {} route(s) found for {mode}", routes.len());
                routes
            }
            Err(e) => {
                warn!("⚠️  Directions API error ({mode}): {e}");
                Vec::new()
            }
        }
    }
}

/// Builder for satellite thumbnail URLs centered on a coordinate
#[derive(Debug, Clone)]
pub struct StaticMapUrl {
    base: Url,
    api_key: String,
}

impl StaticMapUrl {
    pub fn new(base: &str, api_key: impl Into<String>) -> Result<Self> {
        let base = Url::parse(base)
            .map_err(|e| Error::InvalidInput(format!("static map URL '{base}': {e}")))?;

        Ok(Self {
            base,
            api_key: api_key.into(),
        })
    }

    /// Hybrid imagery at street zoom with a red marker on the coordinate
    pub fn satellite(&self, at: LatLng) -> String {
        let center = format!("{},{}", at.lat, at.lng);
        let marker = format!("color:red|{center}");

        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("center", &center)
            .append_pair("zoom", "18")
            .append_pair("size", "350x200")
            .append_pair("maptype", "hybrid")
            .append_pair("markers", &marker)
            .append_pair("scale", "2")
            .append_pair("key", &self.api_key);

        url.to_string()
    }
}
