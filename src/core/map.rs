//! Map artifact for butterfly-viz
//!
//! A typed model of the Leaflet map (base tiles, overlay groups, fixed
//! markers, layer control) serialized once into a single HTML document.

use serde::Serialize;

use crate::core::config::MapView;
use crate::core::directions::LatLng;
use crate::core::error::Result;

/// Page skeleton; map data is injected as JSON
const TEMPLATE: &str = include_str!("../../assets/map.html");

/// A base tile layer (radio button in the layer control)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    pub name: String,
    pub url: String,
    pub attribution: String,
    /// Whether the layer is active when the page loads
    pub show: bool,
}

impl TileLayer {
    /// OpenStreetMap standard tiles
    pub fn openstreetmap(name: &str) -> Self {
        Self {
            name: name.to_string(),
            url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".to_string(),
            show: true,
        }
    }

    /// Esri World Imagery satellite tiles
    pub fn esri_world_imagery(name: &str) -> Self {
        Self {
            name: name.to_string(),
            url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}".to_string(),
            attribution: "Esri".to_string(),
            show: false,
        }
    }
}

/// Stroke style of a path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub weight: f64,
    pub opacity: f64,
    /// SVG dash pattern; `None` draws a solid line
    pub dash_array: Option<String>,
}

impl LineStyle {
    pub fn solid(weight: f64, opacity: f64) -> Self {
        Self {
            weight,
            opacity,
            dash_array: None,
        }
    }

    pub fn dashed(weight: f64, opacity: f64, pattern: &str) -> Self {
        Self {
            weight,
            opacity,
            dash_array: Some(pattern.to_string()),
        }
    }
}

/// HTML popup attached to a marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub html: String,
    pub max_width: u32,
}

/// One route drawn as a polyline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathOverlay {
    pub points: Vec<LatLng>,
    pub color: String,
    pub tooltip: String,
    #[serde(flatten)]
    pub style: LineStyle,
}

/// Small circle placed on a maneuver step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleMarker {
    pub location: LatLng,
    pub radius: f64,
    pub color: String,
    pub fill_color: String,
    pub fill_opacity: f64,
    pub popup: Popup,
}

/// Toggleable layer holding one transport mode's paths and step markers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayGroup {
    pub name: String,
    /// Whether the group is checked when the page loads
    pub show: bool,
    pub paths: Vec<PathOverlay>,
    pub markers: Vec<CircleMarker>,
}

impl OverlayGroup {
    pub fn new(name: &str, show: bool) -> Self {
        Self {
            name: name.to_string(),
            show,
            paths: Vec::new(),
            markers: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.markers.is_empty()
    }
}

/// Font Awesome icon rendered inside a colored pin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Icon {
    pub color: String,
    pub icon: String,
    pub prefix: String,
}

impl Icon {
    pub fn font_awesome(color: &str, icon: &str) -> Self {
        Self {
            color: color.to_string(),
            icon: icon.to_string(),
            prefix: "fa".to_string(),
        }
    }
}

/// Fixed pin marker placed directly on the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub location: LatLng,
    pub popup: Popup,
    pub tooltip: String,
    pub icon: Icon,
}

/// Layer visibility control
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerControl {
    /// Leaflet control position, e.g. `topright`
    pub position: String,
    pub collapsed: bool,
}

impl Default for LayerControl {
    fn default() -> Self {
        Self {
            position: "topright".to_string(),
            collapsed: false,
        }
    }
}

/// The complete map, built once per request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapDocument {
    #[serde(skip)]
    pub title: String,
    pub center: LatLng,
    pub zoom: u8,
    pub tile_layers: Vec<TileLayer>,
    pub overlay_groups: Vec<OverlayGroup>,
    pub markers: Vec<Marker>,
    pub layer_control: Option<LayerControl>,
}

impl MapDocument {
    pub fn new(title: &str, view: MapView) -> Self {
        Self {
            title: title.to_string(),
            center: view.center,
            zoom: view.zoom,
            tile_layers: Vec::new(),
            overlay_groups: Vec::new(),
            markers: Vec::new(),
            layer_control: None,
        }
    }

    pub fn add_tile_layer(&mut self, layer: TileLayer) {
        self.tile_layers.push(layer);
    }

    pub fn add_overlay_group(&mut self, group: OverlayGroup) {
        self.overlay_groups.push(group);
    }

    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn set_layer_control(&mut self, control: LayerControl) {
        self.layer_control = Some(control);
    }

    /// Look up an overlay group by its display name
    pub fn overlay_group(&self, name: &str) -> Option<&OverlayGroup> {
        self.overlay_groups.iter().find(|group| group.name == name)
    }

    /// Names listed by the layer control: base layers first, then overlays
    pub fn control_entries(&self) -> Vec<&str> {
        if self.layer_control.is_none() {
            return Vec::new();
        }

        self.tile_layers
            .iter()
            .map(|layer| layer.name.as_str())
            .chain(self.overlay_groups.iter().map(|group| group.name.as_str()))
            .collect()
    }

    /// Map data as embedded in the page
    ///
    /// `<` is escaped so popup markup can never close the surrounding script tag.
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(json.replace('<', "\\u003c"))
    }

    /// Serialize to a self-contained HTML document
    pub fn to_html(&self) -> Result<String> {
        let json = self.to_json()?;
        Ok(TEMPLATE
            .replace("{{TITLE}}", &escape_html(&self.title))
            .replace("{{MAP_DATA}}", &json))
    }
}

/// Escape text for inclusion in HTML content or attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
