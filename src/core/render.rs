//! Route rendering for butterfly-viz
//!
//! Turns the route alternatives of one transport mode into an overlay group:
//! one colored path per route plus popup markers on the salient steps.

use log::{debug, warn};

use crate::core::directions::{LatLng, Route, Step, StaticMapUrl, TravelMode};
use crate::core::error::{Error, Result};
use crate::core::map::{escape_html, CircleMarker, LineStyle, OverlayGroup, PathOverlay, Popup};
use crate::core::polyline::decode_polyline;

/// Maximum popup width in pixels
const POPUP_MAX_WIDTH: u32 = 350;

/// Ordered, non-empty list of route colors
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    pub fn new<I, S>(colors: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let colors: Vec<String> = colors.into_iter().map(Into::into).collect();
        if colors.is_empty() {
            return Err(Error::InvalidInput("palette must contain at least one color".to_string()));
        }
        Ok(Self { colors })
    }

    /// Color of the route at `index`, cycling through the palette
    pub fn color(&self, index: usize) -> &str {
        &self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// How one transport mode is drawn
#[derive(Debug, Clone, PartialEq)]
pub struct ModeStyle {
    pub mode: TravelMode,
    pub palette: Palette,
    /// Emoji prefixed to tooltips and popup titles
    pub icon: String,
    /// Overlay group name shown in the layer control
    pub group_name: String,
    pub show_by_default: bool,
    pub line: LineStyle,
}

impl ModeStyle {
    /// Solid red, dark blue and purple lines, shown by default
    pub fn driving() -> Self {
        Self {
            mode: TravelMode::Driving,
            palette: Palette {
                colors: vec!["#e74c3c".to_string(), "#2980b9".to_string(), "#8e44ad".to_string()],
            },
            icon: "🚗".to_string(),
            group_name: "🚗 Trajets Voiture".to_string(),
            show_by_default: true,
            line: LineStyle::solid(5.0, 0.8),
        }
    }

    /// Dashed green, orange and turquoise lines, hidden by default
    pub fn walking() -> Self {
        Self {
            mode: TravelMode::Walking,
            palette: Palette {
                colors: vec!["#27ae60".to_string(), "#d35400".to_string(), "#1abc9c".to_string()],
            },
            icon: "🚶".to_string(),
            group_name: "🚶 Trajets Piéton".to_string(),
            show_by_default: false,
            line: LineStyle::dashed(4.0, 0.8, "5, 10"),
        }
    }
}

/// Decides which steps get a marker
///
/// The first step always does; any other step only when its instruction
/// contains one of the keywords (case-sensitive substring match).
#[derive(Debug, Clone, PartialEq)]
pub struct StepFilter {
    pub keywords: Vec<String>,
}

impl Default for StepFilter {
    fn default() -> Self {
        Self {
            keywords: vec!["Turn".to_string(), "Tournez".to_string(), "Prendre".to_string()],
        }
    }
}

impl StepFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    pub fn includes(&self, index: usize, instruction: &str) -> bool {
        index == 0 || self.keywords.iter().any(|keyword| instruction.contains(keyword.as_str()))
    }
}

/// Precise start and end of a route's leg
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Endpoints {
    pub start: LatLng,
    pub end: LatLng,
}

/// Output of rendering one mode
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMode {
    pub group: OverlayGroup,
    /// Endpoints of the first route, if any route was returned.
    /// `None` when route 0 has no legs, even if later routes were drawn.
    pub endpoints: Option<Endpoints>,
}

/// Renders route alternatives into overlay groups
#[derive(Debug, Clone)]
pub struct RouteRenderer<'a> {
    static_maps: &'a StaticMapUrl,
    step_filter: &'a StepFilter,
}

impl<'a> RouteRenderer<'a> {
    pub fn new(static_maps: &'a StaticMapUrl, step_filter: &'a StepFilter) -> Self {
        Self {
            static_maps,
            step_filter,
        }
    }

    /// Draw every route of a mode, in API order
    pub fn render(&self, routes: &[Route], style: &ModeStyle) -> RenderedMode {
        let mut group = OverlayGroup::new(&style.group_name, style.show_by_default);
        let mut endpoints = None;

        for (idx, route) in routes.iter().enumerate() {
            let color = style.palette.color(idx);

            let Some(leg) = route.first_leg() else {
                warn!("⚠️  Route {} for {} has no legs, skipping", idx + 1, style.mode);
                continue;
            };

            if idx == 0 {
                endpoints = Some(Endpoints {
                    start: leg.start_location,
                    end: leg.end_location,
                });
            }

            let summary = route_label(route, idx);
            debug!(
                "{} route {}: {} ({} m, {} s)",
                style.mode,
                idx + 1,
                summary,
                route.distance_m(),
                route.duration_s()
            );

            match decode_polyline(&route.overview_polyline.points) {
                Ok(points) => group.paths.push(PathOverlay {
                    points,
                    color: color.to_string(),
                    tooltip: format!(
                        "{} {} ({})",
                        style.icon,
                        escape_html(&summary),
                        escape_html(&leg.duration.text)
                    ),
                    style: style.line.clone(),
                }),
                Err(e) => {
                    warn!("⚠️  Route {} for {}: {e}, path not drawn", idx + 1, style.mode);
                }
            }

            for (i, step) in leg.steps.iter().enumerate() {
                if !self.step_filter.includes(i, &step.html_instructions) {
                    continue;
                }

                let title = format!("{} {} - Étape {}", style.icon, summary, i + 1);
                group.markers.push(CircleMarker {
                    location: step.end_location,
                    radius: 4.0,
                    color: color.to_string(),
                    fill_color: "white".to_string(),
                    fill_opacity: 1.0,
                    popup: Popup {
                        html: self.step_popup(&title, step, color),
                        max_width: POPUP_MAX_WIDTH,
                    },
                });
            }
        }

        debug!(
            "{}: {} path(s), {} step marker(s)",
            style.mode,
            group.paths.len(),
            group.markers.len()
        );

        RenderedMode { group, endpoints }
    }

    fn step_popup(&self, title: &str, step: &Step, color: &str) -> String {
        let image_url = self.static_maps.satellite(step.end_location);
        popup_html(
            title,
            &step.html_instructions,
            &step.distance.text,
            &step.duration.text,
            &image_url,
            color,
        )
    }
}

/// Summary of a route, or a numbered fallback when the service gave none
fn route_label(route: &Route, idx: usize) -> String {
    if route.summary.trim().is_empty() {
        format!("Itinéraire {}", idx + 1)
    } else {
        route.summary.clone()
    }
}

/// Card-style popup: colored header, satellite thumbnail, instruction, metrics
///
/// `instruction` is provider HTML and is embedded as markup.
pub fn popup_html(
    title: &str,
    instruction: &str,
    distance: &str,
    duration: &str,
    image_url: &str,
    header_color: &str,
) -> String {
    format!(
        r#"<div style="font-family: 'Segoe UI', sans-serif; width: 320px; border-radius: 8px; overflow: hidden; box-shadow: 0 2px 5px rgba(0,0,0,0.3);">
    <div style="background-color: {color}; color: white; padding: 8px 12px;">
        <h5 style="margin:0; font-size:14px;">{title}</h5>
    </div>
    <div style="background: #000;">
        <img src="{image}" style="width: 100%; height: 150px; object-fit: cover; opacity: 0.9;">
    </div>
    <div style="padding: 10px; background: #fff; font-size: 13px; color: #333;">
        <div style="margin-bottom: 8px;"><b>Action :</b> {instruction}</div>
        <div style="display: flex; justify-content: space-between; border-top: 1px solid #eee; padding-top: 5px; color: #666;">
            <span>📏 {distance}</span>
            <span>⏱️ {duration}</span>
        </div>
    </div>
</div>"#,
        color = escape_html(header_color),
        title = escape_html(title),
        image = escape_html(image_url),
        instruction = instruction,
        distance = escape_html(distance),
        duration = escape_html(duration),
    )
}
