use geo::{Area, Coord, MultiPolygon, Point, Polygon};
use ratatui::layout::Rect as TuiRect;
use ratatui::symbols;
use ratatui::widgets::canvas::{Canvas, Context, Line, Points, Rectangle};
use ratatui::widgets::{Block, Borders};
use ratatui::{Frame, style::Color};

use crate::config::ViewConfig;
use crate::data::District;
use crate::layout::MarkerCollection;
use crate::party::terminal_color;
use crate::session::MapSurface;

/// Islets smaller than this share of a district's largest part are not drawn.
const FRAGMENT_RATIO: f64 = 0.05;

/// Every district is labeled from this zoom on; below it only the selected one.
pub const LABEL_ZOOM: f64 = 8.0;

/// Drops tiny outlying parts; only affects drawing, never the layout.
fn drawable_parts(mp: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    if mp.0.len() <= 1 {
        return mp.clone();
    }
    let max_area = mp.0.iter().map(|p| p.unsigned_area()).fold(0.0, f64::max);
    let kept: Vec<Polygon<f64>> = mp
        .0
        .iter()
        .filter(|p| p.unsigned_area() >= max_area * FRAGMENT_RATIO)
        .cloned()
        .collect();
    MultiPolygon(kept)
}

/// Like `f64::clamp` but never panics on inverted or NaN bounds.
fn clamp_zoom(zoom: f64, min: f64, max: f64) -> f64 {
    zoom.min(max).max(min)
}

struct Outline {
    name: String,
    parts: MultiPolygon<f64>,
    anchor: Point<f64>,
}

/// Equirectangular viewport over district outlines and the marker layer.
pub struct MapView {
    outlines: Vec<Outline>,
    markers: MarkerCollection,
    center: Coord<f64>,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    zoom_step: f64,
}

impl MapView {
    pub fn new(districts: &[District], view: &ViewConfig) -> Self {
        let outlines = districts
            .iter()
            .map(|d| Outline {
                name: d.name.clone(),
                parts: drawable_parts(&d.geometry),
                anchor: d.centroid,
            })
            .collect();
        Self {
            outlines,
            markers: MarkerCollection::default(),
            center: Coord { x: view.center[0], y: view.center[1] },
            zoom: clamp_zoom(view.zoom, view.min_zoom, view.max_zoom),
            min_zoom: view.min_zoom,
            max_zoom: view.max_zoom,
            zoom_step: view.zoom_step,
        }
    }

    pub fn feature_count(&self) -> usize {
        self.outlines.len()
    }

    pub fn markers(&self) -> &MarkerCollection {
        &self.markers
    }

    pub fn center(&self) -> Coord<f64> {
        self.center
    }

    /// Returns false when already at the zoom limit.
    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.zoom + self.zoom_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(self.zoom - self.zoom_step)
    }

    fn set_zoom(&mut self, zoom: f64) -> bool {
        let zoom = clamp_zoom(zoom, self.min_zoom, self.max_zoom);
        let changed = zoom != self.zoom;
        self.zoom = zoom;
        changed
    }

    /// Names to print with their anchors, given the current zoom and selection.
    pub fn labels<'a>(&'a self, highlight: Option<&'a str>) -> impl Iterator<Item = (&'a str, Point<f64>)> + 'a {
        let all = self.zoom >= LABEL_ZOOM;
        self.outlines
            .iter()
            .filter(move |o| all || Some(o.name.as_str()) == highlight)
            .map(|o| (o.name.as_str(), o.anchor))
    }

    /// Half of the visible longitude span.
    pub fn half_width(&self) -> f64 {
        180.0 / 2f64.powf(self.zoom)
    }

    /// Moves the center by a fraction of the visible half-width.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let step = self.half_width();
        self.center.x += dx * step;
        self.center.y = (self.center.y + dy * step).clamp(-90.0, 90.0);
    }

    pub fn center_on(&mut self, point: Point<f64>) {
        self.center = point.into();
    }

    /// Canvas bounds for `area`; terminal cells are about twice as tall as wide.
    pub fn bounds(&self, area: TuiRect) -> ([f64; 2], [f64; 2]) {
        let hx = self.half_width();
        let cols = f64::from(area.width.max(1));
        let rows = f64::from(area.height.max(1));
        let hy = hx * 2.0 * rows / cols;
        (
            [self.center.x - hx, self.center.x + hx],
            [self.center.y - hy, self.center.y + hy],
        )
    }

    fn draw_outline(ctx: &mut Context, mp: &MultiPolygon<f64>, color: Color) {
        for poly in &mp.0 {
            for window in poly.exterior().0.windows(2) {
                let a = window[0];
                let b = window[1];
                ctx.draw(&Line { x1: a.x, y1: a.y, x2: b.x, y2: b.y, color });
            }
        }
    }

    /// Outlines first, then the selected district in red, then markers on top.
    pub fn render(&self, f: &mut Frame, area: TuiRect, title: &str, highlight: Option<&str>) {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let (x_bounds, y_bounds) = self.bounds(inner);

        let canvas = Canvas::default()
            .block(Block::default().title(title.to_string()).borders(Borders::ALL))
            .marker(symbols::Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                for o in &self.outlines {
                    Self::draw_outline(ctx, &o.parts, Color::White);
                }

                if let Some(sel) = highlight {
                    for o in self.outlines.iter().filter(|o| o.name == sel) {
                        Self::draw_outline(ctx, &o.parts, Color::Red);
                    }
                }

                for (name, anchor) in self.labels(highlight) {
                    ctx.print(anchor.x(), anchor.y(), name.to_string());
                }

                ctx.layer();
                for marker in &self.markers.markers {
                    let (nw, size) = marker.origin_and_size();
                    let color = terminal_color(&marker.color);
                    ctx.draw(&Rectangle {
                        x: nw.x(),
                        y: nw.y() - size,
                        width: size,
                        height: size,
                        color,
                    });
                    // Squares can be smaller than a braille dot when zoomed out.
                    ctx.draw(&Points {
                        coords: &[(nw.x() + size / 2.0, nw.y() - size / 2.0)],
                        color,
                    });
                }
            });
        f.render_widget(canvas, area);
    }
}

impl MapSurface for MapView {
    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn replace_markers(&mut self, markers: MarkerCollection) {
        self.markers = markers;
    }
}
