//! Candidate marker layout.
//!
//! Each district with candidates gets a near-square grid of small squares
//! centered on its centroid, one cell per candidate, filled row-major from
//! the north-west corner. Coordinates are plain degrees added on a flat
//! plane; squares are small enough that curvature does not matter.

use geo::{LineString, Point, Polygon};
use geojson::{Feature, FeatureCollection, JsonObject, JsonValue};

use crate::data::{CandidateIndex, District};
use crate::party::PartyColors;

/// Edge length as a function of zoom, clamped to `[min_size, max_size]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomSizing {
    /// Edge length at or below `threshold`.
    pub max_size: f64,
    /// Edge length at or beyond `threshold + range`.
    pub min_size: f64,
    pub threshold: f64,
    pub range: f64,
}

impl Default for ZoomSizing {
    fn default() -> Self {
        Self { max_size: 0.08, min_size: 0.005, threshold: 5.0, range: 7.0 }
    }
}

impl ZoomSizing {
    pub fn spacing(&self, zoom: f64) -> f64 {
        if zoom <= self.threshold {
            return self.max_size;
        }
        if self.range <= 0.0 || zoom >= self.threshold + self.range {
            return self.min_size;
        }
        let t = (zoom - self.threshold) / self.range;
        self.max_size + (self.min_size - self.max_size) * t
    }
}

/// How big each candidate square is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sizing {
    Zoom(ZoomSizing),
    /// Fraction of the shorter side of the district's bounding box.
    Proportional { fraction: f64 },
}

impl Default for Sizing {
    fn default() -> Self {
        Sizing::Zoom(ZoomSizing::default())
    }
}

impl Sizing {
    pub fn spacing(&self, district: &District, zoom: f64) -> f64 {
        match self {
            Sizing::Zoom(z) => z.spacing(zoom),
            Sizing::Proportional { fraction } => {
                fraction * district.bbox.width().min(district.bbox.height())
            }
        }
    }
}

/// Column/row counts for `count` cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub cols: usize,
    pub rows: usize,
}

impl Grid {
    pub fn for_count(count: usize) -> Self {
        if count == 0 {
            return Self { cols: 0, rows: 0 };
        }
        let cols = (count as f64).sqrt().ceil() as usize;
        Self { cols, rows: count.div_ceil(cols) }
    }

    /// `(col, row)` for the `i`-th cell, row-major.
    pub fn cell(&self, i: usize) -> (usize, usize) {
        (i % self.cols, i / self.cols)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub district: String,
    pub candidate: String,
    pub party: String,
    pub color: String,
    pub square: Polygon<f64>,
}

impl Marker {
    /// North-west corner and edge length of the square.
    pub fn origin_and_size(&self) -> (Point<f64>, f64) {
        let ring = &self.square.exterior().0;
        let nw = ring[0];
        let size = ring[1].x - nw.x;
        (nw.into(), size)
    }

    fn to_feature(&self) -> Feature {
        let mut props = JsonObject::new();
        props.insert("kuname".to_string(), JsonValue::from(self.district.as_str()));
        props.insert("candidate_name".to_string(), JsonValue::from(self.candidate.as_str()));
        props.insert("party".to_string(), JsonValue::from(self.party.as_str()));
        props.insert("color".to_string(), JsonValue::from(self.color.as_str()));
        Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(&self.square))),
            id: None,
            properties: Some(props),
            foreign_members: None,
        }
    }
}

/// Every marker for one zoom level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarkerCollection {
    pub zoom: f64,
    pub markers: Vec<Marker>,
}

impl MarkerCollection {
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn for_district<'a>(&'a self, district: &'a str) -> impl Iterator<Item = &'a Marker> + 'a {
        self.markers.iter().filter(move |m| m.district == district)
    }

    pub fn to_feature_collection(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.markers.iter().map(Marker::to_feature).collect(),
            foreign_members: None,
        }
    }
}

/// Axis-aligned square with north-west corner `(x, y)`.
fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
    Polygon::new(
        LineString::from(vec![
            (x, y),
            (x + size, y),
            (x + size, y - size),
            (x, y - size),
            (x, y),
        ]),
        vec![],
    )
}

/// Lays out one square per candidate for every district that has any.
///
/// Districts come out in input order, candidates in index order. Candidates
/// whose district is not in `districts` produce nothing.
pub fn generate(
    districts: &[District],
    candidates: &CandidateIndex,
    zoom: f64,
    sizing: &Sizing,
    colors: &PartyColors,
) -> MarkerCollection {
    let mut markers = Vec::with_capacity(candidates.total());

    for district in districts {
        let list = candidates.get(&district.name);
        if list.is_empty() {
            continue;
        }

        let spacing = sizing.spacing(district, zoom);
        let grid = Grid::for_count(list.len());
        let start_x = district.centroid.x() - grid.cols as f64 * spacing / 2.0;
        let start_y = district.centroid.y() + grid.rows as f64 * spacing / 2.0;

        for (i, candidate) in list.iter().enumerate() {
            let (col, row) = grid.cell(i);
            let x = start_x + col as f64 * spacing;
            let y = start_y - row as f64 * spacing;
            markers.push(Marker {
                district: district.name.clone(),
                candidate: candidate.name.clone(),
                party: candidate.party.clone(),
                color: colors.resolve(&candidate.party).to_string(),
                square: square(x, y, spacing),
            });
        }
    }

    tracing::debug!(zoom, markers = markers.len(), "generated candidate markers");
    MarkerCollection { zoom, markers }
}
