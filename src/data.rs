use std::{
    collections::HashMap,
    fs::{self, File},
    io::Read,
    path::Path,
    str::FromStr,
};

use csv::ReaderBuilder;
use geo::{BoundingRect, Centroid, Geometry, MultiPolygon, Point, Rect};
use geojson::{FeatureCollection, GeoJson};

use crate::error::DataError;

/// Electoral district polygon with its derived anchor and extent.
#[derive(Clone, Debug, PartialEq)]
pub struct District {
    pub name: String,
    pub geometry: MultiPolygon<f64>,
    pub centroid: Point<f64>,
    pub bbox: Rect<f64>,
}

impl District {
    /// `None` when the geometry is empty and has no centroid or extent.
    pub fn new(name: impl Into<String>, geometry: MultiPolygon<f64>) -> Option<Self> {
        let centroid = geometry.centroid()?;
        let bbox = geometry.bounding_rect()?;
        Some(Self { name: name.into(), geometry, centroid, bbox })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub party: String,
    pub district: String,
}

/// Candidates grouped by district name, file order kept within each group.
#[derive(Clone, Debug, Default)]
pub struct CandidateIndex {
    by_district: HashMap<String, Vec<Candidate>>,
}

impl CandidateIndex {
    pub fn get(&self, district: &str) -> &[Candidate] {
        self.by_district.get(district).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total(&self) -> usize {
        self.by_district.values().map(Vec::len).sum()
    }

    pub fn district_count(&self) -> usize {
        self.by_district.len()
    }
}

impl FromIterator<Candidate> for CandidateIndex {
    fn from_iter<I: IntoIterator<Item = Candidate>>(iter: I) -> Self {
        let mut by_district: HashMap<String, Vec<Candidate>> = HashMap::new();
        for candidate in iter {
            by_district.entry(candidate.district.clone()).or_default().push(candidate);
        }
        Self { by_district }
    }
}

/// Reads a district FeatureCollection from disk.
pub fn load_districts(path: &Path, name_property: &str) -> Result<Vec<District>, DataError> {
    let txt = fs::read_to_string(path)
        .map_err(|source| DataError::Io { path: path.to_path_buf(), source })?;
    let raw = GeoJson::from_str(&txt).map_err(|source| DataError::GeoJson {
        path: path.to_path_buf(),
        source: Box::new(source),
    })?;
    match raw {
        GeoJson::FeatureCollection(fc) => Ok(districts_from_collection(fc, name_property)),
        _ => Err(DataError::NotFeatureCollection { path: path.to_path_buf() }),
    }
}

/// Converts features to districts, skipping ones without a name or polygon.
///
/// Features sharing a name are merged into one district, parts kept in
/// first-seen order.
pub fn districts_from_collection(fc: FeatureCollection, name_property: &str) -> Vec<District> {
    let mut parts: Vec<(String, MultiPolygon<f64>)> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    for feature in fc.features {
        let name = feature
            .properties
            .as_ref()
            .and_then(|p| p.get(name_property))
            .and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            });
        let Some(name) = name.filter(|n| !n.is_empty()) else {
            tracing::debug!("skipping feature without {name_property:?}");
            continue;
        };
        let Some(gj) = feature.geometry else {
            tracing::debug!(district = %name, "skipping feature without geometry");
            continue;
        };
        let geometry: MultiPolygon<f64> = match Geometry::<f64>::try_from(gj.value) {
            Ok(Geometry::Polygon(p)) => p.into(),
            Ok(Geometry::MultiPolygon(m)) => m,
            _ => {
                tracing::debug!(district = %name, "skipping non-polygon geometry");
                continue;
            }
        };
        match seen.get(&name) {
            Some(&i) => parts[i].1.0.extend(geometry.0),
            None => {
                seen.insert(name.clone(), parts.len());
                parts.push((name, geometry));
            }
        }
    }

    parts
        .into_iter()
        .filter_map(|(name, geometry)| {
            let district = District::new(name, geometry);
            if district.is_none() {
                tracing::debug!("skipping district with empty geometry");
            }
            district
        })
        .collect()
}

/// Reads the candidate CSV from disk.
pub fn load_candidates(path: &Path, district_column: &str) -> Result<Vec<Candidate>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io { path: path.to_path_buf(), source })?;
    read_candidates(file, district_column, path)
}

/// Parses candidate rows; `origin` only labels errors.
pub fn read_candidates<R: Read>(
    reader: R,
    district_column: &str,
    origin: &Path,
) -> Result<Vec<Candidate>, DataError> {
    let csv_err = |source| DataError::Csv { path: origin.to_path_buf(), source };
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers().map_err(csv_err)?.clone();

    let column = |name: &str| {
        headers.iter().position(|h| h == name).ok_or_else(|| DataError::MissingColumn {
            path: origin.to_path_buf(),
            column: name.to_string(),
        })
    };
    let district_idx = column(district_column)?;
    let name_idx = column("candidate_name")?;
    let party_idx = column("party")?;

    let mut candidates = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(csv_err)?;
        let district = record.get(district_idx).unwrap_or("");
        if district.is_empty() {
            continue;
        }
        candidates.push(Candidate {
            name: record.get(name_idx).unwrap_or("").to_string(),
            party: record.get(party_idx).unwrap_or("").to_string(),
            district: district.to_string(),
        });
    }
    Ok(candidates)
}

/// One district name per non-blank line.
pub fn load_names(path: &Path) -> Result<Vec<String>, DataError> {
    let txt = fs::read_to_string(path)
        .map_err(|source| DataError::Io { path: path.to_path_buf(), source })?;
    Ok(txt
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}
