//! Drives marker regeneration from map events.
//!
//! The map surface is injected; the session only reacts to `on_load` and
//! `on_zoom_end` and hands the surface a freshly generated collection.

use crate::data::{CandidateIndex, District};
use crate::layout::{self, MarkerCollection, Sizing};
use crate::party::PartyColors;

/// Anything that can show markers and report its zoom level.
pub trait MapSurface {
    fn zoom(&self) -> f64;

    /// Replaces the whole marker layer.
    fn replace_markers(&mut self, markers: MarkerCollection);
}

pub struct Session<S: MapSurface> {
    surface: S,
    districts: Vec<District>,
    candidates: CandidateIndex,
    sizing: Sizing,
    colors: PartyColors,
    last_zoom: Option<f64>,
}

impl<S: MapSurface> Session<S> {
    pub fn new(
        surface: S,
        districts: Vec<District>,
        candidates: CandidateIndex,
        sizing: Sizing,
        colors: PartyColors,
    ) -> Self {
        Self { surface, districts, candidates, sizing, colors, last_zoom: None }
    }

    /// Initial layout once the data is in.
    pub fn on_load(&mut self) {
        tracing::info!(
            districts = self.districts.len(),
            candidates = self.candidates.total(),
            "data loaded"
        );
        self.regenerate();
    }

    /// Called at the end of a zoom gesture. Returns whether markers were rebuilt.
    pub fn on_zoom_end(&mut self) -> bool {
        if self.last_zoom == Some(self.surface.zoom()) {
            return false;
        }
        self.regenerate();
        true
    }

    fn regenerate(&mut self) {
        let zoom = self.surface.zoom();
        let markers = layout::generate(&self.districts, &self.candidates, zoom, &self.sizing, &self.colors);
        tracing::debug!(zoom, markers = markers.len(), "replacing marker layer");
        self.surface.replace_markers(markers);
        self.last_zoom = Some(zoom);
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    pub fn candidates(&self) -> &CandidateIndex {
        &self.candidates
    }

    pub fn colors(&self) -> &PartyColors {
        &self.colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Candidate;
    use crate::layout::ZoomSizing;
    use geo::polygon;

    #[derive(Default)]
    struct RecordingSurface {
        zoom: f64,
        replaced: Vec<MarkerCollection>,
    }

    impl MapSurface for RecordingSurface {
        fn zoom(&self) -> f64 {
            self.zoom
        }

        fn replace_markers(&mut self, markers: MarkerCollection) {
            self.replaced.push(markers);
        }
    }

    fn session(zoom: f64) -> Session<RecordingSurface> {
        let poly = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)];
        let districts = vec![District::new("A", poly.into()).expect("district")];
        let candidates: CandidateIndex = ["公明党", "社民党", "無所属"]
            .iter()
            .map(|p| Candidate {
                name: format!("{p}の候補"),
                party: p.to_string(),
                district: "A".to_string(),
            })
            .collect();
        let sizing = Sizing::Zoom(ZoomSizing { max_size: 0.1, min_size: 0.01, threshold: 5.0, range: 5.0 });
        Session::new(
            RecordingSurface { zoom, replaced: Vec::new() },
            districts,
            candidates,
            sizing,
            PartyColors::default(),
        )
    }

    #[test]
    fn load_publishes_markers_for_current_zoom() {
        let mut s = session(4.0);
        s.on_load();
        let replaced = &s.surface().replaced;
        assert_eq!(replaced.len(), 1);
        assert_eq!(replaced[0].len(), 3);
        assert_eq!(replaced[0].zoom, 4.0);
    }

    #[test]
    fn zoom_end_replaces_whole_layer_with_new_size() {
        let mut s = session(5.0);
        s.on_load();
        s.surface_mut().zoom = 10.0;
        assert!(s.on_zoom_end());

        let replaced = &s.surface().replaced;
        assert_eq!(replaced.len(), 2);
        assert_eq!(replaced[1].len(), 3);
        let (_, before) = replaced[0].markers[0].origin_and_size();
        let (_, after) = replaced[1].markers[0].origin_and_size();
        assert!((before - 0.1).abs() < 1e-9);
        assert!((after - 0.01).abs() < 1e-9);
    }

    #[test]
    fn zoom_end_without_change_is_skipped() {
        let mut s = session(6.0);
        s.on_load();
        assert!(!s.on_zoom_end());
        assert_eq!(s.surface().replaced.len(), 1);
    }

    #[test]
    fn zoom_end_before_load_still_generates() {
        let mut s = session(6.0);
        assert!(s.on_zoom_end());
        assert_eq!(s.surface().replaced.len(), 1);
    }
}
