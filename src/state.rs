use crossterm::event::KeyCode;

use crate::{
    config::ViewConfig,
    data::{Candidate, CandidateIndex, District},
    layout::Sizing,
    map_draw::MapView,
    party::PartyColors,
    session::{MapSurface, Session},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel { Left, Center }

pub struct AppState {
    pub session: Session<MapView>,
    pub list_items: Vec<String>,
    pub selected: usize,
    pub active_panel: Panel,
}

impl AppState {
    pub const HELP_TEXT: &'static str = "\
+/-: zoom
h/j/k/l: pan (arrows too on the map panel)
↑/↓: district (list panel)
Enter: center on district
Tab: switch panel
q: quit";

    pub fn new(
        districts: Vec<District>,
        candidates: CandidateIndex,
        view: &ViewConfig,
        sizing: Sizing,
        colors: PartyColors,
    ) -> Self {
        let map = MapView::new(&districts, view);
        let list_items = districts.iter().map(|d| d.name.clone()).collect();
        let mut session = Session::new(map, districts, candidates, sizing, colors);
        session.on_load();
        Self { session, list_items, selected: 0, active_panel: Panel::Left }
    }

    pub fn map(&self) -> &MapView {
        self.session.surface()
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.list_items.get(self.selected).map(String::as_str)
    }

    pub fn selected_candidates(&self) -> &[Candidate] {
        self.selected_name()
            .map(|n| self.session.candidates().get(n))
            .unwrap_or(&[])
    }

    pub fn status(&self) -> String {
        format!(
            "zoom {:.1} · {} markers · {} districts",
            self.map().zoom(),
            self.map().markers().len(),
            self.map().feature_count()
        )
    }

    /// Zoom key presses end a gesture immediately.
    fn zoom(&mut self, zoom_in: bool) {
        let map = self.session.surface_mut();
        let changed = if zoom_in { map.zoom_in() } else { map.zoom_out() };
        if changed {
            self.session.on_zoom_end();
        }
    }

    fn pan(&mut self, dx: f64, dy: f64) {
        self.session.surface_mut().pan(dx * 0.25, dy * 0.25);
    }

    /// Returns true when the app should exit.
    pub fn handle_input(&mut self, key: KeyCode) -> bool {
        use KeyCode::*;
        match key {
            Char('q') => return true,
            Tab => {
                self.active_panel = match self.active_panel {
                    Panel::Left => Panel::Center,
                    Panel::Center => Panel::Left,
                };
            }
            Char('+') | Char('=') => self.zoom(true),
            Char('-') => self.zoom(false),
            Char('h') => self.pan(-1.0, 0.0),
            Char('l') => self.pan(1.0, 0.0),
            Char('k') => self.pan(0.0, 1.0),
            Char('j') => self.pan(0.0, -1.0),
            Left if self.active_panel == Panel::Center => self.pan(-1.0, 0.0),
            Right if self.active_panel == Panel::Center => self.pan(1.0, 0.0),
            Up if self.active_panel == Panel::Center => self.pan(0.0, 1.0),
            Down if self.active_panel == Panel::Center => self.pan(0.0, -1.0),
            Up => if self.selected > 0 { self.selected -= 1 },
            Down => if self.selected + 1 < self.list_items.len() { self.selected += 1 },
            Enter => {
                let centroid = self
                    .session
                    .districts()
                    .get(self.selected)
                    .map(|d| d.centroid);
                if let Some(c) = centroid {
                    self.session.surface_mut().center_on(c);
                }
            }
            _ => {}
        }
        false
    }
}
