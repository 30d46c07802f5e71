//! Candidate markers over Japanese electoral district maps.
//!
//! [`layout::generate`] is the core: it turns district polygons and their
//! candidate lists into one small colored square per candidate. The rest
//! loads inputs, drives regeneration on zoom and draws the terminal map.

pub mod config;
pub mod data;
pub mod dummy;
pub mod error;
pub mod layout;
pub mod logging;
pub mod map_draw;
pub mod party;
pub mod session;
pub mod state;
pub mod ui;

pub use data::{Candidate, CandidateIndex, District};
pub use layout::{Marker, MarkerCollection, Sizing, ZoomSizing, generate};
pub use party::PartyColors;
pub use session::{MapSurface, Session};
