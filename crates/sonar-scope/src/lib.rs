//! Scope rendering for the sonar console.
//!
//! The scope is composited cell by cell from independent layers (range
//! rings, sweep beam and trail, ping ring, contacts and background speckle);
//! the brightest layer wins each cell.

mod chars;
mod color;
mod geometry;
mod layers;
mod state;

pub use color::{hsl_to_rgb, phosphor};
pub use geometry::ScopeGeometry;
pub use state::{ScopeState, ScopeStyle};
