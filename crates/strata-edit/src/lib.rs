//! Interactive terrain editing: height brushes and splat-weight painting.

mod brush;
mod footprint;
mod splat;

pub use brush::{BrushKind, Falloff, HeightBrush, MIN_RADIUS, ParseBrushError};
pub use footprint::{Footprint, FootprintCell};
pub use splat::{LayerIndex, LayerRegistry, MAX_LAYERS, SplatError, SplatPainter};
