// ============================================================================
// DOM MODULE - Helpers para manipulación DOM
// ============================================================================

pub mod element;
pub mod events;
pub mod surface;

pub use element::*;
pub use surface::*;
