// Resume draft engine
// Implements: source reconciliation, date normalization, payload building,
// submission lifecycle and the editing-session HTTP surface.

pub mod dates;
pub mod handlers;
pub mod lifecycle;
pub mod payload;
pub mod reconcile;
pub mod seed;
pub mod session;
