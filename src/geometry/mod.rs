/// P-T geometry: line intersection, the reference phase diagram, and the
/// per-sample trapping envelope built from both.

pub mod boundaries;
pub mod envelope;
pub mod line;
