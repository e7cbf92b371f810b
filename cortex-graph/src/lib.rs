//! C6: relationship detection, hub-salience feedback, and contradiction
//! penalization over the associative memory graph.

pub mod detect;
pub mod evolution;
pub mod negation;

pub use detect::{classify, detect_relationships, Candidate};
pub use evolution::{apply_contradiction_penalty, apply_hub_bonus, contradiction_pairs};
