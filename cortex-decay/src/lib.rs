//! C3 (salience analyzer) and C4 (decay model).

pub mod decay;
pub mod salience;

pub use decay::{decayed, format_time_since_access};
pub use salience::{analyze, calculate, explain, SalienceFactors};
