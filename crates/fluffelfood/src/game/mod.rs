//! Game state: sampled values, their meaning and the events derived from them

mod detector;
mod enums;
mod icons;
mod sampler;
mod snapshot;

pub use detector::*;
pub use enums::*;
pub use icons::*;
pub use sampler::*;
pub use snapshot::*;
