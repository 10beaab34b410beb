//! Audio value types shared by every resolution tier.

mod types;

pub use types::{AudioFormat, AudioLocation, SynthesizedResponse};
