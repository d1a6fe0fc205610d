//! The public per-instrument ECF models.
//!
//! The three models are near-identical instantiations of the shared
//! resolver/interpolator core; each one only declares its discrete axes,
//! defaults and epoch history.

mod erosita;
mod swift;
mod xmm;

pub use erosita::{Erosita, ErositaBuilder};
pub use swift::{SwiftXrt, SwiftXrtBuilder};
pub use xmm::{XmmDetector, XmmDetectorFamily, XmmEpic, XmmEpicBuilder};
