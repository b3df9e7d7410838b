mod backend;
mod backends;
mod result;

pub use backend::{DetectorBackend, Frame, RunningMode};
pub use backends::StubBackend;
pub use result::{Category, Detection, DetectionOutcome, ResultBundle};
