pub mod normalize;
pub mod orchestrator;

pub use normalize::{FallbackEnvelope, NormalizedResponse, normalize};
pub use orchestrator::run_prompt;
