pub mod models;
pub mod narrator;
pub mod projector;

pub use models::{Insight, InsightWithProduct, Priority};
pub use narrator::InsightNarrator;
pub use projector::{build_action, build_prompt, project, Projection};
