pub mod models;
pub mod summary;

pub use models::{Sale, SaleWithProduct};
pub use summary::{summarize, Period, SalesSummary};
