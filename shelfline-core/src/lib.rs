pub mod identity;
pub mod repository;

pub use identity::{Role, User};
pub use repository::{InsightRepository, ProductRepository, RepoError, SaleRepository, UserRepository};
