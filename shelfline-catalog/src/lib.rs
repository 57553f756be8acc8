pub mod product;

pub use product::{profit_margin_pct, Product, ProductDraft, ProductError, StockStatus};
