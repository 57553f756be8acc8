pub mod engine;
pub mod models;

pub use engine::{category_distribution, period_figures, sales_trend, top_products};
pub use models::{CategorySlice, PeriodFigures, ProductPerformance, SalesTrend, TopProductsSort, TrendPoint};
