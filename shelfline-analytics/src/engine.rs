use std::collections::{BTreeMap, HashMap};

use shelfline_catalog::{profit_margin_pct, Product};
use shelfline_sales::SaleWithProduct;
use uuid::Uuid;

use crate::models::{CategorySlice, PeriodFigures, ProductPerformance, SalesTrend, TopProductsSort, TrendPoint};

/// Group sales by calendar date, ascending. The caller supplies sales
/// already restricted to the trailing `days` window.
pub fn sales_trend(days: u32, sales: &[SaleWithProduct]) -> SalesTrend {
    let mut daily: BTreeMap<chrono::NaiveDate, TrendPoint> = BTreeMap::new();

    for sale in sales {
        let date = sale.sale.sale_date.date_naive();
        let point = daily.entry(date).or_insert_with(|| TrendPoint {
            date: date.to_string(),
            sales_cents: 0,
            transactions: 0,
        });
        point.sales_cents += sale.sale.total_revenue_cents;
        point.transactions += 1;
    }

    SalesTrend {
        period: format!("last_{}_days", days),
        data: daily.into_values().collect(),
    }
}

/// Rank products by accumulated sales figures, descending by the sort key
pub fn top_products(limit: usize, sort_by: TopProductsSort, sales: &[SaleWithProduct]) -> Vec<ProductPerformance> {
    let mut per_product: HashMap<Uuid, ProductPerformance> = HashMap::new();

    for sale in sales {
        let entry = per_product
            .entry(sale.sale.product_id)
            .or_insert_with(|| ProductPerformance {
                product_id: sale.sale.product_id,
                product_name: sale.product_name.clone(),
                category: sale.product_category.clone(),
                total_revenue_cents: 0,
                total_units_sold: 0,
                sales_count: 0,
                profit_margin: profit_margin_pct(sale.purchase_price_cents, sale.selling_price_cents),
            });
        entry.total_revenue_cents += sale.sale.total_revenue_cents;
        entry.total_units_sold += sale.sale.quantity_sold as i64;
        entry.sales_count += 1;
    }

    let mut ranked: Vec<ProductPerformance> = per_product.into_values().collect();
    match sort_by {
        TopProductsSort::Revenue => ranked.sort_by(|a, b| b.total_revenue_cents.cmp(&a.total_revenue_cents)),
        TopProductsSort::Quantity => ranked.sort_by(|a, b| b.total_units_sold.cmp(&a.total_units_sold)),
        TopProductsSort::Frequency => ranked.sort_by(|a, b| b.sales_count.cmp(&a.sales_count)),
    }
    ranked.truncate(limit);
    ranked
}

/// Revenue share per category over all sales, with the catalog size of each
/// category. Slices are ordered by revenue, largest first.
pub fn category_distribution(sales: &[SaleWithProduct], products: &[Product]) -> Vec<CategorySlice> {
    let mut revenue_by_category: HashMap<String, i64> = HashMap::new();
    let mut total_revenue: i64 = 0;

    for sale in sales {
        *revenue_by_category.entry(sale.product_category.clone()).or_insert(0) += sale.sale.total_revenue_cents;
        total_revenue += sale.sale.total_revenue_cents;
    }

    let mut slices: Vec<CategorySlice> = revenue_by_category
        .into_iter()
        .map(|(category, revenue)| {
            let total_products = products.iter().filter(|p| p.category == category).count() as i64;
            let percentage = if total_revenue > 0 {
                (revenue as f64 / total_revenue as f64 * 10000.0).round() / 100.0
            } else {
                0.0
            };
            CategorySlice {
                category,
                total_revenue_cents: revenue,
                total_products,
                percentage,
            }
        })
        .collect();

    slices.sort_by(|a, b| b.total_revenue_cents.cmp(&a.total_revenue_cents));
    slices
}

/// Revenue, profit and transaction count over one slice of sales.
/// Profit subtracts the purchase cost of the units sold from the revenue.
pub fn period_figures(sales: &[SaleWithProduct]) -> PeriodFigures {
    let mut revenue_cents: i64 = 0;
    let mut profit_cents: i64 = 0;

    for sale in sales {
        let cost = sale.purchase_price_cents * sale.sale.quantity_sold as i64;
        revenue_cents += sale.sale.total_revenue_cents;
        profit_cents += sale.sale.total_revenue_cents - cost;
    }

    PeriodFigures {
        revenue_cents,
        profit_cents,
        transactions: sales.len() as i64,
    }
}
