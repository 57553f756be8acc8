use axum::http::StatusCode;
use serde_json::json;

mod common;

use common::{register_and_login, send, test_app};

#[tokio::test]
async fn test_health_is_public() {
    let app = test_app();

    let (status, body) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = test_app();

    let (status, _) = send(&app, "GET", "/api/products", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/products", Some("not-a-real-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/analytics/revenue-summary", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_login_flow() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": "clerk@shop.test", "password": "hunter22", "name": "First Clerk" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["type"], "Bearer");
    assert_eq!(body["expiresIn"], 3600);
    assert_eq!(body["user"]["email"], "clerk@shop.test");
    assert_eq!(body["user"]["role"], "USER");
    assert!(body["token"].as_str().is_some());

    // Same email again is rejected
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": "clerk@shop.test", "password": "hunter22", "name": "Imposter" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already registered");

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "clerk@shop.test", "password": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "clerk@shop.test", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");
}

#[tokio::test]
async fn test_product_crud() {
    let app = test_app();
    let token = register_and_login(&app, "crud@shop.test").await;
    let token = Some(token.as_str());

    // Create
    let (status, created) = send(
        &app,
        "POST",
        "/api/products",
        token,
        Some(json!({
            "name": "Oat Biscuits 200g",
            "category": "Biscuits",
            "purchasePriceCents": 3000,
            "sellingPriceCents": 5000,
            "quantity": 40,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["profitMargin"], 67.0);
    assert_eq!(created["stockStatus"], "SUFFICIENT");
    assert_eq!(created["minimumThreshold"], 10);
    let id = created["id"].as_str().expect("product id").to_string();

    // List and fetch
    let (status, listed) = send(&app, "GET", "/api/products", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(|a| a.len()), Some(1));

    let (status, fetched) = send(&app, "GET", &format!("/api/products/{}", id), token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Oat Biscuits 200g");

    // Update
    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/products/{}", id),
        token,
        Some(json!({
            "name": "Oat Biscuits 400g",
            "category": "Biscuits",
            "purchasePriceCents": 4000,
            "sellingPriceCents": 8000,
            "quantity": 8,
            "minimumThreshold": 10,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Oat Biscuits 400g");
    assert_eq!(updated["profitMargin"], 100.0);
    assert_eq!(updated["stockStatus"], "LOW_STOCK");

    // Stock adjustments
    let (status, restocked) = send(
        &app,
        "PATCH",
        &format!("/api/products/{}/stock", id),
        token,
        Some(json!({ "quantity": 12, "action": "increase" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(restocked["quantity"], 20);

    let (status, reduced) = send(
        &app,
        "PATCH",
        &format!("/api/products/{}/stock", id),
        token,
        Some(json!({ "quantity": 5, "action": "decrease" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reduced["quantity"], 15);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/products/{}/stock", id),
        token,
        Some(json!({ "quantity": 500, "action": "decrease" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, set) = send(
        &app,
        "PATCH",
        &format!("/api/products/{}/stock", id),
        token,
        Some(json!({ "quantity": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(set["quantity"], 3);

    // Stats and categories
    let (status, stats) = send(&app, "GET", "/api/products/stats", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalProducts"], 1);
    assert_eq!(stats["lowStockCount"], 1);
    assert_eq!(stats["categories"], 1);

    let (status, categories) = send(&app, "GET", "/api/products/categories", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(categories, json!(["Biscuits"]));

    // Delete
    let (status, deleted) = send(&app, "DELETE", &format!("/api/products/{}", id), token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["message"], "Product deleted successfully");

    let (status, _) = send(&app, "GET", &format!("/api/products/{}", id), token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_validation() {
    let app = test_app();
    let token = register_and_login(&app, "validation@shop.test").await;
    let token = Some(token.as_str());

    let (status, body) = send(
        &app,
        "POST",
        "/api/products",
        token,
        Some(json!({
            "name": "Loss Maker",
            "category": "Snacks",
            "purchasePriceCents": 5000,
            "sellingPriceCents": 3000,
            "quantity": 5,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Selling price must be greater than or equal to purchase price");

    let (status, _) = send(
        &app,
        "POST",
        "/api/products",
        token,
        Some(json!({
            "name": "X",
            "category": "Snacks",
            "purchasePriceCents": 100,
            "sellingPriceCents": 200,
            "quantity": 5,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_record_sale_flow() {
    let app = test_app();
    let token = register_and_login(&app, "till@shop.test").await;
    let token = Some(token.as_str());

    let (_, product) = send(
        &app,
        "POST",
        "/api/products",
        token,
        Some(json!({
            "name": "Cola 330ml",
            "category": "Beverages",
            "purchasePriceCents": 3000,
            "sellingPriceCents": 5000,
            "quantity": 10,
        })),
    )
    .await;
    let product_id = product["id"].as_str().expect("product id").to_string();

    // Record a sale
    let (status, sale) = send(
        &app,
        "POST",
        "/api/sales",
        token,
        Some(json!({ "productId": product_id, "quantitySold": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sale["quantitySold"], 3);
    assert_eq!(sale["salePriceCents"], 5000);
    assert_eq!(sale["totalRevenueCents"], 15000);
    assert_eq!(sale["remainingStock"], 7);
    assert_eq!(sale["userName"], "Test Clerk");
    assert_eq!(sale["productName"], "Cola 330ml");

    // Overselling is rejected and leaves stock untouched
    let (status, body) = send(
        &app,
        "POST",
        "/api/sales",
        token,
        Some(json!({ "productId": product_id, "quantitySold": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Insufficient stock. Available: 7, Requested: 100");

    let (_, fetched) = send(&app, "GET", &format!("/api/products/{}", product_id), token, None).await;
    assert_eq!(fetched["quantity"], 7);

    // History and summary
    let (status, history) = send(&app, "GET", "/api/sales", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().map(|a| a.len()), Some(1));
    assert_eq!(history[0]["userName"], "Test Clerk");

    let (status, summary) = send(&app, "GET", "/api/sales/summary?period=week", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["period"], "week");
    assert_eq!(summary["totalRevenueCents"], 15000);
    assert_eq!(summary["totalTransactions"], 1);
    assert_eq!(summary["totalUnitsSold"], 3);
    assert_eq!(summary["averageTransactionValueCents"], 15000);
}

#[tokio::test]
async fn test_analytics_endpoints() {
    let app = test_app();
    let token = register_and_login(&app, "analyst@shop.test").await;
    let token = Some(token.as_str());

    let mut ids = Vec::new();
    for (name, category, purchase, selling) in [
        ("Milk 1L", "Dairy", 1000i64, 2000i64),
        ("Chips 150g", "Snacks", 500, 1000),
    ] {
        let (_, product) = send(
            &app,
            "POST",
            "/api/products",
            token,
            Some(json!({
                "name": name,
                "category": category,
                "purchasePriceCents": purchase,
                "sellingPriceCents": selling,
                "quantity": 50,
            })),
        )
        .await;
        ids.push(product["id"].as_str().expect("product id").to_string());
    }

    // 3 units of milk (6000 revenue), 2 of chips (2000 revenue)
    for (id, qty) in [(&ids[0], 3), (&ids[1], 2)] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/sales",
            token,
            Some(json!({ "productId": id, "quantitySold": qty })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, trend) = send(&app, "GET", "/api/analytics/sales-trend?days=7", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trend["period"], "last_7_days");
    assert_eq!(trend["data"].as_array().map(|a| a.len()), Some(1));
    assert_eq!(trend["data"][0]["salesCents"], 8000);
    assert_eq!(trend["data"][0]["transactions"], 2);

    let (status, top) = send(
        &app,
        "GET",
        "/api/analytics/top-products?limit=1&sortBy=revenue",
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(top["products"].as_array().map(|a| a.len()), Some(1));
    assert_eq!(top["products"][0]["productName"], "Milk 1L");
    assert_eq!(top["products"][0]["totalRevenueCents"], 6000);
    assert_eq!(top["products"][0]["profitMargin"], 100.0);

    let (status, distribution) = send(&app, "GET", "/api/analytics/category-distribution", token, None).await;
    assert_eq!(status, StatusCode::OK);
    let categories = distribution["categories"].as_array().expect("categories");
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0]["category"], "Dairy");
    assert_eq!(categories[0]["percentage"], 75.0);
    assert_eq!(categories[0]["totalProducts"], 1);

    let (status, revenue) = send(&app, "GET", "/api/analytics/revenue-summary", token, None).await;
    assert_eq!(status, StatusCode::OK);
    // 8000 revenue, cost 3*1000 + 2*500 = 4000
    assert_eq!(revenue["today"]["revenueCents"], 8000);
    assert_eq!(revenue["today"]["profitCents"], 4000);
    assert_eq!(revenue["week"]["transactions"], 2);
    assert_eq!(revenue["month"]["revenueCents"], 8000);
}

#[tokio::test]
async fn test_insights_flow() {
    let app = test_app();
    let token = register_and_login(&app, "planner@shop.test").await;
    let token = Some(token.as_str());

    let (_, product) = send(
        &app,
        "POST",
        "/api/products",
        token,
        Some(json!({
            "name": "Espresso Beans 1kg",
            "category": "Beverages",
            "purchasePriceCents": 10000,
            "sellingPriceCents": 16000,
            "quantity": 38,
        })),
    )
    .await;
    let product_id = product["id"].as_str().expect("product id").to_string();

    // 28 units over the 14-day window -> 2/day; 10 left -> 5 days to stockout
    let (status, _) = send(
        &app,
        "POST",
        "/api/sales",
        token,
        Some(json!({ "productId": product_id, "quantitySold": 28 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, insight) = send(
        &app,
        "GET",
        &format!("/api/ai/insights/product/{}", product_id),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(insight["productName"], "Espresso Beans 1kg");
    assert_eq!(insight["currentStock"], 10);
    assert_eq!(insight["daysUntilStockout"], 5);
    assert_eq!(insight["recommendedReorderQty"], 28);
    assert_eq!(insight["priority"], "MEDIUM");
    assert_eq!(insight["confidenceScore"], 0.85);
    assert_eq!(insight["action"], "Reorder 28 units within next few days (stockout in 5 days)");
    assert!(insight["reason"].as_str().expect("reason").contains("Moderate sales pattern"));

    // The regenerated insight is listed and filterable
    let (status, listed) = send(&app, "GET", "/api/ai/insights", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(|a| a.len()), Some(1));

    let (status, filtered) = send(&app, "GET", "/api/ai/insights?priority=medium", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filtered.as_array().map(|a| a.len()), Some(1));

    let (status, filtered) = send(&app, "GET", "/api/ai/insights?priority=HIGH", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filtered.as_array().map(|a| a.len()), Some(0));

    let (status, body) = send(&app, "GET", "/api/ai/insights?priority=urgent", token, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown priority: urgent");

    // Manual sweep trigger acknowledges immediately
    let (status, body) = send(&app, "POST", "/api/ai/insights/generate", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "AI insights generation started");

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/ai/insights/product/{}", uuid::Uuid::new_v4()),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
