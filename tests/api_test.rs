//! Integration tests driving the full actix service over HTTP, with an
//! in-memory persistence backend and the hosted-model client disabled.

use std::sync::Arc;

use actix_web::{test, web, App};
use serde_json::{json, Value};

use campus_market::persistence::MemoryStore;
use campus_market::{configure, AppState, CommerceService, GeminiClient};

macro_rules! test_app {
    () => {{
        let service = CommerceService::new(Arc::new(MemoryStore::new())).expect("service boot");
        let state = web::Data::new(AppState {
            service,
            ai: GeminiClient::disabled(),
        });
        test::init_service(App::new().app_data(state).configure(configure)).await
    }};
}

macro_rules! post_json {
    ($app:expr, $uri:expr, $body:expr) => {
        test::call_service(
            $app,
            test::TestRequest::post().uri($uri).set_json($body).to_request(),
        )
        .await
    };
}

macro_rules! register_user {
    ($app:expr, $name:expr, $role:expr) => {{
        let resp = post_json!(
            $app,
            "/users",
            &json!({
                "name": $name,
                "email": format!("{}@u-auben.bf", $name.to_lowercase()),
                "role": $role,
                "is_verified": true
            })
        );
        assert_eq!(resp.status(), 201, "registering {} failed", $name);
        let user: Value = test::read_body_json(resp).await;
        user["id"].as_str().expect("user id").to_string()
    }};
}

macro_rules! create_product {
    ($app:expr, $seller:expr, $price:expr, $stock:expr) => {{
        let resp = post_json!(
            $app,
            "/products",
            &json!({
                "seller_id": $seller,
                "name": "Riz gras",
                "description": "Portion du midi",
                "category": "FOOD",
                "price": $price,
                "image": "riz.jpg",
                "stock": $stock
            })
        );
        assert_eq!(resp.status(), 201, "creating product failed");
        let product: Value = test::read_body_json(resp).await;
        product["id"].as_str().expect("product id").to_string()
    }};
}

fn checkout_body(buyer: &str, product: &str) -> Value {
    json!({
        "buyer_id": buyer,
        "product_id": product,
        "payment_method": "ORANGE_MONEY",
        "delivery_type": "DELIVERY",
        "transaction_id": "OM-42"
    })
}

#[actix_web::test]
async fn checkout_prices_and_reserves_stock() {
    let app = test_app!();
    let seller = register_user!(&app, "Awa", "SELLER");
    let buyer = register_user!(&app, "Issa", "BUYER");
    let product = create_product!(&app, seller, 1000, 1);

    let resp = post_json!(&app, "/orders", &checkout_body(&buyer, &product));
    assert_eq!(resp.status(), 201);
    let order: Value = test::read_body_json(resp).await;
    assert_eq!(order["status"], "PAID");
    assert_eq!(order["product_price"], 1000);
    assert_eq!(order["delivery_fee"], 450);
    assert_eq!(order["platform_sale_fee"], 30);
    assert_eq!(order["platform_delivery_fee"], 5);
    assert_eq!(order["seller_id"].as_str(), Some(seller.as_str()));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/products/{product}"))
            .to_request(),
    )
    .await;
    let listed: Value = test::read_body_json(resp).await;
    assert_eq!(listed["stock"], 0);

    // Last unit is gone.
    let resp = post_json!(&app, "/orders", &checkout_body(&buyer, &product));
    assert_eq!(resp.status(), 409);
}

#[actix_web::test]
async fn pickup_checkout_has_zero_delivery_fees() {
    let app = test_app!();
    let seller = register_user!(&app, "Awa", "SELLER");
    let buyer = register_user!(&app, "Issa", "BUYER");
    let product = create_product!(&app, seller, 2500, 3);

    let resp = post_json!(
        &app,
        "/orders",
        &json!({
            "buyer_id": buyer,
            "product_id": product,
            "payment_method": "MOOV_MONEY",
            "delivery_type": "PICKUP",
            "transaction_id": "MM-7"
        })
    );
    assert_eq!(resp.status(), 201);
    let order: Value = test::read_body_json(resp).await;
    assert_eq!(order["delivery_fee"], 0);
    assert_eq!(order["platform_delivery_fee"], 0);
    assert_eq!(order["platform_sale_fee"], 75);
}

#[actix_web::test]
async fn delivery_flow_with_exclusive_claim() {
    let app = test_app!();
    let seller = register_user!(&app, "Awa", "SELLER");
    let buyer = register_user!(&app, "Issa", "BUYER");
    let courier = register_user!(&app, "Drissa", "DELIVERY");
    let rival = register_user!(&app, "Karim", "DELIVERY");
    let product = create_product!(&app, seller, 1000, 1);

    let resp = post_json!(&app, "/orders", &checkout_body(&buyer, &product));
    let order: Value = test::read_body_json(resp).await;
    let order_id = order["id"].as_str().expect("order id").to_string();
    let status_uri = format!("/orders/{order_id}/status");

    // The buyer may not advance their own order.
    let resp = post_json!(
        &app,
        &status_uri,
        &json!({ "requester_id": buyer, "status": "ACCEPTED" })
    );
    assert_eq!(resp.status(), 403);

    // First courier claims.
    let resp = post_json!(
        &app,
        &status_uri,
        &json!({ "requester_id": courier, "status": "ACCEPTED" })
    );
    assert_eq!(resp.status(), 200);
    let claimed: Value = test::read_body_json(resp).await;
    assert_eq!(claimed["delivery_id"].as_str(), Some(courier.as_str()));

    // Second courier loses the claim.
    let resp = post_json!(
        &app,
        &status_uri,
        &json!({ "requester_id": rival, "status": "ACCEPTED" })
    );
    assert_eq!(resp.status(), 409);

    // Only the assigned courier may report a position.
    let location_uri = format!("/orders/{order_id}/driver-location");
    let resp = post_json!(
        &app,
        &location_uri,
        &json!({ "requester_id": rival, "lat": 12.31, "lng": -1.49 })
    );
    assert_eq!(resp.status(), 403);
    let resp = post_json!(
        &app,
        &location_uri,
        &json!({ "requester_id": courier, "lat": 12.31, "lng": -1.49 })
    );
    assert_eq!(resp.status(), 200);

    // Deliver and complete.
    let resp = post_json!(
        &app,
        &status_uri,
        &json!({ "requester_id": courier, "status": "DELIVERING" })
    );
    assert_eq!(resp.status(), 200);
    let resp = post_json!(
        &app,
        &status_uri,
        &json!({ "requester_id": courier, "status": "COMPLETED" })
    );
    assert_eq!(resp.status(), 200);

    // Terminal orders are frozen, even for admins.
    let admin = register_user!(&app, "Salif", "ADMIN");
    let resp = post_json!(
        &app,
        &status_uri,
        &json!({ "requester_id": admin, "status": "CANCELLED" })
    );
    assert_eq!(resp.status(), 422);
}

#[actix_web::test]
async fn admin_may_force_cancellation_of_a_paid_order() {
    let app = test_app!();
    let seller = register_user!(&app, "Awa", "SELLER");
    let buyer = register_user!(&app, "Issa", "BUYER");
    let admin = register_user!(&app, "Salif", "ADMIN");
    let product = create_product!(&app, seller, 800, 2);

    let resp = post_json!(&app, "/orders", &checkout_body(&buyer, &product));
    let order: Value = test::read_body_json(resp).await;
    let order_id = order["id"].as_str().expect("order id");

    let resp = post_json!(
        &app,
        &format!("/orders/{order_id}/status"),
        &json!({ "requester_id": admin, "status": "CANCELLED" })
    );
    assert_eq!(resp.status(), 200);
    let cancelled: Value = test::read_body_json(resp).await;
    assert_eq!(cancelled["status"], "CANCELLED");

    // Cancellation does not restore the reserved unit.
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/products/{product}"))
            .to_request(),
    )
    .await;
    let listed: Value = test::read_body_json(resp).await;
    assert_eq!(listed["stock"], 1);
}

#[actix_web::test]
async fn concurrent_checkouts_for_the_last_unit() {
    let app = test_app!();
    let seller = register_user!(&app, "Awa", "SELLER");
    let buyer_a = register_user!(&app, "Issa", "BUYER");
    let buyer_b = register_user!(&app, "Binta", "BUYER");
    let product = create_product!(&app, seller, 1000, 1);

    let responses = futures::future::join(
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/orders")
                .set_json(checkout_body(&buyer_a, &product))
                .to_request(),
        ),
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/orders")
                .set_json(checkout_body(&buyer_b, &product))
                .to_request(),
        ),
    )
    .await;

    let statuses = [responses.0.status().as_u16(), responses.1.status().as_u16()];
    assert!(statuses.contains(&201), "one checkout must succeed: {statuses:?}");
    assert!(statuses.contains(&409), "one checkout must lose: {statuses:?}");
}

#[actix_web::test]
async fn delete_store_demotes_seller_and_clears_listings() {
    let app = test_app!();
    let seller = register_user!(&app, "Awa", "SELLER");
    let buyer = register_user!(&app, "Issa", "BUYER");
    let product = create_product!(&app, seller, 1000, 5);

    let resp = post_json!(&app, "/orders", &checkout_body(&buyer, &product));
    let order: Value = test::read_body_json(resp).await;
    let order_id = order["id"].as_str().expect("order id");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/users/{seller}/delete-store"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let demoted: Value = test::read_body_json(resp).await;
    assert_eq!(demoted["role"], "BUYER");

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/products").to_request(),
    )
    .await;
    let products: Value = test::read_body_json(resp).await;
    assert_eq!(products.as_array().expect("array").len(), 0);

    // The order's snapshot is unaffected by the cascade.
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/orders/{order_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let kept: Value = test::read_body_json(resp).await;
    assert_eq!(kept["product_price"], 1000);
}

#[actix_web::test]
async fn orders_list_is_newest_first() {
    let app = test_app!();
    let seller = register_user!(&app, "Awa", "SELLER");
    let buyer = register_user!(&app, "Issa", "BUYER");
    let product = create_product!(&app, seller, 500, 5);

    let mut ids = Vec::new();
    for _ in 0..3 {
        let resp = post_json!(&app, "/orders", &checkout_body(&buyer, &product));
        let order: Value = test::read_body_json(resp).await;
        ids.push(order["id"].as_str().expect("order id").to_string());
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/orders?page=1&limit=2").to_request(),
    )
    .await;
    let page: Value = test::read_body_json(resp).await;
    assert_eq!(page["total"], 3);
    let items = page["items"].as_array().expect("items");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"].as_str(), Some(ids[2].as_str()));
    assert_eq!(items[1]["id"].as_str(), Some(ids[1].as_str()));
}

#[actix_web::test]
async fn ai_endpoints_degrade_without_a_model() {
    let app = test_app!();
    let courier = register_user!(&app, "Drissa", "DELIVERY");

    let resp = post_json!(&app, "/identity/verify", &json!({ "image_base64": "AAAA" }));
    assert_eq!(resp.status(), 200);
    let check: Value = test::read_body_json(resp).await;
    assert_eq!(check["is_valid"], false);

    let resp = post_json!(
        &app,
        &format!("/users/{courier}/schedule"),
        &json!({ "image_base64": "AAAA" })
    );
    assert_eq!(resp.status(), 200);
    let user: Value = test::read_body_json(resp).await;
    assert!(user["schedule"].is_null());

    let resp = post_json!(
        &app,
        &format!("/users/{courier}/zone"),
        &json!({ "lat": 12.3, "lng": -1.5 })
    );
    assert_eq!(resp.status(), 200);
    let zone: Value = test::read_body_json(resp).await;
    assert!(zone["zone"].is_null());
}

#[actix_web::test]
async fn malformed_listings_and_unknown_ids_are_rejected() {
    let app = test_app!();
    let seller = register_user!(&app, "Awa", "SELLER");

    let resp = post_json!(
        &app,
        "/products",
        &json!({
            "seller_id": seller,
            "name": "",
            "description": "",
            "category": "FOOD",
            "price": 100,
            "image": "x.jpg",
            "stock": 1
        })
    );
    assert_eq!(resp.status(), 400);

    let resp = post_json!(
        &app,
        "/products",
        &json!({
            "seller_id": seller,
            "name": "Stylo",
            "description": "",
            "category": "SUPPLIES",
            "price": -5,
            "image": "stylo.jpg",
            "stock": 1
        })
    );
    assert_eq!(resp.status(), 400);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/orders/{}", uuid::Uuid::new_v4()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);
}
