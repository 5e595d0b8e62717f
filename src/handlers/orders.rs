use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::commerce::Checkout;
use crate::domain::order::{
    DeliveryLocation, DeliveryType, GeoPoint, Order, OrderStatus, PaymentMethod,
};
use crate::errors::AppError;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub buyer_id: Uuid,
    pub product_id: Uuid,
    pub payment_method: PaymentMethod,
    pub delivery_type: DeliveryType,
    pub transaction_id: String,
    /// Drop-off point; omitted for pickup or when the buyer keeps the campus
    /// default.
    pub delivery_location: Option<DeliveryLocation>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdvanceStatusRequest {
    pub requester_id: Uuid,
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DriverLocationRequest {
    pub requester_id: Uuid,
    pub lat: f64,
    pub lng: f64,
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<Order>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Checkout: reserves one unit of stock, prices the order (delivery fee plus
/// both platform commissions) and creates it in the PAID state.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 404, description = "Buyer or product unknown"),
        (status = 409, description = "Product is out of stock"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let order = state.service.checkout(Checkout {
        buyer_id: body.buyer_id,
        product_id: body.product_id,
        payment_method: body.payment_method,
        delivery_type: body.delivery_type,
        transaction_id: body.transaction_id,
        delivery_location: body.delivery_location,
    })?;
    Ok(HttpResponse::Created().json(order))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.service.order(path.into_inner())?))
}

/// GET /orders
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated orders, newest first", body = ListOrdersResponse),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);
    let result = state.service.list_orders(page, limit)?;
    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items,
        total: result.total,
        page,
        limit,
    }))
}

/// POST /orders/{id}/status
///
/// Role-gated transition. A courier moving a PAID order to ACCEPTED is the
/// exclusive claim; losing a claim race answers 409.
#[utoipa::path(
    post,
    path = "/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = AdvanceStatusRequest,
    responses(
        (status = 200, description = "Order advanced", body = Order),
        (status = 403, description = "Requester's role may not drive this edge"),
        (status = 409, description = "Order already claimed by another courier"),
        (status = 422, description = "No such edge in the state machine"),
    ),
    tag = "orders"
)]
pub async fn advance_status(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<AdvanceStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let order = state
        .service
        .advance_status(path.into_inner(), body.requester_id, body.status)?;
    Ok(HttpResponse::Ok().json(order))
}

/// POST /orders/{id}/driver-location
#[utoipa::path(
    post,
    path = "/orders/{id}/driver-location",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = DriverLocationRequest,
    responses(
        (status = 200, description = "Position recorded", body = Order),
        (status = 400, description = "Order is not in transit"),
        (status = 403, description = "Requester is not the assigned courier"),
    ),
    tag = "orders"
)]
pub async fn update_driver_location(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<DriverLocationRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let order = state.service.update_driver_location(
        path.into_inner(),
        body.requester_id,
        GeoPoint {
            lat: body.lat,
            lng: body.lng,
        },
    )?;
    Ok(HttpResponse::Ok().json(order))
}
