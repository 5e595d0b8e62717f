use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::product::{Category, NewProduct};
use crate::errors::AppError;
use crate::store::catalog::ProductEdit;
use crate::AppState;

// ── Request DTOs ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub seller_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: Category,
    /// Unit price in the smallest currency unit, e.g. 1000 for 1 000 FCFA.
    pub price: i64,
    pub image: String,
    pub stock: u32,
    #[serde(default)]
    pub allow_pre_order: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub requester_id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub image: Option<String>,
    pub stock: Option<u32>,
    pub allow_pre_order: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteProductParams {
    pub requester_id: Uuid,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /products
#[utoipa::path(
    post,
    path = "/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Listing created", body = crate::domain::product::Product),
        (status = 400, description = "Malformed listing"),
        (status = 403, description = "Requester is not a seller"),
    ),
    tag = "products"
)]
pub async fn create_product(
    state: web::Data<AppState>,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let product = state.service.add_product(
        body.seller_id,
        NewProduct {
            name: body.name,
            description: body.description,
            category: body.category,
            price: body.price,
            image: body.image,
            stock: body.stock,
            allow_pre_order: body.allow_pre_order,
        },
    )?;
    Ok(HttpResponse::Created().json(product))
}

/// GET /products
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All listings, newest first", body = [crate::domain::product::Product]),
    ),
    tag = "products"
)]
pub async fn list_products(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.service.list_products()?))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Listing found", body = crate::domain::product::Product),
        (status = 404, description = "Listing not found"),
    ),
    tag = "products"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.service.product(path.into_inner())?))
}

/// PUT /products/{id}
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Listing updated", body = crate::domain::product::Product),
        (status = 403, description = "Requester does not own the listing"),
        (status = 404, description = "Listing not found"),
    ),
    tag = "products"
)]
pub async fn update_product(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let product = state.service.update_product(
        path.into_inner(),
        body.requester_id,
        ProductEdit {
            name: body.name,
            description: body.description,
            price: body.price,
            image: body.image,
            stock: body.stock,
            allow_pre_order: body.allow_pre_order,
        },
    )?;
    Ok(HttpResponse::Ok().json(product))
}

/// DELETE /products/{id}?requester_id=...
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
        ("requester_id" = Uuid, Query, description = "Seller requesting the deletion"),
    ),
    responses(
        (status = 204, description = "Listing deleted"),
        (status = 403, description = "Requester does not own the listing"),
        (status = 404, description = "Listing not found"),
    ),
    tag = "products"
)]
pub async fn delete_product(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<DeleteProductParams>,
) -> Result<HttpResponse, AppError> {
    state
        .service
        .delete_product(path.into_inner(), query.requester_id)?;
    Ok(HttpResponse::NoContent().finish())
}
