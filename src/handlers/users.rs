use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::ai::IdentityCheck;
use crate::application::commerce::NewUser;
use crate::domain::user::Role;
use crate::errors::AppError;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub is_verified: bool,
    pub phone_number: Option<String>,
    pub student_id_card: Option<String>,
    pub avatar: Option<String>,
    pub location_address: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyIdentityRequest {
    /// Base64-encoded JPEG of the student card.
    pub image_base64: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ParseScheduleRequest {
    /// Base64-encoded JPEG of the timetable.
    pub image_base64: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResolveZoneRequest {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResolveZoneResponse {
    /// `null` when the model could not name the zone.
    pub zone: Option<String>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /users
///
/// Creates the account and makes it the session user. Identity verification
/// is expected to have happened via `/identity/verify` beforehand.
#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "Account created", body = crate::domain::user::User),
        (status = 400, description = "Malformed registration"),
    ),
    tag = "users"
)]
pub async fn register_user(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let user = state.service.register_user(NewUser {
        name: body.name,
        email: body.email,
        role: body.role,
        is_verified: body.is_verified,
        phone_number: body.phone_number,
        student_id_card: body.student_id_card,
        avatar: body.avatar,
        location_address: body.location_address,
    })?;
    Ok(HttpResponse::Created().json(user))
}

/// GET /users/{id}
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 200, description = "User found", body = crate::domain::user::User),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.service.user(path.into_inner())?))
}

/// GET /users
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All accounts", body = [crate::domain::user::User]),
    ),
    tag = "users"
)]
pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.service.list_users()?))
}

/// DELETE /users/{id}
///
/// Deletes the account and cascades its listings. Orders survive as audit
/// records.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn delete_account(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state.service.delete_account(path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /users/{id}/delete-store
///
/// Removes every listing the seller owns and demotes the account to BUYER.
#[utoipa::path(
    post,
    path = "/users/{id}/delete-store",
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 200, description = "Store deleted, account demoted", body = crate::domain::user::User),
        (status = 400, description = "Account is not a seller"),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn delete_store(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.service.delete_store(path.into_inner())?))
}

/// POST /users/{id}/schedule
///
/// Runs the timetable image through the model and attaches the parsed slots.
/// When the model is unavailable or the answer unusable, the schedule simply
/// stays as it was.
#[utoipa::path(
    post,
    path = "/users/{id}/schedule",
    params(("id" = Uuid, Path, description = "User UUID")),
    request_body = ParseScheduleRequest,
    responses(
        (status = 200, description = "Account, with the schedule attached if parsing succeeded", body = crate::domain::user::User),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn attach_schedule(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<ParseScheduleRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    let user = match state.ai.parse_schedule(&body.image_base64).await {
        Some(schedule) => state.service.set_schedule(user_id, schedule)?,
        None => state.service.user(user_id)?,
    };
    Ok(HttpResponse::Ok().json(user))
}

/// POST /users/{id}/zone
///
/// Best-effort zone naming for a coordinate pair; a failed model call leaves
/// the preferred zone unset.
#[utoipa::path(
    post,
    path = "/users/{id}/zone",
    params(("id" = Uuid, Path, description = "User UUID")),
    request_body = ResolveZoneRequest,
    responses(
        (status = 200, description = "Resolved zone, possibly null", body = ResolveZoneResponse),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn resolve_zone(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<ResolveZoneRequest>,
) -> Result<HttpResponse, AppError> {
    let zone = state.ai.resolve_zone(body.lat, body.lng).await;
    let user = state
        .service
        .set_preferred_zone(path.into_inner(), zone)?;
    Ok(HttpResponse::Ok().json(ResolveZoneResponse {
        zone: user.preferred_zone,
    }))
}

/// POST /identity/verify
///
/// Proxies the student-card photo to the model. Degrades to an invalid check
/// rather than erroring when the model is unreachable.
#[utoipa::path(
    post,
    path = "/identity/verify",
    request_body = VerifyIdentityRequest,
    responses(
        (status = 200, description = "Verification outcome", body = IdentityCheck),
    ),
    tag = "users"
)]
pub async fn verify_identity(
    state: web::Data<AppState>,
    body: web::Json<VerifyIdentityRequest>,
) -> Result<HttpResponse, AppError> {
    let check = state
        .ai
        .verify_identity(&body.image_base64)
        .await
        .unwrap_or(IdentityCheck {
            full_name: String::new(),
            student_id: String::new(),
            is_valid: false,
        });
    Ok(HttpResponse::Ok().json(check))
}
