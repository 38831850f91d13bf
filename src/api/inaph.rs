//! Farmer lookup and the INAPH claim flow.
//!
//! Farmer accounts can be pre-provisioned from the external INAPH registry
//! without a password. The claim flow lets their owner check whether a local
//! credential exists and set one exactly once; after that the regular verify
//! path applies.

use std::sync::Arc;

use axum::{
    extract::{Extension, Json, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};
use serde_json::json;

use crate::entities::farmer;
use crate::error::AppError;
use crate::normalize::{normalize_aadhaar, normalize_phone};
use crate::security;

#[derive(serde::Deserialize)]
pub struct FarmerInfoQuery {
    identifier: String,
}

/// Resolves a farmer by INAPH id, email, phone, or Aadhaar, tried as
/// alternatives in one query.
pub async fn farmer_info(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Query(params): Query<FarmerInfoQuery>,
) -> Result<Response, AppError> {
    let identifier = params.identifier.trim();

    let mut condition = Condition::any()
        .add(farmer::Column::InaphId.eq(identifier))
        .add(farmer::Column::Email.eq(identifier.to_lowercase()));
    if let Ok(phone) = normalize_phone(identifier) {
        condition = condition.add(farmer::Column::Phone.eq(phone));
    }
    if let Ok(aadhaar) = normalize_aadhaar(identifier) {
        condition = condition.add(farmer::Column::Aadhaar.eq(aadhaar));
    }

    let found = farmer::Entity::find()
        .filter(condition)
        .one(db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Farmer not found".to_string()))?;

    // password_hash is skip_serializing on the model.
    Ok((StatusCode::OK, Json(found)).into_response())
}

async fn find_by_inaph_id(
    db: &DatabaseConnection,
    inaph_id: &str,
) -> Result<farmer::Model, AppError> {
    farmer::Entity::find()
        .filter(farmer::Column::InaphId.eq(inaph_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("No farmer found with this INAPH ID".to_string()))
}

#[derive(serde::Deserialize)]
pub struct InaphLoginRequest {
    inaph_id: String,
    password: Option<String>,
}

/// Claim-flow login. A pre-provisioned account without a credential gets a
/// "password required" response directing the caller to create-password;
/// otherwise the supplied password must verify.
pub async fn inaph_login(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<InaphLoginRequest>,
) -> Result<Response, AppError> {
    let found = find_by_inaph_id(db.as_ref(), &payload.inaph_id).await?;

    let stored = match &found.password_hash {
        Some(stored) => stored,
        None => {
            return Ok((
                StatusCode::OK,
                Json(json!({
                    "message": "Password required",
                    "user_id": found.id.to_string(),
                    "user_name": found.name,
                    "role": "farmer",
                })),
            )
                .into_response());
        }
    };

    let password = payload.password.as_deref().ok_or(AppError::InvalidCredentials)?;
    if !security::verify_password(password, stored)? {
        return Err(AppError::InvalidCredentials);
    }

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Login successful",
            "user_id": found.id.to_string(),
            "user_name": found.name,
            "role": "farmer",
        })),
    )
        .into_response())
}

#[derive(serde::Deserialize)]
pub struct CheckPasswordQuery {
    inaph_id: String,
}

pub async fn check_password(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Query(params): Query<CheckPasswordQuery>,
) -> Result<Response, AppError> {
    let found = find_by_inaph_id(db.as_ref(), &params.inaph_id).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "exists": found.password_hash.is_some() })),
    )
        .into_response())
}

#[derive(serde::Deserialize)]
pub struct CreatePasswordRequest {
    inaph_id: String,
    new_password: String,
}

/// One-shot initial credential creation. Never overwrites an existing
/// credential.
pub async fn create_password(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreatePasswordRequest>,
) -> Result<Response, AppError> {
    let found = find_by_inaph_id(db.as_ref(), &payload.inaph_id).await?;
    if found.password_hash.is_some() {
        return Err(AppError::AlreadySet);
    }

    let password_hash = security::hash_password(&payload.new_password)?;
    let mut active = found.into_active_model();
    active.password_hash = Set(Some(password_hash));
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let updated = active.update(db.as_ref()).await?;

    tracing::info!(user_id = %updated.id, "initial password created via claim flow");
    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Password created successfully",
            "user_id": updated.id.to_string(),
        })),
    )
        .into_response())
}
