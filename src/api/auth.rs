use std::sync::Arc;

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde_json::json;
use uuid::Uuid;

use crate::accounts::{self, Role};
use crate::entities::{farmer, shelter, vet};
use crate::error::AppError;
use crate::normalize::{normalize_aadhaar, normalize_phone};
use crate::notifications::{NotificationTemplates, Notifier, OutboundEmail};
use crate::security;

#[derive(serde::Deserialize)]
pub struct FarmerSignupRequest {
    name: String,
    aadhaar: String,
    phone: String,
    email: String,
    address: String,
    district: Option<String>,
    state: Option<String>,
    farm_name: String,
    farm_type: String,
    inaph_id: Option<String>,
    password: String,
}

pub async fn signup_farmer(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(notifier): Extension<Notifier>,
    Json(payload): Json<FarmerSignupRequest>,
) -> Result<Response, AppError> {
    let aadhaar = normalize_aadhaar(&payload.aadhaar)?;
    let phone = normalize_phone(&payload.phone)?;
    let email = payload.email.trim().to_lowercase();

    // Friendlier messages than the raw constraint violation; the unique
    // constraints remain the guard under concurrent signups.
    if farmer::Entity::find()
        .filter(farmer::Column::Aadhaar.eq(aadhaar.clone()))
        .one(db.as_ref())
        .await?
        .is_some()
    {
        return Err(AppError::Duplicate(
            "Farmer already registered with this Aadhaar".to_string(),
        ));
    }
    if farmer::Entity::find()
        .filter(farmer::Column::Email.eq(email.clone()))
        .one(db.as_ref())
        .await?
        .is_some()
    {
        return Err(AppError::Duplicate("Email already registered".to_string()));
    }

    let password_hash = security::hash_password(&payload.password)?;
    let now = chrono::Utc::now().naive_utc();
    let new_farmer = farmer::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        aadhaar: Set(aadhaar),
        phone: Set(phone),
        email: Set(email),
        address: Set(payload.address),
        district: Set(payload.district),
        state: Set(payload.state),
        farm_name: Set(payload.farm_name),
        farm_type: Set(payload.farm_type),
        inaph_id: Set(payload.inaph_id),
        password_hash: Set(Some(password_hash)),
        registration_date: Set(Some(now)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let created = new_farmer.insert(db.as_ref()).await?;

    tracing::info!(user_id = %created.id, "farmer registered");
    notifier.send(OutboundEmail {
        to: created.email.clone(),
        subject: "Welcome to LifeTag - Your Farmer Registration is Successful".to_string(),
        html: NotificationTemplates::farmer_welcome_email(&created.name),
    });

    Ok((
        StatusCode::CREATED,
        Json(json!({"message": "Farmer signup successful", "user_id": created.id})),
    )
        .into_response())
}

#[derive(serde::Deserialize)]
pub struct VetSignupRequest {
    name: String,
    email: String,
    phone: String,
    license_no: String,
    clinic: String,
    address: String,
    password: String,
}

pub async fn signup_vet(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(notifier): Extension<Notifier>,
    Json(payload): Json<VetSignupRequest>,
) -> Result<Response, AppError> {
    let phone = normalize_phone(&payload.phone)?;
    let email = payload.email.trim().to_lowercase();

    if vet::Entity::find()
        .filter(vet::Column::Email.eq(email.clone()))
        .one(db.as_ref())
        .await?
        .is_some()
    {
        return Err(AppError::Duplicate("Email already registered".to_string()));
    }
    if vet::Entity::find()
        .filter(vet::Column::LicenseNo.eq(payload.license_no.clone()))
        .one(db.as_ref())
        .await?
        .is_some()
    {
        return Err(AppError::Duplicate(
            "License number already registered".to_string(),
        ));
    }

    let password_hash = security::hash_password(&payload.password)?;
    let now = chrono::Utc::now().naive_utc();
    let new_vet = vet::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        email: Set(email),
        phone: Set(phone),
        license_no: Set(payload.license_no),
        clinic: Set(payload.clinic),
        address: Set(payload.address),
        password_hash: Set(password_hash),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let created = new_vet.insert(db.as_ref()).await?;

    tracing::info!(user_id = %created.id, "vet registered");
    notifier.send(OutboundEmail {
        to: created.email.clone(),
        subject: "Welcome to LifeTag - Veterinarian Account".to_string(),
        html: NotificationTemplates::vet_welcome_email(&created.name),
    });

    Ok((
        StatusCode::CREATED,
        Json(json!({"message": "Vet signup successful", "user_id": created.id})),
    )
        .into_response())
}

#[derive(serde::Deserialize)]
pub struct ShelterSignupRequest {
    name: String,
    email: String,
    phone: String,
    registration_no: String,
    address: String,
    capacity: i32,
    password: String,
}

pub async fn signup_shelter(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(notifier): Extension<Notifier>,
    Json(payload): Json<ShelterSignupRequest>,
) -> Result<Response, AppError> {
    let phone = normalize_phone(&payload.phone)?;
    let email = payload.email.trim().to_lowercase();

    if shelter::Entity::find()
        .filter(shelter::Column::Email.eq(email.clone()))
        .one(db.as_ref())
        .await?
        .is_some()
    {
        return Err(AppError::Duplicate("Email already registered".to_string()));
    }
    if shelter::Entity::find()
        .filter(shelter::Column::RegistrationNo.eq(payload.registration_no.clone()))
        .one(db.as_ref())
        .await?
        .is_some()
    {
        return Err(AppError::Duplicate(
            "Registration number already exists".to_string(),
        ));
    }

    let password_hash = security::hash_password(&payload.password)?;
    let now = chrono::Utc::now().naive_utc();
    let new_shelter = shelter::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        email: Set(email),
        phone: Set(phone),
        registration_no: Set(payload.registration_no),
        address: Set(payload.address),
        capacity: Set(payload.capacity),
        password_hash: Set(password_hash),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let created = new_shelter.insert(db.as_ref()).await?;

    tracing::info!(user_id = %created.id, "shelter registered");
    notifier.send(OutboundEmail {
        to: created.email.clone(),
        subject: "Welcome to LifeTag - Shelter Account".to_string(),
        html: NotificationTemplates::shelter_welcome_email(&created.name),
    });

    Ok((
        StatusCode::CREATED,
        Json(json!({"message": "Shelter signup successful", "user_id": created.id})),
    )
        .into_response())
}

#[derive(serde::Deserialize)]
pub struct LoginRequest {
    role: String,
    identifier: String,
    password: String,
}

/// Multi-role login. Missing account and wrong password are indistinguishable
/// to the caller.
pub async fn login(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let role = Role::parse(&payload.role).ok_or(AppError::InvalidCredentials)?;

    let account = accounts::find_for_login(db.as_ref(), role, &payload.identifier)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let stored = account.credential().ok_or(AppError::InvalidCredentials)?;
    if !security::verify_password(&payload.password, stored)? {
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!(user_id = %account.id(), role = role.as_str(), "login successful");
    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Login successful",
            "user_id": account.id().to_string(),
            "user_name": account.display_name(),
            "role": role.as_str(),
        })),
    )
        .into_response())
}

#[derive(serde::Deserialize)]
pub struct DeleteUserRequest {
    role: String,
    user_id: String,
}

pub async fn delete_user(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<DeleteUserRequest>,
) -> Result<Response, AppError> {
    let role = Role::parse(&payload.role)
        .ok_or_else(|| AppError::Validation("Unknown role".to_string()))?;
    let id = Uuid::parse_str(&payload.user_id).map_err(|_| {
        AppError::Validation("Invalid user_id format; expected UUID string".to_string())
    })?;

    accounts::delete_and_verify(db.as_ref(), role, id).await?;

    tracing::info!(user_id = %id, role = role.as_str(), "account deleted");
    Ok((
        StatusCode::OK,
        Json(json!({
            "message": format!("{} deleted successfully", role.capitalized()),
            "user_id": payload.user_id,
        })),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use tokio::sync::mpsc;

    fn notifier() -> Notifier {
        // Channel with a live receiver held open long enough for the handler.
        let (tx, rx) = mpsc::unbounded_channel();
        std::mem::forget(rx);
        Notifier::from_sender(tx)
    }

    #[tokio::test]
    async fn unknown_role_is_invalid_credentials() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let result = login(
            Extension(Arc::new(db)),
            Json(LoginRequest {
                role: "admin".to_string(),
                identifier: "someone@example.com".to_string(),
                password: "pw".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn missing_account_is_invalid_credentials() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<vet::Model>::new()])
            .into_connection();
        let result = login(
            Extension(Arc::new(db)),
            Json(LoginRequest {
                role: "vet".to_string(),
                identifier: "nobody@example.com".to_string(),
                password: "pw".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn signup_farmer_rejects_malformed_aadhaar_before_any_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let result = signup_farmer(
            Extension(Arc::new(db)),
            Extension(notifier()),
            Json(FarmerSignupRequest {
                name: "Asha".to_string(),
                aadhaar: "123".to_string(),
                phone: "9876543210".to_string(),
                email: "asha@example.com".to_string(),
                address: "Village Road".to_string(),
                district: None,
                state: None,
                farm_name: "Asha Dairy".to_string(),
                farm_type: "Dairy".to_string(),
                inaph_id: None,
                password: "secret".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn signup_farmer_with_registered_aadhaar_is_a_duplicate() {
        // The pre-check half of the duplicate guard; the unique constraint
        // covers the race the mock can't.
        let now = chrono::Utc::now().naive_utc();
        let existing = farmer::Model {
            id: Uuid::new_v4(),
            name: "Asha".to_string(),
            aadhaar: "2345 1234 5678".to_string(),
            phone: "9876543210".to_string(),
            email: "asha@example.com".to_string(),
            address: "Village Road".to_string(),
            district: None,
            state: None,
            farm_name: "Asha Dairy".to_string(),
            farm_type: "Dairy".to_string(),
            inaph_id: None,
            password_hash: None,
            registration_date: Some(now),
            created_at: now,
            updated_at: now,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing]])
            .into_connection();
        let result = signup_farmer(
            Extension(Arc::new(db)),
            Extension(notifier()),
            Json(FarmerSignupRequest {
                name: "Someone Else".to_string(),
                aadhaar: "234512345678".to_string(),
                phone: "9123456789".to_string(),
                email: "else@example.com".to_string(),
                address: "Other Road".to_string(),
                district: None,
                state: None,
                farm_name: "Other Dairy".to_string(),
                farm_type: "Dairy".to_string(),
                inaph_id: None,
                password: "secret".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::Duplicate(_))));
    }

    #[tokio::test]
    async fn delete_user_rejects_malformed_uuid() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let result = delete_user(
            Extension(Arc::new(db)),
            Json(DeleteUserRequest {
                role: "farmer".to_string(),
                user_id: "not-a-uuid".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn delete_user_rejects_unknown_role() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let result = delete_user(
            Extension(Arc::new(db)),
            Json(DeleteUserRequest {
                role: "overlord".to_string(),
                user_id: Uuid::new_v4().to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
