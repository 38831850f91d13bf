use std::sync::Arc;

use axum::{
    extract::{Extension, Multipart},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;
use uuid::Uuid;

use crate::config::Config;
use crate::entities::cattle;
use crate::error::AppError;
use crate::upload::{self, UploadWriter};

fn parse_form_date(value: &str, field: &str) -> Result<chrono::NaiveDateTime, AppError> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
        .map_err(|_| AppError::Validation(format!("Invalid {field} format; expected YYYY-MM-DD")))
}

/// Registers a cattle record for the logged-in farmer. The owner arrives in
/// the `X-Owner-Id` header (set by the frontend after login); the form is
/// multipart with an optional photo.
pub async fn add_new_cattle(
    Extension(db): Extension<Arc<sea_orm::DatabaseConnection>>,
    Extension(config): Extension<Arc<Config>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let owner_header = headers
        .get("x-owner-id")
        .or_else(|| headers.get("x-user-id"))
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Unauthorized(
                "Missing owner id header (provide X-Owner-Id after login)".to_string(),
            )
        })?;
    let owner_id = Uuid::parse_str(owner_header).map_err(|_| {
        AppError::Unauthorized("X-Owner-Id header must be a valid UUID".to_string())
    })?;

    let mut cattle_name: Option<String> = None;
    let mut species: Option<String> = None;
    let mut breed: Option<String> = None;
    let mut sex: Option<String> = None;
    let mut dob: Option<String> = None;
    let mut weight: Option<f64> = None;
    let mut colour: Option<String> = None;
    let mut health_condition: Option<String> = None;
    let mut purchase_date: Option<String> = None;
    let mut source: Option<String> = None;
    let mut last_known_location: Option<String> = None;
    let mut inaph_tag_id: Option<String> = None;
    let mut inaph_farmer_id: Option<String> = None;
    let mut photo_url: Option<String> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "photo" => {
                let declared = match field.file_name() {
                    Some(f) if !f.is_empty() => f.to_string(),
                    _ => continue,
                };
                let mut writer = UploadWriter::create(
                    &config.upload_folder,
                    &declared,
                    config.max_upload_bytes(),
                )
                .await?;
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?
                {
                    writer.write_chunk(&chunk).await?;
                }
                photo_url = Some(writer.finish().await?);
            }
            other => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                if value.is_empty() {
                    continue;
                }
                match other {
                    "cattle_name" => cattle_name = Some(value),
                    "species" => species = Some(value),
                    "breed" => breed = Some(value),
                    "sex" => sex = Some(value),
                    "dob" => dob = Some(value),
                    "weight" => {
                        weight = Some(value.parse().map_err(|_| {
                            AppError::Validation("Invalid weight; expected a number".to_string())
                        })?)
                    }
                    "colour" => colour = Some(value),
                    "health_condition" => health_condition = Some(value),
                    "purchase_date" => purchase_date = Some(value),
                    "source" => source = Some(value),
                    "last_known_location" => last_known_location = Some(value),
                    "inaph_tag_id" => inaph_tag_id = Some(value),
                    "inaph_farmer_id" => inaph_farmer_id = Some(value),
                    _ => {}
                }
            }
        }
    }

    // cattle_name is accepted from the form but not persisted; the original
    // schema never grew a column for it.
    let _ = cattle_name;

    let require = |value: Option<String>, field: &str| {
        value.ok_or_else(|| AppError::Validation(format!("{field} is required")))
    };
    let species = require(species, "species")?;
    let breed = require(breed, "breed")?;
    let sex = require(sex, "sex")?;
    let dob = parse_form_date(&require(dob, "dob")?, "dob")?;
    let purchased_date = match purchase_date {
        Some(raw) => Some(parse_form_date(&raw, "purchase_date")?),
        None => None,
    };

    let cid = Uuid::new_v4();
    let local_cattle_id = format!("LIFE-{}", &Uuid::new_v4().simple().to_string()[..8]);
    let now = chrono::Utc::now().naive_utc();

    let new_cattle = cattle::ActiveModel {
        id: Set(cid),
        inaph_tag_id: Set(inaph_tag_id),
        inaph_farmer_id: Set(inaph_farmer_id),
        local_cattle_id: Set(local_cattle_id.clone()),
        species: Set(species),
        breed: Set(breed),
        sex: Set(sex),
        dob: Set(dob),
        colour_markings: Set(colour),
        weight: Set(weight),
        health_condition: Set(health_condition),
        purchased_date: Set(purchased_date),
        source: Set(source),
        photo_url: Set(photo_url.clone()),
        status: Set("Active".to_string()),
        last_known_location: Set(last_known_location),
        owner_id: Set(owner_id),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let created = match new_cattle.insert(db.as_ref()).await {
        Ok(created) => created,
        Err(err) => {
            // Don't leave an orphaned photo behind when the record insert
            // fails (bad owner FK, duplicate tag, ...).
            if let Some(path) = &photo_url {
                upload::remove_stored(path).await;
            }
            let app_err: AppError = err.into();
            return Err(match app_err {
                AppError::Database(db_err) => AppError::Validation(db_err.to_string()),
                other => other,
            });
        }
    };

    tracing::info!(cid = %created.id, owner_id = %owner_id, "cattle registered");
    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Cattle added successfully!",
            "cid": created.id.to_string(),
            "local_cattle_id": local_cattle_id,
        })),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_dates_parse_to_midnight() {
        let parsed = parse_form_date("2023-06-01", "dob").unwrap();
        assert_eq!(parsed.to_string(), "2023-06-01 00:00:00");
    }

    #[test]
    fn malformed_form_dates_are_validation_errors() {
        assert!(matches!(
            parse_form_date("01-06-2023", "dob"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_form_date("yesterday", "purchase_date"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn local_cattle_id_shape() {
        let id = format!("LIFE-{}", &Uuid::new_v4().simple().to_string()[..8]);
        assert_eq!(id.len(), 13);
        assert!(id.starts_with("LIFE-"));
        assert!(id[5..].chars().all(|c| c.is_ascii_hexdigit()));
    }
}
