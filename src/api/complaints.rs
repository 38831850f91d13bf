//! Complaint lifecycle: create, list, get, update-status.

use std::sync::Arc;

use axum::{
    extract::{Extension, Multipart, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde_json::json;
use uuid::Uuid;

use crate::config::Config;
use crate::entities::cattle_complaint::{self, ComplaintStatus};
use crate::error::AppError;
use crate::notifications::{NotificationTemplates, Notifier, OutboundEmail};
use crate::upload::{self, UploadWriter};

const MAX_PER_PAGE: u64 = 100;

fn parse_spotted_date(raw: &str) -> Result<chrono::NaiveDateTime, AppError> {
    // Frontends send either a full RFC 3339 timestamp (with Z or an offset)
    // or a naive "YYYY-MM-DDTHH:MM:SS".
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map_err(|_| AppError::Validation("Invalid spotted_date format".to_string()))
}

fn iso(dt: &chrono::NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn parse_complaint_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::Validation("Invalid complaint ID format".to_string()))
}

/// Offset/limit for a 1-based page, saturating so hostile query values can't
/// overflow the multiplication.
fn page_window(page: u64, per_page: u64) -> (u64, u64) {
    let per_page = per_page.clamp(1, MAX_PER_PAGE);
    (page.saturating_sub(1).saturating_mul(per_page), per_page)
}

async fn persist_complaint(
    db: &DatabaseConnection,
    new_complaint: cattle_complaint::ActiveModel,
    photo_path: Option<&str>,
) -> Result<cattle_complaint::Model, AppError> {
    match new_complaint.insert(db).await {
        Ok(created) => Ok(created),
        Err(err) => {
            // A failed insert must not strand the photo it referenced.
            if let Some(path) = photo_path {
                upload::remove_stored(path).await;
            }
            Err(err.into())
        }
    }
}

pub async fn create_cattle_complaint(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(config): Extension<Arc<Config>>,
    Extension(notifier): Extension<Notifier>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut reporter_name: Option<String> = None;
    let mut reporter_phone: Option<String> = None;
    let mut reporter_email: Option<String> = None;
    let mut reporter_location: Option<String> = None;
    let mut cattle_count: Option<i32> = None;
    let mut cattle_type: Option<String> = None;
    let mut cattle_condition: Option<String> = None;
    let mut description: Option<String> = None;
    let mut spotted_date: Option<String> = None;
    let mut exact_location: Option<String> = None;
    let mut gps_latitude: Option<f64> = None;
    let mut gps_longitude: Option<f64> = None;
    let mut nearest_landmark: Option<String> = None;
    let mut photo_path: Option<String> = None;

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
                photo_path = Some(writer.finish().await?);
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
                    "reporter_name" => reporter_name = Some(value),
                    "reporter_phone" => reporter_phone = Some(value),
                    "reporter_email" => reporter_email = Some(value),
                    "reporter_location" => reporter_location = Some(value),
                    "cattle_count" => {
                        cattle_count = Some(value.parse().map_err(|_| {
                            AppError::Validation(
                                "Invalid cattle_count; expected an integer".to_string(),
                            )
                        })?)
                    }
                    "cattle_type" => cattle_type = Some(value),
                    "cattle_condition" => cattle_condition = Some(value),
                    "description" => description = Some(value),
                    "spotted_date" => spotted_date = Some(value),
                    "exact_location" => exact_location = Some(value),
                    "gps_latitude" => {
                        gps_latitude = Some(value.parse().map_err(|_| {
                            AppError::Validation("Invalid gps_latitude".to_string())
                        })?)
                    }
                    "gps_longitude" => {
                        gps_longitude = Some(value.parse().map_err(|_| {
                            AppError::Validation("Invalid gps_longitude".to_string())
                        })?)
                    }
                    "nearest_landmark" => nearest_landmark = Some(value),
                    _ => {}
                }
            }
        }
    }

    let require = |value: Option<String>, field: &str| {
        value.ok_or_else(|| AppError::Validation(format!("{field} is required")))
    };
    let reporter_name = require(reporter_name, "reporter_name")?;
    let reporter_phone = require(reporter_phone, "reporter_phone")?;
    let reporter_location = require(reporter_location, "reporter_location")?;
    let cattle_type = require(cattle_type, "cattle_type")?;
    let cattle_condition = require(cattle_condition, "cattle_condition")?;
    let exact_location = require(exact_location, "exact_location")?;
    let cattle_count =
        cattle_count.ok_or_else(|| AppError::Validation("cattle_count is required".to_string()))?;

    let spotted = match spotted_date {
        Some(raw) => parse_spotted_date(&raw)?,
        None => chrono::Utc::now().naive_utc(),
    };

    let now = chrono::Utc::now().naive_utc();
    let new_complaint = cattle_complaint::ActiveModel {
        id: Set(Uuid::new_v4()),
        reporter_name: Set(reporter_name),
        reporter_phone: Set(reporter_phone),
        reporter_email: Set(reporter_email),
        reporter_location: Set(reporter_location),
        cattle_count: Set(cattle_count),
        cattle_type: Set(cattle_type),
        cattle_condition: Set(cattle_condition),
        description: Set(description),
        photo_path: Set(photo_path.clone()),
        spotted_date: Set(spotted),
        exact_location: Set(exact_location),
        gps_latitude: Set(gps_latitude),
        gps_longitude: Set(gps_longitude),
        nearest_landmark: Set(nearest_landmark),
        status: Set(ComplaintStatus::Open.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let created = persist_complaint(db.as_ref(), new_complaint, photo_path.as_deref()).await?;

    // Best-effort confirmation; the complaint is already committed and a
    // notification failure never unwinds it.
    if let Some(email) = &created.reporter_email {
        notifier.send(OutboundEmail {
            to: email.clone(),
            subject: "LifeTag - Cattle Complaint Registered Successfully".to_string(),
            html: NotificationTemplates::complaint_registered_email(
                &created.reporter_name,
                &created.id.to_string(),
            ),
        });
    }

    tracing::info!(complaint_id = %created.id, "complaint registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Cattle complaint registered successfully",
            "complaint_id": created.id.to_string(),
            "status": created.status,
        })),
    )
        .into_response())
}

#[derive(serde::Deserialize)]
pub struct ListComplaintsQuery {
    status: Option<String>,
    page: Option<u64>,
    per_page: Option<u64>,
}

/// Newest-first listing with 1-based pagination; `total` reflects the same
/// status filter as the page.
pub async fn list_cattle_complaints(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Query(params): Query<ListComplaintsQuery>,
) -> Result<Response, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let (offset, per_page) = page_window(page, params.per_page.unwrap_or(10));

    let status_filter = match &params.status {
        Some(raw) => match ComplaintStatus::parse(raw) {
            Some(status) => Some(status),
            // A value outside the enum is a filter that matches no rows,
            // same as filtering the status column by any other absent value.
            None => {
                return Ok((
                    StatusCode::OK,
                    Json(json!({ "complaints": [], "total": 0, "page": page })),
                )
                    .into_response());
            }
        },
        None => None,
    };

    let mut query = cattle_complaint::Entity::find();
    if let Some(status) = status_filter {
        query = query.filter(cattle_complaint::Column::Status.eq(status.as_str()));
    }

    let total = query.clone().count(db.as_ref()).await?;
    let items = query
        .order_by_desc(cattle_complaint::Column::CreatedAt)
        .offset(offset)
        .limit(per_page)
        .all(db.as_ref())
        .await?;

    let complaints: Vec<_> = items
        .iter()
        .map(|c| {
            json!({
                "complaint_id": c.id.to_string(),
                "reporter_name": c.reporter_name,
                "reporter_phone": c.reporter_phone,
                "reporter_email": c.reporter_email,
                "cattle_count": c.cattle_count,
                "cattle_type": c.cattle_type,
                "cattle_condition": c.cattle_condition,
                "exact_location": c.exact_location,
                "spotted_date": iso(&c.spotted_date),
                "status": c.status,
                "created_at": iso(&c.created_at),
                "has_photo": c.photo_path.is_some(),
            })
        })
        .collect();

    Ok((
        StatusCode::OK,
        Json(json!({ "complaints": complaints, "total": total, "page": page })),
    )
        .into_response())
}

pub async fn get_cattle_complaint(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Path(complaint_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_complaint_id(&complaint_id)?;

    let c = cattle_complaint::Entity::find_by_id(id)
        .one(db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Complaint not found".to_string()))?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "complaint_id": c.id.to_string(),
            "reporter_name": c.reporter_name,
            "reporter_phone": c.reporter_phone,
            "reporter_email": c.reporter_email,
            "reporter_location": c.reporter_location,
            "cattle_count": c.cattle_count,
            "cattle_type": c.cattle_type,
            "cattle_condition": c.cattle_condition,
            "description": c.description,
            "photo_path": c.photo_path,
            "spotted_date": iso(&c.spotted_date),
            "exact_location": c.exact_location,
            "gps_latitude": c.gps_latitude,
            "gps_longitude": c.gps_longitude,
            "nearest_landmark": c.nearest_landmark,
            "status": c.status,
            "created_at": iso(&c.created_at),
            "updated_at": iso(&c.updated_at),
        })),
    )
        .into_response())
}

#[derive(serde::Deserialize)]
pub struct UpdateStatusQuery {
    new_status: String,
}

/// Status update is a free assignment validated only against enum
/// membership; there is no transition table and no terminal state.
pub async fn update_complaint_status(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Path(complaint_id): Path<String>,
    Query(params): Query<UpdateStatusQuery>,
) -> Result<Response, AppError> {
    let new_status = ComplaintStatus::parse(&params.new_status)
        .ok_or_else(|| AppError::Validation("Invalid status".to_string()))?;
    let id = parse_complaint_id(&complaint_id)?;

    let found = cattle_complaint::Entity::find_by_id(id)
        .one(db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Complaint not found".to_string()))?;

    let mut active = found.into_active_model();
    active.status = Set(new_status.as_str().to_string());
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    active.update(db.as_ref()).await?;

    tracing::info!(complaint_id = %id, new_status = new_status.as_str(), "complaint status updated");
    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Complaint status updated successfully",
            "complaint_id": complaint_id,
            "new_status": new_status.as_str(),
        })),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    fn open_complaint(id: Uuid) -> cattle_complaint::Model {
        let now = chrono::Utc::now().naive_utc();
        cattle_complaint::Model {
            id,
            reporter_name: "Ravi".to_string(),
            reporter_phone: "9876543210".to_string(),
            reporter_email: None,
            reporter_location: "Market Road".to_string(),
            cattle_count: 3,
            cattle_type: "Cow".to_string(),
            cattle_condition: "Injured".to_string(),
            description: None,
            photo_path: None,
            spotted_date: now,
            exact_location: "Near the bus stand".to_string(),
            gps_latitude: None,
            gps_longitude: None,
            nearest_landmark: None,
            status: "Open".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn spotted_date_accepts_rfc3339_with_z() {
        let parsed = parse_spotted_date("2024-03-01T10:30:00Z").unwrap();
        assert_eq!(iso(&parsed), "2024-03-01T10:30:00");
    }

    #[test]
    fn spotted_date_accepts_naive_timestamps() {
        assert!(parse_spotted_date("2024-03-01T10:30:00").is_ok());
    }

    #[test]
    fn spotted_date_rejects_garbage() {
        assert!(matches!(
            parse_spotted_date("last tuesday"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn page_window_is_one_based() {
        assert_eq!(page_window(1, 10), (0, 10));
        assert_eq!(page_window(3, 10), (20, 10));
        assert_eq!(page_window(1, 0), (0, 1));
    }

    #[test]
    fn page_window_survives_hostile_pagination_values() {
        let (offset, per_page) = page_window(u64::MAX, u64::MAX);
        assert_eq!(per_page, MAX_PER_PAGE);
        assert_eq!(offset, u64::MAX);
    }

    #[tokio::test]
    async fn unknown_status_filter_returns_an_empty_page() {
        // Matches the equality-filter semantics: no rows, not an error.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let response = list_cattle_complaints(
            Extension(Arc::new(db)),
            Query(ListComplaintsQuery {
                status: Some("Bogus".to_string()),
                page: None,
                per_page: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["total"], 0);
        assert_eq!(body["complaints"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn failed_insert_removes_the_stored_photo() {
        let dir = tempfile::tempdir().unwrap();
        let stored = dir.path().join("20240301_103000_deadbeef.png").to_string_lossy().to_string();
        tokio::fs::write(&stored, b"fake png bytes").await.unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("insert failed".to_string())])
            .append_exec_errors([DbErr::Custom("insert failed".to_string())])
            .into_connection();

        let mut active = open_complaint(Uuid::new_v4()).into_active_model();
        active.photo_path = Set(Some(stored.clone()));

        let result = persist_complaint(&db, active, Some(&stored)).await;
        assert!(result.is_err());
        assert!(!std::path::Path::new(&stored).exists());
    }

    #[tokio::test]
    async fn update_status_rejects_values_outside_the_enum() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let result = update_complaint_status(
            Extension(Arc::new(db)),
            Path(Uuid::new_v4().to_string()),
            Query(UpdateStatusQuery {
                new_status: "Deleted".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn update_status_rejects_malformed_ids() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let result = update_complaint_status(
            Extension(Arc::new(db)),
            Path("not-a-uuid".to_string()),
            Query(UpdateStatusQuery {
                new_status: "Closed".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn update_status_404s_for_unknown_complaints() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<cattle_complaint::Model>::new()])
            .into_connection();
        let result = update_complaint_status(
            Extension(Arc::new(db)),
            Path(Uuid::new_v4().to_string()),
            Query(UpdateStatusQuery {
                new_status: "Closed".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn reopening_a_closed_complaint_is_allowed() {
        // No transition table: Closed -> Open is a legal assignment.
        let id = Uuid::new_v4();
        let mut closed = open_complaint(id);
        closed.status = "Closed".to_string();
        let mut reopened = closed.clone();
        reopened.status = "Open".to_string();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![closed]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([vec![reopened]])
            .into_connection();

        let response = update_complaint_status(
            Extension(Arc::new(db)),
            Path(id.to_string()),
            Query(UpdateStatusQuery {
                new_status: "Open".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn get_404s_for_unknown_complaints() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<cattle_complaint::Model>::new()])
            .into_connection();
        let result = get_cattle_complaint(Extension(Arc::new(db)), Path(Uuid::new_v4().to_string())).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn get_rejects_malformed_ids_with_validation() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let result = get_cattle_complaint(Extension(Arc::new(db)), Path("42".to_string())).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
