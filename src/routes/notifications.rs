// ============================================================================
// Notification Routes
// ============================================================================
//
// Endpoints:
// - POST /send - Publish a notification from one user to another
//
// ============================================================================

use axum::{
    extract::{FromRequest, Multipart, RawForm, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::gateway::{NotificationGateway, SendForm};

pub const SUCCESS_MESSAGE: &str = "Notification sent successfully!";

/// POST /send
/// Form fields: `fromID`, `toID`, `message`
pub async fn send_notification(
    State(gateway): State<Arc<NotificationGateway>>,
    request: Request,
) -> Result<impl IntoResponse, AppError> {
    let form = read_form(request).await?;

    gateway.send(&form).await?;

    Ok((StatusCode::OK, Json(json!({ "message": SUCCESS_MESSAGE }))))
}

/// Decode the request body into a `SendForm`.
///
/// Accepts `application/x-www-form-urlencoded` and `multipart/form-data`.
/// Any other content type carries no form fields, so the request then fails
/// on id parsing like a form with the ids left out.
async fn read_form(request: Request) -> AppResult<SendForm> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        read_multipart(request).await
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let RawForm(body) = RawForm::from_request(request, &())
            .await
            .map_err(|rejection| AppError::invalid_input(rejection.body_text()))?;

        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(&body)
            .map_err(|e| AppError::invalid_input(format!("failed to parse form body: {}", e)))?;

        Ok(SendForm::from_pairs(pairs))
    } else {
        Ok(SendForm::default())
    }
}

async fn read_multipart(request: Request) -> AppResult<SendForm> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|rejection| AppError::invalid_input(rejection.body_text()))?;

    let mut pairs = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::invalid_input(format!("failed to parse multipart form: {}", e))
    })? {
        // File parts are not form values.
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field.text().await.map_err(|e| {
            AppError::invalid_input(format!("failed to read form field {}: {}", name, e))
        })?;
        pairs.push((name, value));
    }

    Ok(SendForm::from_pairs(pairs))
}
