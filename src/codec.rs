//! JSON wire format for notifications.
//!
//! `{"from":{"id":1,"name":"Emma"},"to":{"id":2,"name":"Bruno"},"message":"hi"}`

use crate::error::{AppError, AppResult};
use crate::models::Notification;

pub fn encode(notification: &Notification) -> AppResult<Vec<u8>> {
    serde_json::to_vec(notification).map_err(AppError::Encoding)
}

pub fn decode(bytes: &[u8]) -> AppResult<Notification> {
    serde_json::from_slice(bytes).map_err(AppError::Decoding)
}
