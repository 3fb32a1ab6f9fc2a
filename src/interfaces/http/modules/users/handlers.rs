//! Demo user lookup handlers
//!
//! A read-only in-memory directory behind `GET /users/{id}`, giving the
//! metrics middleware a parameterized route to label.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::interfaces::http::common::ApiResponse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: u64,
    pub username: String,
}

/// User handler state
#[derive(Clone)]
pub struct UserHandlerState {
    pub users: Arc<HashMap<u64, String>>,
}

impl UserHandlerState {
    pub fn new(users: impl IntoIterator<Item = (u64, String)>) -> Self {
        Self {
            users: Arc::new(users.into_iter().collect()),
        }
    }

    /// A handful of fixed accounts.
    pub fn seeded() -> Self {
        Self::new([
            (1, "admin".to_string()),
            (2, "operator".to_string()),
            (3, "viewer".to_string()),
        ])
    }
}

pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    match state.users.get(&id) {
        Some(username) => Ok(Json(ApiResponse::success(UserDto {
            id,
            username: username.clone(),
        }))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("User {} not found", id))),
        )),
    }
}
