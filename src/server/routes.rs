use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use crate::server::AppState;
use crate::{Entity, Error, Relationship};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct CreatePersonRequest {
    #[serde(alias = "cpf")]
    pub identifier: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreateRelationshipRequest {
    #[serde(rename = "participantA", alias = "cpf1")]
    pub participant_a: String,
    #[serde(rename = "participantB", alias = "cpf2")]
    pub participant_b: String,
}

/// HTTP-facing failure. The body is the message as a JSON string.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(message)).into_response()
    }
}

/// Unreadable or incomplete request bodies keep the JSON-string error shape
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

/// Anything a route does not map itself is a server fault
impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        tracing::error!("Request failed: {}", err);
        ApiError::Internal("Internal server error.".to_string())
    }
}

pub async fn create_person(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreatePersonRequest>, JsonRejection>,
) -> Result<Json<&'static str>, ApiError> {
    let Json(body) = body?;
    let registry = state.registry.lock().await;

    match registry.create_person(&body.identifier, &body.name) {
        Ok(_) => Ok(Json("Person success created.")),
        Err(Error::InvalidIdentifier(_)) => Err(ApiError::BadRequest("CPF number invalid.".to_string())),
        Err(Error::InvalidName) => Err(ApiError::BadRequest("Name invalid.".to_string())),
        Err(Error::PersonExists(_)) => Err(ApiError::BadRequest("Person exists.".to_string())),
        Err(e) => Err(e.into()),
    }
}

pub async fn get_person(
    State(state): State<Arc<AppState>>,
    Path(identifier): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let registry = state.registry.lock().await;

    match registry.get_person(&identifier) {
        Ok(person) => Ok(Json(serde_json::json!({ "person": person }))),
        Err(Error::NotFound { .. }) => Err(ApiError::NotFound("Person not exists.".to_string())),
        Err(e) => Err(e.into()),
    }
}

pub async fn create_relationship(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateRelationshipRequest>, JsonRejection>,
) -> Result<Json<&'static str>, ApiError> {
    let Json(body) = body?;
    let registry = state.registry.lock().await;

    match registry.create_relationship(&body.participant_a, &body.participant_b) {
        Ok(_) => Ok(Json("Relationship success created.")),
        Err(Error::NotFound { identifier, .. }) => {
            Err(ApiError::NotFound(format!("CPF {} not exists", identifier)))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn clean(State(state): State<Arc<AppState>>) -> Result<Json<&'static str>, ApiError> {
    let mut registry = state.registry.lock().await;
    registry.reset_all()?;
    Ok(Json("Clean success."))
}

pub async fn get_recommendation(
    State(state): State<Arc<AppState>>,
    Path(identifier): Path<String>,
) -> Result<Json<Relationship>, ApiError> {
    let registry = state.registry.lock().await;

    match registry.find_relationships_for(&identifier) {
        Ok(relationship) => Ok(Json(relationship)),
        Err(Error::InvalidIdentifier(id)) => Err(ApiError::BadRequest(format!("CPF {} number invalid.", id))),
        Err(Error::NotFound { entity: Entity::Person, identifier }) => {
            Err(ApiError::NotFound(format!("Person {} not exists.", identifier)))
        }
        Err(Error::NotFound { entity: Entity::Relationship, identifier }) => {
            Err(ApiError::NotFound(format!("Relationship for CPF {} not exists.", identifier)))
        }
        Err(e) => Err(e.into()),
    }
}
