//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::ledger::{LedgerError, SlotNumber, normalize_registration};
use crate::service::{LedgerSnapshot, ParkingService};
use crate::version::VersionInfo;

#[derive(Debug, Deserialize)]
pub struct InitRequest {
    pub no_of_slot: i64,
}

#[derive(Debug, Deserialize)]
pub struct ExpandRequest {
    pub increment_slot: i64,
}

#[derive(Debug, Deserialize)]
pub struct ParkRequest {
    pub car_reg_no: String,
    pub car_color: String,
}

/// Release takes either a slot number or a registration; slot wins if both
/// are present.
#[derive(Debug, Deserialize)]
pub struct ClearRequest {
    pub slot_number: Option<i64>,
    pub car_registration_no: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: &'static str,
    pub version: VersionInfo,
    pub started_at: String,
    #[serde(flatten)]
    pub lot: LedgerSnapshot,
}

/// Map a ledger error kind to a transport status code. The kinds themselves
/// come from the ledger; only the rendering is decided here.
fn error_response(err: LedgerError) -> (StatusCode, Json<serde_json::Value>) {
    let status = match err {
        LedgerError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::NotInitialized
        | LedgerError::Full
        | LedgerError::DuplicateVehicle(_)
        | LedgerError::AlreadyFree(_) => StatusCode::CONFLICT,
    };
    (status, Json(json!({ "error": err.to_string() })))
}

/// Wire integers arrive as i64; negatives and values beyond the slot domain
/// are invalid before the ledger ever sees them. Zero is passed through so
/// the ledger reports it with its own message.
fn slot_arg(value: i64, field: &str) -> Result<SlotNumber, LedgerError> {
    SlotNumber::try_from(value)
        .map_err(|_| LedgerError::InvalidArgument(format!("{field} must be a positive integer")))
}

async fn health_check(State(service): State<Arc<ParkingService>>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok",
        version: service.version().clone(),
        started_at: service.started_at().to_string(),
        lot: service.snapshot().await,
    })
}

async fn init_lot(
    State(service): State<Arc<ParkingService>>,
    Json(request): Json<InitRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let result = match slot_arg(request.no_of_slot, "no_of_slot") {
        Ok(capacity) => service.init(capacity).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(total) => (StatusCode::CREATED, Json(json!({ "total_slot": total }))),
        Err(e) => error_response(e),
    }
}

async fn expand_lot(
    State(service): State<Arc<ParkingService>>,
    Json(request): Json<ExpandRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let result = match slot_arg(request.increment_slot, "increment_slot") {
        Ok(increment) => service.expand(increment).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(total) => (StatusCode::OK, Json(json!({ "total_slot": total }))),
        Err(e) => error_response(e),
    }
}

async fn park_vehicle(
    State(service): State<Arc<ParkingService>>,
    Json(request): Json<ParkRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    match service.park(&request.car_reg_no, &request.car_color).await {
        Ok(slot) => (
            StatusCode::CREATED,
            Json(json!({ "allocated_slot_number": slot })),
        ),
        Err(e) => error_response(e),
    }
}

async fn clear_slot(
    State(service): State<Arc<ParkingService>>,
    Json(request): Json<ClearRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let result = if let Some(slot) = request.slot_number {
        match slot_arg(slot, "slot_number") {
            Ok(slot) => service.release_by_slot(slot).await,
            Err(e) => Err(e),
        }
    } else if let Some(ref registration) = request.car_registration_no {
        service.release_by_registration(registration).await
    } else {
        Err(LedgerError::InvalidArgument(
            "Provide slot_number or car_registration_no".to_string(),
        ))
    };
    match result {
        Ok(freed) => (StatusCode::OK, Json(json!({ "freed_slot_number": freed }))),
        Err(e) => error_response(e),
    }
}

async fn lot_status(
    State(service): State<Arc<ParkingService>>,
) -> Json<Vec<crate::ledger::SlotRecord>> {
    Json(service.status().await)
}

async fn registrations_by_color(
    State(service): State<Arc<ParkingService>>,
    Path(color): Path<String>,
) -> Json<Vec<String>> {
    Json(service.registrations_by_color(&color).await)
}

async fn slots_by_color(
    State(service): State<Arc<ParkingService>>,
    Path(color): Path<String>,
) -> Json<Vec<SlotNumber>> {
    Json(service.slots_by_color(&color).await)
}

async fn slot_by_registration(
    State(service): State<Arc<ParkingService>>,
    Path(registration): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    match service.slot_by_registration(&registration).await {
        Some(slot) => (StatusCode::OK, Json(json!({ "slot_number": slot }))),
        None => error_response(LedgerError::NotFound(normalize_registration(&registration))),
    }
}

async fn shutdown(
    State(service): State<Arc<ParkingService>>,
) -> (StatusCode, Json<serde_json::Value>) {
    tracing::info!("Shutdown requested via HTTP");
    service.trigger_shutdown();
    (StatusCode::OK, Json(json!({})))
}

pub fn routes(service: Arc<ParkingService>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/parking_lot", post(init_lot).patch(expand_lot))
        .route("/api/park", post(park_vehicle))
        .route("/api/clear", post(clear_slot))
        .route("/api/status", get(lot_status))
        .route(
            "/api/registration_numbers/{color}",
            get(registrations_by_color),
        )
        .route("/api/slot_numbers/{color}", get(slots_by_color))
        .route("/api/slot/{registration}", get(slot_by_registration))
        .route("/shutdown", post(shutdown))
        .with_state(service)
}
