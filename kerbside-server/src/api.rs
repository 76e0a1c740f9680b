//! `GET /collections?address=...` and friends.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{info, warn};

use kerbside_core::model::CollectionReport;
use kerbside_core::ports::PortError;
use kerbside_core::service::KerbsideService;

#[derive(Debug, Deserialize)]
struct CollectionsQuery {
    address: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Failure of an API call, rendered as `{"error": ...}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// HTTP status the error maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        let (status, message) = match err {
            PortError::CouncilNotFound => {
                (StatusCode::NOT_FOUND, "could not determine council".to_owned())
            }
            PortError::UnsupportedCouncil(council) => {
                (StatusCode::NOT_FOUND, format!("no source found for {council}"))
            }
            PortError::AddressNotFound => {
                (StatusCode::NOT_FOUND, "could not resolve address".to_owned())
            }
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };
        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Routes served by the facade.
#[must_use]
pub fn build_router(service: Arc<KerbsideService>) -> Router {
    Router::new()
        .route("/collections", get(collections_handler))
        .route("/healthz", get(healthz_handler))
        .with_state(service)
}

/// Bind `addr` and serve the facade until the process stops.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(addr: SocketAddr, service: Arc<KerbsideService>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "serving collections");
    axum::serve(listener, build_router(service)).await?;
    Ok(())
}

async fn collections_handler(
    State(service): State<Arc<KerbsideService>>,
    Query(query): Query<CollectionsQuery>,
) -> Result<Json<CollectionReport>, ApiError> {
    let Some(address) = query
        .address
        .as_deref()
        .map(str::trim)
        .filter(|address| !address.is_empty())
    else {
        return Err(ApiError::bad_request("address parameter is required"));
    };

    match service.collections_for(address).await {
        Ok(report) => Ok(Json(report)),
        Err(err) => {
            let api_error = ApiError::from(err);
            warn!(address, status = %api_error.status, error = %api_error.message, "collections lookup failed");
            Err(api_error)
        }
    }
}

async fn healthz_handler() -> &'static str {
    "ok"
}
