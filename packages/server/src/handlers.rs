//! HTTP handler functions for the isochrone API.

use actix_web::{HttpResponse, web};
use sitescout_isochrone::{IsochroneError, mock_isochrone, resolve_feature};
use sitescout_server_models::{ApiError, ApiHealth, MockQueryParams, ResolveRequest};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/isochrones/resolve`
///
/// Resolves a raw provider response into one `GeoJSON` polygon feature.
pub async fn resolve(state: web::Data<AppState>, body: web::Json<ResolveRequest>) -> HttpResponse {
    let request = body.into_inner();
    let query = request.query();

    match resolve_feature(&request.response, &query, &state.config) {
        Ok(feature) => HttpResponse::Ok().json(feature),
        Err(e) => error_response(&e, "Failed to resolve isochrone"),
    }
}

/// `GET /api/isochrones/mock`
///
/// Returns a circular approximation around the requested point.
pub async fn mock(
    state: web::Data<AppState>,
    params: web::Query<MockQueryParams>,
) -> HttpResponse {
    let query = params.query();

    match mock_isochrone(&query, &state.config).and_then(|r| r.to_json()) {
        Ok(feature) => HttpResponse::Ok().json(feature),
        Err(e) => error_response(&e, "Failed to generate mock isochrone"),
    }
}

/// Maps an engine error to a response.
///
/// An invalid center is a bad request (`400`), an unusable provider payload
/// is unprocessable (`422`), and anything else is a server fault.
fn error_response(e: &IsochroneError, context: &str) -> HttpResponse {
    match (e, e.kind()) {
        (IsochroneError::InvalidCenter { .. }, Some(kind)) => {
            log::warn!("{context}: {e}");
            HttpResponse::BadRequest().json(ApiError {
                error: e.to_string(),
                kind: Some(kind.to_string()),
            })
        }
        (_, Some(kind)) => {
            log::warn!("{context}: {e}");
            HttpResponse::UnprocessableEntity().json(ApiError {
                error: e.to_string(),
                kind: Some(kind.to_string()),
            })
        }
        (_, None) => {
            log::error!("{context}: {e}");
            HttpResponse::InternalServerError().json(ApiError {
                error: context.to_string(),
                kind: None,
            })
        }
    }
}
