//! Analytics service: statistics over a posted series

use super::ServiceError;
use crate::backend::{stats, PriceRecord, StatsError, StatsResult};
use axum::{routing::post, Json, Router};

pub fn analytics_router() -> Router {
    Router::new().route("/analytics", post(analytics))
}

async fn analytics(
    Json(records): Json<Vec<PriceRecord>>,
) -> Result<Json<StatsResult>, ServiceError> {
    if records.is_empty() {
        return Err(ServiceError::BadRequest("No data provided".to_string()));
    }
    let result = stats::compute(&records).map_err(|e| match e {
        StatsError::InvalidSeries => ServiceError::BadRequest(e.to_string()),
        StatsError::Upstream(_) => ServiceError::Internal(e.to_string()),
    })?;
    tracing::info!(records = records.len(), "Computed statistics");
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn post_json(body: Value) -> (StatusCode, Value) {
        let request = Request::post("/analytics")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = analytics_router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn computes_stats() {
        let (status, body) = post_json(json!([
            {"time": 1, "high": 12.0, "low": 8.0, "close": 10.0},
            {"time": 2, "high": 22.0, "low": 18.0, "close": 20.0}
        ]))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "average": 15.0, "median": 15.0, "min": 8.0, "max": 22.0 })
        );
    }

    #[tokio::test]
    async fn empty_input_is_rejected() {
        let (status, body) = post_json(json!([])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "No data provided" }));
    }
}
