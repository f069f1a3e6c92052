//! AWS Lambda handler for underwriting requests
//!
//! Accepts deal assumptions via JSON and returns the full set of derived
//! metrics (pro forma, exit, IRR, equity multiple).
//!
//! Supports Lambda Function URLs for direct HTTP access.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use serde::{Deserialize, Serialize};
use underwriting_system::{
    underwriting::UnderwritingSummary, AssumptionsInput, DerivedMetrics, UnderwritingConfig,
    UnderwritingEngine,
};

/// Input for an underwriting request: the raw assumption record plus
/// optional engine policy overrides
#[derive(Debug, Deserialize)]
struct UnderwriteRequest {
    #[serde(flatten)]
    assumptions: AssumptionsInput,

    #[serde(default)]
    config: UnderwritingConfig,
}

/// Output from an underwriting run
#[derive(Debug, Serialize)]
struct UnderwriteResponse {
    metrics: DerivedMetrics,
    summary: UnderwritingSummary,
    execution_time_ms: u64,
}

fn error_response(status: u16, message: &str) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Text(
            serde_json::json!({ "error": message }).to_string(),
        ))
        .unwrap()
}

fn json_response(body: &UnderwriteResponse) -> Response<Body> {
    Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(serde_json::to_string(body).unwrap()))
        .unwrap()
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let start = std::time::Instant::now();

    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)
            .unwrap());
    }

    // Parse request body
    let body = event.body();
    let body_str = match body {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    let request: UnderwriteRequest = match serde_json::from_str(&body_str) {
        Ok(r) => r,
        Err(e) => {
            return Ok(error_response(400, &format!("Invalid JSON: {}", e)));
        }
    };

    // Validate the raw assumption record before it can reach the engine
    let assumptions = match request.assumptions.validate() {
        Ok(a) => a,
        Err(e) => {
            return Ok(error_response(400, &format!("Invalid assumptions: {}", e)));
        }
    };

    let engine = UnderwritingEngine::new(request.config);
    let metrics = match engine.underwrite(&assumptions) {
        Ok(m) => m,
        Err(e) => {
            return Ok(error_response(422, &e.to_string()));
        }
    };

    let summary = metrics.summary();
    let execution_time_ms = start.elapsed().as_millis() as u64;

    Ok(json_response(&UnderwriteResponse {
        metrics,
        summary,
        execution_time_ms,
    }))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
