//! HTTP adapter around the routing core.
//!
//! Two endpoints expose the same pipeline: `/v1/routing` accepts the
//! free-form json body and `/v1/rpc/routing` the typed request shape. Both
//! answer `200` with the solved routes, `400` for parse and validation
//! failures and `500` when no feasible assignment exists.

use actix_web::http::StatusCode;
use actix_web::{error, middleware, post, web, App, Error, HttpResponse, HttpServer};
use clap::Parser;
use futures_util::StreamExt;
use routing_core::format::problem::{parse_model, RoutingRequest};
use routing_core::format::solution::SolutionResponse;
use routing_core::format::ParseError;
use routing_core::models::RoutingModel;
use routing_core::problem::RoutingProblem;
use serde_json::json;


const MAX_SIZE: usize = 262_144;

#[derive(Debug, Parser)]
#[command(name = "routing-api", about = "Vehicle routing solver service")]
struct Args {
    /// Address the http server binds to.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,
    /// Number of http worker threads.
    #[arg(long, default_value_t = 4)]
    workers: usize,
}

async fn collect_payload(mut payload: web::Payload) -> Result<web::BytesMut, Error> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk?;
        // limit max size of in-memory payload
        if (body.len() + chunk.len()) > MAX_SIZE {
            return Err(error::ErrorBadRequest("overflow"));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Runs validation and the solve on an ingested model, mapping each error
/// kind to its status code.
///
/// Returns the status and json body rather than `HttpResponse` because this
/// runs inside `web::block`, whose closure result must be `Send`.
fn run_model(model: RoutingModel) -> (StatusCode, serde_json::Value) {
    let problem = RoutingProblem::builder()
        .duration_matrix(model.duration_matrix)
        .depot_config(model.depot_config)
        .num_vehicles(model.num_vehicles)
        .time_limit(model.time_limit_seconds)
        .with_capacity(model.with_capacity)
        .with_pickup_delivery(model.with_pickup_delivery)
        .with_time_window(model.with_time_window)
        .with_service_time(model.with_service_time)
        .with_drop_penalties(model.with_drop_penalties)
        .with_vehicle_break_time(model.with_vehicle_break_time)
        .build();

    let problem = match problem {
        Ok(problem) => problem,
        Err(error) => {
            return (StatusCode::BAD_REQUEST, json!({ "status": "error", "errors": error.to_string() }))
        }
    };

    match problem.solve() {
        Ok(routes) => (StatusCode::OK, json!(SolutionResponse::success(routes))),
        Err(error) => {
            (StatusCode::INTERNAL_SERVER_ERROR, json!({ "status": "error", "errors": error.to_string() }))
        }
    }
}

#[post("/v1/routing")]
async fn routing(payload: web::Payload) -> Result<HttpResponse, Error> {
    let body = collect_payload(payload).await?;

    let tree: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(tree) => tree,
        Err(_) => return Ok(HttpResponse::BadRequest().json(ParseError::new("json is null").to_response())),
    };
    let model = match parse_model(&tree) {
        Ok(model) => model,
        Err(parse_error) => return Ok(HttpResponse::BadRequest().json(parse_error.to_response())),
    };

    let (status, body) = web::block(move || run_model(model)).await.map_err(error::ErrorInternalServerError)?;
    Ok(HttpResponse::build(status).json(body))
}

#[post("/v1/rpc/routing")]
async fn routing_rpc(request: web::Json<RoutingRequest>) -> Result<HttpResponse, Error> {
    let model = RoutingModel::from(request.into_inner());
    let (status, body) = web::block(move || run_model(model)).await.map_err(error::ErrorInternalServerError)?;
    Ok(HttpResponse::build(status).json(body))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let args = Args::parse();

    log::info!("routing service listening on {}", args.bind);
    HttpServer::new(|| App::new().wrap(middleware::Logger::default()).service(routing).service(routing_rpc))
        .workers(args.workers)
        .bind(&args.bind)?
        .run()
        .await
}
