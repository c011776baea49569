use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rand::Rng as _;
use relicboard_engine::{Board, BoardShapeError, ItemCatalog, PlacedItem};
use relicboard_evaluator::{ScoreEvaluator, ScoreRules};
use relicboard_search::{PlacementSearcher, SearchParams, SearchSeed};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{
    command::{CatalogArg, RulesArg},
    schema::{
        request::{OptimizeRequest, ParseItemError},
        result::{ErrorResponse, HealthResponse, OptimizeResponse},
    },
};

const DEFAULT_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ServeArg {
    #[clap(flatten)]
    catalog: CatalogArg,
    #[clap(flatten)]
    rules: RulesArg,
    /// Address to listen on
    #[arg(long, default_value = DEFAULT_ADDR)]
    addr: SocketAddr,
}

#[derive(Debug, Clone)]
struct AppState {
    catalog: Arc<ItemCatalog>,
    rules: Arc<ScoreRules>,
    params: SearchParams,
}

/// A request rejected before any search runs.
#[derive(Debug, derive_more::Display, derive_more::Error)]
enum InvalidRequest {
    #[display("missing required field: {field}")]
    MissingField { field: &'static str },
    #[display("invalid request body: {message}")]
    Body { message: String },
    #[display("invalid board size: {source}")]
    BoardSize { source: BoardShapeError },
    #[display("invalid item {id}: {source}")]
    Item { id: String, source: ParseItemError },
}

impl IntoResponse for InvalidRequest {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// A validated optimization request.
#[derive(Debug, Clone)]
struct OptimizeJob {
    items: Vec<PlacedItem>,
    width: usize,
    height: usize,
}

impl TryFrom<OptimizeRequest> for OptimizeJob {
    type Error = InvalidRequest;

    fn try_from(request: OptimizeRequest) -> Result<Self, Self::Error> {
        let missing = |field| InvalidRequest::MissingField { field };
        let items = request.items.ok_or_else(|| missing("items"))?;
        let width = request.width.ok_or_else(|| missing("width"))?;
        let height = request.height.ok_or_else(|| missing("height"))?;
        Board::check_size(width, height).map_err(|source| InvalidRequest::BoardSize { source })?;
        for item in &items {
            item.validate().map_err(|source| InvalidRequest::Item {
                id: item.id.clone(),
                source,
            })?;
        }
        Ok(Self {
            items: items.into_iter().map(PlacedItem::from).collect(),
            width,
            height,
        })
    }
}

pub(crate) fn run(arg: &ServeArg) -> anyhow::Result<()> {
    let ServeArg {
        catalog,
        rules,
        addr,
    } = arg;

    let state = AppState {
        catalog: Arc::new(catalog.load()?),
        rules: Arc::new(rules.to_score_rules()),
        params: SearchParams::default(),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(serve(*addr, state))
}

async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to listen on {addr}"))?;
    info!(%addr, "serving optimizer");
    eprintln!("Optimizer listening on http://{addr}");
    eprintln!("  POST /api/v1/optimize");
    eprintln!("  GET  /api/v1/health");

    axum::serve(listener, router(state))
        .await
        .context("Server stopped unexpectedly")?;
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/optimize", post(optimize))
        .route("/api/v1/health", get(health))
        .with_state(state)
}

async fn optimize(
    State(state): State<AppState>,
    payload: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<Response, InvalidRequest> {
    let Json(request) = payload.map_err(|rejection| InvalidRequest::Body {
        message: rejection.body_text(),
    })?;
    let job = OptimizeJob::try_from(request)?;
    let seed: SearchSeed = rand::rng().random();

    let response = match tokio::task::spawn_blocking(move || run_job(&state, job, seed)).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            error!(%seed, error = %e, "optimization task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    };
    Ok(response)
}

fn run_job(state: &AppState, job: OptimizeJob, seed: SearchSeed) -> OptimizeResponse {
    let OptimizeJob {
        items,
        width,
        height,
    } = job;
    let evaluator = ScoreEvaluator::with_rules(&state.catalog, ScoreRules::clone(&state.rules));
    let searcher = PlacementSearcher::new(&state.catalog, &evaluator);
    let item_count = items.len();
    let outcome = searcher.find_optimal_placement(
        items,
        width,
        height,
        state.params.iterations,
        &mut seed.rng(),
    );
    info!(
        %seed,
        item_count,
        width,
        height,
        score = outcome.score,
        "optimized placement"
    );
    OptimizeResponse {
        board: outcome.board,
        score: outcome.score,
    }
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        items: state.catalog.len(),
    })
}

#[cfg(test)]
mod tests {
    use relicboard_engine::{ArtifactDefinition, SlateDefinition};
    use serde_json::json;

    use super::*;

    fn state(iterations: usize) -> AppState {
        let artifacts: Vec<ArtifactDefinition> = serde_json::from_value(json!([
            { "id": "crown", "name": "Crown", "rarity": "Legendary" }
        ]))
        .unwrap();
        let slates: Vec<SlateDefinition> = serde_json::from_value(json!([
            { "id": "push", "name": "Push", "buffcoords": [[1, 0, 5, "none"]] }
        ]))
        .unwrap();
        AppState {
            catalog: Arc::new(ItemCatalog::new(artifacts, slates)),
            rules: Arc::new(ScoreRules::default()),
            params: SearchParams { iterations },
        }
    }

    fn request(value: serde_json::Value) -> OptimizeRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let cases = [
            (json!({ "width": 2, "height": 2 }), "items"),
            (json!({ "items": [], "height": 2 }), "width"),
            (json!({ "items": [], "width": 2 }), "height"),
        ];
        for (body, field) in cases {
            let err = OptimizeJob::try_from(request(body)).unwrap_err();
            assert!(matches!(err, InvalidRequest::MissingField { field: f } if f == field));
        }
    }

    #[test]
    fn test_oversized_board_is_rejected() {
        for (width, height) in [(1_usize << 33, 1_usize << 33), (1_000_000, 1_000_000), (10_001, 1)] {
            let err = OptimizeJob::try_from(request(json!({
                "items": [{ "id": "crown" }],
                "width": width,
                "height": height
            })))
            .unwrap_err();
            assert!(matches!(err, InvalidRequest::BoardSize { .. }));
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }

        let job = OptimizeJob::try_from(request(json!({
            "items": [{ "id": "crown" }],
            "width": 100,
            "height": 100
        })))
        .unwrap();
        assert_eq!((job.width, job.height), (100, 100));
    }

    #[test]
    fn test_non_positive_priority_is_rejected() {
        for priority in [0.0, -1.5] {
            let err = OptimizeJob::try_from(request(json!({
                "items": [{ "id": "crown" }, { "id": "push", "priority": priority }],
                "width": 2,
                "height": 2
            })))
            .unwrap_err();
            assert!(matches!(&err, InvalidRequest::Item { id, .. } if id == "push"));
        }
    }

    #[test]
    fn test_invalid_request_is_bad_request() {
        let response = InvalidRequest::MissingField { field: "items" }.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_run_job_places_items() {
        let state = state(200);
        let job = OptimizeJob::try_from(request(json!({
            "items": [{ "id": "crown" }, { "id": "push", "priority": 1.0, "upgrade": 0 }],
            "width": 2,
            "height": 1
        })))
        .unwrap();

        let response = run_job(&state, job, SearchSeed::from_u128(99));
        assert_eq!(response.board.item_count(), 2);
        assert!((response.score - 12.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_optimize_handler() {
        let body = request(json!({ "items": [{ "id": "crown", "upgrade": 2 }], "width": 3, "height": 3 }));
        let response = optimize(State(state(10)), Ok(Json(body))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = request(json!({ "items": [{ "id": "crown" }], "height": 3 }));
        let err = optimize(State(state(10)), Ok(Json(body))).await.unwrap_err();
        assert_eq!(err.to_string(), "missing required field: width");
    }

    #[tokio::test]
    async fn test_health_reports_catalog_size() {
        let Json(response) = health(State(state(0))).await;
        assert_eq!(response.status, "ok");
        assert_eq!(response.items, 2);
    }
}
