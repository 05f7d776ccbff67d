use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::AnalysisError;
use crate::models::{ApiResponse, Collection, DataStatus, MatchContext, TeamSide};
use crate::services::{AnalysisReport, MatchAnalyzer};
use crate::store::{sample_data, MatchStore};
use crate::utils::{checked_score, parse_scores};

/// One user's working set: match history plus context. Lives only in memory.
#[derive(Debug, Clone, Default)]
struct Session {
    store: MatchStore,
    context: MatchContext,
}

#[derive(Clone)]
pub struct AppState {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    analyzer: Arc<MatchAnalyzer>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            analyzer: Arc::new(MatchAnalyzer::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn serve(config: &ServerConfig) -> anyhow::Result<()> {
    let app = create_router().with_state(AppState::new());

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Match analyzer API listening on {}", config.bind_address());

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/analysis", post(one_shot_analysis_handler))
        .route("/sessions", post(create_session_handler))
        .route(
            "/sessions/{id}",
            get(get_session_handler).delete(delete_session_handler),
        )
        .route("/sessions/{id}/context", put(set_context_handler))
        .route("/sessions/{id}/matches", delete(clear_matches_handler))
        .route("/sessions/{id}/matches/{collection}", put(set_matches_handler))
        .route("/sessions/{id}/sample", post(load_sample_handler))
        .route("/sessions/{id}/analysis", post(session_analysis_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

// ── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
enum ApiError {
    Analysis(AnalysisError),
    BadRequest(String),
    SessionNotFound(Uuid),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        ApiError::Analysis(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Analysis(err) if err.is_input_error() => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Analysis(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::SessionNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("Session {} not found", id))
            }
        };
        tracing::warn!("Request failed ({}): {}", status, message);
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// ── Request / response bodies ────────────────────────────────────────────────

/// Either "2,1,3" as typed into a form, or a JSON array of integers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ScoreInput {
    Text(String),
    List(Vec<i64>),
}

impl ScoreInput {
    fn to_scores(&self) -> Result<Vec<u32>, AnalysisError> {
        match self {
            ScoreInput::Text(text) => parse_scores(text),
            ScoreInput::List(values) => values.iter().map(|&v| checked_score(v)).collect(),
        }
    }
}

/// A batch of matches: the first list is team 1 (or the team itself), the
/// second the other side.
#[derive(Debug, Clone, Deserialize)]
struct ScorePair {
    scores: ScoreInput,
    opponent_scores: ScoreInput,
}

impl ScorePair {
    fn store_into(&self, store: &mut MatchStore, collection: Collection) -> Result<usize, AnalysisError> {
        let left = self.scores.to_scores()?;
        let right = self.opponent_scores.to_scores()?;
        store.set_collection(collection, &left, &right)
    }
}

#[derive(Debug, Deserialize)]
struct AnalysisRequest {
    #[serde(default)]
    context: MatchContext,
    h2h: Option<ScorePair>,
    team1: Option<ScorePair>,
    team2: Option<ScorePair>,
}

/// One stored match as listed back to the user.
#[derive(Debug, Serialize)]
struct MatchSummary {
    collection: Collection,
    match_number: usize,
    score: String,
    result: &'static str,
    played_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct SessionView {
    id: Uuid,
    context: MatchContext,
    data_status: DataStatus,
    matches: Vec<MatchSummary>,
}

impl SessionView {
    fn new(id: Uuid, session: &Session) -> Self {
        Self {
            id,
            context: session.context.clone(),
            data_status: session.store.data_status(),
            matches: match_summaries(&session.store, &session.context),
        }
    }
}

fn match_summaries(store: &MatchStore, context: &MatchContext) -> Vec<MatchSummary> {
    let team1 = context.team_name(TeamSide::Team1);
    let team2 = context.team_name(TeamSide::Team2);

    let h2h = store.head_to_head().iter().map(|m| {
        let line = m.score_line(TeamSide::Team1);
        (
            Collection::H2h,
            m,
            format!("{} {} - {} {}", team1, line.goals_for, line.goals_against, team2),
        )
    });
    let own = [(Collection::Team1, TeamSide::Team1), (Collection::Team2, TeamSide::Team2)]
        .into_iter()
        .flat_map(|(collection, side)| {
            store.team_series(side).iter().map(move |m| {
                let line = m.score_line(side);
                (
                    collection,
                    m,
                    format!(
                        "{} {} - {} Opponent",
                        context.team_name(side),
                        line.goals_for,
                        line.goals_against
                    ),
                )
            })
        });

    h2h.chain(own)
        .map(|(collection, m, score)| MatchSummary {
            collection,
            match_number: m.match_number(),
            score,
            result: m.result_label(),
            played_at: m.timestamp(),
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct StoredMatches {
    collection: Collection,
    stored: usize,
    data_status: DataStatus,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health_check() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("Match analyzer API is running"))
}

// POST /analysis - Analyze a complete data set in one request
async fn one_shot_analysis_handler(
    State(state): State<AppState>,
    body: Result<Json<AnalysisRequest>, JsonRejection>,
) -> ApiResult<AnalysisReport> {
    let Json(request) = body?;
    let context = request.context.normalized();
    context.validate()?;

    let mut store = MatchStore::new();
    let batches = [
        (Collection::H2h, &request.h2h),
        (Collection::Team1, &request.team1),
        (Collection::Team2, &request.team2),
    ];
    for (collection, pair) in batches {
        if let Some(pair) = pair {
            pair.store_into(&mut store, collection)?;
        }
    }

    let report = state.analyzer.report(&store, &context)?;
    Ok(Json(ApiResponse::success(report)))
}

// POST /sessions - Start an empty session
async fn create_session_handler(State(state): State<AppState>) -> ApiResult<SessionView> {
    let id = Uuid::new_v4();
    let session = Session::default();
    let view = SessionView::new(id, &session);
    state.sessions.write().await.insert(id, session);
    tracing::info!("Created session {}", id);
    Ok(Json(ApiResponse::success(view)))
}

// GET /sessions/{id} - Session data and readiness
async fn get_session_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<SessionView> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(ApiError::SessionNotFound(id))?;
    Ok(Json(ApiResponse::success(SessionView::new(id, session))))
}

// DELETE /sessions/{id}
async fn delete_session_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<String> {
    state
        .sessions
        .write()
        .await
        .remove(&id)
        .ok_or(ApiError::SessionNotFound(id))?;
    Ok(Json(ApiResponse::success(format!("Session {} deleted", id))))
}

// PUT /sessions/{id}/context - Team names, venue, importance and betting lines
async fn set_context_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<MatchContext>, JsonRejection>,
) -> ApiResult<MatchContext> {
    let Json(context) = body?;
    let context = context.normalized();
    context.validate()?;

    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound(id))?;
    session.context = context.clone();
    Ok(Json(ApiResponse::success(context)))
}

// PUT /sessions/{id}/matches/{collection} - Replace one collection
async fn set_matches_handler(
    State(state): State<AppState>,
    Path((id, collection)): Path<(Uuid, String)>,
    body: Result<Json<ScorePair>, JsonRejection>,
) -> ApiResult<StoredMatches> {
    let Json(pair) = body?;
    let collection: Collection = collection.parse()?;

    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound(id))?;
    let stored = pair.store_into(&mut session.store, collection)?;

    let label = match collection {
        Collection::H2h => "H2H".to_string(),
        Collection::Team1 => session.context.team_name(TeamSide::Team1).to_string(),
        Collection::Team2 => session.context.team_name(TeamSide::Team2).to_string(),
    };
    tracing::info!("Session {}: added {} matches for {}", id, stored, label);

    Ok(Json(ApiResponse::success(StoredMatches {
        collection,
        stored,
        data_status: session.store.data_status(),
    })))
}

// DELETE /sessions/{id}/matches - Clear all match data
async fn clear_matches_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<DataStatus> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound(id))?;
    session.store.clear();
    Ok(Json(ApiResponse::success(session.store.data_status())))
}

// POST /sessions/{id}/sample - Replace the session with the demo fixture
async fn load_sample_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<SessionView> {
    let (store, context) = sample_data()?;

    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound(id))?;
    session.store = store;
    session.context = context;
    Ok(Json(ApiResponse::success(SessionView::new(id, session))))
}

// POST /sessions/{id}/analysis - Run the analysis on the session data
async fn session_analysis_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<AnalysisReport> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(ApiError::SessionNotFound(id))?;
    let report = state.analyzer.report(&session.store, &session.context)?;
    Ok(Json(ApiResponse::success(report)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        create_router().with_state(AppState::new())
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_one_shot_analysis() {
        let request = json!({
            "context": { "team1_name": "Arsenal", "team2_name": "Chelsea", "location": "home" },
            "h2h": { "scores": "2,1,3,0,2", "opponent_scores": "1,2,1,1,0" },
            "team1": { "scores": [3, 2, 1, 2, 3], "opponent_scores": [1, 0, 1, 0, 2] }
        });
        let (status, body) = send(&app(), "POST", "/analysis", Some(request)).await;
        assert_eq!(status, StatusCode::OK);

        let p = &body["data"]["result"]["probabilities"];
        let sum = p["team1_win"].as_f64().unwrap()
            + p["team2_win"].as_f64().unwrap()
            + p["draw"].as_f64().unwrap();
        assert!((sum - 100.0).abs() < 1e-6);
        assert_eq!(body["data"]["venue"], "Arsenal Home");
        assert_eq!(body["data"]["team2_performance"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_one_shot_rejects_bad_input() {
        let negative = json!({ "h2h": { "scores": "1,-1,2", "opponent_scores": "0,0,0" } });
        let (status, body) = send(&app(), "POST", "/analysis", Some(negative)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let mismatched = json!({ "h2h": { "scores": [1, 2], "opponent_scores": [0] } });
        let (status, _) = send(&app(), "POST", "/analysis", Some(mismatched)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let bad_context = json!({ "context": { "importance": -1.0 } });
        let (status, _) = send(&app(), "POST", "/analysis", Some(bad_context)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_bodies_are_bad_requests() {
        let app = app();
        let unknown_venue = json!({ "context": { "location": "moon" } });
        let (status, body) = send(&app, "POST", "/analysis", Some(unknown_venue)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("moon"));

        let fractional = json!({ "h2h": { "scores": [1.5, 2], "opponent_scores": [0, 1] } });
        let (status, body) = send(&app, "POST", "/analysis", Some(fractional)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let huge = json!({ "h2h": { "scores": [4294967295u64], "opponent_scores": [1] } });
        let (status, body) = send(&app, "POST", "/analysis", Some(huge)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("maximum"));

        let (_, body) = send(&app, "POST", "/sessions", None).await;
        let id = body["data"]["id"].as_str().unwrap().to_string();
        let wrong_type = json!({ "importance": "high" });
        let (status, body) =
            send(&app, "PUT", &format!("/sessions/{}/context", id), Some(wrong_type)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let missing_field = json!({ "scores": "1,2" });
        let (status, body) =
            send(&app, "PUT", &format!("/sessions/{}/matches/h2h", id), Some(missing_field)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_one_shot_insufficient_data() {
        let request = json!({ "team2": { "scores": "1,2", "opponent_scores": "0,0" } });
        let (status, body) = send(&app(), "POST", "/analysis", Some(request)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("at least 3"));
    }

    #[tokio::test]
    async fn test_session_workflow() {
        let app = app();
        let (status, body) = send(&app, "POST", "/sessions", None).await;
        assert_eq!(status, StatusCode::OK);
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let context = json!({ "team1_name": "", "team2_name": "Chelsea", "importance": 1.5 });
        let (status, body) = send(&app, "PUT", &format!("/sessions/{}/context", id), Some(context)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["team1_name"], "Team 1");

        let batch = json!({ "scores": "2,2", "opponent_scores": "1,0" });
        let (status, body) = send(&app, "PUT", &format!("/sessions/{}/matches/team1", id), Some(batch)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["stored"], 2);
        assert_eq!(body["data"]["data_status"]["matches_needed"], 1);

        let (status, _) = send(&app, "POST", &format!("/sessions/{}/analysis", id), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let batch = json!({ "scores": "0", "opponent_scores": "0" });
        send(&app, "PUT", &format!("/sessions/{}/matches/h2h", id), Some(batch)).await;
        let (status, body) = send(&app, "POST", &format!("/sessions/{}/analysis", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["importance_label"], "Playoff Match");

        let (_, body) = send(&app, "DELETE", &format!("/sessions/{}/matches", id), None).await;
        assert_eq!(body["data"]["total"], 0);

        let (status, _) = send(&app, "DELETE", &format!("/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "GET", &format!("/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sample_session_and_bad_collection() {
        let app = app();
        let (_, body) = send(&app, "POST", "/sessions", None).await;
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(&app, "POST", &format!("/sessions/{}/sample", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["data_status"]["total"], 15);
        assert_eq!(body["data"]["context"]["team1_name"], "Arsenal");
        let matches = body["data"]["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 15);
        assert_eq!(matches[0]["score"], "Arsenal 2 - 1 Chelsea");
        assert_eq!(matches[0]["result"], "team1-win");
        assert_eq!(matches[10]["score"], "Chelsea 2 - 0 Opponent");
        assert_eq!(matches[10]["result"], "win");

        let (status, body) = send(&app, "POST", &format!("/sessions/{}/analysis", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["outcome_label"], "Arsenal Win");
        assert_eq!(body["data"]["total_line"]["over"], true);

        let batch = json!({ "scores": "1", "opponent_scores": "1" });
        let (status, _) = send(&app, "PUT", &format!("/sessions/{}/matches/team3", id), Some(batch)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
