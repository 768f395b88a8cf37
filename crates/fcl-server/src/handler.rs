use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Json;
use serde::Deserialize;
use serde_json::json;

use fcl_engine::{
    CalendarInfo, ChallengeInfo, EventFilter, EventKind, LedgerEvent, LedgerStats, MemberInfo,
    Mutation, MutationEngine, MutationReceipt, WorkoutSessionInfo,
};
use fcl_types::Identity;

use crate::auth::{AuthProvider, Credentials};
use crate::error::{ServerError, ServerResult};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MutationEngine>,
    pub auth: Arc<dyn AuthProvider>,
}

fn parse_identity(raw: &str) -> ServerResult<Identity> {
    raw.parse()
        .map_err(|_| ServerError::BadRequest("identity must not be empty".into()))
}

pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn info_handler() -> Json<serde_json::Value> {
    Json(json!({
        "name": "fcl-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn stats_handler(State(state): State<AppState>) -> ServerResult<Json<LedgerStats>> {
    Ok(Json(state.engine.stats()?))
}

pub async fn calendar_handler(State(state): State<AppState>) -> Json<CalendarInfo> {
    Json(state.engine.calendar())
}

pub async fn member_handler(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> ServerResult<Json<MemberInfo>> {
    let who = parse_identity(&identity)?;
    Ok(Json(state.engine.member_info(&who)?))
}

pub async fn session_handler(
    State(state): State<AppState>,
    Path((identity, ordinal)): Path<(String, u64)>,
) -> ServerResult<Json<WorkoutSessionInfo>> {
    let who = parse_identity(&identity)?;
    Ok(Json(state.engine.workout_session(&who, ordinal)?))
}

pub async fn challenge_handler(
    State(state): State<AppState>,
    Path(challenge_id): Path<u64>,
) -> ServerResult<Json<ChallengeInfo>> {
    Ok(Json(state.engine.challenge_info(challenge_id)?))
}

/// Query string accepted by the events listing.
#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    pub kind: Option<EventKind>,
    pub subject: Option<String>,
    pub challenge_id: Option<u64>,
    pub after_seq: Option<u64>,
}

impl EventsQuery {
    fn into_filter(self) -> ServerResult<EventFilter> {
        Ok(EventFilter {
            kinds: self.kind.map(|k| vec![k]),
            subject: self.subject.as_deref().map(parse_identity).transpose()?,
            challenge_id: self.challenge_id,
            after_seq: self.after_seq,
        })
    }
}

pub async fn events_handler(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> ServerResult<Json<Vec<LedgerEvent>>> {
    let filter = query.into_filter()?;
    Ok(Json(state.engine.events(&filter)?))
}

pub async fn mutation_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mutation): Json<Mutation>,
) -> ServerResult<Json<MutationReceipt>> {
    let caller = state
        .auth
        .authenticate(&Credentials::from_headers(&headers))
        .await?;
    let engine = Arc::clone(&state.engine);
    let receipt = tokio::task::spawn_blocking(move || engine.submit(&caller, mutation))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))??;
    Ok(Json(receipt))
}
