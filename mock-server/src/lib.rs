use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    body::Bytes,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode, Uri},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

/// Languages the fake scorer accepts.
pub const SUPPORTED_LANGS: [&str; 3] = ["en", "de", "ru"];

const TRAITS: [(&str, [&str; 3]); 5] = [
    ("openness", ["imagination", "curiosity", "artistic_interests"]),
    ("conscientiousness", ["orderliness", "dutifulness", "self_discipline"]),
    ("extraversion", ["cheerfulness", "assertiveness", "excitement_seeking"]),
    ("agreeableness", ["empathy", "trust", "cooperation"]),
    ("neuroticism", ["anxiety", "anger", "vulnerability"]),
];

const LEXICON: [(&str, &str); 10] = [
    ("curious", "openness"),
    ("creative", "openness"),
    ("organized", "conscientiousness"),
    ("careful", "conscientiousness"),
    ("happy", "extraversion"),
    ("brave", "extraversion"),
    ("kind", "agreeableness"),
    ("friendly", "agreeableness"),
    ("anxious", "neuroticism"),
    ("angry", "neuroticism"),
];

/// A request as the mock server saw it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

#[derive(Deserialize)]
pub struct ScoreRequest {
    pub text: String,
    #[serde(default)]
    pub inventories: Vec<String>,
    #[serde(default = "default_lang")]
    pub lang: String,
}

#[derive(Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
}

fn default_lang() -> String {
    "en".to_string()
}

/// Shared server state. Clone it before building the router to inspect the
/// request log from a test.
#[derive(Clone, Debug)]
pub struct AppState {
    api_key: Arc<str>,
    request_limit: Option<usize>,
    accepted: Arc<AtomicUsize>,
    pub requests: Arc<RwLock<Vec<RecordedRequest>>>,
}

impl AppState {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: Arc::from(api_key),
            request_limit: None,
            accepted: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Answer 429 once `limit` requests have been accepted.
    pub fn with_request_limit(mut self, limit: usize) -> Self {
        self.request_limit = Some(limit);
        self
    }

    /// Admission check shared by every endpoint: token, then rate limit.
    /// Only admitted requests count against the limit.
    fn admit(&self, headers: &HeaderMap) -> Result<(), StatusCode> {
        let expected = format!("Token {}", self.api_key);
        match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
            Some(value) if value == expected => {}
            _ => return Err(StatusCode::UNAUTHORIZED),
        }
        if let Some(limit) = self.request_limit {
            self.accepted
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| (n < limit).then_some(n + 1))
                .map_err(|_| StatusCode::TOO_MANY_REQUESTS)?;
        }
        Ok(())
    }

    async fn record(&self, method: &Method, uri: &Uri, headers: &HeaderMap, body: &[u8]) {
        let entry = RecordedRequest {
            method: method.to_string(),
            path: uri.path().to_string(),
            authorization: headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body: String::from_utf8_lossy(body).into_owned(),
        };
        self.requests.write().await.push(entry);
    }
}

pub fn app(api_key: &str) -> Router {
    app_with_state(AppState::new(api_key))
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/score", post(score))
        .route("/inventories", get(inventories))
        .route("/item/classify", post(classify))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock sentino server listening");
    }
    axum::serve(listener, app_with_state(state)).await
}

async fn score(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, StatusCode> {
    state.record(&method, &uri, &headers, &body).await;
    state.admit(&headers)?;
    let input: ScoreRequest = serde_json::from_slice(&body).map_err(|_| StatusCode::BAD_REQUEST)?;
    if input.text.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    if !SUPPORTED_LANGS.contains(&input.lang.as_str()) {
        return Err(StatusCode::NOT_ACCEPTABLE);
    }
    if input.inventories.iter().any(|inv| inv != "big5") {
        return Err(StatusCode::BAD_REQUEST);
    }
    debug!(lang = %input.lang, "scoring text");
    Ok(Json(big5_scores(&input.text)))
}

async fn inventories(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    state.record(&method, &uri, &headers, &[]).await;
    state.admit(&headers)?;
    Ok(Json(json!([
        {"name": "big5", "title": "Big Five", "traits": TRAITS.map(|(name, _)| name)},
        {"name": "neo", "title": "NEO Personality Inventory", "traits": TRAITS.map(|(name, _)| name)},
    ])))
}

async fn classify(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, StatusCode> {
    state.record(&method, &uri, &headers, &body).await;
    state.admit(&headers)?;
    let input: ClassifyRequest =
        serde_json::from_slice(&body).map_err(|_| StatusCode::BAD_REQUEST)?;
    if input.text.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(category_probabilities(&input.text)))
}

/// Share of lexicon hits per trait, as a probability in `[0, 1]`.
fn trait_weights(text: &str) -> Vec<(&'static str, f64)> {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    TRAITS
        .iter()
        .map(|(name, _)| {
            let hits = words
                .iter()
                .filter(|w| LEXICON.iter().any(|(word, t)| t == name && word == *w))
                .count();
            let weight = if hits == 0 { 0.1 } else { (0.5 + 0.2 * hits as f64).min(0.95) };
            (*name, weight)
        })
        .collect()
}

/// Trait → facet → score, the shape the real scorer returns for big5.
pub fn big5_scores(text: &str) -> Value {
    let mut out = Map::new();
    for ((name, facets), (_, weight)) in TRAITS.iter().zip(trait_weights(text)) {
        let facets: Map<String, Value> = facets
            .iter()
            .map(|facet| (facet.to_string(), json!(weight)))
            .collect();
        out.insert(name.to_string(), Value::Object(facets));
    }
    Value::Object(out)
}

/// Category → probability, the shape the real classifier returns.
pub fn category_probabilities(text: &str) -> Value {
    let out: Map<String, Value> = trait_weights(text)
        .into_iter()
        .map(|(name, weight)| (name.to_string(), json!(weight)))
        .collect();
    Value::Object(out)
}
