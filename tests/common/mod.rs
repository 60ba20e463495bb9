#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

use psych_client::config::AppConfig;
use psych_client::navigation::RecordingNavigator;
use psych_client::{AppContext, TokenStore};

pub const DOCTOR_EMAIL: &str = "doctor@test.com";
pub const DOCTOR_PASSWORD: &str = "test123456";
/// Registering this address yields a token that is not a JWT.
pub const OPAQUE_TOKEN_EMAIL: &str = "opaque@test.com";

/// In-process stand-in for the remote API, bound on a free local port.
pub struct StubApi {
    pub base_url: String,
    pub state: Arc<StubState>,
}

#[derive(Default)]
pub struct StubState {
    issued: Mutex<HashSet<String>>,
    nonce: AtomicU64,
    /// Authorization header of every request, in arrival order.
    pub auth_headers: Mutex<Vec<Option<String>>>,
    /// Query string of every list request, in arrival order.
    pub list_queries: Mutex<Vec<HashMap<String, String>>>,
}

impl StubState {
    pub fn issue_token(&self, user_id: &str, email: &str, role: &str) -> String {
        let claims = json!({
            "userId": user_id,
            "email": email,
            "role": role,
            "name": "Dra. Test",
            "nonce": self.nonce.fetch_add(1, Ordering::SeqCst),
        });
        let token = sign_claims(&claims);
        self.issued.lock().unwrap().insert(token.clone());
        token
    }

    pub fn revoke_all(&self) {
        self.issued.lock().unwrap().clear();
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let header = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.auth_headers.lock().unwrap().push(header.clone());

        match header.as_deref().and_then(|h| h.strip_prefix("Bearer ")) {
            Some(token) => self.issued.lock().unwrap().contains(token),
            None => false,
        }
    }
}

/// HS256 token over arbitrary claims, signed with the stub's key.
pub fn sign_claims(claims: &Value) -> String {
    encode(&Header::default(), claims, &EncodingKey::from_secret(b"stub-secret")).unwrap_or_default()
}

pub async fn spawn_stub() -> Result<StubApi> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let state = Arc::new(StubState::default());

    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/patients", get(list_patients).post(create_patient))
        .route(
            "/api/patients/:id",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .route("/api/appointments", get(list_appointments))
        .route("/api/dashboard/stats", get(dashboard_stats))
        .route("/api/broken", get(broken))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind stub api")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(StubApi {
        base_url: format!("http://127.0.0.1:{}/api", port),
        state,
    })
}

/// Context wired to the stub with an in-memory token store.
pub fn context_for(stub: &StubApi) -> Result<(AppContext, RecordingNavigator)> {
    let navigator = RecordingNavigator::new();
    let config = AppConfig::for_base_url(&stub.base_url);
    let ctx = AppContext::with_tokens(&config, TokenStore::in_memory(), Arc::new(navigator.clone()))?;
    Ok((ctx, navigator))
}

pub fn unused_base_url() -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    Ok(format!("http://127.0.0.1:{}/api", port))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"success": false, "error": "Token inválido"})),
    )
        .into_response()
}

fn user_json(id: &str, email: &str, role: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "name": "Dra. Test",
        "role": role,
        "created_at": "2024-01-01T00:00:00.000Z",
        "updated_at": "2024-01-01T00:00:00.000Z"
    })
}

fn patient_json(id: &str) -> Value {
    json!({
        "id": id,
        "first_name": "Ana",
        "last_name": "Gómez",
        "date_of_birth": "2000-06-15",
        "gender": "F",
        "phone": "3001234567",
        "doctor_id": "d1"
    })
}

async fn login(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Response {
    if body["email"] == DOCTOR_EMAIL && body["password"] == DOCTOR_PASSWORD {
        let token = state.issue_token("d1", DOCTOR_EMAIL, "doctor");
        Json(json!({
            "success": true,
            "data": {"token": token, "user": user_json("d1", DOCTOR_EMAIL, "doctor")}
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "error": "Credenciales inválidas"})),
        )
            .into_response()
    }
}

async fn register(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if email == "taken@test.com" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": "Email ya registrado"})),
        )
            .into_response();
    }

    if email == OPAQUE_TOKEN_EMAIL {
        return Json(json!({"success": true, "data": {"token": "opaque-not-a-jwt"}})).into_response();
    }

    let role = body["role"].as_str().unwrap_or("doctor").to_string();
    // No user in the payload: the client has to read it from the token.
    let token = state.issue_token("n1", &email, &role);
    (StatusCode::CREATED, Json(json!({"success": true, "data": {"token": token}}))).into_response()
}

async fn refresh(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let token = state.issue_token("d1", DOCTOR_EMAIL, "doctor");
    Json(json!({"success": true, "data": {"token": token}})).into_response()
}

async fn list_patients(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    state.list_queries.lock().unwrap().push(query.clone());

    let page: u32 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: u32 = query.get("limit").and_then(|p| p.parse().ok()).unwrap_or(20);

    Json(json!({
        "success": true,
        "data": [patient_json("p1"), patient_json("p2")],
        // totalPages is deliberately wrong; clients recompute it.
        "pagination": {"page": page, "limit": limit, "total": 45, "totalPages": 1}
    }))
    .into_response()
}

async fn get_patient(State(state): State<Arc<StubState>>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    if id == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "error": "Paciente no encontrado"})),
        )
            .into_response();
    }
    Json(json!({"success": true, "data": patient_json(&id)})).into_response()
}

/// Requires `first_name`; echoes the submitted fields onto a stored patient.
async fn create_patient(State(state): State<Arc<StubState>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    if body["first_name"].as_str().unwrap_or_default().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": "El nombre es obligatorio"})),
        )
            .into_response();
    }

    let mut patient = patient_json("p-new");
    merge_fields(&mut patient, &body);
    (StatusCode::CREATED, Json(json!({"success": true, "data": patient}))).into_response()
}

async fn update_patient(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let mut patient = patient_json(&id);
    merge_fields(&mut patient, &body);
    Json(json!({"success": true, "data": patient})).into_response()
}

fn merge_fields(target: &mut Value, fields: &Value) {
    if let (Some(target), Some(fields)) = (target.as_object_mut(), fields.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
}

async fn delete_patient(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    StatusCode::NO_CONTENT.into_response()
}

/// `delay_ms` holds the response back; `tag` becomes the id of the single appointment returned.
async fn list_appointments(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    state.list_queries.lock().unwrap().push(query.clone());

    if let Some(delay) = query.get("delay_ms").and_then(|d| d.parse().ok()) {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    if query.get("fail").is_some() {
        return Json(json!({"success": false})).into_response();
    }

    let tag = query.get("tag").cloned().unwrap_or_else(|| "a1".to_string());
    Json(json!({
        "success": true,
        "data": [{
            "id": tag,
            "patient_id": "p1",
            "doctor_id": "d1",
            "scheduled_date": "2024-06-15T14:30:00.000Z",
            "duration_minutes": 50,
            "status": "scheduled",
            "appointment_type": "follow_up",
            "notes": null,
            "patient_name": "Ana Gómez"
        }],
        "pagination": {"page": 1, "limit": 100, "total": 1, "totalPages": 1}
    }))
    .into_response()
}

async fn dashboard_stats(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "success": true,
        "data": {"total_patients": 12, "total_appointments": 30, "upcoming_appointments": 4}
    }))
    .into_response()
}

async fn broken() -> Response {
    (StatusCode::BAD_GATEWAY, "<html>upstream down</html>").into_response()
}
