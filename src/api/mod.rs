//! Typed access methods, one family per remote resource.

pub mod envelope;
pub mod query;
pub mod resource;

use std::sync::Arc;

use serde_json::Value;

pub use envelope::{ApiResponse, Page, Pagination};
pub use query::{QueryParams, SortOrder};
pub use resource::{Resource, ResourceApi};

use resource::validate_id;

use crate::config::AppConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::{HttpClient, RequestSpec};
use crate::models::{
    AiRequest, AiResponse, Appointment, Assessment, AssessmentStats, AuthPayload, DashboardStats, Diagnosis,
    DiagnosisStats, Invoice, LoginCredentials, Medication, Patient, Payment, RegisterData,
};
use crate::navigation::Navigator;
use crate::token::TokenStore;

/// Shown for a rejected sign-in when the server sends no text of its own.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Email o contraseña incorrectos";

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Arc<HttpClient>,
}

impl ApiClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http: Arc::new(http) }
    }

    pub fn from_config(config: &AppConfig, tokens: TokenStore, navigator: Arc<dyn Navigator>) -> ClientResult<Self> {
        let http = HttpClient::new(&config.api, tokens, navigator)?.log_requests(config.logging.log_requests);
        Ok(Self::new(http))
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn resource<R: Resource>(&self) -> ResourceApi<'_, R> {
        ResourceApi::new(&self.http)
    }

    pub fn patients(&self) -> ResourceApi<'_, Patient> {
        self.resource()
    }

    pub fn appointments(&self) -> ResourceApi<'_, Appointment> {
        self.resource()
    }

    pub fn diagnoses(&self) -> ResourceApi<'_, Diagnosis> {
        self.resource()
    }

    pub fn medications(&self) -> ResourceApi<'_, Medication> {
        self.resource()
    }

    pub fn assessments(&self) -> ResourceApi<'_, Assessment> {
        self.resource()
    }

    pub fn payments(&self) -> ResourceApi<'_, Payment> {
        self.resource()
    }

    pub fn invoices(&self) -> ResourceApi<'_, Invoice> {
        self.resource()
    }

    // ========== Authentication ==========

    pub async fn login(&self, credentials: &LoginCredentials) -> ClientResult<ApiResponse<AuthPayload>> {
        let response = self
            .http
            .send(RequestSpec::post("/auth/login").json(credentials)?)
            .await
            .map_err(rejected_credentials)?;

        self.keep_token(&response);
        Ok(response)
    }

    pub async fn register(&self, data: &RegisterData) -> ClientResult<ApiResponse<AuthPayload>> {
        let response = self
            .http
            .send(RequestSpec::post("/auth/register").json(data)?)
            .await
            .map_err(rejected_credentials)?;

        self.keep_token(&response);
        Ok(response)
    }

    /// Clears the local token. There is no server-side session to invalidate.
    pub async fn logout(&self) -> ClientResult<ApiResponse<Value>> {
        self.http.tokens().clear();
        Ok(ApiResponse {
            success: true,
            data: None,
            message: None,
            error: None,
            pagination: None,
        })
    }

    /// Exchange the current token for a fresh one.
    pub async fn refresh_token(&self) -> ClientResult<ApiResponse<AuthPayload>> {
        let response: ApiResponse<AuthPayload> = self.http.send(RequestSpec::post("/auth/refresh")).await?;
        self.keep_token(&response);
        Ok(response)
    }

    pub fn current_token(&self) -> Option<String> {
        self.http.tokens().get()
    }

    /// True when a token is held. Says nothing about whether the server still accepts it.
    pub fn is_authenticated(&self) -> bool {
        self.current_token().is_some()
    }

    fn keep_token(&self, response: &ApiResponse<AuthPayload>) {
        if !response.success {
            return;
        }
        if let Some(payload) = response.data.as_ref().filter(|p| !p.token.is_empty()) {
            self.http.tokens().set(&payload.token);
        }
    }

    // ========== Diagnoses ==========

    pub async fn patient_diagnoses(&self, patient_id: &str) -> ClientResult<ApiResponse<Vec<Diagnosis>>> {
        let path = format!("/diagnoses/patient/{}", validate_id("paciente", patient_id)?);
        self.http.send(RequestSpec::get(path)).await
    }

    pub async fn diagnosis_stats(&self) -> ClientResult<ApiResponse<DiagnosisStats>> {
        self.http.send(RequestSpec::get("/diagnoses/stats/overview")).await
    }

    // ========== Assessments ==========

    pub async fn patient_assessments(
        &self,
        patient_id: &str,
        params: &QueryParams,
    ) -> ClientResult<ApiResponse<Vec<Assessment>>> {
        let path = format!("/assessments/patient/{}", validate_id("paciente", patient_id)?);
        self.http.send(RequestSpec::get(path).query(params.to_pairs())).await
    }

    pub async fn assessment_templates(&self) -> ClientResult<ApiResponse<Value>> {
        self.http.send(RequestSpec::get("/assessments/templates")).await
    }

    pub async fn calculate_assessment(&self, assessment_id: &str) -> ClientResult<ApiResponse<Value>> {
        let path = format!("/assessments/{}/calculate", validate_id("evaluación", assessment_id)?);
        self.http.send(RequestSpec::post(path)).await
    }

    pub async fn assessment_stats(&self, patient_id: &str) -> ClientResult<ApiResponse<Vec<AssessmentStats>>> {
        let path = format!("/assessments/stats/patient/{}", validate_id("paciente", patient_id)?);
        self.http.send(RequestSpec::get(path)).await
    }

    // ========== AI & dashboard ==========

    pub async fn chat_with_ai(&self, request: &AiRequest) -> ClientResult<ApiResponse<AiResponse>> {
        self.http.send(RequestSpec::post("/ai/chat").json(request)?).await
    }

    pub async fn dashboard_stats(&self) -> ClientResult<ApiResponse<DashboardStats>> {
        self.http.send(RequestSpec::get("/dashboard/stats")).await
    }
}

/// A 401 from a sign-in endpoint means bad credentials, not an expired session.
fn rejected_credentials(err: ClientError) -> ClientError {
    match err {
        ClientError::Unauthorized(message) => {
            ClientError::Remote(message.unwrap_or_else(|| INVALID_CREDENTIALS_MESSAGE.to_string()))
        }
        other => other,
    }
}
