//! HTTP client for the encounter API

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use super::EncounterSource;
use crate::config::ApiConfig;
use crate::error::{FetchError, FetchResult};
use crate::model::{EncounterDetail, EncounterPage, FilterOptions};
use crate::query::QueryDescriptor;

/// Header carrying a per-request correlation id
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL including the API prefix (e.g., "http://localhost:8000/api")
    pub base_url: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for ClientConfig {
    fn from(api: &ApiConfig) -> Self {
        Self {
            base_url: api.base_url.clone(),
            timeout: Duration::from_secs(api.request_timeout_secs),
        }
    }
}

/// Error body FastAPI sends with 4xx answers
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Encounter API client
pub struct EncounterClient {
    client: Client,
    base_url: String,
}

impl EncounterClient {
    pub fn new(config: ClientConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the list endpoint for a descriptor
    pub fn list_url(&self, query: &QueryDescriptor) -> String {
        format!("{}/encounters?{}", self.base_url, query.to_query_string())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> FetchResult<T> {
        let request_id = Uuid::new_v4().to_string();
        debug!(request_id = %request_id, url, "GET");

        let response = self
            .client
            .get(url)
            .header(REQUEST_ID_HEADER, &request_id)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_request_error)?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| {
                warn!(request_id = %request_id, error = %e, "Response did not decode");
                FetchError::from(e)
            });
        }

        let message = error_message(status, &body);
        debug!(request_id = %request_id, status = status.as_u16(), message = %message, "Request failed");

        if status == StatusCode::NOT_FOUND {
            Err(FetchError::NotFound(message))
        } else {
            Err(FetchError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl EncounterSource for EncounterClient {
    async fn list_encounters(&self, query: &QueryDescriptor) -> FetchResult<EncounterPage> {
        self.get_json(&self.list_url(query)).await
    }

    async fn encounter_detail(&self, stay_id: i64) -> FetchResult<EncounterDetail> {
        let url = format!("{}/encounters/{}", self.base_url, stay_id);
        self.get_json(&url).await
    }

    async fn filter_options(&self) -> FetchResult<FilterOptions> {
        let url = format!("{}/filters/options", self.base_url);
        self.get_json(&url).await
    }
}

fn map_request_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_decode() {
        FetchError::Decode(e.to_string())
    } else {
        FetchError::Transport(e.to_string())
    }
}

/// Prefer FastAPI's `detail` string, then the raw body, then the status text
fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{open_detail, refresh_list};
    use crate::query::{FilterChange, Gender};
    use crate::state::{DetailSession, ListSession};
    use axum::extract::{Path, RawQuery, State};
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Seen {
        queries: Arc<Mutex<Vec<String>>>,
        request_ids: Arc<Mutex<Vec<String>>>,
    }

    fn list_item(stay_id: i64) -> serde_json::Value {
        json!({
            "stay_id": stay_id,
            "subject_id": 10000032,
            "hadm_id": null,
            "intime": "2180-07-23T12:35:00",
            "outtime": "2180-07-23T17:50:00",
            "gender": "F",
            "race": "WHITE",
            "arrival_transport": "WALK IN",
            "disposition": "HOME",
            "chiefcomplaint": "Abd pain",
            "acuity": 3,
            "duration_hours": 5.25
        })
    }

    async fn list(
        State(seen): State<Seen>,
        headers: HeaderMap,
        RawQuery(query): RawQuery,
    ) -> Json<serde_json::Value> {
        if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
            seen.request_ids.lock().unwrap().push(id.to_string());
        }
        seen.queries.lock().unwrap().push(query.unwrap_or_default());
        Json(json!({
            "items": [list_item(30000012), list_item(30000013)],
            "total": 2,
            "page": 1,
            "per_page": 20,
            "total_pages": 1
        }))
    }

    async fn detail(Path(stay_id): Path<i64>) -> impl IntoResponse {
        match stay_id {
            1 => (
                AxumStatus::OK,
                Json(json!({
                    "stay_id": 1,
                    "subject_id": 2,
                    "hadm_id": 3,
                    "intime": "2180-07-23T12:35:00",
                    "outtime": "2180-07-23T17:50:00",
                    "gender": "M",
                    "race": null,
                    "arrival_transport": "AMBULANCE",
                    "disposition": "ADMITTED",
                    "duration_hours": 5.25,
                    "triage": {"acuity": 2, "heartrate": 104, "pain": "7", "chiefcomplaint": "Chest pain"},
                    "vitalsigns": [
                        {"charttime": "2180-07-23T14:00:00", "heartrate": 80},
                        {"charttime": "2180-07-23T13:00:00", "heartrate": null, "o2sat": 97}
                    ],
                    "diagnoses": [{"seq_num": 1, "icd_code": "R079", "icd_version": 10, "icd_title": "Chest pain, unspecified"}],
                    "medications": [{"charttime": null, "name": "Aspirin", "source": "medrecon", "gsn": null, "description": null}]
                })),
            ),
            2 => (AxumStatus::OK, Json(json!({"stay_id": "not a number"}))),
            500 => (
                AxumStatus::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "Database unavailable"})),
            ),
            _ => (
                AxumStatus::NOT_FOUND,
                Json(json!({"detail": "Encounter not found"})),
            ),
        }
    }

    async fn options() -> Json<serde_json::Value> {
        Json(json!({
            "genders": ["F", "M"],
            "races": ["ASIAN", "WHITE"],
            "dispositions": ["ADMITTED", "HOME"],
            "chief_complaints": ["Chest pain"],
            "date_range": {"min": "2110-01-11T10:00:00", "max": "2212-04-05T23:59:00"}
        }))
    }

    async fn slow() -> &'static str {
        tokio::time::sleep(Duration::from_secs(2)).await;
        "{}"
    }

    async fn spawn_backend(seen: Seen) -> String {
        let router = Router::new()
            .route("/api/encounters", get(list))
            .route("/api/encounters/:stay_id", get(detail))
            .route("/api/filters/options", get(options))
            .route("/slow/filters/options", get(slow))
            .with_state(seen);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: String) -> EncounterClient {
        EncounterClient::new(ClientConfig {
            base_url,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_sends_descriptor_and_request_id() {
        let seen = Seen::default();
        let base = spawn_backend(seen.clone()).await;
        let client = client(format!("{}/api/", base));

        let query = QueryDescriptor::default().with_filter(
            FilterChange::new()
                .gender(Some(Gender::Female))
                .races(["WHITE", "ASIAN"]),
        );
        let page = client.list_encounters(&query).await.unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].stay_id, 30000012);
        assert_eq!(seen.queries.lock().unwrap()[0], query.to_query_string());
        let ids = seen.request_ids.lock().unwrap();
        assert_eq!(ids.len(), 1);
        assert!(Uuid::parse_str(&ids[0]).is_ok());
    }

    #[tokio::test]
    async fn test_detail_and_options() {
        let base = spawn_backend(Seen::default()).await;
        let client = client(format!("{}/api", base));

        let detail = client.encounter_detail(1).await.unwrap();
        assert_eq!(detail.acuity(), Some(2));
        assert_eq!(detail.vitalsigns.len(), 2);
        assert_eq!(detail.vitalsigns[1].heartrate, None);

        let options = client.filter_options().await.unwrap();
        assert_eq!(options.races, vec!["ASIAN", "WHITE"]);
    }

    #[tokio::test]
    async fn test_error_mapping() {
        let base = spawn_backend(Seen::default()).await;
        let client = client(format!("{}/api", base));

        assert_eq!(
            client.encounter_detail(99).await,
            Err(FetchError::NotFound("Encounter not found".to_string()))
        );
        assert_eq!(
            client.encounter_detail(500).await,
            Err(FetchError::Api {
                status: 500,
                message: "Database unavailable".to_string()
            })
        );
        assert!(matches!(
            client.encounter_detail(2).await,
            Err(FetchError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_timeout_and_unreachable() {
        let base = spawn_backend(Seen::default()).await;
        let slow = EncounterClient::new(ClientConfig {
            base_url: format!("{}/slow", base),
            timeout: Duration::from_millis(200),
        })
        .unwrap();
        assert_eq!(slow.filter_options().await, Err(FetchError::Timeout));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let closed = format!("http://{}/api", listener.local_addr().unwrap());
        drop(listener);

        let unreachable = client(closed);
        assert!(matches!(
            unreachable.filter_options().await,
            Err(FetchError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_sessions_over_http() {
        let base = spawn_backend(Seen::default()).await;
        let client = client(format!("{}/api", base));

        let mut list = ListSession::default();
        assert!(refresh_list(&client, &mut list).await);
        assert_eq!(list.window().map(|w| w.summary()), Some("Showing 1 to 2 of 2 encounters".to_string()));

        let mut detail = DetailSession::new();
        assert!(open_detail(&client, &mut detail, 1).await);
        let chart = detail.chart().and_then(|c| c.chart()).unwrap();
        assert_eq!(chart.points()[0].time_label, "13:00");
        assert_eq!(chart.points()[0].heartrate, None);

        assert!(open_detail(&client, &mut detail, 77).await);
        assert_eq!(detail.view().error().map(|e| e.title()), Some("Encounter Not Found"));
    }
}
