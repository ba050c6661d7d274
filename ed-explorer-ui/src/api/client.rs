//! HTTP API Client
//!
//! Functions for reading from the encounter REST API. Every call resolves to
//! a `FetchResult` so pages can hand it straight to their session.

use ed_explorer::query::QueryDescriptor;
use ed_explorer::{EncounterDetail, EncounterPage, FetchError, FetchResult, FilterOptions};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

/// Default API base URL, relative to the page origin
pub const DEFAULT_API_BASE: &str = "/api";

const API_URL_KEY: &str = "ed_explorer_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Fetch one page of encounters for a descriptor
pub async fn fetch_encounters(query: &QueryDescriptor) -> FetchResult<EncounterPage> {
    let url = format!("{}/encounters?{}", get_api_base(), query.to_query_string());
    get_json(&url).await
}

/// Fetch the full record of one stay
pub async fn fetch_encounter(stay_id: i64) -> FetchResult<EncounterDetail> {
    let url = format!("{}/encounters/{}", get_api_base(), stay_id);
    get_json(&url).await
}

/// Fetch the values available to each filter control
pub async fn fetch_filter_options() -> FetchResult<FilterOptions> {
    let url = format!("{}/filters/options", get_api_base());
    get_json(&url).await
}

async fn get_json<T: DeserializeOwned>(url: &str) -> FetchResult<T> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    if !response.ok() {
        return Err(status_error(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| FetchError::Decode(e.to_string()))
}

async fn status_error(response: Response) -> FetchError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => response.status_text(),
    };

    if status == 404 {
        FetchError::NotFound(message)
    } else {
        FetchError::Api { status, message }
    }
}
