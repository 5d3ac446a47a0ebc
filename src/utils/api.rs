use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;
use web_sys::AbortController;

use crate::config;

pub const DEFAULT_TIMEOUT_MS: u32 = 10_000;

/// Flat error surfaced by every API call. Flows log it and degrade; there
/// is no retry anywhere in the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API client is not configured")]
    Unconfigured,
    #[error("request timed out after {0}ms")]
    Timeout(u32),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("request failed: {0}")]
    Network(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Centralized API client attaching the backend base URL, the API key
/// header and a JSON content type to every request.
pub struct ApiClient;

/// Request wrapper with a timeout-triggered abort of the in-flight fetch.
pub struct ApiRequest {
    request: Request,
    timeout_ms: u32,
}

impl ApiRequest {
    fn new(path: &str, method: &str) -> Self {
        let full_url = format!("{}{}", config::get_backend_url(), path);
        let request = match method {
            "POST" => Request::post(&full_url),
            _ => Request::get(&full_url),
        }
        .header("x-api-key", &config::get_api_key())
        .header("Content-Type", "application/json");

        Self {
            request,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Add a header to the request, overriding any default of the same name.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.request = self.request.header(name, value);
        self
    }

    /// Override the default 10s timeout.
    pub fn timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize>(mut self, data: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_string(data)?;
        self.request = self.request.body(body);
        Ok(self)
    }

    /// Send the request and decode the JSON body of a successful response.
    ///
    /// A response that does not arrive within the timeout is aborted through
    /// the attached `AbortController` and surfaces as `ApiError::Timeout`.
    /// Non-2xx responses are reported with the body's `message` field when
    /// one can be parsed, or a generic `API Error: <status>` otherwise.
    pub async fn send_json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        if !config::is_configured() {
            gloo_console::log!("API client unconfigured, skipping request");
            return Err(ApiError::Unconfigured);
        }

        let timed_out = Rc::new(Cell::new(false));
        let controller = AbortController::new().ok();

        let request = match &controller {
            Some(controller) => self.request.abort_signal(Some(&controller.signal())),
            None => self.request,
        };

        let abort_timer = controller.map(|controller| {
            let timed_out = timed_out.clone();
            gloo_timers::callback::Timeout::new(self.timeout_ms, move || {
                timed_out.set(true);
                controller.abort();
            })
        });

        let result = request.send().await;
        if let Some(timer) = abort_timer {
            timer.cancel();
        }

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                if timed_out.get() {
                    return Err(ApiError::Timeout(self.timeout_ms));
                }
                return Err(ApiError::Network(err.to_string()));
            }
        };

        if !response.ok() {
            let status = response.status();
            let message = match response.json::<ErrorBody>().await {
                Ok(ErrorBody {
                    message: Some(message),
                }) => message,
                _ => format!("API Error: {}", status),
            };
            return Err(ApiError::Api { status, message });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }
}

impl ApiClient {
    /// Create a GET request against the configured backend.
    pub fn get(path: &str) -> ApiRequest {
        ApiRequest::new(path, "GET")
    }

    /// Create a POST request against the configured backend.
    pub fn post(path: &str) -> ApiRequest {
        ApiRequest::new(path, "POST")
    }
}
