//! HTTP transport for the reporting client.
//!
//! The client only needs "send a request, get status + body back", so the
//! seam is a small trait. [`FetchTransport`] implements it over the browser
//! `fetch` API.

use async_trait::async_trait;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::error::{FingerprintError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request. Transport failures are `Err`; any HTTP status is `Ok`.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// `window.fetch` transport.
#[derive(Debug, Default, Clone)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        log::debug!("🌐 {} {}", request.method.as_str(), request.url);

        let opts = RequestInit::new();
        opts.set_method(request.method.as_str());
        opts.set_mode(RequestMode::Cors);
        if let Some(body) = &request.body {
            opts.set_body(&wasm_bindgen::JsValue::from_str(body));
        }

        let req = Request::new_with_str_and_init(&request.url, &opts)
            .map_err(|e| FingerprintError::Network(format!("Failed to create request: {:?}", e)))?;
        for (name, value) in &request.headers {
            req.headers()
                .set(name, value)
                .map_err(|e| FingerprintError::Network(format!("Failed to set header {}: {:?}", name, e)))?;
        }

        let window = web_sys::window()
            .ok_or_else(|| FingerprintError::Network("No window object".into()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&req))
            .await
            .map_err(|e| FingerprintError::Network(format!("Fetch failed: {:?}", e)))?;

        let resp: Response = resp_value
            .dyn_into()
            .map_err(|_| FingerprintError::Network("Failed to cast to Response".into()))?;

        let text = JsFuture::from(
            resp.text()
                .map_err(|e| FingerprintError::Network(format!("Failed to get text: {:?}", e)))?,
        )
        .await
        .map_err(|e| FingerprintError::Network(format!("Failed to read text: {:?}", e)))?;

        Ok(HttpResponse {
            status: resp.status(),
            body: text.as_string().unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        let ok = HttpResponse {
            status: 200,
            body: String::new(),
        };
        assert!(ok.is_success());
        for status in [199, 302, 401, 402, 500] {
            assert!(!HttpResponse { status, body: String::new() }.is_success());
        }
    }
}
