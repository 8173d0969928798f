//! The single component that talks to the cafe backend.
//!
//! Each builder turns one logical call into exactly one [`HttpRequest`];
//! [`ApiGateway::decode`] turns the matching [`HttpResponse`] into a typed
//! [`ApiReply`] or a uniform [`ConsoleError`].
//!
//! # Endpoints
//!
//! | Call | Method | Path | Auth |
//! |------|--------|------|------|
//! | categories | GET | `/categories` | no |
//! | cafes | GET | `/cafes` | admin only |
//! | login | POST | `/auth/jwt/login` (form) | no |
//! | add | POST | `/cafes` (JSON) | yes |
//! | update | PUT | `/cafes?title=&city=` (JSON) | yes |
//! | delete | DELETE | `/cafes?title=&city=` | yes |

use crate::api::request::{HttpMethod, HttpRequest, HttpResponse, Operation};
use crate::domain::cafe::{Cafe, CafeKey, CafePayload, CafeRecord, Category};
use crate::domain::error::{ConsoleError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use url::form_urlencoded;
use url::Url;

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";

/// Decoded success body of a response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply {
    Categories(Vec<Category>),
    Cafes(Vec<Cafe>),
    LoggedIn { access_token: String },
    CafeSaved,
    CafeDeleted,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    access_token: String,
}

/// Request builder and response decoder bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiGateway {
    base: Url,
    categories_url: Url,
    cafes_url: Url,
    login_url: Url,
}

impl ApiGateway {
    /// Creates a gateway for the given base URL.
    ///
    /// A base with a path prefix (`http://host/api`) keeps the prefix; endpoint
    /// paths are appended below it.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Url`] if `base` is not an absolute URL, or
    /// [`ConsoleError::Config`] if it cannot carry a path (e.g. `mailto:`).
    ///
    /// # Example
    ///
    /// ```
    /// use cafe_console::api::ApiGateway;
    ///
    /// let gateway = ApiGateway::new("http://127.0.0.1:8000/api")?;
    /// assert_eq!(gateway.load_categories().url, "http://127.0.0.1:8000/api/categories");
    /// # Ok::<(), cafe_console::ConsoleError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self> {
        let mut base = Url::parse(base.trim())?;
        if base.cannot_be_a_base() {
            return Err(ConsoleError::Config(format!("API URL cannot be a base: {base}")));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);

        Ok(Self {
            categories_url: base.join("categories")?,
            cafes_url: base.join("cafes")?,
            login_url: base.join("auth/jwt/login")?,
            base,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    #[must_use]
    pub fn load_categories(&self) -> HttpRequest {
        Self::request(HttpMethod::Get, &self.categories_url, Operation::LoadCategories, None)
    }

    /// `GET /cafes`; the listing page calls this without a token.
    #[must_use]
    pub fn load_cafes(&self, token: Option<&str>) -> HttpRequest {
        Self::request(HttpMethod::Get, &self.cafes_url, Operation::LoadCafes, token)
    }

    #[must_use]
    pub fn login(&self, username: &str, password: &str) -> HttpRequest {
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("username", username)
            .append_pair("password", password)
            .finish();

        let mut request = Self::request(HttpMethod::Post, &self.login_url, Operation::Login, None);
        request.headers.insert("Content-Type".to_string(), FORM.to_string());
        request.body = body.into_bytes();
        request
    }

    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    pub fn add_cafe(&self, payload: &CafePayload, token: &str) -> Result<HttpRequest> {
        let mut request =
            Self::request(HttpMethod::Post, &self.cafes_url, Operation::AddCafe, Some(token));
        Self::attach_json(&mut request, payload)?;
        Ok(request)
    }

    /// Updates the cafe currently stored under `key`.
    ///
    /// `key` must be the title/city the cafe was loaded with, not the edited values.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    pub fn update_cafe(
        &self,
        key: &CafeKey,
        payload: &CafePayload,
        token: &str,
    ) -> Result<HttpRequest> {
        let url = self.keyed_cafe_url(key);
        let mut request = Self::request(HttpMethod::Put, &url, Operation::UpdateCafe, Some(token));
        Self::attach_json(&mut request, payload)?;
        Ok(request)
    }

    #[must_use]
    pub fn delete_cafe(&self, key: &CafeKey, token: &str) -> HttpRequest {
        let url = self.keyed_cafe_url(key);
        Self::request(HttpMethod::Delete, &url, Operation::DeleteCafe, Some(token))
    }

    fn keyed_cafe_url(&self, key: &CafeKey) -> Url {
        let mut url = self.cafes_url.clone();
        url.query_pairs_mut()
            .append_pair("title", &key.title)
            .append_pair("city", &key.city);
        url
    }

    fn request(
        method: HttpMethod,
        url: &Url,
        operation: Operation,
        token: Option<&str>,
    ) -> HttpRequest {
        let mut headers = BTreeMap::from([("Accept".to_string(), JSON.to_string())]);
        if let Some(token) = token {
            headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        }

        tracing::debug!(operation = %operation, url = %url, authenticated = token.is_some(), "building request");

        HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body: Vec::new(),
            operation,
        }
    }

    fn attach_json(request: &mut HttpRequest, payload: &CafePayload) -> Result<()> {
        request.body = serde_json::to_vec(payload)?;
        request
            .headers
            .insert("Content-Type".to_string(), JSON.to_string());
        Ok(())
    }

    /// Decodes a completed response into a typed reply.
    ///
    /// # Errors
    ///
    /// - [`ConsoleError::Network`] for transport failures
    /// - [`ConsoleError::Http`] for non-2xx responses, carrying the backend
    ///   `detail` (or `message`) or the per-operation fallback
    /// - [`ConsoleError::Json`] / [`ConsoleError::InvalidRecord`] for bodies of
    ///   the wrong shape
    pub fn decode(response: &HttpResponse) -> Result<ApiReply> {
        let operation = response
            .operation
            .ok_or_else(|| ConsoleError::InvalidRecord("response has no operation".to_string()))?;

        let _span = tracing::debug_span!("decode_response", operation = %operation, status = response.status).entered();

        if response.is_transport_failure() {
            let reason = response.body_text();
            tracing::debug!(reason = %reason, "transport failure");
            return Err(ConsoleError::Network(reason));
        }

        if !response.is_success() {
            let detail = error_detail(&response.body)
                .unwrap_or_else(|| operation.fallback_message().to_string());
            tracing::debug!(detail = %detail, "backend rejected request");
            return Err(ConsoleError::Http {
                status: response.status,
                detail,
            });
        }

        match operation {
            Operation::LoadCategories => {
                let categories: Vec<Category> = serde_json::from_slice(&response.body)?;
                tracing::debug!(count = categories.len(), "categories decoded");
                Ok(ApiReply::Categories(categories))
            }
            Operation::LoadCafes => {
                let records: Vec<CafeRecord> = serde_json::from_slice(&response.body)?;
                let cafes = records
                    .into_iter()
                    .map(Cafe::try_from)
                    .collect::<Result<Vec<_>>>()?;
                tracing::debug!(count = cafes.len(), "cafes decoded");
                Ok(ApiReply::Cafes(cafes))
            }
            Operation::Login => {
                let body: TokenBody = serde_json::from_slice(&response.body)?;
                Ok(ApiReply::LoggedIn {
                    access_token: body.access_token,
                })
            }
            Operation::AddCafe | Operation::UpdateCafe => Ok(ApiReply::CafeSaved),
            Operation::DeleteCafe => Ok(ApiReply::CafeDeleted),
        }
    }
}

/// Extracts a user-facing message from an error body.
///
/// Understands `{"detail": "..."}`, FastAPI validation lists
/// (`{"detail": [{"msg": "..."}]}`) and `{"message": "..."}`.
fn error_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;

    match value.get("detail") {
        Some(serde_json::Value::String(detail)) if !detail.is_empty() => {
            return Some(detail.clone());
        }
        Some(serde_json::Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        _ => {}
    }

    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .filter(|m| !m.is_empty())
        .map(ToString::to_string)
}
