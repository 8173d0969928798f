//! Transport-neutral HTTP request and response types.
//!
//! The plugin never performs I/O itself. An [`HttpRequest`] is handed to the
//! runtime as an action, and the runtime later feeds the completion back as an
//! [`HttpResponse`]. The [`Operation`] tag travels in the request context so the
//! response can be routed to the right handler.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Context key carrying the [`Operation`] name through the host round trip.
pub const OPERATION_CONTEXT_KEY: &str = "operation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// Logical API call a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    LoadCategories,
    LoadCafes,
    Login,
    AddCafe,
    UpdateCafe,
    DeleteCafe,
}

impl Operation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoadCategories => "load_categories",
            Self::LoadCafes => "load_cafes",
            Self::Login => "login",
            Self::AddCafe => "add_cafe",
            Self::UpdateCafe => "update_cafe",
            Self::DeleteCafe => "delete_cafe",
        }
    }

    /// Message used when a failed response carries no detail of its own.
    #[must_use]
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::LoadCategories => "Failed to load categories",
            Self::LoadCafes => "Failed to load cafes",
            Self::Login => "Login failed",
            Self::AddCafe => "Error adding cafe",
            Self::UpdateCafe => "Error editing cafe",
            Self::DeleteCafe => "Error deleting cafe",
        }
    }

    #[must_use]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::AddCafe | Self::UpdateCafe | Self::DeleteCafe)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "load_categories" => Self::LoadCategories,
            "load_cafes" => Self::LoadCafes,
            "login" => Self::Login,
            "add_cafe" => Self::AddCafe,
            "update_cafe" => Self::UpdateCafe,
            "delete_cafe" => Self::DeleteCafe,
            other => return Err(format!("unknown operation: {other}")),
        })
    }
}

/// A fully built request ready to hand to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
    pub operation: Operation,
}

impl HttpRequest {
    /// Context map attached to the host call.
    #[must_use]
    pub fn context(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(
            OPERATION_CONTEXT_KEY.to_string(),
            self.operation.as_str().to_string(),
        )])
    }

    /// Body interpreted as UTF-8, for tests and logging.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A completed request as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
    pub operation: Option<Operation>,
}

impl HttpResponse {
    /// Rebuilds a response from the raw host event parts.
    #[must_use]
    pub fn from_parts(
        status: u16,
        headers: BTreeMap<String, String>,
        body: Vec<u8>,
        context: &BTreeMap<String, String>,
    ) -> Self {
        let operation = context
            .get(OPERATION_CONTEXT_KEY)
            .and_then(|name| name.parse().ok());
        Self {
            status,
            headers,
            body,
            operation,
        }
    }

    /// Convenience constructor for a response to a known operation.
    #[must_use]
    pub fn for_operation(operation: Operation, status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: BTreeMap::from([(
                "content-type".to_string(),
                "application/json".to_string(),
            )]),
            body: body.into(),
            operation: Some(operation),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Zellij reports transport failures as status 400 with no headers and the
    /// error text as body. A real HTTP 400 always carries headers.
    #[must_use]
    pub fn is_transport_failure(&self) -> bool {
        self.status == 400 && self.headers.is_empty()
    }

    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
