//! Outbound request type handed to a [`Transport`](crate::Transport).

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::Result;

/// HTTP request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET method
    Get,
    /// POST method
    Post,
    /// PUT method
    Put,
    /// PATCH method
    Patch,
    /// DELETE method
    Delete,
    /// HEAD method
    Head,
    /// OPTIONS method
    Options,
}

impl Method {
    /// Parses a method name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            "HEAD" => Some(Self::Head),
            "OPTIONS" => Some(Self::Options),
            _ => None,
        }
    }

    /// Returns the method as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The body of a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// An `application/x-www-form-urlencoded` string.
    Form(String),
    /// A JSON document, normally a flat object of field name to value.
    Json(Value),
}

impl Payload {
    /// Form-encodes name/value pairs in the given order.
    pub fn form<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let pairs: Vec<(&str, &str)> = pairs.into_iter().collect();
        Ok(Self::Form(serde_urlencoded::to_string(pairs)?))
    }

    /// Builds a JSON object from name/value pairs, keeping their order.
    ///
    /// A repeated name keeps its last value.
    pub fn json<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let map: Map<String, Value> = pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
            .collect();
        Self::Json(Value::Object(map))
    }

    /// Returns the content type matching this payload.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Form(_) => "application/x-www-form-urlencoded; charset=UTF-8",
            Self::Json(_) => "application/json",
        }
    }

    /// Returns the payload rendered as a request body.
    pub fn body_string(&self) -> String {
        match self {
            Self::Form(encoded) => encoded.clone(),
            Self::Json(value) => value.to_string(),
        }
    }

    /// Returns whether the payload carries no values.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Form(encoded) => encoded.is_empty(),
            Self::Json(Value::Object(map)) => map.is_empty(),
            Self::Json(Value::Array(items)) => items.is_empty(),
            Self::Json(Value::Null) => true,
            Self::Json(_) => false,
        }
    }
}

/// A fully resolved submission request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Destination URL.
    pub url: String,
    /// Request body.
    pub payload: Payload,
    /// Additional transport settings passed through from configuration.
    pub settings: Map<String, Value>,
}

impl TransportRequest {
    /// Creates a new request without extra settings.
    pub fn new(method: Method, url: impl Into<String>, payload: Payload) -> Self {
        Self {
            method,
            url: url.into(),
            payload,
            settings: Map::new(),
        }
    }

    /// Sets an extra transport setting.
    #[must_use]
    pub fn setting(mut self, key: impl Into<String>, value: Value) -> Self {
        self.settings.insert(key.into(), value);
        self
    }

    /// Layers user-supplied transport settings over this request.
    ///
    /// `type` (or `method`), `url` and `data` replace the computed values.
    /// Every other key is forwarded untouched in [`settings`](Self::settings).
    /// Values of the wrong shape are logged and ignored.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &Map<String, Value>) -> Self {
        for (key, value) in overrides {
            match key.as_str() {
                "type" | "method" => match value.as_str().and_then(Method::parse) {
                    Some(method) => self.method = method,
                    None => warn!(key = %key, value = %value, "ignoring unusable method override"),
                },
                "url" => match value.as_str() {
                    Some(url) => self.url = url.to_string(),
                    None => warn!(value = %value, "ignoring non-string url override"),
                },
                "data" => match value {
                    Value::String(encoded) => self.payload = Payload::Form(encoded.clone()),
                    Value::Object(_) | Value::Array(_) => self.payload = Payload::Json(value.clone()),
                    _ => warn!(value = %value, "ignoring data override that is not a string or mapping"),
                },
                _ => {
                    self.settings.insert(key.clone(), value.clone());
                }
            }
        }
        self
    }
}
