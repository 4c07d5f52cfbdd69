//! Order sources: where a refresh cycle gets the current order list.

use crate::error::{FetchErrorKind, Result, TrackerError};
use serde_json::Value;
use std::path::PathBuf;

/// Opaque credential handed to a source on every fetch.
#[derive(Clone, Default)]
pub struct Credential {
    token: Option<String>,
}

impl Credential {
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    #[must_use]
    pub const fn anonymous() -> Self {
        Self { token: None }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Fetch capability for the current list of order snapshots.
///
/// Implementations own their timeouts; the pipeline never cancels a fetch.
pub trait OrderSource {
    fn fetch(&mut self, credential: &Credential) -> Result<Vec<Value>>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

impl<T: OrderSource + ?Sized> OrderSource for Box<T> {
    fn fetch(&mut self, credential: &Credential) -> Result<Vec<Value>> {
        (**self).fetch(credential)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Accept either a bare array of orders or an object wrapping one under
/// `orders` or `response`.
pub fn extract_orders(body: Value) -> Result<Vec<Value>> {
    match body {
        Value::Array(orders) => Ok(orders),
        Value::Object(mut map) => match map.remove("orders").or_else(|| map.remove("response")) {
            Some(Value::Array(orders)) => Ok(orders),
            _ => Err(TrackerError::fetch(
                "decoding order list",
                FetchErrorKind::InvalidResponse(
                    "expected an array or an object with an 'orders' array".to_string(),
                ),
            )),
        },
        other => Err(TrackerError::fetch(
            "decoding order list",
            FetchErrorKind::InvalidResponse(format!("unexpected JSON value: {other}")),
        )),
    }
}

// ============================================================================
// File source
// ============================================================================

/// Reads the order list from a JSON file, typically an export of the
/// upstream API response.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OrderSource for JsonFileSource {
    fn fetch(&mut self, _credential: &Credential) -> Result<Vec<Value>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            TrackerError::fetch(
                format!("reading {}", self.path.display()),
                FetchErrorKind::Unreachable(e.to_string()),
            )
        })?;
        let body: Value = serde_json::from_str(&content).map_err(|e| {
            TrackerError::fetch(
                format!("parsing {}", self.path.display()),
                FetchErrorKind::InvalidResponse(e.to_string()),
            )
        })?;
        extract_orders(body)
    }

    fn name(&self) -> &str {
        "file"
    }
}

// ============================================================================
// HTTP source (feature-gated)
// ============================================================================

/// Fetches the order list with a blocking GET, authenticating with the
/// credential's bearer token when present.
#[cfg(feature = "http")]
pub struct HttpOrderSource {
    url: String,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpOrderSource {
    pub fn new(url: impl Into<String>, timeout: std::time::Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self {
            url: url.into(),
            client,
        }
    }
}

#[cfg(feature = "http")]
impl OrderSource for HttpOrderSource {
    fn fetch(&mut self, credential: &Credential) -> Result<Vec<Value>> {
        let mut request = self.client.get(&self.url);
        if let Some(token) = credential.token() {
            request = request.bearer_auth(token);
        }
        let response = request.send().map_err(|e| {
            TrackerError::fetch(
                format!("GET {}", self.url),
                FetchErrorKind::Unreachable(e.to_string()),
            )
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::fetch(
                format!("GET {}", self.url),
                FetchErrorKind::Rejected(format!("HTTP {status}")),
            ));
        }
        let body: Value = response.json().map_err(|e| {
            TrackerError::fetch(
                format!("decoding response from {}", self.url),
                FetchErrorKind::InvalidResponse(e.to_string()),
            )
        })?;
        extract_orders(body)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_orders_accepts_bare_array() {
        let orders = extract_orders(json!([{"a": 1}, {"a": 2}])).unwrap();
        assert_eq!(orders.len(), 2);
    }

    #[test]
    fn test_extract_orders_accepts_wrapped_array() {
        assert_eq!(extract_orders(json!({"orders": [{}]})).unwrap().len(), 1);
        assert_eq!(extract_orders(json!({"response": [{}, {}]})).unwrap().len(), 2);
    }

    #[test]
    fn test_extract_orders_rejects_scalars() {
        let err = extract_orders(json!("nope")).unwrap_err();
        assert!(err.is_fetch_failure());
        assert!(extract_orders(json!({"orders": 3})).is_err());
    }

    #[test]
    fn test_file_source_missing_file_is_fetch_failure() {
        let mut source = JsonFileSource::new("/nonexistent/orders.json");
        let err = source.fetch(&Credential::anonymous()).unwrap_err();
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn test_file_source_reads_orders() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("orders.json");
        std::fs::write(&path, r#"{"orders": [{"order": {"referenceNumber": "RN1"}}]}"#)
            .expect("write");
        let mut source = JsonFileSource::new(&path);
        let orders = source.fetch(&Credential::anonymous()).unwrap();
        assert_eq!(orders[0]["order"]["referenceNumber"], "RN1");
    }

    #[test]
    fn test_credential_debug_redacts_token() {
        let text = format!("{:?}", Credential::bearer("secret-token"));
        assert!(!text.contains("secret-token"));
        assert!(text.contains("redacted"));
    }
}
