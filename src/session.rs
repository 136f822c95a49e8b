//! Cookie-based session setup.
//!
//! A cookie file is either a browser export (a JSON list of `{name, value, ...}`
//! objects) or a plain `{name: value}` map. LinkedIn expects `li_at` for auth and
//! a `csrf-token` header mirroring `JSESSIONID`.

use crate::error::{CookieError, Result};
use crate::log_info;
use serde_json::Value;
use std::path::Path;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.0.0 Safari/537.36";

const DEFAULT_HEADERS: [(&str, &str); 6] = [
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
    ),
    ("accept-language", "en-US,en;q=0.9"),
    ("cache-control", "no-cache"),
    ("pragma", "no-cache"),
    ("upgrade-insecure-requests", "1"),
    ("user-agent", DEFAULT_USER_AGENT),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cookies {
    entries: Vec<(String, String)>,
}

impl Cookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, replacing an earlier value while keeping its position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn header_value(&self) -> String {
        self.entries
            .iter()
            .map(|(n, v)| format!("{}={}", n, v))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn csrf_token(&self) -> Option<String> {
        self.get("JSESSIONID")
            .map(|jsid| jsid.trim_matches('"').to_string())
            .filter(|token| !token.is_empty())
    }

    pub fn from_json(value: Value) -> std::result::Result<Self, CookieError> {
        let mut cookies = Cookies::new();
        match value {
            Value::Array(items) => {
                for item in items {
                    let name = item.get("name").and_then(Value::as_str);
                    let value = item.get("value").and_then(Value::as_str);
                    if let (Some(name), Some(value)) = (name, value) {
                        if !name.is_empty() && !value.is_empty() {
                            cookies.insert(name, value);
                        }
                    }
                }
            }
            Value::Object(map) => {
                for (name, value) in map {
                    match value {
                        Value::String(s) => cookies.insert(name, s),
                        Value::Null => {}
                        other => cookies.insert(name, other.to_string()),
                    }
                }
            }
            _ => return Err(CookieError::UnsupportedFormat),
        }
        Ok(cookies)
    }
}

pub fn load_cookies<P: AsRef<Path>>(path: P) -> Result<Cookies> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(CookieError::FileRead)?;
    let value: Value = serde_json::from_str(&content).map_err(CookieError::Parse)?;
    let cookies = Cookies::from_json(value)?;
    log_info!(
        "[session] Loaded {} cookies from {}",
        cookies.len(),
        path.as_ref().display()
    );
    Ok(cookies)
}

/// Request headers for a session, with LinkedIn's CSRF headers when a
/// `JSESSIONID` cookie is present.
#[derive(Debug, Clone)]
pub struct SessionHeaders {
    headers: Vec<(String, String)>,
}

impl SessionHeaders {
    pub fn anonymous() -> Self {
        Self {
            headers: DEFAULT_HEADERS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn for_cookies(cookies: &Cookies) -> Self {
        let mut session = Self::anonymous();
        if let Some(token) = cookies.csrf_token() {
            session.push("csrf-token", token);
            session.push("x-restli-protocol-version", "2.0.0");
            session.push("x-li-lang", "en_US");
            session.push("x-li-track", r#"{"clientVersion":"1.0.*","osName":"web"}"#);
        }
        if !cookies.is_empty() {
            session.push("cookie", cookies.header_value());
        }
        session
    }

    /// Extra headers for the search engine, which checks the referer.
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.push("referer", referer);
        self
    }

    fn push(&mut self, name: &str, value: impl Into<String>) {
        self.headers.push((name.to_string(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
