//! Bearer token extraction from inbound requests.

use axum::http::{header, request::Parts};
use url::form_urlencoded;

/// A place a client may put its token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// Named query string parameter, e.g. `?token=...`.
    Query(String),
    /// `Authorization: Bearer <token>`.
    AuthorizationHeader,
}

/// Ordered list of token sources. The first non-empty value wins and later
/// sources are not consulted.
#[derive(Debug, Clone)]
pub struct TokenExtractor {
    sources: Vec<TokenSource>,
}

impl TokenExtractor {
    pub fn new(sources: Vec<TokenSource>) -> Self {
        Self { sources }
    }

    /// Query parameter first, then the Authorization header.
    pub fn query_then_header(query_param: impl Into<String>) -> Self {
        Self::new(vec![
            TokenSource::Query(query_param.into()),
            TokenSource::AuthorizationHeader,
        ])
    }

    pub fn sources(&self) -> &[TokenSource] {
        &self.sources
    }

    pub fn extract(&self, parts: &Parts) -> Option<String> {
        self.sources
            .iter()
            .find_map(|source| Self::from_source(source, parts))
    }

    fn from_source(source: &TokenSource, parts: &Parts) -> Option<String> {
        let value = match source {
            TokenSource::Query(name) => {
                let query = parts.uri.query()?;
                form_urlencoded::parse(query.as_bytes())
                    .find(|(key, value)| key == name.as_str() && !value.trim().is_empty())
                    .map(|(_, value)| value.into_owned())?
            }
            TokenSource::AuthorizationHeader => {
                let raw = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
                let (scheme, token) = raw.trim().split_once(' ')?;
                if !scheme.eq_ignore_ascii_case("bearer") {
                    return None;
                }
                token.to_string()
            }
        };

        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    }
}
