use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::core::error::AppError;

/// Custom JSON extractor that provides consistent error responses
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection(rejection)),
        }
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err),
            JsonRejection::MissingJsonContentType(err) => {
                format!("Missing JSON content type: {}", err)
            }
            _ => "Failed to parse JSON body".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

/// Query string parameters percent-decoded without turning `+` into a space,
/// so phone-style values like `+1555` arrive intact. The first occurrence of
/// a repeated key wins.
#[derive(Debug, Default, Clone)]
pub struct LiteralQuery(pub HashMap<String, String>);

impl LiteralQuery {
    pub fn parse(query: &str) -> Result<Self, AppError> {
        let mut params = HashMap::new();

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = urlencoding::decode(raw_key)
                .map_err(|e| AppError::BadRequest(format!("Invalid query string: {}", e)))?;
            let value = urlencoding::decode(raw_value)
                .map_err(|e| AppError::BadRequest(format!("Invalid query string: {}", e)))?;

            params
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }

        Ok(Self(params))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl<S> FromRequestParts<S> for LiteralQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.uri.query() {
            Some(query) => Self::parse(query),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plus_is_kept_literally() {
        let query = LiteralQuery::parse("name=Ada&number=+1555").unwrap();
        assert_eq!(query.get("name"), Some("Ada"));
        assert_eq!(query.get("number"), Some("+1555"));
    }

    #[test]
    fn test_percent_sequences_are_decoded() {
        let query = LiteralQuery::parse("name=Ada%20Lovelace&number=%2B1555").unwrap();
        assert_eq!(query.get("name"), Some("Ada Lovelace"));
        assert_eq!(query.get("number"), Some("+1555"));
    }

    #[test]
    fn test_first_occurrence_wins_and_bare_keys_are_empty() {
        let query = LiteralQuery::parse("name=first&name=second&flag").unwrap();
        assert_eq!(query.get("name"), Some("first"));
        assert_eq!(query.get("flag"), Some(""));
        assert_eq!(query.get("missing"), None);
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        assert!(LiteralQuery::parse("name=%FF").is_err());
    }
}
