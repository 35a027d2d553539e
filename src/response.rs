/// Response body decoding
use crate::logging::AmpLogger;
use crate::transport::HttpResponse;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Result of decoding a response body
///
/// Bodies that are not JSON are handed back untouched instead of failing the call.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedBody {
    Json(Value),
    Raw(HttpResponse),
}

impl ParsedBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ParsedBody::Json(value) => Some(value),
            ParsedBody::Raw(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            ParsedBody::Json(value) => Some(value),
            ParsedBody::Raw(_) => None,
        }
    }

    /// Decode the JSON value into a typed structure
    pub fn deserialize<T: DeserializeOwned>(&self) -> Option<Result<T, serde_json::Error>> {
        self.as_json().map(|value| T::deserialize(value))
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, ParsedBody::Raw(_))
    }
}

/// Decode `response.body` as JSON, falling back to the raw response
pub fn parse_response(response: HttpResponse, logger: &dyn AmpLogger) -> ParsedBody {
    match serde_json::from_str::<Value>(&response.body) {
        Ok(value) => ParsedBody::Json(value),
        Err(e) => {
            logger.error(&format!("Error parsing json response {}", e));
            logger.error(&format!("Error parsing: {}", response.body));
            ParsedBody::Raw(response)
        }
    }
}
