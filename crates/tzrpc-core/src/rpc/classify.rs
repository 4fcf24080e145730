use serde::{Deserialize, Serialize};

use crate::config::ErrorDetection;

/// One entry of the error array a Tezos node embeds in a `200 OK` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeError {
    #[serde(default)]
    pub kind: String,
    #[serde(rename = "error", default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl NodeError {
    /// Human readable description: the `error` text, or the error `id` when
    /// the node only sent that.
    pub fn description(&self) -> &str {
        match &self.id {
            Some(id) if self.message.is_empty() => id,
            _ => &self.message,
        }
    }

    fn is_well_formed(&self) -> bool {
        !self.kind.is_empty() && (!self.message.is_empty() || self.id.is_some())
    }
}

/// Look for an embedded node error in a successful response body.
///
/// Returns `Ok(None)` when the body is an ordinary payload, `Ok(Some(_))` with
/// at least one entry when the node reported an error, and `Err` when the
/// body looked like an error but could not be decoded as one. See
/// [`ErrorDetection`] for how each mode decides.
pub fn classify(
    body: &[u8],
    detection: ErrorDetection,
) -> Result<Option<Vec<NodeError>>, serde_json::Error> {
    match detection {
        ErrorDetection::Substring => {
            if !contains_error_marker(body) {
                return Ok(None);
            }
            let errors: Vec<NodeError> = serde_json::from_slice(body)?;
            Ok(non_empty(errors))
        }
        ErrorDetection::Strict => {
            let Ok(errors) = serde_json::from_slice::<Vec<NodeError>>(body) else {
                return Ok(None);
            };
            if !errors.iter().all(NodeError::is_well_formed) {
                return Ok(None);
            }
            Ok(non_empty(errors))
        }
    }
}

fn contains_error_marker(body: &[u8]) -> bool {
    const MARKER: &[u8] = b"error";
    body.windows(MARKER.len()).any(|window| window == MARKER)
}

// An empty array carries no error to report.
fn non_empty(errors: Vec<NodeError>) -> Option<Vec<NodeError>> {
    if errors.is_empty() {
        None
    } else {
        Some(errors)
    }
}
