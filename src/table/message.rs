use serde::Deserialize;
use thiserror::Error;
use tracing::{trace, warn};

use super::TableSnapshot;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("message is not valid json: {0}")]
    Json(#[source] serde_json::Error),
    #[error("{kind} payload does not describe a table: {source}")]
    Payload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// What an inbound table message means for the client.
#[derive(Debug, Clone, PartialEq)]
pub enum TableUpdate {
    Snapshot(Box<TableSnapshot>),
    /// `payload: null`: the player is not seated at or viewing any table.
    Cleared,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Option<serde_json::Value>,
}

/// Parse one inbound text frame.
///
/// Returns `Ok(None)` for message types that carry no table state
/// (`actionApplied`, `error`, anything new).
pub fn parse_message(text: &str) -> Result<Option<TableUpdate>, MessageError> {
    let envelope: Envelope = serde_json::from_str(text).map_err(MessageError::Json)?;
    match envelope.kind.as_str() {
        "tableState" | "handState" => match envelope.payload {
            None | Some(serde_json::Value::Null) => Ok(Some(TableUpdate::Cleared)),
            Some(value) => serde_json::from_value::<TableSnapshot>(value)
                .map(|s| Some(TableUpdate::Snapshot(Box::new(s))))
                .map_err(|source| MessageError::Payload {
                    kind: envelope.kind,
                    source,
                }),
        },
        other => {
            trace!(kind = other, "Ignoring message without table state");
            Ok(None)
        }
    }
}

/// Like `parse_message` but never fails: malformed frames are logged and
/// dropped.
pub fn parse_message_lossy(text: &str) -> Option<TableUpdate> {
    match parse_message(text) {
        Ok(update) => update,
        Err(error) => {
            warn!(%error, "Dropping malformed inbound message");
            None
        }
    }
}
