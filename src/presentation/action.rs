//! Actions exchanged between a parent and a presented child.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mvi::Action;

/// What a presented child can send to its parent.
///
/// Serialized as `{"kind": "presented", "action": ...}` or `{"kind": "dismiss"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "action", rename_all = "lowercase")]
pub enum PresentationAction<A> {
    /// The child produced an action.
    Presented(A),
    /// The child or the user asked for the child to be removed.
    Dismiss,
}

impl<A> PresentationAction<A> {
    pub fn presented(self) -> Option<A> {
        match self {
            PresentationAction::Presented(action) => Some(action),
            PresentationAction::Dismiss => None,
        }
    }

    pub fn map<B>(self, transform: impl FnOnce(A) -> B) -> PresentationAction<B> {
        match self {
            PresentationAction::Presented(action) => PresentationAction::Presented(transform(action)),
            PresentationAction::Dismiss => PresentationAction::Dismiss,
        }
    }
}

impl<A: Action> Action for PresentationAction<A> {
    fn is_dismiss(&self) -> bool {
        matches!(self, PresentationAction::Dismiss)
    }
}

/// Wire shape of a destination action: `{"caseTag": ..., "action": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEnvelope<A> {
    #[serde(rename = "caseTag")]
    pub case_tag: String,
    pub action: PresentationAction<A>,
}

impl<A> ActionEnvelope<A> {
    pub fn presented(case_tag: impl Into<String>, action: A) -> Self {
        Self {
            case_tag: case_tag.into(),
            action: PresentationAction::Presented(action),
        }
    }

    pub fn dismiss(case_tag: impl Into<String>) -> Self {
        Self {
            case_tag: case_tag.into(),
            action: PresentationAction::Dismiss,
        }
    }
}

/// A destination action on the wire, with the child action not yet decoded.
pub type RawEnvelope = ActionEnvelope<serde_json::Value>;

/// Errors converting between a destination action and its wire form.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("No destination case is registered for tag '{0}'")]
    UnknownCase(String),

    #[error("Invalid action payload for case '{case_tag}': {source}")]
    Payload {
        case_tag: String,
        #[source]
        source: serde_json::Error,
    },
}

impl<A: Serialize> ActionEnvelope<A> {
    /// Encode the child action, keeping the case tag.
    pub fn into_raw(self) -> Result<RawEnvelope, EnvelopeError> {
        let action = match self.action {
            PresentationAction::Presented(action) => match serde_json::to_value(action) {
                Ok(value) => PresentationAction::Presented(value),
                Err(source) => {
                    return Err(EnvelopeError::Payload {
                        case_tag: self.case_tag,
                        source,
                    })
                }
            },
            PresentationAction::Dismiss => PresentationAction::Dismiss,
        };
        Ok(ActionEnvelope {
            case_tag: self.case_tag,
            action,
        })
    }
}

impl RawEnvelope {
    /// Decode the child action as `A`.
    pub fn decode<A: DeserializeOwned>(self) -> Result<ActionEnvelope<A>, EnvelopeError> {
        let action = match self.action {
            PresentationAction::Presented(value) => match serde_json::from_value(value) {
                Ok(action) => PresentationAction::Presented(action),
                Err(source) => {
                    return Err(EnvelopeError::Payload {
                        case_tag: self.case_tag,
                        source,
                    })
                }
            },
            PresentationAction::Dismiss => PresentationAction::Dismiss,
        };
        Ok(ActionEnvelope {
            case_tag: self.case_tag,
            action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "type", rename_all = "lowercase")]
    enum ItemAction {
        Saved,
        Renamed { name: String },
    }

    impl Action for ItemAction {}

    #[test]
    fn envelope_matches_wire_shape() {
        let envelope = ActionEnvelope::presented("addItem", ItemAction::Saved);
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({"caseTag": "addItem", "action": {"kind": "presented", "action": {"type": "saved"}}})
        );
    }

    #[test]
    fn dismiss_has_no_payload() {
        let value = serde_json::to_value(ActionEnvelope::<ItemAction>::dismiss("addItem")).unwrap();
        assert_eq!(value, json!({"caseTag": "addItem", "action": {"kind": "dismiss"}}));
    }

    #[test]
    fn envelope_parses_from_wire() {
        let envelope: ActionEnvelope<ItemAction> = serde_json::from_value(json!({
            "caseTag": "edit",
            "action": {"kind": "presented", "action": {"type": "renamed", "name": "milk"}}
        }))
        .unwrap();
        assert_eq!(envelope.case_tag, "edit");
        assert_eq!(
            envelope.action.presented(),
            Some(ItemAction::Renamed {
                name: "milk".into()
            })
        );
    }

    #[test]
    fn only_dismiss_is_dismiss() {
        assert!(PresentationAction::<ItemAction>::Dismiss.is_dismiss());
        assert!(!PresentationAction::Presented(ItemAction::Saved).is_dismiss());
    }

    #[test]
    fn map_keeps_dismiss() {
        let mapped = PresentationAction::<u8>::Dismiss.map(|n| n + 1);
        assert_eq!(mapped, PresentationAction::Dismiss);
        assert_eq!(PresentationAction::Presented(1u8).map(|n| n + 1), PresentationAction::Presented(2));
    }

    #[test]
    fn raw_envelope_decodes_into_the_child_action() {
        let raw: RawEnvelope = serde_json::from_value(json!({
            "caseTag": "addItem",
            "action": {"kind": "presented", "action": {"type": "saved"}}
        }))
        .unwrap();
        let envelope = raw.decode::<ItemAction>().unwrap();
        assert_eq!(envelope, ActionEnvelope::presented("addItem", ItemAction::Saved));

        let raw = envelope.into_raw().unwrap();
        assert_eq!(raw.action, PresentationAction::Presented(json!({"type": "saved"})));
    }

    #[test]
    fn malformed_payload_names_the_case() {
        let raw = ActionEnvelope::presented("addItem", json!({"type": "exploded"}));
        let err = raw.decode::<ItemAction>().unwrap_err();
        assert!(matches!(err, EnvelopeError::Payload { ref case_tag, .. } if case_tag == "addItem"));
    }
}
