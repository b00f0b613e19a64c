//! State update bodies for a single light.

use serde::{Deserialize, Serialize};

use crate::types::{Brightness, Hue, PowerMode};

/// The body of a light state update.
///
/// Each payload carries exactly one field. Build one from the value to push.
///
/// ```
/// use hue_bridge_rs::{Brightness, Hue, PowerMode, StatePayload};
///
/// let body = serde_json::to_value(StatePayload::from(&Brightness::create(100).unwrap())).unwrap();
/// assert_eq!(body, serde_json::json!({"bri": 100}));
///
/// let body = serde_json::to_value(StatePayload::from(Hue::new(25500))).unwrap();
/// assert_eq!(body, serde_json::json!({"hue": 25500}));
///
/// let body = serde_json::to_value(StatePayload::from(PowerMode::Off)).unwrap();
/// assert_eq!(body, serde_json::json!({"on": false}));
/// ```
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StatePayload {
    pub(crate) on: Option<bool>,
    #[serde(rename = "bri")]
    pub(crate) brightness: Option<u8>,
    pub(crate) hue: Option<u16>,
}

impl StatePayload {
    const EMPTY: StatePayload = StatePayload {
        on: None,
        brightness: None,
        hue: None,
    };

    /// Check that exactly one attribute is set.
    pub fn is_valid(&self) -> bool {
        let set = [
            self.on.is_some(),
            self.brightness.is_some(),
            self.hue.is_some(),
        ];
        set.iter().filter(|s| **s).count() == 1
    }

    pub fn on(&self) -> Option<bool> {
        self.on
    }

    pub fn brightness(&self) -> Option<u8> {
        self.brightness
    }

    pub fn hue(&self) -> Option<Hue> {
        self.hue.map(Hue::new)
    }
}

impl From<&Brightness> for StatePayload {
    fn from(brightness: &Brightness) -> Self {
        StatePayload {
            brightness: Some(brightness.value),
            ..Self::EMPTY
        }
    }
}

impl From<Hue> for StatePayload {
    fn from(hue: Hue) -> Self {
        StatePayload {
            hue: Some(hue.value),
            ..Self::EMPTY
        }
    }
}

impl From<PowerMode> for StatePayload {
    fn from(power: PowerMode) -> Self {
        StatePayload {
            on: Some(power.is_on()),
            ..Self::EMPTY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_field_payloads_are_valid() {
        assert!(StatePayload::from(PowerMode::On).is_valid());
        assert!(StatePayload::from(Hue::new(0)).is_valid());
        assert!(StatePayload::from(&Brightness::new()).is_valid());
    }

    #[test]
    fn test_deserialized_payload_validity() {
        let empty: StatePayload = serde_json::from_str("{}").unwrap();
        assert!(!empty.is_valid());

        let both: StatePayload = serde_json::from_str(r#"{"on": true, "bri": 4}"#).unwrap();
        assert!(!both.is_valid());

        let one: StatePayload = serde_json::from_str(r#"{"hue": 4}"#).unwrap();
        assert_eq!(one.hue(), Some(Hue::new(4)));
    }
}
