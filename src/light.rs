//! Lights as reported by the bridge.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::TransportError;
use crate::types::{HexColor, Hue, PowerMode};

/// Lights in the order the bridge listed them.
pub type LightCollection = Vec<Light>;

/// One bulb or fixture known to the bridge.
///
/// `on`, `bri` and `hue` are lifted out of the bridge object, either from its
/// top level or from its nested `state` object. Every other field stays in the
/// open [`attributes`](Light::attributes) map untouched, since the bridge
/// schema varies between firmware versions.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use hue_bridge_rs::Light;
///
/// let light = Light::from_bridge("1", &json!({
///     "name": "Desk",
///     "state": {"on": true, "bri": 200, "hue": 0, "reachable": true},
/// })).unwrap();
///
/// assert!(light.is_on());
/// assert_eq!(light.brightness(), 200);
/// assert_eq!(light.name(), Some("Desk"));
/// assert_eq!(light.swatch().unwrap().as_str(), "#ff0000");
/// assert_eq!(light.attributes()["state"], json!({"reachable": true}));
/// ```
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Light {
    id: String,
    on: bool,
    brightness: u8,
    hue: Option<Hue>,
    attributes: Map<String, Value>,
}

impl Light {
    const STATE_KEY: &'static str = "state";

    /// Build a light from one entry of the bridge's light listing.
    pub fn from_bridge(id: &str, value: &Value) -> Result<Self, TransportError> {
        let Some(object) = value.as_object() else {
            return Err(TransportError::malformed(format!(
                "light {id:?} is not an object"
            )));
        };
        let mut attributes = object.clone();

        let on = take_field(&mut attributes, "on")
            .ok_or_else(|| missing(id, "on"))?
            .as_bool()
            .ok_or_else(|| invalid(id, "on"))?;

        let brightness = take_field(&mut attributes, "bri")
            .ok_or_else(|| missing(id, "bri"))?
            .as_u64()
            .and_then(|b| u8::try_from(b).ok())
            .ok_or_else(|| invalid(id, "bri"))?;

        let hue = match take_field(&mut attributes, "hue") {
            Some(raw) => Some(
                raw.as_u64()
                    .and_then(|h| u16::try_from(h).ok())
                    .map(Hue::new)
                    .ok_or_else(|| invalid(id, "hue"))?,
            ),
            None => None,
        };

        Ok(Light {
            id: id.to_string(),
            on,
            brightness,
            hue,
            attributes,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn power(&self) -> PowerMode {
        PowerMode::from(self.on)
    }

    /// Brightness on the bridge's native scale.
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Device hue, if the bridge reported one.
    pub fn hue(&self) -> Option<Hue> {
        self.hue
    }

    /// Every bridge-reported field other than `on`, `bri` and `hue`.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").and_then(Value::as_str)
    }

    /// Representative color for the reported hue.
    pub fn swatch(&self) -> Option<HexColor> {
        self.hue.map(|hue| hue.to_hex())
    }

    pub(crate) fn set_on(&mut self, on: bool) {
        self.on = on;
    }
}

/// Parse the bridge's light listing, keeping the order of its keys.
pub(crate) fn parse_collection(value: &Value) -> Result<LightCollection, TransportError> {
    let Some(listing) = value.as_object() else {
        return Err(TransportError::malformed("light listing is not an object"));
    };

    listing
        .iter()
        .map(|(id, light)| Light::from_bridge(id, light))
        .collect()
}

/// Remove `key` from the top level, or failing that from the nested state.
fn take_field(attributes: &mut Map<String, Value>, key: &str) -> Option<Value> {
    if let Some(value) = attributes.remove(key) {
        return Some(value);
    }
    attributes
        .get_mut(Light::STATE_KEY)
        .and_then(Value::as_object_mut)
        .and_then(|state| state.remove(key))
}

fn missing(id: &str, field: &str) -> TransportError {
    TransportError::malformed(format!("light {id:?} has no {field:?} field"))
}

fn invalid(id: &str, field: &str) -> TransportError {
    TransportError::malformed(format!("light {id:?} has an invalid {field:?} field"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_light() {
        let light = Light::from_bridge(
            "a",
            &json!({"on": false, "bri": 12, "type": "Extended color light"}),
        )
        .unwrap();
        assert_eq!(light.id(), "a");
        assert_eq!(light.power(), PowerMode::Off);
        assert_eq!(light.brightness(), 12);
        assert!(light.hue().is_none());
        assert!(light.swatch().is_none());
        assert_eq!(light.attributes().len(), 1);
        assert_eq!(light.attribute("type"), Some(&json!("Extended color light")));
    }

    #[test]
    fn test_missing_or_bad_fields() {
        assert!(Light::from_bridge("1", &json!({"bri": 1})).is_err());
        assert!(Light::from_bridge("1", &json!({"on": true})).is_err());
        assert!(Light::from_bridge("1", &json!({"on": "yes", "bri": 1})).is_err());
        assert!(Light::from_bridge("1", &json!({"on": true, "bri": 300})).is_err());
        assert!(Light::from_bridge("1", &json!({"on": true, "bri": 3, "hue": 70000})).is_err());
        assert!(Light::from_bridge("1", &json!([1, 2])).is_err());
    }

    #[test]
    fn test_collection_keeps_bridge_order() {
        let listing = json!({
            "9": {"on": true, "bri": 1},
            "2": {"on": false, "bri": 2},
            "kitchen": {"on": true, "bri": 3},
        });
        let lights = parse_collection(&listing).unwrap();
        let ids: Vec<&str> = lights.iter().map(Light::id).collect();
        assert_eq!(ids, ["9", "2", "kitchen"]);
    }

    #[test]
    fn test_collection_rejects_error_array() {
        let reply = json!([{"error": {"type": 1, "description": "unauthorized user"}}]);
        assert!(parse_collection(&reply).is_err());
    }
}
