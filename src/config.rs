//! Controller configuration.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// How user-supplied hex colors are treated before being pushed.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use hue_bridge_rs::HexPolicy;
///
/// assert_eq!(HexPolicy::from_str("strict").unwrap(), HexPolicy::Strict);
/// assert_eq!(HexPolicy::Lenient.to_string(), "lenient");
///
/// // Every policy, e.g. to offer them as choices.
/// use strum::IntoEnumIterator;
/// let names: Vec<String> = HexPolicy::iter().map(|p| p.to_string()).collect();
/// assert_eq!(names, ["lenient", "strict"]);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HexPolicy {
    /// Malformed hex degrades to black (hue 0) and is still pushed.
    #[default]
    Lenient,
    /// Malformed hex is rejected before any request is made.
    Strict,
}

/// Options for a [`crate::LightController`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControllerOptions {
    pub hex_policy: HexPolicy,
    /// Path segment identifying the API user on the bridge.
    pub api_user: String,
}

impl ControllerOptions {
    pub const DEFAULT_API_USER: &'static str = "newdeveloper";
}

impl Default for ControllerOptions {
    fn default() -> Self {
        ControllerOptions {
            hex_policy: HexPolicy::default(),
            api_user: Self::DEFAULT_API_USER.to_string(),
        }
    }
}
