//! Light control against a single bridge.

use std::str::FromStr;

use log::{debug, warn};
use serde_json::Value;

use crate::bridge::BridgeEndpoint;
use crate::config::{ControllerOptions, HexPolicy};
use crate::convert;
use crate::errors::{Error, TransportError};
use crate::light::{self, Light, LightCollection};
use crate::payload::StatePayload;
use crate::store::AddressStore;
use crate::transport::{HttpTransport, JSON_HEADERS};
use crate::types::{Brightness, HexColor, Hue, PowerMode};

type Result<T> = std::result::Result<T, Error>;

/// In-memory view of a bridge's lights, and the only way to change them.
///
/// The controller owns its transport, its bridge address and the light cache,
/// so independent sessions never share state. Operations take `&mut self`
/// where they touch the cache; concurrent use is up to the caller.
///
/// Cache consistency differs per operation:
/// - [`refresh`](Self::refresh) replaces the whole collection on success.
/// - [`toggle`](Self::toggle) flips the cached `on` flag once the bridge
///   accepted the change.
/// - [`set_brightness`](Self::set_brightness) and
///   [`set_color`](Self::set_color) leave the cache alone; refresh to observe
///   their effect.
///
/// # Example
///
/// ```ignore
/// use std::str::FromStr;
/// use hue_bridge_rs::{BridgeEndpoint, Brightness, HttpClient, LightController};
///
/// let mut controller = LightController::new(HttpClient::new());
/// controller.configure(BridgeEndpoint::from_str("192.168.1.2")?);
///
/// for light in controller.refresh().await? {
///     println!("{} {:?}", light.id(), light.swatch());
/// }
/// controller.set_brightness("1", &Brightness::create(127).unwrap()).await?;
/// controller.set_color("1", "#00ffcc").await?;
/// controller.toggle("1").await?;
/// ```
#[derive(Debug)]
pub struct LightController<T: HttpTransport> {
    transport: T,
    options: ControllerOptions,
    endpoint: Option<BridgeEndpoint>,
    lights: LightCollection,
}

impl<T: HttpTransport> LightController<T> {
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, ControllerOptions::default())
    }

    pub fn with_options(transport: T, options: ControllerOptions) -> Self {
        LightController {
            transport,
            options,
            endpoint: None,
            lights: LightCollection::new(),
        }
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn endpoint(&self) -> Option<&BridgeEndpoint> {
        self.endpoint.as_ref()
    }

    /// Lights from the last successful refresh, in bridge order.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn light(&self, id: &str) -> Option<&Light> {
        self.lights.iter().find(|light| light.id() == id)
    }

    /// Swatch for a cached light's hue, if it has one.
    pub fn swatch(&self, id: &str) -> Option<HexColor> {
        self.light(id).and_then(Light::swatch)
    }

    /// Set the bridge address. Reachability is not checked.
    pub fn configure(&mut self, endpoint: BridgeEndpoint) {
        debug!("bridge endpoint set to {}", endpoint);
        self.endpoint = Some(endpoint);
    }

    /// Configure from a stored address, if one was saved.
    ///
    /// A stored address that no longer parses is reported and nothing changes.
    pub fn load_endpoint(&mut self, store: &impl AddressStore) -> Result<Option<&BridgeEndpoint>> {
        let Some(address) = store.get_address()? else {
            return Ok(None);
        };
        let endpoint = BridgeEndpoint::from_str(&address)?;
        debug!("loaded bridge endpoint {}", endpoint);
        Ok(Some(&*self.endpoint.insert(endpoint)))
    }

    /// Validate, persist and configure a new bridge address.
    pub fn save_endpoint(
        &mut self,
        store: &impl AddressStore,
        address: &str,
    ) -> Result<&BridgeEndpoint> {
        let endpoint = BridgeEndpoint::from_str(address)?;
        store.set_address(address.trim())?;
        debug!("saved bridge endpoint {}", endpoint);
        Ok(&*self.endpoint.insert(endpoint))
    }

    /// Re-read every light from the bridge, replacing the cached collection.
    ///
    /// On failure the previous collection is kept.
    pub async fn refresh(&mut self) -> Result<&[Light]> {
        let endpoint = self.endpoint.as_ref().ok_or(Error::NotConfigured)?;
        let url = endpoint.lights_url(&self.options.api_user);

        debug!("fetching lights from {}", url);
        let lights = self
            .transport
            .get(&url, &[])
            .await
            .and_then(|reply| {
                check_bridge_reply(&reply)?;
                light::parse_collection(&reply)
            })
            .map_err(|e| {
                warn!("failed to fetch lights from {}: {}", url, e);
                Error::Fetch(e)
            })?;

        debug!("bridge reported {} light(s)", lights.len());
        self.lights = lights;
        Ok(&self.lights)
    }

    /// Push a new brightness. The cached light is not updated.
    pub async fn set_brightness(&self, id: &str, brightness: &Brightness) -> Result<()> {
        let endpoint = self.target(id)?;
        self.push(endpoint, id, &StatePayload::from(brightness))
            .await
    }

    /// Push the hue of a hex color and return it. The cached light is not
    /// updated.
    ///
    /// Under [`HexPolicy::Lenient`] malformed hex pushes hue 0 (black has no
    /// hue); under [`HexPolicy::Strict`] it fails with
    /// [`Error::InvalidHexColor`] before any request.
    pub async fn set_color(&self, id: &str, hex: &str) -> Result<Hue> {
        let endpoint = self.target(id)?;
        let hue = match self.options.hex_policy {
            HexPolicy::Lenient => convert::hex_to_hue(hex),
            HexPolicy::Strict => convert::try_hex_to_hue(hex)?,
        };
        self.push(endpoint, id, &StatePayload::from(hue)).await?;
        Ok(hue)
    }

    /// Flip a light on or off and return its new state.
    ///
    /// The cached light follows only once the bridge accepted the change;
    /// other lights are never touched.
    pub async fn toggle(&mut self, id: &str) -> Result<PowerMode> {
        let endpoint = self.target(id)?;
        let current = self
            .light(id)
            .map(Light::power)
            .ok_or_else(|| Error::UnknownLight(id.to_string()))?;
        let next = current.toggled();

        self.push(endpoint, id, &StatePayload::from(next)).await?;

        if let Some(light) = self.lights.iter_mut().find(|light| light.id() == id) {
            light.set_on(next.is_on());
        }
        Ok(next)
    }

    /// Endpoint for an update of a known light.
    fn target(&self, id: &str) -> Result<&BridgeEndpoint> {
        let endpoint = self.endpoint.as_ref().ok_or(Error::NotConfigured)?;
        if self.light(id).is_none() {
            return Err(Error::UnknownLight(id.to_string()));
        }
        Ok(endpoint)
    }

    async fn push(&self, endpoint: &BridgeEndpoint, id: &str, payload: &StatePayload) -> Result<()> {
        debug_assert!(payload.is_valid(), "state updates carry exactly one field");
        let url = endpoint.light_state_url(&self.options.api_user, id);
        let body = serde_json::to_value(payload).map_err(Error::JsonDump)?;

        debug!("PUT {} {}", url, body);
        let reply = self
            .transport
            .put(&url, &body, &JSON_HEADERS)
            .await
            .and_then(|reply| check_bridge_reply(&reply).map(|_| reply))
            .map_err(|e| {
                warn!("failed to update light {}: {}", id, e);
                Error::update(id, e)
            })?;

        debug!("bridge reply: {}", reply);
        Ok(())
    }
}

/// Bridges report failures as `[{"error": {...}}]` with a success status.
fn check_bridge_reply(reply: &Value) -> std::result::Result<(), TransportError> {
    let Some(entries) = reply.as_array() else {
        return Ok(());
    };

    match entries.iter().find_map(|entry| entry.get("error")) {
        Some(error) => Err(TransportError::Bridge {
            kind: error.get("type").and_then(Value::as_i64).unwrap_or_default(),
            address: error
                .get("address")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            description: error
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }),
        None => Ok(()),
    }
}
