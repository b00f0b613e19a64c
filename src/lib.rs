//! # hue_bridge_rs
//!
//! An async Rust library for inspecting and controlling lights behind a
//! Hue-style bridge REST API.
//!
//! The crate has two halves:
//!
//! - [`convert`]: pure conversions between the bridge's 16-bit [`Hue`],
//!   normalized [`Hsl`], 8-bit [`Rgb`] and [`HexColor`] strings.
//! - [`LightController`]: the cached view of a bridge's lights, with
//!   operations to refresh them and push brightness, color and power changes.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::str::FromStr;
//! use hue_bridge_rs::{BridgeEndpoint, HttpClient, LightController};
//!
//! async fn control_lights() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut controller = LightController::new(HttpClient::new());
//!     controller.configure(BridgeEndpoint::from_str("http://192.168.1.2")?);
//!
//!     for light in controller.refresh().await? {
//!         println!("{} is {:?}", light.id(), light.swatch());
//!     }
//!
//!     // Paint light 1 cyan
//!     controller.set_color("1", "#00ffff").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Swatches**: Render a device hue as a hex color with [`convert::hue_to_hex`]
//! - **Color picking**: Derive the hue to push from a hex color with [`convert::hex_to_hue`]
//! - **Brightness**: Push a level on the bridge scale using [`Brightness`]
//! - **Power Control**: Toggle lights with [`LightController::toggle`]
//! - **Address persistence**: Remember the bridge with an [`AddressStore`]
//! - **Pluggable transport**: Bring your own HTTP stack by implementing [`HttpTransport`]
//!
//! ## Communication
//!
//! Lights are listed with `GET {bridge}/api/{user}/lights` and updated with
//! `PUT {bridge}/api/{user}/lights/{id}/state`, one field per request. The
//! bundled [`HttpClient`] speaks plain HTTP/1.1.
//!
//! ## Runtimes
//!
//! The bundled client runs on tokio by default. Disable default features and
//! pick `runtime-async-std` or `runtime-smol` to use another executor; see
//! [`runtime`] for the details. Exactly one of the three must be enabled.

mod bridge;
mod config;
mod controller;
pub mod convert;
mod errors;
mod light;
mod payload;
pub mod runtime;
mod store;
mod transport;
mod types;

pub use bridge::BridgeEndpoint;
pub use config::{ControllerOptions, HexPolicy};
pub use controller::LightController;
pub use errors::{Error, TransportError};
pub use light::{Light, LightCollection};
pub use payload::StatePayload;
pub use store::{AddressStore, FileStore, MemoryStore};
pub use transport::{Headers, HttpClient, HttpTransport, JSON_HEADERS};
pub use types::{Brightness, HexColor, Hsl, Hue, PowerMode, Rgb};
