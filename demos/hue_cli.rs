//! CLI application for controlling lights behind a bridge.
//!
//! The bridge address is remembered between runs in a small JSON file, so
//! configure it once and then list or control lights.
//!
//! Run with: cargo run --example hue_cli -- --help

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use hue_bridge_rs::{
    AddressStore, Brightness, ControllerOptions, FileStore, HexPolicy, HttpClient, Hue,
    LightController, PowerMode, convert,
};
use strum::IntoEnumIterator;

#[derive(Parser)]
#[command(name = "hue-cli")]
#[command(about = "Inspect and control lights behind a bridge from the command line", long_about = None)]
struct Cli {
    /// File holding the saved bridge address
    #[arg(long, global = true, default_value = "hue-bridge.json")]
    config: PathBuf,

    /// How to treat malformed hex colors
    #[arg(long, global = true, default_value_t = HexPolicy::Lenient, value_parser = parse_hex_policy)]
    hex_policy: HexPolicy,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save the bridge address (e.g. http://localhost:80)
    Configure {
        /// Bridge address: host, host:port or scheme://host[:port]
        address: String,
    },

    /// Show the saved bridge address
    ShowConfig,

    /// Forget the saved bridge address
    ClearConfig,

    /// Print the swatch for a device hue (0-65535)
    Swatch {
        /// Device hue
        hue: u16,
    },

    #[command(flatten)]
    Bridge(BridgeCommand),
}

/// Commands that refresh the light list from the saved bridge first.
#[derive(Subcommand)]
enum BridgeCommand {
    /// List all lights with their state and color swatch
    Fetch,

    /// Turn a light on
    On {
        /// Light identifier as reported by the bridge
        id: String,
    },

    /// Turn a light off
    Off {
        /// Light identifier as reported by the bridge
        id: String,
    },

    /// Toggle a light on/off
    Toggle {
        /// Light identifier as reported by the bridge
        id: String,
    },

    /// Set brightness (1-254)
    Brightness {
        /// Light identifier as reported by the bridge
        id: String,
        /// Brightness level (1-254)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=254))]
        level: u8,
    },

    /// Set color from a hex string (#rgb or #rrggbb)
    Color {
        /// Light identifier as reported by the bridge
        id: String,
        /// Hex color, e.g. "#00ffcc"
        hex: String,
    },
}

fn parse_hex_policy(value: &str) -> Result<HexPolicy, String> {
    HexPolicy::from_str(value).map_err(|_| {
        let choices: Vec<String> = HexPolicy::iter().map(|p| p.to_string()).collect();
        format!("expected one of: {}", choices.join(", "))
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let store = FileStore::new(&cli.config);
    let options = ControllerOptions {
        hex_policy: cli.hex_policy,
        ..ControllerOptions::default()
    };
    let mut controller = LightController::with_options(HttpClient::new(), options);

    match cli.command {
        Commands::Configure { address } => match controller.save_endpoint(&store, &address) {
            Ok(endpoint) => println!("Bridge address saved: {}", endpoint),
            Err(e) => eprintln!("Error: {}", e),
        },

        Commands::ShowConfig => match store.get_address()? {
            Some(address) => println!("Bridge address: {}", address),
            None => println!("No bridge address saved. Use `configure <ADDRESS>`."),
        },

        Commands::ClearConfig => {
            store.clear_address()?;
            println!("Bridge address cleared");
        }

        Commands::Swatch { hue } => {
            let hue = Hue::new(hue);
            println!("Hue {} -> {}", hue.value(), convert::hue_to_hex(hue));
        }

        Commands::Bridge(command) => run_on_bridge(&mut controller, &store, command).await?,
    }

    Ok(())
}

async fn run_on_bridge(
    controller: &mut LightController<HttpClient>,
    store: &FileStore,
    command: BridgeCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    if controller.load_endpoint(store)?.is_none() {
        return Err("No bridge address saved. Use `configure <ADDRESS>` first.".into());
    }

    println!("Fetching lights...");
    controller.refresh().await?;

    match command {
        BridgeCommand::Fetch => {
            let lights = controller.lights();
            if lights.is_empty() {
                println!("The bridge reported no lights.");
            }
            for light in lights {
                println!(
                    "  {:>4}  {:20}  Power: {:3}  Brightness: {:3}  Color: {}",
                    light.id(),
                    light.name().unwrap_or("-"),
                    if light.is_on() { "ON" } else { "OFF" },
                    light.brightness(),
                    light
                        .swatch()
                        .map(|hex| hex.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                );
            }
        }

        BridgeCommand::On { id } => switch(controller, &id, PowerMode::On).await,

        BridgeCommand::Off { id } => switch(controller, &id, PowerMode::Off).await,

        BridgeCommand::Toggle { id } => {
            println!("Toggling light {}...", id);
            match controller.toggle(&id).await {
                Ok(power) => println!("Light {} is now {:?}", id, power),
                Err(e) => eprintln!("Error: {}", e),
            }
        }

        BridgeCommand::Brightness { id, level } => {
            println!("Setting brightness of light {} to {}...", id, level);
            let brightness = Brightness::create_or(level);
            match controller.set_brightness(&id, &brightness).await {
                Ok(()) => println!("Brightness set successfully"),
                Err(e) => eprintln!("Error: {}", e),
            }
        }

        BridgeCommand::Color { id, hex } => {
            println!("Setting color of light {} to {}...", id, hex);
            match controller.set_color(&id, &hex).await {
                Ok(hue) => println!("Color set successfully (hue {})", hue.value()),
                Err(e) => eprintln!("Error: {}", e),
            }
        }
    }

    Ok(())
}

/// Toggle only when the cached state differs from the wanted one.
async fn switch(controller: &mut LightController<HttpClient>, id: &str, wanted: PowerMode) {
    match controller.light(id).map(|light| light.power()) {
        Some(current) if current == wanted => println!("Light {} is already {:?}", id, wanted),
        Some(_) => match controller.toggle(id).await {
            Ok(power) => println!("Light {} is now {:?}", id, power),
            Err(e) => eprintln!("Error: {}", e),
        },
        None => eprintln!("Error: light {:?} is not known", id),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_hex_policy_flag() {
        let cli = Cli::try_parse_from(["hue-cli", "color", "1", "#0ff", "--hex-policy", "STRICT"])
            .unwrap();
        assert_eq!(cli.hex_policy, HexPolicy::Strict);
        assert!(matches!(
            cli.command,
            Commands::Bridge(BridgeCommand::Color { ref id, ref hex }) if id == "1" && hex == "#0ff"
        ));

        let cli = Cli::try_parse_from(["hue-cli", "fetch"]).unwrap();
        assert_eq!(cli.hex_policy, HexPolicy::Lenient);

        let err = Cli::try_parse_from(["hue-cli", "--hex-policy", "loose", "fetch"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("lenient, strict"));
    }
}
