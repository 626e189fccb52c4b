use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cens_updater::broadcast::UdpBroadcaster;
use cens_updater::config::Config;
use cens_updater::platform::{StaticTelephony, SysfsConnectivity};
use cens_updater::radio::RadioCoordinator;
use cens_updater::register::Registrar;

#[derive(Parser)]
#[command(name = "cens-updater")]
#[command(about = "Device registration and radio coordination agent")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register this device with the update server
    Register {
        /// Operator-assigned asset tag (defaults to [registration] asset_tag)
        #[arg(long)]
        asset_tag: Option<String>,

        /// Group this device should belong to (defaults to [registration] group_name)
        #[arg(long)]
        group_name: Option<String>,

        /// Override the registration endpoint
        #[arg(long)]
        server_url: Option<String>,
    },

    /// Ask the radio-control component to turn the radio on
    RadioOn {
        /// Application name of the requester
        #[arg(long)]
        sender: String,

        /// Use-case id, e.g. "1-1"
        #[arg(long)]
        use_case: String,

        /// Wait until the radio is on or the wait times out
        #[arg(long)]
        block: bool,

        /// Minutes before the radio may be switched off again (0 = component default)
        #[arg(long, default_value_t = 0)]
        on_interval: u32,
    },

    /// Print whether the radio is currently on
    RadioStatus,

    /// Ask the radio-control component to send an SMS
    SendSms {
        #[arg(long)]
        sender: String,

        #[arg(long)]
        use_case: String,

        #[arg(long)]
        phone_number: String,

        #[arg(long)]
        body: String,

        /// Minutes after which the request is dropped
        #[arg(long, default_value_t = 60)]
        expires: i32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config from {:?}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("cens-updater v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Register {
            asset_tag,
            group_name,
            server_url,
        } => {
            if let Some(url) = server_url {
                config.registration.server_url = url;
            }
            let asset_tag = asset_tag
                .or_else(|| config.registration.asset_tag.clone())
                .unwrap_or_default();
            let group_name = group_name
                .or_else(|| config.registration.group_name.clone())
                .unwrap_or_default();

            let telephony = StaticTelephony::new(&config.telephony);
            let registrar = Registrar::new(telephony, &asset_tag, &group_name, &config.registration)
                .context("cannot register")?;

            let result = registrar.register().await;
            println!("{}", result.summary());
            Ok(exit_code(result.is_success()))
        }

        Command::RadioOn {
            sender,
            use_case,
            block,
            on_interval,
        } => {
            let radio = radio_coordinator(&config).await?;
            let interrupt = async {
                if tokio::signal::ctrl_c().await.is_err() {
                    // No signal handler; never interrupt
                    std::future::pending::<()>().await;
                }
            };

            let on = radio
                .request_radio_on_until(&sender, &use_case, block, on_interval, interrupt)
                .await;
            println!("radio {}", if on { "on" } else { "off" });
            // A fire-and-forget request succeeds regardless of radio state
            Ok(exit_code(on || !block))
        }

        Command::RadioStatus => {
            let radio = radio_coordinator(&config).await?;
            let on = radio.is_radio_on();
            println!("radio {}", if on { "on" } else { "off" });
            Ok(ExitCode::SUCCESS)
        }

        Command::SendSms {
            sender,
            use_case,
            phone_number,
            body,
            expires,
        } => {
            if body.is_empty() {
                warn!("Sending an SMS request with an empty body");
            }
            let radio = radio_coordinator(&config).await?;
            radio
                .request_send_sms(&sender, &use_case, &phone_number, &body, expires)
                .await;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn radio_coordinator(
    config: &Config,
) -> anyhow::Result<RadioCoordinator<SysfsConnectivity, UdpBroadcaster>> {
    let connectivity = SysfsConnectivity::new(config.connectivity.sysfs_net_dir.clone());
    let broadcaster = UdpBroadcaster::bind(&config.broadcast).await?;
    Ok(RadioCoordinator::with_config(
        connectivity,
        broadcaster,
        &config.radio,
    ))
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
