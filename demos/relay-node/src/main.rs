use anyhow::{Context, Result};
use log::{error, info, warn};
use rtk_relay::{BaseStation, IoPort, RelayConfig, RelayQueue, Rover};
use std::{sync::Arc, thread, time::Duration};

mod cli;
mod link;

use cli::Role;
use link::UdpLink;

const BASE_POLL_PERIOD: Duration = Duration::from_millis(100);
const ROVER_POLL_PERIOD: Duration = Duration::from_millis(10);

fn main() -> Result<()> {
    env_logger::Builder::new()
        .format_timestamp(None)
        .format_target(false)
        .filter_level(log::LevelFilter::Info)
        .parse_env("LOG_LEVEL")
        .init();

    let cli = cli::CommandBuilder::default()
        .build()
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .get_matches();

    let config = cli::Command::relay_config(&cli)?;
    let link = UdpLink::bind(
        cli::Command::bind(&cli),
        cli::Command::peer(&cli),
        config.transport.max_frame_len(),
    )?;
    let port = cli::Command::serialport(&cli)?;

    match cli::Command::role(&cli) {
        Role::Base => run_base(&config, port, link),
        Role::Rover => run_rover(&config, port, link),
    }
}

fn run_base(
    config: &RelayConfig,
    port: Box<dyn serialport::SerialPort>,
    mut link: UdpLink,
) -> Result<()> {
    info!("=== RTK BASE STATION ({:?}) ===", config.transport);
    let mut gnss = IoPort::new(port);
    let mut base = BaseStation::new(config.base);

    loop {
        match base.poll(&mut gnss, &mut link) {
            Ok(poll) if poll.read > 0 => {
                log::debug!("relayed {} bytes (sent: {})", poll.read, poll.sent);
            },
            Ok(_) => {},
            Err(e) => error!("GNSS read failed: {}", e),
        }
        thread::sleep(BASE_POLL_PERIOD);
    }
}

fn run_rover(
    config: &RelayConfig,
    port: Box<dyn serialport::SerialPort>,
    link: UdpLink,
) -> Result<()> {
    info!("=== RTK ROVER ({:?}) ===", config.transport);
    let queue = Arc::new(RelayQueue::new(config.queue));
    link.spawn_receiver(Arc::clone(&queue))?;

    let writer = port
        .try_clone()
        .context("Failed to clone serialport for writing")?;
    let mut gnss_in = IoPort::new(port);
    let mut gnss_out = IoPort::new(writer);

    let mut buffer = vec![0u8; config.window.capacity];
    let mut rover = Rover::new(&mut buffer, queue, config);

    loop {
        match rover.poll(&mut gnss_in, &mut gnss_out) {
            Ok(poll) => {
                if let (Some(transition), Some(gga)) = (poll.transition, poll.gga) {
                    info!("*** FIX STATUS CHANGED: {} ***", transition.to);
                    if let Some(pos) = gga.position {
                        let dop = rover.dop();
                        info!(
                            "Latitude: {:.7} Longitude: {:.7} Altitude: {}m Satellites: {} HDOP: {} PDOP: {} VDOP: {}",
                            pos.latitude,
                            pos.longitude,
                            gga.altitude.map_or_else(|| "-".to_string(), |a| format!("{:.2}", a)),
                            gga.satellites.unwrap_or_default(),
                            dop.hdop,
                            dop.pdop,
                            dop.vdop
                        );
                    }
                }
            },
            Err(e) => warn!("GNSS read failed: {}", e),
        }
        thread::sleep(ROVER_POLL_PERIOD);
    }
}
