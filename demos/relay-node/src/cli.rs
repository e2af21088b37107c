use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgMatches};
use rtk_relay::{RelayConfig, Transport};
use serialport::{FlowControl as SerialFlowControl, SerialPort};
use std::{net::SocketAddr, path::PathBuf, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Base,
    Rover,
}

pub struct CommandBuilder {
    command: clap::Command,
}

impl Default for CommandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBuilder {
    pub fn new() -> Self {
        let command = clap::Command::new("RTK relay node")
            .about("Relays RTCM3 corrections from a base receiver to a rover receiver")
            .arg_required_else_help(true)
            .arg(
                Arg::new("role")
                    .value_name("role")
                    .short('r')
                    .long("role")
                    .required(true)
                    .value_parser(["base", "rover"])
                    .help("Base relays its receiver output, rover injects it into its receiver"),
            )
            .arg(
                Arg::new("port")
                    .value_name("port")
                    .short('p')
                    .long("port")
                    .required(true)
                    .help("Serial port of the GNSS receiver"),
            )
            .arg(
                Arg::new("baud")
                    .value_name("baud")
                    .short('s')
                    .long("baud")
                    .required(false)
                    .default_value("115200")
                    .value_parser(value_parser!(u32))
                    .help("Baud rate for the selected port"),
            )
            .arg(
                Arg::new("bind")
                    .value_name("addr")
                    .long("bind")
                    .default_value("0.0.0.0:5000")
                    .value_parser(value_parser!(SocketAddr))
                    .help("Local UDP address"),
            )
            .arg(
                Arg::new("peer")
                    .value_name("addr")
                    .long("peer")
                    .default_value("255.255.255.255:5000")
                    .value_parser(value_parser!(SocketAddr))
                    .help("Where the base sends its corrections, broadcast by default"),
            )
            .arg(
                Arg::new("transport")
                    .long("transport")
                    .value_parser(["broadcast", "broker", "datagram"])
                    .help("Frame size profile of the correction link, overrides the config file"),
            )
            .arg(
                Arg::new("queue-capacity")
                    .value_name("frames")
                    .long("queue-capacity")
                    .required(false)
                    .value_parser(value_parser!(usize))
                    .help("Correction frames buffered on the rover before dropping new ones"),
            )
            .arg(
                Arg::new("config")
                    .value_name("file")
                    .short('c')
                    .long("config")
                    .required(false)
                    .value_parser(value_parser!(PathBuf))
                    .help("JSON relay configuration, command line options take precedence"),
            );
        Self { command }
    }

    pub fn build(&self) -> clap::Command {
        self.command.clone()
    }
}

pub struct Command;

impl Command {
    pub fn role(cli: &ArgMatches) -> Role {
        match cli.get_one::<String>("role").map(|s| s.as_str()) {
            Some("base") => Role::Base,
            _ => Role::Rover,
        }
    }

    pub fn bind(cli: &ArgMatches) -> SocketAddr {
        cli.get_one::<SocketAddr>("bind")
            .copied()
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 5000)))
    }

    pub fn peer(cli: &ArgMatches) -> SocketAddr {
        cli.get_one::<SocketAddr>("peer")
            .copied()
            .unwrap_or_else(|| SocketAddr::from(([255, 255, 255, 255], 5000)))
    }

    pub fn relay_config(cli: &ArgMatches) -> Result<RelayConfig> {
        let mut config = match cli.get_one::<PathBuf>("config") {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                serde_json::from_str::<RelayConfig>(&text)
                    .with_context(|| format!("Invalid config file: {}", path.display()))?
            },
            None => RelayConfig::default(),
        };

        if let Some(transport) = cli.get_one::<String>("transport") {
            let transport = match transport.as_str() {
                "broadcast" => Transport::Broadcast,
                "broker" => Transport::Broker,
                "datagram" => Transport::Datagram,
                other => bail!("Unknown transport: {}", other),
            };
            if transport != config.transport {
                config.transport = transport;
                config.queue.max_frame_len = transport.max_frame_len();
            }
        }
        if let Some(capacity) = cli.get_one::<usize>("queue-capacity") {
            config.queue.capacity = *capacity;
        }

        config.validate().context("Invalid relay configuration")?;
        Ok(config)
    }

    pub fn serialport(cli: &ArgMatches) -> Result<Box<dyn SerialPort>> {
        let port = cli
            .get_one::<String>("port")
            .context("Expected required 'port' cli argument")?;
        let baud = cli.get_one::<u32>("baud").cloned().unwrap_or(115200);

        let builder = serialport::new(port, baud)
            .timeout(Duration::from_millis(10))
            .flow_control(SerialFlowControl::None);

        log::debug!("{:?}", &builder);
        builder
            .open()
            .with_context(|| format!("Failed to open port: {}", port))
    }
}
