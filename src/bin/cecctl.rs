use cecctl::cec;

use cec::noop::LogOnlyConn;
use cec::{CECConnection, LogicalAddress, Opcode, CEC};
use clap::{ArgGroup, Parser, Subcommand};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to CEC device, e.g. `/dev/ttyACM0`, `/dev/ttyUSB0`, or `/dev/cec0`
    #[arg(long, env = "CEC_DEVICE", default_value = "/dev/ttyACM0")]
    device: String,

    /// OSD name this client registers with, and looks itself up by.
    #[arg(long, env = "CEC_OSD_NAME", default_value = "cec.rs")]
    osd_name: String,

    /// Serve the bus from a JSON roster (as written by `scan --json`)
    /// instead of talking to the adapter.
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Open the adapter in monitor mode.
    #[arg(long)]
    monitor: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the devices currently on the bus.
    Scan {
        #[arg(long)]
        json: bool,
    },
    /// Look up a command's opcode, or with --code an opcode's command name.
    #[command(group(ArgGroup::new("query").required(true).multiple(false).args(["name", "code"])))]
    Opcode {
        name: Option<String>,
        #[arg(long, value_parser = parse_byte)]
        code: Option<u8>,
    },
    /// Power on the first device whose OSD name matches the regex PATTERN.
    PowerOn { pattern: String },
    /// Broadcast <Active Source> for this client.
    ActiveSource,
    /// Send a named command with hex operands, e.g. `send UserControlPressed --to 0 41`.
    Send {
        command: String,
        #[arg(long, default_value = "f")]
        from: LogicalAddress,
        #[arg(long, default_value = "f")]
        to: LogicalAddress,
        #[arg(value_parser = parse_byte)]
        params: Vec<u8>,
    },
    /// Validate and send a raw frame such as `4F:82:10:00`.
    Raw { frame: String },
}

fn parse_byte(s: &str) -> Result<u8, String> {
    u8::from_str_radix(s.trim_start_matches("0x"), 16).map_err(|e| format!("{}: {}", s, e))
}

fn open(args: &Args) -> Result<Arc<dyn CECConnection>, cec::Error> {
    match &args.roster {
        Some(path) => {
            info!("Using recorded bus from {}", path.display());
            Ok(Arc::new(LogOnlyConn::from_json_file(path)?))
        }
        None => Err(cec::Error::Transport(
            format!(
                "no adapter transport built in for {} (monitor: {}); pass --roster",
                args.device, args.monitor
            )
            .into(),
        )),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("INFO"))
        .format_timestamp(Some(env_logger::fmt::TimestampPrecision::Millis))
        .init();

    if let Some(Command::Opcode { name, code }) = &args.command {
        // Table lookups need no bus.
        match (name, code) {
            (_, Some(code)) => println!("{:#04x} = {}", code, Opcode::from_code(*code)?),
            (Some(name), None) => {
                println!("{} = {:#04x}", name, cec::opcode::lookup(name)? as u8)
            }
            (None, None) => unreachable!("clap requires a name or --code"),
        }
        return Ok(());
    }

    info!("Using CEC Device Name: {}", args.osd_name);
    let cec = CEC::new(open(&args)?, &args.osd_name);

    match &args.command {
        Some(Command::Scan { json }) => {
            let dir = cec.scan()?;
            if *json {
                let devices: Vec<_> = dir.iter().collect();
                println!("{}", serde_json::to_string_pretty(&devices)?);
            } else {
                println!("CEC bus information");
                println!("===================");
                for dev in dir.iter() {
                    println!("{}", dev);
                }
            }
        }
        Some(Command::PowerOn { pattern }) => {
            cec.power_on(pattern)?;
        }
        Some(Command::ActiveSource) => {
            let frame = cec.announce_active_source()?;
            println!("{}", frame);
        }
        Some(Command::Send {
            command,
            from,
            to,
            params,
        }) => {
            let frame = cec.send(command, *from, *to, params)?;
            println!("{}", frame);
        }
        Some(Command::Raw { frame }) => {
            cec.transmit_raw(frame)?;
        }
        Some(Command::Opcode { .. }) => {}
        None => {
            match cec.power_on("TV") {
                Ok(_) => {}
                Err(cec::Error::DeviceNotFound(_)) => warn!("No TV on the bus, not powering on"),
                Err(err) => return Err(err.into()),
            }
            let frame = cec.announce_active_source()?;
            println!("{}", frame);
        }
    }
    Ok(())
}
