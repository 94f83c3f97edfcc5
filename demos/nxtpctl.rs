use anyhow::{bail, Context, Result};
use serialport::{DataBits, FlowControl, Parity, StopBits};

use nxtp_proto::sink::SignController;
use nxtp_proto::{ControllerIdentity, FormatOption, SignAddress, MAX_TEXT_LEN};

const DEFAULT_PORT: &str = "/dev/ttyUSB0";
const MAX_ADDRESSES: usize = 10;
const MAX_FORMAT_OPTS: usize = 10;

fn usage(name: &str) -> String {
    format!(
        "Sunrise Systems NXTP Sign Controller v{}\n\n\
         Usage: {} -t text [ -p port ] [ -a address ... ] [ -f fmt-name,fmt-value ... ]\n\n\
         \t-p port\t\t\tUART port to use (default: \"{}\")\n\
         \t-a address\t\tAddress of one or more signs (default: 0, broadcast)\n\
         \t-t text\t\t\tText string to use\n\
         \t-f name,value\t\tOne or more format name and value pairs\n\
         \t-c mid,extPid,pid\tJ1587 controller configuration\n",
        env!("CARGO_PKG_VERSION"),
        name,
        DEFAULT_PORT
    )
}

struct Options {
    port: String,
    addresses: Vec<SignAddress>,
    text: String,
    formats: Vec<FormatOption>,
    ctlr: ControllerIdentity,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options> {
    let mut opts = Options {
        port: DEFAULT_PORT.to_string(),
        addresses: Vec::new(),
        text: String::new(),
        formats: Vec::new(),
        ctlr: ControllerIdentity::default(),
    };

    while let Some(flag) = args.next() {
        let mut value = || args.next().with_context(|| format!("Missing value for {}", flag));
        match flag.as_str() {
            "-p" | "--port" => opts.port = value()?,
            "-a" | "--address" => {
                if opts.addresses.len() >= MAX_ADDRESSES {
                    bail!("Too many addresses");
                }
                opts.addresses.push(value()?.parse()?);
            }
            "-t" | "--text" => opts.text = value()?.chars().take(MAX_TEXT_LEN).collect(),
            "-f" | "--format" => {
                if opts.formats.len() >= MAX_FORMAT_OPTS {
                    bail!("Too many format options");
                }
                opts.formats.push(value()?.parse()?);
            }
            "-c" | "--ctlr" => opts.ctlr = value()?.parse()?,
            other => bail!("Unknown option {}", other),
        }
    }

    if opts.text.is_empty() {
        bail!("No text specified");
    }
    if opts.addresses.is_empty() {
        opts.addresses.push(SignAddress::BROADCAST);
    }
    Ok(opts)
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args();
    let name = args.next().unwrap_or_else(|| "nxtpctl".to_string());
    let opts = match parse_args(args) {
        Ok(opts) => opts,
        Err(err) => {
            eprintln!("{}\n\n{}", err, usage(&name));
            std::process::exit(1);
        }
    };

    let serial = serialport::new(&opts.port, 9600)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(std::time::Duration::from_millis(100))
        .open()
        .with_context(|| format!("Failed to open serial port {}", opts.port))?;

    let mut sign = SignController::new(serial, opts.ctlr);
    sign.update(&opts.addresses, &opts.text, &opts.formats)?;
    sign.close()?;
    Ok(())
}
