use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use colored::*;
use slsnode::protocol::{Command, MAX_PAYLOAD_LEN};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{lookup_host, UdpSocket};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "3000";
const DEFAULT_TIMEOUT_MS: &str = "2000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = App::new("slsnode")
        .version("0.1.0")
        .author("Sensor Node Firmware Team")
        .about("💡 SLS node client - send commands to a sensor node over UDP")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("host")
                .short("H")
                .long("host")
                .value_name("HOST")
                .help("Node address")
                .takes_value(true)
                .default_value(DEFAULT_HOST)
                .global(true),
        )
        .arg(
            Arg::with_name("port")
                .short("p")
                .long("port")
                .value_name("PORT")
                .help("Node UDP port")
                .takes_value(true)
                .default_value(DEFAULT_PORT)
                .global(true),
        )
        .arg(
            Arg::with_name("timeout")
                .short("t")
                .long("timeout")
                .value_name("MS")
                .help("How long to wait for the reply")
                .takes_value(true)
                .default_value(DEFAULT_TIMEOUT_MS)
                .global(true),
        )
        .arg(
            Arg::with_name("format")
                .short("f")
                .long("format")
                .value_name("FORMAT")
                .help("Output format")
                .takes_value(true)
                .possible_values(&["text", "compact", "json"])
                .default_value("text")
                .global(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Enable verbose output")
                .global(true),
        )
        .subcommand(
            SubCommand::with_name("led")
                .about("🔴 LED bank control")
                .setting(AppSettings::SubcommandRequiredElseHelp)
                .subcommand(SubCommand::with_name("on").about("Turn the red LED on"))
                .subcommand(SubCommand::with_name("off").about("Turn the red LED off"))
                .subcommand(SubCommand::with_name("all-on").about("Turn every LED bank on"))
                .subcommand(
                    SubCommand::with_name("dim")
                        .about("Toggle the blue LED and set the dim level")
                        .arg(
                            Arg::with_name("level")
                                .help("Dim level (0-255)")
                                .required(true)
                                .validator(|v| match v.parse::<u8>() {
                                    Ok(_) => Ok(()),
                                    Err(_) => Err("Dim level must be between 0 and 255".into()),
                                }),
                        ),
                ),
        )
        .subcommand(
            SubCommand::with_name("temp")
                .about("🌡️  Temperature simulation")
                .setting(AppSettings::SubcommandRequiredElseHelp)
                .subcommand(
                    SubCommand::with_name("sim")
                        .about("Start or stop the simulation")
                        .arg(
                            Arg::with_name("state")
                                .help("Simulation state")
                                .required(true)
                                .possible_values(&["on", "off", "start", "stop"]),
                        ),
                )
                .subcommand(
                    SubCommand::with_name("set")
                        .about("Set the simulated temperature")
                        .arg(
                            Arg::with_name("value")
                                .help("Temperature in °C")
                                .required(true)
                                .allow_hyphen_values(true),
                        ),
                )
                .subcommand(SubCommand::with_name("get").about("Read the current temperature")),
        )
        .subcommand(
            SubCommand::with_name("status")
                .about("📊 Status reports")
                .arg(
                    Arg::with_name("report")
                        .help("Which report")
                        .required(true)
                        .possible_values(&["led", "network", "temp"]),
                ),
        )
        .subcommand(
            SubCommand::with_name("raw")
                .about("✉️  Send a raw command line")
                .arg(
                    Arg::with_name("line")
                        .help("Command text, e.g. \"led_dim 40\"")
                        .required(true)
                        .multiple(true)
                        .allow_hyphen_values(true),
                ),
        )
        .get_matches();

    let host = matches.value_of("host").unwrap_or(DEFAULT_HOST);
    let port = matches.value_of("port").unwrap_or(DEFAULT_PORT).parse::<u16>()?;
    let timeout = Duration::from_millis(matches.value_of("timeout").unwrap_or(DEFAULT_TIMEOUT_MS).parse::<u64>()?);
    let format = matches.value_of("format").unwrap_or("text");
    let verbose = matches.is_present("verbose");

    let request = match build_request(&matches) {
        Some(request) => request,
        None => {
            println!("{}", "No command specified. Use --help for usage information.".yellow());
            return Ok(());
        }
    };

    if request.len() > MAX_PAYLOAD_LEN {
        eprintln!(
            "{} Command is {} bytes; the node keeps only the first {}",
            "⚠️".yellow(),
            request.len(),
            MAX_PAYLOAD_LEN
        );
    }

    if verbose {
        println!("{}", "💡 SLS node client".bright_blue().bold());
        println!("{} {}:{} {}", "Sending to".dimmed(), host, port, request.bright_white());
    }

    let reply = send_command(host, port, &request, timeout).await?;
    print_reply(&request, &reply, format);

    Ok(())
}

fn build_request(matches: &ArgMatches<'_>) -> Option<String> {
    let line = match matches.subcommand() {
        ("led", Some(led)) => match led.subcommand() {
            ("on", _) => Command::LedOn.name().to_string(),
            ("off", _) => Command::LedOff.name().to_string(),
            ("all-on", _) => Command::LedAllOn.name().to_string(),
            ("dim", Some(dim)) => format!("{} {}", Command::LedDim.name(), dim.value_of("level")?),
            _ => return None,
        },
        ("temp", Some(temp)) => match temp.subcommand() {
            ("sim", Some(sim)) => {
                let on = matches!(sim.value_of("state")?, "on" | "start");
                let cmd = if on { Command::TempSimOn } else { Command::TempSimOff };
                cmd.name().to_string()
            }
            ("set", Some(set)) => format!("{} {}", Command::SetTemp.name(), set.value_of("value")?),
            ("get", _) => Command::GetTemp.name().to_string(),
            _ => return None,
        },
        ("status", Some(status)) => {
            let cmd = match status.value_of("report")? {
                "led" => Command::GetLedStatus,
                "network" => Command::GetNwStatus,
                _ => Command::GetTempStatus,
            };
            cmd.name().to_string()
        }
        ("raw", Some(raw)) => raw.values_of("line")?.collect::<Vec<_>>().join(" "),
        _ => return None,
    };
    Some(line)
}

async fn send_command(host: &str, port: u16, request: &str, timeout: Duration) -> Result<String, Box<dyn std::error::Error>> {
    let target: SocketAddr = match lookup_host((host, port)).await?.next() {
        Some(addr) => addr,
        None => return Err(format!("cannot resolve {}", host).into()),
    };

    let local: SocketAddr = if target.is_ipv4() {
        "0.0.0.0:0".parse()?
    } else {
        "[::]:0".parse()?
    };
    let socket = UdpSocket::bind(local).await?;
    socket.connect(target).await?;
    socket.send(request.as_bytes()).await?;

    let mut buffer = vec![0u8; 512];
    match tokio::time::timeout(timeout, socket.recv(&mut buffer)).await {
        Ok(Ok(n)) => Ok(String::from_utf8_lossy(&buffer[..n]).into_owned()),
        Ok(Err(e)) => {
            eprintln!("{} Network error: {}", "🔌".yellow(), e.to_string().bright_red());
            if e.kind() == std::io::ErrorKind::ConnectionRefused {
                eprintln!("{} Is the node running? Start it with:", "💡".yellow());
                eprintln!("   {}", "cargo run --bin slsnode-daemon".bright_cyan());
            }
            Err(e.into())
        }
        Err(_) => {
            eprintln!(
                "{} No reply from {} within {} ms",
                "⏱️".yellow(),
                target.to_string().bright_white(),
                timeout.as_millis()
            );
            Err("reply timed out".into())
        }
    }
}

fn print_reply(request: &str, reply: &str, format: &str) {
    match format {
        "compact" => println!("{}", reply),
        "json" => println!("{}", serde_json::json!({ "request": request, "reply": reply })),
        _ => {
            if reply.starts_with("Unknown cmd") {
                println!("{} {}", "❓".yellow(), reply.yellow());
            } else if reply.starts_with("Invalid") {
                println!("{} {}", "❌".red(), reply.bright_red());
            } else {
                println!("{} {}", "✅".green(), reply.bright_green());
            }
        }
    }
}
