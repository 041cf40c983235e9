use clap::{App, Arg};
use slsnode::server;
use slsnode::subsystems::{SimulatedLeds, SimulatedRadio};
use slsnode::{MatchMode, Node, NodeConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let matches = App::new("slsnode-daemon")
        .version("0.1.0")
        .about("SLS sensor node with simulated radio and LED drivers")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("JSON configuration file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("bind")
                .short("b")
                .long("bind")
                .value_name("ADDR")
                .help("Local address to bind")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("port")
                .short("p")
                .long("port")
                .value_name("PORT")
                .help("UDP port to listen on")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("node-id")
                .short("n")
                .long("node-id")
                .value_name("ID")
                .help("Node identity byte shown in status replies")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("match")
                .short("m")
                .long("match")
                .value_name("MODE")
                .help("Command token matching")
                .takes_value(true)
                .possible_values(&["exact", "substring"]),
        )
        .get_matches();

    let mut config = match matches.value_of("config") {
        Some(path) => NodeConfig::load(path)?,
        None => NodeConfig::default(),
    };
    if let Some(bind) = matches.value_of("bind") {
        config.bind_addr = bind.parse()?;
    }
    if let Some(port) = matches.value_of("port") {
        config.port = port.parse()?;
    }
    if let Some(id) = matches.value_of("node-id") {
        config.node_id = id.parse()?;
    }
    if let Some(mode) = matches.value_of("match") {
        config.match_mode = mode.parse::<MatchMode>()?;
    }
    config.validate()?;

    println!("💡 SLS Sensor Node");
    println!("==================");
    info!("Node ID: {}", config.node_id);
    info!(
        "Temperature simulation {}..={}°C step {} every {} ms",
        config.temperature.min_c, config.temperature.max_c, config.temperature.step_c, config.tick_period_ms
    );
    info!("Command matching: {:?}", config.match_mode);
    info!("Available commands:");
    info!("  led_on | led_off | led_all_on | led_dim <level>");
    info!("  TEMP_SIM_ON | TEMP_SIM_OFF | SET_TEMP <value> | GET_TEMP");
    info!("  GET_LED_STATUS | GET_NW_STATUS | GET_TEMP_STATUS");

    let node = Node::new(config, SimulatedLeds::new(), SimulatedRadio::default());

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Ctrl-C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };

    match server::run(node, shutdown).await {
        Ok(stats) => {
            info!("📊 final stats: {}", serde_json::to_string(&stats)?);
            println!("💡 SLS node stopped");
            Ok(())
        }
        Err(e) => {
            error!("❌ node error: {}", e);
            Err(e.into())
        }
    }
}
