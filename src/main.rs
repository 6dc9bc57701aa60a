use clap::Parser;
use log::{error, info, warn};
use rand::Rng;
use rtksim::config;
use rtksim::logging;
use rtksim::simulation::{Outcome, Simulation};
use rtksim::{AgentConfig, Arena, LidarConfig};
use std::path::Path;
use std::process;

// --- Command Line Arguments ---
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Occupancy map image file, or the name of an embedded map (e.g. maps/arena.png).
    /// Black pixels are obstacles. Defaults to the embedded arena.
    #[arg(long)]
    map: Option<String>,

    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = config::MAX_TICKS)]
    ticks: u32,

    /// Lidar range in map pixels.
    #[arg(long, default_value_t = config::LIDAR_RANGE)]
    range: u32,

    /// Number of lidar rays across the field of view.
    #[arg(long, default_value_t = config::LIDAR_RAYS)]
    rays: usize,

    /// Turret rotation per tick, in radians.
    #[arg(long, default_value_t = config::HEAD_STEP)]
    head_step: f64,

    /// Throttle in [-1, 1], scaled by the nominal linear speed.
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    linear: f64,

    /// Steering in [-1, 1], scaled by the nominal angular speed.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    angular: f64,

    /// Draw a random throttle/steer pair every tick instead of the fixed command.
    #[arg(long)]
    random_actions: bool,

    /// Seed for start positions, headings and random actions.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Debug filter to specify log topics (e.g., "drive,turret,scan")
    /// Available topics: agent, drive, turret, scan, sim
    #[arg(long)]
    debug_filter: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    // RUST_LOG takes over when present
    let logger = if std::env::var_os("RUST_LOG").is_some() {
        logging::init_env_logger()
    } else {
        logging::init_logger(logging::parse_level(&args.log_level), args.debug_filter.clone())
    };
    if let Err(e) = logger {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    if let Some(filter) = &args.debug_filter {
        for topic in logging::parse_filters(filter) {
            if !logging::TOPICS.contains(&topic.as_str()) {
                warn!("Unknown debug topic '{}'", topic);
            }
        }
    }

    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> rtksim::Result<()> {
    info!("Initializing RTK simulation...");

    let arena = match &args.map {
        Some(path) if Path::new(path).exists() => Arena::load(path)?,
        Some(name) => Arena::from_asset(name)?,
        None => Arena::from_default_map()?,
    };

    let agent_config = AgentConfig {
        lidar: LidarConfig {
            range: args.range,
            rays: args.rays,
            ..Default::default()
        },
        head_step: args.head_step,
        ..Default::default()
    };

    let mut sim = Simulation::new(arena, agent_config, args.ticks, args.seed)?;
    let (throttle, steer) = (args.linear, args.angular);
    let random_actions = args.random_actions;

    let outcome = sim.run(|agent, rng| {
        if random_actions {
            agent.scaled_action(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0))
        } else {
            agent.scaled_action(throttle, steer)
        }
    })?;

    let pose = sim.agent.pose;
    match outcome {
        Outcome::Destroyed { tick } => info!("Agent destroyed at tick {}", tick),
        Outcome::TimedOut => info!("Agent survived {} ticks", sim.tick),
    }
    info!(
        "Final pose ({:.1}, {:.1}) heading {:.3}, turret {:.3}",
        pose.x, pose.y, pose.heading, sim.agent.head.heading
    );
    if let Some(nearest) = sim.agent.last_scan().nearest() {
        info!(
            "Last scan: {} rays, nearest return {:.1} px ({:?})",
            sim.agent.last_scan().len(),
            nearest.distance,
            nearest.kind
        );
    }
    Ok(())
}
