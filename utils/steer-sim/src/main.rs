use std::io;
use std::path::PathBuf;
use std::time::Duration;

use common::*;
use config::ConfigType;
use simulation::Simulation;
use steering::DebugShape;

/// Runs a steering scenario headlessly
#[derive(argh::FromArgs)]
struct Args {
    /// scenario config file
    #[argh(option, default = "PathBuf::from(\"steering.ron\")")]
    config: PathBuf,

    /// number of ticks to run, instead of the config's
    #[argh(option)]
    ticks: Option<u32>,

    /// reload steering parameters when the config file changes, and tick in real time
    #[argh(switch)]
    watch: bool,

    /// trace debug shapes every tick
    #[argh(switch)]
    debug_shapes: bool,
}

fn log_tick(out: &mut dyn io::Write) -> io::Result<()> {
    write!(out, "T{:05}", simulation::current_tick())
}

fn main() {
    let args = argh::from_env::<Args>();

    let logger = match logging::LoggerBuilder::with_env().and_then(|builder| builder.init(log_tick))
    {
        Err(e) => {
            eprintln!("failed to setup logging: {}", e);
            std::process::exit(1);
        }
        Ok(l) => l,
    };

    info!("initialized logging"; "level" => ?logger.level());

    if let Err(e) = do_main(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn do_main(args: Args) -> BoxedResult<()> {
    info!("loading config"; "path" => %args.config.display());
    let cfg_type = if args.watch {
        ConfigType::WatchedFile(&args.config)
    } else {
        ConfigType::File(&args.config)
    };
    config::init(cfg_type)?;

    let initial = config::get();
    let mut sim = Simulation::from_config(&initial)?;

    let ticks = args.ticks.unwrap_or(initial.simulation.ticks);
    let realtime = args.watch || initial.simulation.realtime;
    let tick_duration = Duration::from_secs_f32(sim.tick_duration());

    info!("starting simulation";
        "agents" => sim.agents().count(),
        "ticks" => ticks,
        "realtime" => realtime
    );

    for _ in 0..ticks {
        // only parameters are hot, agents are fixed once the simulation starts
        if args.watch {
            sim.reload_parameters(config::get().steering);
        }

        for change in sim.tick() {
            if let Some(agent) = sim.agent(change.agent) {
                info!("{}", agent.label(); "agent" => agent.name(), "from" => change.from);
            }
        }

        if args.debug_shapes {
            let mut shapes = Vec::<DebugShape>::new();
            sim.render_debug(&mut shapes);
            for shape in &shapes {
                trace!("debug shape"; "shape" => shape);
            }
        }

        if realtime {
            std::thread::sleep(tick_duration);
        }
    }

    info!("finished simulation"; "ticks" => sim.tick_count());

    for (id, agent) in sim.agents() {
        let (pos, vel) = (agent.position(), agent.velocity());
        println!(
            "{:<4} {:<12} {:<7} pos=({:.3}, {:.3}) vel=({:.3}, {:.3})",
            id.to_string(),
            agent.name(),
            agent.label(),
            pos.x,
            pos.y,
            vel.x,
            vel.y
        );
    }

    Ok(())
}
