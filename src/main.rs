use std::path::PathBuf;
use std::time::Instant;

use plume::config::{self, Config, ConfigError};
use plume::solver::diagnostics::{compute_kinetic_energy, max_divergence, max_value, total};
use plume::Solver;

/// Command-line overrides.
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    config: Option<PathBuf>,
    frames: Option<usize>,
}

/// Parse `--config <path>` and `--frames <n>`. Unknown flags are ignored
/// with a warning.
fn parse_args(args: &[String]) -> CliArgs {
    let mut out = CliArgs::default();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => out.config = iter.next().map(PathBuf::from),
            "--frames" => match iter.next().map(|v| v.parse::<usize>()) {
                Some(Ok(n)) => out.frames = Some(n),
                Some(Err(e)) => log::warn!("ignoring --frames: {e}"),
                None => log::warn!("--frames needs a value"),
            },
            other => log::warn!("unknown argument: {other}"),
        }
    }
    out
}

fn load_config(args: &CliArgs) -> Result<Config, ConfigError> {
    let mut cfg = match &args.config {
        Some(path) => config::load_from(path)?,
        None => config::load(),
    };
    if let Some(frames) = args.frames {
        cfg.run.frames = frames;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn log_frame(solver: &Solver, frame: usize) {
    let grid = solver.grid();
    log::info!(
        "frame {:>5}: mass={:.4} max_density={:.4} ke={:.3e} max_div={:.3e}",
        frame,
        total(solver.density(), grid),
        max_value(solver.density(), grid),
        compute_kinetic_energy(solver.vx(), solver.vy(), grid),
        max_divergence(solver.vx(), solver.vy(), grid),
    );
}

fn run(args: &CliArgs) -> Result<(), ConfigError> {
    let cfg = load_config(args)?;
    let mut solver = Solver::new(cfg.grid.size, cfg.solver.clone())?;
    log::info!(
        "running {} frames on a {}x{} grid",
        cfg.run.frames, cfg.grid.size, cfg.grid.size
    );

    let start = Instant::now();
    for frame in 1..=cfg.run.frames {
        cfg.run.emitter.emit(&mut solver);
        solver.step(&cfg.step);
        if cfg.run.log_every > 0 && frame % cfg.run.log_every == 0 {
            log_frame(&solver, frame);
        }
    }

    let elapsed = start.elapsed();
    log_frame(&solver, cfg.run.frames);
    if cfg.run.frames > 0 {
        log::info!(
            "{} frames in {:.2?} ({:.3} ms/frame)",
            cfg.run.frames,
            elapsed,
            elapsed.as_secs_f64() * 1000.0 / cfg.run.frames as f64
        );
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run(&parse_args(&args)) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
