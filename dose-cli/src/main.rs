mod lenient;

use clap::error::ErrorKind;
use clap::Parser;
use dose_sim_core::simulation::config::{
    DEFAULT_BEAM_RADIUS, DEFAULT_GRID_RADIUS, DEFAULT_INTENSITY, DEFAULT_RESOLUTION,
};
use dose_sim_core::{write_dump, BeamKind, DoseSimulation, SimulationConfig};
use std::ffi::OsString;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Supply at least 4 parameters
  1: start height (cm)
  2: timestep (s)
  3: end time (s)
  4: beam type (c = circular, g = gaussian)

You may supply up to 8 parameters (defaults in parentheses)
  5: grid radius (0.15 cm)
  6: beam radius (1 cm)
  7: beam intensity (2 W/cm^2)
  8: grid resolution (50)
";

/// Dose map of a radiation beam falling onto a circular detector
#[derive(Parser, Debug)]
#[command(name = "dose-sim")]
#[command(about = "Falling-beam dose accumulation", long_about = None)]
#[command(allow_negative_numbers = true)]
struct Args {
    /// Start height of the beam above the detector (cm)
    #[arg(allow_hyphen_values = true, value_parser = lenient::real_arg)]
    start_height: f64,

    /// Time step (s)
    #[arg(allow_hyphen_values = true, value_parser = lenient::real_arg)]
    dt: f64,

    /// End time (s)
    #[arg(allow_hyphen_values = true, value_parser = lenient::real_arg)]
    end_time: f64,

    /// Beam type: c = circular, g = gaussian
    #[arg(allow_hyphen_values = true)]
    beam_type: String,

    /// Detector (grid) radius in cm
    #[arg(allow_hyphen_values = true, default_value_t = DEFAULT_GRID_RADIUS, value_parser = lenient::real_arg)]
    grid_radius: f64,

    /// Beam radius in cm (standard deviation for gaussian beams)
    #[arg(allow_hyphen_values = true, default_value_t = DEFAULT_BEAM_RADIUS, value_parser = lenient::real_arg)]
    beam_radius: f64,

    /// Beam intensity in W/cm^2
    #[arg(allow_hyphen_values = true, default_value_t = DEFAULT_INTENSITY, value_parser = lenient::real_arg)]
    intensity: f64,

    /// Grid points per axis
    #[arg(allow_hyphen_values = true, default_value_t = DEFAULT_RESOLUTION, value_parser = lenient::count_arg)]
    resolution: usize,

    /// Ignored surplus arguments
    #[arg(hide = true, allow_hyphen_values = true)]
    extra: Vec<String>,

    /// Beam intensity change per simulated second (W/cm^2/s)
    #[arg(long, default_value_t = 0.0, value_parser = lenient::real_arg)]
    intensity_ramp: f64,

    /// Log filter for stderr output (e.g. "info", "dose_sim_core=debug")
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn to_config(&self, beam_kind: BeamKind) -> SimulationConfig {
        SimulationConfig::new(self.start_height, self.dt, self.end_time, beam_kind)
            .with_grid_radius(self.grid_radius)
            .with_beam_radius(self.beam_radius)
            .with_intensity(self.intensity)
            .with_resolution(self.resolution)
            .with_intensity_ramp(self.intensity_ramp)
    }
}

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    // Repeated runs in one process keep the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Parse `argv`, run the simulation and write the dose map to `out`.
///
/// Usage text and the beam type error also go to `out`. Returns the process
/// exit status.
fn run<I, T, W>(argv: I, out: &mut W) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
{
    let args = match Args::try_parse_from(argv) {
        Ok(args) => args,
        Err(err) if err.kind() == ErrorKind::MissingRequiredArgument => {
            return match out.write_all(USAGE.as_bytes()).and_then(|()| out.flush()) {
                Ok(()) => 1,
                Err(e) => {
                    error!("Failed to write usage: {e}");
                    1
                }
            };
        }
        Err(err) => {
            let _ = err.print();
            return u8::try_from(err.exit_code()).unwrap_or(1);
        }
    };

    init_logging(&args.log_level);

    let beam_kind = match BeamKind::from_token(&args.beam_type) {
        Ok(kind) => kind,
        Err(e) => {
            if let Err(write_err) = writeln!(out, "{e}").and_then(|()| out.flush()) {
                error!("Failed to write error message: {write_err}");
            }
            return 1;
        }
    };

    if !args.extra.is_empty() {
        info!("Ignoring {} surplus argument(s)", args.extra.len());
    }

    let config = args.to_config(beam_kind);
    let mut sim = DoseSimulation::new(&config);
    let summary = sim.run();
    info!(
        "{} ticks, final velocity {:.3}cm/s, final intensity {}W/cm²",
        summary.ticks, summary.state.velocity, summary.final_intensity
    );

    if let Err(e) = write_dump(sim.grid(), out) {
        error!("Failed to write dose map: {e}");
        return 1;
    }

    0
}

fn main() -> ExitCode {
    let mut out = BufWriter::new(io::stdout().lock());
    ExitCode::from(run(std::env::args_os(), &mut out))
}
