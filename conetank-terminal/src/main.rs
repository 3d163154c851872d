/// ConeTank - liquid volume in an inverted truncated cone, in the terminal
///
/// Controls:
///   - Up/Down: Select an input
///   - Left/Right, PgUp/PgDn: Adjust it
///   - WASD: Orbit the view, Space: spin, P: projection
///   - `:`: Type assignments such as `R=2 h=1.5`
///   - Q/ESC: Quit
use std::path::PathBuf;

use clap::Parser;
use conetank_core::{parse_assignments, TankInputs, TankProfile};
use conetank_terminal::{report, Result, TerminalApp};
use log::info;

#[derive(Parser)]
#[command(name = "conetank")]
#[command(version)]
#[command(about = "Liquid volume calculator for an inverted truncated cone tank")]
struct Args {
    /// Built-in profile: unit or slurry
    #[arg(short, long, default_value = "unit")]
    preset: String,

    /// JSON tank profile (overrides --preset)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the result and exit instead of opening the interactive view
    #[arg(long)]
    print: bool,

    /// Initial values, e.g. R=2.5 r=0.2 H=3 h=1
    assignments: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let profile = match &args.config {
        Some(path) => TankProfile::load(path)?,
        None => TankProfile::preset(&args.preset)?,
    };

    let mut inputs = TankInputs::from_profile(&profile);
    let assignments = parse_assignments(&args.assignments.join(" "))?;
    inputs.apply(&assignments, &profile)?;

    if args.print {
        print!("{}", report(&profile, &inputs)?);
        return Ok(());
    }

    info!("starting interactive view with profile '{}'", profile.name);
    let mut app = TerminalApp::new(profile, inputs)?;
    app.run()
}
