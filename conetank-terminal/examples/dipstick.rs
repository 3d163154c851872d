/// Example: print a dipstick table (fill height -> volume) for a tank profile
///
/// Usage: cargo run --example dipstick -- [unit|slurry|path/to/profile.json] [rows]
use std::env;

use conetank_core::{TankInputs, TankProfile};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let source = args.get(1).map(String::as_str).unwrap_or("slurry");
    let rows: u32 = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(10);

    let profile = if source.ends_with(".json") {
        TankProfile::load(source)?
    } else {
        TankProfile::preset(source)?
    };
    let frustum = TankInputs::from_profile(&profile).frustum()?;

    println!("{}", profile.title);
    println!(
        "R = {} {unit}, r = {} {unit}, H = {} {unit}",
        frustum.top_radius(),
        frustum.bottom_radius(),
        frustum.height(),
        unit = profile.length_unit
    );
    println!("{:>12}  {:>14}", format!("h ({})", profile.length_unit), profile.volume_unit);

    for i in 0..=rows.max(1) {
        let h = frustum.height() * f64::from(i) / f64::from(rows.max(1));
        let volume = profile.display_volume(frustum.volume(h));
        println!("{h:>12.2}  {volume:>14.2}");
    }
    Ok(())
}
