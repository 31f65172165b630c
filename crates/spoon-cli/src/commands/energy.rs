//! Energy level lookup for a spoon count.

use clap::Args;
use serde_json::json;

use spoon_core::presenter::spoon_gauge;
use spoon_core::EnergyLevel;

#[derive(Args)]
pub struct EnergyArgs {
    /// Number of spoons left
    spoons: u32,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: EnergyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let level = EnergyLevel::from_spoons(args.spoons);

    if args.json {
        let out = json!({
            "spoons": args.spoons,
            "energyLevel": level,
            "color": level.color_hex(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{level}");
        println!("{}", spoon_gauge(args.spoons));
    }
    Ok(())
}
