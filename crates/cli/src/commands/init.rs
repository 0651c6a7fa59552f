use anyhow::{Context, Result, bail};
use popsynth_sim::simulation::Configuration;

use crate::args::{InitArgs, ModeArg};
use crate::printing::print_parameters;

pub fn init_configuration(args: &InitArgs) -> Result<()> {
    println!("🌟 popsynth - Initializing Configuration");
    println!("============================================\n");

    if args.output.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        );
    }

    let config = Configuration {
        mode: args.mode.into(),
        grid_file: args.grid.clone(),
        ..Configuration::default()
    };
    config
        .to_file(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    print_parameters(&config);
    println!("✓ Configuration written to {}", args.output.display());
    println!(
        "\nNext: popsynth {} --config {}",
        match args.mode {
            ModeArg::Single => "single",
            ModeArg::Binary => "binary",
        },
        args.output.display()
    );
    Ok(())
}
