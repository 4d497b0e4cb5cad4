use clap::Parser;
use geonames_harvester::cli::{args::Args, commands};
use std::error::Error;
use std::process;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {}", error);
            let mut source = error.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Geonames Harvester");
    println!("==================");
    println!();
    println!("Harvest geonames.org gazetteer dumps into an object store.");
    println!();
    println!("USAGE:");
    println!("    geonames-harvester <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    countries   Harvest one object per country with a <ISO>.txt detail file");
    println!("    features    Harvest one object per row of a feature dump");
    println!("    header      Print the column map of a countryInfo.txt reference file");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <FILE>      JSON configuration file");
    println!("    -s, --store-path <PATH>  Object store directory");
    println!("        --dry-run            Harvest into memory only");
    println!("    -h, --help               Show help information");
    println!("    -V, --version            Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Harvest countries using the bundled countryInfo.txt:");
    println!("    geonames-harvester countries --country-folder /data/geonames/countries");
    println!();
    println!("    # Harvest a feature dump without touching the store:");
    println!("    geonames-harvester features --feature-file allCountries.txt --dry-run");
    println!();
    println!("For detailed help on any command, use:");
    println!("    geonames-harvester <COMMAND> --help");
}
