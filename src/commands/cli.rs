//! Command-line interface definition

use clap::{Arg, ArgAction, Command as ClapCommand};

/// Build the clap command for the `regionkit` binary
pub fn build_cli() -> ClapCommand {
    ClapCommand::new("RegionKit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract bounded connected regions from labeled volumes")
        .arg(
            Arg::new("input")
                .help("Label volume (.lvol, grayscale image, or directory of images) or region file (.rrg)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("seed")
                .short('s')
                .long("seed")
                .help("Seed voxel in index space, one value per axis (e.g. 12,40,7)")
                .value_name("COORD")
                .allow_hyphen_values(true)
                .required(false),
        )
        .arg(
            Arg::new("shape")
                .long("shape")
                .help("Neighborhood shape: diamond, rectangle or hypersphere with optional radius (e.g. diamond:1)")
                .value_name("SHAPE")
                .required(false),
        )
        .arg(
            Arg::new("max-size")
                .short('m')
                .long("max-size")
                .help("Maximum number of voxels in the extracted region")
                .value_name("VOXELS")
                .required(false),
        )
        .arg(
            Arg::new("visited")
                .long("visited")
                .help("Visited-set bookkeeping (auto, dense, sparse)")
                .value_name("POLICY")
                .required(false),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Write the extracted region to this region file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("mask-png")
                .long("mask-png")
                .help("Write the region mask as PNG images into this directory")
                .value_name("DIR")
                .required(false),
        )
        .arg(
            Arg::new("compression")
                .long("compression")
                .help("Region file payload compression (none, deflate, zstd or zstd:LEVEL)")
                .value_name("NAME")
                .required(false),
        )
        .arg(
            Arg::new("info")
                .short('i')
                .long("info")
                .help("Describe the input volume or region file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("colorize")
                .short('c')
                .long("colorize")
                .help("Render a label plane to this PNG file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("slice")
                .long("slice")
                .help("Plane along the first axis of a 3-D volume to colorize")
                .value_name("Z")
                .allow_hyphen_values(true)
                .required(false),
        )
        .arg(
            Arg::new("palette")
                .long("palette")
                .help("Label palette (glasbey, golden-angle, saalfeld)")
                .value_name("NAME")
                .required(false),
        )
        .arg(
            Arg::new("lut-seed")
                .long("lut-seed")
                .help("Seed for the label color hash")
                .value_name("SEED")
                .required(false),
        )
        .arg(
            Arg::new("select")
                .long("select")
                .help("Only color these labels (e.g. 3,17,42)")
                .value_name("LABELS")
                .required(false),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Configuration file (defaults to regionkit.toml when present)")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only report warnings and errors; no progress display")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CommandFactory, RegionkitCommandFactory};
    use crate::config::RegionKitConfig;
    use crate::utils::logger::Logger;

    #[test]
    fn test_cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_negative_seed_is_accepted() {
        let matches = build_cli().get_matches_from(["regionkit", "cells.lvol", "--seed", "-1,4"]);
        assert_eq!(matches.get_one::<String>("seed").unwrap(), "-1,4");
    }

    #[test]
    fn test_factory_rejects_bad_arguments_early() {
        let logger = Logger::disabled();
        let config = RegionKitConfig::default();
        let factory = RegionkitCommandFactory::new();

        for argv in [
            vec!["regionkit", "cells.lvol", "--seed", "1,x"],
            vec!["regionkit", "cells.lvol", "--seed", "1,2", "--shape", "star"],
            vec!["regionkit", "cells.lvol", "--seed", "1,2", "--max-size", "0"],
            vec!["regionkit", "cells.lvol", "--seed", "1,2", "--compression", "lzw"],
            vec!["regionkit", "cells.lvol", "--colorize", "out.png", "--palette", "jet"],
        ] {
            let matches = build_cli().get_matches_from(argv.clone());
            assert!(factory.create_command(&matches, &config, &logger).is_err(), "{:?}", argv);
        }

        let matches = build_cli().get_matches_from(["regionkit", "cells.lvol", "--seed", "1,2", "--max-size", "1_000"]);
        assert!(factory.create_command(&matches, &config, &logger).is_ok());
    }
}
