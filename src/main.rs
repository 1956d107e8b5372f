//! Command-line entry point for the helico viewer.

use std::path::PathBuf;

use clap::Parser;
use helico::{options::Options, Viewer};

#[derive(Parser, Debug)]
#[command(name = "helico")]
#[command(about = "Procedural DNA helix and organoid viewer")]
#[command(long_about = None)]
struct Cli {
    /// Structure to show at startup: "dna" or "organoid"
    structure: Option<String>,

    /// TOML preset to load options from
    #[arg(short, long, value_name = "PATH")]
    options: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let options = match cli.options.as_deref().map(Options::load) {
        Some(Ok(options)) => options,
        Some(Err(e)) => {
            log::error!("{e}");
            std::process::exit(1);
        }
        None => Options::default(),
    };

    let mut builder = Viewer::builder().with_options(options);
    if let Some(structure) = cli.structure {
        builder = builder.with_structure(structure);
    }

    if let Err(e) = builder.build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_and_preset_are_optional() {
        let cli = Cli::try_parse_from(["helico"]).unwrap();
        assert_eq!(cli.structure, None);
        assert_eq!(cli.options, None);
    }

    #[test]
    fn parses_structure_and_preset() {
        let cli =
            Cli::try_parse_from(["helico", "organoid", "-o", "dense.toml"])
                .unwrap();
        assert_eq!(cli.structure.as_deref(), Some("organoid"));
        assert_eq!(cli.options, Some(PathBuf::from("dense.toml")));

        let cli = Cli::try_parse_from(["helico", "--options", "a.toml"])
            .unwrap();
        assert_eq!(cli.options, Some(PathBuf::from("a.toml")));
    }

    #[test]
    fn rejects_unknown_flags_and_extra_arguments() {
        assert!(Cli::try_parse_from(["helico", "--bogus"]).is_err());
        assert!(Cli::try_parse_from(["helico", "dna", "organoid"]).is_err());
        assert!(Cli::try_parse_from(["helico", "--options"]).is_err());
    }
}
