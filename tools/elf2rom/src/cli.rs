//! Command line parsing and [`Config`] construction.

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

/// Description of a single `elf2rom` invocation.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Config {
    /// The path of the ELF32 file to convert.
    pub path: PathBuf,
    /// The number of times `-v` was given.
    pub verbosity: u8,
    /// Whether a missing `.text` section is an error.
    pub require_text: bool,
}

/// Parses `elf2rom`'s arguments to construct a [`Config`].
///
/// Invalid arguments print a usage message and exit the process with status 1.
pub fn get_config() -> Config {
    let matches = command_parser().get_matches();
    parse_arguments(&matches)
}

/// Parses the arguments required to produce a valid [`Config`].
pub fn parse_arguments(matches: &ArgMatches) -> Config {
    let path = matches
        .get_one::<PathBuf>("file")
        .cloned()
        .unwrap_or_else(|| unreachable!("`file` is a required argument"));

    let verbosity = matches.get_count("verbose");
    let require_text = matches.get_flag("require-text");

    Config {
        path,
        verbosity,
        require_text,
    }
}

/// Returns the command parser for `elf2rom`.
pub fn command_parser() -> Command {
    let file = Arg::new("file")
        .help("The ELF32 file whose `.text` section is dumped")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .required(true);

    let verbose = Arg::new("verbose")
        .short('v')
        .long("verbose")
        .help("Log decoding details to stderr (repeat for more detail)")
        .action(ArgAction::Count);

    let require_text = Arg::new("require-text")
        .long("require-text")
        .help("Fail when the file has no `.text` section")
        .action(ArgAction::SetTrue);

    Command::new("elf2rom")
        .about("Dumps the `.text` section of an ELF32 file as 16-bit words")
        .arg(file)
        .arg(verbose)
        .arg(require_text)
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use clap::error::ErrorKind;

    use super::{command_parser, parse_arguments};

    #[test]
    fn debug_assert() {
        command_parser().debug_assert();
    }

    #[test]
    fn file_only() {
        let matches = command_parser().get_matches_from(["elf2rom", "program.elf"]);
        let config = parse_arguments(&matches);

        assert_eq!(config.path, Path::new("program.elf"));
        assert_eq!(config.verbosity, 0);
        assert!(!config.require_text);
    }

    #[test]
    fn flags() {
        let matches = command_parser().get_matches_from([
            "elf2rom",
            "-vv",
            "--require-text",
            "program.elf",
            "--verbose",
        ]);
        let config = parse_arguments(&matches);

        assert_eq!(config.verbosity, 3);
        assert!(config.require_text);
    }

    #[test]
    fn missing_file() {
        let error = command_parser()
            .try_get_matches_from(["elf2rom"])
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn extra_file() {
        let error = command_parser()
            .try_get_matches_from(["elf2rom", "a.elf", "b.elf"])
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::UnknownArgument);
    }
}
