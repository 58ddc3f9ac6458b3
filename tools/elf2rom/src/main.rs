//! Tool for dumping the `.text` section of an ELF32 file as 16-bit ROM words.

use std::{
    io::{self, BufWriter, Write},
    process::ExitCode,
};

use elf2rom::cli;

fn main() -> ExitCode {
    let config = cli::get_config();
    elf2rom::log::init(config.verbosity);

    let mut stdout = BufWriter::new(io::stdout().lock());
    match elf2rom::run(&config, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(stdout, "{error:#}");
            let _ = stdout.flush();
            ExitCode::FAILURE
        }
    }
}
