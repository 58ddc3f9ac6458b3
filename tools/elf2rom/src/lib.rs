//! Conversion of the `.text` section of an ELF32 file into a listing of little-endian 16-bit
//! words, suitable for pasting into a ROM image.
//!
//! The listing has two parts: one `OFFS WORD` line per word, then every word as a `0xWWWW, `
//! literal on a single line.

use std::io::Write;

use anyhow::{Context, Result};
use ::log::{info, warn};

use crate::{
    cli::Config,
    code::{DecodeError, find_code_section},
    listing::write_listing,
    load::load_image,
};

pub mod cli;
pub mod code;
pub mod listing;
pub mod load;
pub mod log;
pub mod words;

/// Loads the file named by `config`, locates its `.text` section and writes its listing to
/// `out`.
///
/// Nothing is written when the file has no `.text` section, unless
/// [`Config::require_text`] is set, in which case that is an error.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded, is not a well-formed ELF32 file, its `.text`
/// section is not loaded at address zero, or writing to `out` fails.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<()> {
    let image = load_image(&config.path)?;
    info!("loaded {} ({} bytes)", config.path.display(), image.len());

    let code = find_code_section(&image)
        .with_context(|| format!("failed to decode {}", config.path.display()))?;

    let Some(code) = code else {
        if config.require_text {
            return Err(DecodeError::SectionNotFound)
                .with_context(|| format!("failed to decode {}", config.path.display()));
        }

        warn!("{} has no .text section", config.path.display());
        return Ok(());
    };

    info!(
        "section {} at file offset {:#x}: {} bytes, {} words",
        code.index(),
        code.file_offset(),
        code.bytes().len(),
        code.words().len()
    );

    write_listing(out, code.words()).context("failed to write listing")?;
    out.flush().context("failed to write listing")?;

    Ok(())
}
