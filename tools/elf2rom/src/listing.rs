//! Textual renderings of a word sequence.

use std::io::{self, Write};

use crate::words::Words;

/// Writes both renderings of `words`: the offset listing followed by the literal list.
///
/// # Errors
///
/// Returns any error produced by `out`.
pub fn write_listing<W: Write>(out: &mut W, words: Words<'_>) -> io::Result<()> {
    write_offset_listing(out, words.clone())?;
    write_literal_list(out, words)
}

/// Writes one `OFFS WORD` line per word, both as zero-padded uppercase hexadecimal.
///
/// # Errors
///
/// Returns any error produced by `out`.
pub fn write_offset_listing<W: Write>(out: &mut W, words: Words<'_>) -> io::Result<()> {
    for (offset, word) in words.with_offsets() {
        writeln!(out, "{offset:04X} {word:04X}")?;
    }

    Ok(())
}

/// Writes every word as a `0xWWWW, ` literal on a single line, ready to paste into a source
/// array.
///
/// # Errors
///
/// Returns any error produced by `out`.
pub fn write_literal_list<W: Write>(out: &mut W, words: Words<'_>) -> io::Result<()> {
    for word in words {
        write!(out, "0x{word:04X}, ")?;
    }

    writeln!(out)
}
