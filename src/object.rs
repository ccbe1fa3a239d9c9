//! Object file format: one 4-hex-digit word per line, no header or
//! relocation. The loader accepts any whitespace separation.

use std::fs;
use std::io::Write;
use std::path::Path;

use miette::{IntoDiagnostic, Result};

use crate::error;
use crate::MEMORY_MAX;

/// Persist the word stream.
pub fn write_object(path: &Path, words: &[u16]) -> Result<()> {
    let mut out = String::with_capacity(words.len() * 5);
    for word in words {
        out.push_str(&format!("{word:04x}\n"));
    }
    let mut file = fs::File::create(path).into_diagnostic()?;
    file.write_all(out.as_bytes()).into_diagnostic()?;
    Ok(())
}

/// Load a word stream back from object text.
pub fn read_object(text: &str) -> Result<Vec<u16>> {
    let mut words = Vec::new();
    for tok in text.split_whitespace() {
        let word = u16::from_str_radix(tok, 16).map_err(|_| error::obj_bad_word(tok))?;
        words.push(word);
        if words.len() > MEMORY_MAX {
            return Err(error::obj_too_long(words.len()));
        }
    }
    Ok(words)
}
