// Assembling
mod assembler;
pub use assembler::{Assembler, Object, Reporter};
pub mod catalog;
mod lexer;
mod symtab;
pub use symtab::SymbolTable;

// Object files
mod object;
pub use object::{read_object, write_object};

// Running
mod runtime;
pub use runtime::{Backing, Console, DiskImage, Vm, MEMORY_MAX};

mod error;
mod span;

/// Amount of lines to show as context, each side of focus line (line containing span).
pub const DIAGNOSTIC_CONTEXT_LINES: usize = 3;

/// Identifiers longer than this are a lexical error; symbol comparisons
/// never exceed it.
pub const MAX_NAME_LEN: usize = 32;

/// Reported errors up to this count are tolerated; the next one aborts the
/// assembly with FAIL.
pub const MAX_ERRORS: u32 = 8;
