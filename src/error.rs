use miette::{miette, LabeledSpan, Report, Severity};

use crate::span::Span;

// Lexer errors

pub fn lex_invalid_char(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "lex::invalid_char",
        help = "only names, hex literals, ':', ';', '#' and '@' are meaningful here.",
        labels = vec![LabeledSpan::at(span, "invalid character")],
        "Encountered an invalid character.",
    )
    .with_source_code(src.to_string())
}

pub fn lex_name_too_long(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "lex::name_len",
        help = format!(
            "names and labels are capped at {} characters.",
            crate::MAX_NAME_LEN
        ),
        labels = vec![LabeledSpan::at(span, "oversize name")],
        "Name or label too long.",
    )
    .with_source_code(src.to_string())
}

pub fn lex_bad_literal(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "lex::bad_lit",
        help = "literals are hex and must start with a digit, like 0ff.",
        labels = vec![LabeledSpan::at(span, "incorrect literal")],
        "Encountered an invalid numeric literal.",
    )
    .with_source_code(src.to_string())
}

pub fn lex_number_too_large(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "lex::num_range",
        help = "values from 0 to ffff fit in one word.",
        labels = vec![LabeledSpan::at(span, "oversize literal")],
        "Number too large.",
    )
    .with_source_code(src.to_string())
}

// Pass errors

pub fn asm_expected_stmt(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::stmt",
        help = "lines hold an optional label, then one mnemonic or directive.",
        labels = vec![LabeledSpan::at(span, "unexpected token")],
        "Opcode or directive expected.",
    )
    .with_source_code(src.to_string())
}

pub fn asm_unknown_instr(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::instr",
        help = "run `stax symbols` for the list of known mnemonics.",
        labels = vec![LabeledSpan::at(span, "unknown instruction")],
        "Instruction expected.",
    )
    .with_source_code(src.to_string())
}

pub fn asm_expected_operand(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::operand",
        help = "operands are hex literals or label references.",
        labels = vec![LabeledSpan::at(span, "operand expected here")],
        "Missing or invalid operand.",
    )
    .with_source_code(src.to_string())
}

pub fn asm_expected_literal(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::literal",
        help = "'#' emits one word from the hex literal that follows it.",
        labels = vec![LabeledSpan::at(span, "literal expected here")],
        "Literal expected.",
    )
    .with_source_code(src.to_string())
}

pub fn asm_duplicate_symbol(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::duplicate_symbol",
        help = "labels bind once per file; the first binding is kept.",
        labels = vec![LabeledSpan::at(span, "duplicate label")],
        "Duplicate symbol.",
    )
    .with_source_code(src.to_string())
}

pub fn asm_undefined_symbol(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::undefined_symbol",
        help = "no label with this name is defined; a placeholder 0 is encoded.",
        labels = vec![LabeledSpan::at(span, "undefined symbol")],
        "Undefined symbol.",
    )
    .with_source_code(src.to_string())
}

pub fn too_many_errors(count: u32) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::err_cap",
        help = "fix the reported errors and reassemble.",
        "Too many errors ({count}).",
    )
}

// Object file errors

pub fn obj_bad_word(word: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "obj::word",
        help = "object files hold 4-hex-digit words separated by whitespace.",
        "Malformed object word `{word}`.",
    )
}

pub fn obj_too_long(words: usize) -> Report {
    miette!(
        severity = Severity::Error,
        code = "obj::size",
        "Program of {words} words cannot fit in memory.",
    )
}

// Runtime errors. No source text to label; the caller dumps registers.

pub fn vm_divide_by_zero(ip: u16) -> Report {
    miette!(
        severity = Severity::Error,
        code = "vm::div_zero",
        "Divide by zero at {ip:04x}.",
    )
}

pub fn vm_illegal_opcode(opcode: u16, ip: u16) -> Report {
    miette!(
        severity = Severity::Error,
        code = "vm::opcode",
        help = "the word at the instruction pointer is not in the opcode space.",
        "Illegal opcode {opcode:04x} at {ip:04x}.",
    )
}

pub fn vm_invalid_port(port: u16, ip: u16) -> Report {
    miette!(
        severity = Severity::Error,
        code = "vm::port",
        help = "port 0 is the console, port 1 the disk image.",
        "Invalid I/O port {port:04x} at {ip:04x}.",
    )
}
