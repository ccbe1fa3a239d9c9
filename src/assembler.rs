use std::io;

use miette::{Report, Result};

use crate::catalog::{self, Family};
use crate::error;
use crate::lexer::{self, Token, TokenKind};
use crate::symtab::{normalize, SymbolTable};
use crate::MAX_ERRORS;

/// Shared error tally for the lexer and both passes. Reports are rendered to
/// stderr as they happen; table state built so far is never rolled back. The
/// cap is the only thing that aborts an assembly.
#[derive(Debug, Default)]
pub struct Reporter {
    count: u32,
}

impl Reporter {
    pub fn new() -> Self {
        Reporter::default()
    }

    pub fn report(&mut self, err: Report) -> Result<()> {
        eprintln!("Error #{:2}: {:?}", self.count, err);
        self.count += 1;
        if self.count > MAX_ERRORS {
            Err(error::too_many_errors(self.count))
        } else {
            Ok(())
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Two-pass assembler context. Owns the token list, the symbol table, and
/// the error tally for one source file.
pub struct Assembler<'a> {
    src: &'a str,
    toks: Vec<Token>,
    symtab: SymbolTable,
    reporter: Reporter,
    /// Total program size in words, computed by pass one.
    size: u16,
}

/// Assembly result: the word stream, the completed symbol table, and the
/// per-line rows backing an optional listing file.
pub struct Object {
    pub words: Vec<u16>,
    pub symtab: SymbolTable,
    pub errors: u32,
    listing: Vec<ListingRow>,
}

/// One emitting source line: where its words start and how many there are.
#[derive(Clone, Copy, Debug)]
pub struct ListingRow {
    addr: u16,
    len: u16,
    line: u32,
}

/// Advance past the current line, consuming its terminating newline.
fn skip_line(toks: &[Token], pos: &mut usize) {
    loop {
        match toks[*pos].kind {
            TokenKind::Eof => return,
            TokenKind::Newline => {
                *pos += 1;
                return;
            }
            _ => *pos += 1,
        }
    }
}

impl<'a> Assembler<'a> {
    pub fn new(src: &'a str) -> Result<Self> {
        let mut reporter = Reporter::new();
        let toks = lexer::tokenize(src, &mut reporter)?;
        Ok(Assembler {
            src,
            toks,
            symtab: SymbolTable::new(),
            reporter,
            size: 0,
        })
    }

    /// Run both passes and consume the context.
    pub fn assemble(mut self) -> Result<Object> {
        self.pass_one()?;
        let (words, listing) = self.pass_two()?;
        debug_assert!(self.reporter.count() > 0 || words.len() == self.size as usize);
        Ok(Object {
            words,
            symtab: self.symtab,
            errors: self.reporter.count(),
            listing,
        })
    }

    pub fn size(&self) -> u16 {
        self.size
    }

    pub fn symtab(&self) -> &SymbolTable {
        &self.symtab
    }

    /// Pass one: walk the token list binding labels to the position counter
    /// and sizing every line. Operands are not validated here; a recognized
    /// mnemonic sizes the line and the rest is skipped.
    pub fn pass_one(&mut self) -> Result<()> {
        let mut counter: u16 = 0;
        let mut pos = 0;
        loop {
            let mut tok = self.toks[pos];
            if tok.kind == TokenKind::Label {
                pos += 1;
                if self.symtab.insert(tok.span.slice(self.src), counter).is_err() {
                    self.reporter
                        .report(error::asm_duplicate_symbol(tok.span, self.src))?;
                }
                tok = self.toks[pos];
            }
            match tok.kind {
                TokenKind::Name => {
                    pos += 1;
                    let name = normalize(tok.span.slice(self.src));
                    match catalog::classify(&name) {
                        Some(entry) => counter = counter.wrapping_add(entry.family.words()),
                        // Unknown instruction: line skipped, counter unchanged.
                        None => self
                            .reporter
                            .report(error::asm_unknown_instr(tok.span, self.src))?,
                    }
                    skip_line(&self.toks, &mut pos);
                }
                TokenKind::Sharp => {
                    pos += 1;
                    counter = counter.wrapping_add(1);
                    skip_line(&self.toks, &mut pos);
                }
                TokenKind::At => {
                    pos += 1;
                    // One word reserved per raw character.
                    let chars = tok.span.slice(self.src).chars().count() as u16;
                    counter = counter.wrapping_add(chars);
                    skip_line(&self.toks, &mut pos);
                }
                TokenKind::Newline => pos += 1,
                TokenKind::Eof => break,
                _ => {
                    pos += 1;
                    self.reporter
                        .report(error::asm_expected_stmt(tok.span, self.src))?;
                    skip_line(&self.toks, &mut pos);
                }
            }
        }
        self.size = counter;
        Ok(())
    }

    /// Pass two: re-walk the same token list from the start and emit words.
    /// Every line's first emitted word lands exactly at the address pass one
    /// assigned it; error recovery emits placeholders to keep that alignment.
    pub fn pass_two(&mut self) -> Result<(Vec<u16>, Vec<ListingRow>)> {
        let mut words: Vec<u16> = Vec::with_capacity(self.size as usize);
        let mut listing = Vec::new();
        let mut pos = 0;
        loop {
            let mut tok = self.toks[pos];
            if tok.kind == TokenKind::Label {
                // Already bound by pass one.
                pos += 1;
                tok = self.toks[pos];
            }
            let start = words.len();
            match tok.kind {
                TokenKind::Name => {
                    pos += 1;
                    let name = normalize(tok.span.slice(self.src));
                    match catalog::classify(&name) {
                        Some(entry) => {
                            words.push(entry.opcode);
                            match entry.family {
                                Family::Inherent => {}
                                Family::Direct | Family::Address => {
                                    self.operand(&mut pos, &mut words)?;
                                }
                                Family::Indexed => {
                                    self.operand(&mut pos, &mut words)?;
                                    self.operand(&mut pos, &mut words)?;
                                }
                            }
                        }
                        None => self
                            .reporter
                            .report(error::asm_unknown_instr(tok.span, self.src))?,
                    }
                    skip_line(&self.toks, &mut pos);
                }
                TokenKind::Sharp => {
                    pos += 1;
                    match self.toks[pos].kind {
                        TokenKind::Number(val) => {
                            pos += 1;
                            words.push(val);
                        }
                        _ => {
                            self.reporter
                                .report(error::asm_expected_literal(self.toks[pos].span, self.src))?;
                            words.push(0);
                        }
                    }
                    skip_line(&self.toks, &mut pos);
                }
                TokenKind::At => {
                    pos += 1;
                    for c in tok.span.slice(self.src).chars() {
                        words.push(c as u16);
                    }
                    skip_line(&self.toks, &mut pos);
                }
                TokenKind::Newline => pos += 1,
                TokenKind::Eof => break,
                _ => {
                    pos += 1;
                    self.reporter
                        .report(error::asm_expected_stmt(tok.span, self.src))?;
                    skip_line(&self.toks, &mut pos);
                }
            }
            if words.len() > start {
                listing.push(ListingRow {
                    addr: start as u16,
                    len: (words.len() - start) as u16,
                    line: tok.line,
                });
            }
        }
        Ok((words, listing))
    }

    /// Encode one operand word: a numeral verbatim, or an identifier through
    /// the symbol table. On a missing operand the offending token is left in
    /// place for line-level recovery and a placeholder keeps the addresses
    /// aligned.
    fn operand(&mut self, pos: &mut usize, words: &mut Vec<u16>) -> Result<()> {
        let tok = self.toks[*pos];
        match tok.kind {
            TokenKind::Number(val) => {
                *pos += 1;
                words.push(val);
            }
            TokenKind::Name => {
                *pos += 1;
                match self.symtab.lookup(tok.span.slice(self.src)) {
                    Some(addr) => words.push(addr),
                    None => {
                        self.reporter
                            .report(error::asm_undefined_symbol(tok.span, self.src))?;
                        words.push(0);
                    }
                }
            }
            _ => {
                self.reporter
                    .report(error::asm_expected_operand(tok.span, self.src))?;
                words.push(0);
            }
        }
        Ok(())
    }
}

impl Object {
    /// Write the listing: address, emitted words, and source text per line,
    /// then the sorted symbol table.
    pub fn write_listing<W: io::Write>(&self, src: &str, w: &mut W) -> io::Result<()> {
        let lines: Vec<&str> = src.lines().collect();
        writeln!(w, "addr  words            | source")?;
        writeln!(w, "---------------------------------------")?;
        for row in &self.listing {
            let slice = &self.words[row.addr as usize..(row.addr + row.len) as usize];
            let mut emitted = String::new();
            for word in slice {
                emitted.push_str(&format!("{word:04x} "));
            }
            let text = lines.get(row.line as usize - 1).unwrap_or(&"");
            writeln!(w, "{:04x}  {emitted:<16} | {text}", row.addr)?;
        }
        writeln!(w)?;
        writeln!(w, "Symbol Table:")?;
        writeln!(w, "---------------------------------")?;
        for (name, addr) in self.symtab.iter() {
            writeln!(w, "{name:>8}: {:>16}", format!("{addr:04x}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::op;

    fn assemble(src: &str) -> Object {
        Assembler::new(src).unwrap().assemble().unwrap()
    }

    #[test]
    fn family_sizes() {
        let obj = assemble("push 5\ndup\npushi 10 2\nhalt\n");
        assert_eq!(
            obj.words,
            vec![op::PUSH, 0x5, op::DUP, op::PUSHI, 0x10, 0x2, op::HALT]
        );
        assert_eq!(obj.errors, 0);
    }

    #[test]
    fn forward_reference_resolves() {
        let obj = assemble("bra end\npush 1\nend: halt\n");
        assert_eq!(obj.symtab.lookup("end"), Some(4));
        assert_eq!(obj.words, vec![op::BRA, 4, op::PUSH, 1, op::HALT]);
    }

    #[test]
    fn label_addresses_match_encoded_operands() {
        let src = "start: push 0\nloop: dup\nbnz loop\nbra start\nhalt\n";
        let obj = assemble(src);
        let loop_addr = obj.symtab.lookup("loop").unwrap();
        let start_addr = obj.symtab.lookup("start").unwrap();
        assert_eq!(obj.words[3], loop_addr);
        assert_eq!(obj.words[5], start_addr);
    }

    #[test]
    fn pass_sizes_agree() {
        let mut asm = Assembler::new("a: push 1\nb: @text\n# 7\nbsr a\nhalt\n").unwrap();
        asm.pass_one().unwrap();
        let size = asm.size();
        let (words, _) = asm.pass_two().unwrap();
        assert_eq!(words.len(), size as usize);
    }

    #[test]
    fn duplicate_label_single_error_keeps_first() {
        let obj = assemble("spot: halt\nspot: dup\n");
        assert_eq!(obj.errors, 1);
        assert_eq!(obj.symtab.lookup("spot"), Some(0));
        assert_eq!(obj.symtab.len(), 1);
    }

    #[test]
    fn undefined_symbol_single_error_emits_placeholder() {
        let obj = assemble("bra nowhere\nhalt\n");
        assert_eq!(obj.errors, 1);
        assert_eq!(obj.words, vec![op::BRA, 0, op::HALT]);
    }

    #[test]
    fn unknown_instruction_skips_line() {
        let obj = assemble("frob 1 2\nhalt\n");
        // Reported by both passes; the line emits nothing.
        assert_eq!(obj.errors, 2);
        assert_eq!(obj.words, vec![op::HALT]);
    }

    #[test]
    fn sharp_emits_literal() {
        let obj = assemble("val: # 41\n");
        assert_eq!(obj.words, vec![0x41]);
        assert_eq!(obj.symtab.lookup("val"), Some(0));
    }

    #[test]
    fn at_emits_one_word_per_char() {
        let obj = assemble("msg: @Hi, X\nhalt\n");
        let expect: Vec<u16> = "Hi, X".chars().map(|c| c as u16).collect();
        assert_eq!(&obj.words[..5], expect.as_slice());
        assert_eq!(obj.words[5], op::HALT);
        assert_eq!(obj.symtab.lookup("msg"), Some(0));
    }

    #[test]
    fn labels_case_folded() {
        let obj = assemble("Loop: bra LOOP\n");
        assert_eq!(obj.words, vec![op::BRA, 0]);
        assert_eq!(obj.errors, 0);
    }

    #[test]
    fn error_cap_aborts() {
        // Nine unknown instructions: the ninth report exceeds the cap.
        let src = "bad\n".repeat(9);
        let err = Assembler::new(&src).unwrap().assemble();
        assert!(err.is_err());
    }

    #[test]
    fn errors_below_cap_complete() {
        let src = "bad\n".repeat(4); // 4 errors per pass = 8 total
        let obj = Assembler::new(&src).unwrap().assemble().unwrap();
        assert_eq!(obj.errors, 8);
        assert!(obj.words.is_empty());
    }

    #[test]
    fn missing_operand_keeps_alignment() {
        let obj = assemble("bra\nend: halt\n");
        assert!(obj.errors > 0);
        // Placeholder operand holds the label math together.
        assert_eq!(obj.symtab.lookup("end"), Some(2));
        assert_eq!(obj.words.len(), 3);
    }

    #[test]
    fn listing_rows_cover_output() {
        let src = "start: push 3\nhalt\n";
        let obj = assemble(src);
        let mut out = Vec::new();
        obj.write_listing(src, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("0000"));
        assert!(text.contains("START"));
        assert!(text.contains("push 3"));
    }
}
