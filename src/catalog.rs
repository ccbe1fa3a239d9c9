//! The instruction catalog: one canonical table mapping mnemonics to opcodes
//! and addressing-mode families. The assembler classifies by name, the
//! runtime decodes by the same numeric constants, and the tracer renames by
//! reverse lookup, so the two programs cannot drift apart.

/// Addressing-mode family of a mnemonic, fixing its encoded length.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Family {
    /// No operands, 1 word.
    Inherent,
    /// One literal-value operand, 2 words.
    Direct,
    /// One absolute-address operand, 2 words.
    Address,
    /// Base address plus index-cell address, 3 words.
    Indexed,
}

impl Family {
    /// Encoded instruction length in words.
    pub fn words(self) -> u16 {
        match self {
            Family::Inherent => 1,
            Family::Direct | Family::Address => 2,
            Family::Indexed => 3,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Family::Inherent => "zero-operand",
            Family::Direct => "direct",
            Family::Address => "addressed",
            Family::Indexed => "indexed",
        }
    }
}

/// Numeric opcode space, shared bit-exact between encoder and interpreter.
pub mod op {
    pub const HALT: u16 = 0x0000;
    pub const PUSH: u16 = 0x0001;
    pub const PUSHI: u16 = 0x0002;
    pub const PUSHR: u16 = 0x0003;
    pub const PUSHA: u16 = 0x0004;
    pub const PUSHO: u16 = 0x0005;
    pub const PUSHF: u16 = 0x0006;
    pub const PUSHS: u16 = 0x0007;
    pub const PUSHP: u16 = 0x0008;
    pub const PUSHZ: u16 = 0x0009;
    pub const DUP: u16 = 0x000A;
    pub const POP: u16 = 0x0100;
    pub const POPI: u16 = 0x0101;
    pub const POPR: u16 = 0x0102;
    pub const POPO: u16 = 0x0103;
    pub const POPF: u16 = 0x0104;
    pub const POPS: u16 = 0x0105;
    pub const DROP: u16 = 0x0106;
    pub const SWAP: u16 = 0x0107;
    pub const BRA: u16 = 0x0200;
    pub const BRI: u16 = 0x0201;
    pub const BRZ: u16 = 0x0300;
    pub const BNZ: u16 = 0x0301;
    pub const BSR: u16 = 0x0400;
    pub const RTS: u16 = 0x0401;
    pub const EQL: u16 = 0x0500;
    pub const NEQ: u16 = 0x0501;
    pub const LES: u16 = 0x0502;
    pub const LEQ: u16 = 0x0503;
    pub const GRE: u16 = 0x0504;
    pub const GEQ: u16 = 0x0505;
    pub const ADD: u16 = 0x0600;
    pub const INC: u16 = 0x06F0;
    pub const SUB: u16 = 0x0700;
    pub const DEC: u16 = 0x07F0;
    pub const MUL: u16 = 0x0800;
    pub const DIV: u16 = 0x0900;
    pub const MOD: u16 = 0x09F0;
    pub const SHL: u16 = 0x0A00;
    pub const SHR: u16 = 0x0B00;
    pub const IOR: u16 = 0x0C00;
    pub const XOR: u16 = 0x0D00;
    pub const AND: u16 = 0x0E00;
    pub const NOT: u16 = 0x0F00;
    pub const IN: u16 = 0x1000;
    pub const OUT: u16 = 0x2000;
}

/// One catalog row.
#[derive(Clone, Copy, Debug)]
pub struct Entry {
    pub mnemonic: &'static str,
    pub opcode: u16,
    pub family: Family,
}

const fn row(mnemonic: &'static str, opcode: u16, family: Family) -> Entry {
    Entry {
        mnemonic,
        opcode,
        family,
    }
}

#[rustfmt::skip]
pub const CATALOG: &[Entry] = &[
    row("HALT",  op::HALT,  Family::Inherent),
    row("PUSH",  op::PUSH,  Family::Direct),
    row("PUSHI", op::PUSHI, Family::Indexed),
    row("PUSHR", op::PUSHR, Family::Inherent),
    row("PUSHA", op::PUSHA, Family::Address),
    row("PUSHO", op::PUSHO, Family::Inherent),
    row("PUSHF", op::PUSHF, Family::Inherent),
    row("PUSHS", op::PUSHS, Family::Inherent),
    row("PUSHP", op::PUSHP, Family::Inherent),
    row("PUSHZ", op::PUSHZ, Family::Inherent),
    row("DUP",   op::DUP,   Family::Inherent),
    row("POP",   op::POP,   Family::Address),
    row("POPI",  op::POPI,  Family::Indexed),
    row("POPR",  op::POPR,  Family::Inherent),
    row("POPO",  op::POPO,  Family::Inherent),
    row("POPF",  op::POPF,  Family::Inherent),
    row("POPS",  op::POPS,  Family::Inherent),
    row("DROP",  op::DROP,  Family::Inherent),
    row("SWAP",  op::SWAP,  Family::Inherent),
    row("BRA",   op::BRA,   Family::Address),
    row("BRI",   op::BRI,   Family::Indexed),
    row("BRZ",   op::BRZ,   Family::Address),
    row("BNZ",   op::BNZ,   Family::Address),
    row("BSR",   op::BSR,   Family::Address),
    row("RTS",   op::RTS,   Family::Inherent),
    row("EQL",   op::EQL,   Family::Inherent),
    row("NEQ",   op::NEQ,   Family::Inherent),
    row("LES",   op::LES,   Family::Inherent),
    row("LEQ",   op::LEQ,   Family::Inherent),
    row("GRE",   op::GRE,   Family::Inherent),
    row("GEQ",   op::GEQ,   Family::Inherent),
    row("ADD",   op::ADD,   Family::Inherent),
    row("INC",   op::INC,   Family::Inherent),
    row("SUB",   op::SUB,   Family::Inherent),
    row("DEC",   op::DEC,   Family::Inherent),
    row("MUL",   op::MUL,   Family::Inherent),
    row("DIV",   op::DIV,   Family::Inherent),
    row("MOD",   op::MOD,   Family::Inherent),
    row("SHL",   op::SHL,   Family::Inherent),
    row("SHR",   op::SHR,   Family::Inherent),
    row("IOR",   op::IOR,   Family::Inherent),
    row("XOR",   op::XOR,   Family::Inherent),
    row("AND",   op::AND,   Family::Inherent),
    row("NOT",   op::NOT,   Family::Inherent),
    row("IN",    op::IN,    Family::Inherent),
    row("OUT",   op::OUT,   Family::Inherent),
];

/// Classify an upper-cased mnemonic, or None for an unknown instruction.
pub fn classify(mnemonic: &str) -> Option<Entry> {
    CATALOG.iter().find(|e| e.mnemonic == mnemonic).copied()
}

/// Reverse lookup for the tracer and disassembler.
pub fn mnemonic(opcode: u16) -> Option<&'static str> {
    CATALOG
        .iter()
        .find(|e| e.opcode == opcode)
        .map(|e| e.mnemonic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_lengths() {
        assert_eq!(classify("DUP").unwrap().family.words(), 1);
        assert_eq!(classify("PUSH").unwrap().family.words(), 2);
        assert_eq!(classify("BRA").unwrap().family.words(), 2);
        assert_eq!(classify("POPI").unwrap().family.words(), 3);
    }

    #[test]
    fn opcode_values() {
        assert_eq!(classify("HALT").unwrap().opcode, 0x0000);
        assert_eq!(classify("POP").unwrap().opcode, 0x0100);
        assert_eq!(classify("BSR").unwrap().opcode, 0x0400);
        assert_eq!(classify("INC").unwrap().opcode, 0x06F0);
        assert_eq!(classify("OUT").unwrap().opcode, 0x2000);
    }

    #[test]
    fn unknown_mnemonic() {
        assert!(classify("NOP").is_none());
        assert!(classify("push").is_none()); // callers fold case first
    }

    #[test]
    fn reverse_lookup_agrees() {
        for entry in CATALOG {
            assert_eq!(mnemonic(entry.opcode), Some(entry.mnemonic));
        }
        assert_eq!(mnemonic(0xFFFF), None);
    }

    #[test]
    fn opcodes_unique() {
        for (i, a) in CATALOG.iter().enumerate() {
            for b in &CATALOG[i + 1..] {
                assert_ne!(a.opcode, b.opcode, "{} vs {}", a.mnemonic, b.mnemonic);
            }
        }
    }
}
