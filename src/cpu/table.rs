/*!
table.rs - The 256-opcode dispatch table.

Rather than nesting nested matches on the `aaabbbcc` decomposition (real
but insufficient for the undocumented set, per the opcode-encoding
design note), [`decode`] is a direct, total function from opcode byte to
[`OpDef`]: an addressing [`Mode`] plus an [`Op`] plus the documented base
cycle count. The (opcode, timer) micro-step dispatch itself lives in
`cpu::dispatch`; this module only answers "what instruction is this".
*/

/// Addressing mode, used to select the shared address-resolution micro-step
/// sequence in `cpu::addressing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndirectX,
    IndirectY,
    Relative,
}

/// What the opcode does, independent of how its operand was fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    // Loads / stores.
    Lda,
    Ldx,
    Ldy,
    Sta,
    Stx,
    Sty,
    // Register transfers.
    Tax,
    Tay,
    Txa,
    Tya,
    Tsx,
    Txs,
    // Stack.
    Pha,
    Php,
    Pla,
    Plp,
    // Arithmetic.
    Adc,
    Sbc,
    // Logical.
    And,
    Ora,
    Eor,
    Bit,
    // Compare.
    Cmp,
    Cpx,
    Cpy,
    // Increment/decrement.
    Inc,
    Inx,
    Iny,
    Dec,
    Dex,
    Dey,
    // Shifts/rotates (accumulator or memory RMW).
    Asl,
    Lsr,
    Rol,
    Ror,
    // Jumps/calls.
    Jmp,
    Jsr,
    Rts,
    Rti,
    Brk,
    // Branches.
    Bpl,
    Bmi,
    Bvc,
    Bvs,
    Bcc,
    Bcs,
    Bne,
    Beq,
    // Flag ops.
    Clc,
    Sec,
    Cli,
    Sei,
    Clv,
    Cld,
    Sed,
    // Misc.
    Nop,
    Jam,
    // Undocumented RMW combos.
    Slo,
    Rla,
    Sre,
    Rra,
    Dcp,
    Isc,
    // Undocumented non-RMW combos.
    Sax,
    Lax,
    Alr,
    Anc,
    Arr,
    Sbx,
    // Unstable-analog undocumented opcodes; spec mandates a stable stub
    // rather than a faithful (and chip-batch-dependent) emulation.
    Ane,
    Lxa,
    Sha,
    Shx,
    Shy,
    Tas,
    Las,
}

impl Op {
    /// Combined-ALU-on-memory illegal opcodes: read, modify, write back,
    /// same bus shape as the documented RMW group (ASL/LSR/ROL/ROR/INC/DEC).
    #[must_use]
    pub fn is_rmw(self) -> bool {
        matches!(
            self,
            Op::Asl
                | Op::Lsr
                | Op::Rol
                | Op::Ror
                | Op::Inc
                | Op::Dec
                | Op::Slo
                | Op::Rla
                | Op::Sre
                | Op::Rra
                | Op::Dcp
                | Op::Isc
        )
    }

    /// Opcodes that write to memory (plain stores plus the RMW group);
    /// used to decide whether indexed addressing always takes the
    /// fix-up cycle regardless of page-cross.
    #[must_use]
    pub fn is_write(self) -> bool {
        self.is_rmw() || matches!(self, Op::Sta | Op::Stx | Op::Sty | Op::Sax | Op::Sha | Op::Shx | Op::Shy | Op::Tas)
    }
}

/// A fully decoded opcode: everything the dispatcher needs other than
/// live CPU state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpDef {
    pub op: Op,
    pub mode: Mode,
    /// Documented base cycle count (page-cross/branch-taken adders are
    /// applied dynamically on top of this).
    pub base_cycles: u8,
    /// Set for opcodes not in Rockwell's/WDC's documented set.
    pub illegal: bool,
}

const fn def(op: Op, mode: Mode, base_cycles: u8, illegal: bool) -> OpDef {
    OpDef { op, mode, base_cycles, illegal }
}

use Mode::{
    Absolute, AbsoluteX, AbsoluteY, Accumulator, Immediate, Implied, Indirect, IndirectX, IndirectY,
    Relative, ZeroPage, ZeroPageX, ZeroPageY,
};

/// Decode `opcode` into its [`OpDef`]. Total over all 256 byte values:
/// every undocumented slot resolves to a real entry (a NOP variant, a
/// JAM, an illegal combo, or one of the explicitly unstable stubs) —
/// never a gap.
#[must_use]
pub fn decode(opcode: u8) -> OpDef {
    match opcode {
        // ---- 0x00..0x0F ----
        0x00 => def(Op::Brk, Implied, 7, false),
        0x01 => def(Op::Ora, IndirectX, 6, false),
        0x02 => def(Op::Jam, Implied, 2, true),
        0x03 => def(Op::Slo, IndirectX, 8, true),
        0x04 => def(Op::Nop, ZeroPage, 3, true),
        0x05 => def(Op::Ora, ZeroPage, 3, false),
        0x06 => def(Op::Asl, ZeroPage, 5, false),
        0x07 => def(Op::Slo, ZeroPage, 5, true),
        0x08 => def(Op::Php, Implied, 3, false),
        0x09 => def(Op::Ora, Immediate, 2, false),
        0x0A => def(Op::Asl, Accumulator, 2, false),
        0x0B => def(Op::Anc, Immediate, 2, true),
        0x0C => def(Op::Nop, Absolute, 4, true),
        0x0D => def(Op::Ora, Absolute, 4, false),
        0x0E => def(Op::Asl, Absolute, 6, false),
        0x0F => def(Op::Slo, Absolute, 6, true),

        // ---- 0x10..0x1F ----
        0x10 => def(Op::Bpl, Relative, 2, false),
        0x11 => def(Op::Ora, IndirectY, 5, false),
        0x12 => def(Op::Jam, Implied, 2, true),
        0x13 => def(Op::Slo, IndirectY, 8, true),
        0x14 => def(Op::Nop, ZeroPageX, 4, true),
        0x15 => def(Op::Ora, ZeroPageX, 4, false),
        0x16 => def(Op::Asl, ZeroPageX, 6, false),
        0x17 => def(Op::Slo, ZeroPageX, 6, true),
        0x18 => def(Op::Clc, Implied, 2, false),
        0x19 => def(Op::Ora, AbsoluteY, 4, false),
        0x1A => def(Op::Nop, Implied, 2, true),
        0x1B => def(Op::Slo, AbsoluteY, 7, true),
        0x1C => def(Op::Nop, AbsoluteX, 4, true),
        0x1D => def(Op::Ora, AbsoluteX, 4, false),
        0x1E => def(Op::Asl, AbsoluteX, 7, false),
        0x1F => def(Op::Slo, AbsoluteX, 7, true),

        // ---- 0x20..0x2F ----
        0x20 => def(Op::Jsr, Absolute, 6, false),
        0x21 => def(Op::And, IndirectX, 6, false),
        0x22 => def(Op::Jam, Implied, 2, true),
        0x23 => def(Op::Rla, IndirectX, 8, true),
        0x24 => def(Op::Bit, ZeroPage, 3, false),
        0x25 => def(Op::And, ZeroPage, 3, false),
        0x26 => def(Op::Rol, ZeroPage, 5, false),
        0x27 => def(Op::Rla, ZeroPage, 5, true),
        0x28 => def(Op::Plp, Implied, 4, false),
        0x29 => def(Op::And, Immediate, 2, false),
        0x2A => def(Op::Rol, Accumulator, 2, false),
        0x2B => def(Op::Anc, Immediate, 2, true),
        0x2C => def(Op::Bit, Absolute, 4, false),
        0x2D => def(Op::And, Absolute, 4, false),
        0x2E => def(Op::Rol, Absolute, 6, false),
        0x2F => def(Op::Rla, Absolute, 6, true),

        // ---- 0x30..0x3F ----
        0x30 => def(Op::Bmi, Relative, 2, false),
        0x31 => def(Op::And, IndirectY, 5, false),
        0x32 => def(Op::Jam, Implied, 2, true),
        0x33 => def(Op::Rla, IndirectY, 8, true),
        0x34 => def(Op::Nop, ZeroPageX, 4, true),
        0x35 => def(Op::And, ZeroPageX, 4, false),
        0x36 => def(Op::Rol, ZeroPageX, 6, false),
        0x37 => def(Op::Rla, ZeroPageX, 6, true),
        0x38 => def(Op::Sec, Implied, 2, false),
        0x39 => def(Op::And, AbsoluteY, 4, false),
        0x3A => def(Op::Nop, Implied, 2, true),
        0x3B => def(Op::Rla, AbsoluteY, 7, true),
        0x3C => def(Op::Nop, AbsoluteX, 4, true),
        0x3D => def(Op::And, AbsoluteX, 4, false),
        0x3E => def(Op::Rol, AbsoluteX, 7, false),
        0x3F => def(Op::Rla, AbsoluteX, 7, true),

        // ---- 0x40..0x4F ----
        0x40 => def(Op::Rti, Implied, 6, false),
        0x41 => def(Op::Eor, IndirectX, 6, false),
        0x42 => def(Op::Jam, Implied, 2, true),
        0x43 => def(Op::Sre, IndirectX, 8, true),
        0x44 => def(Op::Nop, ZeroPage, 3, true),
        0x45 => def(Op::Eor, ZeroPage, 3, false),
        0x46 => def(Op::Lsr, ZeroPage, 5, false),
        0x47 => def(Op::Sre, ZeroPage, 5, true),
        0x48 => def(Op::Pha, Implied, 3, false),
        0x49 => def(Op::Eor, Immediate, 2, false),
        0x4A => def(Op::Lsr, Accumulator, 2, false),
        0x4B => def(Op::Alr, Immediate, 2, true),
        0x4C => def(Op::Jmp, Absolute, 3, false),
        0x4D => def(Op::Eor, Absolute, 4, false),
        0x4E => def(Op::Lsr, Absolute, 6, false),
        0x4F => def(Op::Sre, Absolute, 6, true),

        // ---- 0x50..0x5F ----
        0x50 => def(Op::Bvc, Relative, 2, false),
        0x51 => def(Op::Eor, IndirectY, 5, false),
        0x52 => def(Op::Jam, Implied, 2, true),
        0x53 => def(Op::Sre, IndirectY, 8, true),
        0x54 => def(Op::Nop, ZeroPageX, 4, true),
        0x55 => def(Op::Eor, ZeroPageX, 4, false),
        0x56 => def(Op::Lsr, ZeroPageX, 6, false),
        0x57 => def(Op::Sre, ZeroPageX, 6, true),
        0x58 => def(Op::Cli, Implied, 2, false),
        0x59 => def(Op::Eor, AbsoluteY, 4, false),
        0x5A => def(Op::Nop, Implied, 2, true),
        0x5B => def(Op::Sre, AbsoluteY, 7, true),
        0x5C => def(Op::Nop, AbsoluteX, 4, true),
        0x5D => def(Op::Eor, AbsoluteX, 4, false),
        0x5E => def(Op::Lsr, AbsoluteX, 7, false),
        0x5F => def(Op::Sre, AbsoluteX, 7, true),

        // ---- 0x60..0x6F ----
        0x60 => def(Op::Rts, Implied, 6, false),
        0x61 => def(Op::Adc, IndirectX, 6, false),
        0x62 => def(Op::Jam, Implied, 2, true),
        0x63 => def(Op::Rra, IndirectX, 8, true),
        0x64 => def(Op::Nop, ZeroPage, 3, true),
        0x65 => def(Op::Adc, ZeroPage, 3, false),
        0x66 => def(Op::Ror, ZeroPage, 5, false),
        0x67 => def(Op::Rra, ZeroPage, 5, true),
        0x68 => def(Op::Pla, Implied, 4, false),
        0x69 => def(Op::Adc, Immediate, 2, false),
        0x6A => def(Op::Ror, Accumulator, 2, false),
        0x6B => def(Op::Arr, Immediate, 2, true),
        0x6C => def(Op::Jmp, Indirect, 5, false),
        0x6D => def(Op::Adc, Absolute, 4, false),
        0x6E => def(Op::Ror, Absolute, 6, false),
        0x6F => def(Op::Rra, Absolute, 6, true),

        // ---- 0x70..0x7F ----
        0x70 => def(Op::Bvs, Relative, 2, false),
        0x71 => def(Op::Adc, IndirectY, 5, false),
        0x72 => def(Op::Jam, Implied, 2, true),
        0x73 => def(Op::Rra, IndirectY, 8, true),
        0x74 => def(Op::Nop, ZeroPageX, 4, true),
        0x75 => def(Op::Adc, ZeroPageX, 4, false),
        0x76 => def(Op::Ror, ZeroPageX, 6, false),
        0x77 => def(Op::Rra, ZeroPageX, 6, true),
        0x78 => def(Op::Sei, Implied, 2, false),
        0x79 => def(Op::Adc, AbsoluteY, 4, false),
        0x7A => def(Op::Nop, Implied, 2, true),
        0x7B => def(Op::Rra, AbsoluteY, 7, true),
        0x7C => def(Op::Nop, AbsoluteX, 4, true),
        0x7D => def(Op::Adc, AbsoluteX, 4, false),
        0x7E => def(Op::Ror, AbsoluteX, 7, false),
        0x7F => def(Op::Rra, AbsoluteX, 7, true),

        // ---- 0x80..0x8F ----
        0x80 => def(Op::Nop, Immediate, 2, true),
        0x81 => def(Op::Sta, IndirectX, 6, false),
        0x82 => def(Op::Nop, Immediate, 2, true),
        0x83 => def(Op::Sax, IndirectX, 6, true),
        0x84 => def(Op::Sty, ZeroPage, 3, false),
        0x85 => def(Op::Sta, ZeroPage, 3, false),
        0x86 => def(Op::Stx, ZeroPage, 3, false),
        0x87 => def(Op::Sax, ZeroPage, 3, true),
        0x88 => def(Op::Dey, Implied, 2, false),
        0x89 => def(Op::Nop, Immediate, 2, true),
        0x8A => def(Op::Txa, Implied, 2, false),
        0x8B => def(Op::Ane, Immediate, 2, true),
        0x8C => def(Op::Sty, Absolute, 4, false),
        0x8D => def(Op::Sta, Absolute, 4, false),
        0x8E => def(Op::Stx, Absolute, 4, false),
        0x8F => def(Op::Sax, Absolute, 4, true),

        // ---- 0x90..0x9F ----
        0x90 => def(Op::Bcc, Relative, 2, false),
        0x91 => def(Op::Sta, IndirectY, 6, false),
        0x92 => def(Op::Jam, Implied, 2, true),
        0x93 => def(Op::Sha, IndirectY, 6, true),
        0x94 => def(Op::Sty, ZeroPageX, 4, false),
        0x95 => def(Op::Sta, ZeroPageX, 4, false),
        0x96 => def(Op::Stx, ZeroPageY, 4, false),
        0x97 => def(Op::Sax, ZeroPageY, 4, true),
        0x98 => def(Op::Tya, Implied, 2, false),
        0x99 => def(Op::Sta, AbsoluteY, 5, false),
        0x9A => def(Op::Txs, Implied, 2, false),
        0x9B => def(Op::Tas, AbsoluteY, 5, true),
        0x9C => def(Op::Shy, AbsoluteX, 5, true),
        0x9D => def(Op::Sta, AbsoluteX, 5, false),
        0x9E => def(Op::Shx, AbsoluteY, 5, true),
        0x9F => def(Op::Sha, AbsoluteY, 5, true),

        // ---- 0xA0..0xAF ----
        0xA0 => def(Op::Ldy, Immediate, 2, false),
        0xA1 => def(Op::Lda, IndirectX, 6, false),
        0xA2 => def(Op::Ldx, Immediate, 2, false),
        0xA3 => def(Op::Lax, IndirectX, 6, true),
        0xA4 => def(Op::Ldy, ZeroPage, 3, false),
        0xA5 => def(Op::Lda, ZeroPage, 3, false),
        0xA6 => def(Op::Ldx, ZeroPage, 3, false),
        0xA7 => def(Op::Lax, ZeroPage, 3, true),
        0xA8 => def(Op::Tay, Implied, 2, false),
        0xA9 => def(Op::Lda, Immediate, 2, false),
        0xAA => def(Op::Tax, Implied, 2, false),
        0xAB => def(Op::Lxa, Immediate, 2, true),
        0xAC => def(Op::Ldy, Absolute, 4, false),
        0xAD => def(Op::Lda, Absolute, 4, false),
        0xAE => def(Op::Ldx, Absolute, 4, false),
        0xAF => def(Op::Lax, Absolute, 4, true),

        // ---- 0xB0..0xBF ----
        0xB0 => def(Op::Bcs, Relative, 2, false),
        0xB1 => def(Op::Lda, IndirectY, 5, false),
        0xB2 => def(Op::Jam, Implied, 2, true),
        0xB3 => def(Op::Lax, IndirectY, 5, true),
        0xB4 => def(Op::Ldy, ZeroPageX, 4, false),
        0xB5 => def(Op::Lda, ZeroPageX, 4, false),
        0xB6 => def(Op::Ldx, ZeroPageY, 4, false),
        0xB7 => def(Op::Lax, ZeroPageY, 4, true),
        0xB8 => def(Op::Clv, Implied, 2, false),
        0xB9 => def(Op::Lda, AbsoluteY, 4, false),
        0xBA => def(Op::Tsx, Implied, 2, false),
        0xBB => def(Op::Las, AbsoluteY, 4, true),
        0xBC => def(Op::Ldy, AbsoluteX, 4, false),
        0xBD => def(Op::Lda, AbsoluteX, 4, false),
        0xBE => def(Op::Ldx, AbsoluteY, 4, false),
        0xBF => def(Op::Lax, AbsoluteY, 4, true),

        // ---- 0xC0..0xCF ----
        0xC0 => def(Op::Cpy, Immediate, 2, false),
        0xC1 => def(Op::Cmp, IndirectX, 6, false),
        0xC2 => def(Op::Nop, Immediate, 2, true),
        0xC3 => def(Op::Dcp, IndirectX, 8, true),
        0xC4 => def(Op::Cpy, ZeroPage, 3, false),
        0xC5 => def(Op::Cmp, ZeroPage, 3, false),
        0xC6 => def(Op::Dec, ZeroPage, 5, false),
        0xC7 => def(Op::Dcp, ZeroPage, 5, true),
        0xC8 => def(Op::Iny, Implied, 2, false),
        0xC9 => def(Op::Cmp, Immediate, 2, false),
        0xCA => def(Op::Dex, Implied, 2, false),
        0xCB => def(Op::Sbx, Immediate, 2, true),
        0xCC => def(Op::Cpy, Absolute, 4, false),
        0xCD => def(Op::Cmp, Absolute, 4, false),
        0xCE => def(Op::Dec, Absolute, 6, false),
        0xCF => def(Op::Dcp, Absolute, 6, true),

        // ---- 0xD0..0xDF ----
        0xD0 => def(Op::Bne, Relative, 2, false),
        0xD1 => def(Op::Cmp, IndirectY, 5, false),
        0xD2 => def(Op::Jam, Implied, 2, true),
        0xD3 => def(Op::Dcp, IndirectY, 8, true),
        0xD4 => def(Op::Nop, ZeroPageX, 4, true),
        0xD5 => def(Op::Cmp, ZeroPageX, 4, false),
        0xD6 => def(Op::Dec, ZeroPageX, 6, false),
        0xD7 => def(Op::Dcp, ZeroPageX, 6, true),
        0xD8 => def(Op::Cld, Implied, 2, false),
        0xD9 => def(Op::Cmp, AbsoluteY, 4, false),
        0xDA => def(Op::Nop, Implied, 2, true),
        0xDB => def(Op::Dcp, AbsoluteY, 7, true),
        0xDC => def(Op::Nop, AbsoluteX, 4, true),
        0xDD => def(Op::Cmp, AbsoluteX, 4, false),
        0xDE => def(Op::Dec, AbsoluteX, 7, false),
        0xDF => def(Op::Dcp, AbsoluteX, 7, true),

        // ---- 0xE0..0xEF ----
        0xE0 => def(Op::Cpx, Immediate, 2, false),
        0xE1 => def(Op::Sbc, IndirectX, 6, false),
        0xE2 => def(Op::Nop, Immediate, 2, true),
        0xE3 => def(Op::Isc, IndirectX, 8, true),
        0xE4 => def(Op::Cpx, ZeroPage, 3, false),
        0xE5 => def(Op::Sbc, ZeroPage, 3, false),
        0xE6 => def(Op::Inc, ZeroPage, 5, false),
        0xE7 => def(Op::Isc, ZeroPage, 5, true),
        0xE8 => def(Op::Inx, Implied, 2, false),
        0xE9 => def(Op::Sbc, Immediate, 2, false),
        0xEA => def(Op::Nop, Implied, 2, false),
        0xEB => def(Op::Sbc, Immediate, 2, true),
        0xEC => def(Op::Cpx, Absolute, 4, false),
        0xED => def(Op::Sbc, Absolute, 4, false),
        0xEE => def(Op::Inc, Absolute, 6, false),
        0xEF => def(Op::Isc, Absolute, 6, true),

        // ---- 0xF0..0xFF ----
        0xF0 => def(Op::Beq, Relative, 2, false),
        0xF1 => def(Op::Sbc, IndirectY, 5, false),
        0xF2 => def(Op::Jam, Implied, 2, true),
        0xF3 => def(Op::Isc, IndirectY, 8, true),
        0xF4 => def(Op::Nop, ZeroPageX, 4, true),
        0xF5 => def(Op::Sbc, ZeroPageX, 4, false),
        0xF6 => def(Op::Inc, ZeroPageX, 6, false),
        0xF7 => def(Op::Isc, ZeroPageX, 6, true),
        0xF8 => def(Op::Sed, Implied, 2, false),
        0xF9 => def(Op::Sbc, AbsoluteY, 4, false),
        0xFA => def(Op::Nop, Implied, 2, true),
        0xFB => def(Op::Isc, AbsoluteY, 7, true),
        0xFC => def(Op::Nop, AbsoluteX, 4, true),
        0xFD => def(Op::Sbc, AbsoluteX, 4, false),
        0xFE => def(Op::Inc, AbsoluteX, 7, false),
        0xFF => def(Op::Isc, AbsoluteX, 7, true),
    }
}

/// Two-cycle-instruction predicate, per the `aaabbbcc` shortcut plus the
/// explicit flag-op/NOP set (§4.3). Used at opcode-fetch time to decide
/// whether the "T0 slip" applies one cycle earlier.
#[must_use]
pub fn is_two_cycle(opcode: u8) -> bool {
    let bbb = (opcode >> 2) & 0b111;
    let cc = opcode & 0b11;
    (bbb == 0b010 && cc == 0b01)
        || (bbb == 0b000 && (cc == 0b00 || cc == 0b11))
        || matches!(opcode, 0x18 | 0x38 | 0x58 | 0x78 | 0xB8 | 0xD8 | 0xF8 | 0xEA)
}

/// One-byte (implied/accumulator-addressed) instruction predicate, used
/// to align the T0 interrupt-polling hint (§4.3, §4.4 step 8).
#[must_use]
pub fn is_one_byte(opcode: u8) -> bool {
    (opcode & 0x08) == 0x08 || (opcode & 0x0A) == 0x0A || opcode == 0x40 || opcode == 0x60
}
