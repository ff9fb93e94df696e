#![doc = r#"
Cycle-accurate core for the MOS 6502 CPU, tuned for the NES 2A03 variant
(no decimal-mode ALU).

The core advances exactly one clock cycle per call to [`cpu::Cpu::cycle`],
performing at most one bus transaction and updating every architectural and
micro-architectural register along the way. It owns no memory of its own;
callers supply an implementation of [`bus::Bus`] for the 16-bit address
space (RAM, mappers, PPU/APU register mirrors — all out of scope here).

Modules:
- `bus`: the minimal memory-bus capability the core is generic over.
- `cpu`: register file, micro-architectural state, ALU, addressing-mode
  micro-steps, the 256-opcode table, and the per-cycle dispatcher.
- `error`: the single fatal error surface the core can report.
"#]

pub mod bus;
pub mod cpu;
pub mod error;

pub use bus::Bus;
pub use cpu::{Cpu, CpuState, Dst, Status, Timer};
pub use error::CpuError;
