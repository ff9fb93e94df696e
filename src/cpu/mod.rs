//! The 6502/2A03 core: [`state`] holds the fixed-size register/latch
//! record, [`alu`] holds pure combinational helpers, [`table`] decodes
//! every opcode byte, [`addressing`] resolves operand addresses one
//! cycle at a time, and [`dispatch`] wires all of it into a
//! `Cycle()`-style driver.

pub mod addressing;
pub mod alu;
mod dispatch;
pub mod state;
pub mod table;

pub use dispatch::Cpu;
pub use state::{CpuState, Dst, Status, Timer};
