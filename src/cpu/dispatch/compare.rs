//! Compare family: CMP/CPX/CPY.

use crate::bus::Bus;
use crate::cpu::alu;
use crate::cpu::dispatch::{exec_read, StepOutcome};
use crate::cpu::state::CpuState;
use crate::cpu::table::{Mode, Op, OpDef};

fn index_for(mode: Mode, cpu: &CpuState) -> u8 {
    match mode {
        Mode::ZeroPageX | Mode::AbsoluteX | Mode::IndirectX => cpu.x,
        Mode::ZeroPageY | Mode::AbsoluteY | Mode::IndirectY => cpu.y,
        _ => 0,
    }
}

pub(crate) fn run(cpu: &mut CpuState, bus: &mut dyn Bus, opdef: OpDef) -> StepOutcome {
    let index = index_for(opdef.mode, cpu);
    exec_read(cpu, bus, opdef.mode, index, |cpu, v| {
        let reg = match opdef.op {
            Op::Cmp => cpu.a,
            Op::Cpx => cpu.x,
            Op::Cpy => cpu.y,
            _ => unreachable!(),
        };
        let r = alu::compare(reg, v);
        r.apply(&mut cpu.status);
    })
}
