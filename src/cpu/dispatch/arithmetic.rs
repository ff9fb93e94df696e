//! Arithmetic family: ADC/SBC, and the illegal ALU-immediate combos
//! ALR/ANC/ARR/SBX.

use crate::bus::Bus;
use crate::cpu::alu;
use crate::cpu::dispatch::{exec_read, StepOutcome};
use crate::cpu::state::{CpuState, Status};
use crate::cpu::table::{Op, OpDef};

fn index_for(mode: crate::cpu::table::Mode, cpu: &CpuState) -> u8 {
    match mode {
        crate::cpu::table::Mode::ZeroPageX | crate::cpu::table::Mode::AbsoluteX | crate::cpu::table::Mode::IndirectX => cpu.x,
        crate::cpu::table::Mode::ZeroPageY | crate::cpu::table::Mode::AbsoluteY | crate::cpu::table::Mode::IndirectY => cpu.y,
        _ => 0,
    }
}

pub(crate) fn add_sub(cpu: &mut CpuState, bus: &mut dyn Bus, opdef: OpDef) -> StepOutcome {
    let index = index_for(opdef.mode, cpu);
    exec_read(cpu, bus, opdef.mode, index, |cpu, v| {
        let c_in = cpu.status.contains(Status::CARRY);
        let r = match opdef.op {
            Op::Adc => alu::add(cpu.a, v, c_in),
            Op::Sbc => alu::sub(cpu.a, v, c_in),
            _ => unreachable!(),
        };
        cpu.a = r.apply(&mut cpu.status);
    })
}

/// ALR/ANC/ARR/SBX: immediate-only illegal opcodes that fold an ALU step
/// onto the accumulator (or, for SBX, onto a throwaway A/X combination).
/// Each has a documented, stable result — unlike the genuinely unstable
/// ANE/LXA/SHx/TAS/LAS group in `misc::unstable`.
pub(crate) fn combo(cpu: &mut CpuState, bus: &mut dyn Bus, opdef: OpDef) -> StepOutcome {
    exec_read(cpu, bus, opdef.mode, 0, |cpu, v| match opdef.op {
        Op::Alr => {
            let anded = cpu.a & v;
            let r = alu::lsr(anded);
            cpu.a = r.apply(&mut cpu.status);
        }
        Op::Anc => {
            let r = alu::and(cpu.a, v);
            cpu.a = r.apply(&mut cpu.status);
            cpu.status.set(Status::CARRY, cpu.a & 0x80 != 0);
        }
        Op::Arr => {
            let anded = cpu.a & v;
            let c_in = cpu.status.contains(Status::CARRY);
            let r = alu::ror(anded, c_in);
            cpu.a = r.value;
            cpu.status.assign_zn(cpu.a);
            cpu.status.set(Status::CARRY, cpu.a & 0x40 != 0);
            let bit5 = cpu.a & 0x20 != 0;
            let bit6 = cpu.a & 0x40 != 0;
            cpu.status.set(Status::OVERFLOW, bit5 ^ bit6);
        }
        Op::Sbx => {
            let anded = cpu.a & cpu.x;
            let r = anded.wrapping_sub(v);
            cpu.status.assign_zn(r);
            cpu.status.set(Status::CARRY, anded >= v);
            cpu.x = r;
        }
        _ => unreachable!(),
    })
}
