//! Logical family: AND/ORA/EOR/BIT.

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
        let r = match opdef.op {
            Op::And => alu::and(cpu.a, v),
            Op::Ora => alu::or(cpu.a, v),
            Op::Eor => alu::xor(cpu.a, v),
            Op::Bit => alu::bit(cpu.a, v),
            _ => unreachable!(),
        };
        if opdef.op == Op::Bit {
            r.apply(&mut cpu.status);
        } else {
            cpu.a = r.apply(&mut cpu.status);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::dispatch::test_support::RamBus;
    use crate::cpu::dispatch::Cpu;
    use crate::cpu::state::Status;

    fn setup(prg: &[u8]) -> (Cpu, RamBus) {
        let mut bus = RamBus::new();
        bus.set_reset_vector(0x8000);
        bus.load(0x8000, prg);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        (cpu, bus)
    }

    #[test]
    fn and_immediate() {
        let (mut cpu, mut bus) = setup(&[0x29, 0x0F]);
        cpu.state.a = 0xFF;
        for _ in 0..2 {
            cpu.cycle(&mut bus).unwrap();
        }
        assert_eq!(cpu.state().a, 0x0F);
    }

    #[test]
    fn bit_copies_flags_without_touching_a() {
        let (mut cpu, mut bus) = setup(&[0x24, 0x10]);
        bus.mem[0x0010] = 0xC0;
        cpu.state.a = 0x00;
        for _ in 0..3 {
            cpu.cycle(&mut bus).unwrap();
        }
        assert_eq!(cpu.state().a, 0x00);
        assert!(cpu.state().status.contains(Status::ZERO));
        assert!(cpu.state().status.contains(Status::NEGATIVE));
        assert!(cpu.state().status.contains(Status::OVERFLOW));
    }
}
