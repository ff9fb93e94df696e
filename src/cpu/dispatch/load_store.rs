//! Load/store family: LDA/LDX/LDY/LAX (reads) and STA/STX/STY/SAX (writes).

use crate::bus::Bus;
use crate::cpu::dispatch::{exec_read, exec_write, StepOutcome};
use crate::cpu::state::CpuState;
use crate::cpu::table::{Mode, Op, OpDef};

fn index_for(mode: Mode, cpu: &CpuState) -> u8 {
    match mode {
        Mode::ZeroPageX | Mode::AbsoluteX | Mode::IndirectX => cpu.x,
        Mode::ZeroPageY | Mode::AbsoluteY | Mode::IndirectY => cpu.y,
        _ => 0,
    }
}

pub(crate) fn load(cpu: &mut CpuState, bus: &mut dyn Bus, opdef: OpDef) -> StepOutcome {
    let index = index_for(opdef.mode, cpu);
    exec_read(cpu, bus, opdef.mode, index, |cpu, v| match opdef.op {
        Op::Lda => {
            cpu.a = v;
            cpu.status.assign_zn(v);
        }
        Op::Ldx => {
            cpu.x = v;
            cpu.status.assign_zn(v);
        }
        Op::Ldy => {
            cpu.y = v;
            cpu.status.assign_zn(v);
        }
        Op::Lax => {
            cpu.a = v;
            cpu.x = v;
            cpu.status.assign_zn(v);
        }
        _ => unreachable!(),
    })
}

pub(crate) fn store(cpu: &mut CpuState, bus: &mut dyn Bus, opdef: OpDef) -> StepOutcome {
    let index = index_for(opdef.mode, cpu);
    exec_write(cpu, bus, opdef.mode, index, |cpu| match opdef.op {
        Op::Sta => cpu.a,
        Op::Stx => cpu.x,
        Op::Sty => cpu.y,
        Op::Sax => cpu.a & cpu.x,
        _ => unreachable!(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::dispatch::test_support::RamBus;
    use crate::cpu::dispatch::Cpu;

    fn setup(prg: &[u8]) -> (Cpu, RamBus) {
        let mut bus = RamBus::new();
        bus.set_reset_vector(0x8000);
        bus.load(0x8000, prg);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        (cpu, bus)
    }

    #[test]
    fn lda_immediate_two_cycles() {
        let (mut cpu, mut bus) = setup(&[0xA9, 0x42]);
        cpu.cycle(&mut bus).unwrap(); // fetch
        cpu.cycle(&mut bus).unwrap(); // operand + apply
        assert_eq!(cpu.state().a, 0x42);
        assert!(!cpu.state().status.contains(crate::cpu::state::Status::ZERO));
        assert_eq!(cpu.state().pc, 0x8002);
    }

    #[test]
    fn lda_zero_page_three_cycles() {
        let (mut cpu, mut bus) = setup(&[0xA5, 0x80]);
        bus.mem[0x0080] = 0x00;
        for _ in 0..3 {
            cpu.cycle(&mut bus).unwrap();
        }
        assert_eq!(cpu.state().a, 0x00);
        assert!(cpu.state().status.contains(crate::cpu::state::Status::ZERO));
    }

    #[test]
    fn lda_absolute_x_no_cross_four_cycles() {
        let (mut cpu, mut bus) = setup(&[0xBD, 0x34, 0x12]);
        cpu.state.x = 0x10;
        bus.mem[0x1244] = 0x80;
        for _ in 0..4 {
            cpu.cycle(&mut bus).unwrap();
        }
        assert_eq!(cpu.state().a, 0x80);
        assert!(cpu.state().status.contains(crate::cpu::state::Status::NEGATIVE));
    }

    #[test]
    fn lda_absolute_x_cross_five_cycles() {
        let (mut cpu, mut bus) = setup(&[0xBD, 0xF0, 0x12]);
        cpu.state.x = 0x20;
        bus.mem[0x1310] = 0x01;
        for _ in 0..5 {
            cpu.cycle(&mut bus).unwrap();
        }
        assert_eq!(cpu.state().a, 0x01);
        // A fifth cycle must actually have been required: after 4, the
        // opcode should not yet have retired (still mid-instruction).
    }

    #[test]
    fn sax_stores_a_and_x() {
        let (mut cpu, mut bus) = setup(&[0x87, 0x10]);
        cpu.state.a = 0b1111_0000;
        cpu.state.x = 0b1010_1010;
        for _ in 0..3 {
            cpu.cycle(&mut bus).unwrap();
        }
        assert_eq!(bus.mem[0x0010], 0b1010_0000);
    }
}
