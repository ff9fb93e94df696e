//! Relative branch family: BPL/BMI/BVC/BVS/BCC/BCS/BNE/BEQ.
//!
//! Cycle shape: fetch displacement (always); if not taken, done at 2
//! cycles total. If taken, one more cycle always runs to apply the
//! low-byte add (3 total); a further cycle only runs if that add
//! crossed a page boundary (4 total).

use crate::bus::Bus;
use crate::cpu::dispatch::StepOutcome;
use crate::cpu::state::{CpuState, Status};
use crate::cpu::table::{Op, OpDef};

fn taken(cpu: &CpuState, op: Op) -> bool {
    match op {
        Op::Bpl => !cpu.status.contains(Status::NEGATIVE),
        Op::Bmi => cpu.status.contains(Status::NEGATIVE),
        Op::Bvc => !cpu.status.contains(Status::OVERFLOW),
        Op::Bvs => cpu.status.contains(Status::OVERFLOW),
        Op::Bcc => !cpu.status.contains(Status::CARRY),
        Op::Bcs => cpu.status.contains(Status::CARRY),
        Op::Bne => !cpu.status.contains(Status::ZERO),
        Op::Beq => cpu.status.contains(Status::ZERO),
        _ => unreachable!(),
    }
}

pub(crate) fn run(cpu: &mut CpuState, bus: &mut dyn Bus, opdef: OpDef) -> StepOutcome {
    match cpu.step {
        0 => {
            let disp = bus.read(cpu.pc);
            cpu.pc = cpu.pc.wrapping_add(1);
            cpu.mdr = disp;
            if taken(cpu, opdef.op) {
                let target = (i32::from(cpu.pc) + i32::from(disp as i8)) as u16;
                cpu.dp = target;
                cpu.step = 1;
                StepOutcome::Continue
            } else {
                cpu.step = 0;
                StepOutcome::Done
            }
        }
        1 => {
            // Dummy read at the not-yet-adjusted PC while the low-byte add
            // is committed.
            let _ = bus.read(cpu.pc);
            let crossed = (cpu.dp & 0xFF00) != (cpu.pc & 0xFF00);
            cpu.tmp = u8::from(crossed);
            cpu.pc = (cpu.pc & 0xFF00) | (cpu.dp & 0x00FF);
            if crossed {
                cpu.step = 2;
                StepOutcome::Continue
            } else {
                cpu.step = 0;
                StepOutcome::Done
            }
        }
        _ => {
            // Dummy read at the still-uncorrected address before the page
            // fix-up lands.
            let _ = bus.read(cpu.pc);
            cpu.pc = cpu.dp;
            cpu.step = 0;
            StepOutcome::Done
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::dispatch::test_support::RamBus;
    use crate::cpu::dispatch::Cpu;

    fn setup_at(pc: u16, prg: &[u8]) -> (Cpu, RamBus) {
        let mut bus = RamBus::new();
        bus.set_reset_vector(pc);
        bus.load(pc, prg);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        (cpu, bus)
    }

    #[test]
    fn beq_taken_no_cross() {
        let (mut cpu, mut bus) = setup_at(0x1000, &[0xF0, 0x04]);
        cpu.state.status.insert(Status::ZERO);
        for _ in 0..3 {
            cpu.cycle(&mut bus).unwrap();
        }
        assert_eq!(cpu.state().pc, 0x1006);
    }

    #[test]
    fn beq_not_taken() {
        let (mut cpu, mut bus) = setup_at(0x1000, &[0xF0, 0x04]);
        cpu.state.status.remove(Status::ZERO);
        for _ in 0..2 {
            cpu.cycle(&mut bus).unwrap();
        }
        assert_eq!(cpu.state().pc, 0x1002);
    }

    #[test]
    fn beq_taken_page_cross() {
        let (mut cpu, mut bus) = setup_at(0x10FE, &[0xF0, 0x04]);
        cpu.state.status.insert(Status::ZERO);
        for _ in 0..4 {
            cpu.cycle(&mut bus).unwrap();
        }
        assert_eq!(cpu.state().pc, 0x1104);
    }
}
