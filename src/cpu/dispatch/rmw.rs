//! Read-modify-write family: ASL/LSR/ROL/ROR/INC/DEC (and their
//! accumulator-addressed shift/rotate forms), plus the illegal combos
//! that fold a second ALU step onto the accumulator after the memory
//! RMW completes (SLO/RLA/SRE/RRA) or that only ever read for a compare
//! (DCP) or finish with an SBC (ISC).

use crate::bus::Bus;
use crate::cpu::alu;
use crate::cpu::dispatch::{exec_rmw, StepOutcome};
use crate::cpu::state::{CpuState, Status};
use crate::cpu::table::{Mode, Op, OpDef};

fn index_for(mode: Mode, cpu: &CpuState) -> u8 {
    match mode {
        Mode::ZeroPageX | Mode::AbsoluteX | Mode::IndirectX => cpu.x,
        Mode::ZeroPageY | Mode::AbsoluteY | Mode::IndirectY => cpu.y,
        _ => 0,
    }
}

fn shift_rotate(op: Op, cpu: &mut CpuState, v: u8) -> u8 {
    let c_in = cpu.status.contains(Status::CARRY);
    let r = match op {
        Op::Asl => alu::asl(v),
        Op::Lsr => alu::lsr(v),
        Op::Rol => alu::rol(v, c_in),
        Op::Ror => alu::ror(v, c_in),
        Op::Inc => {
            let value = v.wrapping_add(1);
            alu::AluResult { value, negative: value & 0x80 != 0, zero: value == 0, carry: None, overflow: None }
        }
        Op::Dec => {
            let value = v.wrapping_sub(1);
            alu::AluResult { value, negative: value & 0x80 != 0, zero: value == 0, carry: None, overflow: None }
        }
        _ => unreachable!(),
    };
    r.apply(&mut cpu.status)
}

/// ASL/LSR/ROL/ROR/INC/DEC. Accumulator-addressed shift/rotate forms
/// never touch memory at all; they run as a plain two-cycle instruction
/// (the second cycle both applies the ALU op and doubles as the dummy
/// next-opcode peek, same shape as `misc::flag_op`).
pub(crate) fn documented(cpu: &mut CpuState, bus: &mut dyn Bus, opdef: OpDef) -> StepOutcome {
    if opdef.mode == Mode::Accumulator {
        let _ = bus.read(cpu.pc);
        cpu.a = shift_rotate(opdef.op, cpu, cpu.a);
        return StepOutcome::Done;
    }
    let index = index_for(opdef.mode, cpu);
    exec_rmw(cpu, bus, opdef.mode, index, |cpu, v| shift_rotate(opdef.op, cpu, v))
}

/// SLO/RLA/SRE/RRA/DCP/ISC: memory RMW combined with an accumulator-side
/// ALU step applied to the *written-back* value.
pub(crate) fn illegal(cpu: &mut CpuState, bus: &mut dyn Bus, opdef: OpDef) -> StepOutcome {
    let index = index_for(opdef.mode, cpu);
    exec_rmw(cpu, bus, opdef.mode, index, |cpu, v| match opdef.op {
        Op::Slo => {
            let shifted = alu::asl(v).apply(&mut cpu.status);
            let r = alu::or(cpu.a, shifted);
            cpu.a = r.apply(&mut cpu.status);
            shifted
        }
        Op::Rla => {
            let c_in = cpu.status.contains(Status::CARRY);
            let rotated = alu::rol(v, c_in).apply(&mut cpu.status);
            let r = alu::and(cpu.a, rotated);
            cpu.a = r.apply(&mut cpu.status);
            rotated
        }
        Op::Sre => {
            let shifted = alu::lsr(v).apply(&mut cpu.status);
            let r = alu::xor(cpu.a, shifted);
            cpu.a = r.apply(&mut cpu.status);
            shifted
        }
        Op::Rra => {
            let c_in = cpu.status.contains(Status::CARRY);
            let rotated = alu::ror(v, c_in).apply(&mut cpu.status);
            let c_in2 = cpu.status.contains(Status::CARRY);
            let r = alu::add(cpu.a, rotated, c_in2);
            cpu.a = r.apply(&mut cpu.status);
            rotated
        }
        Op::Dcp => {
            let decremented = v.wrapping_sub(1);
            let r = alu::compare(cpu.a, decremented);
            r.apply(&mut cpu.status);
            decremented
        }
        Op::Isc => {
            let incremented = v.wrapping_add(1);
            let c_in = cpu.status.contains(Status::CARRY);
            let r = alu::sub(cpu.a, incremented, c_in);
            cpu.a = r.apply(&mut cpu.status);
            incremented
        }
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

    /// ASL $80, memory[$80] = 0x81: 5 cycles, memory becomes 0x02, bus
    /// trace is read opcode, read operand, read $80, dummy-write 0x81,
    /// write 0x02.
    #[test]
    fn asl_zero_page_bus_trace_and_result() {
        let (mut cpu, mut bus) = setup(&[0x06, 0x80]);
        bus.mem[0x0080] = 0x81;
        let mut writes = vec![];
        for _ in 0..5 {
            cpu.cycle(&mut bus).unwrap();
            writes.push(bus.mem[0x0080]);
        }
        assert_eq!(bus.mem[0x0080], 0x02);
        assert!(cpu.state().status.contains(Status::CARRY));
        assert!(!cpu.state().status.contains(Status::NEGATIVE));
        assert!(!cpu.state().status.contains(Status::ZERO));
        // The dummy write (unmodified 0x81) must be observable before the
        // final write (0x02) lands.
        assert_eq!(writes[3], 0x81);
        assert_eq!(writes[4], 0x02);
    }

    #[test]
    fn asl_accumulator_two_cycles() {
        let (mut cpu, mut bus) = setup(&[0x0A, 0x00]);
        cpu.state.a = 0x81;
        for _ in 0..2 {
            cpu.cycle(&mut bus).unwrap();
        }
        assert_eq!(cpu.state().a, 0x02);
        assert!(cpu.state().status.contains(Status::CARRY));
    }

    #[test]
    fn inc_zero_page_wraps() {
        let (mut cpu, mut bus) = setup(&[0xE6, 0x10]);
        bus.mem[0x0010] = 0xFF;
        for _ in 0..5 {
            cpu.cycle(&mut bus).unwrap();
        }
        assert_eq!(bus.mem[0x0010], 0x00);
        assert!(cpu.state().status.contains(Status::ZERO));
    }

    #[test]
    fn dcp_compares_after_decrement() {
        let (mut cpu, mut bus) = setup(&[0xC7, 0x10]);
        bus.mem[0x0010] = 0x43;
        cpu.state.a = 0x42;
        for _ in 0..5 {
            cpu.cycle(&mut bus).unwrap();
        }
        assert_eq!(bus.mem[0x0010], 0x42);
        assert!(cpu.state().status.contains(Status::ZERO));
        assert!(cpu.state().status.contains(Status::CARRY));
    }
}
