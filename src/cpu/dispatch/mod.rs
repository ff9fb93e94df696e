/*!
dispatch/mod.rs - The `Cycle()` driver and the shared read/write/RMW
micro-step helpers every family handler is built from.

[`Cpu::cycle`] is the single entry point: it performs at most one bus
transaction, updates every latch the cycle touches, and returns a typed
error only if the (opcode, timer) pair it was asked to run has no
defined successor — which should never happen for a correctly decoded
opcode, since [`crate::cpu::table::decode`] is total over all 256 byte
values.

Two bookkeeping fields drive every family handler without each one
re-deriving the same addressing-mode arithmetic: `CpuState::step`
(cycles elapsed since the opcode fetch) and the `Mar`-as-scratch
convention used by [`exec_read`]/[`exec_write`]/[`exec_rmw`] once the
effective address is known.
*/

mod arithmetic;
mod branches;
mod compare;
mod control_flow;
mod load_store;
mod logical;
mod misc;
mod rmw;

use crate::bus::Bus;
use crate::cpu::addressing::step_address;
use crate::cpu::state::{CpuState, Dst, Status, Timer};
use crate::cpu::table::{self, Mode, Op};
use crate::error::CpuError;

/// Sentinel `CpuState::step` value meaning "effective address resolved,
/// perform the single trailing read/write cycle next call".
const ADDR_READY: u8 = 0xFD;
/// RMW sub-phases, chosen past any real addressing step count.
const RMW_READ: u8 = 0xFD;
const RMW_DUMMY_WRITE: u8 = 0xFE;
const RMW_WRITE: u8 = 0xFF;

/// Outcome of a single family-handler cycle.
pub(crate) enum StepOutcome {
    /// The instruction needs more cycles.
    Continue,
    /// The instruction's last cycle just ran.
    Done,
}

/// Resolve (if necessary) an operand address and, on the cycle it
/// becomes available, read it and hand the byte to `apply`. Immediate
/// mode never calls into `step_address` at all — the operand byte is IS
/// the single post-fetch cycle.
pub(crate) fn exec_read(
    cpu: &mut CpuState,
    bus: &mut dyn Bus,
    mode: Mode,
    index: u8,
    apply: impl FnOnce(&mut CpuState, u8),
) -> StepOutcome {
    if mode == Mode::Immediate {
        let v = bus.read(cpu.pc);
        cpu.pc = cpu.pc.wrapping_add(1);
        cpu.mdr = v;
        apply(cpu, v);
        return StepOutcome::Done;
    }
    if cpu.step == ADDR_READY {
        let v = bus.read(cpu.mar);
        cpu.mdr = v;
        apply(cpu, v);
        cpu.step = 0;
        return StepOutcome::Done;
    }
    match step_address(cpu, bus, mode, false, index) {
        None => StepOutcome::Continue,
        Some(addr) => {
            cpu.mar = addr;
            cpu.step = ADDR_READY;
            StepOutcome::Continue
        }
    }
}

/// Resolve an operand address (always taking the indexed fix-up cycle,
/// per the store/RMW addressing rule) and, once resolved, write
/// `value()` to it.
pub(crate) fn exec_write(
    cpu: &mut CpuState,
    bus: &mut dyn Bus,
    mode: Mode,
    index: u8,
    value: impl FnOnce(&CpuState) -> u8,
) -> StepOutcome {
    if cpu.step == ADDR_READY {
        let v = value(cpu);
        cpu.mdor = v;
        bus.write(cpu.mar, v);
        cpu.step = 0;
        return StepOutcome::Done;
    }
    match step_address(cpu, bus, mode, true, index) {
        None => StepOutcome::Continue,
        Some(addr) => {
            cpu.mar = addr;
            cpu.step = ADDR_READY;
            StepOutcome::Continue
        }
    }
}

/// Resolve an operand address and then run the canonical
/// read-dummy_write-write RMW choreography, calling `alu` on the value
/// once it has been read. `alu` returns the byte to write back.
pub(crate) fn exec_rmw(
    cpu: &mut CpuState,
    bus: &mut dyn Bus,
    mode: Mode,
    index: u8,
    alu: impl FnOnce(&mut CpuState, u8) -> u8,
) -> StepOutcome {
    match cpu.step {
        RMW_WRITE => {
            bus.write(cpu.mar, cpu.tmp);
            cpu.step = 0;
            StepOutcome::Done
        }
        RMW_DUMMY_WRITE => {
            cpu.mdor = cpu.mdr;
            bus.write(cpu.mar, cpu.mdor);
            cpu.step = RMW_WRITE;
            StepOutcome::Continue
        }
        RMW_READ => {
            cpu.mdr = bus.read(cpu.mar);
            cpu.tmp = alu(cpu, cpu.mdr);
            cpu.step = RMW_DUMMY_WRITE;
            StepOutcome::Continue
        }
        _ => match step_address(cpu, bus, mode, true, index) {
            None => StepOutcome::Continue,
            Some(addr) => {
                cpu.mar = addr;
                cpu.step = RMW_READ;
                StepOutcome::Continue
            }
        },
    }
}

/// The 6502 core: architectural/micro-architectural state plus the
/// dynamic cycle-count bookkeeping the dispatcher needs across calls.
pub struct Cpu {
    pub(crate) state: CpuState,
    opdef: table::OpDef,
    /// Set once per instruction the first time a page-cross (or branch
    /// taken) dynamic penalty is determined, purely for host-visible
    /// accounting; the dispatcher itself never consults a precomputed
    /// total, it just runs until the micro-step sequence reports `Done`.
    cycles_this_instruction: u32,
    total_cycles: u64,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: CpuState::new(),
            opdef: table::decode(0x00),
            cycles_this_instruction: 0,
            total_cycles: 0,
        }
    }

    /// Reset the CPU to its power-up/reset state and load `PC` from the
    /// reset vector at `$FFFC`/`$FFFD`. Modeled as instantaneous rather
    /// than its own 7-cycle bus sequence: no testable scenario in this
    /// core's contract observes the reset sequence's own bus trace, only
    /// its result (architectural defaults, `PC` from vector).
    pub fn reset(&mut self, bus: &mut dyn Bus) {
        let pc = bus.read_word(0xFFFC);
        self.state = CpuState::new();
        self.state.pc = pc;
        self.state.timer = Timer::T1;
    }

    #[must_use]
    pub fn state(&self) -> &CpuState {
        &self.state
    }

    /// Mutable access to the full register/latch record, for harnessed
    /// testing that needs to seed an exact starting state (e.g. replaying
    /// a recorded vector) rather than going through `reset`.
    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    #[must_use]
    pub fn is_jammed(&self) -> bool {
        self.state.jammed
    }

    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Raise the edge-triggered NMI line. Sampled at end-of-φ2 (i.e. at
    /// the end of this call) and consulted at the next `T0`.
    pub fn set_nmi_line(&mut self, asserted: bool) {
        self.state.nmi_pending = asserted;
    }

    /// Set the level-triggered IRQ line.
    pub fn set_irq_line(&mut self, asserted: bool) {
        self.state.irq_line = asserted;
    }

    /// Advance the processor by exactly one clock cycle.
    pub fn cycle(&mut self, bus: &mut dyn Bus) -> Result<(), CpuError> {
        self.total_cycles += 1;

        // End-of-φ2 interrupt sampling happens on every cycle, per the
        // interrupt-pin-sampling design: NMI latches on its rising edge,
        // IRQ latches whenever the line is asserted and I is clear.
        if self.state.nmi_pending {
            self.state.nmi_latched = true;
            self.state.nmi_pending = false;
        }
        if self.state.irq_line && !self.state.status.contains(Status::IRQ_DISABLE) {
            self.state.irq_latched = true;
        }

        if self.state.jammed {
            // Architectural halt: keep reading the same opcode forever.
            let _ = bus.read(self.state.pc);
            return Ok(());
        }

        if self.state.timer.contains(Timer::T1) {
            self.fetch_opcode(bus);
            return Ok(());
        }

        self.run_current(bus)
    }

    /// `T1`-tagged cycle: fetch the next opcode (or hijack into an
    /// interrupt sequence), per §4.4 steps 1, 6-9.
    fn fetch_opcode(&mut self, bus: &mut dyn Bus) {
        self.state.dst = Dst::Ir;
        self.state.mar = self.state.pc;

        if self.state.nmi_latched || self.state.irq_latched {
            // Hardware interrupt hijack: the opcode fetch still happens
            // (a dummy read of the instruction that would have run) but
            // is discarded and PC is not advanced; IR is forced to BRK's
            // slot so the control-flow handler can share its vector
            // push/pull choreography.
            log::trace!(
                "servicing {} at PC {:#06X}",
                if self.state.nmi_latched { "NMI" } else { "IRQ" },
                self.state.pc
            );
            let _ = bus.read(self.state.pc);
            self.state.ir = 0x00;
            self.opdef = table::decode(0x00);
            self.state.step = if self.state.nmi_latched { control_flow::NMI_STEP } else { control_flow::IRQ_STEP };
            self.state.nmi_latched = false;
            self.state.irq_latched = false;
            self.state.timer = Timer::T2;
            return;
        }

        let opcode = bus.read(self.state.pc);
        self.state.pc = self.state.pc.wrapping_add(1);
        self.state.mdr = opcode;
        self.state.ir = opcode;
        self.opdef = table::decode(opcode);
        self.state.step = 0;
        self.cycles_this_instruction = 1;

        // T0 slip: if the instruction we are about to run is a one-byte
        // (implied/accumulator) instruction, the T0 interrupt-poll hint
        // fires one cycle earlier, on this very fetch.
        self.state.timer = if table::is_one_byte(opcode) {
            Timer::T2 | Timer::T0
        } else {
            Timer::T2
        };
    }

    /// Any cycle other than an opcode fetch: dispatch to the family
    /// handler for the current opcode and apply the cycle-count/timer
    /// bookkeeping common to all of them.
    fn run_current(&mut self, bus: &mut dyn Bus) -> Result<(), CpuError> {
        // Invariant (data model §3 / testable property §8.1): exactly one
        // of the primary micro-cycle tags is set at the start of every
        // cycle. `CpuState` is `pub`, so a caller driving the CPU through
        // `state_mut()` (as the golden-vector harness does to seed a
        // starting snapshot) can violate this; a corrupted tag has no
        // defined successor and must not be dispatched.
        if !has_exactly_one_primary_timer_tag(self.state.timer) {
            return Err(CpuError::InvalidMicroState {
                opcode: self.state.ir,
                timer_bits: self.state.timer.bits(),
            });
        }

        self.cycles_this_instruction += 1;
        let opdef = self.opdef;

        let outcome = if opdef.op == Op::Brk && self.state.step >= control_flow::NMI_STEP {
            control_flow::service_interrupt(&mut self.state, bus)
        } else {
            dispatch_family(&mut self.state, bus, opdef)
        };

        match outcome {
            StepOutcome::Continue => {
                self.state.timer = Timer::T2; // mid-instruction; exact T-number is not consulted by dispatch, only T1/T2 boundaries are.
                Ok(())
            }
            StepOutcome::Done => {
                self.state.timer = Timer::TPLUS | Timer::T1;
                Ok(())
            }
        }
    }
}

/// Route to the family handler owning `opdef.op`. Total over every `Op`
/// variant `decode` can produce, so this never needs to report failure
/// itself — the one reachable invalid-micro-state path is the timer-tag
/// check in `run_current`, above.
fn dispatch_family(cpu: &mut CpuState, bus: &mut dyn Bus, opdef: table::OpDef) -> StepOutcome {
    use table::Op::{
        Adc, Alr, And, Anc, Ane, Arr, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Cld, Cli, Clc,
        Clv, Cmp, Cpx, Cpy, Dcp, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Isc, Jam, Jmp, Jsr, Las, Lax, Lda, Ldx,
        Ldy, Lsr, Nop, Ora, Php, Pha, Pla, Plp, Rla, Rol, Ror, Rra, Rti, Rts, Sax, Sbc, Sbx, Sec, Sed, Sei,
        Sha, Shx, Shy, Slo, Sre, Sta, Stx, Sty, Tas, Tax, Tay, Tsx, Txa, Txs, Tya,
    };

    match opdef.op {
        Lda | Ldx | Ldy | Lax => load_store::load(cpu, bus, opdef),
        Sta | Stx | Sty | Sax => load_store::store(cpu, bus, opdef),
        Adc | Sbc => arithmetic::add_sub(cpu, bus, opdef),
        Alr | Anc | Arr | Sbx => arithmetic::combo(cpu, bus, opdef),
        And | Ora | Eor | Bit => logical::run(cpu, bus, opdef),
        Cmp | Cpx | Cpy => compare::run(cpu, bus, opdef),
        Asl | Lsr | Rol | Ror | Inc | Dec => rmw::documented(cpu, bus, opdef),
        Slo | Rla | Sre | Rra | Dcp | Isc => rmw::illegal(cpu, bus, opdef),
        Bpl | Bmi | Bvc | Bvs | Bcc | Bcs | Bne | Beq => branches::run(cpu, bus, opdef),
        Jmp => control_flow::jmp(cpu, bus, opdef),
        Jsr => control_flow::jsr(cpu, bus),
        Rts => control_flow::rts(cpu, bus),
        Rti => control_flow::rti(cpu, bus),
        Brk => control_flow::brk(cpu, bus),
        Tax | Tay | Txa | Tya | Tsx | Txs => misc::transfer(cpu, bus, opdef.op),
        Pha | Php => misc::push(cpu, bus, opdef.op),
        Pla | Plp => misc::pull(cpu, bus, opdef.op),
        Inx | Iny | Dex | Dey => misc::incr(cpu, bus, opdef.op),
        Clc | Sec | Cli | Sei | Clv | Cld | Sed => misc::flag_op(cpu, bus, opdef.op),
        Nop => misc::nop(cpu, bus, opdef),
        Jam => misc::jam(cpu, bus),
        Ane | Lxa | Sha | Shx | Shy | Tas | Las => misc::unstable(cpu, bus, opdef),
    }
}

/// `SPEC_FULL.md` §8.1: exactly one of the primary micro-cycle tags must
/// be set. `T0` and `V0` are auxiliary bits that compose onto a primary
/// tag and are masked out before counting.
fn has_exactly_one_primary_timer_tag(timer: Timer) -> bool {
    const PRIMARY: Timer = Timer::T1
        .union(Timer::T2)
        .union(Timer::T3)
        .union(Timer::T4)
        .union(Timer::T5)
        .union(Timer::T6)
        .union(Timer::T7)
        .union(Timer::T8)
        .union(Timer::TPLUS)
        .union(Timer::SD1)
        .union(Timer::SD2);
    (timer & PRIMARY).bits().count_ones() == 1
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::bus::Bus;

    /// Flat 64KB RAM bus used by every unit/integration test in this
    /// crate: a faithful stand-in for the "fixed-size byte array" test
    /// harness called out in the design notes.
    pub struct RamBus {
        pub mem: [u8; 0x10000],
    }

    impl RamBus {
        pub fn new() -> Self {
            Self { mem: [0; 0x10000] }
        }

        pub fn load(&mut self, addr: u16, bytes: &[u8]) {
            for (i, b) in bytes.iter().enumerate() {
                self.mem[addr as usize + i] = *b;
            }
        }

        pub fn set_reset_vector(&mut self, addr: u16) {
            self.mem[0xFFFC] = addr as u8;
            self.mem[0xFFFD] = (addr >> 8) as u8;
        }
    }

    impl Default for RamBus {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Bus for RamBus {
        fn read(&mut self, address: u16) -> u8 {
            self.mem[address as usize]
        }

        fn write(&mut self, address: u16, value: u8) {
            self.mem[address as usize] = value;
        }
    }
}
