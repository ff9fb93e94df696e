//! Integration harness for Tom Harte's `SingleStepTests` vectors for the
//! 6502 (https://github.com/SingleStepTests/65x02). Each vector gives an
//! initial register/RAM snapshot, a final snapshot, and the expected
//! per-cycle bus trace; running the core for exactly that many cycles
//! and comparing state against `final` is the strongest cross-check
//! available for a cycle-accurate core short of real silicon.
//!
//! Vector files are not vendored into this repository. Point
//! `SINGLE_STEP_TESTS_DIR` at a checkout of `65x02/6502/v1` to run this
//! test for real; otherwise it skips with a message.

use nes6502::{Bus, Cpu};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

struct TestBus {
    ram: [u8; 0x10000],
}

impl TestBus {
    fn new() -> Self {
        Self { ram: [0; 0x10000] }
    }

    fn load(&mut self, entries: &[(u16, u8)]) {
        for &(addr, value) in entries {
            self.ram[addr as usize] = value;
        }
    }
}

impl Bus for TestBus {
    fn read(&mut self, address: u16) -> u8 {
        self.ram[address as usize]
    }

    fn write(&mut self, address: u16, value: u8) {
        self.ram[address as usize] = value;
    }
}

#[derive(Deserialize)]
struct Snapshot {
    pc: u16,
    s: u8,
    a: u8,
    x: u8,
    y: u8,
    p: u8,
    ram: Vec<(u16, u8)>,
}

#[derive(Deserialize)]
struct Vector {
    name: String,
    initial: Snapshot,
    #[serde(rename = "final")]
    expected: Snapshot,
    cycles: Vec<(u16, Option<u8>, String)>,
}

fn seed(cpu: &mut Cpu, bus: &mut TestBus, snap: &Snapshot) {
    bus.load(&snap.ram);
    let state = cpu.state_mut();
    state.pc = snap.pc;
    state.sp = snap.s;
    state.a = snap.a;
    state.x = snap.x;
    state.y = snap.y;
    state.status = nes6502::Status::from_bits_truncate(snap.p);
    state.timer = nes6502::Timer::T1;
}

fn diff(cpu: &Cpu, bus: &TestBus, expected: &Snapshot) -> Vec<String> {
    let s = cpu.state();
    let mut errors = Vec::new();
    if s.pc != expected.pc {
        errors.push(format!("PC: got ${:04X}, want ${:04X}", s.pc, expected.pc));
    }
    if s.sp != expected.s {
        errors.push(format!("S: got ${:02X}, want ${:02X}", s.sp, expected.s));
    }
    if s.a != expected.a {
        errors.push(format!("A: got ${:02X}, want ${:02X}", s.a, expected.a));
    }
    if s.x != expected.x {
        errors.push(format!("X: got ${:02X}, want ${:02X}", s.x, expected.x));
    }
    if s.y != expected.y {
        errors.push(format!("Y: got ${:02X}, want ${:02X}", s.y, expected.y));
    }
    let want_p = expected.p | 0x20;
    if s.status.bits() != want_p {
        errors.push(format!("P: got {:#010b}, want {:#010b}", s.status.bits(), want_p));
    }
    for &(addr, want) in &expected.ram {
        let got = bus.ram[addr as usize];
        if got != want {
            errors.push(format!("RAM[${addr:04X}]: got ${got:02X}, want ${want:02X}"));
        }
    }
    errors
}

#[test]
#[ignore = "requires a SingleStepTests 65x02/6502/v1 checkout — point SINGLE_STEP_TESTS_DIR at it"]
fn run_all_opcodes() {
    let Ok(dir) = std::env::var("SINGLE_STEP_TESTS_DIR") else {
        eprintln!("SINGLE_STEP_TESTS_DIR not set; skipping SingleStepTests run.");
        return;
    };
    let dir = PathBuf::from(dir);

    let mut total_pass = 0u64;
    let mut total_fail = 0u64;

    for opcode in 0..=0xFFu16 {
        let path = dir.join(format!("{opcode:02x}.json"));
        if !path.exists() {
            continue;
        }
        let data = fs::read_to_string(&path).unwrap_or_else(|e| panic!("reading {}: {e}", path.display()));
        let vectors: Vec<Vector> = serde_json::from_str(&data).unwrap_or_else(|e| panic!("parsing {}: {e}", path.display()));

        let mut file_fail = 0u32;
        for vector in &vectors {
            let mut cpu = Cpu::new();
            let mut bus = TestBus::new();
            seed(&mut cpu, &mut bus, &vector.initial);

            for _ in 0..vector.cycles.len() {
                cpu.cycle(&mut bus).unwrap_or_else(|e| panic!("{}: {e}", vector.name));
            }

            let errors = diff(&cpu, &bus, &vector.expected);
            if errors.is_empty() {
                total_pass += 1;
            } else {
                total_fail += 1;
                file_fail += 1;
                eprintln!("FAIL [{}]: {}", vector.name, errors.join(", "));
            }
        }
        if file_fail > 0 {
            eprintln!("${opcode:02x}.json: {file_fail} failures");
        }
    }

    println!("SingleStepTests: {total_pass} passed, {total_fail} failed");
    assert_eq!(total_fail, 0);
}
