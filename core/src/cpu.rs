// CHIP-8 interpreter
//
// Useful links:
// * [Guide to making a CHIP-8 emulator](https://tobiasvl.github.io/blog/write-a-chip-8-emulator/)
// * [Cowgod's Chip-8 Technical Reference](http://devernay.free.fr/hacks/chip8/C8TECH10.HTM)
//

use std::fmt;

use log::{debug, trace, warn};

use crate::display::Display;
use crate::error::{Chip8Error, Result};
use crate::instruction::Instruction;
use crate::memory::{Memory, PROGRAM_START};

pub const STACK_SIZE: usize = 16;

/// Highest address a jump may land on; the fetch at the target must still
/// be able to read two bytes.
const MAX_JUMP_TARGET: u16 = 0xFFE;

#[derive(Debug, Default)]
pub struct Chip8Builder {
    /// ROM
    rom: Option<Vec<u8>>,
    /// Log every executed instruction
    trace: bool,
}

impl Chip8Builder {
    pub fn new() -> Chip8Builder {
        Chip8Builder {
            rom: None,
            trace: false,
        }
    }

    pub fn with_rom(mut self, rom: Vec<u8>) -> Self {
        self.rom = Some(rom);
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn build(self) -> Result<Cpu> {
        let mut cpu = Cpu::new();
        cpu.trace = self.trace;

        if let Some(rom) = self.rom {
            cpu.memory.load_rom(&rom)?;
        }

        Ok(cpu)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cpu {
    /// General purpose registers, VF doubles as the carry flag
    v: [u8; 16],
    /// Index register
    i: u16,
    /// Program counter
    pc: u16,
    /// Call stack
    stack: [u16; STACK_SIZE],
    /// Stack pointer, number of occupied stack slots
    sp: u8,
    /// Delay Timer
    delay_timer: u8,
    /// Sound Timer
    sound_timer: u8,
    memory: Memory,
    display: Display,
    trace: bool,
}

impl Cpu {
    pub fn new() -> Cpu {
        Cpu {
            v: [0u8; 16],
            i: 0,
            pc: PROGRAM_START,
            stack: [0u16; STACK_SIZE],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            memory: Memory::new(),
            display: Display::new(),
            trace: false,
        }
    }

    /// Execute exactly one instruction.
    ///
    /// The PC is advanced past the fetched word before the instruction runs,
    /// so skips and CALL work relative to the next instruction. A failed fetch
    /// changes nothing; any later failure leaves only that PC advance behind.
    pub fn tick(&mut self) -> Result<()> {
        let pc = self.pc;

        let result = self.fetch_execute(pc);
        if let Err(err) = &result {
            warn!("cycle at 0x{:04x} failed: {}", pc, err);
            trace!("{}", self.state());
        }
        result
    }

    fn fetch_execute(&mut self, pc: u16) -> Result<()> {
        let opcode = self.memory.get16(pc)?;
        self.pc = pc + 2;

        let inst = Instruction::decode(opcode)?;
        if self.trace {
            debug!("0x{:04x}: {:04x} {}", pc, opcode, inst);
        }

        self.execute(inst, opcode)
    }

    fn execute(&mut self, inst: Instruction, opcode: u16) -> Result<()> {
        match inst {
            Instruction::Cls => self.display.clear(),
            Instruction::Ret => self.ret()?,
            Instruction::Sys { .. } => return Err(Chip8Error::NotImplemented { opcode }),
            Instruction::Jp { addr } => {
                if addr > MAX_JUMP_TARGET {
                    return Err(Chip8Error::InvalidJumpTarget { target: addr });
                }
                self.pc = addr;
            }
            Instruction::Call { addr } => self.call(addr)?,
            Instruction::SeImm { x, kk } => self.skip_if(self.v[x as usize] == kk),
            Instruction::SneImm { x, kk } => self.skip_if(self.v[x as usize] != kk),
            Instruction::SeReg { x, y } => self.skip_if(self.v[x as usize] == self.v[y as usize]),
            Instruction::LdImm { x, kk } => self.v[x as usize] = kk,
            Instruction::AddImm { x, kk } => {
                self.v[x as usize] = self.v[x as usize].wrapping_add(kk);
            }
            Instruction::LdReg { x, y } => self.v[x as usize] = self.v[y as usize],
            Instruction::Or { x, y } => self.v[x as usize] |= self.v[y as usize],
            Instruction::And { x, y } => self.v[x as usize] &= self.v[y as usize],
            Instruction::Xor { x, y } => self.v[x as usize] ^= self.v[y as usize],
            Instruction::AddReg { x, y } => {
                let (sum, carry) = self.v[x as usize].overflowing_add(self.v[y as usize]);
                self.v[x as usize] = sum;
                // Carry overrides the sum when VF is the destination
                self.v[0xF] = carry as u8;
            }
        }

        Ok(())
    }

    // Pop program counter from stack
    fn ret(&mut self) -> Result<()> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow { pc: self.pc - 2 });
        }
        self.sp -= 1;
        self.pc = self.stack[self.sp as usize];
        Ok(())
    }

    // Push the already advanced program counter and jump
    fn call(&mut self, addr: u16) -> Result<()> {
        if self.sp as usize >= STACK_SIZE {
            return Err(Chip8Error::StackOverflow { pc: self.pc - 2 });
        }
        self.stack[self.sp as usize] = self.pc;
        self.sp += 1;
        self.pc = addr;
        Ok(())
    }

    fn skip_if(&mut self, cond: bool) {
        if cond {
            self.pc += 2;
        }
    }

    /// Count both timers down by one. Meant to be called by the host at 60 Hz,
    /// independent of how many instructions run in between.
    pub fn step_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn sp(&self) -> u8 {
        self.sp
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    /// Register VX, only the low nibble of `x` is used.
    pub fn v(&self, x: u8) -> u8 {
        self.v[(x & 0xF) as usize]
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.v
    }

    /// Occupied part of the call stack, oldest return address first.
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.sp as usize]
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn set_delay_timer(&mut self, value: u8) {
        self.delay_timer = value;
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn set_sound_timer(&mut self, value: u8) {
        self.sound_timer = value;
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// For hosts that load data into memory before execution starts.
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut Display {
        &mut self.display
    }

    pub fn state(&self) -> CpuState {
        CpuState {
            v: self.v,
            i: self.i,
            pc: self.pc,
            sp: self.sp,
            delay_timer: self.delay_timer,
            sound_timer: self.sound_timer,
            stack: self.stack,
        }
    }

    /// Register state followed by a hex dump of memory.
    pub fn full_dump(&self) -> String {
        format!("{}{}", self.state(), self.memory.dump())
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

/// Register file snapshot, printable for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuState {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
}

impl fmt::Display for CpuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nRegisters: \n")?;
        writeln!(f, "PC: {:04x} \n", self.pc)?;

        write!(f, "       ")?;
        for idx in 0..self.v.len() {
            write!(f, "V{:01x} ", idx)?;
        }
        write!(f, "\nVx:    ")?;
        for val in self.v.iter() {
            write!(f, "{:02x} ", val)?;
        }
        writeln!(f, "\n")?;

        write!(f, "       ")?;
        for idx in 0..self.stack.len() {
            write!(f, "{:02x}   ", idx)?;
        }
        write!(f, "\nStack: ")?;
        for val in self.stack.iter() {
            write!(f, "{:04x} ", val)?;
        }
        writeln!(f, "\n")?;

        writeln!(f, "I:  {:04x} ", self.i)?;
        writeln!(f, "SP: {:02x} ", self.sp)?;
        writeln!(f, "DT: {:02x} ", self.delay_timer)?;
        writeln!(f, "ST: {:02x} ", self.sound_timer)
    }
}
