use std::fmt;

use crate::error::{Chip8Error, Result};

/// A decoded 16-bit instruction word.
///
/// `x` and `y` are register indices taken from bits 8-11 and 4-7, `kk` is the
/// low byte and `addr` the low 12 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0: Clear screen
    Cls,
    /// 00EE: Return from subroutine
    Ret,
    /// 0NNN: Call native routine
    Sys { addr: u16 },
    /// 1NNN: Jump to NNN
    Jp { addr: u16 },
    /// 2NNN: Call subroutine at NNN
    Call { addr: u16 },
    /// 3XKK: Skip next instruction if VX == KK
    SeImm { x: u8, kk: u8 },
    /// 4XKK: Skip next instruction if VX != KK
    SneImm { x: u8, kk: u8 },
    /// 5XY0: Skip next instruction if VX == VY
    SeReg { x: u8, y: u8 },
    /// 6XKK: VX = KK
    LdImm { x: u8, kk: u8 },
    /// 7XKK: VX += KK, carry discarded
    AddImm { x: u8, kk: u8 },
    /// 8XY0: VX = VY
    LdReg { x: u8, y: u8 },
    /// 8XY1: VX |= VY
    Or { x: u8, y: u8 },
    /// 8XY2: VX &= VY
    And { x: u8, y: u8 },
    /// 8XY3: VX ^= VY
    Xor { x: u8, y: u8 },
    /// 8XY4: VX += VY, VF = carry
    AddReg { x: u8, y: u8 },
}

impl Instruction {
    /// Classify an opcode. Every 16-bit word maps to at most one variant;
    /// words outside the supported set are `UnknownOpcode`.
    pub fn decode(opcode: u16) -> Result<Instruction> {
        // Instruction split into nibbels(4bits) 1-4
        let n1 = ((opcode & 0xF000) >> 12) as u8;
        let x = ((opcode & 0x0F00) >> 8) as u8;
        let y = ((opcode & 0x00F0) >> 4) as u8;
        let n4 = (opcode & 0x000F) as u8;

        let kk = (opcode & 0x00FF) as u8;
        let addr = opcode & 0x0FFF;

        let inst = match (n1, x, y, n4) {
            (0x0, 0x0, 0xE, 0x0) => Instruction::Cls,
            (0x0, 0x0, 0xE, 0xE) => Instruction::Ret,
            (0x0, ..) => Instruction::Sys { addr },
            (0x1, ..) => Instruction::Jp { addr },
            (0x2, ..) => Instruction::Call { addr },
            (0x3, ..) => Instruction::SeImm { x, kk },
            (0x4, ..) => Instruction::SneImm { x, kk },
            (0x5, .., 0x0) => Instruction::SeReg { x, y },
            (0x6, ..) => Instruction::LdImm { x, kk },
            (0x7, ..) => Instruction::AddImm { x, kk },
            (0x8, .., 0x0) => Instruction::LdReg { x, y },
            (0x8, .., 0x1) => Instruction::Or { x, y },
            (0x8, .., 0x2) => Instruction::And { x, y },
            (0x8, .., 0x3) => Instruction::Xor { x, y },
            (0x8, .., 0x4) => Instruction::AddReg { x, y },
            _ => return Err(Chip8Error::UnknownOpcode { opcode }),
        };

        Ok(inst)
    }

    /// The canonical opcode word for this instruction.
    pub fn encode(&self) -> u16 {
        let xy = |top: u16, x: u8, y: u8, n: u16| {
            top | (x as u16 & 0xF) << 8 | (y as u16 & 0xF) << 4 | n
        };
        let xkk = |top: u16, x: u8, kk: u8| top | (x as u16 & 0xF) << 8 | kk as u16;

        match *self {
            Instruction::Cls => 0x00E0,
            Instruction::Ret => 0x00EE,
            Instruction::Sys { addr } => addr & 0x0FFF,
            Instruction::Jp { addr } => 0x1000 | (addr & 0x0FFF),
            Instruction::Call { addr } => 0x2000 | (addr & 0x0FFF),
            Instruction::SeImm { x, kk } => xkk(0x3000, x, kk),
            Instruction::SneImm { x, kk } => xkk(0x4000, x, kk),
            Instruction::SeReg { x, y } => xy(0x5000, x, y, 0x0),
            Instruction::LdImm { x, kk } => xkk(0x6000, x, kk),
            Instruction::AddImm { x, kk } => xkk(0x7000, x, kk),
            Instruction::LdReg { x, y } => xy(0x8000, x, y, 0x0),
            Instruction::Or { x, y } => xy(0x8000, x, y, 0x1),
            Instruction::And { x, y } => xy(0x8000, x, y, 0x2),
            Instruction::Xor { x, y } => xy(0x8000, x, y, 0x3),
            Instruction::AddReg { x, y } => xy(0x8000, x, y, 0x4),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::Cls => write!(f, "CLS"),
            Instruction::Ret => write!(f, "RET"),
            Instruction::Sys { addr } => write!(f, "SYS 0x{:03x}", addr),
            Instruction::Jp { addr } => write!(f, "JP 0x{:03x}", addr),
            Instruction::Call { addr } => write!(f, "CALL 0x{:03x}", addr),
            Instruction::SeImm { x, kk } => write!(f, "SE V{:X}, 0x{:02x}", x, kk),
            Instruction::SneImm { x, kk } => write!(f, "SNE V{:X}, 0x{:02x}", x, kk),
            Instruction::SeReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Instruction::LdImm { x, kk } => write!(f, "LD V{:X}, 0x{:02x}", x, kk),
            Instruction::AddImm { x, kk } => write!(f, "ADD V{:X}, 0x{:02x}", x, kk),
            Instruction::LdReg { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Instruction::Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            Instruction::And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Instruction::Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            Instruction::AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
        }
    }
}
