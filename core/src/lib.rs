// CHIP-8 virtual machine core
//
// Owns the instruction semantics, memory, and framebuffer. Loading ROMs from
// disk, pacing, input, audio and rendering belong to the host driving `Cpu::tick`.

mod color;
mod cpu;
mod display;
mod error;
mod instruction;
mod memory;

pub use color::{Chip8Color, Chip8ColorParseError, DEFAULT_BACKGROUND_COLOR, DEFAULT_FOREGROUND_COLOR};
pub use cpu::{Chip8Builder, Cpu, CpuState, STACK_SIZE};
pub use display::{Display, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use error::{Chip8Error, Result};
pub use instruction::Instruction;
pub use memory::{font_sprite_address, Memory, DEFAULT_FONT, FONT_START, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START};
