use thiserror::Error;

pub type Result<T> = std::result::Result<T, Chip8Error>;

/// Everything that can go wrong while executing a cycle or touching memory.
///
/// All variants are terminal for the cycle that raised them. The host decides
/// whether to keep calling `Cpu::tick` afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Chip8Error {
    #[error("memory address out of bounds: 0x{address:04x}")]
    MemoryOutOfBounds { address: usize },

    #[error("pixel coordinate out of range: x: {x}, y: {y}")]
    PixelOutOfRange { x: usize, y: usize },

    #[error("stack overflow on CALL at 0x{pc:04x}")]
    StackOverflow { pc: u16 },

    #[error("stack underflow on RET at 0x{pc:04x}")]
    StackUnderflow { pc: u16 },

    #[error("jump target out of range: 0x{target:04x}, max: 0x0ffe")]
    InvalidJumpTarget { target: u16 },

    #[error("instruction 0x{opcode:04x} is not implemented")]
    NotImplemented { opcode: u16 },

    #[error("unknown opcode: 0x{opcode:04x}")]
    UnknownOpcode { opcode: u16 },

    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },
}
