use std::fmt::Write;
use std::ops::Range;

use crate::error::{Chip8Error, Result};

pub const MEMORY_SIZE: usize = 0x1000;
/// Where the font table lives. Sprite for digit `d` starts at `FONT_START + d * 5`.
pub const FONT_START: u16 = 0x000;
/// Conventional ROM load address and initial PC.
pub const PROGRAM_START: u16 = 0x200;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

const FONT_SPRITE_SIZE: u16 = 5;
const DUMP_COLUMNS: usize = 16;

pub static DEFAULT_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Address of the built-in sprite for a hex digit. Only the low nibble is used.
pub fn font_sprite_address(digit: u8) -> u16 {
    FONT_START + (digit & 0x0F) as u16 * FONT_SPRITE_SIZE
}

/// 4 KiB of byte addressable memory with the font table baked into 0x000-0x04F.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: Vec<u8>,
}

impl Memory {
    pub fn new() -> Memory {
        let mut bytes = vec![0u8; MEMORY_SIZE];

        let font = FONT_START as usize;
        (&mut bytes[font..font + DEFAULT_FONT.len()]).copy_from_slice(&DEFAULT_FONT[..]);

        Memory { bytes }
    }

    pub fn get8(&self, addr: u16) -> Result<u8> {
        let range = Self::range(addr, 1)?;
        Ok(self.bytes[range.start])
    }

    /// Big-endian read of `addr` and `addr + 1`.
    pub fn get16(&self, addr: u16) -> Result<u16> {
        let range = Self::range(addr, 2)?;
        let mut buffer = [0u8; 2];
        buffer.copy_from_slice(&self.bytes[range]);
        Ok(u16::from_be_bytes(buffer))
    }

    pub fn set8(&mut self, addr: u16, val: u8) -> Result<()> {
        let range = Self::range(addr, 1)?;
        self.bytes[range.start] = val;
        Ok(())
    }

    /// Big-endian write, high byte at `addr`.
    pub fn set16(&mut self, addr: u16, val: u16) -> Result<()> {
        let range = Self::range(addr, 2)?;
        (&mut self.bytes[range]).copy_from_slice(&val.to_be_bytes());
        Ok(())
    }

    /// Copy `data` into memory starting at `addr`. Nothing is written unless
    /// the whole slice fits.
    pub fn load(&mut self, addr: u16, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        let range = Self::range(addr, data.len())?;
        (&mut self.bytes[range]).copy_from_slice(data);
        Ok(())
    }

    /// Place a program at `PROGRAM_START`.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max_size: MAX_ROM_SIZE,
            });
        }
        self.load(PROGRAM_START, rom)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..]
    }

    /// Hex dump of the whole address space, 16 bytes per row.
    pub fn dump(&self) -> String {
        // "\nxxx: " per row plus "xx " per byte
        let rows = MEMORY_SIZE / DUMP_COLUMNS;
        let mut out = String::with_capacity(rows * 6 + MEMORY_SIZE * 3);

        for (addr, val) in self.bytes.iter().enumerate() {
            if addr % DUMP_COLUMNS == 0 {
                let _ = write!(out, "\n{:03x}: ", addr);
            }
            let _ = write!(out, "{:02x} ", val);
        }

        out
    }

    /// Single place where every access is validated.
    fn range(addr: u16, len: usize) -> Result<Range<usize>> {
        let start = addr as usize;
        let end = start + len;
        if end > MEMORY_SIZE {
            // Report the first byte that does not exist
            let address = start.max(MEMORY_SIZE);
            return Err(Chip8Error::MemoryOutOfBounds { address });
        }
        Ok(start..end)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory")
            .field("size", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_loaded() {
        let mem = Memory::new();

        assert_eq!(mem.get8(0x000), Ok(0xF0));
        assert_eq!(&mem.as_slice()[0..80], &DEFAULT_FONT[..]);
        // Nothing past the font table
        assert!(mem.as_slice()[80..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_font_sprite_address() {
        let mem = Memory::new();

        assert_eq!(font_sprite_address(0x0), 0x000);
        assert_eq!(font_sprite_address(0xA), 0x032);
        assert_eq!(font_sprite_address(0xF), 0x04B);
        assert_eq!(font_sprite_address(0x1F), 0x04B);

        // Digit 8 is F0 90 F0 90 F0
        let addr = font_sprite_address(8);
        let sprite: Vec<u8> = (0..5).map(|i| mem.get8(addr + i).unwrap()).collect();
        assert_eq!(sprite, vec![0xF0, 0x90, 0xF0, 0x90, 0xF0]);
    }

    #[test]
    fn test_get8_set8() {
        let mut mem = Memory::new();

        mem.set8(0x800, 0x42).unwrap();
        assert_eq!(mem.get8(0x800), Ok(0x42));

        mem.set8(0x800, 0x69).unwrap();
        assert_eq!(mem.get8(0x800), Ok(0x69));

        mem.set8(0xFFF, 0x01).unwrap();
        assert_eq!(mem.get8(0xFFF), Ok(0x01));
    }

    #[test]
    fn test_get8_set8_out_of_range() {
        let mut mem = Memory::new();

        assert_eq!(
            mem.get8(0x1000),
            Err(Chip8Error::MemoryOutOfBounds { address: 0x1000 })
        );
        assert_eq!(
            mem.set8(0x1000, 0x69),
            Err(Chip8Error::MemoryOutOfBounds { address: 0x1000 })
        );
        assert!(mem.get8(u16::MAX).is_err());
    }

    #[test]
    fn test_get16_big_endian() {
        let mut mem = Memory::new();
        mem.set8(0x300, 0xAB).unwrap();
        mem.set8(0x301, 0xCD).unwrap();

        assert_eq!(mem.get16(0x300), Ok(0xABCD));
        // Unaligned reads are fine
        assert_eq!(mem.get16(0x2FF), Ok(0x00AB));
    }

    #[test]
    fn test_set16_high_byte_first() {
        let mut mem = Memory::new();
        mem.set16(0x400, 0x1234).unwrap();

        assert_eq!(mem.get8(0x400), Ok(0x12));
        assert_eq!(mem.get8(0x401), Ok(0x34));
    }

    #[test]
    fn test_16bit_upper_bound() {
        let mut mem = Memory::new();

        assert!(mem.set16(4094, 0xBEEF).is_ok());
        assert_eq!(mem.get16(4094), Ok(0xBEEF));

        assert_eq!(
            mem.get16(4095),
            Err(Chip8Error::MemoryOutOfBounds { address: 0x1000 })
        );
        assert_eq!(
            mem.set16(4095, 0xBEEF),
            Err(Chip8Error::MemoryOutOfBounds { address: 0x1000 })
        );
        // Failed write leaves the last byte alone
        assert_eq!(mem.get8(4095), Ok(0xEF));
    }

    #[test]
    fn test_load_rom() {
        let mut mem = Memory::new();
        mem.load_rom(&[0x00, 0xE0, 0x12, 0x00]).unwrap();

        assert_eq!(mem.get16(0x200), Ok(0x00E0));
        assert_eq!(mem.get16(0x202), Ok(0x1200));
    }

    #[test]
    fn test_load_rom_max_size() {
        let mut mem = Memory::new();
        let rom = vec![0xAA; MAX_ROM_SIZE];

        mem.load_rom(&rom).unwrap();
        assert_eq!(mem.get8(0xFFF), Ok(0xAA));
    }

    #[test]
    fn test_load_rom_too_large() {
        let mut mem = Memory::new();
        let rom = vec![0xAA; MAX_ROM_SIZE + 1];

        assert_eq!(
            mem.load_rom(&rom),
            Err(Chip8Error::RomTooLarge {
                size: 3585,
                max_size: 3584
            })
        );
        assert_eq!(mem.get8(0x200), Ok(0x00));
    }

    #[test]
    fn test_load_past_end_writes_nothing() {
        let mut mem = Memory::new();

        assert_eq!(
            mem.load(0xFFE, &[1, 2, 3]),
            Err(Chip8Error::MemoryOutOfBounds { address: 0x1000 })
        );
        assert_eq!(mem.get16(0xFFE), Ok(0x0000));
    }

    #[test]
    fn test_dump() {
        let mem = Memory::new();
        let dump = mem.dump();
        let lines: Vec<&str> = dump.lines().filter(|l| !l.is_empty()).collect();

        assert_eq!(lines.len(), 256);
        assert!(lines[0].starts_with("000: f0 90 90 90 f0 20 60 20"));
        assert!(lines[255].starts_with("ff0: 00"));
    }
}
