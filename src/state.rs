use crate::consts::{
    FONT_BASE, FONT_DATA, INITIAL_PC, KEY_COUNT, REGISTER_COUNT, STACK_SIZE, TOTAL_RAM_SIZE,
};
use crate::error::{Error, Result};

/// Everything the machine remembers between instructions, apart from the screen.
#[derive(Debug, Clone)]
pub struct State {
    pub ram: [u8; TOTAL_RAM_SIZE as usize],
    pub stack: [u16; STACK_SIZE],
    pub sp: usize,
    pub pc: u16,
    /// V0..VF. VF doubles as the carry, borrow and collision flag.
    pub registers: [u8; REGISTER_COUNT],
    pub index_register: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub keypad: [bool; KEY_COUNT],
    /// Keypad as seen by the last FX0A attempt, used to find release edges.
    pub prev_keypad: [bool; KEY_COUNT],
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    pub fn new() -> Self {
        let mut ram = [0; TOTAL_RAM_SIZE as usize];
        let font_start = FONT_BASE as usize;
        ram[font_start..font_start + FONT_DATA.len()].copy_from_slice(&FONT_DATA);
        State {
            ram,
            stack: [0; STACK_SIZE],
            sp: 0,
            pc: INITIAL_PC,
            registers: [0; REGISTER_COUNT],
            index_register: 0,
            delay_timer: 0,
            sound_timer: 0,
            keypad: [false; KEY_COUNT],
            prev_keypad: [false; KEY_COUNT],
        }
    }

    /// Reads the byte at `addr`, wrapping around the end of memory.
    pub fn read_byte(&self, addr: u16) -> u8 {
        self.ram[addr as usize % TOTAL_RAM_SIZE as usize]
    }

    pub fn write_byte(&mut self, addr: u16, value: u8) {
        self.ram[addr as usize % TOTAL_RAM_SIZE as usize] = value;
    }

    /// Big-endian instruction word at PC. Does not advance PC.
    pub fn fetch(&self) -> Result<u16> {
        let pc = self.pc as usize;
        if pc + 1 >= TOTAL_RAM_SIZE as usize {
            return Err(Error::OutOfBounds(self.pc));
        }
        Ok(u16::from_be_bytes([self.ram[pc], self.ram[pc + 1]]))
    }

    pub fn push(&mut self, address: u16) -> Result<()> {
        let slot = self.stack.get_mut(self.sp).ok_or(Error::StackOverflow)?;
        *slot = address;
        self.sp += 1;
        Ok(())
    }

    /// Pops the top return address. An `sp` past the end of the stack reads as overflow.
    pub fn pop(&mut self) -> Result<u16> {
        let top = self.sp.checked_sub(1).ok_or(Error::StackUnderflow)?;
        let address = *self.stack.get(top).ok_or(Error::StackOverflow)?;
        self.sp = top;
        Ok(address)
    }
}
