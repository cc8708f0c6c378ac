use crate::consts::{
    FONT_BASE, FONT_GLYPH_SIZE, INITIAL_PC, INSTRUCTION_SIZE, KEY_COUNT, MAX_PROGRAM_SIZE,
    MAX_SPRITE_HEIGHT,
};
use crate::display::Framebuffer;
use crate::error::{Error, Result};
use crate::parser::Instruction;
use crate::state::State;
use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Read;

/// What the caller should know after one `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    Continue,
    /// FX0A found no key release; PC was rewound onto the same instruction.
    WaitingForKey,
    /// The instruction jumped to its own address.
    Halt,
}

pub struct Interpreter {
    state: State,
    framebuffer: Framebuffer,
    rng: StdRng,
    redraw: bool,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates a machine with its random source seeded from the OS.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Creates a machine whose CXNN results are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Interpreter {
            state: State::new(),
            framebuffer: Framebuffer::new(),
            rng,
            redraw: true,
        }
    }

    /// Zeroes memory, registers, stack, keypad, timers and screen, then reloads the font.
    pub fn reset(&mut self) {
        debug!("Resetting machine");
        self.state = State::new();
        self.framebuffer.clear();
        self.redraw = true;
    }

    /// Copies `rom` into memory at 0x200. Memory is untouched if it does not fit.
    pub fn load_program(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_PROGRAM_SIZE {
            return Err(Error::RomTooLarge {
                size: rom.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        let start = INITIAL_PC as usize;
        let end = start + rom.len();
        self.state.ram[start..end].copy_from_slice(rom);
        debug!("Loaded {} byte program at {:#05X}", rom.len(), start);
        Ok(())
    }

    pub fn load_program_from(&mut self, reader: &mut impl Read) -> Result<()> {
        let mut rom = Vec::new();
        reader.read_to_end(&mut rom)?;
        self.load_program(&rom)
    }

    /// Fetches, decodes and executes one instruction.
    ///
    /// Unknown instructions are logged and skipped. Stack and PC faults are returned
    /// as errors with PC already past the offending instruction.
    pub fn step(&mut self) -> Result<StepResult> {
        let instruction_address = self.state.pc;
        let opcode = self.state.fetch()?;
        self.state.pc += INSTRUCTION_SIZE;

        let instruction = match Instruction::from_opcode(opcode) {
            Ok(instruction) => instruction,
            Err(err) => {
                warn!("{} at {:#05X}, skipping", err, instruction_address);
                return Ok(StepResult::Continue);
            }
        };
        trace!("{:#05X}: {:04X} {:?}", instruction_address, opcode, instruction);

        self.execute(instruction, instruction_address)
    }

    fn execute(&mut self, instruction: Instruction, instruction_address: u16) -> Result<StepResult> {
        let registers = &mut self.state.registers;

        match instruction {
            Instruction::ClearScreen => {
                self.clear_screen();
            }
            Instruction::ReturnFromSubroutine => {
                self.state.pc = self.state.pop()?;
            }
            Instruction::Jump(address) => {
                self.state.pc = address;
                if instruction_address == address {
                    return Ok(StepResult::Halt);
                }
            }
            Instruction::Call(address) => {
                self.state.push(self.state.pc)?;
                self.state.pc = address;
            }
            Instruction::SkipIfEqualByte(register, value) => {
                if registers[register] == value {
                    self.skip();
                }
            }
            Instruction::SkipIfNotEqualByte(register, value) => {
                if registers[register] != value {
                    self.skip();
                }
            }
            Instruction::SkipIfRegistersEqual(register_x, register_y) => {
                if registers[register_x] == registers[register_y] {
                    self.skip();
                }
            }
            Instruction::SetRegisterToValue(register, value) => {
                registers[register] = value;
            }
            Instruction::AddToRegister(register, value) => {
                registers[register] = registers[register].wrapping_add(value);
            }
            Instruction::SetRegisterToRegisterValue(register_x, register_y) => {
                registers[register_x] = registers[register_y];
            }
            Instruction::RegistersBitwiseOr(register_x, register_y) => {
                registers[register_x] |= registers[register_y];
                registers[0xF] = 0;
            }
            Instruction::RegistersBitwiseAnd(register_x, register_y) => {
                registers[register_x] &= registers[register_y];
                registers[0xF] = 0;
            }
            Instruction::RegistersBitwiseXor(register_x, register_y) => {
                registers[register_x] ^= registers[register_y];
                registers[0xF] = 0;
            }
            Instruction::RegistersSumWithCarry(register_x, register_y) => {
                let vx = registers[register_x];
                let vy = registers[register_y];

                let (sum, overflow) = vx.overflowing_add(vy);
                registers[register_x] = sum;
                registers[0xF] = u8::from(overflow);
            }
            Instruction::SubtractRegisterFromRegister(register_x, register_y) => {
                let vx = registers[register_x];
                let vy = registers[register_y];

                registers[register_x] = vx.wrapping_sub(vy);
                registers[0xF] = u8::from(vx >= vy);
            }
            Instruction::ShiftRightIntoRegister(register_x, register_y) => {
                let vy = registers[register_y];
                registers[register_x] = vy >> 1;
                registers[0xF] = vy & 1;
            }
            Instruction::SubtractRegisterValueFromRegister(register_x, register_y) => {
                let vx = registers[register_x];
                let vy = registers[register_y];

                // Flag from the operands as they were before the write
                registers[register_x] = vy.wrapping_sub(vx);
                registers[0xF] = u8::from(vy >= vx);
            }
            Instruction::ShiftLeftIntoRegister(register_x, register_y) => {
                let vy = registers[register_y];
                registers[register_x] = vy << 1;
                registers[0xF] = vy >> 7;
            }
            Instruction::SkipIfRegistersNotEqual(register_x, register_y) => {
                if registers[register_x] != registers[register_y] {
                    self.skip();
                }
            }
            Instruction::SetIndexRegisterToValue(value) => {
                self.state.index_register = value;
            }
            Instruction::JumpWithOffset(address) => {
                self.state.pc = address + u16::from(registers[0]);
            }
            Instruction::SetRegisterToRandAndValue(register, value) => {
                let n: u8 = self.rng.random();
                registers[register] = n & value;
            }
            Instruction::DrawSprite(register_x, register_y, height) => {
                let x = registers[register_x];
                let y = registers[register_y];
                self.draw(x, y, height);
            }
            Instruction::SkipIfKeyPressed(register) => {
                if self.state.keypad[key_index(registers[register])] {
                    self.skip();
                }
            }
            Instruction::SkipIfKeyNotPressed(register) => {
                if !self.state.keypad[key_index(registers[register])] {
                    self.skip();
                }
            }
            Instruction::SetRegisterToDelayTimerValue(register) => {
                registers[register] = self.state.delay_timer;
            }
            Instruction::WaitForKeyRelease(register) => {
                let released = (0..KEY_COUNT)
                    .find(|&key| self.state.prev_keypad[key] && !self.state.keypad[key]);
                self.state.prev_keypad = self.state.keypad;

                match released {
                    Some(key) => registers[register] = key as u8,
                    None => {
                        self.state.pc = instruction_address;
                        return Ok(StepResult::WaitingForKey);
                    }
                }
            }
            Instruction::SetDelayTimerToRegisterValue(register) => {
                self.state.delay_timer = registers[register];
            }
            Instruction::SetSoundTimerToRegisterValue(register) => {
                self.state.sound_timer = registers[register];
            }
            Instruction::AddRegisterToIndexRegister(register) => {
                self.state.index_register = self
                    .state
                    .index_register
                    .wrapping_add(u16::from(registers[register]));
            }
            Instruction::SetIndexRegisterToSpriteForRegister(register) => {
                let character = u16::from(registers[register] & 0xF);
                self.state.index_register = FONT_BASE + character * FONT_GLYPH_SIZE;
            }
            Instruction::StoreBinaryCodedDecimalAtIndexRegister(register) => {
                let num = registers[register];
                let i = self.state.index_register;
                self.state.write_byte(i, num / 100);
                self.state.write_byte(i.wrapping_add(1), (num / 10) % 10);
                self.state.write_byte(i.wrapping_add(2), num % 10);
            }
            Instruction::DumpRegistersToMemoryAtIndexRegister(register) => {
                for ri in 0..=register {
                    let value = self.state.registers[ri];
                    self.state.write_byte(self.state.index_register, value);
                    self.state.index_register = self.state.index_register.wrapping_add(1);
                }
            }
            Instruction::LoadMemoryToRegistersAtIndexRegister(register) => {
                for ri in 0..=register {
                    self.state.registers[ri] = self.state.read_byte(self.state.index_register);
                    self.state.index_register = self.state.index_register.wrapping_add(1);
                }
            }
        }

        Ok(StepResult::Continue)
    }

    fn skip(&mut self) {
        self.state.pc += INSTRUCTION_SIZE;
    }

    /// Counts both timers down by one. Call at 60 Hz.
    pub fn tick_timers(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }

    pub fn clear_screen(&mut self) {
        self.framebuffer.clear();
        self.redraw = true;
    }

    /// Draws `height` sprite rows read from I at (`x`, `y`). VF ends up 1 on collision.
    ///
    /// Heights above 15 are cut to 15.
    pub fn draw(&mut self, x: u8, y: u8, height: u8) {
        let height = usize::from(height).min(MAX_SPRITE_HEIGHT);
        let mut sprite = [0u8; MAX_SPRITE_HEIGHT];
        for (row, byte) in sprite[..height].iter_mut().enumerate() {
            *byte = self
                .state
                .read_byte(self.state.index_register.wrapping_add(row as u16));
        }
        let collision = self.framebuffer.draw(x, y, &sprite[..height]);
        self.state.registers[0xF] = u8::from(collision);
        self.redraw = true;
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) -> Result<()> {
        let slot = self
            .state
            .keypad
            .get_mut(key as usize)
            .ok_or(Error::InvalidKey(key))?;
        *slot = pressed;
        debug!(
            "Key {:#X} is now {}",
            key,
            if pressed { "pressed" } else { "released" }
        );
        Ok(())
    }

    pub fn is_key_pressed(&self, key: u8) -> Result<bool> {
        self.state
            .keypad
            .get(key as usize)
            .copied()
            .ok_or(Error::InvalidKey(key))
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// True once after every change to the screen.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Direct access for tests and debuggers. Nothing here checks the invariants
    /// `step` relies on; a bad stack pointer surfaces as a stack error.
    #[doc(hidden)]
    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }
}

fn key_index(value: u8) -> usize {
    usize::from(value & 0xF)
}
