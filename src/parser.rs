use crate::error::{Error, Result};

/// A decoded instruction word. Register operands are indices into V0..VF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0 - clear screen
    ClearScreen,
    /// 00EE - return from subroutine
    ReturnFromSubroutine,
    /// 1NNN - jump to NNN
    Jump(u16),
    /// 2NNN - call subroutine at NNN
    Call(u16),
    /// 3XNN - skip next if VX equals NN
    SkipIfEqualByte(usize, u8),
    /// 4XNN - skip next if VX does not equal NN
    SkipIfNotEqualByte(usize, u8),
    /// 5XY0 - skip next if VX equals VY
    SkipIfRegistersEqual(usize, usize),
    /// 6XNN - set VX to NN
    SetRegisterToValue(usize, u8),
    /// 7XNN - add NN to VX, no carry
    AddToRegister(usize, u8),
    /// 8XY0 - set VX to value of VY
    SetRegisterToRegisterValue(usize, usize),
    /// 8XY1 - set VX | VY, VF reset
    RegistersBitwiseOr(usize, usize),
    /// 8XY2 - set VX & VY, VF reset
    RegistersBitwiseAnd(usize, usize),
    /// 8XY3 - set VX ^ VY, VF reset
    RegistersBitwiseXor(usize, usize),
    /// 8XY4 - add VY to VX, VF is the carry
    RegistersSumWithCarry(usize, usize),
    /// 8XY5 - VX = VX - VY, VF is 1 when there is no borrow
    SubtractRegisterFromRegister(usize, usize),
    /// 8XY6 - VX = VY >> 1, VF is the bit shifted out
    ShiftRightIntoRegister(usize, usize),
    /// 8XY7 - VX = VY - VX, VF is 1 when there is no borrow
    SubtractRegisterValueFromRegister(usize, usize),
    /// 8XYE - VX = VY << 1, VF is the bit shifted out
    ShiftLeftIntoRegister(usize, usize),
    /// 9XY0 - skip next if VX does not equal VY
    SkipIfRegistersNotEqual(usize, usize),
    /// ANNN - set I to NNN
    SetIndexRegisterToValue(u16),
    /// BNNN - jump to V0 + NNN
    JumpWithOffset(u16),
    /// CXNN - set VX to rand(0, 255) & NN
    SetRegisterToRandAndValue(usize, u8),
    /// DXYN - draw an N byte sprite from I at (VX, VY)
    DrawSprite(usize, usize, u8),
    /// EX9E - skip next if key VX is down
    SkipIfKeyPressed(usize),
    /// EXA1 - skip next if key VX is up
    SkipIfKeyNotPressed(usize),
    /// FX07 - set VX to delay timer value
    SetRegisterToDelayTimerValue(usize),
    /// FX0A - wait for a key release, store the key in VX
    WaitForKeyRelease(usize),
    /// FX15 - set delay timer to VX
    SetDelayTimerToRegisterValue(usize),
    /// FX18 - set sound timer to VX
    SetSoundTimerToRegisterValue(usize),
    /// FX1E - add VX to I (don't consider overflow)
    AddRegisterToIndexRegister(usize),
    /// FX29 - set I to location of sprite for character in VX
    SetIndexRegisterToSpriteForRegister(usize),
    /// FX33 - store binary coded decimal at memory under I(I+1)(I+2)
    StoreBinaryCodedDecimalAtIndexRegister(usize),
    /// FX55 - dump registers V0 to VX in memory, starting from I
    DumpRegistersToMemoryAtIndexRegister(usize),
    /// FX65 - load memory starting from I into V0 to VX
    LoadMemoryToRegistersAtIndexRegister(usize),
}

impl Instruction {
    pub fn from_opcode(opcode: u16) -> Result<Self> {
        let n1 = ((opcode >> 12) & 0xF) as usize;
        let x = ((opcode >> 8) & 0xF) as usize;
        let y = ((opcode >> 4) & 0xF) as usize;
        let n = (opcode & 0xF) as u8;

        let address = opcode & 0x0FFF;
        let byte_value = (opcode & 0x00FF) as u8;

        let instruction = match (n1, x, y, n) {
            (0, 0, 0xE, 0) => Instruction::ClearScreen,
            (0, 0, 0xE, 0xE) => Instruction::ReturnFromSubroutine,
            (1, _, _, _) => Instruction::Jump(address),
            (2, _, _, _) => Instruction::Call(address),
            (3, _, _, _) => Instruction::SkipIfEqualByte(x, byte_value),
            (4, _, _, _) => Instruction::SkipIfNotEqualByte(x, byte_value),
            (5, _, _, 0) => Instruction::SkipIfRegistersEqual(x, y),
            (6, _, _, _) => Instruction::SetRegisterToValue(x, byte_value),
            (7, _, _, _) => Instruction::AddToRegister(x, byte_value),
            (8, _, _, 0) => Instruction::SetRegisterToRegisterValue(x, y),
            (8, _, _, 1) => Instruction::RegistersBitwiseOr(x, y),
            (8, _, _, 2) => Instruction::RegistersBitwiseAnd(x, y),
            (8, _, _, 3) => Instruction::RegistersBitwiseXor(x, y),
            (8, _, _, 4) => Instruction::RegistersSumWithCarry(x, y),
            (8, _, _, 5) => Instruction::SubtractRegisterFromRegister(x, y),
            (8, _, _, 6) => Instruction::ShiftRightIntoRegister(x, y),
            (8, _, _, 7) => Instruction::SubtractRegisterValueFromRegister(x, y),
            (8, _, _, 0xE) => Instruction::ShiftLeftIntoRegister(x, y),
            (9, _, _, 0) => Instruction::SkipIfRegistersNotEqual(x, y),
            (0xA, _, _, _) => Instruction::SetIndexRegisterToValue(address),
            (0xB, _, _, _) => Instruction::JumpWithOffset(address),
            (0xC, _, _, _) => Instruction::SetRegisterToRandAndValue(x, byte_value),
            (0xD, _, _, _) => Instruction::DrawSprite(x, y, n),
            (0xE, _, 9, 0xE) => Instruction::SkipIfKeyPressed(x),
            (0xE, _, 0xA, 1) => Instruction::SkipIfKeyNotPressed(x),
            (0xF, _, 0, 7) => Instruction::SetRegisterToDelayTimerValue(x),
            (0xF, _, 0, 0xA) => Instruction::WaitForKeyRelease(x),
            (0xF, _, 1, 5) => Instruction::SetDelayTimerToRegisterValue(x),
            (0xF, _, 1, 8) => Instruction::SetSoundTimerToRegisterValue(x),
            (0xF, _, 1, 0xE) => Instruction::AddRegisterToIndexRegister(x),
            (0xF, _, 2, 9) => Instruction::SetIndexRegisterToSpriteForRegister(x),
            (0xF, _, 3, 3) => Instruction::StoreBinaryCodedDecimalAtIndexRegister(x),
            (0xF, _, 5, 5) => Instruction::DumpRegistersToMemoryAtIndexRegister(x),
            (0xF, _, 6, 5) => Instruction::LoadMemoryToRegistersAtIndexRegister(x),
            _ => return Err(Error::UnknownInstruction(opcode)),
        };

        Ok(instruction)
    }
}
