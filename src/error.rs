use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not read program: {0}")]
    Io(#[from] std::io::Error),
    #[error("program is {size} bytes, at most {max} fit in memory")]
    RomTooLarge { size: usize, max: usize },
    #[error("unknown instruction {0:#06X}")]
    UnknownInstruction(u16),
    #[error("call stack overflow")]
    StackOverflow,
    #[error("return with an empty call stack")]
    StackUnderflow,
    #[error("program counter out of bounds: {0:#06X}")]
    OutOfBounds(u16),
    #[error("no such key: {0:#X}")]
    InvalidKey(u8),
    #[error("{0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
