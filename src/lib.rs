pub mod config;
pub mod consts;
pub mod display;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod state;

pub use config::Config;
pub use display::Framebuffer;
pub use error::{Error, Result};
pub use interpreter::{Interpreter, StepResult};
pub use parser::Instruction;
pub use state::State;
