use crate::consts::{TARGET_IPS, TIMER_HZ};
use crate::error::{Error, Result};
use std::path::PathBuf;

/// Settings for the terminal runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub rom: PathBuf,
    pub instructions_per_second: u32,
    pub timer_hz: u32,
    pub seed: Option<u64>,
}

impl Config {
    pub fn new(rom: impl Into<PathBuf>) -> Self {
        Config {
            rom: rom.into(),
            instructions_per_second: TARGET_IPS,
            timer_hz: TIMER_HZ,
            seed: None,
        }
    }

    /// Parses `<rom> [--ips N] [--seed N]`. The first item is the program name.
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut args = args.into_iter();
        let program = args.next().unwrap_or_else(|| "vip8".to_string());
        let usage = || Error::Usage(format!("Usage: {} <rom> [--ips N] [--seed N]", program));

        let mut rom = None;
        let mut instructions_per_second = TARGET_IPS;
        let mut seed = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--ips" => {
                    instructions_per_second = parse_value(&arg, args.next())?;
                    if instructions_per_second == 0 {
                        return Err(Error::Usage("--ips must be greater than 0".to_string()));
                    }
                }
                "--seed" => seed = Some(parse_value(&arg, args.next())?),
                flag if flag.starts_with("--") => {
                    return Err(Error::Usage(format!("unknown option {}", flag)));
                }
                _ if rom.is_none() => rom = Some(PathBuf::from(arg)),
                _ => return Err(usage()),
            }
        }

        let rom = rom.ok_or_else(usage)?;
        Ok(Config {
            instructions_per_second,
            seed,
            ..Config::new(rom)
        })
    }

    /// How many `step` calls fit in one timer tick, at least one.
    pub fn instructions_per_tick(&self) -> u32 {
        (self.instructions_per_second / self.timer_hz).max(1)
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T> {
    let value = value.ok_or_else(|| Error::Usage(format!("{} needs a value", flag)))?;
    value
        .parse()
        .map_err(|_| Error::Usage(format!("invalid value for {}: {}", flag, value)))
}
