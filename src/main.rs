use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::process::ExitCode;
use std::thread::sleep;
use std::time::{Duration, Instant};

use log::{error, info};
use vip8::{Config, Interpreter, Result, StepResult};

fn main() -> ExitCode {
    env_logger::init();

    let config = match Config::from_args(env::args()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            eprintln!("\nExecution error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<()> {
    let mut interpreter = match config.seed {
        Some(seed) => Interpreter::with_seed(seed),
        None => Interpreter::new(),
    };

    let mut file = File::open(&config.rom)?;
    interpreter.load_program_from(&mut file)?;
    info!("Loaded {}", config.rom.display());

    let frame_duration = Duration::from_secs_f64(1.0 / f64::from(config.timer_hz));
    let mut sounding = false;

    'main_loop: loop {
        let frame_start = Instant::now();

        for _ in 0..config.instructions_per_tick() {
            match interpreter.step()? {
                StepResult::Continue => {}
                // No keyboard is attached; the program keeps polling until the next frame
                StepResult::WaitingForKey => break,
                StepResult::Halt => {
                    show(&interpreter)?;
                    println!("\nProgram finished. Exiting.");
                    break 'main_loop;
                }
            }
        }

        interpreter.tick_timers();

        if interpreter.sound_active() && !sounding {
            // A simple terminal beep for sound feedback
            print!("\x07");
            io::stdout().flush()?;
        }
        sounding = interpreter.sound_active();

        if interpreter.take_redraw() {
            show(&interpreter)?;
        }

        let elapsed = frame_start.elapsed();
        if let Some(sleep_time) = frame_duration.checked_sub(elapsed) {
            sleep(sleep_time);
        }
    }

    Ok(())
}

fn show(interpreter: &Interpreter) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "\x1B[2J\x1B[H{}", interpreter.framebuffer())?;
    stdout.flush()
}
