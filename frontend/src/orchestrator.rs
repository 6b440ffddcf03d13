//! Owns the CPU-stepping thread and the console-input pump, and coordinates
//! orderly shutdown between them.
//!
//! Mirrors the original simulator's `MainThreadExecuteProgram` plus its
//! raw-mode `getchar()` loop in `Sources/Main.c`, rendered as two
//! `std::thread` actors sharing the register file's mutex and a single
//! atomic "quit" flag (spec section 5's concurrency model) instead of
//! `pthread_create` and a bare `volatile int`.

use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tgs_core::cpu::Cpu;
use tgs_core::log;
use tgs_core::log::{LogLevel, Logger};
use tgs_core::memory::ProgramMemory;
use tgs_core::registers::{self, SharedRegisterFile};

use crate::console::{self, KeyAction, RawMode};

fn run_cpu_loop(program_memory: ProgramMemory, regs: SharedRegisterFile, logger: Arc<Logger>, shutdown: Arc<AtomicBool>) {
    log!(logger, LogLevel::Debug, "CPU thread started");
    let mut cpu = Cpu::new();

    while !shutdown.load(Ordering::Relaxed) {
        let mut rf = regs.lock().unwrap();
        cpu.execute_next_instruction(&program_memory, &mut rf, &logger);
        rf.tick(&logger);
    }

    log!(logger, LogLevel::Debug, "CPU thread exited");
}

/// Read console bytes on the calling thread until Ctrl-C, dispatching each
/// one per spec section 6's interactive control rules.
fn pump_console(regs: &SharedRegisterFile, logger: &Logger, shutdown: &AtomicBool) {
    let _raw_mode = match RawMode::enable() {
        Ok(mode) => mode,
        Err(e) => {
            log!(logger, LogLevel::Error, "failed to enable raw console mode: {e}");
            return;
        }
    };

    let mut stdin = std::io::stdin();
    let mut byte = [0u8; 1];
    loop {
        match stdin.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => match console::classify(byte[0]) {
                KeyAction::Quit => break,
                KeyAction::Dump => {
                    let mut rf = regs.lock().unwrap();
                    rf.dump(logger);
                }
                KeyAction::Inject(data) => registers::receive_byte(regs, data, logger),
            },
            Err(e) => {
                log!(logger, LogLevel::Error, "console read failed: {e}");
                break;
            }
        }
    }

    shutdown.store(true, Ordering::Relaxed);
}

/// Run the emulator to completion: spawn the CPU thread, pump console input
/// on the calling thread until Ctrl-C, then join the CPU thread.
pub fn run(program_memory: ProgramMemory, regs: SharedRegisterFile, logger: Arc<Logger>) {
    let shutdown = Arc::new(AtomicBool::new(false));

    let cpu_thread = {
        let regs = Arc::clone(&regs);
        let logger = Arc::clone(&logger);
        let shutdown = Arc::clone(&shutdown);
        thread::spawn(move || run_cpu_loop(program_memory, regs, logger, shutdown))
    };

    pump_console(&regs, &logger, &shutdown);

    if cpu_thread.join().is_err() {
        log!(logger, LogLevel::Error, "CPU thread panicked");
    }

    log!(logger, LogLevel::Error, "Program successfully exited.");
}
