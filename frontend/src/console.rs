//! Raw-mode console toggling via `libc` termios calls.
//!
//! The original simulator shells out to `stty raw -echo` / `stty cooked
//! echo`; this expansion calls `tcgetattr`/`tcsetattr` directly so the
//! terminal is restored deterministically even if the process is killed
//! mid-run by something other than the handled Ctrl-C path (the `Drop` impl
//! below runs on any unwind, not just the orderly-shutdown one).

use std::io;
use std::mem::MaybeUninit;
use std::os::unix::io::{AsRawFd, RawFd};

/// Puts stdin into raw, unechoed mode for the lifetime of the value and
/// restores the prior terminal settings when dropped.
pub struct RawMode {
    fd: RawFd,
    original: libc::termios,
}

impl RawMode {
    pub fn enable() -> io::Result<Self> {
        let fd = io::stdin().as_raw_fd();
        let original = termios_get(fd)?;

        let mut raw = original;
        unsafe {
            libc::cfmakeraw(&mut raw);
        }
        termios_set(fd, &raw)?;

        Ok(Self { fd, original })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = termios_set(self.fd, &self.original);
    }
}

fn termios_get(fd: RawFd) -> io::Result<libc::termios> {
    let mut term = MaybeUninit::<libc::termios>::uninit();
    let result = unsafe { libc::tcgetattr(fd, term.as_mut_ptr()) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(unsafe { term.assume_init() })
}

fn termios_set(fd: RawFd, term: &libc::termios) -> io::Result<()> {
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, term) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// The three dispositions a received byte can have, per spec section 6's
/// interactive control rules.
pub enum KeyAction {
    Quit,
    Dump,
    Inject(u8),
}

const CTRL_C: u8 = 0x03;
const CTRL_D: u8 = 0x04;

pub fn classify(byte: u8) -> KeyAction {
    match byte {
        CTRL_C => KeyAction::Quit,
        CTRL_D => KeyAction::Dump,
        other => KeyAction::Inject(other),
    }
}
