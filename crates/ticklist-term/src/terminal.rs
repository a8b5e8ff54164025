// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode capture, restore, and RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and the Windows console mode
// calls. These are the platform interfaces for terminal control; there
// is no safe alternative. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// The contract is deliberately small: `enable()` captures the current
// terminal configuration and switches to raw input, `restore()` puts the
// captured configuration back. A snapshot is opaque to callers; they only
// hand it back. Restoring without a snapshot does nothing, so "restore if
// we ever got into raw mode" needs no branching at the call site.
//
// [`RawGuard`] pairs the two calls. The checklist session suspends raw
// mode while it prompts for placeholder values and resumes it afterwards,
// and the guard makes sure whatever state it is in gets unwound on drop.
//
// A panic while raw would leave the user's shell without echo. The panic
// hook restores the last captured termios from a global backup before the
// original handler prints its message.

use std::fmt;
use std::io;
#[cfg(unix)]
use std::sync::Mutex;
use std::sync::Once;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    use std::io::IsTerminal;
    io::stdin().is_terminal()
}

// ─── Raw Mode Contract ──────────────────────────────────────────────────────

/// Capability to switch a terminal between raw and cooked input.
///
/// One implementation per platform ([`StdinMode`]); tests provide their
/// own. `enable` may be called again after `restore` and must return a
/// fresh snapshot each time.
pub trait RawMode {
    /// Opaque capture of the configuration in force before `enable`.
    type Snapshot;

    /// Capture the current configuration and switch to raw input.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal attributes cannot be read or set.
    fn enable(&mut self) -> io::Result<Self::Snapshot>;

    /// Reapply a configuration captured by [`enable`](Self::enable).
    ///
    /// `None` is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal attributes cannot be set.
    fn restore(&mut self, snapshot: Option<&Self::Snapshot>) -> io::Result<()>;
}

// ─── Snapshot ───────────────────────────────────────────────────────────────

/// The terminal configuration captured by [`StdinMode::enable`].
#[derive(Clone, Copy)]
pub struct ModeSnapshot {
    #[cfg(unix)]
    termios: libc::termios,

    #[cfg(windows)]
    console_mode: u32,
}

impl fmt::Debug for ModeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeSnapshot").finish_non_exhaustive()
    }
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of the original termios for panic recovery.
///
/// The snapshot normally lives inside a [`RawGuard`], which the panic hook
/// can't reach. This copy, behind a [`Mutex`], lets
/// the hook restore cooked mode without it.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
            }
        }
    }
}

#[cfg(unix)]
fn set_backup(termios: Option<libc::termios>) {
    if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
        *guard = termios;
    }
}

/// Panic hook guard — ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

// ─── StdinMode ──────────────────────────────────────────────────────────────

/// Raw mode control for the process's standard input.
///
/// On unix this is termios on `STDIN_FILENO`; on Windows it is the console
/// input mode of `STD_INPUT_HANDLE`. Other targets get a no-op so the
/// crate still builds.
#[derive(Debug, Default)]
pub struct StdinMode {
    _private: (),
}

impl StdinMode {
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(unix)]
impl RawMode for StdinMode {
    type Snapshot = ModeSnapshot;

    fn enable(&mut self) -> io::Result<ModeSnapshot> {
        use std::os::unix::io::AsRawFd;

        install_panic_hook();

        let fd = io::stdin().as_raw_fd();

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }
            let original = termios;

            // cfmakeraw equivalent: disable all line processing.
            termios.c_iflag &= !(libc::IGNBRK
                | libc::BRKINT
                | libc::PARMRK
                | libc::ISTRIP
                | libc::INLCR
                | libc::IGNCR
                | libc::ICRNL
                | libc::IXON);
            termios.c_oflag &= !libc::OPOST;
            termios.c_lflag &=
                !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
            termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
            termios.c_cflag |= libc::CS8;

            // VMIN=1, VTIME=0: read() blocks until at least 1 byte available.
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            set_backup(Some(original));
            Ok(ModeSnapshot { termios: original })
        }
    }

    fn restore(&mut self, snapshot: Option<&ModeSnapshot>) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        let Some(snapshot) = snapshot else {
            return Ok(());
        };
        let fd = io::stdin().as_raw_fd();

        unsafe {
            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const snapshot.termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        // Restored successfully, so the panic hook has nothing left to undo.
        set_backup(None);
        Ok(())
    }
}

#[cfg(windows)]
impl RawMode for StdinMode {
    type Snapshot = ModeSnapshot;

    fn enable(&mut self) -> io::Result<ModeSnapshot> {
        use windows_sys::Win32::System::Console::{
            ENABLE_ECHO_INPUT, ENABLE_LINE_INPUT, ENABLE_PROCESSED_INPUT,
            ENABLE_VIRTUAL_TERMINAL_INPUT, GetConsoleMode, GetStdHandle, STD_INPUT_HANDLE,
            SetConsoleMode,
        };

        install_panic_hook();

        unsafe {
            let handle = GetStdHandle(STD_INPUT_HANDLE);
            let mut original: u32 = 0;
            if GetConsoleMode(handle, &raw mut original) == 0 {
                return Err(io::Error::last_os_error());
            }

            let raw_mode = (original
                & !(ENABLE_ECHO_INPUT | ENABLE_LINE_INPUT | ENABLE_PROCESSED_INPUT))
                | ENABLE_VIRTUAL_TERMINAL_INPUT;

            if SetConsoleMode(handle, raw_mode) == 0 {
                return Err(io::Error::last_os_error());
            }

            Ok(ModeSnapshot {
                console_mode: original,
            })
        }
    }

    fn restore(&mut self, snapshot: Option<&ModeSnapshot>) -> io::Result<()> {
        use windows_sys::Win32::System::Console::{GetStdHandle, STD_INPUT_HANDLE, SetConsoleMode};

        let Some(snapshot) = snapshot else {
            return Ok(());
        };

        unsafe {
            let handle = GetStdHandle(STD_INPUT_HANDLE);
            if SetConsoleMode(handle, snapshot.console_mode) == 0 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok(())
    }
}

#[cfg(not(any(unix, windows)))]
impl RawMode for StdinMode {
    type Snapshot = ModeSnapshot;

    fn enable(&mut self) -> io::Result<ModeSnapshot> {
        install_panic_hook();
        Ok(ModeSnapshot {})
    }

    fn restore(&mut self, _snapshot: Option<&ModeSnapshot>) -> io::Result<()> {
        Ok(())
    }
}

// ─── RawGuard ───────────────────────────────────────────────────────────────

/// Scoped ownership of raw mode.
///
/// Holds the snapshot of the most recent successful [`enter`](Self::enter)
/// and restores it on [`leave`](Self::leave) or drop. Both calls are
/// idempotent, which is what lets the session suspend raw mode for a prompt
/// and resume it without tracking state of its own.
///
/// # Example
///
/// ```no_run
/// use ticklist_term::terminal::{RawGuard, StdinMode};
///
/// let mut guard = RawGuard::new(StdinMode::new());
/// guard.enter()?;
/// // ... read keys ...
/// guard.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct RawGuard<M: RawMode> {
    mode: M,
    snapshot: Option<M::Snapshot>,
}

impl<M: RawMode> RawGuard<M> {
    /// Wrap a mode controller. Does **not** enter raw mode.
    pub const fn new(mode: M) -> Self {
        Self {
            mode,
            snapshot: None,
        }
    }

    /// Whether raw mode is currently held.
    #[inline]
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        self.snapshot.is_some()
    }

    /// The wrapped controller.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> &M {
        &self.mode
    }

    /// Enter raw mode. No-op if already raw.
    ///
    /// # Errors
    ///
    /// Propagates the controller's error; the guard stays cooked.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.snapshot.is_some() {
            return Ok(());
        }
        self.snapshot = Some(self.mode.enable()?);
        Ok(())
    }

    /// Restore the captured configuration. No-op if not raw.
    ///
    /// # Errors
    ///
    /// Propagates the controller's error; the snapshot is kept so a later
    /// call (or drop) can try again.
    pub fn leave(&mut self) -> io::Result<()> {
        let snapshot = self.snapshot.take();
        if let Err(e) = self.mode.restore(snapshot.as_ref()) {
            self.snapshot = snapshot;
            return Err(e);
        }
        Ok(())
    }
}

impl<M: RawMode> Drop for RawGuard<M> {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
