//! Per-platform mechanism table

use crate::platform::Platform;
use std::fmt;

/// Abstract power-management action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Shutdown,
    Sleep,
    Lock,
}

impl Action {
    /// Capitalised name, used in "not supported" messages
    pub fn title(&self) -> &'static str {
        match self {
            Action::Shutdown => "Shutdown",
            Action::Sleep => "Sleep",
            Action::Lock => "Lock",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Action::Shutdown => "System will shutdown in 1 minute",
            Action::Sleep => "System going to sleep",
            Action::Lock => "System locked",
        }
    }

    /// Message reported when every mechanism in a fallback chain failed
    pub fn exhausted_message(&self) -> String {
        match self {
            Action::Lock => "No suitable lock command found".into(),
            _ => format!("Failed to execute {} command", self),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shutdown => write!(f, "shutdown"),
            Action::Sleep => write!(f, "sleep"),
            Action::Lock => write!(f, "lock"),
        }
    }
}

/// One external program invocation; succeeds iff it exits cleanly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mechanism {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl Mechanism {
    pub const fn new(program: &'static str, args: &'static [&'static str]) -> Self {
        Self { program, args }
    }
}

impl fmt::Display for Mechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

const WINDOWS_SHUTDOWN: &[Mechanism] = &[Mechanism::new("shutdown", &["/s", "/t", "5"])];
const WINDOWS_SLEEP: &[Mechanism] = &[Mechanism::new(
    "rundll32.exe",
    &["powrprof.dll,SetSuspendState", "0,1,0"],
)];
const WINDOWS_LOCK: &[Mechanism] = &[Mechanism::new(
    "rundll32.exe",
    &["user32.dll,LockWorkStation"],
)];

const MACOS_SHUTDOWN: &[Mechanism] = &[Mechanism::new("sudo", &["shutdown", "-h", "+1"])];
const MACOS_SLEEP: &[Mechanism] = &[Mechanism::new("pmset", &["sleepnow"])];
const MACOS_LOCK: &[Mechanism] = &[Mechanism::new(
    "/System/Library/CoreServices/Menu Extras/User.menu/Contents/Resources/CGSession",
    &["-suspend"],
)];

const LINUX_SHUTDOWN: &[Mechanism] = &[Mechanism::new("shutdown", &["-h", "+1"])];
const LINUX_SLEEP: &[Mechanism] = &[
    Mechanism::new("systemctl", &["suspend"]),
    Mechanism::new("pm-suspend", &[]),
];
// Desktop session, generic screensaver, display manager, then logind.
const LINUX_LOCK: &[Mechanism] = &[
    Mechanism::new("gnome-screensaver-command", &["--lock"]),
    Mechanism::new("xdg-screensaver", &["lock"]),
    Mechanism::new("dm-tool", &["lock"]),
    Mechanism::new("loginctl", &["lock-session"]),
];

/// Ordered candidates for an action, or `None` if the platform has none
pub fn mechanisms_for(platform: &Platform, action: Action) -> Option<&'static [Mechanism]> {
    let table = match (platform, action) {
        (Platform::Windows, Action::Shutdown) => WINDOWS_SHUTDOWN,
        (Platform::Windows, Action::Sleep) => WINDOWS_SLEEP,
        (Platform::Windows, Action::Lock) => WINDOWS_LOCK,
        (Platform::MacOs, Action::Shutdown) => MACOS_SHUTDOWN,
        (Platform::MacOs, Action::Sleep) => MACOS_SLEEP,
        (Platform::MacOs, Action::Lock) => MACOS_LOCK,
        (Platform::Linux, Action::Shutdown) => LINUX_SHUTDOWN,
        (Platform::Linux, Action::Sleep) => LINUX_SLEEP,
        (Platform::Linux, Action::Lock) => LINUX_LOCK,
        (Platform::Unsupported(_), _) => return None,
    };
    Some(table)
}
