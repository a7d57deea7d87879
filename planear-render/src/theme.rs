/// Escape sequences used to colour rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub add: &'static str,
    pub update: &'static str,
    pub delete: &'static str,
    pub ignore: &'static str,
    pub success: &'static str,
    pub failure: &'static str,
    pub reset: &'static str,
}

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const PURPLE: &str = "\x1b[35m";
const RESET: &str = "\x1b[0m";

impl Theme {
    /// ANSI terminal colours.
    pub const fn ansi() -> Self {
        Self {
            add: GREEN,
            update: YELLOW,
            delete: RED,
            ignore: PURPLE,
            success: GREEN,
            failure: RED,
            reset: RESET,
        }
    }

    /// No escape sequences at all, for files, logs, and non-tty output.
    pub const fn plain() -> Self {
        Self {
            add: "",
            update: "",
            delete: "",
            ignore: "",
            success: "",
            failure: "",
            reset: "",
        }
    }

    /// Picks [`Theme::ansi`] or [`Theme::plain`].
    pub const fn with_color(enabled: bool) -> Self {
        if enabled { Self::ansi() } else { Self::plain() }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::ansi()
    }
}
