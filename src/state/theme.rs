use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(()),
        }
    }
}

/// The stored choice (if any) and the OS preference it falls back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeState {
    pub explicit: Option<Theme>,
    pub os_prefers_dark: bool,
}

impl ThemeState {
    /// `stored` is the raw local-storage value; anything other than
    /// `light`/`dark` counts as no choice.
    pub fn new(stored: Option<&str>, os_prefers_dark: bool) -> Self {
        Self {
            explicit: stored.and_then(|s| s.parse().ok()),
            os_prefers_dark,
        }
    }

    pub fn effective(&self) -> Theme {
        self.explicit.unwrap_or(if self.os_prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        })
    }

    /// Flips the effective theme and records it as an explicit choice.
    pub fn toggle(&mut self) -> Theme {
        let next = self.effective().flipped();
        self.explicit = Some(next);
        next
    }

    /// Records an OS preference change. Returns the theme to repaint with,
    /// or `None` when an explicit choice masks the OS.
    pub fn os_changed(&mut self, prefers_dark: bool) -> Option<Theme> {
        self.os_prefers_dark = prefers_dark;
        match self.explicit {
            Some(_) => None,
            None => Some(self.effective()),
        }
    }
}
