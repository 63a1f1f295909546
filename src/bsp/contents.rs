// src/bsp/contents.rs
use std::fmt;

/// What fills a region of the map. Stored in files as small negative codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Contents {
    Empty,
    Solid,
    Water,
    Slime,
    Lava,
    Sky,
    /// Any code this crate has no name for (currents, origin brushes, ...).
    Other(i32),
}

impl Contents {
    pub fn from_code(code: i32) -> Self {
        match code {
            -1 => Contents::Empty,
            -2 => Contents::Solid,
            -3 => Contents::Water,
            -4 => Contents::Slime,
            -5 => Contents::Lava,
            -6 => Contents::Sky,
            other => Contents::Other(other),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Contents::Empty => -1,
            Contents::Solid => -2,
            Contents::Water => -3,
            Contents::Slime => -4,
            Contents::Lava => -5,
            Contents::Sky => -6,
            Contents::Other(code) => code,
        }
    }

    pub fn is_solid(self) -> bool {
        self == Contents::Solid
    }

    pub fn is_empty(self) -> bool {
        self == Contents::Empty
    }
}

impl fmt::Display for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contents::Empty => write!(f, "empty"),
            Contents::Solid => write!(f, "solid"),
            Contents::Water => write!(f, "water"),
            Contents::Slime => write!(f, "slime"),
            Contents::Lava => write!(f, "lava"),
            Contents::Sky => write!(f, "sky"),
            Contents::Other(code) => write!(f, "contents({})", code),
        }
    }
}
