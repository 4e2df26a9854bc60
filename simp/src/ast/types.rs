//! Declared type tags

use serde::{Deserialize, Serialize};

/// Type tag written in front of a declaration (`num x = 1;`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeTag {
    /// Integer
    Num,
    /// Text
    Str,
    /// Character
    Chr,
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeTag::Num => write!(f, "num"),
            TypeTag::Str => write!(f, "str"),
            TypeTag::Chr => write!(f, "chr"),
        }
    }
}

/// Counter selector of a `name.c1` / `name.c2` access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// `c1`: read count
    Reads,
    /// `c2`: write count
    Writes,
}

impl Selector {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "c1" => Some(Selector::Reads),
            "c2" => Some(Selector::Writes),
            _ => None,
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Reads => write!(f, "c1"),
            Selector::Writes => write!(f, "c2"),
        }
    }
}
