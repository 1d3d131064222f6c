//! The three token kinds the controller mints and burns.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimal places shared by all three tokens.
pub const DECIMALS: u8 = 18;

/// Which balance an amount lives in.
///
/// `Super` is the unresolved box; `Alive` and `Dead` are the two mutually
/// exclusive results of an observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Super,
    Alive,
    Dead,
}

impl TokenKind {
    pub const ALL: [TokenKind; 3] = [TokenKind::Super, TokenKind::Alive, TokenKind::Dead];

    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Super => "QuantumCat",
            TokenKind::Alive => "AliveCat",
            TokenKind::Dead => "DeadCat",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TokenKind::Super => "QCAT",
            TokenKind::Alive => "ALIVECAT",
            TokenKind::Dead => "DEADCAT",
        }
    }

    pub fn decimals(&self) -> u8 {
        DECIMALS
    }

    /// Stable index, used by stores that keep per-kind arrays.
    pub fn index(&self) -> usize {
        match self {
            TokenKind::Super => 0,
            TokenKind::Alive => 1,
            TokenKind::Dead => 2,
        }
    }

    /// The observed kind for an outcome bit: 1 is ALIVE, 0 is DEAD.
    pub fn from_outcome_bit(alive: bool) -> Self {
        if alive {
            TokenKind::Alive
        } else {
            TokenKind::Dead
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for TokenKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "super" | "qcat" => Ok(TokenKind::Super),
            "alive" | "alivecat" => Ok(TokenKind::Alive),
            "dead" | "deadcat" => Ok(TokenKind::Dead),
            _ => Err(TypeError::UnknownToken(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_matches_deployment() {
        assert_eq!(TokenKind::Super.name(), "QuantumCat");
        assert_eq!(TokenKind::Super.symbol(), "QCAT");
        assert_eq!(TokenKind::Alive.name(), "AliveCat");
        assert_eq!(TokenKind::Alive.symbol(), "ALIVECAT");
        assert_eq!(TokenKind::Dead.name(), "DeadCat");
        assert_eq!(TokenKind::Dead.symbol(), "DEADCAT");
        for kind in TokenKind::ALL {
            assert_eq!(kind.decimals(), 18);
        }
    }

    #[test]
    fn indices_are_distinct() {
        let mut seen = [false; 3];
        for kind in TokenKind::ALL {
            assert!(!seen[kind.index()]);
            seen[kind.index()] = true;
        }
    }

    #[test]
    fn parses_names_and_symbols() {
        assert_eq!("ALIVECAT".parse::<TokenKind>().unwrap(), TokenKind::Alive);
        assert_eq!("dead".parse::<TokenKind>().unwrap(), TokenKind::Dead);
        assert_eq!("qcat".parse::<TokenKind>().unwrap(), TokenKind::Super);
        assert!("box".parse::<TokenKind>().is_err());
    }

    #[test]
    fn outcome_bit_mapping() {
        assert_eq!(TokenKind::from_outcome_bit(true), TokenKind::Alive);
        assert_eq!(TokenKind::from_outcome_bit(false), TokenKind::Dead);
    }
}
