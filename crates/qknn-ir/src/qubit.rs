//! Qubit and classical bit types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a qubit within a circuit.
///
/// The id is also the qubit's bit position in a simulated basis-state index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// Unique identifier for a classical bit within a circuit.
///
/// The id is also the bit's position in a measured bitstring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}

/// Position of a bit inside a named register.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegisterSlot {
    /// Register name.
    pub register: String,
    /// Index within the register.
    pub index: u32,
}

impl fmt::Display for RegisterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.register, self.index)
    }
}

/// A quantum bit with optional register membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Qubit {
    /// The unique identifier.
    pub id: QubitId,
    /// Register membership, if any.
    pub slot: Option<RegisterSlot>,
}

impl Qubit {
    /// Create a free-standing qubit.
    pub fn new(id: QubitId) -> Self {
        Self { id, slot: None }
    }

    /// Create a qubit that belongs to a register.
    pub fn with_register(id: QubitId, register: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            slot: Some(RegisterSlot {
                register: register.into(),
                index,
            }),
        }
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.slot {
            Some(slot) => slot.fmt(f),
            None => self.id.fmt(f),
        }
    }
}

/// A classical bit with optional register membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clbit {
    /// The unique identifier.
    pub id: ClbitId,
    /// Register membership, if any.
    pub slot: Option<RegisterSlot>,
}

impl Clbit {
    /// Create a free-standing classical bit.
    pub fn new(id: ClbitId) -> Self {
        Self { id, slot: None }
    }

    /// Create a classical bit that belongs to a register.
    pub fn with_register(id: ClbitId, register: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            slot: Some(RegisterSlot {
                register: register.into(),
                index,
            }),
        }
    }
}

impl fmt::Display for Clbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.slot {
            Some(slot) => slot.fmt(f),
            None => self.id.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        assert_eq!(Qubit::new(QubitId(3)).to_string(), "q3");
        assert_eq!(
            Qubit::with_register(QubitId(1), "control_qubit", 0).to_string(),
            "control_qubit[0]"
        );
    }

    #[test]
    fn test_clbit_display() {
        assert_eq!(Clbit::new(ClbitId(0)).to_string(), "c0");
        assert_eq!(
            Clbit::with_register(ClbitId(2), "meas_comp_basis", 1).to_string(),
            "meas_comp_basis[1]"
        );
    }
}
