//! Representation kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VsaError;

/// The closed set of vector representations.
///
/// A kind is chosen once per run and never mixed: every vector created for
/// a store shares the same kind and dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorKind {
    /// Dense `f32` coordinates, bound by circular convolution.
    #[default]
    Real,
    /// Dense complex coordinates, bound by element-wise multiplication.
    Complex,
    /// Packed bits, bound by XOR, superposed by weighted voting.
    Binary,
}

impl VectorKind {
    /// Returns the lower-case name used in configuration files.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            VectorKind::Real => "real",
            VectorKind::Complex => "complex",
            VectorKind::Binary => "binary",
        }
    }

    /// Returns the upper-case tag used in text-format store headers.
    #[must_use]
    pub fn header_tag(&self) -> &'static str {
        match self {
            VectorKind::Real => "REAL",
            VectorKind::Complex => "COMPLEX",
            VectorKind::Binary => "BINARY",
        }
    }
}

impl fmt::Display for VectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VectorKind {
    type Err = VsaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "real" => Ok(VectorKind::Real),
            "complex" => Ok(VectorKind::Complex),
            "binary" => Ok(VectorKind::Binary),
            other => Err(VsaError::UnsupportedRepresentation {
                operation: "parse",
                kind: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("REAL".parse::<VectorKind>().unwrap(), VectorKind::Real);
        assert_eq!("Complex".parse::<VectorKind>().unwrap(), VectorKind::Complex);
        assert_eq!(" binary ".parse::<VectorKind>().unwrap(), VectorKind::Binary);
    }

    #[test]
    fn test_parse_unknown_kind() {
        let err = "permutation".parse::<VectorKind>().unwrap_err();
        assert!(matches!(err, VsaError::UnsupportedRepresentation { .. }));
    }

    #[test]
    fn test_header_tag_round_trips() {
        for kind in [VectorKind::Real, VectorKind::Complex, VectorKind::Binary] {
            assert_eq!(kind.header_tag().parse::<VectorKind>().unwrap(), kind);
        }
    }
}
