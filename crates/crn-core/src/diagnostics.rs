//! Structured, non-fatal findings.
//!
//! Validation keeps going when it meets one of these; the finding is stored
//! (or returned) as a value and mirrored to `tracing::warn!`, so callers can
//! assert on diagnostics instead of scraping log output.

use serde::Serialize;
use std::fmt;

/// A non-fatal finding produced while validating a network or comparing
/// reactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Diagnostic {
    /// The same species appeared more than once in a species list; the first
    /// occurrence was kept.
    DuplicateSpecies { species: String },
    /// A reaction uses a species that is not in the network's species list.
    UndeclaredSpecies { reaction: String, species: String },
    /// A reaction with no inputs and no outputs.
    EmptyReaction,
    /// Two reversible reactions matched as each other's reverse, but their
    /// swapped rate constants differ.
    ReversedRateMismatch { left: String, right: String },
    /// A polymer was reversed while containing a direction with no inversion
    /// rule; the direction was kept unchanged.
    UnknownDirectionInversion { direction: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DuplicateSpecies { species } => {
                write!(f, "duplicate species {species:?}, keeping the first occurrence")
            }
            Diagnostic::UndeclaredSpecies { reaction, species } => {
                write!(
                    f,
                    "reaction {reaction:?} uses species {species:?} which is not in the species list"
                )
            }
            Diagnostic::EmptyReaction => write!(f, "reaction has no inputs and no outputs"),
            Diagnostic::ReversedRateMismatch { left, right } => {
                write!(
                    f,
                    "{left:?} and {right:?} are each other's reverse but their swapped rates differ"
                )
            }
            Diagnostic::UnknownDirectionInversion { direction } => {
                write!(f, "no inversion rule for direction {direction:?}, keeping it")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_values() {
        let d = Diagnostic::DuplicateSpecies {
            species: "dna_g1".to_string(),
        };
        assert!(d.to_string().contains("dna_g1"));

        let d = Diagnostic::UndeclaredSpecies {
            reaction: "a --> b".to_string(),
            species: "b".to_string(),
        };
        let txt = d.to_string();
        assert!(txt.contains("a --> b") && txt.contains('b'));
    }
}
