//! Reactions over species, with per-law validation and an explicit equality
//! protocol.

pub mod propensity;

use crate::diagnostics::Diagnostic;
use crate::models::species::{Species, SpeciesError};
use propensity::Propensity;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReactionError {
    #[error("reaction rate must be positive, got k={0}")]
    NonPositiveRate(f64),
    #[error("reverse reaction rate must be positive, got k_reverse={0}")]
    NonPositiveReverseRate(f64),
    #[error("only massaction propensities support a reverse rate, got {kind:?}")]
    ReversibleNonMassAction { kind: &'static str },
    #[error("{side} species and coefficients contain contradictory counts")]
    ContradictoryCoefficients { side: &'static str },
    #[error("{side} coefficient list has length {got}, expected {expected}")]
    CoefficientMismatch {
        side: &'static str,
        got: usize,
        expected: usize,
    },
    #[error(transparent)]
    Species(#[from] SpeciesError),
}

/// Outcome of comparing two reactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionComparison {
    Distinct,
    /// Same sides, rates, and propensity kind.
    Equal,
    /// Both reversible, each the other's reverse with swapped rates matching.
    EqualReversed,
    /// Both reversible and each the other's reverse, but the swapped rates
    /// differ. `PartialEq` still treats this as equal, with a warning.
    EqualReversedRateMismatch,
}

/// A reaction `sum_i n_i I_i --> sum_i m_i O_i` at rate `k`, optionally
/// reversible at rate `k_reverse`.
///
/// Each side stores distinct species in first-occurrence order with a
/// coefficient per species. A reverse rate is only valid under massaction
/// kinetics.
#[derive(Debug, Clone)]
pub struct Reaction {
    inputs: Vec<Species>,
    input_coefs: Vec<usize>,
    outputs: Vec<Species>,
    output_coefs: Vec<usize>,
    k: f64,
    k_reverse: Option<f64>,
    propensity: Propensity,
}

/// Law-agnostic export form of one reaction direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatReaction {
    pub inputs: Vec<String>,
    pub input_coefs: Vec<usize>,
    pub outputs: Vec<String>,
    pub output_coefs: Vec<usize>,
    pub rate: f64,
}

/// Deduplicates a side, preserving first-occurrence order. An explicit
/// coefficient list must match the deduplicated length; a list matching the
/// raw length when duplicates were collapsed contradicts the counts.
fn collapse_side(
    side: &'static str,
    raw: Vec<Species>,
    coefs: Option<Vec<usize>>,
) -> Result<(Vec<Species>, Vec<usize>), ReactionError> {
    let mut distinct: Vec<Species> = Vec::new();
    let mut counts: Vec<usize> = Vec::new();
    for species in &raw {
        match distinct.iter().position(|s| s == species) {
            Some(i) => counts[i] += 1,
            None => {
                distinct.push(species.clone());
                counts.push(1);
            }
        }
    }
    match coefs {
        None => Ok((distinct, counts)),
        Some(coefs) if coefs.len() == distinct.len() => Ok((distinct, coefs)),
        Some(coefs) if coefs.len() == raw.len() && distinct.len() != raw.len() => {
            Err(ReactionError::ContradictoryCoefficients { side })
        }
        Some(coefs) => Err(ReactionError::CoefficientMismatch {
            side,
            got: coefs.len(),
            expected: distinct.len(),
        }),
    }
}

impl Reaction {
    /// An irreversible massaction reaction.
    pub fn new(inputs: Vec<Species>, outputs: Vec<Species>, k: f64) -> Result<Self, ReactionError> {
        Self::with_coefficients(inputs, None, outputs, None, k, None, Propensity::MassAction)
    }

    /// A reversible massaction reaction.
    pub fn reversible(
        inputs: Vec<Species>,
        outputs: Vec<Species>,
        k: f64,
        k_reverse: f64,
    ) -> Result<Self, ReactionError> {
        Self::with_coefficients(
            inputs,
            None,
            outputs,
            None,
            k,
            Some(k_reverse),
            Propensity::MassAction,
        )
    }

    /// An irreversible reaction under an explicit kinetic law.
    pub fn with_propensity(
        inputs: Vec<Species>,
        outputs: Vec<Species>,
        k: f64,
        propensity: Propensity,
    ) -> Result<Self, ReactionError> {
        Self::with_coefficients(inputs, None, outputs, None, k, None, propensity)
    }

    /// Fully parameterized constructor the others delegate to.
    ///
    /// `None` coefficient lists are derived by counting duplicates in the raw
    /// side lists.
    pub fn with_coefficients(
        inputs: Vec<Species>,
        input_coefs: Option<Vec<usize>>,
        outputs: Vec<Species>,
        output_coefs: Option<Vec<usize>>,
        k: f64,
        k_reverse: Option<f64>,
        propensity: Propensity,
    ) -> Result<Self, ReactionError> {
        if inputs.is_empty() && outputs.is_empty() {
            tracing::warn!("{}", Diagnostic::EmptyReaction);
        }
        if k <= 0.0 {
            return Err(ReactionError::NonPositiveRate(k));
        }
        if let Some(k_reverse) = k_reverse {
            if k_reverse <= 0.0 {
                return Err(ReactionError::NonPositiveReverseRate(k_reverse));
            }
            if !propensity.is_mass_action() {
                return Err(ReactionError::ReversibleNonMassAction {
                    kind: propensity.kind(),
                });
            }
        }
        let (inputs, input_coefs) = collapse_side("input", inputs, input_coefs)?;
        let (outputs, output_coefs) = collapse_side("output", outputs, output_coefs)?;
        Ok(Self {
            inputs,
            input_coefs,
            outputs,
            output_coefs,
            k,
            k_reverse,
            propensity,
        })
    }

    pub fn inputs(&self) -> &[Species] {
        &self.inputs
    }

    pub fn input_coefs(&self) -> &[usize] {
        &self.input_coefs
    }

    pub fn outputs(&self) -> &[Species] {
        &self.outputs
    }

    pub fn output_coefs(&self) -> &[usize] {
        &self.output_coefs
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    pub fn k_reverse(&self) -> Option<f64> {
        self.k_reverse
    }

    pub fn is_reversible(&self) -> bool {
        self.k_reverse.is_some()
    }

    pub fn propensity(&self) -> &Propensity {
        &self.propensity
    }

    /// All species the reaction mentions, inputs then outputs, duplicates
    /// across sides included.
    pub fn species(&self) -> impl Iterator<Item = &Species> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    /// Multiset comparison of one side: same length and each (species,
    /// coefficient) pair of `a` present in `b`.
    fn side_equality(a: &[Species], a_coefs: &[usize], b: &[Species], b_coefs: &[usize]) -> bool {
        a.len() == b.len()
            && a.iter().zip(a_coefs).all(|(species, coef)| {
                b.iter()
                    .position(|s| s == species)
                    .is_some_and(|i| b_coefs[i] == *coef)
            })
    }

    /// The full equality protocol. Two reactions are equal when their sides,
    /// rates, and propensity kinds match; two reversible reactions also match
    /// when each is the other's reverse.
    pub fn compare(&self, other: &Reaction) -> ReactionComparison {
        let sides_equal = Self::side_equality(
            &self.inputs,
            &self.input_coefs,
            &other.inputs,
            &other.input_coefs,
        ) && Self::side_equality(
            &self.outputs,
            &self.output_coefs,
            &other.outputs,
            &other.output_coefs,
        );
        let rates_equal = self.k == other.k && self.k_reverse == other.k_reverse;
        let kinds_equal = self.propensity.kind() == other.propensity.kind();

        if sides_equal && rates_equal && kinds_equal {
            return ReactionComparison::Equal;
        }
        if sides_equal && kinds_equal {
            return ReactionComparison::Distinct;
        }
        if self.is_reversible() && other.is_reversible() {
            let reversed_equal = Self::side_equality(
                &self.inputs,
                &self.input_coefs,
                &other.outputs,
                &other.output_coefs,
            ) && Self::side_equality(
                &self.outputs,
                &self.output_coefs,
                &other.inputs,
                &other.input_coefs,
            );
            if reversed_equal {
                let swapped_rates = self.k_reverse == Some(other.k)
                    && other.k_reverse == Some(self.k);
                return if swapped_rates {
                    ReactionComparison::EqualReversed
                } else {
                    ReactionComparison::EqualReversedRateMismatch
                };
            }
        }
        ReactionComparison::Distinct
    }

    /// Substitutes `old` with `new` throughout inputs, outputs, and the
    /// kinetic-law parameters, returning a new reaction.
    pub fn replace_species(
        &self,
        old: &Species,
        new: &Species,
    ) -> Result<Reaction, ReactionError> {
        let mut inputs = Vec::with_capacity(self.inputs.len());
        for species in &self.inputs {
            inputs.push(species.replace_species(old, new)?);
        }
        let mut outputs = Vec::with_capacity(self.outputs.len());
        for species in &self.outputs {
            outputs.push(species.replace_species(old, new)?);
        }
        let propensity = self.propensity.replace_species(old, new)?;
        Self::with_coefficients(
            inputs,
            Some(self.input_coefs.clone()),
            outputs,
            Some(self.output_coefs.clone()),
            self.k,
            self.k_reverse,
            propensity,
        )
    }

    fn side_with_coefs(side: &[Species], coefs: &[usize]) -> Vec<(String, usize)> {
        side.iter()
            .zip(coefs)
            .map(|(species, coef)| (species.to_string(), *coef))
            .collect()
    }

    /// Textual rate law of this reaction (both directions when reversible).
    pub fn rate_expression(&self) -> String {
        self.propensity.rate_expression(
            self.k,
            self.k_reverse,
            &Self::side_with_coefs(&self.inputs, &self.input_coefs),
            &Self::side_with_coefs(&self.outputs, &self.output_coefs),
            false,
            true,
            true,
        )
    }

    /// Export form: one entry per direction, reversible reactions doubled
    /// with sides and rates swapped.
    pub fn flatten(&self) -> Vec<FlatReaction> {
        let input_names: Vec<String> = self.inputs.iter().map(Species::to_string).collect();
        let output_names: Vec<String> = self.outputs.iter().map(Species::to_string).collect();
        let forward = FlatReaction {
            inputs: input_names.clone(),
            input_coefs: self.input_coefs.clone(),
            outputs: output_names.clone(),
            output_coefs: self.output_coefs.clone(),
            rate: self.k,
        };
        match self.k_reverse {
            Some(k_reverse) => vec![
                forward,
                FlatReaction {
                    inputs: output_names,
                    input_coefs: self.output_coefs.clone(),
                    outputs: input_names,
                    output_coefs: self.input_coefs.clone(),
                    rate: k_reverse,
                },
            ],
            None => vec![forward],
        }
    }

    fn fmt_side(
        f: &mut fmt::Formatter<'_>,
        side: &[Species],
        coefs: &[usize],
    ) -> fmt::Result {
        for (i, (species, coef)) in side.iter().zip(coefs).enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            if *coef > 1 {
                write!(f, "{coef} {species}")?;
            } else {
                write!(f, "{species}")?;
            }
        }
        Ok(())
    }

    /// Human-readable form with pretty-printed species; `show_rates` appends
    /// the indented rate law.
    pub fn pretty_print(
        &self,
        show_rates: bool,
        show_material: bool,
        show_attributes: bool,
    ) -> String {
        let tab = " ".repeat(8);
        let render_side = |side: &[Species], coefs: &[usize]| {
            side.iter()
                .zip(coefs)
                .map(|(species, coef)| {
                    let body = species.pretty_print(show_material, show_attributes);
                    if *coef > 1 {
                        format!("{coef} {body}")
                    } else {
                        body
                    }
                })
                .collect::<Vec<_>>()
                .join(" + ")
        };
        let arrow = if self.is_reversible() { " <--> " } else { " --> " };
        let mut txt = format!(
            "{}{arrow}{}",
            render_side(&self.inputs, &self.input_coefs),
            render_side(&self.outputs, &self.output_coefs),
        );
        if show_rates {
            let rate_txt = self.propensity.rate_expression(
                self.k,
                self.k_reverse,
                &Self::side_with_coefs(&self.inputs, &self.input_coefs),
                &Self::side_with_coefs(&self.outputs, &self.output_coefs),
                true,
                show_material,
                show_attributes,
            );
            let rate_txt = rate_txt.replace(" k_r", &format!("\n{tab}k_r"));
            txt.push('\n');
            txt.push_str(&tab);
            txt.push_str(&rate_txt);
        }
        txt
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::fmt_side(f, &self.inputs, &self.input_coefs)?;
        if self.is_reversible() {
            write!(f, " <--> ")?;
        } else {
            write!(f, " --> ")?;
        }
        Self::fmt_side(f, &self.outputs, &self.output_coefs)
    }
}

/// Equality through [`Reaction::compare`]: everything but `Distinct` counts
/// as equal. The reversed-with-mismatched-rates case is accepted with a
/// warning.
impl PartialEq for Reaction {
    fn eq(&self, other: &Self) -> bool {
        match self.compare(other) {
            ReactionComparison::Distinct => false,
            ReactionComparison::EqualReversedRateMismatch => {
                let diag = Diagnostic::ReversedRateMismatch {
                    left: self.to_string(),
                    right: other.to_string(),
                };
                tracing::warn!("{diag}");
                true
            }
            _ => true,
        }
    }
}
