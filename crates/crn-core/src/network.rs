//! The network container: an ordered species list plus a reaction list, with
//! validation diagnostics and simulator-facing accessors.

use crate::diagnostics::Diagnostic;
use crate::models::species::{Species, SpeciesError};
use crate::reaction::{FlatReaction, Reaction, ReactionError};
use nalgebra::DVector;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NetworkError {
    #[error(transparent)]
    Species(#[from] SpeciesError),
    #[error(transparent)]
    Reaction(#[from] ReactionError),
}

/// A chemical reaction network: distinct species in declaration order and
/// the reactions over them.
///
/// Construction never fails; findings such as duplicate or undeclared
/// species are recorded as [`Diagnostic`] values (and mirrored to
/// `tracing::warn!`) instead of aborting. The name→index cache is rebuilt on
/// every mutation.
#[derive(Debug, Clone)]
pub struct ChemicalReactionNetwork {
    species: Vec<Species>,
    reactions: Vec<Reaction>,
    species_index: HashMap<String, usize>,
    diagnostics: Vec<Diagnostic>,
}

impl ChemicalReactionNetwork {
    pub fn new(species: Vec<Species>, reactions: Vec<Reaction>) -> Self {
        let mut network = Self {
            species,
            reactions,
            species_index: HashMap::new(),
            diagnostics: Vec::new(),
        };
        network.validate();
        network
    }

    /// Deduplicates the species list (first occurrence wins), records
    /// diagnostics for every finding, and rebuilds the index cache.
    fn validate(&mut self) {
        self.diagnostics.clear();

        let mut checked: Vec<Species> = Vec::new();
        for species in self.species.drain(..) {
            if checked.contains(&species) {
                let diag = Diagnostic::DuplicateSpecies {
                    species: species.to_string(),
                };
                tracing::warn!("{diag}");
                self.diagnostics.push(diag);
            } else {
                checked.push(species);
            }
        }
        self.species = checked;

        for reaction in &self.reactions {
            if reaction.inputs().is_empty() && reaction.outputs().is_empty() {
                let diag = Diagnostic::EmptyReaction;
                tracing::warn!("{diag}");
                self.diagnostics.push(diag);
            }
            for species in reaction.species() {
                if !self.species.contains(species) {
                    let diag = Diagnostic::UndeclaredSpecies {
                        reaction: reaction.to_string(),
                        species: species.to_string(),
                    };
                    tracing::warn!("{diag}");
                    self.diagnostics.push(diag);
                }
            }
        }

        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        self.species_index = self
            .species
            .iter()
            .enumerate()
            .map(|(i, species)| (species.to_string(), i))
            .collect();
    }

    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    /// Findings from the most recent validation.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn add_species(&mut self, species: Vec<Species>) {
        self.species.extend(species);
        self.validate();
    }

    pub fn add_reactions(&mut self, reactions: Vec<Reaction>) {
        self.reactions.extend(reactions);
        self.validate();
    }

    /// Position of a species in declaration order.
    pub fn species_index(&self, species: &Species) -> Option<usize> {
        self.species_index.get(&species.to_string()).copied()
    }

    /// Initial-state vector aligned to species order; species absent from
    /// the map default to zero.
    pub fn initial_condition_vector(&self, initial: &HashMap<Species, f64>) -> DVector<f64> {
        DVector::from_iterator(
            self.species.len(),
            self.species
                .iter()
                .map(|species| initial.get(species).copied().unwrap_or(0.0)),
        )
    }

    /// Top-level species equal to `target` or directly containing it as a
    /// member (one level, non-recursive).
    pub fn get_all_species_containing(&self, target: &Species) -> Vec<&Species> {
        self.species
            .iter()
            .filter(|species| *species == target || species.has_direct_member(target))
            .collect()
    }

    pub fn get_all_species_containing_as_strings(&self, target: &Species) -> Vec<String> {
        self.get_all_species_containing(target)
            .into_iter()
            .map(Species::to_string)
            .collect()
    }

    /// Substitutes `old` with `new` throughout the species list and every
    /// reaction, returning a new network. The original is untouched.
    pub fn replace_species(
        &self,
        old: &Species,
        new: &Species,
    ) -> Result<ChemicalReactionNetwork, NetworkError> {
        let mut species = Vec::with_capacity(self.species.len());
        for s in &self.species {
            species.push(s.replace_species(old, new)?);
        }
        let mut reactions = Vec::with_capacity(self.reactions.len());
        for reaction in &self.reactions {
            reactions.push(reaction.replace_species(old, new)?);
        }
        Ok(Self::new(species, reactions))
    }

    /// Law-agnostic export form: canonical species names plus one
    /// [`FlatReaction`] per reaction direction.
    pub fn flatten(&self) -> (Vec<String>, Vec<FlatReaction>) {
        let species = self.species.iter().map(Species::to_string).collect();
        let reactions = self
            .reactions
            .iter()
            .flat_map(Reaction::flatten)
            .collect();
        (species, reactions)
    }

    /// Numbered, human-readable listing of the species and reactions.
    pub fn pretty_print(
        &self,
        show_rates: bool,
        show_material: bool,
        show_attributes: bool,
    ) -> String {
        let species: Vec<String> = self
            .species
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{i}. {}", s.pretty_print(show_material, show_attributes)))
            .collect();
        let mut txt = format!(
            "Species ({}) = {{{}}}\n",
            self.species.len(),
            species.join(", ")
        );
        txt.push_str(&format!("Reactions ({}) = [\n", self.reactions.len()));
        for (i, reaction) in self.reactions.iter().enumerate() {
            txt.push_str(&format!(
                "{i}. {}\n",
                reaction.pretty_print(show_rates, show_material, show_attributes)
            ));
        }
        txt.push(']');
        txt
    }
}

impl fmt::Display for ChemicalReactionNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Species = ")?;
        for (i, species) in self.species.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{species}")?;
        }
        writeln!(f)?;
        writeln!(f, "Reactions = [")?;
        for reaction in &self.reactions {
            writeln!(f, "\t{reaction}")?;
        }
        write!(f, "]")
    }
}
