use super::species::Species;
use crate::diagnostics::Diagnostic;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolymerError {
    #[error("position {position} is out of range for a polymer of length {len}")]
    PositionOutOfRange { position: usize, len: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown direction {0:?}, expected \"forward\", \"reverse\", or a strand number")]
pub struct ParseDirectionError(String);

/// Orientation of a monomer within a polymer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Reverse,
    /// Numbered strand for multi-stranded assemblies.
    Strand(u8),
}

impl Direction {
    /// The orientation after reversing the polymer. Strands 0 and 1 swap;
    /// higher strand numbers have no inversion rule and are kept as-is.
    pub fn inverted(self) -> Direction {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
            Direction::Strand(0) => Direction::Strand(1),
            Direction::Strand(1) => Direction::Strand(0),
            Direction::Strand(n) => {
                let diag = Diagnostic::UnknownDirectionInversion {
                    direction: Direction::Strand(n).to_string(),
                };
                warn!("{diag}");
                Direction::Strand(n)
            }
        }
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" | "fwd" => Ok(Direction::Forward),
            "reverse" | "rev" => Ok(Direction::Reverse),
            other => other
                .parse::<u8>()
                .map(Direction::Strand)
                .map_err(|_| ParseDirectionError(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Reverse => write!(f, "reverse"),
            Direction::Strand(n) => write!(f, "{n}"),
        }
    }
}

/// One slot of an ordered polymer.
///
/// A monomer may be empty (an unoccupied binding site), may carry a species
/// payload, and may carry an orientation. Its `position` is owned by the
/// containing polymer: it is `None` for a free-standing monomer and the
/// polymer's mutators are the only writers.
#[derive(Debug, Clone)]
pub struct Monomer {
    species: Option<Species>,
    direction: Option<Direction>,
    position: Option<usize>,
}

impl Monomer {
    /// An unoccupied site with no orientation.
    pub fn empty() -> Self {
        Self {
            species: None,
            direction: None,
            position: None,
        }
    }

    pub fn new(species: Species) -> Self {
        Self {
            species: Some(species),
            direction: None,
            position: None,
        }
    }

    pub fn with_direction(species: Species, direction: Direction) -> Self {
        Self {
            species: Some(species),
            direction: Some(direction),
            position: None,
        }
    }

    /// Builder form: same monomer with the given orientation.
    pub fn directed(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn species(&self) -> Option<&Species> {
        self.species.as_ref()
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Installs the monomer at a slot. A `Some` direction overrides the
    /// monomer's own; `None` keeps whatever it already carried.
    pub(crate) fn attach(&mut self, position: usize, direction: Option<Direction>) {
        self.position = Some(position);
        if direction.is_some() {
            self.direction = direction;
        }
    }

    /// Removes the monomer from its polymer, clearing both the position and
    /// the orientation (orientation is meaningless outside a polymer).
    pub(crate) fn detach(&mut self) {
        self.position = None;
        self.direction = None;
    }

    pub(crate) fn set_position(&mut self, position: usize) {
        self.position = Some(position);
    }

    pub(crate) fn invert_direction(&mut self) {
        self.direction = self.direction.map(Direction::inverted);
    }

    /// Renders the slot for in-polymer display; `highlight` wraps the text in
    /// parentheses to mark a binding site of interest.
    pub fn pretty_print(
        &self,
        show_material: bool,
        show_attributes: bool,
        highlight: bool,
    ) -> String {
        let mut txt = match &self.species {
            Some(species) => species.pretty_print(show_material, show_attributes),
            None => "<monomer>".to_string(),
        };
        if let Some(direction) = self.direction {
            txt.push('-');
            txt.push_str(&direction.to_string());
        }
        if highlight {
            format!("({txt})")
        } else {
            txt
        }
    }
}

impl From<Species> for Monomer {
    fn from(species: Species) -> Self {
        Monomer::new(species)
    }
}

impl fmt::Display for Monomer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mer_")?;
        match &self.species {
            Some(species) => write!(f, "{species}")?,
            None => write!(f, "empty")?,
        }
        if let Some(direction) = self.direction {
            write!(f, "_{direction}")?;
        }
        Ok(())
    }
}

impl PartialEq for Monomer {
    fn eq(&self, other: &Self) -> bool {
        self.species == other.species
            && self.direction == other.direction
            && self.position == other.position
    }
}

impl Eq for Monomer {}

impl Hash for Monomer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.species.hash(state);
        self.direction.hash(state);
        self.position.hash(state);
    }
}

/// An owned, indexed sequence of monomers.
///
/// The polymer is the sole writer of member positions: every structural
/// mutation renumbers or patches positions so that `members[i].position() ==
/// Some(i)` holds at all times.
#[derive(Debug, Clone, Default)]
pub struct OrderedPolymer {
    members: Vec<Monomer>,
}

impl OrderedPolymer {
    pub fn new(members: Vec<Monomer>) -> Self {
        let mut polymer = Self { members };
        polymer.renumber(0);
        polymer
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Monomer> {
        self.members.get(position)
    }

    pub fn members(&self) -> &[Monomer] {
        &self.members
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Monomer> {
        self.members.iter()
    }

    fn renumber(&mut self, from: usize) {
        for (i, member) in self.members.iter_mut().enumerate().skip(from) {
            member.set_position(i);
        }
    }

    /// Inserts a monomer at `position`, shifting later members right.
    /// `position == len` appends.
    pub fn insert(
        &mut self,
        position: usize,
        mut monomer: Monomer,
        direction: Option<Direction>,
    ) -> Result<(), PolymerError> {
        if position > self.members.len() {
            return Err(PolymerError::PositionOutOfRange {
                position,
                len: self.members.len(),
            });
        }
        monomer.attach(position, direction);
        self.members.insert(position, monomer);
        self.renumber(position + 1);
        Ok(())
    }

    pub fn append(&mut self, mut monomer: Monomer, direction: Option<Direction>) {
        monomer.attach(self.members.len(), direction);
        self.members.push(monomer);
    }

    /// Replaces the monomer at `position`, returning the detached previous
    /// occupant. When `direction` is `None` the incoming monomer keeps its
    /// own orientation.
    pub fn replace(
        &mut self,
        position: usize,
        mut monomer: Monomer,
        direction: Option<Direction>,
    ) -> Result<Monomer, PolymerError> {
        if position >= self.members.len() {
            return Err(PolymerError::PositionOutOfRange {
                position,
                len: self.members.len(),
            });
        }
        monomer.attach(position, direction);
        let mut old = std::mem::replace(&mut self.members[position], monomer);
        old.detach();
        Ok(old)
    }

    /// Removes and returns the monomer at `position`, shifting later members
    /// left.
    pub fn delpart(&mut self, position: usize) -> Result<Monomer, PolymerError> {
        if position >= self.members.len() {
            return Err(PolymerError::PositionOutOfRange {
                position,
                len: self.members.len(),
            });
        }
        let mut old = self.members.remove(position);
        old.detach();
        self.renumber(position);
        Ok(old)
    }

    /// Reverses the sequence, renumbering every slot and inverting every
    /// orientation.
    pub fn reverse(&mut self) {
        self.members.reverse();
        for (i, member) in self.members.iter_mut().enumerate() {
            member.set_position(i);
            member.invert_direction();
        }
    }

    pub fn contains(&self, item: &Species) -> bool {
        self.members.iter().any(|member| {
            member
                .species()
                .is_some_and(|species| species == item || species.contains(item))
        })
    }

    /// Renders `poly{a,b,c}`, with the member at `highlight` parenthesized.
    pub fn pretty_print(
        &self,
        show_material: bool,
        show_attributes: bool,
        highlight: Option<usize>,
    ) -> String {
        let rendered: Vec<String> = self
            .members
            .iter()
            .enumerate()
            .map(|(i, member)| {
                member.pretty_print(show_material, show_attributes, highlight == Some(i))
            })
            .collect();
        format!("poly{{{}}}", rendered.join(","))
    }
}

impl fmt::Display for OrderedPolymer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "polymer(")?;
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{member}")?;
        }
        write!(f, ")")
    }
}

impl PartialEq for OrderedPolymer {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl Eq for OrderedPolymer {}

impl Hash for OrderedPolymer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.members.hash(state);
    }
}
