use super::complex::{ComplexSpecies, OrderedComplexSpecies};
use super::polymer_species::OrderedPolymerSpecies;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpeciesError {
    #[error("species name {0:?} must consist of letters, numbers, or underscores")]
    InvalidName(String),
    #[error("species name {0:?} starts with a number and therefore requires a material type")]
    NumericLeadingName(String),
    #[error("material type {0:?} must be alpha-numeric and start with a letter")]
    InvalidMaterialType(String),
    #[error("attribute {0:?} must be a non-empty alpha-numeric string")]
    InvalidAttribute(String),
    #[error("a complex requires 2 or more member species")]
    TooFewMembers,
}

pub(crate) fn check_name(name: &str) -> Result<(), SpeciesError> {
    let mut stripped = name.chars().filter(|c| *c != '_').peekable();
    if stripped.peek().is_none() {
        return Err(SpeciesError::InvalidName(name.to_string()));
    }
    if stripped.all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(SpeciesError::InvalidName(name.to_string()))
    }
}

pub(crate) fn check_material_type(material_type: &str, name: &str) -> Result<(), SpeciesError> {
    if material_type.is_empty() {
        // A bare numeric name would be ambiguous in canonical strings.
        if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            return Err(SpeciesError::NumericLeadingName(name.to_string()));
        }
        return Ok(());
    }
    let mut stripped = material_type.chars().filter(|c| *c != '_');
    match stripped.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            if stripped.all(|c| c.is_ascii_alphanumeric()) {
                Ok(())
            } else {
                Err(SpeciesError::InvalidMaterialType(material_type.to_string()))
            }
        }
        _ => Err(SpeciesError::InvalidMaterialType(material_type.to_string())),
    }
}

pub(crate) fn check_attribute(attribute: &str) -> Result<(), SpeciesError> {
    if attribute.is_empty() || !attribute.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(SpeciesError::InvalidAttribute(attribute.to_string()));
    }
    Ok(())
}

pub(crate) fn attribute_set_eq(a: &[String], b: &[String]) -> bool {
    a.len() == b.len() && a.iter().all(|x| b.contains(x))
}

pub(crate) fn hash_identity<H: Hasher>(
    name: &str,
    material_type: &str,
    attributes: &[String],
    state: &mut H,
) {
    material_type.hash(state);
    name.hash(state);
    let mut attrs: Vec<&str> = attributes.iter().map(String::as_str).collect();
    attrs.sort_unstable();
    attrs.hash(state);
}

pub(crate) fn fmt_canonical(
    name: &str,
    material_type: &str,
    attributes: &[String],
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    if !material_type.is_empty() {
        write!(f, "{material_type}_")?;
    }
    write!(f, "{name}")?;
    for attribute in attributes {
        write!(f, "_{attribute}")?;
    }
    Ok(())
}

pub(crate) fn pretty_identity(
    name: &str,
    material_type: &str,
    attributes: &[String],
    show_material: bool,
    show_attributes: bool,
) -> String {
    let show_material = show_material && !material_type.is_empty();
    let mut txt = String::new();
    if show_material {
        txt.push_str(material_type);
        txt.push('[');
    }
    txt.push_str(name);
    if show_attributes && !attributes.is_empty() {
        txt.push('(');
        txt.push_str(&attributes.join(", "));
        txt.push(')');
    }
    if show_material {
        txt.push(']');
    }
    txt
}

/// An atomic named chemical identity: name, material type, and attributes.
///
/// Equality and hashing consider only the `(material_type, name, attribute
/// set)` triple; attribute insertion order is preserved for display but does
/// not affect identity.
#[derive(Debug, Clone)]
pub struct SimpleSpecies {
    name: String,
    material_type: String,
    attributes: Vec<String>,
}

impl SimpleSpecies {
    /// Creates a species with an empty material type.
    ///
    /// # Errors
    ///
    /// Returns `SpeciesError` if the name is not alphanumeric/underscore or
    /// starts with a digit (a digit-leading name requires a material type).
    pub fn new(name: &str) -> Result<Self, SpeciesError> {
        Self::with_material(name, "")
    }

    /// Creates a species with an explicit material type (e.g. "dna", "protein").
    pub fn with_material(name: &str, material_type: &str) -> Result<Self, SpeciesError> {
        check_name(name)?;
        check_material_type(material_type, name)?;
        Ok(Self {
            name: name.to_string(),
            material_type: material_type.to_string(),
            attributes: Vec::new(),
        })
    }

    /// Creates a species with a material type and an initial attribute list.
    pub fn with_attributes(
        name: &str,
        material_type: &str,
        attributes: &[&str],
    ) -> Result<Self, SpeciesError> {
        let mut species = Self::with_material(name, material_type)?;
        for attribute in attributes {
            species.add_attribute(attribute)?;
        }
        Ok(species)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn material_type(&self) -> &str {
        &self.material_type
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Appends an attribute, preserving insertion order and ignoring duplicates.
    pub fn add_attribute(&mut self, attribute: &str) -> Result<(), SpeciesError> {
        check_attribute(attribute)?;
        if !self.attributes.iter().any(|a| a == attribute) {
            self.attributes.push(attribute.to_string());
        }
        Ok(())
    }

    pub(crate) fn remove_attribute(&mut self, attribute: &str) {
        self.attributes.retain(|a| a != attribute);
    }

    /// Renders the human-readable form, `material[name(attr, attr)]`.
    pub fn pretty_print(&self, show_material: bool, show_attributes: bool) -> String {
        pretty_identity(
            &self.name,
            &self.material_type,
            &self.attributes,
            show_material,
            show_attributes,
        )
    }
}

impl fmt::Display for SimpleSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_canonical(&self.name, &self.material_type, &self.attributes, f)
    }
}

impl PartialEq for SimpleSpecies {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.material_type == other.material_type
            && attribute_set_eq(&self.attributes, &other.attributes)
    }
}

impl Eq for SimpleSpecies {}

impl Hash for SimpleSpecies {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_identity(&self.name, &self.material_type, &self.attributes, state);
    }
}

/// The closed set of entity kinds a reaction network deals in.
///
/// All variants share one capability set — canonical name, pretty printing,
/// containment, and substitution — and one identity rule: two species are
/// equal iff their `(material_type, name, attribute set)` triples match,
/// regardless of variant. Composite variants derive their names so that this
/// rule makes construction order irrelevant exactly where it should be.
#[derive(Debug, Clone)]
pub enum Species {
    Simple(SimpleSpecies),
    Complex(ComplexSpecies),
    OrderedComplex(OrderedComplexSpecies),
    Polymer(OrderedPolymerSpecies),
}

impl Species {
    /// Shorthand for a simple species with an empty material type.
    pub fn simple(name: &str) -> Result<Self, SpeciesError> {
        Ok(Species::Simple(SimpleSpecies::new(name)?))
    }

    /// Shorthand for a simple species with a material type.
    pub fn with_material(name: &str, material_type: &str) -> Result<Self, SpeciesError> {
        Ok(Species::Simple(SimpleSpecies::with_material(
            name,
            material_type,
        )?))
    }

    pub fn name(&self) -> &str {
        match self {
            Species::Simple(s) => s.name(),
            Species::Complex(c) => c.name(),
            Species::OrderedComplex(c) => c.name(),
            Species::Polymer(p) => p.name(),
        }
    }

    pub fn material_type(&self) -> &str {
        match self {
            Species::Simple(s) => s.material_type(),
            Species::Complex(c) => c.material_type(),
            Species::OrderedComplex(c) => c.material_type(),
            Species::Polymer(p) => p.material_type(),
        }
    }

    pub fn attributes(&self) -> &[String] {
        match self {
            Species::Simple(s) => s.attributes(),
            Species::Complex(c) => c.attributes(),
            Species::OrderedComplex(c) => c.attributes(),
            Species::Polymer(p) => p.attributes(),
        }
    }

    /// True for every composite variant (complexes and polymers).
    pub fn is_complex_kind(&self) -> bool {
        !matches!(self, Species::Simple(_))
    }

    pub fn pretty_print(&self, show_material: bool, show_attributes: bool) -> String {
        match self {
            Species::Simple(s) => s.pretty_print(show_material, show_attributes),
            Species::Complex(c) => c.pretty_print(show_material, show_attributes),
            Species::OrderedComplex(c) => c.pretty_print(show_material, show_attributes),
            Species::Polymer(p) => p.pretty_print(show_material, show_attributes),
        }
    }

    /// Recursive containment: equality with a direct member, or presence
    /// inside any composite member.
    pub fn contains(&self, item: &Species) -> bool {
        match self {
            Species::Simple(_) => self == item,
            Species::Complex(c) => c.contains(item),
            Species::OrderedComplex(c) => c.contains(item),
            Species::Polymer(p) => p.contains(item),
        }
    }

    /// Membership one level down only: `item` equals a direct member.
    pub fn has_direct_member(&self, item: &Species) -> bool {
        match self {
            Species::Simple(_) => false,
            Species::Complex(c) => c.members().contains(item),
            Species::OrderedComplex(c) => c.members().contains(item),
            Species::Polymer(p) => p
                .polymer()
                .iter()
                .any(|m| m.species().is_some_and(|s| s == item)),
        }
    }

    /// Substitutes `old` with `new` throughout this species, recursing into
    /// composite members, and returns the rebuilt value.
    pub fn replace_species(&self, old: &Species, new: &Species) -> Result<Species, SpeciesError> {
        if self == old {
            return Ok(new.clone());
        }
        match self {
            Species::Simple(_) => Ok(self.clone()),
            Species::Complex(c) => Ok(Species::Complex(c.replace_species(old, new)?)),
            Species::OrderedComplex(c) => {
                Ok(Species::OrderedComplex(c.replace_species(old, new)?))
            }
            Species::Polymer(p) => Ok(Species::Polymer(p.replace_species(old, new)?)),
        }
    }

    /// Flattening accessor used by mechanism collaborators: non-recursive
    /// returns the species itself; recursive returns the leaf species of
    /// every composite member.
    pub fn get_species(&self, recursive: bool) -> Vec<Species> {
        if !recursive {
            return vec![self.clone()];
        }
        match self {
            Species::Simple(_) => vec![self.clone()],
            Species::Complex(c) => c
                .members()
                .iter()
                .flat_map(|m| m.get_species(true))
                .collect(),
            Species::OrderedComplex(c) => c
                .members()
                .iter()
                .flat_map(|m| m.get_species(true))
                .collect(),
            Species::Polymer(p) => p
                .polymer()
                .iter()
                .filter_map(|m| m.species())
                .flat_map(|s| s.get_species(true))
                .collect(),
        }
    }

    pub fn add_attribute(&mut self, attribute: &str) -> Result<(), SpeciesError> {
        match self {
            Species::Simple(s) => s.add_attribute(attribute),
            Species::Complex(c) => c.add_attribute(attribute),
            Species::OrderedComplex(c) => c.add_attribute(attribute),
            Species::Polymer(p) => p.add_attribute(attribute),
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_canonical(self.name(), self.material_type(), self.attributes(), f)
    }
}

impl PartialEq for Species {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
            && self.material_type() == other.material_type()
            && attribute_set_eq(self.attributes(), other.attributes())
    }
}

impl Eq for Species {}

impl Hash for Species {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_identity(self.name(), self.material_type(), self.attributes(), state);
    }
}

impl From<SimpleSpecies> for Species {
    fn from(species: SimpleSpecies) -> Self {
        Species::Simple(species)
    }
}

impl From<ComplexSpecies> for Species {
    fn from(species: ComplexSpecies) -> Self {
        Species::Complex(species)
    }
}

impl From<OrderedComplexSpecies> for Species {
    fn from(species: OrderedComplexSpecies) -> Self {
        Species::OrderedComplex(species)
    }
}

impl From<OrderedPolymerSpecies> for Species {
    fn from(species: OrderedPolymerSpecies) -> Self {
        Species::Polymer(species)
    }
}

impl TryFrom<&str> for Species {
    type Error = SpeciesError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Species::simple(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn new_species_has_empty_material_and_attributes() {
        let s = SimpleSpecies::new("s1").unwrap();
        assert_eq!(s.name(), "s1");
        assert_eq!(s.material_type(), "");
        assert!(s.attributes().is_empty());
    }

    #[test]
    fn name_validation_rejects_bad_characters() {
        assert!(matches!(
            SimpleSpecies::new("s 1"),
            Err(SpeciesError::InvalidName(_))
        ));
        assert!(matches!(
            SimpleSpecies::new("s-1"),
            Err(SpeciesError::InvalidName(_))
        ));
        assert!(matches!(
            SimpleSpecies::new(""),
            Err(SpeciesError::InvalidName(_))
        ));
        assert!(matches!(
            SimpleSpecies::new("___"),
            Err(SpeciesError::InvalidName(_))
        ));
        assert!(SimpleSpecies::new("s_1").is_ok());
    }

    #[test]
    fn digit_leading_name_requires_material_type() {
        assert!(matches!(
            SimpleSpecies::new("2x"),
            Err(SpeciesError::NumericLeadingName(_))
        ));
        assert!(SimpleSpecies::with_material("2x", "dna").is_ok());
    }

    #[test]
    fn material_type_validation() {
        assert!(matches!(
            SimpleSpecies::with_material("s1", "1dna"),
            Err(SpeciesError::InvalidMaterialType(_))
        ));
        assert!(matches!(
            SimpleSpecies::with_material("s1", "d na"),
            Err(SpeciesError::InvalidMaterialType(_))
        ));
        assert!(SimpleSpecies::with_material("s1", "ordered_polymer").is_ok());
        assert!(SimpleSpecies::with_material("s1", "_dna").is_ok());
    }

    #[test]
    fn attribute_validation_and_dedup() {
        let mut s = SimpleSpecies::new("s1").unwrap();
        s.add_attribute("degraded").unwrap();
        s.add_attribute("degraded").unwrap();
        assert_eq!(s.attributes(), &["degraded".to_string()]);
        assert!(matches!(
            s.add_attribute(""),
            Err(SpeciesError::InvalidAttribute(_))
        ));
        assert!(matches!(
            s.add_attribute("under_score"),
            Err(SpeciesError::InvalidAttribute(_))
        ));
    }

    #[test]
    fn canonical_repr_includes_material_and_attributes() {
        let s = SimpleSpecies::with_attributes("s2", "m2", &["bound"]).unwrap();
        assert_eq!(s.to_string(), "m2_s2_bound");
        let plain = SimpleSpecies::new("s1").unwrap();
        assert_eq!(plain.to_string(), "s1");
    }

    #[test]
    fn pretty_print_renders_brackets_and_attribute_list() {
        let s = SimpleSpecies::with_attributes("s2", "m2", &["bound", "dimer"]).unwrap();
        assert_eq!(s.pretty_print(true, true), "m2[s2(bound, dimer)]");
        assert_eq!(s.pretty_print(false, true), "s2(bound, dimer)");
        assert_eq!(s.pretty_print(true, false), "m2[s2]");
    }

    #[test]
    fn equality_ignores_attribute_order() {
        let mut a = SimpleSpecies::new("s1").unwrap();
        a.add_attribute("x").unwrap();
        a.add_attribute("y").unwrap();
        let mut b = SimpleSpecies::new("s1").unwrap();
        b.add_attribute("y").unwrap();
        b.add_attribute("x").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn equality_distinguishes_material_types() {
        let a = SimpleSpecies::new("s1").unwrap();
        let b = SimpleSpecies::with_material("s1", "dna").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn hash_is_consistent_with_attribute_set_equality() {
        let mut a = Species::simple("s1").unwrap();
        a.add_attribute("x").unwrap();
        a.add_attribute("y").unwrap();
        let mut b = Species::simple("s1").unwrap();
        b.add_attribute("y").unwrap();
        b.add_attribute("x").unwrap();

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn equality_crosses_variants_on_the_identity_triple() {
        let complex = crate::models::complex::ComplexSpecies::new(vec![
            Species::simple("s1").unwrap(),
            Species::with_material("s2", "m2").unwrap(),
        ])
        .unwrap();
        let alias =
            Species::with_material(complex.name(), complex.material_type()).unwrap();
        assert_eq!(Species::Complex(complex), alias);
    }

    #[test]
    fn try_from_str_promotes_to_simple_species() {
        let s = Species::try_from("s1").unwrap();
        assert_eq!(s, Species::simple("s1").unwrap());
        assert!(Species::try_from("not a name").is_err());
    }

    #[test]
    fn simple_replace_species_substitutes_whole_value() {
        let s1 = Species::simple("s1").unwrap();
        let s2 = Species::simple("s2").unwrap();
        let s3 = Species::simple("s3").unwrap();
        assert_eq!(s1.replace_species(&s1, &s2).unwrap(), s2);
        assert_eq!(s3.replace_species(&s1, &s2).unwrap(), s3);
    }

    #[test]
    fn get_species_non_recursive_returns_self() {
        let s1 = Species::simple("s1").unwrap();
        assert_eq!(s1.get_species(false), vec![s1.clone()]);
        assert_eq!(s1.get_species(true), vec![s1]);
    }
}
