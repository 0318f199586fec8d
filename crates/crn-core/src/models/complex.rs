use super::species::{
    Species, SpeciesError, attribute_set_eq, check_attribute, check_material_type, check_name,
    hash_identity,
};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Default material type for order-independent complexes.
pub const MATERIAL_COMPLEX: &str = "complex";
/// Default material type for order-sensitive complexes.
pub const MATERIAL_ORDERED_COMPLEX: &str = "ordered_complex";

/// Collects each distinct member with its multiplicity, preserving the order
/// in which the members appear.
fn member_counts(members: &[Species]) -> Vec<(&Species, usize)> {
    let mut counts: Vec<(&Species, usize)> = Vec::new();
    for member in members {
        match counts.iter_mut().find(|entry| entry.0 == member) {
            Some(entry) => entry.1 += 1,
            None => counts.push((member, 1)),
        }
    }
    counts
}

/// Union of member attributes plus explicitly supplied ones, first-seen order.
fn inherit_attributes(members: &[Species], extra: &[&str]) -> Result<Vec<String>, SpeciesError> {
    let mut attributes: Vec<String> = Vec::new();
    for attribute in extra {
        check_attribute(attribute)?;
        if !attributes.iter().any(|a| a == attribute) {
            attributes.push((*attribute).to_string());
        }
    }
    for member in members {
        for attribute in member.attributes() {
            if !attributes.iter().any(|a| a == attribute) {
                attributes.push(attribute.clone());
            }
        }
    }
    Ok(attributes)
}

fn pretty_members(
    counts: &[(&Species, usize)],
    material_type: &str,
    attributes: &[String],
    show_material: bool,
    show_attributes: bool,
) -> String {
    let mut txt = String::new();
    if show_material && !material_type.is_empty() {
        txt.push_str(material_type);
    }
    txt.push('[');
    let rendered: Vec<String> = counts
        .iter()
        .map(|(member, count)| {
            let body = member.pretty_print(show_material, false);
            if *count > 1 {
                format!("{count}x_{body}")
            } else {
                body
            }
        })
        .collect();
    txt.push_str(&rendered.join(":"));
    if show_attributes && !attributes.is_empty() {
        txt.push('(');
        txt.push_str(&attributes.join(", "));
        txt.push(')');
    }
    txt.push(']');
    txt
}

/// An order-independent composite of two or more species.
///
/// When no explicit name is supplied, members are sorted by canonical
/// representation and the name is derived from the sorted distinct set with
/// `countx_` prefixes for multiplicities, so that
/// `ComplexSpecies::new(vec![a, b]) == ComplexSpecies::new(vec![b, a])`.
#[derive(Debug, Clone)]
pub struct ComplexSpecies {
    name: String,
    material_type: String,
    attributes: Vec<String>,
    members: Vec<Species>,
    custom_name: bool,
}

impl ComplexSpecies {
    /// Builds a complex with the default material type and a derived name.
    ///
    /// # Errors
    ///
    /// Returns `SpeciesError::TooFewMembers` for fewer than two members.
    pub fn new(members: Vec<Species>) -> Result<Self, SpeciesError> {
        Self::with_options(members, None, MATERIAL_COMPLEX, &[])
    }

    /// Builds a complex with an explicit name; the name is pinned and
    /// survives substitution instead of being rederived.
    pub fn named(members: Vec<Species>, name: &str) -> Result<Self, SpeciesError> {
        Self::with_options(members, Some(name), MATERIAL_COMPLEX, &[])
    }

    /// Builds a complex of `multiplicity` copies of one species. The derived
    /// name collapses to `countx_name`.
    pub fn multimer(species: Species, multiplicity: usize) -> Result<Self, SpeciesError> {
        Self::new(vec![species; multiplicity])
    }

    /// Fully parameterized constructor the other constructors delegate to.
    pub fn with_options(
        mut members: Vec<Species>,
        name: Option<&str>,
        material_type: &str,
        extra_attributes: &[&str],
    ) -> Result<Self, SpeciesError> {
        if members.len() <= 1 {
            return Err(SpeciesError::TooFewMembers);
        }
        let (name, custom_name) = match name {
            Some(name) => (name.to_string(), true),
            None => {
                members.sort_by_key(|member| member.to_string());
                (Self::derive_name(&members), false)
            }
        };
        check_name(&name)?;
        check_material_type(material_type, &name)?;
        let attributes = inherit_attributes(&members, extra_attributes)?;
        Ok(Self {
            name,
            material_type: material_type.to_string(),
            attributes,
            members,
            custom_name,
        })
    }

    /// Walks the deduplicated member set (members must already be sorted by
    /// representation) emitting `countx_` and `material_name` segments.
    /// Members that are themselves composites, or have no material type,
    /// contribute their name alone.
    fn derive_name(members: &[Species]) -> String {
        let mut name = String::new();
        for (member, count) in member_counts(members) {
            if count > 1 {
                name.push_str(&format!("{count}x_"));
            }
            if member.is_complex_kind() || member.material_type().is_empty() {
                name.push_str(&format!("{}_", member.name()));
            } else {
                name.push_str(&format!("{}_{}_", member.material_type(), member.name()));
            }
        }
        name.pop();
        name
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

    pub fn members(&self) -> &[Species] {
        &self.members
    }

    pub fn has_custom_name(&self) -> bool {
        self.custom_name
    }

    pub fn add_attribute(&mut self, attribute: &str) -> Result<(), SpeciesError> {
        check_attribute(attribute)?;
        if !self.attributes.iter().any(|a| a == attribute) {
            self.attributes.push(attribute.to_string());
        }
        Ok(())
    }

    /// Recursive containment: true if `item` equals a direct member or lives
    /// inside any composite member.
    pub fn contains(&self, item: &Species) -> bool {
        self.members.iter().any(|member| member == item)
            || self
                .members
                .iter()
                .any(|member| member.is_complex_kind() && member.contains(item))
    }

    /// Substitutes `old` with `new` at the top level and inside composite
    /// members, then reconstructs the complex. An explicit name is kept;
    /// otherwise the name is rederived from the new members.
    pub fn replace_species(
        &self,
        old: &Species,
        new: &Species,
    ) -> Result<ComplexSpecies, SpeciesError> {
        let mut new_members = Vec::with_capacity(self.members.len());
        for member in &self.members {
            new_members.push(member.replace_species(old, new)?);
        }
        let name = self.custom_name.then_some(self.name.as_str());
        let extra: Vec<&str> = self.attributes.iter().map(String::as_str).collect();
        Self::with_options(new_members, name, &self.material_type, &extra)
    }

    pub fn pretty_print(&self, show_material: bool, show_attributes: bool) -> String {
        pretty_members(
            &member_counts(&self.members),
            &self.material_type,
            &self.attributes,
            show_material,
            show_attributes,
        )
    }
}

impl fmt::Display for ComplexSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::species::fmt_canonical(&self.name, &self.material_type, &self.attributes, f)
    }
}

impl PartialEq for ComplexSpecies {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.material_type == other.material_type
            && attribute_set_eq(&self.attributes, &other.attributes)
    }
}

impl Eq for ComplexSpecies {}

impl Hash for ComplexSpecies {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_identity(&self.name, &self.material_type, &self.attributes, state);
    }
}

/// An order-sensitive composite of two or more species.
///
/// Members are kept in the order given, the derived name concatenates them in
/// that order, and two instances with the same members in different orders
/// are therefore distinct.
#[derive(Debug, Clone)]
pub struct OrderedComplexSpecies {
    name: String,
    material_type: String,
    attributes: Vec<String>,
    members: Vec<Species>,
    custom_name: bool,
}

impl OrderedComplexSpecies {
    pub fn new(members: Vec<Species>) -> Result<Self, SpeciesError> {
        Self::with_options(members, None, MATERIAL_ORDERED_COMPLEX, &[])
    }

    pub fn named(members: Vec<Species>, name: &str) -> Result<Self, SpeciesError> {
        Self::with_options(members, Some(name), MATERIAL_ORDERED_COMPLEX, &[])
    }

    pub fn with_options(
        members: Vec<Species>,
        name: Option<&str>,
        material_type: &str,
        extra_attributes: &[&str],
    ) -> Result<Self, SpeciesError> {
        if members.len() <= 1 {
            return Err(SpeciesError::TooFewMembers);
        }
        let (name, custom_name) = match name {
            Some(name) => (name.to_string(), true),
            None => (Self::derive_name(&members), false),
        };
        check_name(&name)?;
        check_material_type(material_type, &name)?;
        let attributes = inherit_attributes(&members, extra_attributes)?;
        Ok(Self {
            name,
            material_type: material_type.to_string(),
            attributes,
            members,
            custom_name,
        })
    }

    /// Member order is preserved verbatim; segments omit the material type
    /// when it is a complex material or empty.
    fn derive_name(members: &[Species]) -> String {
        let mut name = String::new();
        for member in members {
            let material = member.material_type();
            if material.is_empty()
                || material == MATERIAL_COMPLEX
                || material == MATERIAL_ORDERED_COMPLEX
            {
                name.push_str(&format!("{}_", member.name()));
            } else {
                name.push_str(&format!("{}_{}_", material, member.name()));
            }
        }
        name.pop();
        name
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

    pub fn members(&self) -> &[Species] {
        &self.members
    }

    pub fn has_custom_name(&self) -> bool {
        self.custom_name
    }

    pub fn add_attribute(&mut self, attribute: &str) -> Result<(), SpeciesError> {
        check_attribute(attribute)?;
        if !self.attributes.iter().any(|a| a == attribute) {
            self.attributes.push(attribute.to_string());
        }
        Ok(())
    }

    pub fn contains(&self, item: &Species) -> bool {
        self.members.iter().any(|member| member == item)
            || self
                .members
                .iter()
                .any(|member| member.is_complex_kind() && member.contains(item))
    }

    pub fn replace_species(
        &self,
        old: &Species,
        new: &Species,
    ) -> Result<OrderedComplexSpecies, SpeciesError> {
        let mut new_members = Vec::with_capacity(self.members.len());
        for member in &self.members {
            new_members.push(member.replace_species(old, new)?);
        }
        let name = self.custom_name.then_some(self.name.as_str());
        let extra: Vec<&str> = self.attributes.iter().map(String::as_str).collect();
        Self::with_options(new_members, name, &self.material_type, &extra)
    }

    pub fn pretty_print(&self, show_material: bool, show_attributes: bool) -> String {
        let counts: Vec<(&Species, usize)> =
            self.members.iter().map(|member| (member, 1)).collect();
        pretty_members(
            &counts,
            &self.material_type,
            &self.attributes,
            show_material,
            show_attributes,
        )
    }
}

impl fmt::Display for OrderedComplexSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::species::fmt_canonical(&self.name, &self.material_type, &self.attributes, f)
    }
}

impl PartialEq for OrderedComplexSpecies {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.material_type == other.material_type
            && attribute_set_eq(&self.attributes, &other.attributes)
    }
}

impl Eq for OrderedComplexSpecies {}

impl Hash for OrderedComplexSpecies {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_identity(&self.name, &self.material_type, &self.attributes, state);
    }
}
