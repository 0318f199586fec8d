use super::polymer::{Direction, Monomer, OrderedPolymer, PolymerError};
use super::species::{
    SimpleSpecies, Species, SpeciesError, attribute_set_eq, check_attribute, check_material_type,
    check_name, fmt_canonical, hash_identity,
};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Default material type for ordered-polymer species.
pub const MATERIAL_ORDERED_POLYMER: &str = "ordered_polymer";
/// Attribute kept in sync with the circular flag.
pub const ATTRIBUTE_CIRCULAR: &str = "circular";

/// A species that is an ordered polymer of monomer slots.
///
/// Composes a chemical identity (name, material type, attributes) with an
/// owned [`OrderedPolymer`]. The derived name joins the member payload names
/// with `_` (plus an `_o` suffix when circular) and is regenerated on every
/// structural change unless an explicit name pinned it.
#[derive(Debug, Clone)]
pub struct OrderedPolymerSpecies {
    name: String,
    material_type: String,
    attributes: Vec<String>,
    custom_name: bool,
    polymer: OrderedPolymer,
    circular: bool,
    base_species: SimpleSpecies,
}

impl OrderedPolymerSpecies {
    /// Builds a linear polymer species with the default material type and a
    /// derived name.
    pub fn new(members: Vec<Monomer>) -> Result<Self, SpeciesError> {
        Self::with_options(members, None, MATERIAL_ORDERED_POLYMER, &[], false, None)
    }

    /// Fully parameterized constructor.
    ///
    /// `base_species` defaults to a [`SimpleSpecies`] carrying the polymer's
    /// name and material type; it stands in for the polymer wherever it is
    /// referenced as an opaque unit.
    pub fn with_options(
        members: Vec<Monomer>,
        name: Option<&str>,
        material_type: &str,
        attributes: &[&str],
        circular: bool,
        base_species: Option<SimpleSpecies>,
    ) -> Result<Self, SpeciesError> {
        let polymer = OrderedPolymer::new(members);
        let (name, custom_name) = match name {
            Some(name) => (name.to_string(), true),
            None => (Self::derive_name(&polymer, circular), false),
        };
        check_name(&name)?;
        check_material_type(material_type, &name)?;
        let mut attrs: Vec<String> = Vec::new();
        for attribute in attributes {
            check_attribute(attribute)?;
            if !attrs.iter().any(|a| a == attribute) {
                attrs.push((*attribute).to_string());
            }
        }
        if circular && !attrs.iter().any(|a| a == ATTRIBUTE_CIRCULAR) {
            attrs.push(ATTRIBUTE_CIRCULAR.to_string());
        }
        let base_species = match base_species {
            Some(base) => base,
            None => SimpleSpecies::with_material(&name, material_type)?,
        };
        Ok(Self {
            name,
            material_type: material_type.to_string(),
            attributes: attrs,
            custom_name,
            polymer,
            circular,
            base_species,
        })
    }

    fn derive_name(polymer: &OrderedPolymer, circular: bool) -> String {
        let segments: Vec<&str> = polymer
            .iter()
            .map(|member| member.species().map_or("empty", Species::name))
            .collect();
        let mut name = segments.join("_");
        if circular {
            name.push_str("_o");
        }
        name
    }

    fn refresh_name(&mut self) {
        if !self.custom_name {
            self.name = Self::derive_name(&self.polymer, self.circular);
        }
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

    pub fn has_custom_name(&self) -> bool {
        self.custom_name
    }

    pub fn polymer(&self) -> &OrderedPolymer {
        &self.polymer
    }

    pub fn monomer(&self, position: usize) -> Option<&Monomer> {
        self.polymer.get(position)
    }

    pub fn len(&self) -> usize {
        self.polymer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polymer.is_empty()
    }

    pub fn circular(&self) -> bool {
        self.circular
    }

    pub fn base_species(&self) -> &SimpleSpecies {
        &self.base_species
    }

    /// Sets the circular flag, keeping the `"circular"` attribute and the
    /// derived name in sync.
    pub fn set_circular(&mut self, circular: bool) {
        if self.circular == circular {
            return;
        }
        self.circular = circular;
        if circular {
            if !self.attributes.iter().any(|a| a == ATTRIBUTE_CIRCULAR) {
                self.attributes.push(ATTRIBUTE_CIRCULAR.to_string());
            }
        } else {
            self.attributes.retain(|a| a != ATTRIBUTE_CIRCULAR);
        }
        self.refresh_name();
    }

    /// Changes the material type; used when a polymer comes to represent a
    /// bound complex.
    pub fn set_material_type(&mut self, material_type: &str) -> Result<(), SpeciesError> {
        check_material_type(material_type, &self.name)?;
        self.material_type = material_type.to_string();
        Ok(())
    }

    pub fn add_attribute(&mut self, attribute: &str) -> Result<(), SpeciesError> {
        check_attribute(attribute)?;
        if !self.attributes.iter().any(|a| a == attribute) {
            self.attributes.push(attribute.to_string());
        }
        Ok(())
    }

    /// Inserts a monomer at `position`, shifting later members and
    /// regenerating the derived name.
    pub fn insert(
        &mut self,
        position: usize,
        monomer: Monomer,
        direction: Option<Direction>,
    ) -> Result<(), PolymerError> {
        self.polymer.insert(position, monomer, direction)?;
        self.refresh_name();
        Ok(())
    }

    pub fn append(&mut self, monomer: Monomer, direction: Option<Direction>) {
        self.polymer.append(monomer, direction);
        self.refresh_name();
    }

    /// Replaces the slot at `position`. When the incoming payload and the
    /// resolved direction match the current occupant, the polymer is left
    /// untouched and the name is not rebuilt.
    pub fn replace(
        &mut self,
        position: usize,
        monomer: Monomer,
        direction: Option<Direction>,
    ) -> Result<(), PolymerError> {
        let current = self
            .polymer
            .get(position)
            .ok_or(PolymerError::PositionOutOfRange {
                position,
                len: self.polymer.len(),
            })?;
        let resolved = direction.or(monomer.direction());
        if current.species() == monomer.species() && current.direction() == resolved {
            return Ok(());
        }
        self.polymer.replace(position, monomer, direction)?;
        self.refresh_name();
        Ok(())
    }

    /// Removes the monomer at `position`, regenerating the derived name.
    pub fn delpart(&mut self, position: usize) -> Result<Monomer, PolymerError> {
        let old = self.polymer.delpart(position)?;
        self.refresh_name();
        Ok(old)
    }

    /// Reverses the member sequence, inverting every orientation.
    pub fn reverse(&mut self) {
        self.polymer.reverse();
        self.refresh_name();
    }

    /// True if `item` is a member payload or found recursively inside one.
    pub fn contains(&self, item: &Species) -> bool {
        self.polymer.contains(item)
    }

    /// Substitutes `old` with `new` in every member payload and rebuilds the
    /// polymer species.
    pub fn replace_species(
        &self,
        old: &Species,
        new: &Species,
    ) -> Result<OrderedPolymerSpecies, SpeciesError> {
        let mut members = Vec::with_capacity(self.polymer.len());
        for monomer in self.polymer.iter() {
            let replaced = match monomer.species() {
                Some(species) => Monomer::new(species.replace_species(old, new)?),
                None => Monomer::empty(),
            };
            let replaced = match monomer.direction() {
                Some(direction) => replaced.directed(direction),
                None => replaced,
            };
            members.push(replaced);
        }
        let name = self.custom_name.then_some(self.name.as_str());
        let attrs: Vec<&str> = self.attributes.iter().map(String::as_str).collect();
        Self::with_options(
            members,
            name,
            &self.material_type,
            &attrs,
            self.circular,
            Some(self.base_species.clone()),
        )
    }

    pub fn pretty_print(&self, show_material: bool, show_attributes: bool) -> String {
        let mut txt = String::new();
        if show_material && !self.material_type.is_empty() {
            txt.push_str(&self.material_type);
        }
        txt.push('[');
        txt.push_str(&self.polymer.pretty_print(show_material, show_attributes, None));
        if show_attributes && !self.attributes.is_empty() {
            txt.push('(');
            txt.push_str(&self.attributes.join(", "));
            txt.push(')');
        }
        txt.push(']');
        txt
    }

    /// Renders the polymer with the slot at `position` parenthesized, for
    /// reporting on a particular binding site.
    pub fn binding_site_view(&self, position: usize) -> String {
        self.polymer.pretty_print(true, false, Some(position))
    }
}

impl fmt::Display for OrderedPolymerSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_canonical(&self.name, &self.material_type, &self.attributes, f)
    }
}

impl PartialEq for OrderedPolymerSpecies {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.material_type == other.material_type
            && attribute_set_eq(&self.attributes, &other.attributes)
    }
}

impl Eq for OrderedPolymerSpecies {}

/// Hash combines the identity triple with the member sequence, the circular
/// flag, and the base species, so structurally different polymers that share
/// a pinned name still separate in hash-based collections.
impl Hash for OrderedPolymerSpecies {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_identity(&self.name, &self.material_type, &self.attributes, state);
        self.polymer.hash(state);
        self.circular.hash(state);
        self.base_species.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn species(name: &str) -> Species {
        Species::simple(name).unwrap()
    }

    fn polymer_abc() -> OrderedPolymerSpecies {
        OrderedPolymerSpecies::new(vec![
            Monomer::new(species("a")),
            Monomer::new(species("b")).directed(Direction::Forward),
            Monomer::new(species("c")),
        ])
        .unwrap()
    }

    mod naming {
        use super::*;

        #[test]
        fn derived_name_joins_member_names() {
            let p = polymer_abc();
            assert_eq!(p.name(), "a_b_c");
            assert_eq!(p.material_type(), MATERIAL_ORDERED_POLYMER);
            assert_eq!(p.to_string(), "ordered_polymer_a_b_c");
        }

        #[test]
        fn circular_polymer_gets_suffix_and_attribute() {
            let p = OrderedPolymerSpecies::with_options(
                vec![Monomer::new(species("a")), Monomer::new(species("b"))],
                None,
                MATERIAL_ORDERED_POLYMER,
                &[],
                true,
                None,
            )
            .unwrap();
            assert_eq!(p.name(), "a_b_o");
            assert!(p.circular());
            assert!(p.attributes().contains(&ATTRIBUTE_CIRCULAR.to_string()));
        }

        #[test]
        fn empty_slots_contribute_a_placeholder_segment() {
            let p = OrderedPolymerSpecies::new(vec![
                Monomer::new(species("a")),
                Monomer::empty(),
            ])
            .unwrap();
            assert_eq!(p.name(), "a_empty");
        }

        #[test]
        fn explicit_name_survives_mutation() {
            let mut p = OrderedPolymerSpecies::with_options(
                vec![Monomer::new(species("a")), Monomer::new(species("b"))],
                Some("genome"),
                MATERIAL_ORDERED_POLYMER,
                &[],
                false,
                None,
            )
            .unwrap();
            p.append(Monomer::new(species("c")), None);
            assert_eq!(p.name(), "genome");
        }

        #[test]
        fn base_species_defaults_to_name_and_material() {
            let p = polymer_abc();
            assert_eq!(p.base_species().name(), "a_b_c");
            assert_eq!(p.base_species().material_type(), MATERIAL_ORDERED_POLYMER);
        }
    }

    mod mutation {
        use super::*;

        #[test]
        fn structural_changes_regenerate_the_name() {
            let mut p = polymer_abc();
            p.replace(1, Monomer::new(species("x")), None).unwrap();
            assert_eq!(p.name(), "a_x_c");
            p.insert(0, Monomer::new(species("w")), None).unwrap();
            assert_eq!(p.name(), "w_a_x_c");
            p.delpart(3).unwrap();
            assert_eq!(p.name(), "w_a_x");
            p.reverse();
            assert_eq!(p.name(), "x_a_w");
        }

        #[test]
        fn replace_with_identical_payload_is_a_no_op() {
            let mut p = polymer_abc();
            let before = p.polymer().clone();
            p.replace(1, Monomer::new(species("b")), Some(Direction::Forward))
                .unwrap();
            assert_eq!(p.polymer(), &before);
            assert_eq!(p.name(), "a_b_c");
        }

        #[test]
        fn replace_with_different_direction_is_structural() {
            let mut p = polymer_abc();
            p.replace(1, Monomer::new(species("b")), Some(Direction::Reverse))
                .unwrap();
            assert_eq!(p.monomer(1).unwrap().direction(), Some(Direction::Reverse));
        }

        #[test]
        fn out_of_range_positions_are_rejected() {
            let mut p = polymer_abc();
            assert!(matches!(
                p.replace(7, Monomer::new(species("x")), None),
                Err(PolymerError::PositionOutOfRange { position: 7, len: 3 })
            ));
            assert!(p.delpart(7).is_err());
            assert!(p.insert(7, Monomer::new(species("x")), None).is_err());
        }

        #[test]
        fn set_circular_syncs_attribute_and_name() {
            let mut p = polymer_abc();
            p.set_circular(true);
            assert_eq!(p.name(), "a_b_c_o");
            assert!(p.attributes().contains(&ATTRIBUTE_CIRCULAR.to_string()));
            p.set_circular(false);
            assert_eq!(p.name(), "a_b_c");
            assert!(!p.attributes().contains(&ATTRIBUTE_CIRCULAR.to_string()));
        }
    }

    mod queries {
        use super::*;

        #[test]
        fn contains_finds_member_payloads() {
            let p = polymer_abc();
            assert!(p.contains(&species("b")));
            assert!(!p.contains(&species("x")));
        }

        #[test]
        fn equality_is_the_identity_triple() {
            assert_eq!(polymer_abc(), polymer_abc());
            let mut other = polymer_abc();
            other.replace(0, Monomer::new(species("x")), None).unwrap();
            assert_ne!(polymer_abc(), other);
        }

        #[test]
        fn replace_species_rebuilds_payloads_and_name() {
            let p = polymer_abc();
            let replaced = p.replace_species(&species("b"), &species("x")).unwrap();
            assert_eq!(replaced.name(), "a_x_c");
            assert_eq!(
                replaced.monomer(1).unwrap().direction(),
                Some(Direction::Forward)
            );
            // the original is untouched
            assert_eq!(p.name(), "a_b_c");
        }

        #[test]
        fn binding_site_view_highlights_the_slot() {
            let p = polymer_abc();
            assert_eq!(p.binding_site_view(1), "poly{a,(b-forward),c}");
        }
    }
}
