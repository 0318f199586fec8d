use super::complex::ComplexSpecies;
use super::polymer::Monomer;
use super::polymer_species::OrderedPolymerSpecies;
use super::species::{Species, SpeciesError};
use thiserror::Error;

/// Material type marking a polymer whose slot holds a bound complex.
pub const MATERIAL_OP_COMPLEX: &str = "op_complex";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("cannot bind sites on more than one polymer in a single step")]
    MultiplePolymers,
    #[error("polymer {polymer:?} has no binding site at position {position}")]
    InvalidSite { polymer: String, position: usize },
    #[error("binding site {position} of polymer {polymer:?} is empty and no species were given")]
    EmptySite { polymer: String, position: usize },
    #[error(transparent)]
    Species(#[from] SpeciesError),
}

/// One participant of a binding step: either a free-floating species or an
/// explicitly named binding site on a polymer.
#[derive(Debug, Clone)]
pub enum BindingMember<'a> {
    Free(Species),
    Site {
        polymer: &'a OrderedPolymerSpecies,
        position: usize,
    },
}

/// Result of resolving a binding step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingOutcome {
    /// The species now occupying the bound slot, or the plain complex when no
    /// polymer was involved.
    pub species: Species,
    /// The rebuilt polymer, present only when a site was bound. The input
    /// polymer is never modified.
    pub polymer: Option<OrderedPolymerSpecies>,
}

/// Resolves a binding step over free species and at most one polymer site.
///
/// Without a site this is plain complex formation. With a site, the owning
/// polymer is copied, the free species are merged into the slot (joining the
/// previous occupant if there is one, keeping the slot's orientation), and
/// the copy's material type becomes [`MATERIAL_OP_COMPLEX`].
pub fn bind_complex(members: Vec<BindingMember<'_>>) -> Result<BindingOutcome, BindingError> {
    let mut free: Vec<Species> = Vec::new();
    let mut site: Option<(&OrderedPolymerSpecies, usize)> = None;
    for member in members {
        match member {
            BindingMember::Free(species) => free.push(species),
            BindingMember::Site { polymer, position } => {
                if site.is_some() {
                    return Err(BindingError::MultiplePolymers);
                }
                site = Some((polymer, position));
            }
        }
    }

    let Some((polymer, position)) = site else {
        let complex = ComplexSpecies::new(free)?;
        return Ok(BindingOutcome {
            species: Species::Complex(complex),
            polymer: None,
        });
    };

    let occupant = polymer
        .monomer(position)
        .ok_or_else(|| BindingError::InvalidSite {
            polymer: polymer.name().to_string(),
            position,
        })?;
    let previous = occupant.species().cloned();
    let direction = occupant.direction();

    if free.is_empty() {
        return match previous {
            Some(species) => Ok(BindingOutcome {
                species,
                polymer: Some(polymer.clone()),
            }),
            None => Err(BindingError::EmptySite {
                polymer: polymer.name().to_string(),
                position,
            }),
        };
    }

    let bound = match previous {
        None if free.len() == 1 => free.remove(0),
        None => Species::Complex(ComplexSpecies::new(free)?),
        Some(previous) => {
            free.push(previous);
            Species::Complex(ComplexSpecies::new(free)?)
        }
    };

    let mut merged = polymer.clone();
    merged
        .replace(position, Monomer::new(bound.clone()), direction)
        .map_err(|_| BindingError::InvalidSite {
            polymer: polymer.name().to_string(),
            position,
        })?;
    merged.set_material_type(MATERIAL_OP_COMPLEX)?;

    Ok(BindingOutcome {
        species: bound,
        polymer: Some(merged),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::polymer::Direction;

    fn species(name: &str) -> Species {
        Species::simple(name).unwrap()
    }

    fn polymer_with_site() -> OrderedPolymerSpecies {
        OrderedPolymerSpecies::new(vec![
            Monomer::new(species("a")),
            Monomer::empty().directed(Direction::Forward),
            Monomer::new(species("c")),
        ])
        .unwrap()
    }

    #[test]
    fn free_members_only_form_a_plain_complex() {
        let outcome = bind_complex(vec![
            BindingMember::Free(species("x")),
            BindingMember::Free(species("y")),
        ])
        .unwrap();
        let expected = ComplexSpecies::new(vec![species("x"), species("y")]).unwrap();
        assert_eq!(outcome.species, Species::Complex(expected));
        assert!(outcome.polymer.is_none());
    }

    #[test]
    fn single_free_species_installs_into_an_empty_site() {
        let p = polymer_with_site();
        let outcome = bind_complex(vec![
            BindingMember::Free(species("x")),
            BindingMember::Site {
                polymer: &p,
                position: 1,
            },
        ])
        .unwrap();
        assert_eq!(outcome.species, species("x"));
        let merged = outcome.polymer.unwrap();
        assert_eq!(merged.monomer(1).unwrap().species(), Some(&species("x")));
        assert_eq!(
            merged.monomer(1).unwrap().direction(),
            Some(Direction::Forward)
        );
        assert_eq!(merged.material_type(), MATERIAL_OP_COMPLEX);
        // the input polymer is untouched
        assert!(p.monomer(1).unwrap().species().is_none());
        assert_eq!(p.material_type(), "ordered_polymer");
    }

    #[test]
    fn several_free_species_form_a_complex_in_an_empty_site() {
        let p = polymer_with_site();
        let outcome = bind_complex(vec![
            BindingMember::Free(species("x")),
            BindingMember::Free(species("y")),
            BindingMember::Site {
                polymer: &p,
                position: 1,
            },
        ])
        .unwrap();
        let expected = ComplexSpecies::new(vec![species("x"), species("y")]).unwrap();
        assert_eq!(outcome.species, Species::Complex(expected));
    }

    #[test]
    fn occupied_site_joins_the_previous_occupant() {
        let p = polymer_with_site();
        let outcome = bind_complex(vec![
            BindingMember::Free(species("x")),
            BindingMember::Site {
                polymer: &p,
                position: 0,
            },
        ])
        .unwrap();
        let expected = ComplexSpecies::new(vec![species("x"), species("a")]).unwrap();
        assert_eq!(outcome.species, Species::Complex(expected.clone()));
        let merged = outcome.polymer.unwrap();
        assert_eq!(
            merged.monomer(0).unwrap().species(),
            Some(&Species::Complex(expected))
        );
    }

    #[test]
    fn no_free_species_returns_the_current_occupant() {
        let p = polymer_with_site();
        let outcome = bind_complex(vec![BindingMember::Site {
            polymer: &p,
            position: 0,
        }])
        .unwrap();
        assert_eq!(outcome.species, species("a"));
        assert_eq!(outcome.polymer.unwrap().material_type(), "ordered_polymer");
    }

    #[test]
    fn no_free_species_on_an_empty_site_is_an_error() {
        let p = polymer_with_site();
        let result = bind_complex(vec![BindingMember::Site {
            polymer: &p,
            position: 1,
        }]);
        assert!(matches!(result, Err(BindingError::EmptySite { .. })));
    }

    #[test]
    fn two_sites_are_rejected_even_on_the_same_polymer() {
        let p = polymer_with_site();
        let result = bind_complex(vec![
            BindingMember::Site {
                polymer: &p,
                position: 0,
            },
            BindingMember::Site {
                polymer: &p,
                position: 2,
            },
        ]);
        assert!(matches!(result, Err(BindingError::MultiplePolymers)));
    }

    #[test]
    fn out_of_range_site_is_rejected() {
        let p = polymer_with_site();
        let result = bind_complex(vec![
            BindingMember::Free(species("x")),
            BindingMember::Site {
                polymer: &p,
                position: 9,
            },
        ]);
        assert!(matches!(
            result,
            Err(BindingError::InvalidSite { position: 9, .. })
        ));
    }

    #[test]
    fn single_free_member_without_a_site_is_an_arity_error() {
        let result = bind_complex(vec![BindingMember::Free(species("x"))]);
        assert!(matches!(
            result,
            Err(BindingError::Species(SpeciesError::TooFewMembers))
        ));
    }
}
