//! Core data structures for symbolic reaction networks.
//!
//! The central type is [`species::Species`], the closed set of entity kinds a
//! network deals in. Composite kinds live in [`complex`] and
//! [`polymer_species`], the polymer ownership model in [`polymer`], and
//! polymer binding resolution in [`binding`].

pub mod binding;
pub mod complex;
pub mod polymer;
pub mod polymer_species;
pub mod species;
