//! # CRN Core Library
//!
//! A library for building, canonicalizing, and validating symbolic chemical
//! reaction networks.
//!
//! ## Architectural Philosophy
//!
//! The library is organized around a small number of value types with strict
//! identity rules, so that structurally different constructions of the same
//! chemical object compare and hash identically.
//!
//! - **[`models`]: The Entities.** Species identity ([`models::species`]),
//!   complex canonicalization ([`models::complex`]), the polymer ownership
//!   model ([`models::polymer`], [`models::polymer_species`]), and polymer
//!   binding resolution ([`models::binding`]).
//!
//! - **[`reaction`]: The Dynamics.** Reactions with deduplicated sides,
//!   per-kinetic-law validation ([`reaction::propensity`]), and an explicit
//!   equality protocol covering reversible reactions.
//!
//! - **[`network`]: The Container.** [`network::ChemicalReactionNetwork`]
//!   holds species and reactions, validates them into structured
//!   [`diagnostics`], and exposes the accessor surface simulator bridges
//!   build on.

pub mod diagnostics;
pub mod models;
pub mod network;
pub mod reaction;
