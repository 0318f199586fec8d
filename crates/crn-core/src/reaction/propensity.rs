use crate::models::species::{Species, SpeciesError};

/// A kinetic law attached to a reaction.
///
/// Each non-massaction variant carries its own parameters, so a law can never
/// be built with missing or mistyped ones. Species-valued parameters take
/// part in [`replace_species`](Propensity::replace_species) like reaction
/// sides do.
#[derive(Debug, Clone, PartialEq)]
pub enum Propensity {
    /// Standard massaction kinetics; the only law supporting a reverse rate.
    MassAction,
    /// `k * s1^n / (K + s1^n)`
    HillPositive { s1: Species, k_half: f64, n: f64 },
    /// `k * 1 / (K + s1^n)`
    HillNegative { s1: Species, k_half: f64, n: f64 },
    /// `k * d * s1^n / (K + s1^n)`
    ProportionalHillPositive {
        s1: Species,
        d: Species,
        k_half: f64,
        n: f64,
    },
    /// `k * d / (K + s1^n)`
    ProportionalHillNegative {
        s1: Species,
        d: Species,
        k_half: f64,
        n: f64,
    },
    /// An opaque rate formula over species names, passed through verbatim.
    General { rate: String },
}

impl Propensity {
    /// Canonical tag for the law; reaction equality compares these.
    pub fn kind(&self) -> &'static str {
        match self {
            Propensity::MassAction => "massaction",
            Propensity::HillPositive { .. } => "hillpositive",
            Propensity::HillNegative { .. } => "hillnegative",
            Propensity::ProportionalHillPositive { .. } => "proportionalhillpositive",
            Propensity::ProportionalHillNegative { .. } => "proportionalhillnegative",
            Propensity::General { .. } => "general",
        }
    }

    pub fn is_mass_action(&self) -> bool {
        matches!(self, Propensity::MassAction)
    }

    /// Substitutes `old` with `new` inside species-valued parameters.
    pub fn replace_species(
        &self,
        old: &Species,
        new: &Species,
    ) -> Result<Propensity, SpeciesError> {
        Ok(match self {
            Propensity::MassAction => Propensity::MassAction,
            Propensity::HillPositive { s1, k_half, n } => Propensity::HillPositive {
                s1: s1.replace_species(old, new)?,
                k_half: *k_half,
                n: *n,
            },
            Propensity::HillNegative { s1, k_half, n } => Propensity::HillNegative {
                s1: s1.replace_species(old, new)?,
                k_half: *k_half,
                n: *n,
            },
            Propensity::ProportionalHillPositive { s1, d, k_half, n } => {
                Propensity::ProportionalHillPositive {
                    s1: s1.replace_species(old, new)?,
                    d: d.replace_species(old, new)?,
                    k_half: *k_half,
                    n: *n,
                }
            }
            Propensity::ProportionalHillNegative { s1, d, k_half, n } => {
                Propensity::ProportionalHillNegative {
                    s1: s1.replace_species(old, new)?,
                    d: d.replace_species(old, new)?,
                    k_half: *k_half,
                    n: *n,
                }
            }
            Propensity::General { rate } => Propensity::General { rate: rate.clone() },
        })
    }

    /// Renders the textual rate law. `inputs`/`outputs` are the reaction's
    /// rendered sides with coefficients; only massaction consumes them (the
    /// hill laws are parameterized by their own species).
    pub fn rate_expression(
        &self,
        k: f64,
        k_reverse: Option<f64>,
        inputs: &[(String, usize)],
        outputs: &[(String, usize)],
        pretty: bool,
        show_material: bool,
        show_attributes: bool,
    ) -> String {
        let render = |species: &Species| {
            if pretty {
                species.pretty_print(show_material, show_attributes)
            } else {
                species.to_string()
            }
        };
        match self {
            Propensity::MassAction => {
                let mut txt = format!("massaction: k_f{}", mass_action_half(k, inputs));
                if let Some(k_reverse) = k_reverse {
                    txt.push_str(&format!(" k_r{}", mass_action_half(k_reverse, outputs)));
                }
                txt
            }
            Propensity::HillPositive { s1, k_half, n } => {
                let s1 = render(s1);
                format!("hillpositive: k({s1})={k}*{s1}^{n}/({k_half}+{s1}^{n})")
            }
            Propensity::HillNegative { s1, k_half, n } => {
                let s1 = render(s1);
                format!("hillnegative: k({s1})={k}*1/({k_half}+{s1}^{n})")
            }
            Propensity::ProportionalHillPositive { s1, d, k_half, n } => {
                let (s1, d) = (render(s1), render(d));
                format!("proportionalhillpositive: k({s1}, {d})={k}*{d}*{s1}^{n}/({k_half}+{s1}^{n})")
            }
            Propensity::ProportionalHillNegative { s1, d, k_half, n } => {
                let (s1, d) = (render(s1), render(d));
                format!("proportionalhillnegative: k({s1}, {d})={k}*{d}/({k_half}+{s1}^{n})")
            }
            Propensity::General { rate } => format!("general: k(x)={k}*{rate}"),
        }
    }
}

/// One direction of a massaction law: `k_f(a,b)=k*a*b^2`.
fn mass_action_half(k: f64, side: &[(String, usize)]) -> String {
    let mut args = String::new();
    let mut product = format!("{k}");
    for (i, (name, coef)) in side.iter().enumerate() {
        args.push_str(name);
        if i < side.len() - 1 {
            args.push(',');
        }
        if *coef > 1 {
            product.push_str(&format!("*{name}^{coef}"));
        } else {
            product.push_str(&format!("*{name}"));
        }
    }
    if side.is_empty() {
        format!("={product}")
    } else {
        format!("({args})={product}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn species(name: &str) -> Species {
        Species::simple(name).unwrap()
    }

    #[test]
    fn kinds_are_canonical_tags() {
        assert_eq!(Propensity::MassAction.kind(), "massaction");
        let hill = Propensity::HillPositive {
            s1: species("s1"),
            k_half: 5.0,
            n: 2.0,
        };
        assert_eq!(hill.kind(), "hillpositive");
        assert!(!hill.is_mass_action());
    }

    #[test]
    fn mass_action_renders_the_product_form() {
        let law = Propensity::MassAction;
        let inputs = vec![("a".to_string(), 1), ("b".to_string(), 2)];
        let txt = law.rate_expression(2.0, None, &inputs, &[], false, true, true);
        assert_eq!(txt, "massaction: k_f(a,b)=2*a*b^2");
    }

    #[test]
    fn reversible_mass_action_appends_the_reverse_half() {
        let law = Propensity::MassAction;
        let inputs = vec![("a".to_string(), 1)];
        let outputs = vec![("b".to_string(), 1)];
        let txt = law.rate_expression(2.0, Some(1.5), &inputs, &outputs, false, true, true);
        assert_eq!(txt, "massaction: k_f(a)=2*a k_r(b)=1.5*b");
    }

    #[test]
    fn hill_laws_render_their_formulas() {
        let hill = Propensity::HillPositive {
            s1: species("s1"),
            k_half: 5.0,
            n: 2.0,
        };
        let txt = hill.rate_expression(3.0, None, &[], &[], false, true, true);
        assert_eq!(txt, "hillpositive: k(s1)=3*s1^2/(5+s1^2)");

        let prop = Propensity::ProportionalHillNegative {
            s1: species("s1"),
            d: species("d"),
            k_half: 5.0,
            n: 2.0,
        };
        let txt = prop.rate_expression(3.0, None, &[], &[], false, true, true);
        assert_eq!(txt, "proportionalhillnegative: k(s1, d)=3*d/(5+s1^2)");
    }

    #[test]
    fn general_law_passes_the_formula_through() {
        let law = Propensity::General {
            rate: "s1*s2/(1+s2)".to_string(),
        };
        let txt = law.rate_expression(2.0, None, &[], &[], false, true, true);
        assert_eq!(txt, "general: k(x)=2*s1*s2/(1+s2)");
    }

    #[test]
    fn replace_species_substitutes_law_parameters() {
        let hill = Propensity::ProportionalHillPositive {
            s1: species("s1"),
            d: species("d"),
            k_half: 5.0,
            n: 2.0,
        };
        let replaced = hill.replace_species(&species("s1"), &species("x")).unwrap();
        match replaced {
            Propensity::ProportionalHillPositive { s1, d, .. } => {
                assert_eq!(s1, species("x"));
                assert_eq!(d, species("d"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
