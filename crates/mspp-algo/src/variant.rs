//! Closed set of formulations and the dispatcher that builds them.

use crate::formulation::{
    build_abp, build_alp, build_aqp, build_mspp, build_nbp, build_nlp, build_nqp, Formulation,
};
use mspp_core::{Agent, MsppError, MsppResult, Network};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Which model to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Variant {
    /// Distance only, no congestion penalty
    #[default]
    Mspp,
    Abp,
    Nbp,
    Alp,
    Nlp,
    Aqp,
    Nqp,
}

impl Variant {
    pub const ALL: [Variant; 7] = [
        Variant::Mspp,
        Variant::Abp,
        Variant::Nbp,
        Variant::Alp,
        Variant::Nlp,
        Variant::Aqp,
        Variant::Nqp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Mspp => "MSPP",
            Variant::Abp => "ABP",
            Variant::Nbp => "NBP",
            Variant::Alp => "ALP",
            Variant::Nlp => "NLP",
            Variant::Aqp => "AQP",
            Variant::Nqp => "NQP",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Variant::Mspp => "shortest paths, conflicts ignored",
            Variant::Abp => "arc binary penalty: arcs used by two or more agents",
            Variant::Nbp => "node binary penalty: nodes used by two or more agents",
            Variant::Alp => "arc linear penalty: agents beyond the first per arc",
            Variant::Nlp => "node linear penalty: agents beyond the first per node",
            Variant::Aqp => "arc quadratic penalty: agent pairs sharing an arc",
            Variant::Nqp => "node quadratic penalty: agent pairs sharing a node",
        }
    }

    /// True for variants that register a second (penalty) objective.
    pub fn has_penalty(&self) -> bool {
        !matches!(self, Variant::Mspp)
    }

    /// True for variants that measure congestion on nodes.
    pub fn is_node_based(&self) -> bool {
        matches!(self, Variant::Nbp | Variant::Nlp | Variant::Nqp)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = MsppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase();
        Variant::ALL
            .into_iter()
            .find(|v| v.as_str() == normalized)
            .ok_or_else(|| MsppError::UnsupportedVariant(value.to_string()))
    }
}

/// Build the requested formulation.
pub fn build_model(variant: Variant, network: &Network, agents: &[Agent]) -> MsppResult<Formulation> {
    let formulation = match variant {
        Variant::Mspp => build_mspp(network, agents),
        Variant::Abp => build_abp(network, agents),
        Variant::Nbp => build_nbp(network, agents),
        Variant::Alp => build_alp(network, agents),
        Variant::Nlp => build_nlp(network, agents),
        Variant::Aqp => build_aqp(network, agents),
        Variant::Nqp => build_nqp(network, agents),
    }?;
    let stats = formulation.model.stats();
    debug!(
        variant = %variant,
        variables = stats.variables,
        constraints = stats.constraints,
        objectives = stats.objectives,
        "built formulation"
    );
    Ok(formulation)
}

/// Build a formulation from a variant name, e.g. `"abp"`.
pub fn build_model_by_name(
    name: &str,
    network: &Network,
    agents: &[Agent],
) -> MsppResult<Formulation> {
    build_model(name.parse()?, network, agents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::test_support::diamond;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("abp".parse::<Variant>().unwrap(), Variant::Abp);
        assert_eq!(" NqP ".parse::<Variant>().unwrap(), Variant::Nqp);
        for variant in Variant::ALL {
            assert_eq!(variant.to_string().parse::<Variant>().unwrap(), variant);
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        let err = "XYZ".parse::<Variant>().unwrap_err();
        assert!(matches!(err, MsppError::UnsupportedVariant(ref name) if name == "XYZ"));
        let network = diamond();
        assert!(matches!(
            build_model_by_name("abq", &network, &[Agent::new(0, 3, 0)]),
            Err(MsppError::UnsupportedVariant(_))
        ));
    }

    #[test]
    fn every_variant_tags_its_formulation() {
        let network = diamond();
        let agents = [Agent::new(0, 3, 0), Agent::new(1, 3, 1)];
        for variant in Variant::ALL {
            let f = build_model(variant, &network, &agents).unwrap();
            assert_eq!(f.variant, variant);
            let expected = if variant.has_penalty() { 2 } else { 1 };
            assert_eq!(f.model.objectives().len(), expected);
            assert_eq!(f.penalty.node_presence().is_some(), variant.is_node_based());
        }
    }

    #[test]
    fn serializes_as_uppercase_tag() {
        assert_eq!(serde_json::to_string(&Variant::Alp).unwrap(), "\"ALP\"");
        let parsed: Variant = serde_json::from_str("\"NBP\"").unwrap();
        assert_eq!(parsed, Variant::Nbp);
    }
}
