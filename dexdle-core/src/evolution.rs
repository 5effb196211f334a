use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// One link of an evolution chain: a species and whatever it evolves into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionNode {
    pub species: String,
    #[serde(default)]
    pub evolves_to: Vec<EvolutionNode>,
}

impl EvolutionNode {
    pub fn new(species: impl Into<String>) -> Self {
        Self {
            species: species.into(),
            evolves_to: Vec::new(),
        }
    }

    pub fn with_evolutions(species: impl Into<String>, evolves_to: Vec<EvolutionNode>) -> Self {
        Self {
            species: species.into(),
            evolves_to,
        }
    }
}

/// Stage of `species` within `chain`, where the root is stage 1.
///
/// Every branch is searched breadth first, so each member of a branching
/// chain gets a defined stage. A species missing from the chain is stage 1.
pub fn evolution_stage(chain: &EvolutionNode, species: &str) -> u32 {
    let mut queue = VecDeque::from([(chain, 1u32)]);

    while let Some((node, stage)) = queue.pop_front() {
        if node.species.eq_ignore_ascii_case(species) {
            return stage;
        }
        for child in &node.evolves_to {
            queue.push_back((child, stage + 1));
        }
    }

    tracing::debug!("Species '{}' not found in its evolution chain", species);
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branching_chain() -> EvolutionNode {
        EvolutionNode::with_evolutions(
            "a",
            vec![EvolutionNode::with_evolutions(
                "b",
                vec![EvolutionNode::new("c"), EvolutionNode::new("d")],
            )],
        )
    }

    #[test]
    fn test_stage_of_root_and_siblings() {
        let chain = branching_chain();
        assert_eq!(evolution_stage(&chain, "a"), 1);
        assert_eq!(evolution_stage(&chain, "b"), 2);
        assert_eq!(evolution_stage(&chain, "c"), 3);
        assert_eq!(evolution_stage(&chain, "d"), 3);
    }

    #[test]
    fn test_missing_species_defaults_to_base_stage() {
        assert_eq!(evolution_stage(&branching_chain(), "zubat"), 1);
    }

    #[test]
    fn test_eevee_branches() {
        let chain = EvolutionNode::with_evolutions(
            "eevee",
            ["vaporeon", "jolteon", "flareon", "espeon", "umbreon", "sylveon"]
                .into_iter()
                .map(EvolutionNode::new)
                .collect(),
        );
        assert_eq!(evolution_stage(&chain, "sylveon"), 2);
        assert_eq!(evolution_stage(&chain, "Umbreon"), 2);
    }

    #[test]
    fn test_deserialize_chain() {
        let json = r#"{"species":"pichu","evolves_to":[{"species":"pikachu","evolves_to":[{"species":"raichu"}]}]}"#;
        let chain: EvolutionNode = serde_json::from_str(json).unwrap();
        assert_eq!(evolution_stage(&chain, "raichu"), 3);
    }
}
