use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Everything the hint panel needs to know about a species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SpeciesMetadata {
    pub name: String,
    pub types: Vec<String>,  // One or two type names, primary first
    pub generation: String,  // As the data source names it, e.g. "generation-iii"
    pub evolution_stage: u32,
    pub sprite_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SpeciesMatch {
    pub name: String,
}
