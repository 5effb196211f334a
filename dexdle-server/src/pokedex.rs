use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::{OnceCell, RwLock};

use dexdle_core::{EvolutionNode, evolution_stage, is_searchable, search_species, to_roman};
use dexdle_types::{SpeciesMatch, SpeciesMetadata};

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Species not found: {0}")]
    NotFound(String),
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

/// Read-only access to Pokémon reference data.
#[async_trait]
pub trait PokemonLookup: Send + Sync {
    async fn resolve_species(&self, name: &str) -> Result<SpeciesMetadata, LookupError>;

    /// Case-insensitive substring search over every species name.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SpeciesMatch>, LookupError>;
}

/// The full species name list, fetched at most once per process.
///
/// Concurrent first callers wait on a single populate; if it fails the cell
/// stays empty and the next caller tries again.
#[derive(Default)]
pub struct SpeciesListCache {
    names: OnceCell<Arc<Vec<String>>>,
}

impl SpeciesListCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_populated(&self) -> bool {
        self.names.initialized()
    }

    pub async fn get_or_populate<F, Fut>(&self, populate: F) -> Result<Arc<Vec<String>>, LookupError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<String>, LookupError>>,
    {
        self.names
            .get_or_try_init(|| async {
                let names = populate().await?;
                tracing::info!("Cached {} species names", names.len());
                Ok::<_, LookupError>(Arc::new(names))
            })
            .await
            .cloned()
    }
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct SpeciesListResponse {
    results: Vec<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct PokemonTypeSlot {
    slot: u32,
    #[serde(rename = "type")]
    type_: NamedResource,
}

#[derive(Debug, Default, Deserialize)]
struct Sprites {
    front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PokemonResponse {
    name: String,
    types: Vec<PokemonTypeSlot>,
    #[serde(default)]
    sprites: Sprites,
    species: NamedResource,
}

#[derive(Debug, Deserialize)]
struct ApiResourceRef {
    url: String,
}

#[derive(Debug, Deserialize)]
struct SpeciesResponse {
    generation: NamedResource,
    evolution_chain: Option<ApiResourceRef>,
}

#[derive(Debug, Deserialize)]
struct ChainLink {
    species: NamedResource,
    #[serde(default)]
    evolves_to: Vec<ChainLink>,
}

impl From<ChainLink> for EvolutionNode {
    fn from(link: ChainLink) -> Self {
        EvolutionNode::with_evolutions(
            link.species.name,
            link.evolves_to.into_iter().map(EvolutionNode::from).collect(),
        )
    }
}

#[derive(Debug, Deserialize)]
struct EvolutionChainResponse {
    chain: ChainLink,
}

/// [`PokemonLookup`] over the public PokeAPI REST service.
pub struct PokeApiClient {
    client: Client,
    base_url: String,
    species_names: SpeciesListCache,
    metadata: RwLock<HashMap<String, SpeciesMetadata>>,
}

impl PokeApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            species_names: SpeciesListCache::new(),
            metadata: RwLock::new(HashMap::new()),
        })
    }

    pub fn species_cache(&self) -> &SpeciesListCache {
        &self.species_names
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, LookupError> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(url.to_string()));
        }
        if !response.status().is_success() {
            return Err(LookupError::InvalidResponse(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        Ok(response.json::<T>().await?)
    }

    async fn fetch_species_names(&self) -> Result<Vec<String>, LookupError> {
        let url = format!("{}/pokemon-species?limit=100000", self.base_url);
        let list: SpeciesListResponse = self.get_json(&url).await?;
        Ok(list.results.into_iter().map(|species| species.name).collect())
    }

    async fn fetch_species(&self, name: &str) -> Result<SpeciesMetadata, LookupError> {
        let pokemon: PokemonResponse = self
            .get_json(&format!("{}/pokemon/{}", self.base_url, name))
            .await
            .map_err(|e| match e {
                LookupError::NotFound(_) => LookupError::NotFound(name.to_string()),
                other => other,
            })?;

        let species: SpeciesResponse = self.get_json(&pokemon.species.url).await?;

        let stage = match species.evolution_chain {
            Some(chain_ref) => {
                let chain: EvolutionChainResponse = self.get_json(&chain_ref.url).await?;
                evolution_stage(&chain.chain.into(), &pokemon.species.name)
            }
            None => 1,
        };

        let mut slots = pokemon.types;
        slots.sort_by_key(|slot| slot.slot);
        if slots.is_empty() {
            return Err(LookupError::InvalidResponse(format!(
                "{} has no types",
                pokemon.name
            )));
        }

        Ok(SpeciesMetadata {
            name: pokemon.name,
            types: slots.into_iter().take(2).map(|slot| slot.type_.name).collect(),
            generation: species.generation.name,
            evolution_stage: stage,
            sprite_url: pokemon.sprites.front_default,
        })
    }
}

#[async_trait]
impl PokemonLookup for PokeApiClient {
    async fn resolve_species(&self, name: &str) -> Result<SpeciesMetadata, LookupError> {
        let key = name.trim().to_lowercase();
        if let Some(cached) = self.metadata.read().await.get(&key) {
            return Ok(cached.clone());
        }

        let metadata = self.fetch_species(&key).await?;
        self.metadata
            .write()
            .await
            .insert(key, metadata.clone());
        Ok(metadata)
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SpeciesMatch>, LookupError> {
        if !is_searchable(query) {
            return Ok(Vec::new());
        }

        let names = self
            .species_names
            .get_or_populate(|| self.fetch_species_names())
            .await?;
        Ok(search_species(&names, query, limit))
    }
}

/// In-memory [`PokemonLookup`] for tests and offline development.
#[derive(Default)]
pub struct StaticPokedex {
    species: Vec<SpeciesMetadata>,
}

impl StaticPokedex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a species; its evolution stage is read off `chain`.
    pub fn with_species(
        mut self,
        name: &str,
        types: &[&str],
        generation: u32,
        chain: &EvolutionNode,
    ) -> Self {
        self.species.push(SpeciesMetadata {
            name: name.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
            generation: format!("generation-{}", to_roman(generation)),
            evolution_stage: evolution_stage(chain, name),
            sprite_url: Some(format!("/sprites/{}.png", name)),
        });
        self
    }

    /// Add every member of a chain sharing the same types and generation.
    pub fn with_chain(self, chain: &EvolutionNode, types: &[&str], generation: u32) -> Self {
        let mut names = Vec::new();
        let mut pending = vec![chain];
        while let Some(node) = pending.pop() {
            names.push(node.species.clone());
            pending.extend(node.evolves_to.iter());
        }
        names.sort();

        names.iter().fold(self, |pokedex, name| {
            pokedex.with_species(name, types, generation, chain)
        })
    }

    pub fn species_names(&self) -> Vec<String> {
        self.species.iter().map(|s| s.name.clone()).collect()
    }

    /// A small first-generation roster, enough to run the game offline.
    pub fn kanto_starters() -> Self {
        let line = |names: &[&str]| {
            names
                .iter()
                .rev()
                .fold(None, |child: Option<EvolutionNode>, name| {
                    Some(EvolutionNode::with_evolutions(
                        *name,
                        child.into_iter().collect(),
                    ))
                })
                .unwrap_or_else(|| EvolutionNode::new(""))
        };

        let eevee = EvolutionNode::with_evolutions(
            "eevee",
            vec![
                EvolutionNode::new("vaporeon"),
                EvolutionNode::new("jolteon"),
                EvolutionNode::new("flareon"),
            ],
        );

        let charmander = line(&["charmander", "charmeleon", "charizard"]);
        let pichu = line(&["pichu", "pikachu", "raichu"]);

        StaticPokedex::new()
            .with_chain(&line(&["bulbasaur", "ivysaur", "venusaur"]), &["grass", "poison"], 1)
            .with_species("charmander", &["fire"], 1, &charmander)
            .with_species("charmeleon", &["fire"], 1, &charmander)
            .with_species("charizard", &["fire", "flying"], 1, &charmander)
            .with_chain(&line(&["squirtle", "wartortle", "blastoise"]), &["water"], 1)
            .with_species("pichu", &["electric"], 2, &pichu)
            .with_species("pikachu", &["electric"], 1, &pichu)
            .with_species("raichu", &["electric"], 1, &pichu)
            .with_species("eevee", &["normal"], 1, &eevee)
            .with_species("vaporeon", &["water"], 1, &eevee)
            .with_species("jolteon", &["electric"], 1, &eevee)
            .with_species("flareon", &["fire"], 1, &eevee)
            .with_species("snorlax", &["normal"], 1, &line(&["snorlax"]))
            .with_species("mewtwo", &["psychic"], 1, &line(&["mewtwo"]))
    }
}

#[async_trait]
impl PokemonLookup for StaticPokedex {
    async fn resolve_species(&self, name: &str) -> Result<SpeciesMetadata, LookupError> {
        self.species
            .iter()
            .find(|species| species.name.eq_ignore_ascii_case(name.trim()))
            .cloned()
            .ok_or_else(|| LookupError::NotFound(name.to_string()))
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SpeciesMatch>, LookupError> {
        Ok(search_species(&self.species_names(), query, limit))
    }
}
