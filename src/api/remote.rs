//! Purpose: HTTP client for the read-only PokéAPI catalog endpoints.
//! Exports: `RemoteClient`, `DEFAULT_BASE_URL`.
//! Role: Sole network boundary; maps wire JSON into `core::catalog` types.
//! Invariants: Every round-trip failure is normalized into one typed `Error`.
//! Invariants: Batch fetches tolerate per-identifier failures; siblings never abort.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::thread;
use tracing::warn;
use url::Url;

use crate::core::catalog::{
    Ability, COLLECTION_SIZE, FlavorEntry, Pokemon, PokemonDetail, SpeciesRecord, StatValue,
};
use crate::core::error::{Error, ErrorKind};

type ApiResult<T> = Result<T, Error>;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Upper bound on concurrent detail requests inside one batch.
const BATCH_FAN_OUT: usize = 32;

#[derive(Clone)]
pub struct RemoteClient {
    inner: Arc<RemoteClientInner>,
}

struct RemoteClientInner {
    base_url: Url,
    agent: ureq::Agent,
}

#[derive(Deserialize)]
struct ListEnvelope {
    results: Vec<ListEntry>,
}

#[derive(Deserialize)]
struct ListEntry {
    name: String,
}

#[derive(Deserialize)]
struct DetailRecord {
    id: u32,
    name: String,
    height: u32,
    weight: u32,
    sprites: SpriteSet,
    types: Vec<TypeSlot>,
    abilities: Vec<AbilitySlot>,
    stats: Vec<StatSlot>,
}

#[derive(Deserialize)]
struct SpriteSet {
    front_default: Option<String>,
    #[serde(default)]
    other: OtherSprites,
}

#[derive(Deserialize, Default)]
struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    official_artwork: ArtworkSprites,
}

#[derive(Deserialize, Default)]
struct ArtworkSprites {
    front_default: Option<String>,
}

#[derive(Deserialize)]
struct TypeSlot {
    #[serde(rename = "type")]
    kind: NamedRef,
}

#[derive(Deserialize)]
struct AbilitySlot {
    is_hidden: bool,
    ability: NamedRef,
}

#[derive(Deserialize)]
struct StatSlot {
    base_stat: u32,
    stat: NamedRef,
}

#[derive(Deserialize)]
struct NamedRef {
    name: String,
}

#[derive(Deserialize)]
struct SpeciesEnvelope {
    #[serde(default)]
    flavor_text_entries: Vec<FlavorSlot>,
}

#[derive(Deserialize)]
struct FlavorSlot {
    flavor_text: String,
    language: NamedRef,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        let agent = ureq::AgentBuilder::new().build();
        Ok(Self {
            inner: Arc::new(RemoteClientInner { base_url, agent }),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Fetches the base collection list. Identifiers are assigned 1-based
    /// by response position; entries come back in skeletal form.
    pub fn fetch_list(&self) -> ApiResult<Vec<Pokemon>> {
        let mut url = endpoint(&self.inner.base_url, &["pokemon"])?;
        url.query_pairs_mut()
            .append_pair("limit", &COLLECTION_SIZE.to_string());
        let envelope: ListEnvelope = self.request_json(&url)?;
        Ok(envelope
            .results
            .into_iter()
            .enumerate()
            .map(|(index, entry)| Pokemon::skeletal(index as u32 + 1, entry.name))
            .collect())
    }

    pub fn fetch_detail(&self, id: u32) -> ApiResult<PokemonDetail> {
        let url = endpoint(&self.inner.base_url, &["pokemon", &id.to_string()])?;
        let record: DetailRecord = self.request_json(&url)?;
        Ok(detail_from_wire(record))
    }

    pub fn fetch_species(&self, id: u32) -> ApiResult<SpeciesRecord> {
        let url = endpoint(&self.inner.base_url, &["pokemon-species", &id.to_string()])?;
        let envelope: SpeciesEnvelope = self.request_json(&url)?;
        Ok(species_from_wire(envelope))
    }

    /// Composite fetch for one identifier: detail and species issued
    /// concurrently, resolved only when both succeed.
    pub fn fetch_complete(&self, id: u32) -> ApiResult<(PokemonDetail, SpeciesRecord)> {
        let (detail, species) = thread::scope(|scope| {
            let detail = scope.spawn(move || self.fetch_detail(id));
            let species = scope.spawn(move || self.fetch_species(id));
            (detail.join(), species.join())
        });
        Ok((join_fetch(detail)?, join_fetch(species)?))
    }

    /// Batch detail fetch: one concurrent request per identifier, bounded
    /// fan-out. Individual failures are logged and dropped; the returned
    /// subset contains every identifier that succeeded.
    pub fn fetch_many(&self, ids: &[u32]) -> Vec<PokemonDetail> {
        let mut found = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(BATCH_FAN_OUT) {
            let joined = thread::scope(|scope| {
                let handles: Vec<_> = chunk
                    .iter()
                    .map(|&id| scope.spawn(move || (id, self.fetch_detail(id))))
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| handle.join())
                    .collect::<Vec<_>>()
            });
            for outcome in joined {
                match outcome {
                    Ok((_, Ok(detail))) => found.push(detail),
                    Ok((id, Err(err))) => {
                        warn!(id, error = %err, "dropping failed detail fetch");
                    }
                    Err(_) => warn!("detail fetch worker panicked"),
                }
            }
        }
        found
    }

    fn request_json<R>(&self, url: &Url) -> ApiResult<R>
    where
        R: DeserializeOwned,
    {
        let response = self
            .inner
            .agent
            .request("GET", url.as_str())
            .set("Accept", "application/json")
            .call();
        match response {
            Ok(resp) => read_json_response(resp),
            Err(ureq::Error::Status(status, _resp)) => Err(Error::new(ErrorKind::Response)
                .with_message(format!("remote responded with status {status}"))
                .with_status(status)),
            Err(ureq::Error::Transport(err)) => Err(Error::new(ErrorKind::Transport)
                .with_message("request could not reach the remote")
                .with_source(err)),
        }
    }
}

fn join_fetch<T>(joined: thread::Result<ApiResult<T>>) -> ApiResult<T> {
    joined.unwrap_or_else(|_| {
        Err(Error::new(ErrorKind::Unknown).with_message("fetch worker panicked"))
    })
}

fn normalize_base_url(raw: String) -> ApiResult<Url> {
    let mut url = Url::parse(&raw).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("invalid api base url")
            .with_source(err)
    })?;
    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(
            Error::new(ErrorKind::Usage).with_message("api base url must use http or https scheme")
        );
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

// The base may carry a path prefix (the public API lives under /api/v2),
// so segments are appended rather than replacing the path.
fn endpoint(base_url: &Url, segments: &[&str]) -> ApiResult<Url> {
    let mut url = base_url.clone();
    {
        let mut path = url.path_segments_mut().map_err(|_| {
            Error::new(ErrorKind::Usage).with_message("api base url cannot be a base")
        })?;
        path.pop_if_empty();
        for segment in segments {
            path.push(segment);
        }
    }
    Ok(url)
}

fn read_json_response<R>(response: ureq::Response) -> ApiResult<R>
where
    R: DeserializeOwned,
{
    let body = response.into_string().map_err(|err| {
        Error::new(ErrorKind::Unknown)
            .with_message("failed to read response body")
            .with_source(err)
    })?;
    serde_json::from_str(&body).map_err(|err| {
        Error::new(ErrorKind::Unknown)
            .with_message("invalid response json")
            .with_source(err)
    })
}

fn detail_from_wire(record: DetailRecord) -> PokemonDetail {
    PokemonDetail {
        id: record.id,
        name: record.name,
        height: record.height,
        weight: record.weight,
        sprite: record.sprites.front_default,
        artwork: record.sprites.other.official_artwork.front_default,
        types: record.types.into_iter().map(|slot| slot.kind.name).collect(),
        abilities: record
            .abilities
            .into_iter()
            .map(|slot| Ability {
                name: slot.ability.name,
                hidden: slot.is_hidden,
            })
            .collect(),
        stats: record
            .stats
            .into_iter()
            .map(|slot| StatValue {
                name: slot.stat.name,
                base: slot.base_stat,
            })
            .collect(),
    }
}

fn species_from_wire(envelope: SpeciesEnvelope) -> SpeciesRecord {
    SpeciesRecord {
        flavor_texts: envelope
            .flavor_text_entries
            .into_iter()
            .map(|slot| FlavorEntry {
                text: slot.flavor_text,
                language: slot.language.name,
            })
            .collect(),
    }
}
