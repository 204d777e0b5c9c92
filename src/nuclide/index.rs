use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

use super::modes::DecayMode;
use super::record::{nuclide_key, parse_key};

#[derive(Clone, Debug, PartialEq)]
pub struct DecayBranch {
    pub from: String,
    pub to: String,
    pub mode: DecayMode,
    pub branch_percent: Option<f64>,
    pub q_value_kev: Option<f64>,
    pub half_life_seconds: Option<f64>,
    pub half_life_unit: Option<String>,
    /// Suppresses expansion of the daughter.
    pub terminal: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IndexEntry {
    pub key: String,
    pub parent_id: String,
    pub protons: Option<u32>,
    pub neutrons: Option<u32>,
    pub branches: Vec<DecayBranch>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawIndexEntry {
    #[serde(default)]
    z: Option<u32>,
    #[serde(default)]
    n: Option<u32>,
    #[serde(default)]
    a: Option<u32>,
    #[serde(default, rename = "parentID")]
    parent_id: Option<String>,
    #[serde(default)]
    branches: Vec<RawBranch>,
}

impl RawIndexEntry {
    /// `(Z, N)`, filling a missing one from the mass number when possible.
    fn coordinates(&self) -> (Option<u32>, Option<u32>) {
        match (self.z, self.n, self.a) {
            (Some(z), None, Some(a)) => (Some(z), a.checked_sub(z)),
            (None, Some(n), Some(a)) => (a.checked_sub(n), Some(n)),
            (z, n, _) => (z, n),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
struct RawBranch {
    to: String,
    #[serde(default)]
    mode: String,
    #[serde(default, rename = "branchPercent")]
    branch_percent: Option<f64>,
    #[serde(default, rename = "qValueKeV")]
    q_value_kev: Option<f64>,
    #[serde(default, rename = "halfLifeSeconds")]
    half_life_seconds: Option<f64>,
    #[serde(default, rename = "halfLifeUnit")]
    half_life_unit: Option<String>,
}

/// Precomputed parent → branches map, keyed by `"Z-N"` wherever coordinates are known.
#[derive(Clone, Debug, Default)]
pub struct DecayIndex {
    entries: HashMap<String, IndexEntry>,
    key_by_id: HashMap<String, String>,
}

impl DecayIndex {
    pub fn parse(raw: &str) -> Result<Self> {
        let parsed: Value = serde_json::from_str(raw).context("invalid decay index JSON")?;
        let object = parsed
            .as_object()
            .ok_or_else(|| anyhow!("decay index must be a JSON object"))?;

        let mut raw_entries = Vec::with_capacity(object.len());
        let mut key_by_id = HashMap::with_capacity(object.len());
        for (id, value) in object {
            let entry = match RawIndexEntry::deserialize(value) {
                Ok(entry) => entry,
                Err(error) => {
                    trace!(%id, %error, "skipping malformed decay index entry");
                    continue;
                }
            };

            let key = match entry.coordinates() {
                (Some(z), Some(n)) => nuclide_key(z, n),
                _ => id.clone(),
            };
            key_by_id.insert(id.clone(), key.clone());
            if let Some(parent_id) = &entry.parent_id {
                key_by_id.entry(parent_id.clone()).or_insert_with(|| key.clone());
            }
            raw_entries.push((id.clone(), key, entry));
        }

        let mut index = Self {
            entries: HashMap::with_capacity(raw_entries.len()),
            key_by_id,
        };

        for (id, key, raw_entry) in raw_entries {
            let (protons, neutrons) = raw_entry.coordinates();
            let mut seen = HashSet::new();
            let mut branches = Vec::with_capacity(raw_entry.branches.len());
            for raw_branch in raw_entry.branches {
                let to = index.resolve(&raw_branch.to);
                let mode = DecayMode::from_slug(raw_branch.mode.trim());
                if !seen.insert((mode.clone(), to.clone())) {
                    continue;
                }

                branches.push(DecayBranch {
                    from: key.clone(),
                    to,
                    mode,
                    branch_percent: raw_branch.branch_percent,
                    q_value_kev: raw_branch.q_value_kev,
                    half_life_seconds: raw_branch.half_life_seconds,
                    half_life_unit: raw_branch.half_life_unit,
                    terminal: false,
                });
            }

            let entry = IndexEntry {
                key: key.clone(),
                parent_id: raw_entry.parent_id.unwrap_or(id),
                protons,
                neutrons,
                branches,
            };
            index.entries.entry(key).or_insert(entry);
        }

        debug!(parents = index.entries.len(), "parsed decay index");
        Ok(index)
    }

    /// Maps a source identifier to the key used by the graph.
    pub fn resolve(&self, id: &str) -> String {
        if parse_key(id).is_some() {
            return id.to_owned();
        }
        self.key_by_id
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_owned())
    }

    pub fn entry(&self, key: &str) -> Option<&IndexEntry> {
        self.entries.get(key)
    }

    pub fn branches(&self, key: &str) -> &[DecayBranch] {
        self.entries
            .get(key)
            .map(|entry| entry.branches.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
