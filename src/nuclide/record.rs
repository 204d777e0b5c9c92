use super::half_life::HalfLife;
use super::modes::{DecayMode, ParsedMode};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HalfLifeCategory {
    Stable,
    Long,
    Medium,
    Short,
    Instant,
    Unstable,
    Unknown,
}

impl HalfLifeCategory {
    pub const ALL: [Self; 7] = [
        Self::Stable,
        Self::Long,
        Self::Medium,
        Self::Short,
        Self::Instant,
        Self::Unstable,
        Self::Unknown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Long => "long (≥ 1 y)",
            Self::Medium => "medium (≥ 1 d)",
            Self::Short => "short (≥ 1 s)",
            Self::Instant => "instant (< 1 s)",
            Self::Unstable => "particle unstable",
            Self::Unknown => "unknown",
        }
    }
}

/// Summary bucket of the firm decay modes listed for a nuclide.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DecayCategory {
    Single(DecayMode),
    Mixed,
    Unknown,
}

impl DecayCategory {
    pub fn from_modes(modes: &[ParsedMode]) -> Self {
        let mut distinct: Vec<&DecayMode> = Vec::new();
        for parsed in modes {
            if !distinct.contains(&&parsed.mode) {
                distinct.push(&parsed.mode);
            }
        }

        match distinct.as_slice() {
            [] => Self::Unknown,
            [mode] => Self::Single((*mode).clone()),
            _ => Self::Mixed,
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            Self::Single(mode) => mode.slug(),
            Self::Mixed => "mixed",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NuclideRecord {
    pub protons: u32,
    pub neutrons: u32,
    pub mass_number: u32,
    pub symbol: String,
    pub label: String,
    pub half_life: HalfLife,
    pub spin_parity: String,
    pub discovery_year: Option<u16>,
    pub decay_modes_text: String,
    pub decay_category: DecayCategory,
}

impl NuclideRecord {
    pub fn key(&self) -> String {
        nuclide_key(self.protons, self.neutrons)
    }

    pub fn category(&self) -> HalfLifeCategory {
        self.half_life.category
    }

    pub fn is_stable(&self) -> bool {
        self.half_life.category == HalfLifeCategory::Stable
    }
}

pub fn nuclide_key(protons: u32, neutrons: u32) -> String {
    format!("{protons}-{neutrons}")
}

pub fn parse_key(key: &str) -> Option<(u32, u32)> {
    let (protons, neutrons) = key.split_once('-')?;
    Some((protons.parse().ok()?, neutrons.parse().ok()?))
}
