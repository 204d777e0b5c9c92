use crate::util::slugify;

/// Spontaneous fission branches below this percentage are not drawn.
pub const FISSION_FIRMNESS_FLOOR: f64 = 0.001;

const NON_FIRM_MARKERS: [char; 7] = ['<', '>', '≤', '≥', '~', '?', '≈'];

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DecayMode {
    Alpha,
    BetaMinus,
    /// Electron capture and positron emission share one bucket.
    BetaPlus,
    IsomericTransition,
    SpontaneousFission,
    ProtonEmission,
    TwoProtonEmission,
    NeutronEmission,
    TwoNeutronEmission,
    DoubleBetaMinus,
    DoubleBetaPlus,
    BetaDelayedNeutron,
    Cluster,
    Unknown,
    Other(String),
}

impl DecayMode {
    pub fn from_code(code: &str) -> Self {
        match code {
            "" => Self::Unknown,
            "A" => Self::Alpha,
            "B-" => Self::BetaMinus,
            "B+" | "EC" | "e+" | "EC+B+" | "B+EC" | "EC+e+" => Self::BetaPlus,
            "IT" => Self::IsomericTransition,
            "SF" => Self::SpontaneousFission,
            "p" => Self::ProtonEmission,
            "2p" => Self::TwoProtonEmission,
            "n" => Self::NeutronEmission,
            "2n" => Self::TwoNeutronEmission,
            "2B-" => Self::DoubleBetaMinus,
            "2B+" | "2EC" | "2e+" => Self::DoubleBetaPlus,
            "B-n" => Self::BetaDelayedNeutron,
            _ if parse_cluster_code(code).is_some() => Self::Cluster,
            _ => Self::Other(slugify(code)),
        }
    }

    pub fn from_slug(slug: &str) -> Self {
        match slug {
            "alpha-decay" | "alpha" => Self::Alpha,
            "beta-minus-decay" | "beta-minus" => Self::BetaMinus,
            "beta-plus-decay" | "beta-plus" | "electron-capture" | "electron-capture-beta-plus" => {
                Self::BetaPlus
            }
            "isomeric-transition" => Self::IsomericTransition,
            "spontaneous-fission" => Self::SpontaneousFission,
            "proton-emission" => Self::ProtonEmission,
            "two-proton-emission" => Self::TwoProtonEmission,
            "neutron-emission" => Self::NeutronEmission,
            "two-neutron-emission" => Self::TwoNeutronEmission,
            "double-beta-minus-decay" => Self::DoubleBetaMinus,
            "double-beta-plus-decay" => Self::DoubleBetaPlus,
            "beta-delayed-neutron-emission" => Self::BetaDelayedNeutron,
            "cluster-decay" => Self::Cluster,
            "" | "unknown" => Self::Unknown,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            Self::Alpha => "alpha-decay",
            Self::BetaMinus => "beta-minus-decay",
            Self::BetaPlus => "beta-plus-decay",
            Self::IsomericTransition => "isomeric-transition",
            Self::SpontaneousFission => "spontaneous-fission",
            Self::ProtonEmission => "proton-emission",
            Self::TwoProtonEmission => "two-proton-emission",
            Self::NeutronEmission => "neutron-emission",
            Self::TwoNeutronEmission => "two-neutron-emission",
            Self::DoubleBetaMinus => "double-beta-minus-decay",
            Self::DoubleBetaPlus => "double-beta-plus-decay",
            Self::BetaDelayedNeutron => "beta-delayed-neutron-emission",
            Self::Cluster => "cluster-decay",
            Self::Unknown => "unknown",
            Self::Other(slug) => slug,
        }
    }

    pub fn short_label(&self) -> &str {
        match self {
            Self::Alpha => "α",
            Self::BetaMinus => "β⁻",
            Self::BetaPlus => "EC/β⁺",
            Self::IsomericTransition => "IT",
            Self::SpontaneousFission => "SF",
            Self::ProtonEmission => "p",
            Self::TwoProtonEmission => "2p",
            Self::NeutronEmission => "n",
            Self::TwoNeutronEmission => "2n",
            Self::DoubleBetaMinus => "2β⁻",
            Self::DoubleBetaPlus => "2β⁺",
            Self::BetaDelayedNeutron => "β⁻n",
            Self::Cluster => "cluster",
            Self::Unknown => "?",
            Self::Other(slug) => slug,
        }
    }

    /// Modes whose daughters can be derived and drawn.
    pub fn is_renderable(&self) -> bool {
        !matches!(
            self,
            Self::IsomericTransition | Self::Unknown | Self::Other(_)
        )
    }

    /// Closed-form daughter `(Z, N)` for modes that move a fixed set of nucleons.
    pub fn daughter(&self, protons: u32, neutrons: u32) -> Option<(u32, u32)> {
        match self {
            Self::Alpha => Some((protons.checked_sub(2)?, neutrons.checked_sub(2)?)),
            Self::BetaMinus => Some((protons + 1, neutrons.checked_sub(1)?)),
            Self::BetaPlus => Some((protons.checked_sub(1)?, neutrons + 1)),
            Self::ProtonEmission => Some((protons.checked_sub(1)?, neutrons)),
            Self::TwoProtonEmission => Some((protons.checked_sub(2)?, neutrons)),
            Self::NeutronEmission => Some((protons, neutrons.checked_sub(1)?)),
            Self::TwoNeutronEmission => Some((protons, neutrons.checked_sub(2)?)),
            Self::DoubleBetaMinus => Some((protons + 2, neutrons.checked_sub(2)?)),
            Self::DoubleBetaPlus => Some((protons.checked_sub(2)?, neutrons + 2)),
            Self::BetaDelayedNeutron => Some((protons + 1, neutrons.checked_sub(2)?)),
            Self::IsomericTransition
            | Self::SpontaneousFission
            | Self::Cluster
            | Self::Unknown
            | Self::Other(_) => None,
        }
    }
}

/// One firm entry of a compact decay-mode string such as `"A=100;B-=2e-7"`.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedMode {
    pub code: String,
    pub mode: DecayMode,
    pub percent: Option<f64>,
}

pub fn parse_decay_modes(text: &str) -> Vec<ParsedMode> {
    text.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter(|entry| !entry.contains(NON_FIRM_MARKERS))
        .filter_map(parse_entry)
        .collect()
}

fn parse_entry(entry: &str) -> Option<ParsedMode> {
    let digits = entry
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(entry.len());
    let code_len = entry[digits..]
        .find(|c: char| !(c.is_ascii_alphabetic() || c == '+' || c == '-'))
        .map_or(entry.len(), |offset| digits + offset);
    let code = &entry[..code_len];

    // "IS" carries the isotopic abundance of stable nuclides, not a decay.
    if code == "IS" {
        return None;
    }

    let percent = entry[code_len..]
        .trim_start_matches(|c: char| c == '=' || c.is_whitespace())
        .split_whitespace()
        .next()
        .and_then(|token| token.trim_end_matches('%').parse::<f64>().ok())
        .filter(|value| value.is_finite());

    Some(ParsedMode {
        code: code.to_owned(),
        mode: DecayMode::from_code(code),
        percent,
    })
}

/// Splits a cluster code such as `"14C"` into its mass number and element symbol.
pub fn parse_cluster_code(code: &str) -> Option<(u32, &str)> {
    let split = code.find(|c: char| !c.is_ascii_digit())?;
    let (mass, symbol) = code.split_at(split);
    let mass = mass.parse::<u32>().ok()?;

    let mut chars = symbol.chars();
    let first = chars.next()?;
    let rest = chars.as_str();
    let valid_symbol = first.is_ascii_uppercase()
        && rest.len() <= 2
        && rest.chars().all(|c| c.is_ascii_lowercase());

    (valid_symbol && mass > 4).then_some((mass, symbol))
}
