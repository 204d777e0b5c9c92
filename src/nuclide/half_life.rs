use super::record::HalfLifeCategory;

pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const SECONDS_PER_YEAR: f64 = 365.2422 * SECONDS_PER_DAY;

const UNIT_SECONDS: [(&str, f64); 21] = [
    ("ys", 1e-24),
    ("zs", 1e-21),
    ("as", 1e-18),
    ("fs", 1e-15),
    ("ps", 1e-12),
    ("ns", 1e-9),
    ("us", 1e-6),
    ("ms", 1e-3),
    ("s", 1.0),
    ("m", 60.0),
    ("h", 3_600.0),
    ("d", SECONDS_PER_DAY),
    ("y", SECONDS_PER_YEAR),
    ("ky", 1e3 * SECONDS_PER_YEAR),
    ("My", 1e6 * SECONDS_PER_YEAR),
    ("Gy", 1e9 * SECONDS_PER_YEAR),
    ("Ty", 1e12 * SECONDS_PER_YEAR),
    ("Py", 1e15 * SECONDS_PER_YEAR),
    ("Ey", 1e18 * SECONDS_PER_YEAR),
    ("Zy", 1e21 * SECONDS_PER_YEAR),
    ("Yy", 1e24 * SECONDS_PER_YEAR),
];

#[derive(Clone, Debug, PartialEq)]
pub struct HalfLife {
    pub label: String,
    /// `None` when unknown or particle unstable, `+∞` for stable nuclides.
    pub seconds: Option<f64>,
    pub unit: Option<String>,
    pub category: HalfLifeCategory,
}

impl HalfLife {
    fn unknown() -> Self {
        Self {
            label: "unknown".to_owned(),
            seconds: None,
            unit: None,
            category: HalfLifeCategory::Unknown,
        }
    }
}

pub fn unit_seconds(unit: &str) -> Option<f64> {
    UNIT_SECONDS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, seconds)| *seconds)
}

pub fn categorize(seconds: f64) -> HalfLifeCategory {
    if seconds >= SECONDS_PER_YEAR {
        HalfLifeCategory::Long
    } else if seconds >= SECONDS_PER_DAY {
        HalfLifeCategory::Medium
    } else if seconds >= 1.0 {
        HalfLifeCategory::Short
    } else {
        HalfLifeCategory::Instant
    }
}

pub fn parse_half_life(value: &str, unit: &str) -> HalfLife {
    let value = value.trim();
    let unit = unit.trim();

    match value {
        "stbl" => {
            return HalfLife {
                label: "stable".to_owned(),
                seconds: Some(f64::INFINITY),
                unit: None,
                category: HalfLifeCategory::Stable,
            };
        }
        "p-unst" => {
            return HalfLife {
                label: "particle unstable".to_owned(),
                seconds: None,
                unit: None,
                category: HalfLifeCategory::Unstable,
            };
        }
        _ => {}
    }

    let cleaned = value
        .trim_start_matches(['~', '<', '>'])
        .trim_end_matches('#')
        .trim();
    let Ok(amount) = cleaned.parse::<f64>() else {
        return HalfLife::unknown();
    };
    let Some(scale) = unit_seconds(unit) else {
        return HalfLife::unknown();
    };
    if !amount.is_finite() || amount < 0.0 {
        return HalfLife::unknown();
    }

    let seconds = amount * scale;
    HalfLife {
        label: format!("{cleaned} {unit}"),
        seconds: Some(seconds),
        unit: Some(unit.to_owned()),
        category: categorize(seconds),
    }
}
