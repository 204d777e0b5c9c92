use crate::nuclide::HalfLife;

pub fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut pending_dash = false;

    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

pub fn format_percent(percent: Option<f64>) -> String {
    match percent {
        None => String::new(),
        Some(value) if value >= 1.0 => format!("{value:.1}%"),
        Some(value) if value >= 0.01 => format!("{value:.2}%"),
        Some(value) => format!("{value:.1e}%"),
    }
}

pub fn format_half_life(half_life: &HalfLife) -> String {
    match half_life.seconds {
        Some(seconds) if seconds.is_finite() && half_life.unit.as_deref() != Some("s") => {
            format!("{} ({seconds:.3e} s)", half_life.label)
        }
        _ => half_life.label.clone(),
    }
}
