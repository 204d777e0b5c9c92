use thiserror::Error;

use super::half_life::parse_half_life;
use super::modes::parse_decay_modes;
use super::record::{DecayCategory, NuclideRecord};

pub(super) const MIN_LINE_WIDTH: usize = 90;

const MASS_COLUMNS: (usize, usize) = (0, 3);
const PROTON_COLUMNS: (usize, usize) = (4, 7);
const ISOMER_COLUMN: usize = 7;
const ELEMENT_COLUMNS: (usize, usize) = (11, 16);
const HALF_LIFE_COLUMNS: (usize, usize) = (69, 78);
const HALF_LIFE_UNIT_COLUMNS: (usize, usize) = (78, 80);
const SPIN_PARITY_COLUMNS: (usize, usize) = (88, 102);
const DISCOVERY_YEAR_COLUMNS: (usize, usize) = (114, 118);
const DECAY_MODES_START: usize = 119;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub(super) enum LineRejection {
    #[error("comment line")]
    Comment,
    #[error("line is {0} columns, shorter than the minimum of {MIN_LINE_WIDTH}")]
    TooShort(usize),
    #[error("excited isomeric state (flag {0:?})")]
    ExcitedState(char),
    #[error("malformed {0} column")]
    Malformed(&'static str),
}

fn column(line: &str, (start, end): (usize, usize)) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("").trim()
}

pub(super) fn parse_table_line(line: &str) -> Result<NuclideRecord, LineRejection> {
    if line.starts_with('#') {
        return Err(LineRejection::Comment);
    }
    if line.len() < MIN_LINE_WIDTH {
        return Err(LineRejection::TooShort(line.len()));
    }

    let isomer = line
        .get(ISOMER_COLUMN..=ISOMER_COLUMN)
        .and_then(|flag| flag.chars().next())
        .unwrap_or('0');
    if isomer != '0' {
        return Err(LineRejection::ExcitedState(isomer));
    }

    let mass_number = column(line, MASS_COLUMNS)
        .parse::<u32>()
        .map_err(|_| LineRejection::Malformed("mass number"))?;
    let protons = column(line, PROTON_COLUMNS)
        .parse::<u32>()
        .map_err(|_| LineRejection::Malformed("proton count"))?;
    let neutrons = mass_number
        .checked_sub(protons)
        .ok_or(LineRejection::Malformed("mass number"))?;

    let symbol = column(line, ELEMENT_COLUMNS)
        .chars()
        .filter(char::is_ascii_alphabetic)
        .collect::<String>();
    if symbol.is_empty() {
        return Err(LineRejection::Malformed("element"));
    }

    let half_life = parse_half_life(
        column(line, HALF_LIFE_COLUMNS),
        column(line, HALF_LIFE_UNIT_COLUMNS),
    );
    let spin_parity = column(line, SPIN_PARITY_COLUMNS).to_owned();
    let discovery_year = column(line, DISCOVERY_YEAR_COLUMNS).parse::<u16>().ok();
    let decay_modes_text = line
        .get(DECAY_MODES_START..)
        .unwrap_or("")
        .trim()
        .to_owned();
    let decay_category = DecayCategory::from_modes(&parse_decay_modes(&decay_modes_text));

    Ok(NuclideRecord {
        protons,
        neutrons,
        mass_number,
        label: format!("{symbol}{mass_number}"),
        symbol,
        half_life,
        spin_parity,
        discovery_year,
        decay_modes_text,
        decay_category,
    })
}
