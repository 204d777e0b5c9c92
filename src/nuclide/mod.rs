mod catalog;
mod half_life;
mod index;
mod load;
mod modes;
mod parse;
mod record;

pub use catalog::Catalog;
pub use half_life::HalfLife;
pub use index::{DecayBranch, DecayIndex};
pub use load::{load_catalog, load_decay_index};
pub use modes::{DecayMode, FISSION_FIRMNESS_FLOOR, parse_decay_modes};
pub use record::{HalfLifeCategory, NuclideRecord, nuclide_key, parse_key};
