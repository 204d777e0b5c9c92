use std::collections::HashMap;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use tracing::{debug, trace};

use super::modes::parse_cluster_code;
use super::parse::{LineRejection, parse_table_line};
use super::record::{NuclideRecord, nuclide_key};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CatalogBounds {
    pub min_n: u32,
    pub max_n: u32,
    pub min_z: u32,
    pub max_z: u32,
}

impl CatalogBounds {
    fn include(&mut self, protons: u32, neutrons: u32, first: bool) {
        if first {
            *self = Self {
                min_n: neutrons,
                max_n: neutrons,
                min_z: protons,
                max_z: protons,
            };
            return;
        }

        self.min_n = self.min_n.min(neutrons);
        self.max_n = self.max_n.max(neutrons);
        self.min_z = self.min_z.min(protons);
        self.max_z = self.max_z.max(protons);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub comments: usize,
    pub short_lines: usize,
    pub excited_states: usize,
    pub malformed: usize,
    pub duplicates: usize,
}

impl SkipCounts {
    pub fn total(&self) -> usize {
        self.comments + self.short_lines + self.excited_states + self.malformed + self.duplicates
    }
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    records: Vec<NuclideRecord>,
    index_by_key: HashMap<String, usize>,
    proton_by_symbol: HashMap<String, u32>,
    symbol_by_proton: HashMap<u32, String>,
    bounds: CatalogBounds,
    skipped: SkipCounts,
}

impl Catalog {
    pub fn from_table(raw: &str) -> Self {
        let mut catalog = Self::default();

        for (line_number, line) in raw.lines().enumerate() {
            let record = match parse_table_line(line) {
                Ok(record) => record,
                Err(rejection) => {
                    trace!(line = line_number + 1, %rejection, "skipping table line");
                    match rejection {
                        LineRejection::Comment => catalog.skipped.comments += 1,
                        LineRejection::TooShort(_) => catalog.skipped.short_lines += 1,
                        LineRejection::ExcitedState(_) => catalog.skipped.excited_states += 1,
                        LineRejection::Malformed(_) => catalog.skipped.malformed += 1,
                    }
                    continue;
                }
            };

            catalog.insert(record);
        }

        debug!(
            records = catalog.records.len(),
            skipped = catalog.skipped.total(),
            "parsed nuclide table"
        );
        catalog
    }

    fn insert(&mut self, record: NuclideRecord) {
        let key = record.key();
        if self.index_by_key.contains_key(&key) {
            self.skipped.duplicates += 1;
            return;
        }

        self.bounds
            .include(record.protons, record.neutrons, self.records.is_empty());
        self.proton_by_symbol
            .entry(record.symbol.clone())
            .or_insert(record.protons);
        self.symbol_by_proton
            .entry(record.protons)
            .or_insert_with(|| record.symbol.clone());
        self.index_by_key.insert(key, self.records.len());
        self.records.push(record);
    }

    pub fn records(&self) -> &[NuclideRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn bounds(&self) -> CatalogBounds {
        self.bounds
    }

    pub fn skipped(&self) -> SkipCounts {
        self.skipped
    }

    pub fn get(&self, key: &str) -> Option<&NuclideRecord> {
        self.index_by_key
            .get(key)
            .and_then(|&index| self.records.get(index))
    }

    pub fn get_by_coordinates(&self, protons: u32, neutrons: u32) -> Option<&NuclideRecord> {
        self.get(&nuclide_key(protons, neutrons))
    }

    pub fn proton_number(&self, symbol: &str) -> Option<u32> {
        self.proton_by_symbol.get(symbol).copied()
    }

    pub fn symbol(&self, protons: u32) -> Option<&str> {
        self.symbol_by_proton.get(&protons).map(String::as_str)
    }

    /// Daughter `(Z, N)` after `record` emits the cluster named by `code` (e.g. `14C`).
    pub fn cluster_daughter(&self, record: &NuclideRecord, code: &str) -> Option<(u32, u32)> {
        let (mass, symbol) = parse_cluster_code(code)?;
        let cluster_protons = self.proton_number(symbol)?;
        let cluster_neutrons = mass.checked_sub(cluster_protons)?;
        Some((
            record.protons.checked_sub(cluster_protons)?,
            record.neutrons.checked_sub(cluster_neutrons)?,
        ))
    }

    /// Display label for an arbitrary lattice point, known to the table or not.
    pub fn label_for(&self, protons: u32, neutrons: u32) -> String {
        match self.symbol(protons) {
            Some(symbol) => format!("{symbol}{}", protons + neutrons),
            None => format!("Z{protons} N{neutrons}"),
        }
    }

    pub fn search(&self, query: &str, limit: usize) -> Vec<&NuclideRecord> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let matcher = SkimMatcherV2::default();
        let mut scored = self
            .records
            .iter()
            .filter_map(|record| {
                matcher
                    .fuzzy_match(&record.label, query)
                    .or_else(|| {
                        matcher.fuzzy_match(
                            &record.label.to_ascii_lowercase(),
                            &query.to_ascii_lowercase(),
                        )
                    })
                    .map(|score| (score, record))
            })
            .collect::<Vec<_>>();

        scored.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then_with(|| a.1.label.len().cmp(&b.1.label.len()))
                .then_with(|| a.1.mass_number.cmp(&b.1.mass_number))
        });
        scored.truncate(limit);
        scored.into_iter().map(|(_, record)| record).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::nuclide::fixtures::{sample_table, table_line};

    #[test]
    fn keys_are_unique_and_first_seen_wins() {
        let table = [
            table_line(238, 92, '0', "U", "4.468", "Gy", "A=100"),
            table_line(238, 92, '0', "U", "1", "s", "B-=100"),
            table_line(235, 92, '0', "U", "704", "My", "A=100"),
        ]
        .join("\n");
        let catalog = Catalog::from_table(&table);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.skipped().duplicates, 1);
        let uranium = catalog.get("92-146").expect("U238 present");
        assert_eq!(uranium.half_life.label, "4.468 Gy");

        let keys = catalog
            .records()
            .iter()
            .map(|record| record.key())
            .collect::<HashSet<_>>();
        assert_eq!(keys.len(), catalog.len());
    }

    #[test]
    fn cluster_daughter_uses_the_cluster_element() {
        let table = [
            table_line(14, 6, '0', "C", "5.70", "ky", "B-=100"),
            table_line(223, 88, '0', "Ra", "11.43", "d", "A=100;14C=8.9e-8"),
        ]
        .join("\n");
        let catalog = Catalog::from_table(&table);
        let radium = catalog.get("88-135").expect("Ra223 present");

        assert_eq!(catalog.cluster_daughter(radium, "14C"), Some((82, 127)));
        assert_eq!(catalog.cluster_daughter(radium, "24Ne"), None, "Ne is not in the table");
        assert_eq!(catalog.cluster_daughter(radium, "B-"), None);
    }

    #[test]
    fn skips_are_counted_by_reason() {
        let table = [
            "# NUBASE-style table".to_owned(),
            "too short".to_owned(),
            table_line(1, 1, '0', "H", "stbl", "", "IS=99.9855 78"),
            table_line(238, 92, '2', "U", "280", "ns", "IT=100"),
        ]
        .join("\n");
        let catalog = Catalog::from_table(&table);

        assert_eq!(catalog.len(), 1);
        let skipped = catalog.skipped();
        assert_eq!(skipped.comments, 1);
        assert_eq!(skipped.short_lines, 1);
        assert_eq!(skipped.excited_states, 1);
        assert_eq!(skipped.total(), 3);
    }

    #[test]
    fn bounds_cover_all_records() {
        let catalog = Catalog::from_table(&sample_table());
        let bounds = catalog.bounds();

        for record in catalog.records() {
            assert!((bounds.min_n..=bounds.max_n).contains(&record.neutrons));
            assert!((bounds.min_z..=bounds.max_z).contains(&record.protons));
        }
        assert_eq!(bounds.min_z, 1);
        assert_eq!(bounds.max_z, 92);
    }

    #[test]
    fn symbols_and_labels() {
        let catalog = Catalog::from_table(&sample_table());
        assert_eq!(catalog.proton_number("Th"), Some(90));
        assert_eq!(catalog.symbol(92), Some("U"));
        assert_eq!(catalog.label_for(90, 144), "Th234");
        assert_eq!(catalog.label_for(130, 200), "Z130 N200");
    }

    #[test]
    fn fuzzy_search_prefers_close_labels() {
        let catalog = Catalog::from_table(&sample_table());
        let results = catalog.search("U238", 5);
        assert_eq!(results.first().map(|record| record.key()), Some("92-146".to_owned()));
        assert!(catalog.search("   ", 5).is_empty());
    }
}
