//! Capped rolling history of per-species and global samples.

pub use ecotick_data::{GlobalSample, SpeciesSample};
use ecotick_data::SpeciesId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// FIFO buffer holding at most `cap` entries; the oldest entry is dropped on
/// overflow.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CappedSeries<T> {
    cap: usize,
    items: VecDeque<T>,
}

impl<T> CappedSeries<T> {
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self {
            cap: cap.max(1),
            items: VecDeque::with_capacity(cap.clamp(1, 1024)),
        }
    }

    pub fn push(&mut self, item: T) {
        while self.items.len() >= self.cap {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    #[must_use]
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Changes the cap, evicting oldest entries if needed.
    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap.max(1);
        while self.items.len() > self.cap {
            self.items.pop_front();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.items.back()
    }

    /// Up to `n` most recent entries, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &T> {
        self.items.iter().skip(self.items.len().saturating_sub(n))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Clone> CappedSeries<T> {
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct History {
    cap: usize,
    species: BTreeMap<SpeciesId, CappedSeries<SpeciesSample>>,
    global: CappedSeries<GlobalSample>,
}

impl History {
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            species: BTreeMap::new(),
            global: CappedSeries::new(cap),
        }
    }

    #[must_use]
    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap;
        for series in self.species.values_mut() {
            series.set_cap(cap);
        }
        self.global.set_cap(cap);
    }

    pub fn record_species(&mut self, id: &str, sample: SpeciesSample) {
        let cap = self.cap;
        self.species
            .entry(id.to_string())
            .or_insert_with(|| CappedSeries::new(cap))
            .push(sample);
    }

    pub fn record_global(&mut self, sample: GlobalSample) {
        self.global.push(sample);
    }

    #[must_use]
    pub fn species(&self, id: &str) -> Option<&CappedSeries<SpeciesSample>> {
        self.species.get(id)
    }

    #[must_use]
    pub fn global(&self) -> &CappedSeries<GlobalSample> {
        &self.global
    }

    /// Population series for one species, oldest first.
    #[must_use]
    pub fn pop_series(&self, id: &str) -> Vec<usize> {
        self.species(id)
            .map(|s| s.iter().map(|x| x.pop).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.species.values().all(CappedSeries::is_empty)
    }

    pub fn clear(&mut self) {
        self.species.clear();
        self.global.clear();
    }
}
