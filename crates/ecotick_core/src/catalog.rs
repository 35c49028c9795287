//! Species catalog: ordered, read-only table of species parameters.
//!
//! Catalog order is the engine's species iteration order. Malformed entries
//! are reported as [`CatalogWarning`]s and otherwise used as given.

use ecotick_data::{Species, SpeciesId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogWarning {
    DanglingDiet { species: SpeciesId, prey: SpeciesId },
    ProbabilityOutOfRange { species: SpeciesId, field: &'static str, value: f64 },
    NegativeField { species: SpeciesId, field: &'static str, value: f64 },
    ProducerWithDiet { species: SpeciesId },
    ConsumerWithoutDiet { species: SpeciesId },
    SelfPredation { species: SpeciesId },
    DuplicateId { species: SpeciesId },
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingDiet { species, prey } => {
                write!(f, "{species}: diet references unknown species '{prey}'")
            }
            Self::ProbabilityOutOfRange { species, field, value } => {
                write!(f, "{species}: {field} = {value} is outside [0, 1]")
            }
            Self::NegativeField { species, field, value } => {
                write!(f, "{species}: {field} = {value} is negative")
            }
            Self::ProducerWithDiet { species } => {
                write!(f, "{species}: producer declares a diet, which is ignored")
            }
            Self::ConsumerWithoutDiet { species } => {
                write!(f, "{species}: consumer has an empty diet and can never feed")
            }
            Self::SelfPredation { species } => write!(f, "{species}: diet includes itself"),
            Self::DuplicateId { species } => write!(f, "{species}: duplicate species id"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    species: Vec<Species>,
}

impl Catalog {
    #[must_use]
    pub fn new(species: Vec<Species>) -> Self {
        Self { species }
    }

    /// Parses a catalog from TOML `[[species]]` tables.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let catalog = toml::from_str::<Self>(content)?;
        Ok(catalog)
    }

    #[must_use]
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub fn iter(&self) -> impl Iterator<Item = &Species> {
        self.species.iter()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Species> {
        self.species.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.species.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn producers(&self) -> impl Iterator<Item = &Species> {
        self.species.iter().filter(|s| s.is_producer)
    }

    pub fn consumers(&self) -> impl Iterator<Item = &Species> {
        self.species.iter().filter(|s| !s.is_producer)
    }

    /// Checks every record. Never fails; problems come back as warnings.
    #[must_use]
    pub fn validate(&self) -> Vec<CatalogWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for s in &self.species {
            if !seen.insert(s.id.as_str()) {
                warnings.push(CatalogWarning::DuplicateId {
                    species: s.id.clone(),
                });
            }

            for prey in &s.diet {
                if !self.contains(prey) {
                    warnings.push(CatalogWarning::DanglingDiet {
                        species: s.id.clone(),
                        prey: prey.clone(),
                    });
                }
            }
            if s.eats(&s.id) {
                warnings.push(CatalogWarning::SelfPredation {
                    species: s.id.clone(),
                });
            }
            if s.is_producer && !s.diet.is_empty() {
                warnings.push(CatalogWarning::ProducerWithDiet {
                    species: s.id.clone(),
                });
            }
            if !s.is_producer && s.diet.is_empty() {
                warnings.push(CatalogWarning::ConsumerWithoutDiet {
                    species: s.id.clone(),
                });
            }

            for (field, value) in [
                ("eat_rate", s.eat_rate),
                ("breed_rate", s.breed_rate),
                ("death_rate", s.death_rate),
            ] {
                if !(0.0..=1.0).contains(&value) {
                    warnings.push(CatalogWarning::ProbabilityOutOfRange {
                        species: s.id.clone(),
                        field,
                        value,
                    });
                }
            }

            for (field, value) in [
                ("eat_gain", s.eat_gain),
                ("max_energy", s.max_energy),
                ("metabolism", s.metabolism),
                ("breed_threshold", s.breed_threshold),
                ("photo_rate", s.photo_rate),
            ] {
                if value < 0.0 {
                    warnings.push(CatalogWarning::NegativeField {
                        species: s.id.clone(),
                        field,
                        value,
                    });
                }
            }
        }
        warnings
    }

    /// Validates and logs each warning. Returns the warning count.
    pub fn log_warnings(&self) -> usize {
        let warnings = self.validate();
        for w in &warnings {
            tracing::warn!(warning = %w, "Catalog warning");
        }
        warnings.len()
    }

    /// The seven-species woodland food web.
    #[must_use]
    pub fn default_catalog() -> Self {
        let consumer = |id: &str,
                        name: &str,
                        glyph: &str,
                        color: &str,
                        diet: &[&str],
                        rates: (f64, f64, f64),
                        max_age: u64,
                        energy: (f64, f64, f64),
                        start_pop: usize,
                        facts: &str| Species {
            id: id.to_string(),
            name: name.to_string(),
            glyph: glyph.to_string(),
            color: color.to_string(),
            facts: facts.to_string(),
            is_producer: false,
            diet: diet.iter().map(|d| (*d).to_string()).collect(),
            eat_rate: rates.0,
            breed_rate: rates.1,
            death_rate: rates.2,
            max_energy: energy.0,
            eat_gain: energy.1,
            breed_threshold: energy.2,
            metabolism: 1.0,
            photo_rate: 0.0,
            max_age,
            start_pop,
        };

        Self::new(vec![
            Species {
                id: "plant".to_string(),
                name: "Plant".to_string(),
                glyph: "🌱".to_string(),
                color: "#33cc33".to_string(),
                facts: "Primary producer that converts sunlight into energy, forming the foundation of the ecosystem.".to_string(),
                is_producer: true,
                diet: Vec::new(),
                eat_rate: 0.0,
                breed_rate: 0.25,
                death_rate: 0.01,
                eat_gain: 0.0,
                max_energy: 12.0,
                metabolism: 0.0,
                breed_threshold: 2.0,
                photo_rate: 0.6,
                max_age: 400,
                start_pop: 80,
            },
            consumer(
                "rabbit", "Rabbit", "🐰", "#cccccc", &["plant"],
                (0.20, 0.10, 0.02), 300, (15.0, 5.0, 6.0), 15,
                "Fast-breeding herbivores that feed on plants and are prey for many predators.",
            ),
            consumer(
                "mouse", "Mouse", "🐭", "#ffff66", &["plant"],
                (0.15, 0.12, 0.02), 250, (12.0, 4.0, 5.0), 20,
                "Small rodents that consume plants and seeds. Prolific breeders and an important food source for predators.",
            ),
            consumer(
                "hedgehog", "Hedgehog", "🦔", "#996633", &["plant", "bug"],
                (0.18, 0.05, 0.015), 450, (20.0, 6.0, 8.0), 8,
                "Small omnivorous mammals that eat both plants and insects. They help control pest populations.",
            ),
            consumer(
                "bug", "Bug", "🐞", "#ff4dff", &["plant"],
                (0.25, 0.20, 0.05), 100, (8.0, 3.0, 3.0), 30,
                "Small insects that feed on plants and serve as food for many other animals.",
            ),
            consumer(
                "fox", "Fox", "🦊", "#ff6600", &["rabbit", "mouse", "hedgehog"],
                (0.12, 0.03, 0.01), 500, (25.0, 8.0, 10.0), 3,
                "Cunning predator that hunts small mammals, helping to keep prey populations in check.",
            ),
            consumer(
                "owl", "Owl", "🦉", "#cc9966", &["mouse", "bug"],
                (0.15, 0.025, 0.008), 450, (22.0, 7.0, 9.0), 4,
                "Nocturnal predator specializing in hunting mice and insects, an important controller of rodent populations.",
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_clean() {
        let catalog = Catalog::default_catalog();
        assert_eq!(catalog.len(), 7);
        assert!(catalog.validate().is_empty(), "{:?}", catalog.validate());
        assert_eq!(catalog.producers().count(), 1);
    }

    #[test]
    fn test_dangling_diet_is_warning() {
        let catalog = Catalog::new(vec![Species {
            id: "wolf".into(),
            diet: vec!["sheep".into()],
            ..Species::default()
        }]);
        let warnings = catalog.validate();
        assert!(warnings.contains(&CatalogWarning::DanglingDiet {
            species: "wolf".into(),
            prey: "sheep".into()
        }));
    }

    #[test]
    fn test_out_of_range_and_negative_fields() {
        let catalog = Catalog::new(vec![Species {
            id: "odd".into(),
            is_producer: true,
            breed_rate: 1.5,
            metabolism: -1.0,
            ..Species::default()
        }]);
        let warnings = catalog.validate();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].to_string().contains("breed_rate"));
        assert!(warnings[1].to_string().contains("metabolism"));
    }

    #[test]
    fn test_catalog_from_toml() {
        let catalog = Catalog::from_toml(
            r##"
            [[species]]
            id = "grass"
            name = "Grass"
            glyph = "\""
            color = "#00ff00"
            is_producer = true
            eat_rate = 0.0
            breed_rate = 0.3
            death_rate = 0.01
            eat_gain = 0.0
            max_energy = 10.0
            metabolism = 0.0
            breed_threshold = 0.0
            photo_rate = 0.5
            max_age = 200
            start_pop = 40
            "##,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("grass").map(|s| s.start_pop), Some(40));
    }
}
