use serde::{Deserialize, Serialize};

/// Catalog key of a species (`"plant"`, `"fox"`, ...).
pub type SpeciesId = String;

/// Biological parameters of one species.
///
/// Records are supplied by the catalog and never mutated by the engine.
/// `glyph`, `color` and `facts` are carried through for presentation only.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Species {
    pub id: SpeciesId,
    pub name: String,
    pub glyph: String,
    pub color: String,
    #[serde(default)]
    pub facts: String,
    /// Producers photosynthesise instead of eating.
    pub is_producer: bool,
    /// Prey species ids. Empty iff `is_producer`.
    #[serde(default)]
    pub diet: Vec<SpeciesId>,
    pub eat_rate: f64,
    pub breed_rate: f64,
    pub death_rate: f64,
    pub eat_gain: f64,
    pub max_energy: f64,
    /// Flat energy loss per tick for consumers.
    pub metabolism: f64,
    /// Consumers must hold strictly more energy than this to attempt breeding.
    pub breed_threshold: f64,
    /// Energy gained per tick at sunlight 1.0 (producers only).
    #[serde(default)]
    pub photo_rate: f64,
    pub max_age: u64,
    /// Individuals seeded on a fresh start.
    pub start_pop: usize,
}

impl Species {
    #[must_use]
    pub fn is_consumer(&self) -> bool {
        !self.is_producer
    }

    #[must_use]
    pub fn eats(&self, prey: &str) -> bool {
        self.diet.iter().any(|d| d == prey)
    }
}

impl Default for Species {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            glyph: "?".to_string(),
            color: "#ffffff".to_string(),
            facts: String::new(),
            is_producer: false,
            diet: Vec::new(),
            eat_rate: 0.0,
            breed_rate: 0.0,
            death_rate: 0.0,
            eat_gain: 0.0,
            max_energy: 10.0,
            metabolism: 1.0,
            breed_threshold: 0.0,
            photo_rate: 0.0,
            max_age: 100,
            start_pop: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eats_checks_diet() {
        let fox = Species {
            id: "fox".into(),
            diet: vec!["rabbit".into(), "mouse".into()],
            ..Species::default()
        };
        assert!(fox.eats("rabbit"));
        assert!(!fox.eats("plant"));
        assert!(fox.is_consumer());
    }

    #[test]
    fn test_missing_optional_fields_deserialize() {
        let json = r##"{
            "id": "plant", "name": "Plant", "glyph": "*", "color": "#33cc33",
            "is_producer": true, "eat_rate": 0.0, "breed_rate": 0.25,
            "death_rate": 0.01, "eat_gain": 0.0, "max_energy": 12.0,
            "metabolism": 0.0, "breed_threshold": 2.0, "max_age": 400,
            "start_pop": 80
        }"##;
        let plant: Species = serde_json::from_str(json).unwrap();
        assert!(plant.diet.is_empty());
        assert_eq!(plant.photo_rate, 0.0);
        assert!(plant.facts.is_empty());
    }
}
