pub mod macros;

use ecotick_core::catalog::Catalog;
use ecotick_core::config::EngineConfig;
use ecotick_core::engine::Engine;
use ecotick_core::rng::RandomSource;
use ecotick_data::Species;

#[allow(dead_code)]
pub struct EngineBuilder {
    config: EngineConfig,
    species: Option<Vec<Species>>,
    seed: u32,
    initial: Vec<(String, usize)>,
}

#[allow(dead_code)]
impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            species: None,
            seed: 42,
            initial: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut EngineConfig),
    {
        modifier(&mut self.config);
        self
    }

    /// Replaces the default catalog.
    pub fn with_species(mut self, species: Species) -> Self {
        self.species.get_or_insert_with(Vec::new).push(species);
        self
    }

    /// Extra individuals added after seeding.
    pub fn with_individuals(mut self, id: &str, count: usize) -> Self {
        self.initial.push((id.to_string(), count));
        self
    }

    pub fn catalog(&self) -> Catalog {
        self.species
            .clone()
            .map_or_else(Catalog::default_catalog, Catalog::new)
    }

    pub fn build(self) -> Engine {
        let catalog = self.catalog();
        let mut engine = Engine::new(catalog, self.config, self.seed);
        for (id, count) in &self.initial {
            engine.add_individuals(id, *count);
        }
        engine
    }
}

#[allow(dead_code)]
pub struct SpeciesBuilder {
    species: Species,
}

#[allow(dead_code)]
impl SpeciesBuilder {
    pub fn producer(id: &str) -> Self {
        Self {
            species: Species {
                id: id.to_string(),
                name: id.to_string(),
                is_producer: true,
                breed_rate: 0.25,
                death_rate: 0.01,
                max_energy: 12.0,
                photo_rate: 0.6,
                max_age: 400,
                ..Species::default()
            },
        }
    }

    pub fn consumer(id: &str, diet: &[&str]) -> Self {
        Self {
            species: Species {
                id: id.to_string(),
                name: id.to_string(),
                is_producer: false,
                diet: diet.iter().map(|d| (*d).to_string()).collect(),
                eat_rate: 0.2,
                breed_rate: 0.1,
                death_rate: 0.02,
                eat_gain: 5.0,
                max_energy: 15.0,
                metabolism: 1.0,
                breed_threshold: 6.0,
                max_age: 300,
                ..Species::default()
            },
        }
    }

    pub fn start_pop(mut self, n: usize) -> Self {
        self.species.start_pop = n;
        self
    }

    pub fn rates(mut self, eat: f64, breed: f64, death: f64) -> Self {
        self.species.eat_rate = eat;
        self.species.breed_rate = breed;
        self.species.death_rate = death;
        self
    }

    pub fn max_age(mut self, age: u64) -> Self {
        self.species.max_age = age;
        self
    }

    pub fn metabolism(mut self, m: f64) -> Self {
        self.species.metabolism = m;
        self
    }

    pub fn build(self) -> Species {
        self.species
    }
}

/// Replays a fixed list of rolls, then repeats `fallback`.
#[allow(dead_code)]
pub struct ScriptedRng {
    rolls: Vec<f64>,
    pos: usize,
    fallback: f64,
}

#[allow(dead_code)]
impl ScriptedRng {
    pub fn new(rolls: Vec<f64>, fallback: f64) -> Self {
        Self {
            rolls,
            pos: 0,
            fallback,
        }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(Vec::new(), value)
    }

    /// Draws consumed so far.
    pub fn draws(&self) -> usize {
        self.pos
    }
}

impl RandomSource for ScriptedRng {
    fn reseed(&mut self, _seed: u32) {
        self.pos = 0;
    }

    fn next_f64(&mut self) -> f64 {
        let value = self.rolls.get(self.pos).copied().unwrap_or(self.fallback);
        self.pos += 1;
        value
    }
}
