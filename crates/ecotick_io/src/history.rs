use crate::error::Result;
use ecotick_core::events::{EcoEvent, EventKind};
use ecotick_data::{Season, TickReport};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// One line of `live.jsonl`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event")]
pub enum LiveEvent {
    /// Periodic population summary.
    Tick {
        time: u64,
        timestamp: String,
        season: Season,
        sunlight: f64,
        population: usize,
        births: u32,
        deaths: u32,
    },
    Extinction {
        time: u64,
        timestamp: String,
        species: String,
        prev_pop: usize,
    },
    Migration {
        time: u64,
        timestamp: String,
        species: String,
        count: u32,
    },
    /// Surges, collapses, birth bursts and die-offs.
    PopulationShift {
        time: u64,
        timestamp: String,
        species: String,
        kind: EventKind,
        prev_pop: usize,
        pop: usize,
        count: u32,
    },
    Reset {
        timestamp: String,
        seed: u32,
    },
    Restored {
        time: u64,
        timestamp: String,
    },
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

impl LiveEvent {
    #[must_use]
    pub fn tick(report: &TickReport) -> Self {
        Self::Tick {
            time: report.time,
            timestamp: now(),
            season: report.environment.season,
            sunlight: report.environment.sunlight,
            population: report.species.iter().map(|s| s.pop).sum(),
            births: report.total_births(),
            deaths: report.total_deaths(),
        }
    }

    #[must_use]
    pub fn from_eco(event: &EcoEvent) -> Self {
        let timestamp = now();
        let species = event.species.clone();
        match event.kind {
            EventKind::Extinction => Self::Extinction {
                time: event.time,
                timestamp,
                species,
                prev_pop: event.prev_pop,
            },
            EventKind::Arrival => Self::Migration {
                time: event.time,
                timestamp,
                species,
                count: event.count,
            },
            kind => Self::PopulationShift {
                time: event.time,
                timestamp,
                species,
                kind,
                prev_pop: event.prev_pop,
                pop: event.pop,
                count: event.count,
            },
        }
    }

    #[must_use]
    pub fn reset(seed: u32) -> Self {
        Self::Reset {
            timestamp: now(),
            seed,
        }
    }

    #[must_use]
    pub fn restored(time: u64) -> Self {
        Self::Restored {
            time,
            timestamp: now(),
        }
    }
}

/// Appends [`LiveEvent`]s to `<dir>/live.jsonl`.
pub struct EventLogger {
    live_file: Option<BufWriter<File>>,
    path: Option<PathBuf>,
}

impl EventLogger {
    pub fn new() -> Result<Self> {
        Self::new_at("logs")
    }

    pub fn new_at(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }
        let path = dir.join("live.jsonl");
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            live_file: Some(BufWriter::new(file)),
            path: Some(path),
        })
    }

    /// Logger that drops every event.
    #[must_use]
    pub fn dummy() -> Self {
        Self {
            live_file: None,
            path: None,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.live_file.is_some()
    }

    pub fn log_event(&mut self, event: &LiveEvent) -> Result<()> {
        if let Some(ref mut file) = self.live_file {
            let json = serde_json::to_string(event)?;
            writeln!(file, "{}", json)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Every readable event in the log, oldest first. Unparseable lines are
    /// skipped.
    pub fn read_all(&self) -> Result<Vec<LiveEvent>> {
        let Some(path) = &self.path else {
            return Ok(Vec::new());
        };
        let file = match File::open(path) {
            Ok(f) => f,
            Err(_) => return Ok(Vec::new()),
        };
        let events = BufReader::new(file)
            .lines()
            .map_while(std::io::Result::ok)
            .filter_map(|l| serde_json::from_str::<LiveEvent>(&l).ok())
            .collect();
        Ok(events)
    }
}
