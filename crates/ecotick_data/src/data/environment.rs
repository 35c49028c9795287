use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Season {
    #[default]
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [
        Season::Spring,
        Season::Summer,
        Season::Autumn,
        Season::Winter,
    ];

    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            Season::Spring => "🌸 Spring",
            Season::Summer => "☀️ Summer",
            Season::Autumn => "🍂 Autumn",
            Season::Winter => "❄️ Winter",
        }
    }
}

/// Environmental conditions for the current tick.
///
/// Derived wholly from the tick counter; see `ecotick_core::environment`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    /// Photosynthesis multiplier, always within `[0.7, 1.3]`.
    pub sunlight: f64,
    pub season: Season,
    /// Position within the seasonal period.
    pub cycle_day: u64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            sunlight: 1.0,
            season: Season::Spring,
            cycle_day: 0,
        }
    }
}

impl Environment {
    #[must_use]
    pub fn sunlight_percent(&self) -> u32 {
        (self.sunlight * 100.0).round() as u32
    }

    #[must_use]
    pub fn sunlight_icon(&self) -> &'static str {
        match self.sunlight_percent() {
            p if p > 100 => "☀️",
            p if p < 90 => "⛅",
            _ => "🌤️",
        }
    }
}
