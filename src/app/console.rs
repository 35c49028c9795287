//! Text monitor: one line per tick plus free-form messages.

use ecotick_core::catalog::Catalog;
use ecotick_data::TickReport;
use std::collections::VecDeque;

/// Lines kept in the rolling console.
pub const CONSOLE_CAPACITY: usize = 300;

/// `"  12│ 🌱80Δ+2 | 🐰15Δ-1 | …"`, species in report order. Δ is births
/// minus deaths for the tick.
#[must_use]
pub fn format_tick_line(report: &TickReport, catalog: &Catalog) -> String {
    let parts: Vec<String> = report
        .species
        .iter()
        .map(|s| {
            let glyph = catalog.get(&s.id).map_or(s.id.as_str(), |sp| sp.glyph.as_str());
            let diff = i64::from(s.births) - i64::from(s.deaths);
            format!("{glyph}{}Δ{diff:+}", s.pop)
        })
        .collect();
    format!("{:>4}│ {}", report.time, parts.join(" | "))
}

#[derive(Debug, Clone)]
pub struct ConsoleLog {
    lines: VecDeque<String>,
    capacity: usize,
    /// Lines ever pushed, including evicted ones.
    pushed: u64,
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self::new(CONSOLE_CAPACITY)
    }
}

impl ConsoleLog {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            pushed: 0,
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
        self.pushed += 1;
    }

    /// Sequence number of the next line to be pushed.
    #[must_use]
    pub fn cursor(&self) -> u64 {
        self.pushed
    }

    /// Retained lines pushed at or after `cursor`.
    pub fn since(&self, cursor: u64) -> impl Iterator<Item = &str> {
        let newer = self.pushed.saturating_sub(cursor) as usize;
        self.lines
            .iter()
            .skip(self.lines.len().saturating_sub(newer))
            .map(String::as_str)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
