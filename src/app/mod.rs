pub mod console;
pub mod input;
pub mod scheduler;
pub mod shutdown;
pub mod state;

pub use input::Command;
pub use scheduler::{RunState, Scheduler};
pub use shutdown::ShutdownManager;
pub use state::Simulation;

use ecotick_core::config::{LoggingConfig, PersistenceConfig};
use ecotick_core::stats::{rate_symbol, Trend};
use ecotick_io::{EventLogger, JsonFileStore, MemoryStore, SnapshotStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

/// File store when persistence is enabled, otherwise a throwaway memory store.
pub fn open_store(config: &PersistenceConfig) -> Arc<dyn SnapshotStore> {
    if config.enabled {
        Arc::new(JsonFileStore::new(&config.path))
    } else {
        Arc::new(MemoryStore::new())
    }
}

/// Event log under `event_log_dir`, or a dummy when it is empty or unusable.
pub fn open_event_log(config: &LoggingConfig) -> EventLogger {
    if config.event_log_dir.trim().is_empty() {
        return EventLogger::dummy();
    }
    EventLogger::new_at(&config.event_log_dir).unwrap_or_else(|e| {
        tracing::warn!(dir = %config.event_log_dir, error = %e, "Event log disabled");
        EventLogger::dummy()
    })
}

/// Events listed under the species table.
const STATS_RECENT_EVENTS: usize = 5;

/// Multi-line species table for the `stats` command, followed by the latest
/// population events.
#[must_use]
pub fn stats_table(sim: &Simulation) -> String {
    let catalog = sim.engine().catalog();
    let env = sim.engine().environment();
    let mut out = format!(
        "tick {} {} {:?} sunlight {}% {}\n",
        sim.time(),
        env.season.icon(),
        env.season,
        env.sunlight_percent(),
        env.sunlight_icon(),
    );
    for s in sim.stats() {
        let glyph = catalog.get(&s.id).map_or("?", |sp| sp.glyph.as_str());
        out.push_str(&format!(
            "{glyph} {:<9} {:>4}  {:>5.1}%  {:?} {:?}  {}{:.2} {}\n",
            s.id,
            s.pop,
            s.health_pct,
            s.role,
            s.energy_status,
            rate_symbol(s.growth_rate),
            s.growth_rate,
            Trend::from_slope(s.trend).symbol(),
        ));
    }
    let recent: Vec<_> = sim.recent_events().collect();
    if !recent.is_empty() {
        out.push_str("recent:\n");
        for event in recent.iter().rev().take(STATS_RECENT_EVENTS).rev() {
            out.push_str(&format!("  {:>4} {event}\n", event.time));
        }
    }
    out
}

fn print_new_lines(scheduler: &Scheduler, cursor: &mut u64) {
    scheduler.with_sim(|sim| {
        for line in sim.console().since(*cursor) {
            println!("{line}");
        }
        *cursor = sim.console().cursor();
    });
}

/// Interactive loop: reads commands from stdin and echoes the console.
pub async fn run_interactive(mut scheduler: Scheduler, shutdown: ShutdownManager) {
    println!("{}", input::HELP);
    let mut cursor = 0;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut refresh = tokio::time::interval(Duration::from_millis(100));

    while !shutdown.is_shutdown_requested() {
        tokio::select! {
            () = shutdown.requested() => break,
            _ = refresh.tick() => print_new_lines(&scheduler, &mut cursor),
            line = lines.next_line() => {
                let Ok(Some(line)) = line else {
                    break;
                };
                let Some(command) = Command::parse(&line) else {
                    if !line.trim().is_empty() {
                        println!("unknown command, try `help`");
                    }
                    continue;
                };
                match command {
                    Command::Start => scheduler.start(),
                    Command::Stop => {
                        scheduler.stop().await;
                    }
                    Command::Reset => {
                        let seed = scheduler.reset().await;
                        tracing::info!(seed, "Simulation reset");
                    }
                    Command::Save => {
                        let ok = scheduler.save();
                        println!("{}", if ok { "saved" } else { "save failed" });
                    }
                    Command::Speed(level) => scheduler.set_speed(level).await,
                    Command::FastForward(n) => scheduler.fast_forward(n),
                    Command::Add { species, count } => {
                        if scheduler.add_individuals(&species, count) == 0 {
                            println!("nothing added");
                        }
                    }
                    Command::Stats => print!("{}", scheduler.with_sim(|sim| stats_table(sim))),
                    Command::Help => println!("{}", input::HELP),
                    Command::Quit => shutdown.request_shutdown(),
                }
                print_new_lines(&scheduler, &mut cursor);
            }
        }
    }

    shutdown.cleanup(&mut scheduler).await;
}

/// Runs `ticks` ticks as fast as possible, or until shutdown, then saves.
pub async fn run_headless(mut scheduler: Scheduler, shutdown: ShutdownManager, ticks: u64) {
    const BATCH: u64 = 100;
    let mut done = 0;
    while done < ticks && !shutdown.is_shutdown_requested() {
        let n = BATCH.min(ticks - done);
        scheduler.fast_forward(n as u32);
        done += n;
        tokio::task::yield_now().await;
    }
    let (time, population) = scheduler.with_sim(|sim| {
        (sim.time(), sim.engine().populations().total())
    });
    tracing::info!(ticks = done, time, population, "Headless run finished");
    print!("{}", scheduler.with_sim(|sim| stats_table(sim)));
    shutdown.cleanup(&mut scheduler).await;
}
