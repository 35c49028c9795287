//! Line commands for the interactive mode.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Reset,
    Save,
    Speed(u8),
    FastForward(u32),
    Add { species: String, count: usize },
    Stats,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  start | stop | reset | save
  speed <1-10>
  ff [ticks]            run ticks at once (default 20)
  add <species> [count] (default 1)
  stats | help | quit";

impl Command {
    /// Parses one input line. Unknown or malformed input yields `None`.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let head = words.next()?.to_ascii_lowercase();
        let arg = words.next();

        let command = match head.as_str() {
            "start" | "go" => Self::Start,
            "stop" | "pause" => Self::Stop,
            "reset" => Self::Reset,
            "save" => Self::Save,
            "speed" => Self::Speed(arg?.parse().ok()?),
            "ff" | "fast" => Self::FastForward(arg.map_or(Some(20), |a| a.parse().ok())?),
            "add" => Self::Add {
                species: arg?.to_string(),
                count: words.next().map_or(Some(1), |c| c.parse().ok())?,
            },
            "stats" => Self::Stats,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => return None,
        };
        Some(command)
    }
}
