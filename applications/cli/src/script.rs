//! Simulation script format
//!
//! One command per line; `#` starts a comment.
//!
//! ```text
//! play
//! advance 30
//! enqueue 2
//! next
//! preset Bass Boost
//! ```

use anyhow::{anyhow, bail, Context, Result};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    Play,
    Next,
    Prev,
    Select(usize),
    Seek(f64),
    Volume(f32),
    Rate(f32),
    Loop,
    Shuffle,
    Enqueue(usize),
    Dequeue(usize),
    Move { from: usize, to: usize },
    ClearQueue,
    Preset(String),
    Band { band: usize, gain_db: f32 },
    Eq(bool),
    Visualizer(bool),
    SkipIntro,
    /// Let simulated wall time pass
    Advance(f64),
    /// Block or allow `play()` on the transport
    Autoplay(bool),
    Theme,
    Reset,
}

impl FromStr for ScriptCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let mut args = rest.split_whitespace();

        let command = match word {
            "play" | "pause" => Self::Play,
            "next" => Self::Next,
            "prev" | "previous" => Self::Prev,
            "select" => Self::Select(arg(&mut args, "track index")?),
            "seek" => Self::Seek(arg(&mut args, "seconds")?),
            "volume" => Self::Volume(arg(&mut args, "volume")?),
            "rate" => Self::Rate(arg(&mut args, "rate")?),
            "loop" => Self::Loop,
            "shuffle" => Self::Shuffle,
            "enqueue" => Self::Enqueue(arg(&mut args, "track index")?),
            "dequeue" => Self::Dequeue(arg(&mut args, "track index")?),
            "move" => Self::Move {
                from: arg(&mut args, "from position")?,
                to: arg(&mut args, "to position")?,
            },
            "clear-queue" => Self::ClearQueue,
            "preset" if !rest.is_empty() => Self::Preset(rest.to_string()),
            "preset" => bail!("missing preset name"),
            "band" => Self::Band {
                band: arg(&mut args, "band index")?,
                gain_db: arg(&mut args, "gain")?,
            },
            "eq" => Self::Eq(switch(&mut args)?),
            "visualizer" => Self::Visualizer(switch(&mut args)?),
            "skip-intro" => Self::SkipIntro,
            "advance" => Self::Advance(arg(&mut args, "seconds")?),
            "autoplay" => Self::Autoplay(switch(&mut args)?),
            "theme" => Self::Theme,
            "reset" => Self::Reset,
            other => bail!("unknown command '{other}'"),
        };
        Ok(command)
    }
}

/// Parse a whole script, skipping blank lines and comments
pub fn parse_script(source: &str) -> Result<Vec<ScriptCommand>> {
    source
        .lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.split('#').next().unwrap_or_default().trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(n, line)| line.parse().with_context(|| format!("line {n}: '{line}'")))
        .collect()
}

fn arg<'a, T: FromStr>(args: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<T> {
    let raw = args.next().ok_or_else(|| anyhow!("missing {what}"))?;
    raw.parse().map_err(|_| anyhow!("invalid {what} '{raw}'"))
}

fn switch<'a>(args: &mut impl Iterator<Item = &'a str>) -> Result<bool> {
    match args.next() {
        Some("on") => Ok(true),
        Some("off") => Ok(false),
        Some(other) => bail!("expected on/off, got '{other}'"),
        None => bail!("expected on/off"),
    }
}
