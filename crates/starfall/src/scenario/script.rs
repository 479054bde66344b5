//! Scenario script text format.
//!
//! Five sections separated by `%%` lines (a leading `%%` is allowed):
//!
//! ```text
//! %%
//! 1                      scenario id
//! %%
//! 0.0                    start time (seconds)
//! %%
//! 1 scout 3.0 26.0       <id> <type> <x> <y>
//! %%
//!                        reserved
//! %%
//! 0 spawn 1              <time> <command> <args>
//! 2 move 1 5.0 3.0
//! 3 fire 1
//! ```

use std::collections::BTreeMap;

use glam::Vec2;

use crate::entity::ship::ShipKind;
use crate::error::ScriptError;

const SECTIONS: usize = 5;

/// A ship the script may spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipDecl {
    pub kind: ShipKind,
    pub pos: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Spawn(u32),
    Move(u32, Vec2),
    Fire(u32),
}

/// One timed line. The command part is parsed when the line runs, so a bad
/// command only costs that line.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    /// 1-based line number in the source text.
    pub number: usize,
    /// Seconds after the scenario start.
    pub time: f32,
    text: String,
}

impl ScriptLine {
    pub fn new(number: usize, time: f32, text: impl Into<String>) -> Self {
        Self {
            number,
            time,
            text: text.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn command(&self) -> Result<Command, ScriptError> {
        let line = self.number;
        let mut words = self.text.split_whitespace();
        let name = words.next().ok_or_else(|| ScriptError::Malformed {
            line,
            message: "missing command".to_string(),
        })?;
        let args: Vec<&str> = words.collect();

        let command = match (name, args.as_slice()) {
            ("spawn", [ship]) => Command::Spawn(parse(line, "ship id", ship)?),
            ("fire", [ship]) => Command::Fire(parse(line, "ship id", ship)?),
            ("move", [ship, x, y]) => Command::Move(
                parse(line, "ship id", ship)?,
                Vec2::new(parse(line, "x", x)?, parse(line, "y", y)?),
            ),
            ("spawn" | "fire" | "move", _) => {
                return Err(ScriptError::Malformed {
                    line,
                    message: format!("wrong argument count for `{name}`"),
                })
            }
            _ => {
                return Err(ScriptError::UnknownCommand {
                    line,
                    command: name.to_string(),
                })
            }
        };
        Ok(command)
    }
}

fn parse<T: std::str::FromStr>(line: usize, what: &str, word: &str) -> Result<T, ScriptError> {
    word.parse().map_err(|_| ScriptError::Malformed {
        line,
        message: format!("bad {what} `{word}`"),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub id: u32,
    pub start_time: f32,
    pub ships: BTreeMap<u32, ShipDecl>,
    pub lines: Vec<ScriptLine>,
}

impl Script {
    /// Parse script text. Missing sections or a bad header fail the whole
    /// script; bad declarations and untimed lines are skipped with a warning.
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut sections: Vec<Vec<(usize, &str)>> = vec![Vec::new()];
        for (index, raw) in text.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed == "%%" {
                sections.push(Vec::new());
            } else if !trimmed.is_empty() {
                if let Some(section) = sections.last_mut() {
                    section.push((index + 1, trimmed));
                }
            }
        }
        if sections.len() == SECTIONS + 1 && sections[0].is_empty() {
            sections.remove(0);
        }
        if sections.len() != SECTIONS {
            return Err(ScriptError::Sections(sections.len()));
        }

        let id = header(&sections[0], "scenario id")?;
        let start_time = header(&sections[1], "start time")?;

        let mut ships = BTreeMap::new();
        for &(number, text) in &sections[2] {
            match declaration(number, text) {
                Ok((ship, decl)) => {
                    if ships.insert(ship, decl).is_some() {
                        log::warn!("scenario {id} line {number}: ship {ship} declared twice, keeping the last");
                    }
                }
                Err(err) => log::warn!("scenario {id}: skipping declaration: {err}"),
            }
        }

        let mut lines = Vec::new();
        for &(number, text) in &sections[4] {
            let (time, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
            match time.parse::<f32>() {
                Ok(time) if time.is_finite() => lines.push(ScriptLine::new(number, time, rest.trim())),
                _ => log::warn!("scenario {id} line {number}: dropping line with bad time `{time}`"),
            }
        }

        Ok(Self {
            id,
            start_time,
            ships,
            lines,
        })
    }

    /// Time of the last line, or 0 for an empty script.
    pub fn last_time(&self) -> f32 {
        self.lines.iter().map(|l| l.time).fold(0.0, f32::max)
    }
}

fn header<T: std::str::FromStr>(section: &[(usize, &str)], what: &str) -> Result<T, ScriptError> {
    match section {
        [(line, text)] => parse(*line, what, text),
        [] => Err(ScriptError::Malformed {
            line: 0,
            message: format!("missing {what}"),
        }),
        [(line, _), ..] => Err(ScriptError::Malformed {
            line: *line,
            message: format!("{what} section has more than one line"),
        }),
    }
}

fn declaration(line: usize, text: &str) -> Result<(u32, ShipDecl), ScriptError> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let [id, kind, x, y] = words.as_slice() else {
        return Err(ScriptError::Malformed {
            line,
            message: "expected `<id> <type> <x> <y>`".to_string(),
        });
    };
    let kind: ShipKind = kind.parse().map_err(|_| ScriptError::Malformed {
        line,
        message: format!("unknown ship type `{kind}`"),
    })?;
    if kind == ShipKind::Player {
        return Err(ScriptError::Malformed {
            line,
            message: "scripts cannot spawn the player".to_string(),
        });
    }
    Ok((
        parse(line, "ship id", id)?,
        ShipDecl {
            kind,
            pos: Vec2::new(parse(line, "x", x)?, parse(line, "y", y)?),
        },
    ))
}
