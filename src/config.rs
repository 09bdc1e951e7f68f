//! Room and exam-session configuration.
//!
//! Configuration arrives as JSON, either from a file (CLI) or inside the
//! generation request (web). Everything is validated up front so that a bad
//! configuration never produces a partial plan.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{Result, SeatingError};
use crate::roster::YearLabel;

pub const DEFAULT_BRANCH_NAME: &str = "Unknown Branch";
const DEFAULT_SEATING_PATTERN: &str = "IV Yr, III Yr, II Yr, I Yr";

fn default_branch_name() -> String {
    DEFAULT_BRANCH_NAME.to_string()
}

fn default_room_name() -> String {
    "Unknown Room".to_string()
}

fn default_door() -> String {
    "right".to_string()
}

fn default_seating_pattern() -> String {
    DEFAULT_SEATING_PATTERN.to_string()
}

fn default_date() -> String {
    "Unknown Date".to_string()
}

fn default_shift() -> String {
    "Unknown Shift".to_string()
}

/// Largest room accepted, in seats. Grids are allocated up front.
pub const MAX_ROOM_SEATS: u64 = 100_000;

/// Accepts rows/cols as JSON numbers or numeric strings ("5"), as form inputs send them.
/// Fractions are truncated and negative counts become 0, leaving the room unusable.
fn count_from_number_or_string<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Whole(i64),
        Fraction(f64),
        Text(String),
    }

    let value = match Count::deserialize(deserializer)? {
        Count::Whole(n) => n as f64,
        Count::Fraction(n) => n,
        Count::Text(s) if s.trim().is_empty() => return Ok(0),
        Count::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("rows and cols must be numbers, got \"{}\"", s)))?,
    };

    if !value.is_finite() || value.trunc() > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!("room dimension {} is out of range", value)));
    }
    Ok(value.trunc().max(0.0) as u32)
}

/// One physical room as configured by the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    #[serde(default = "default_room_name")]
    pub name: String,
    #[serde(default, deserialize_with = "count_from_number_or_string")]
    pub rows: u32,
    #[serde(default, deserialize_with = "count_from_number_or_string")]
    pub cols: u32,
    #[serde(default = "default_door")]
    pub door: String,
    /// Comma separated year labels, e.g. "IV Yr, II Yr"
    #[serde(default = "default_seating_pattern")]
    pub seating_pattern: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub year: YearLabel,
    pub subject: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftConfig {
    #[serde(default = "default_shift")]
    pub time: String,
    #[serde(default)]
    pub years: Vec<Participant>,
}

/// One exam date with its shifts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_date")]
    pub date: String,
    #[serde(default)]
    pub shifts: Vec<ShiftConfig>,
}

/// Full configuration of a generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    #[serde(default = "default_branch_name")]
    pub branch_name: String,
    #[serde(default)]
    pub rooms: Vec<RoomConfig>,
    #[serde(default)]
    pub sessions: Vec<SessionConfig>,
}

/// A room ready for seating. Never mutated during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    pub door: String,
    /// Requested column rotation; empty means the default rotation
    pub rotation: Vec<YearLabel>,
}

impl Room {
    pub fn new(name: impl Into<String>, rows: usize, cols: usize) -> Self {
        Room {
            name: name.into(),
            rows,
            cols,
            door: default_door(),
            rotation: Vec::new(),
        }
    }

    pub fn with_rotation(mut self, rotation: Vec<YearLabel>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn capacity(&self) -> u64 {
        (self.rows as u64).saturating_mul(self.cols as u64)
    }

    pub fn is_usable(&self) -> bool {
        self.rows > 0 && self.cols > 0
    }

    /// Rejects rooms too large to lay out
    pub fn check_size(&self) -> Result<()> {
        if self.capacity() > MAX_ROOM_SEATS {
            return Err(SeatingError::config(format!(
                "Room {} has {} x {} seats; at most {} seats per room are supported.",
                self.name, self.rows, self.cols, MAX_ROOM_SEATS
            )));
        }
        Ok(())
    }
}

impl TryFrom<&RoomConfig> for Room {
    type Error = SeatingError;

    fn try_from(cfg: &RoomConfig) -> Result<Self> {
        let rotation = parse_seating_pattern(&cfg.seating_pattern).map_err(|label| {
            SeatingError::config(format!(
                "Room {} has an unknown year label in its seating pattern: {}",
                cfg.name, label
            ))
        })?;
        let room = Room {
            name: cfg.name.clone(),
            rows: cfg.rows as usize,
            cols: cfg.cols as usize,
            door: cfg.door.clone(),
            rotation,
        };
        room.check_size()?;
        Ok(room)
    }
}

/// One date × shift combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub date: String,
    pub shift: String,
    pub participants: Vec<Participant>,
}

impl Session {
    pub fn years(&self) -> impl Iterator<Item = YearLabel> + '_ {
        self.participants.iter().map(|p| p.year)
    }
}

/// Parses "IV Yr, II Yr" into year labels. Fails with the first unknown label.
pub fn parse_seating_pattern(raw: &str) -> std::result::Result<Vec<YearLabel>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<YearLabel>().map_err(|_| part.to_string()))
        .collect()
}

/// Flattens date blocks into sessions, keeping date then shift order
pub fn flatten_sessions(blocks: &[SessionConfig]) -> Vec<Session> {
    blocks
        .iter()
        .flat_map(|block| {
            block.shifts.iter().map(move |shift| Session {
                date: block.date.clone(),
                shift: shift.time.clone(),
                participants: shift.years.clone(),
            })
        })
        .collect()
}

/// Rejects configurations that cannot produce a meaningful plan
pub fn validate(config: &PlanConfig) -> Result<()> {
    if config.rooms.is_empty() || config.sessions.is_empty() {
        return Err(SeatingError::config("Missing rooms or exam sessions."));
    }

    for room in &config.rooms {
        Room::try_from(room)?;
    }

    let mut dates = HashSet::new();
    let mut subjects = HashSet::new();

    for block in &config.sessions {
        if !dates.insert(block.date.as_str()) {
            return Err(SeatingError::config(format!(
                "Duplicate Exam Date found: {}. Please consolidate shifts under a single Date Block.",
                block.date
            )));
        }
        if block.shifts.is_empty() {
            return Err(SeatingError::config(format!("Exam date {} has no shifts.", block.date)));
        }

        for shift in &block.shifts {
            if shift.years.is_empty() {
                return Err(SeatingError::config(format!(
                    "Shift {} on {} has no participating years.",
                    shift.time, block.date
                )));
            }

            let mut years = HashSet::new();
            for participant in &shift.years {
                if !years.insert(participant.year) {
                    return Err(SeatingError::config(format!(
                        "{} is listed twice in shift {} on {}.",
                        participant.year, shift.time, block.date
                    )));
                }
                let subject = participant.subject.trim();
                if subject.is_empty() {
                    return Err(SeatingError::config(format!(
                        "Missing subject for {} in shift {} on {}.",
                        participant.year, shift.time, block.date
                    )));
                }
                if !subjects.insert(subject) {
                    return Err(SeatingError::config(format!(
                        "Duplicate Subject found: {}. Subjects can only be scheduled once.",
                        subject
                    )));
                }
            }
        }
    }

    Ok(())
}

impl PlanConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn rooms(&self) -> Result<Vec<Room>> {
        self.rooms.iter().map(Room::try_from).collect()
    }

    pub fn flat_sessions(&self) -> Vec<Session> {
        flatten_sessions(&self.sessions)
    }
}

/// Loads a plan configuration from a JSON file
pub fn load_plan_config<P: AsRef<Path>>(path: P) -> Result<PlanConfig> {
    let content = std::fs::read_to_string(path)?;
    PlanConfig::from_json(&content)
}
