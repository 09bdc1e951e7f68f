pub mod types;
pub mod pattern;
pub mod placement;
pub mod planner;
pub mod report;

pub use types::{Seat, SeatGrid, YearQueues};
pub use pattern::{column_pattern, ColumnPattern};
pub use placement::{fill_room, PlacementTier};
pub use planner::{plan_all, plan_session, total_capacity, RoomPlan, SessionPlan};
pub use report::{build_report, SeatingReport};

use crate::config::{self, PlanConfig};
use crate::error::Result;
use crate::roster::Roster;

/// Validates the configuration, seats every session and builds the report
pub fn generate(roster: &Roster, config: &PlanConfig) -> Result<SeatingReport> {
    config::validate(config)?;
    let rooms = config.rooms()?;
    let sessions = config.flat_sessions();
    let plans = plan_all(roster, &rooms, &sessions)?;
    Ok(build_report(&config.branch_name, roster, &plans))
}
