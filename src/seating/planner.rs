use tracing::{debug, info, info_span, warn};

use crate::config::{Room, Session};
use crate::error::{Result, SeatingError};
use crate::roster::{Roster, Student, YearLabel};
use super::pattern::{column_pattern, ColumnPattern};
use super::placement::fill_room;
use super::types::{SeatGrid, YearQueues};

/// A room after seating one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomPlan {
    pub room: Room,
    pub pattern: ColumnPattern,
    pub grid: SeatGrid,
}

/// Outcome of seating one date × shift
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub session: Session,
    pub rooms: Vec<RoomPlan>,
    /// Students the rooms could not absorb (empty pattern or suppressed fallback)
    pub unseated: Vec<(YearLabel, Student)>,
}

impl SessionPlan {
    pub fn seated(&self) -> usize {
        self.rooms.iter().map(|r| r.grid.occupied()).sum()
    }
}

/// Seats available across every room, regardless of session
pub fn total_capacity(rooms: &[Room]) -> u64 {
    rooms.iter().map(Room::capacity).sum()
}

/// Seats one session across the rooms, in room order.
///
/// Fails before placing anyone if the participating years hold more
/// students than `capacity`.
pub fn plan_session(roster: &Roster, rooms: &[Room], session: &Session, capacity: u64) -> Result<SessionPlan> {
    let span = info_span!("session", date = %session.date, shift = %session.shift);
    let _guard = span.enter();

    let mut queues = YearQueues::for_session(roster, session.years());
    let scheduled = queues.total() as u64;

    if scheduled > capacity {
        return Err(SeatingError::Capacity {
            date: session.date.clone(),
            shift: session.shift.clone(),
            capacity,
            scheduled,
        });
    }

    let mut plans = Vec::new();
    for room in rooms {
        if !room.is_usable() {
            debug!(room = %room.name, "skipping room without seats");
            continue;
        }
        if queues.is_exhausted() {
            break;
        }

        let pattern = column_pattern(&queues, room.cols, &room.rotation);
        let grid = fill_room(room.rows, room.cols, &pattern, &mut queues);
        debug!(room = %room.name, seated = grid.occupied(), "room planned");

        plans.push(RoomPlan {
            room: room.clone(),
            pattern,
            grid,
        });
    }

    let unseated = queues.drain_remaining();
    if !unseated.is_empty() {
        warn!(count = unseated.len(), "students left without a seat");
    }
    info!(scheduled, rooms = plans.len(), "session planned");

    Ok(SessionPlan {
        session: session.clone(),
        rooms: plans,
        unseated,
    })
}

/// Seats every session in order. The first failure aborts the whole run.
pub fn plan_all(roster: &Roster, rooms: &[Room], sessions: &[Session]) -> Result<Vec<SessionPlan>> {
    if rooms.is_empty() || sessions.is_empty() {
        return Err(SeatingError::config("Missing rooms or exam sessions."));
    }
    for room in rooms {
        room.check_size()?;
    }

    let capacity = total_capacity(rooms);
    info!(rooms = rooms.len(), sessions = sessions.len(), capacity, "planning seating");

    sessions
        .iter()
        .map(|session| plan_session(roster, rooms, session, capacity))
        .collect()
}
