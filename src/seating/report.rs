use std::collections::{BTreeMap, BTreeSet};
use serde::Serialize;

use crate::config::Session;
use crate::roster::{Roster, YearLabel};
use super::planner::{RoomPlan, SessionPlan};
use super::types::{Seat, SeatGrid};

/// Placeholder in the master timetable for years not sitting a session
pub const NOT_SITTING: &str = "-";

/// One cell of the seating matrix; empty strings for an empty seat
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatCell {
    pub student: String,
    pub name: String,
    pub year: String,
}

impl SeatCell {
    fn from_seat(seat: Option<&Seat>) -> Self {
        match seat {
            Some(seat) => SeatCell {
                student: seat.student.enrollment.clone(),
                name: seat.student.name.clone(),
                year: seat.year.to_string(),
            },
            None => SeatCell {
                student: String::new(),
                name: String::new(),
                year: String::new(),
            },
        }
    }
}

/// Seating matrix row: the header row first, then one row per grid row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MatrixRow {
    Headers(Vec<String>),
    Seats(Vec<SeatCell>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatingPlanView {
    pub date: String,
    pub shift: String,
    pub room_name: String,
    pub matrix: Vec<MatrixRow>,
    pub headers: Vec<String>,
    pub rows: usize,
    pub cols: usize,
    pub door: String,
    pub counts: BTreeMap<YearLabel, usize>,
    pub total_in_room: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceEntry {
    pub enrollment: String,
    pub name: String,
    pub year: YearLabel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomAttendance {
    pub date: String,
    pub shift: String,
    pub room_name: String,
    pub students: Vec<AttendanceEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimetableRow {
    pub date: String,
    pub shift: String,
    #[serde(flatten)]
    pub subjects: BTreeMap<YearLabel, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnseatedStudent {
    pub date: String,
    pub shift: String,
    pub enrollment: String,
    pub name: String,
    pub year: YearLabel,
}

/// Everything handed back to the caller after a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatingReport {
    pub branch_name: String,
    pub seating_plans: Vec<SeatingPlanView>,
    pub attendance_data: Roster,
    pub room_attendance_data: Vec<RoomAttendance>,
    pub exam_dates_map: BTreeMap<YearLabel, Vec<String>>,
    pub master_timetable: Vec<TimetableRow>,
    pub unseated: Vec<UnseatedStudent>,
}

/// Distinct years per column, sorted and joined with "/"
pub fn column_headers(grid: &SeatGrid) -> Vec<String> {
    (0..grid.cols())
        .map(|col| {
            let years: BTreeSet<YearLabel> = (0..grid.rows()).filter_map(|row| grid.year_at(row, col)).collect();
            years.iter().map(|y| y.as_str()).collect::<Vec<_>>().join("/")
        })
        .collect()
}

/// Occupied seats per year; years with no seat are omitted
pub fn year_counts(grid: &SeatGrid) -> BTreeMap<YearLabel, usize> {
    let mut counts = BTreeMap::new();
    for seat in grid.column_major() {
        *counts.entry(seat.year).or_insert(0) += 1;
    }
    counts
}

/// Attendance roster in column-major reading order
pub fn room_attendance(grid: &SeatGrid) -> Vec<AttendanceEntry> {
    grid.column_major()
        .map(|seat| AttendanceEntry {
            enrollment: seat.student.enrollment.clone(),
            name: seat.student.name.clone(),
            year: seat.year,
        })
        .collect()
}

pub fn seating_matrix(grid: &SeatGrid, headers: Vec<String>) -> Vec<MatrixRow> {
    let mut matrix = Vec::with_capacity(grid.rows() + 1);
    matrix.push(MatrixRow::Headers(headers));
    for row in 0..grid.rows() {
        let cells = grid.row(row).iter().map(|cell| SeatCell::from_seat(cell.as_ref())).collect();
        matrix.push(MatrixRow::Seats(cells));
    }
    matrix
}

pub fn exam_date_label(session: &Session, subject: &str) -> String {
    format!("{} ({}) {}", session.date, session.shift, subject)
}

/// Per year, the sessions it sits, in session order without repeats
pub fn exam_dates_index(sessions: &[Session]) -> BTreeMap<YearLabel, Vec<String>> {
    let mut index: BTreeMap<YearLabel, Vec<String>> = YearLabel::ALL.into_iter().map(|y| (y, Vec::new())).collect();
    for session in sessions {
        for participant in &session.participants {
            let label = exam_date_label(session, &participant.subject);
            let labels = index.entry(participant.year).or_default();
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
    }
    index
}

pub fn master_timetable(sessions: &[Session]) -> Vec<TimetableRow> {
    sessions
        .iter()
        .map(|session| {
            let mut subjects: BTreeMap<YearLabel, String> =
                YearLabel::ALL.into_iter().map(|y| (y, NOT_SITTING.to_string())).collect();
            for participant in &session.participants {
                subjects.insert(participant.year, participant.subject.clone());
            }
            TimetableRow {
                date: session.date.clone(),
                shift: session.shift.clone(),
                subjects,
            }
        })
        .collect()
}

fn plan_view(session: &Session, plan: &RoomPlan) -> SeatingPlanView {
    let headers = column_headers(&plan.grid);
    let counts = year_counts(&plan.grid);
    SeatingPlanView {
        date: session.date.clone(),
        shift: session.shift.clone(),
        room_name: plan.room.name.clone(),
        matrix: seating_matrix(&plan.grid, headers.clone()),
        headers,
        rows: plan.room.rows,
        cols: plan.room.cols,
        door: plan.room.door.clone(),
        total_in_room: counts.values().sum(),
        counts,
    }
}

/// Aggregates all session plans into the caller-facing report
pub fn build_report(branch_name: &str, roster: &Roster, plans: &[SessionPlan]) -> SeatingReport {
    let sessions: Vec<Session> = plans.iter().map(|p| p.session.clone()).collect();

    let mut seating_plans = Vec::new();
    let mut room_attendance_data = Vec::new();
    let mut unseated = Vec::new();

    for plan in plans {
        let session = &plan.session;
        for room in &plan.rooms {
            seating_plans.push(plan_view(session, room));
            room_attendance_data.push(RoomAttendance {
                date: session.date.clone(),
                shift: session.shift.clone(),
                room_name: room.room.name.clone(),
                students: room_attendance(&room.grid),
            });
        }
        unseated.extend(plan.unseated.iter().map(|(year, student)| UnseatedStudent {
            date: session.date.clone(),
            shift: session.shift.clone(),
            enrollment: student.enrollment.clone(),
            name: student.name.clone(),
            year: *year,
        }));
    }

    SeatingReport {
        branch_name: branch_name.to_string(),
        seating_plans,
        attendance_data: roster.clone(),
        room_attendance_data,
        exam_dates_map: exam_dates_index(&sessions),
        master_timetable: master_timetable(&sessions),
        unseated,
    }
}
