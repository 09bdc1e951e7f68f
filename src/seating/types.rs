use std::collections::{BTreeMap, VecDeque};
use serde::Serialize;

use crate::roster::{Roster, Student, YearLabel};
use super::placement::PlacementTier;

/// Per-session working queues, one FIFO per participating year.
///
/// Always built by cloning from the master roster so that students left
/// unseated in one session never carry over into the next.
#[derive(Debug, Clone, Default)]
pub struct YearQueues {
    queues: BTreeMap<YearLabel, VecDeque<Student>>,
}

impl YearQueues {
    /// Copies the roster entries of exactly the given years
    pub fn for_session<I>(roster: &Roster, years: I) -> Self
    where
        I: IntoIterator<Item = YearLabel>,
    {
        let queues = years
            .into_iter()
            .map(|year| (year, roster.students(year).iter().cloned().collect()))
            .collect();
        YearQueues { queues }
    }

    pub fn has_remaining(&self, year: YearLabel) -> bool {
        self.queues.get(&year).is_some_and(|q| !q.is_empty())
    }

    pub fn pop(&mut self, year: YearLabel) -> Option<Student> {
        self.queues.get_mut(&year)?.pop_front()
    }

    /// Number of year labels that still have students waiting
    pub fn years_remaining(&self) -> usize {
        self.queues.values().filter(|q| !q.is_empty()).count()
    }

    pub fn is_exhausted(&self) -> bool {
        self.years_remaining() == 0
    }

    pub fn total(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    pub fn len(&self, year: YearLabel) -> usize {
        self.queues.get(&year).map_or(0, VecDeque::len)
    }

    /// Drains whatever is left, in year then queue order
    pub fn drain_remaining(&mut self) -> Vec<(YearLabel, Student)> {
        self.queues
            .iter_mut()
            .flat_map(|(year, queue)| queue.drain(..).map(move |s| (*year, s)))
            .collect()
    }
}

/// An occupied seat
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Seat {
    pub student: Student,
    pub year: YearLabel,
    /// Tier of the placement cascade that chose this seat
    pub tier: PlacementTier,
}

/// Seat layout of one room in one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<Option<Seat>>>,
}

impl SeatGrid {
    pub fn new(rows: usize, cols: usize) -> Self {
        SeatGrid {
            rows,
            cols,
            cells: vec![vec![None; cols]; rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn seat(&self, row: usize, col: usize) -> Option<&Seat> {
        self.cells.get(row)?.get(col)?.as_ref()
    }

    pub fn year_at(&self, row: usize, col: usize) -> Option<YearLabel> {
        self.seat(row, col).map(|s| s.year)
    }

    pub(crate) fn place(&mut self, row: usize, col: usize, seat: Seat) {
        self.cells[row][col] = Some(seat);
    }

    pub fn row(&self, row: usize) -> &[Option<Seat>] {
        &self.cells[row]
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Occupied seats in reading order down each column, then across
    pub fn column_major(&self) -> impl Iterator<Item = &Seat> + '_ {
        (0..self.cols).flat_map(move |col| (0..self.rows).filter_map(move |row| self.seat(row, col)))
    }
}
