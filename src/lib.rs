pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod parser;
pub mod roster;
pub mod seating;
pub mod web;

pub use error::{Result, SeatingError};
pub use roster::{Roster, Student, YearLabel};
