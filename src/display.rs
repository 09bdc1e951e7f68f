use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::seating::report::{MatrixRow, SeatCell, SeatingPlanView, SeatingReport};

const EMPTY_SEAT: &str = "[EMPTY]";

/// Formats a seated student as "ENROLLMENT (name)"
pub fn format_student(enrollment: &str, name: &str) -> String {
    if name.is_empty() {
        enrollment.to_string()
    } else {
        format!("{} ({})", enrollment, name)
    }
}

fn format_cell(cell: &SeatCell) -> String {
    if cell.student.is_empty() {
        EMPTY_SEAT.to_string()
    } else {
        format!("{} {}", cell.year, format_student(&cell.student, &cell.name))
    }
}

/// Writes one room plan: title, column headers, then one line per row
pub fn render_plan<W: Write>(out: &mut W, plan: &SeatingPlanView) -> io::Result<()> {
    writeln!(out, "** {} | {} | {} **", plan.date, plan.shift, plan.room_name)?;
    writeln!(out, "Door: {}  Grid: {} x {}  Seated: {}", plan.door, plan.rows, plan.cols, plan.total_in_room)?;

    let counts: Vec<String> = plan.counts.iter().map(|(year, n)| format!("{}: {}", year, n)).collect();
    if !counts.is_empty() {
        writeln!(out, "Counts: {}", counts.join(", "))?;
    }

    for row in &plan.matrix {
        match row {
            MatrixRow::Headers(headers) => {
                let labels: Vec<&str> = headers.iter().map(|h| if h.is_empty() { "-" } else { h.as_str() }).collect();
                writeln!(out, "Columns: {}", labels.join(" | "))?;
            }
            MatrixRow::Seats(cells) => {
                let cells: Vec<String> = cells.iter().map(format_cell).collect();
                writeln!(out, "{}", cells.join(" | "))?;
            }
        }
    }

    Ok(())
}

/// Writes a room plan to its own text file
pub fn write_plan_to_file(plan: &SeatingPlanView, path: &Path) -> io::Result<()> {
    let mut file = File::create(path)?;
    render_plan(&mut file, plan)
}

/// Writes every plan followed by the timetable and any unseated students
pub fn write_report<W: Write>(out: &mut W, report: &SeatingReport) -> io::Result<()> {
    writeln!(out, "\n=== Seating Plans: {} ===", report.branch_name)?;
    for plan in &report.seating_plans {
        writeln!(out)?;
        render_plan(out, plan)?;
    }

    writeln!(out, "\n=== Master Timetable ===")?;
    for row in &report.master_timetable {
        let subjects: Vec<String> = row.subjects.iter().map(|(year, subject)| format!("{}: {}", year, subject)).collect();
        writeln!(out, "  {} ({}) -> {}", row.date, row.shift, subjects.join(", "))?;
    }

    if !report.unseated.is_empty() {
        writeln!(out, "\n⚠️  Students without a seat ({}):", report.unseated.len())?;
        for student in &report.unseated {
            writeln!(
                out,
                "  - {} [{}] on {} ({})",
                format_student(&student.enrollment, &student.name),
                student.year,
                student.date,
                student.shift
            )?;
        }
    }

    Ok(())
}

/// Prints the whole report to stdout
pub fn print_report(report: &SeatingReport) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_report(&mut out, report)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{Roster, YearLabel};
    use crate::seating::report::{TimetableRow, UnseatedStudent};
    use std::collections::BTreeMap;

    fn plan() -> SeatingPlanView {
        let cell = |student: &str, name: &str, year: &str| SeatCell {
            student: student.to_string(),
            name: name.to_string(),
            year: year.to_string(),
        };
        SeatingPlanView {
            date: "2024-05-12".to_string(),
            shift: "Morning".to_string(),
            room_name: "R101".to_string(),
            matrix: vec![
                MatrixRow::Headers(vec!["IV Yr".to_string(), String::new()]),
                MatrixRow::Seats(vec![cell("D1", "Dana", "IV Yr"), cell("", "", "")]),
            ],
            headers: vec!["IV Yr".to_string(), String::new()],
            rows: 1,
            cols: 2,
            door: "left".to_string(),
            counts: BTreeMap::from([(YearLabel::Fourth, 1)]),
            total_in_room: 1,
        }
    }

    #[test]
    fn student_without_name_shows_enrollment_only() {
        assert_eq!(format_student("E1", ""), "E1");
        assert_eq!(format_student("E1", "Asha"), "E1 (Asha)");
    }

    #[test]
    fn renders_plan_lines() {
        let mut out = Vec::new();
        render_plan(&mut out, &plan()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "** 2024-05-12 | Morning | R101 **");
        assert_eq!(lines[2], "Counts: IV Yr: 1");
        assert_eq!(lines[3], "Columns: IV Yr | -");
        assert_eq!(lines[4], "IV Yr D1 (Dana) | [EMPTY]");
    }

    fn report() -> SeatingReport {
        SeatingReport {
            branch_name: "CSE".to_string(),
            seating_plans: vec![plan()],
            attendance_data: Roster::new(),
            room_attendance_data: Vec::new(),
            exam_dates_map: BTreeMap::new(),
            master_timetable: vec![TimetableRow {
                date: "2024-05-12".to_string(),
                shift: "Morning".to_string(),
                subjects: BTreeMap::from([(YearLabel::Fourth, "CS401".to_string())]),
            }],
            unseated: vec![UnseatedStudent {
                date: "2024-05-12".to_string(),
                shift: "Morning".to_string(),
                enrollment: "D2".to_string(),
                name: String::new(),
                year: YearLabel::Fourth,
            }],
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_timetable_and_unseated_students() {
        let mut out = Vec::new();
        write_report(&mut out, &report()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("=== Seating Plans: CSE ==="));
        assert!(text.contains("  2024-05-12 (Morning) -> IV Yr: CS401"));
        assert!(text.contains("  - D2 [IV Yr] on 2024-05-12 (Morning)"));
    }

    #[test]
    fn write_errors_are_returned() {
        let err = write_report(&mut BrokenPipe, &report()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
