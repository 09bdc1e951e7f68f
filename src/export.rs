use csv::WriterBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::display::write_plan_to_file;
use crate::error::Result;
use crate::roster::YearLabel;
use crate::seating::report::{RoomAttendance, SeatingReport};

/// Turns "2024-05-12 / Room 101" into "2024-05-12_Room_101"
fn file_stem(parts: &[&str]) -> String {
    let joined = parts.join("_");
    let mut stem = String::with_capacity(joined.len());
    let mut last_underscore = false;
    for c in joined.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            stem.push(c);
            last_underscore = false;
        } else if !last_underscore {
            stem.push('_');
            last_underscore = true;
        }
    }
    stem.trim_matches('_').to_string()
}

/// Writes a room attendance sheet: one line per student plus a signature column
pub fn export_room_attendance(attendance: &RoomAttendance, csv_path: &Path) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(csv_path)?;
    wtr.write_record(["S.No", "Enrollment", "Name", "Year", "Signature"])?;
    for (idx, student) in attendance.students.iter().enumerate() {
        let serial = (idx + 1).to_string();
        wtr.write_record([
            serial.as_str(),
            student.enrollment.as_str(),
            student.name.as_str(),
            student.year.as_str(),
            "",
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the global attendance sheet of one year, one column per exam it sits
pub fn export_year_attendance(report: &SeatingReport, year: YearLabel, csv_path: &Path) -> Result<()> {
    let exams = report.exam_dates_map.get(&year).map(Vec::as_slice).unwrap_or(&[]);
    let mut wtr = WriterBuilder::new().from_path(csv_path)?;

    let mut header = vec!["S.No".to_string(), "Enrollment".to_string(), "Name".to_string()];
    header.extend(exams.iter().cloned());
    wtr.write_record(&header)?;

    for (idx, student) in report.attendance_data.students(year).iter().enumerate() {
        let mut record = vec![(idx + 1).to_string(), student.enrollment.clone(), student.name.clone()];
        record.extend(exams.iter().map(|_| String::new()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes every plan, room sheet and year sheet into `dir`, returning the files written
pub fn export_report(report: &SeatingReport, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    for plan in &report.seating_plans {
        let path = dir.join(format!("plan_{}.txt", file_stem(&[plan.date.as_str(), plan.shift.as_str(), plan.room_name.as_str()])));
        write_plan_to_file(plan, &path)?;
        written.push(path);
    }

    for attendance in &report.room_attendance_data {
        let stem = file_stem(&[
            attendance.date.as_str(),
            attendance.shift.as_str(),
            attendance.room_name.as_str(),
        ]);
        let path = dir.join(format!("attendance_{}.csv", stem));
        export_room_attendance(attendance, &path)?;
        written.push(path);
    }

    for year in YearLabel::ALL {
        if report.attendance_data.students(year).is_empty() {
            continue;
        }
        let path = dir.join(format!("attendance_{}.csv", file_stem(&[year.as_str()])));
        export_year_attendance(report, year, &path)?;
        written.push(path);
    }

    info!(files = written.len(), dir = %dir.display(), "exports written");
    Ok(written)
}
