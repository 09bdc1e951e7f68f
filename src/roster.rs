use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Academic year of a student cohort.
///
/// Ordering follows seniority ascending (I < II < III < IV), which is also
/// the lexicographic order of the labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum YearLabel {
    #[serde(rename = "I Yr")]
    First,
    #[serde(rename = "II Yr")]
    Second,
    #[serde(rename = "III Yr")]
    Third,
    #[serde(rename = "IV Yr")]
    Fourth,
}

impl YearLabel {
    pub const ALL: [YearLabel; 4] = [
        YearLabel::First,
        YearLabel::Second,
        YearLabel::Third,
        YearLabel::Fourth,
    ];

    /// Reverse seniority: the default rotation and the fixed fallback scan order
    pub const SENIOR_FIRST: [YearLabel; 4] = [
        YearLabel::Fourth,
        YearLabel::Third,
        YearLabel::Second,
        YearLabel::First,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            YearLabel::First => "I Yr",
            YearLabel::Second => "II Yr",
            YearLabel::Third => "III Yr",
            YearLabel::Fourth => "IV Yr",
        }
    }

    /// Roman numeral used in spreadsheet headers
    pub fn numeral(self) -> &'static str {
        match self {
            YearLabel::First => "I",
            YearLabel::Second => "II",
            YearLabel::Third => "III",
            YearLabel::Fourth => "IV",
        }
    }

    pub fn digit(self) -> &'static str {
        match self {
            YearLabel::First => "1",
            YearLabel::Second => "2",
            YearLabel::Third => "3",
            YearLabel::Fourth => "4",
        }
    }
}

impl fmt::Display for YearLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YearLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        YearLabel::ALL
            .into_iter()
            .find(|year| year.as_str() == trimmed)
            .ok_or_else(|| format!("Unknown year label: {}", trimmed))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub enrollment: String,
    #[serde(default)]
    pub name: String,
}

impl Student {
    pub fn new(enrollment: impl Into<String>, name: impl Into<String>) -> Self {
        Student {
            enrollment: enrollment.into(),
            name: name.into(),
        }
    }
}

/// Master roster: every year label mapped to its ordered student list.
///
/// All four years are always present, possibly with empty lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roster {
    years: BTreeMap<YearLabel, Vec<Student>>,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl Roster {
    pub fn new() -> Self {
        Roster {
            years: YearLabel::ALL.into_iter().map(|year| (year, Vec::new())).collect(),
        }
    }

    /// Appends a student to a year, rejecting blank or duplicate enrollments.
    /// Returns whether the student was added.
    pub fn push(&mut self, year: YearLabel, student: Student) -> bool {
        if student.enrollment.trim().is_empty() {
            return false;
        }
        let list = self.years.entry(year).or_default();
        if list.iter().any(|s| s.enrollment == student.enrollment) {
            return false;
        }
        list.push(student);
        true
    }

    pub fn students(&self, year: YearLabel) -> &[Student] {
        self.years.get(&year).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.years.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (YearLabel, &[Student])> {
        self.years.iter().map(|(year, students)| (*year, students.as_slice()))
    }
}

impl FromIterator<(YearLabel, Student)> for Roster {
    fn from_iter<T: IntoIterator<Item = (YearLabel, Student)>>(iter: T) -> Self {
        let mut roster = Roster::new();
        for (year, student) in iter {
            roster.push(year, student);
        }
        roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_and_display() {
        for year in YearLabel::ALL {
            assert_eq!(year.as_str().parse::<YearLabel>().unwrap(), year);
        }
        assert_eq!(" III Yr ".parse::<YearLabel>().unwrap(), YearLabel::Third);
        assert!("V Yr".parse::<YearLabel>().is_err());
        assert_eq!(YearLabel::Fourth.to_string(), "IV Yr");
    }

    #[test]
    fn label_order_matches_string_order() {
        let mut by_string: Vec<&str> = YearLabel::ALL.iter().map(|y| y.as_str()).collect();
        by_string.sort();
        let by_enum: Vec<&str> = YearLabel::ALL.iter().map(|y| y.as_str()).collect();
        assert_eq!(by_string, by_enum);
    }

    #[test]
    fn roster_has_all_years_and_rejects_duplicates() {
        let mut roster = Roster::new();
        assert!(roster.push(YearLabel::First, Student::new("A1", "Asha")));
        assert!(!roster.push(YearLabel::First, Student::new("A1", "Again")));
        assert!(!roster.push(YearLabel::First, Student::new("  ", "")));
        // same enrollment in another year is a different list
        assert!(roster.push(YearLabel::Second, Student::new("A1", "")));

        assert_eq!(roster.len(), 2);
        assert_eq!(roster.iter().count(), 4);
        assert!(roster.students(YearLabel::Fourth).is_empty());
    }

    #[test]
    fn roster_serializes_with_year_keys() {
        let roster: Roster = [(YearLabel::Second, Student::new("S1", "Sam"))].into_iter().collect();
        let json = serde_json::to_value(&roster).unwrap();
        assert_eq!(json["II Yr"][0]["enrollment"], "S1");
        assert_eq!(json["IV Yr"].as_array().unwrap().len(), 0);
    }
}
