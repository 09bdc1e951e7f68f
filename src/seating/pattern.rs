use crate::roster::YearLabel;
use super::types::YearQueues;

/// Year assigned to each column; `None` is a deliberately empty column
pub type ColumnPattern = Vec<Option<YearLabel>>;

/// Builds the per-column year pattern for a room.
///
/// Only years that were requested and still have students take part. A lone
/// year alternates with empty columns; otherwise the rotation repeats and an
/// empty column is inserted whenever the same year would land twice in a row.
pub fn column_pattern(queues: &YearQueues, cols: usize, rotation: &[YearLabel]) -> ColumnPattern {
    let rotation = if rotation.is_empty() {
        &YearLabel::SENIOR_FIRST[..]
    } else {
        rotation
    };

    let active: Vec<YearLabel> = rotation
        .iter()
        .copied()
        .filter(|year| queues.has_remaining(*year))
        .collect();

    let mut pattern = Vec::with_capacity(cols);

    match active.as_slice() {
        [] => {}
        [only] => {
            while pattern.len() < cols {
                pattern.push(Some(*only));
                if pattern.len() < cols {
                    pattern.push(None);
                }
            }
        }
        _ => {
            'fill: while pattern.len() < cols {
                for &year in &active {
                    if pattern.len() >= cols {
                        break 'fill;
                    }
                    if pattern.last() == Some(&Some(year)) {
                        pattern.push(None);
                        if pattern.len() >= cols {
                            break 'fill;
                        }
                    }
                    pattern.push(Some(year));
                }
            }
        }
    }

    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{Roster, Student};
    use crate::roster::YearLabel::{First, Fourth, Second, Third};

    fn queues_with(years: &[YearLabel]) -> YearQueues {
        let roster: Roster = years
            .iter()
            .map(|y| (*y, Student::new(format!("{}-1", y.numeral()), "")))
            .collect();
        YearQueues::for_session(&roster, YearLabel::ALL)
    }

    #[test]
    fn single_year_alternates_with_blanks() {
        let queues = queues_with(&[Second]);
        let pattern = column_pattern(&queues, 5, &[]);
        assert_eq!(pattern, vec![Some(Second), None, Some(Second), None, Some(Second)]);
    }

    #[test]
    fn two_years_alternate_without_blanks() {
        let queues = queues_with(&[First, Second]);
        let pattern = column_pattern(&queues, 4, &[First, Second]);
        assert_eq!(pattern, vec![Some(First), Some(Second), Some(First), Some(Second)]);
    }

    #[test]
    fn default_rotation_is_senior_first_and_skips_empty_years() {
        let queues = queues_with(&[First, Third, Fourth]);
        let pattern = column_pattern(&queues, 5, &[]);
        assert_eq!(pattern, vec![Some(Fourth), Some(Third), Some(First), Some(Fourth), Some(Third)]);
    }

    #[test]
    fn repeated_rotation_entry_gets_a_blank_between() {
        let queues = queues_with(&[Third, Fourth]);
        let pattern = column_pattern(&queues, 5, &[Fourth, Fourth, Third]);
        assert_eq!(pattern, vec![Some(Fourth), None, Some(Fourth), Some(Third), Some(Fourth)]);
    }

    #[test]
    fn nothing_active_gives_empty_pattern() {
        let queues = queues_with(&[First]);
        assert!(column_pattern(&queues, 4, &[Fourth, Third]).is_empty());
        assert!(column_pattern(&queues_with(&[]), 4, &[]).is_empty());
    }

    #[test]
    fn zero_columns_gives_empty_pattern() {
        let queues = queues_with(&[First, Second]);
        assert!(column_pattern(&queues, 0, &[]).is_empty());
    }
}
