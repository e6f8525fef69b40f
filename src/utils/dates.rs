//! Calendar date ranges for day-by-day crawling

use chrono::NaiveDate;

/// Lazy iterator over every calendar date in `[start, end]` inclusive,
/// ascending. Cloning restarts the range from wherever the clone was taken.
///
/// The caller is responsible for `start <= end`; an inverted range yields
/// nothing.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use daetgul::utils::dates::date_range;
///
/// let start = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let days: Vec<_> = date_range(start, end).collect();
/// assert_eq!(days.len(), 3); // leap year
/// ```
#[derive(Debug, Clone)]
pub struct DateRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

/// Create a [`DateRange`] over `[start, end]` inclusive
#[must_use]
pub fn date_range(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange {
        next: Some(start),
        end,
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        if current > self.end {
            self.next = None;
            return None;
        }
        self.next = current.succ_opt();
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_single_day_range() {
        let days: Vec<_> = date_range(d(2024, 2, 1), d(2024, 2, 1)).collect();
        assert_eq!(days, vec![d(2024, 2, 1)]);
    }

    #[test]
    fn test_range_is_inclusive_and_ascending() {
        let start = d(2024, 1, 30);
        let end = d(2024, 2, 2);
        let days: Vec<_> = date_range(start, end).collect();

        assert_eq!(days.len(), (end - start).num_days() as usize + 1);
        assert_eq!(days.first(), Some(&start));
        assert_eq!(days.last(), Some(&end));
        assert!(days.windows(2).all(|w| w[1] == w[0].succ_opt().unwrap()));
    }

    #[test]
    fn test_range_crosses_leap_day() {
        let days: Vec<_> = date_range(d(2024, 2, 28), d(2024, 3, 1)).collect();
        assert_eq!(days, vec![d(2024, 2, 28), d(2024, 2, 29), d(2024, 3, 1)]);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let days: Vec<_> = date_range(d(2024, 2, 2), d(2024, 2, 1)).collect();
        assert!(days.is_empty());
    }

    #[test]
    fn test_range_is_restartable() {
        let range = date_range(d(2024, 2, 1), d(2024, 2, 10));
        let first: Vec<_> = range.clone().collect();
        let second: Vec<_> = range.collect();
        assert_eq!(first, second);
    }
}
