//! Month arithmetic and grid layout for the mood calendar.
//!
//! Months are addressed two ways: absolutely as a [`MonthKey`], and
//! relatively as a signed offset from an origin month. The offset math
//! uses floor division so negative offsets cross year boundaries
//! exactly: one month before January 2025 is December 2024.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar month, the unit the store is keyed by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct MonthKey {
    pub year: i32,
    /// 1 through 12.
    pub month: u32,
}

impl MonthKey {
    /// Build a key. Panics if `month` is outside 1 through 12; callers
    /// own that precondition.
    pub fn new(year: i32, month: u32) -> Self {
        assert!((1..=12).contains(&month), "month {month} out of range");
        Self { year, month }
    }

    /// Key of the month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The following month.
    pub fn succ(self) -> Self {
        month_at_offset(self, 1)
    }

    /// The preceding month.
    pub fn pred(self) -> Self {
        month_at_offset(self, -1)
    }

    /// Date of a 1-based day number within this month, if in range.
    pub fn date(self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    /// English month name.
    pub fn month_name(self) -> &'static str {
        match self.month {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            12 => "December",
            _ => "Unknown",
        }
    }

    /// Header label, e.g. `March 2025`.
    pub fn label(self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

fn month_index(key: MonthKey) -> i64 {
    i64::from(key.year) * 12 + i64::from(key.month) - 1
}

/// Month reached by stepping `offset` months from `origin`. Negative
/// offsets step backwards across year boundaries.
pub fn month_at_offset(origin: MonthKey, offset: i64) -> MonthKey {
    let total = month_index(origin) + offset;
    MonthKey {
        year: total.div_euclid(12) as i32,
        month: (total.rem_euclid(12) + 1) as u32,
    }
}

/// Signed number of months from `origin` to `target`. Inverse of
/// [`month_at_offset`].
pub fn offset_between(origin: MonthKey, target: MonthKey) -> i64 {
    month_index(target) - month_index(origin)
}

/// Number of days in a month, leap years included.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Column index of the month's first day, Monday-first (0 = Monday).
/// `month` must be 1 through 12.
pub fn first_weekday_index(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap()
        .weekday()
        .num_days_from_monday()
}

/// One cell of a month's display grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridCell {
    /// Padding before the first day or after the last.
    Blank,
    /// A real day of the month, 1-based.
    Day(u32),
}

impl GridCell {
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }

    /// Day number, unless this cell is padding.
    pub fn day(&self) -> Option<u32> {
        match self {
            Self::Blank => None,
            Self::Day(day) => Some(*day),
        }
    }
}

/// Monday-first cell layout for a month: leading blanks up to the first
/// weekday, one cell per day, trailing blanks to a whole number of weeks.
pub fn day_grid(year: i32, month: u32) -> Vec<GridCell> {
    let lead = first_weekday_index(year, month) as usize;
    let mut grid = vec![GridCell::Blank; lead];
    grid.extend((1..=days_in_month(year, month)).map(GridCell::Day));
    while grid.len() % 7 != 0 {
        grid.push(GridCell::Blank);
    }
    grid
}

/// Cursor over the month series, measured as an offset from an origin
/// month. Forward navigation is unbounded; backward navigation stops at
/// the origin, matching the calendar pager.
#[derive(Debug, Clone)]
pub struct CalendarNavigator {
    origin: MonthKey,
    offset: i64,
}

impl CalendarNavigator {
    /// Start at the origin month.
    pub fn new(origin: MonthKey) -> Self {
        Self { origin, offset: 0 }
    }

    pub fn origin(&self) -> MonthKey {
        self.origin
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Month the cursor is on.
    pub fn current(&self) -> MonthKey {
        month_at_offset(self.origin, self.offset)
    }

    /// Step forward one month.
    pub fn advance(&mut self) -> MonthKey {
        self.offset += 1;
        self.current()
    }

    /// Step back one month, unless already at the origin.
    pub fn retreat(&mut self) -> MonthKey {
        if self.offset > 0 {
            self.offset -= 1;
        }
        self.current()
    }

    /// Move the cursor to an arbitrary month.
    pub fn jump_to(&mut self, target: MonthKey) {
        self.offset = offset_between(self.origin, target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_offset_crosses_year_boundaries() {
        let origin = MonthKey::new(2025, 1);
        assert_eq!(month_at_offset(origin, 0), MonthKey::new(2025, 1));
        assert_eq!(month_at_offset(origin, -1), MonthKey::new(2024, 12));
        assert_eq!(month_at_offset(origin, 11), MonthKey::new(2025, 12));
        assert_eq!(month_at_offset(origin, 12), MonthKey::new(2026, 1));
        assert_eq!(month_at_offset(origin, 13), MonthKey::new(2026, 2));
        assert_eq!(month_at_offset(origin, -13), MonthKey::new(2023, 12));
    }

    #[test]
    fn test_offset_between_is_inverse() {
        let origin = MonthKey::new(2025, 6);
        assert_eq!(offset_between(origin, MonthKey::new(2025, 6)), 0);
        assert_eq!(offset_between(origin, MonthKey::new(2026, 2)), 8);
        assert_eq!(offset_between(origin, MonthKey::new(2024, 12)), -6);
    }

    #[test]
    fn test_succ_and_pred() {
        assert_eq!(MonthKey::new(2024, 12).succ(), MonthKey::new(2025, 1));
        assert_eq!(MonthKey::new(2025, 1).pred(), MonthKey::new(2024, 12));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 1), 31);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
    }

    #[test]
    fn test_first_weekday_index() {
        // Jan 1, 2024 is Monday
        assert_eq!(first_weekday_index(2024, 1), 0);
        // Mar 1, 2025 is Saturday
        assert_eq!(first_weekday_index(2025, 3), 5);
        // Jun 1, 2025 is Sunday
        assert_eq!(first_weekday_index(2025, 6), 6);
    }

    #[test]
    fn test_day_grid_layout() {
        let grid = day_grid(2025, 3);
        assert_eq!(grid.len(), 42);
        assert!(grid[..5].iter().all(GridCell::is_blank));
        assert_eq!(grid[5], GridCell::Day(1));
        assert_eq!(grid[35], GridCell::Day(31));
        assert!(grid[36..].iter().all(GridCell::is_blank));
    }

    #[test]
    fn test_day_grid_invariants_across_months() {
        for year in [2024, 2025, 2026] {
            for month in 1..=12 {
                let grid = day_grid(year, month);
                assert_eq!(grid.len() % 7, 0, "{year}-{month}");
                let day_cells = grid.iter().filter(|c| !c.is_blank()).count();
                assert_eq!(day_cells as u32, days_in_month(year, month));
                let lead = grid.iter().take_while(|c| c.is_blank()).count();
                assert_eq!(lead as u32, first_weekday_index(year, month));
            }
        }
    }

    #[test]
    fn test_navigator_clamps_at_origin() {
        let mut nav = CalendarNavigator::new(MonthKey::new(2025, 1));
        assert_eq!(nav.retreat(), MonthKey::new(2025, 1));
        assert_eq!(nav.advance(), MonthKey::new(2025, 2));
        assert_eq!(nav.advance(), MonthKey::new(2025, 3));
        assert_eq!(nav.retreat(), MonthKey::new(2025, 2));
        assert_eq!(nav.offset(), 1);
    }

    #[test]
    fn test_navigator_jump() {
        let mut nav = CalendarNavigator::new(MonthKey::new(2025, 1));
        nav.jump_to(MonthKey::new(2024, 12));
        assert_eq!(nav.offset(), -1);
        assert_eq!(nav.current(), MonthKey::new(2024, 12));
    }

    proptest! {
        #[test]
        fn prop_offset_round_trip(
            year in 1970i32..2100,
            month in 1u32..=12,
            offset in -600i64..600,
        ) {
            let origin = MonthKey::new(year, month);
            let target = month_at_offset(origin, offset);
            prop_assert_eq!(offset_between(origin, target), offset);
            prop_assert!((1..=12).contains(&target.month));
        }

        #[test]
        fn prop_grid_is_whole_weeks(year in 1970i32..2100, month in 1u32..=12) {
            let grid = day_grid(year, month);
            prop_assert_eq!(grid.len() % 7, 0);
            let days = grid.iter().filter_map(GridCell::day).collect::<Vec<_>>();
            prop_assert_eq!(days.len() as u32, days_in_month(year, month));
            prop_assert_eq!(days.first().copied(), Some(1));
            prop_assert_eq!(days.last().copied(), Some(days_in_month(year, month)));
        }
    }
}
