//! Month view for the calendar tab.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::core::booking::{parse_date_phrase, Booking};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    /// False for the leading and trailing days borrowed from adjacent months.
    pub in_month: bool,
    /// The backend asked for this date to be highlighted.
    pub marked: bool,
    pub bookings: Vec<&'a Booking>,
}

impl CalendarDay<'_> {
    pub fn is_booked(&self) -> bool {
        !self.bookings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid<'a> {
    pub first_day: NaiveDate,
    /// Sunday-first rows of seven days.
    pub weeks: Vec<Vec<CalendarDay<'a>>>,
}

impl MonthGrid<'_> {
    pub fn title(&self) -> String {
        self.first_day.format("%B %Y").to_string()
    }
}

pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// The weeks covering `today`'s month, each day annotated with the
/// bookings that cover it and whether it is in `marked`.
pub fn month_grid<'a>(
    today: NaiveDate,
    bookings: &'a [Booking],
    marked: &[NaiveDate],
) -> MonthGrid<'a> {
    let first_day = today.with_day(1).unwrap_or(today);
    let last_day = first_day
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first_day);
    let lead = u64::from(first_day.weekday().num_days_from_sunday());
    let mut cursor = first_day
        .checked_sub_days(Days::new(lead))
        .unwrap_or(first_day);

    let mut weeks = Vec::new();
    while cursor <= last_day {
        let mut week = Vec::with_capacity(7);
        for _ in 0..7 {
            week.push(CalendarDay {
                date: cursor,
                in_month: cursor.month() == first_day.month() && cursor.year() == first_day.year(),
                marked: marked.contains(&cursor),
                bookings: bookings.iter().filter(|b| b.covers(cursor)).collect(),
            });
            cursor = match cursor.succ_opt() {
                Some(next) => next,
                None => return MonthGrid { first_day, weeks },
            };
        }
        weeks.push(week);
    }

    MonthGrid { first_day, weeks }
}

/// Backend calendar entries that read as dates; the rest are dropped.
pub fn parse_marked_dates(raw: &[String]) -> Vec<NaiveDate> {
    raw.iter()
        .filter_map(|entry| parse_date_phrase(entry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::create_test_booking;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn october_2025_spans_five_sunday_first_weeks() {
        let grid = month_grid(ymd(2025, 10, 16), &[], &[]);

        assert_eq!(grid.title(), "October 2025");
        assert_eq!(grid.weeks.len(), 5);
        assert!(grid.weeks.iter().all(|week| week.len() == 7));
        assert_eq!(grid.weeks[0][0].date, ymd(2025, 9, 28));
        assert!(!grid.weeks[0][0].in_month);
        assert_eq!(grid.weeks[0][3].date, ymd(2025, 10, 1));
        assert!(grid.weeks[0][3].in_month);
        assert_eq!(grid.weeks[4][6].date, ymd(2025, 11, 1));
        assert!(!grid.weeks[4][6].in_month);
    }

    #[test]
    fn month_starting_on_sunday_has_no_leading_days() {
        // June 2025 starts on a Sunday.
        let grid = month_grid(ymd(2025, 6, 3), &[], &[]);
        assert_eq!(grid.weeks[0][0].date, ymd(2025, 6, 1));
        assert!(grid.weeks[0][0].in_month);
    }

    #[test]
    fn days_carry_covering_bookings_and_marks() {
        let bookings = vec![
            create_test_booking("1", "Asha", "2025-10-10", "2025-10-12"),
            create_test_booking("2", "Vikram", "2025-10-12", "2025-10-13"),
            create_test_booking("3", "Nobody", "someday", "later"),
        ];
        let marked = parse_marked_dates(&["2025-10-20".to_string(), "soon".to_string()]);
        let grid = month_grid(ymd(2025, 10, 1), &bookings, &marked);

        let day = |date: NaiveDate| {
            grid.weeks
                .iter()
                .flatten()
                .find(|day| day.date == date)
                .unwrap()
        };

        assert!(!day(ymd(2025, 10, 9)).is_booked());
        assert_eq!(day(ymd(2025, 10, 10)).bookings.len(), 1);
        let overlap: Vec<&str> = day(ymd(2025, 10, 12))
            .bookings
            .iter()
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(overlap, vec!["1", "2"]);
        assert!(day(ymd(2025, 10, 20)).marked);
        assert!(!day(ymd(2025, 10, 21)).marked);
        assert_eq!(marked.len(), 1);
    }
}
