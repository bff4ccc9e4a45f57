use time::{Date, Month};

/// Semesters in a four-year program; derived values never leave this range.
pub(crate) const PROGRAM_SEMESTERS: i32 = 8;

/// Start year encoded in a batch name such as "2023-2027" or "2023-2027 A".
/// Anything that does not begin with a 4-digit year yields `None`.
pub(crate) fn batch_start_year(batch_name: &str) -> Option<i32> {
    let head = batch_name.trim().split('-').next()?.trim();
    if head.len() != 4 || !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    head.parse().ok()
}

/// Current semester for a batch as of the given date.
///
/// The academic year turns over on July 1: January through June belong to the
/// even semester of the academic year in progress, July through December open
/// the odd semester of the next one. An unparsable batch name falls back to
/// semester 1; the fallback is logged for data-quality visibility but is not
/// an error to the caller.
pub(crate) fn current_semester(batch_name: &str, as_of: Date) -> i32 {
    let Some(start_year) = batch_start_year(batch_name) else {
        tracing::warn!(batch = %batch_name, "Unparsable batch name; defaulting to semester 1");
        return 1;
    };

    let offset = as_of.year() - start_year;
    let semester = if (as_of.month() as u8) < (Month::July as u8) {
        offset * 2
    } else {
        offset * 2 + 1
    };

    semester.clamp(1, PROGRAM_SEMESTERS)
}

/// Date window covered by the given semester of a batch.
///
/// Odd semesters span July 1 to December 31, even semesters January 1 to
/// June 30 of the following calendar year. Malformed input degrades to the
/// current calendar year's January 1 to December 31 window; these fields are
/// display-only, so availability wins over strictness.
pub(crate) fn semester_date_range(batch_name: &str, semester: i32, today: Date) -> (Date, Date) {
    let semester = semester.clamp(1, PROGRAM_SEMESTERS);

    let Some(start_year) = batch_start_year(batch_name) else {
        tracing::warn!(
            batch = %batch_name,
            "Unparsable batch name; falling back to the current calendar year window"
        );
        return calendar_year_window(today);
    };

    let academic_year = start_year + (semester - 1) / 2;
    let window = if semester % 2 == 1 {
        Date::from_calendar_date(academic_year, Month::July, 1).and_then(|from| {
            Date::from_calendar_date(academic_year, Month::December, 31).map(|to| (from, to))
        })
    } else {
        Date::from_calendar_date(academic_year + 1, Month::January, 1).and_then(|from| {
            Date::from_calendar_date(academic_year + 1, Month::June, 30).map(|to| (from, to))
        })
    };

    match window {
        Ok(range) => range,
        Err(err) => {
            tracing::warn!(
                batch = %batch_name,
                semester,
                error = %err,
                "Semester window out of range; falling back to the current calendar year window"
            );
            calendar_year_window(today)
        }
    }
}

fn calendar_year_window(today: Date) -> (Date, Date) {
    let from = Date::from_calendar_date(today.year(), Month::January, 1);
    let to = Date::from_calendar_date(today.year(), Month::December, 31);
    match (from, to) {
        (Ok(from), Ok(to)) => (from, to),
        _ => (today, today),
    }
}
