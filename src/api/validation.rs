use crate::api::errors::ApiError;
use crate::services::calendar::PROGRAM_SEMESTERS;

/// Batch names encode the academic year range: a 4-digit start year, a dash,
/// a 4-digit end year, optionally followed by a space and a section.
pub(crate) fn validate_batch_name(name: &str) -> Result<(), ApiError> {
    let trimmed = name.trim();
    let invalid = || {
        ApiError::BadRequest(format!(
            "Batch name '{trimmed}' must look like '2023-2027' or '2023-2027 A'"
        ))
    };

    let (years, _section) = match trimmed.split_once(' ') {
        Some((years, section)) if !section.trim().is_empty() => (years, Some(section)),
        Some(_) => return Err(invalid()),
        None => (trimmed, None),
    };

    let Some((start, end)) = years.split_once('-') else {
        return Err(invalid());
    };
    if !is_four_digit_year(start) || !is_four_digit_year(end) {
        return Err(invalid());
    }

    let start: i32 = start.parse().map_err(|_| invalid())?;
    let end: i32 = end.parse().map_err(|_| invalid())?;
    if end <= start {
        return Err(ApiError::BadRequest(format!(
            "Batch name '{trimmed}' must end after it starts"
        )));
    }

    Ok(())
}

pub(crate) fn validate_semester_override(value: i32) -> Result<(), ApiError> {
    if (1..=PROGRAM_SEMESTERS).contains(&value) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Semester override must be between 1 and {PROGRAM_SEMESTERS}"
        )))
    }
}

fn is_four_digit_year(value: &str) -> bool {
    value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_sectioned_names() {
        validate_batch_name("2023-2027").expect("plain");
        validate_batch_name("2023-2027 A").expect("sectioned");
        validate_batch_name(" 2023-2027 B ").expect("padded");
    }

    #[test]
    fn rejects_malformed_names() {
        for name in ["2023", "23-27", "2023_2027", "abcd-efgh", "2027-2023", "2023-2023"] {
            assert!(validate_batch_name(name).is_err(), "expected rejection for {name:?}");
        }
    }

    #[test]
    fn override_must_stay_in_program_range() {
        validate_semester_override(1).expect("lower bound");
        validate_semester_override(8).expect("upper bound");
        assert!(validate_semester_override(0).is_err());
        assert!(validate_semester_override(9).is_err());
    }
}
