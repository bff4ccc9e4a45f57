use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

pub(crate) fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    value.assume_utc().format(&Rfc3339).unwrap_or_else(|_| value.assume_utc().to_string())
}

/// ISO calendar date for API payloads.
pub(crate) fn format_date(value: Date) -> String {
    value
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| value.to_string())
}

/// Day/month/year order used inside certificate bodies.
pub(crate) fn format_certificate_date(value: Date) -> String {
    value
        .format(format_description!("[day]/[month]/[year]"))
        .unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn format_primitive_outputs_utc_z() {
        assert_eq!(format_primitive(datetime!(2025 - 01 - 02 10 : 20 : 30)), "2025-01-02T10:20:30Z");
    }

    #[test]
    fn format_date_is_iso() {
        assert_eq!(format_date(date!(2025 - 07 - 01)), "2025-07-01");
    }

    #[test]
    fn certificate_date_is_day_first_and_zero_padded() {
        assert_eq!(format_certificate_date(date!(2026 - 03 - 05)), "05/03/2026");
        assert_eq!(format_certificate_date(date!(2026 - 12 - 31)), "31/12/2026");
    }
}
