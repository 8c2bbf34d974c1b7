use chrono::{Datelike, Duration, NaiveDate, Utc};

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Number of days in the month `date` falls in.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// `date` pushed forward by the length of its own month.
pub fn month_ahead(date: NaiveDate) -> NaiveDate {
    date + Duration::days(i64::from(days_in_month(date)))
}
