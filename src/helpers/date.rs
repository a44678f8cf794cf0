//! Date helper functions

use chrono::{DateTime, Datelike, Utc};

/// Month abbreviations in pt-BR, the site's display locale
const MONTH_ABBR: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Format a publish date as `dd MMM yyyy`
///
/// # Examples
/// ```ignore
/// display_date(&date) // -> "15 mar 2021"
/// ```
pub fn display_date(date: &DateTime<Utc>) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        MONTH_ABBR[date.month0() as usize],
        date.year()
    )
}

/// Optional variant: an unknown date renders as an empty slot
pub fn display_date_opt(date: Option<&DateTime<Utc>>) -> String {
    date.map(display_date).unwrap_or_default()
}
