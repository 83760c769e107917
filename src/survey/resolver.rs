//! Decides which survey date is actually displayed.
//!
//! The user's selection is honoured when the current view has imagery for
//! it; otherwise the closest capture date in time is shown instead.

use super::model::Survey;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parses a capture date. Accepts RFC 3339 timestamps, `YYYY-MM-DD` (midnight
/// UTC) and `YYYY-MM-DDTHH:MM:SS` (taken as UTC).
pub fn parse_capture_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Some(date_time.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc())
}

/// Capture date of the survey closest in time to `selected_date`, measured
/// from now when no date is selected.
///
/// Returns `None` only for an empty slice.
pub fn find_closest_date<'a>(surveys: &'a [Survey], selected_date: Option<&str>) -> Option<&'a str> {
    find_closest_date_at(surveys, selected_date, Utc::now())
}

/// [`find_closest_date`] with an explicit "now".
///
/// Equal distances resolve to the earliest survey in slice order. Surveys
/// whose date cannot be parsed rank behind every parseable one.
pub fn find_closest_date_at<'a>(
    surveys: &'a [Survey],
    selected_date: Option<&str>,
    now: DateTime<Utc>,
) -> Option<&'a str> {
    let target = match selected_date.filter(|date| !date.is_empty()) {
        Some(date) => parse_capture_date(date).unwrap_or_else(|| {
            log::warn!("unparseable survey date {:?}, measuring from now", date);
            now
        }),
        None => now,
    };

    surveys
        .iter()
        .min_by_key(|survey| {
            parse_capture_date(&survey.capture_date)
                .map(|date| (target - date).num_milliseconds().unsigned_abs())
                .unwrap_or(u64::MAX)
        })
        .map(|survey| survey.capture_date.as_str())
}

/// The survey date to display for the current coverage.
///
/// `None` when nothing is available. The selected date itself when any
/// available survey was captured on it, the closest capture date otherwise.
pub fn resolve_survey_date(available: &[Survey], selected_date: Option<&str>) -> Option<String> {
    resolve_survey_date_at(available, selected_date, Utc::now())
}

/// [`resolve_survey_date`] with an explicit "now".
pub fn resolve_survey_date_at(
    available: &[Survey],
    selected_date: Option<&str>,
    now: DateTime<Utc>,
) -> Option<String> {
    if available.is_empty() {
        return None;
    }

    if let Some(selected) = selected_date {
        if available.iter().any(|survey| survey.capture_date == selected) {
            return Some(selected.to_string());
        }
    }

    let closest = find_closest_date_at(available, selected_date, now).map(str::to_string);
    log::info!(
        "survey {:?} not covered here, showing {:?}",
        selected_date,
        closest
    );
    closest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surveys(dates: &[&str]) -> Vec<Survey> {
        dates.iter().map(|d| Survey::new(*d, &["Vert"])).collect()
    }

    fn at(date: &str) -> DateTime<Utc> {
        parse_capture_date(date).unwrap()
    }

    #[test]
    fn test_empty_resolves_to_none() {
        assert_eq!(resolve_survey_date(&[], Some("2020-01-01")), None);
        assert_eq!(resolve_survey_date(&[], None), None);
        assert_eq!(find_closest_date(&[], None), None);
    }

    #[test]
    fn test_exact_match_is_kept() {
        let available = surveys(&["2020-01-01", "2020-01-10"]);
        assert_eq!(
            resolve_survey_date(&available, Some("2020-01-10")),
            Some("2020-01-10".to_string())
        );
    }

    #[test]
    fn test_falls_back_to_closest() {
        let available = surveys(&["2020-01-01", "2020-01-10"]);
        assert_eq!(
            resolve_survey_date(&available, Some("2020-01-03")),
            Some("2020-01-01".to_string())
        );
        assert_eq!(
            resolve_survey_date(&available, Some("2020-01-08")),
            Some("2020-01-10".to_string())
        );
    }

    #[test]
    fn test_tie_goes_to_first() {
        let available = surveys(&["2020-01-05", "2020-01-01"]);
        assert_eq!(find_closest_date(&available, Some("2020-01-03")), Some("2020-01-05"));

        let reversed = surveys(&["2020-01-01", "2020-01-05"]);
        assert_eq!(find_closest_date(&reversed, Some("2020-01-03")), Some("2020-01-01"));
    }

    #[test]
    fn test_no_selection_measures_from_now() {
        let available = surveys(&["2019-06-01", "2021-03-01", "2020-12-01"]);
        assert_eq!(
            resolve_survey_date_at(&available, None, at("2021-02-01")),
            Some("2021-03-01".to_string())
        );
        assert_eq!(
            find_closest_date_at(&available, Some(""), at("2019-01-01")),
            Some("2019-06-01")
        );
    }

    #[test]
    fn test_unparseable_dates_rank_last() {
        let available = surveys(&["not a date", "2020-01-01"]);
        assert_eq!(find_closest_date(&available, Some("2020-01-02")), Some("2020-01-01"));

        let garbage = surveys(&["???", "!!!"]);
        assert_eq!(find_closest_date(&garbage, Some("2020-01-02")), Some("???"));
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!(at("2020-01-01"), at("2020-01-01T00:00:00Z"));
        assert_eq!(at("2020-01-01T10:00:00"), at("2020-01-01T10:00:00+00:00"));
        assert!(parse_capture_date("01/02/2020").is_none());
    }
}
