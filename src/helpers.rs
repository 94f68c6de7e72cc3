//! Display formatting shared by the details, providers and queue endpoints.

use chrono::NaiveDate;

/// Shown when a title has no poster
pub const POSTER_PLACEHOLDER: &str = "/poster-placeholder.jpeg";

const POSTER_SIZE: &str = "w500";
const LOGO_SIZE: &str = "original";

/// Length of a complete `YYYY-MM-DD` date
const FULL_DATE_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSize {
    /// `October 22, 2021`
    Long,
    /// `Oct 22, 2021`
    Short,
}

/// Full poster URL for a TMDB poster path, or the placeholder
pub fn poster_url(image_base: &str, path: Option<&str>) -> String {
    match path {
        Some(p) if !p.is_empty() => format!("{}/{}{}", image_base, POSTER_SIZE, p),
        _ => POSTER_PLACEHOLDER.to_string(),
    }
}

/// Full logo URL for a TMDB provider logo path
pub fn logo_url(image_base: &str, path: &str) -> String {
    format!("{}/{}{}", image_base, LOGO_SIZE, path)
}

/// The year part of an upstream date, `N/A` when there is none
pub fn release_year(date: Option<&str>) -> String {
    match date {
        Some(d) if d.len() >= 4 && d.is_char_boundary(4) => d[..4].to_string(),
        _ => "N/A".to_string(),
    }
}

/// Human readable release date. Partial or invalid dates yield `None`.
pub fn format_release_date(date: &str, size: DateSize) -> Option<String> {
    if date.len() != FULL_DATE_LEN {
        return None;
    }

    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let pattern = match size {
        DateSize::Long => "%B %-d, %Y",
        DateSize::Short => "%b %-d, %Y",
    };

    Some(parsed.format(pattern).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

    #[test]
    fn test_poster_url_with_path() {
        assert_eq!(
            poster_url(IMAGE_BASE, Some("/d5NXSklXo0qyIYkgV94XAgMIckC.jpg")),
            "https://image.tmdb.org/t/p/w500/d5NXSklXo0qyIYkgV94XAgMIckC.jpg"
        );
    }

    #[test]
    fn test_poster_url_placeholder() {
        assert_eq!(poster_url(IMAGE_BASE, None), POSTER_PLACEHOLDER);
        assert_eq!(poster_url(IMAGE_BASE, Some("")), POSTER_PLACEHOLDER);
    }

    #[test]
    fn test_logo_url() {
        assert_eq!(
            logo_url(IMAGE_BASE, "/netflix.jpg"),
            "https://image.tmdb.org/t/p/original/netflix.jpg"
        );
    }

    #[test]
    fn test_release_year() {
        assert_eq!(release_year(Some("2021-10-22")), "2021");
        assert_eq!(release_year(Some("")), "N/A");
        assert_eq!(release_year(None), "N/A");
    }

    #[test]
    fn test_format_release_date_long() {
        assert_eq!(
            format_release_date("2021-10-22", DateSize::Long),
            Some("October 22, 2021".to_string())
        );
    }

    #[test]
    fn test_format_release_date_short() {
        assert_eq!(
            format_release_date("2024-11-07", DateSize::Short),
            Some("Nov 7, 2024".to_string())
        );
    }

    #[test]
    fn test_format_release_date_rejects_partial() {
        assert_eq!(format_release_date("2021", DateSize::Long), None);
        assert_eq!(format_release_date("2021-13-40", DateSize::Long), None);
    }
}
