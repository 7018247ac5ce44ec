//! Destination folder naming.

use crate::core::resolver::ResolvedTimestamp;
use chrono::{DateTime, Datelike, Local};
use std::fmt;
use std::path::PathBuf;

/// Folder for files whose timestamp could not be resolved
pub const UNSORTED_FOLDER: &str = "Unsorted";

/// Where a file goes, relative to the output root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// `<YYYY>/<MM> <MonthName>`
    Dated { year: String, month: String },
    /// No usable timestamp
    Unsorted,
}

impl Placement {
    pub fn for_timestamp(resolved: ResolvedTimestamp) -> Self {
        match resolved {
            ResolvedTimestamp::Known(time) => Self::for_time(time),
            ResolvedTimestamp::Unknown => Placement::Unsorted,
        }
    }

    pub fn for_time(time: DateTime<Local>) -> Self {
        Placement::Dated {
            year: format!("{:04}", time.year()),
            month: time.format("%m %B").to_string(),
        }
    }

    /// Path relative to the output root
    pub fn relative_path(&self) -> PathBuf {
        match self {
            Placement::Dated { year, month } => PathBuf::from(year).join(month),
            Placement::Unsorted => PathBuf::from(UNSORTED_FOLDER),
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::Dated { year, month } => write!(f, "{}/{}", year, month),
            Placement::Unsorted => write!(f, "{}", UNSORTED_FOLDER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn january_folder() {
        let placement = Placement::for_time(at(2024, 1, 15));
        assert_eq!(placement.to_string(), "2024/01 January");
        assert_eq!(
            placement.relative_path(),
            PathBuf::from("2024").join("01 January")
        );
    }

    #[test]
    fn december_folder() {
        assert_eq!(
            Placement::for_time(at(1999, 12, 31)).to_string(),
            "1999/12 December"
        );
    }

    #[test]
    fn month_is_zero_padded() {
        assert_eq!(
            Placement::for_time(at(2003, 9, 1)).to_string(),
            "2003/09 September"
        );
    }

    #[test]
    fn unknown_goes_to_unsorted() {
        let placement = Placement::for_timestamp(ResolvedTimestamp::Unknown);
        assert_eq!(placement, Placement::Unsorted);
        assert_eq!(placement.relative_path(), PathBuf::from("Unsorted"));
    }
}
