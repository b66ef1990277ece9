use crate::utils::constants::{DEFAULT_OUTPUT_DIR, TIMESTAMP_FORMAT};
use chrono::{DateTime, Local, TimeZone};
use std::path::{Path, PathBuf};

/// Build an output filename with format: {prefix}[_{site}]_{YYYYMMDD}_{HHMM}.csv
pub fn timestamped_filename<Tz: TimeZone>(prefix: &str, site: Option<&str>, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let stamp = at.format(TIMESTAMP_FORMAT);
    match site.filter(|s| !s.is_empty()) {
        Some(site) => format!("{}_{}{}.csv", prefix, site, stamp),
        None => format!("{}{}.csv", prefix, stamp),
    }
}

/// Default output path: {output_dir}[/{site}]/{prefix}[_{site}]_{YYYYMMDD}_{HHMM}.csv
pub fn generate_output_path(output_dir: Option<&Path>, prefix: &str, site: Option<&str>) -> PathBuf {
    let base = output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    let dir = match site.filter(|s| !s.is_empty()) {
        Some(site) => base.join(site),
        None => base,
    };
    dir.join(timestamped_filename(prefix, site, &Local::now()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_timestamped_filename() {
        let at = Utc.with_ymd_and_hms(2018, 6, 4, 9, 5, 0).unwrap();

        assert_eq!(
            timestamped_filename("Relocated", Some("EF_ACC_SECT_M"), &at),
            "Relocated_EF_ACC_SECT_M_20180604_0905.csv"
        );
        assert_eq!(
            timestamped_filename("significant_flight_obst", None, &at),
            "significant_flight_obst_20180604_0905.csv"
        );
        assert_eq!(
            timestamped_filename("Unclear_IDs", Some(""), &at),
            "Unclear_IDs_20180604_0905.csv"
        );
    }

    #[test]
    fn test_generate_output_path() {
        let path = generate_output_path(Some(Path::new("/tmp/out")), "Relocated", Some("EFHK"));
        let path_str = path.to_string_lossy();

        assert!(path_str.starts_with("/tmp/out/EFHK/Relocated_EFHK_"));
        assert!(path_str.ends_with(".csv"));

        let path = generate_output_path(None, "VSS_Point_Coord", None);
        assert_eq!(path.parent(), Some(Path::new("output")));
    }
}
