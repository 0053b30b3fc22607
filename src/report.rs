//! Report formatters for the analysis results.
//!
//! Each writer takes any `W: Write` so formatting is testable against a
//! buffer; the pipeline hands them `BufWriter<File>`s. The blocked report
//! has no writer here: its lines are appended verbatim during the pass, in
//! arrival order.

use std::io::{self, Write};

use crate::models::TIMESTAMP_FORMAT;
use crate::window::WindowCount;

/// Write the busiest-hosts report: `<address>,<count>` per line, count
/// descending.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_hosts<W: Write>(writer: &mut W, hosts: &[(String, u64)]) -> io::Result<()> {
    for (host, count) in hosts {
        writeln!(writer, "{host},{count}")?;
    }
    Ok(())
}

/// Write the busiest-windows report: `<start>,<count>` per line, with the
/// start rendered in the log's own timestamp format followed by `tz_offset`.
///
/// Ordering (count descending, start ascending) is the tracker's; it is not
/// re-sorted here.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_windows<W: Write>(
    writer: &mut W,
    windows: &[WindowCount],
    tz_offset: &str,
) -> io::Result<()> {
    for window in windows {
        writeln!(
            writer,
            "{} {tz_offset},{}",
            window.start.format(TIMESTAMP_FORMAT),
            window.count
        )?;
    }
    Ok(())
}

/// Write the heaviest-resources report: one resource path per line, total
/// bytes descending. Totals are ranking-only and never printed.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_resources<W: Write>(writer: &mut W, resources: &[(String, u64)]) -> io::Result<()> {
    for (resource, _) in resources {
        writeln!(writer, "{resource}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_write_hosts() {
        let hosts = vec![
            ("example.com".to_string(), 42),
            ("10.0.0.1".to_string(), 7),
        ];
        let mut buf = Vec::new();
        write_hosts(&mut buf, &hosts).expect("write failed");
        assert_eq!(buf, b"example.com,42\n10.0.0.1,7\n");
    }

    #[test]
    fn test_write_windows() {
        let start = NaiveDate::from_ymd_opt(1995, 7, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 1))
            .expect("valid date");
        let windows = vec![WindowCount { start, count: 100 }];
        let mut buf = Vec::new();
        write_windows(&mut buf, &windows, "-0400").expect("write failed");
        assert_eq!(buf, b"01/Jul/1995:00:00:01 -0400,100\n");
    }

    #[test]
    fn test_write_resources_paths_only() {
        let resources = vec![
            ("/shuttle/missions/".to_string(), 999_999),
            ("/images/logo.gif".to_string(), 12),
        ];
        let mut buf = Vec::new();
        write_resources(&mut buf, &resources).expect("write failed");
        assert_eq!(buf, b"/shuttle/missions/\n/images/logo.gif\n");
    }

    #[test]
    fn test_empty_reports() {
        let mut buf = Vec::new();
        write_hosts(&mut buf, &[]).expect("write failed");
        write_windows(&mut buf, &[], "-0400").expect("write failed");
        write_resources(&mut buf, &[]).expect("write failed");
        assert!(buf.is_empty());
    }
}
