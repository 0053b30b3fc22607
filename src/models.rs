//! Data model for access-log records.
//!
//! One [`LogRecord`] per input line, parsed from the NCSA common log format:
//!
//! ```text
//! 199.72.81.55 - - [01/Jul/1995:00:00:01 -0400] "GET /history/apollo/ HTTP/1.0" 200 6245
//! ```
//!
//! Timestamps are kept as [`NaiveDateTime`] in the log's local time as
//! written; the UTC offset is retained as text for output formatting only
//! and never enters comparisons.

use chrono::NaiveDateTime;

use crate::errors::LogsiftError;

/// Timestamp layout inside the bracketed section.
pub const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S";

/// One parsed access-log entry.
///
/// Immutable once parsed; `raw` preserves the original line verbatim for the
/// blocked report.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// Requesting client (hostname or IP address)
    pub host: String,

    /// Request time at second resolution, local to the log
    pub timestamp: NaiveDateTime,

    /// UTC offset as written, e.g. `-0400`
    pub tz_offset: String,

    /// Request line with the surrounding quotes stripped,
    /// e.g. `GET /history/apollo/ HTTP/1.0`
    pub request: String,

    /// HTTP reply code as written (kept textual, it is only ever compared)
    pub reply_code: String,

    /// Bytes transferred; the `-` placeholder parses as 0
    pub bytes: u64,

    /// The original line, verbatim
    pub raw: String,
}

impl LogRecord {
    /// Parse one log line. `line_no` is 1-based and only used in errors.
    ///
    /// # Errors
    ///
    /// Returns an error if any field is missing or the timestamp / byte
    /// count cannot be parsed. Parsing is all-or-nothing; there is no
    /// partial record.
    pub fn parse(line: &str, line_no: u64) -> Result<Self, LogsiftError> {
        let line = line.trim();
        let malformed = |reason| LogsiftError::MalformedLine {
            line_no,
            reason,
            line: line.to_string(),
        };

        let host = line
            .split_whitespace()
            .next()
            .ok_or_else(|| malformed("empty line"))?
            .to_string();

        // Bracketed section: timestamp and offset.
        let ts_open = line.find('[').ok_or_else(|| malformed("no timestamp bracket"))?;
        let ts_close = line[ts_open..]
            .find(']')
            .map(|i| ts_open + i)
            .ok_or_else(|| malformed("unclosed timestamp bracket"))?;
        let bracket = &line[ts_open + 1..ts_close];
        let (ts_text, tz_offset) = bracket
            .split_once(' ')
            .ok_or_else(|| malformed("no timezone offset"))?;
        let timestamp = NaiveDateTime::parse_from_str(ts_text, TIMESTAMP_FORMAT)
            .map_err(|_| LogsiftError::BadTimestamp {
                line_no,
                text: ts_text.to_string(),
            })?;

        // Quoted request line; trailing fields come after the closing quote.
        let rq_open = line[ts_close..]
            .find('"')
            .map(|i| ts_close + i)
            .ok_or_else(|| malformed("no request line"))?;
        let rq_close = line.rfind('"').ok_or_else(|| malformed("no request line"))?;
        if rq_close <= rq_open {
            return Err(malformed("unclosed request line"));
        }
        let request = line[rq_open + 1..rq_close].to_string();

        let mut tail = line[rq_close + 1..].split_whitespace();
        let reply_code = tail
            .next()
            .ok_or_else(|| malformed("no reply code"))?
            .to_string();
        let bytes_text = tail.next().ok_or_else(|| malformed("no byte count"))?;
        let bytes = if bytes_text == "-" {
            0
        } else {
            bytes_text.parse().map_err(|_| LogsiftError::BadByteCount {
                line_no,
                text: bytes_text.to_string(),
            })?
        };

        Ok(Self {
            host,
            timestamp,
            tz_offset: tz_offset.to_string(),
            request,
            reply_code,
            bytes,
            raw: line.to_string(),
        })
    }

    /// The requested resource: the second token of the request line
    /// (`GET /path HTTP/1.0` → `/path`).
    ///
    /// # Errors
    ///
    /// A request line with fewer than two tokens is malformed.
    pub fn resource(&self, line_no: u64) -> Result<&str, LogsiftError> {
        self.request
            .split_whitespace()
            .nth(1)
            .ok_or_else(|| LogsiftError::MalformedLine {
                line_no,
                reason: "request line has no resource",
                line: self.raw.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE: &str =
        "199.72.81.55 - - [01/Jul/1995:00:00:01 -0400] \"GET /history/apollo/ HTTP/1.0\" 200 6245";

    #[test]
    fn test_parse_sample_line() {
        let rec = LogRecord::parse(SAMPLE, 1).expect("failed to parse sample line");

        assert_eq!(rec.host, "199.72.81.55");
        assert_eq!(
            rec.timestamp,
            NaiveDate::from_ymd_opt(1995, 7, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 1))
                .expect("valid date")
        );
        assert_eq!(rec.tz_offset, "-0400");
        assert_eq!(rec.request, "GET /history/apollo/ HTTP/1.0");
        assert_eq!(rec.reply_code, "200");
        assert_eq!(rec.bytes, 6245);
        assert_eq!(rec.raw, SAMPLE);
        assert_eq!(rec.resource(1).expect("resource"), "/history/apollo/");
    }

    #[test]
    fn test_parse_strips_surrounding_whitespace() {
        // `raw` feeds the blocked report verbatim, so padding on either
        // edge must not survive parsing.
        let padded = format!("  {SAMPLE}\t\n");
        let rec = LogRecord::parse(&padded, 1).expect("failed to parse");

        assert_eq!(rec.raw, SAMPLE);
        assert_eq!(rec.host, "199.72.81.55");
        assert_eq!(rec.bytes, 6245);
    }

    #[test]
    fn test_parse_dash_bytes_as_zero() {
        let line = "burger.letters.com - - [01/Jul/1995:00:00:12 -0400] \"GET /images/NASA-logosmall.gif HTTP/1.0\" 304 -";
        let rec = LogRecord::parse(line, 3).expect("failed to parse");
        assert_eq!(rec.bytes, 0);
        assert_eq!(rec.reply_code, "304");
    }

    #[test]
    fn test_parse_request_with_spaces() {
        // Paths containing spaces survive: the request is quote-delimited,
        // not token-counted.
        let line = "host - - [01/Jul/1995:00:00:01 -0400] \"GET /a b/c HTTP/1.0\" 200 10";
        let rec = LogRecord::parse(line, 1).expect("failed to parse");
        assert_eq!(rec.request, "GET /a b/c HTTP/1.0");
        assert_eq!(rec.resource(1).expect("resource"), "/a");
    }

    #[test]
    fn test_parse_malformed_lines() {
        assert!(LogRecord::parse("", 1).is_err());
        assert!(LogRecord::parse("host - - no brackets here", 1).is_err());
        assert!(LogRecord::parse(
            "host - - [01/Jul/1995:00:00:01 -0400] no quotes 200 10",
            1
        )
        .is_err());
        // unparseable timestamp
        assert!(LogRecord::parse(
            "host - - [1995-07-01 00:00:01 -0400] \"GET / HTTP/1.0\" 200 10",
            1
        )
        .is_err());
        // non-numeric byte count
        assert!(LogRecord::parse(
            "host - - [01/Jul/1995:00:00:01 -0400] \"GET / HTTP/1.0\" 200 ten",
            1
        )
        .is_err());
    }

    #[test]
    fn test_resource_missing_is_error() {
        let line = "host - - [01/Jul/1995:00:00:01 -0400] \"GET\" 200 10";
        let rec = LogRecord::parse(line, 7).expect("failed to parse");
        assert!(rec.resource(7).is_err());
    }
}
