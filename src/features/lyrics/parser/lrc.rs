//! Synced lyrics parser
//!
//! Supports the `[mm:ss.xx]text` and `[mm:ss.xxx]text` line format.
//! The fraction's digit count selects its scale: two digits are
//! centiseconds, three digits are taken as milliseconds verbatim.

use super::types::LyricLine;

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse timestamp from the start of `src`: `[mm:ss.xx]` or `[mm:ss.xxx]`
///
/// Returns the byte length of the tag and the time in milliseconds.
fn parse_time(src: &str) -> Option<(usize, u64)> {
    let inner = src.strip_prefix('[')?;
    let end_bracket = inner.find(']')?;
    let time_str = &inner[..end_bracket];

    // Metadata tags like [ar:Artist] fail the digit checks below
    let (min_str, rest) = time_str.split_once(':')?;
    let (sec_str, frac_str) = rest.split_once('.')?;
    if !is_digits(min_str) || !is_digits(sec_str) || !is_digits(frac_str) {
        return None;
    }

    let min: u64 = min_str.parse().ok()?;
    let sec: u64 = sec_str.parse().ok()?;
    let frac: u64 = frac_str.parse().ok()?;

    let frac_ms = match frac_str.len() {
        2 => frac * 10,
        3 => frac,
        _ => return None,
    };

    let time_ms = min
        .checked_mul(60)?
        .checked_add(sec)?
        .checked_mul(1000)?
        .checked_add(frac_ms)?;

    Some((end_bracket + 2, time_ms))
}

/// Parse a single synced line, `None` if it is malformed or has no text
fn parse_line(line: &str) -> Option<LyricLine> {
    let line = line.trim_start();
    let (consumed, start_time_ms) = parse_time(line)?;

    let text = line[consumed..].trim();
    if text.is_empty() {
        return None;
    }

    Some(LyricLine::new(text, start_time_ms))
}

/// Parse synced lyrics into lines, in input order
///
/// Malformed lines are skipped; a blob with no valid line yields an empty
/// sequence.
pub fn parse_synced(src: &str) -> Vec<LyricLine> {
    let lines: Vec<LyricLine> = src.lines().filter_map(parse_line).collect();
    tracing::debug!("Parsed {} synced lyrics lines", lines.len());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("[00:01.12]"), Some((10, 1120)));
        assert_eq!(parse_time("[00:10.254]"), Some((11, 10254)));
        assert_eq!(parse_time("[02:00.00]"), Some((10, 120_000)));
        assert_eq!(parse_time("[00:00.00]"), Some((10, 0)));
    }

    #[test]
    fn test_fraction_scale_follows_digit_count() {
        assert_eq!(parse_time("[00:01.50]").map(|(_, t)| t), Some(1500));
        assert_eq!(parse_time("[00:01.500]").map(|(_, t)| t), Some(1500));
        assert_eq!(parse_time("[00:00.005]").map(|(_, t)| t), Some(5));
        assert_eq!(parse_time("[00:00.05]").map(|(_, t)| t), Some(50));
    }

    #[test]
    fn test_rejects_malformed_tags() {
        assert_eq!(parse_time("[ar:Artist]"), None);
        assert_eq!(parse_time("[00:01]"), None);
        assert_eq!(parse_time("[00:01.1]"), None);
        assert_eq!(parse_time("[00:01.1234]"), None);
        assert_eq!(parse_time("[+0:01.12]"), None);
        assert_eq!(parse_time("00:01.12]"), None);
    }

    #[test]
    fn test_parse_synced() {
        let lines = parse_synced("[00:01.50]Hello\n[00:03.00]World");
        assert_eq!(
            lines,
            vec![LyricLine::new("Hello", 1500), LyricLine::new("World", 3000)]
        );
    }

    #[test]
    fn test_skips_empty_and_malformed_lines() {
        let content = "[ti:Song]\n[00:01.00]   \nnot a lyric\n[00:02.00] kept \r\n[bad]x";
        let lines = parse_synced(content);
        assert_eq!(lines, vec![LyricLine::new("kept", 2000)]);
    }

    #[test]
    fn test_preserves_input_order() {
        let lines = parse_synced("[00:05.00]Later\n[00:01.00]Earlier");
        assert_eq!(lines[0].start_time_ms, 5000);
        assert_eq!(lines[1].start_time_ms, 1000);
    }

    #[test]
    fn test_unparsable_blob_is_empty() {
        assert!(parse_synced("just some words\nand more").is_empty());
        assert!(parse_synced("").is_empty());
    }
}
