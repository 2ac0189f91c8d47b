//! Cue timing line parser
//!
//! Parses `start --> end [settings]` into milliseconds. Timestamps are either
//! `hh:mm:ss.ttt` or `mm:ss.ttt`; settings after the end timestamp are
//! ignored.

use crate::cue::Timing;
use crate::scanner::Scanner;

use super::SPACE_DELIMITERS;

/// Parse a cue timing line. `None` means the line is not a usable timing.
pub fn parse_timing_line(line: &str) -> Option<Timing> {
    let mut scanner = Scanner::new(line);

    let start = parse_timestamp(&mut scanner)?;
    scanner.scan_while(&SPACE_DELIMITERS, 0);
    if scanner.peek(3).as_deref() != Some("-->") {
        return None;
    }
    scanner.skip(3);
    scanner.scan_while(&SPACE_DELIMITERS, 0);
    let end = parse_timestamp(&mut scanner)?;

    Some(Timing::new(start, end))
}

/// Parse one timestamp at the scanner position.
pub fn parse_timestamp(scanner: &mut Scanner) -> Option<i64> {
    let first = scan_component(scanner)?;
    if scanner.scan_char()? != ':' {
        return None;
    }
    let second = scan_component(scanner)?;

    let (hours, minutes, seconds) = match scanner.scan_char()? {
        ':' => {
            let third = scan_component(scanner)?;
            if scanner.scan_char()? != '.' {
                return None;
            }
            (first, second, third)
        }
        '.' => (0, first, second),
        _ => return None,
    };
    let millis = scan_component(scanner)?;

    hours
        .checked_mul(3_600_000)?
        .checked_add(minutes.checked_mul(60_000)?)?
        .checked_add(seconds.checked_mul(1_000)?)?
        .checked_add(millis)
}

fn scan_component(scanner: &mut Scanner) -> Option<i64> {
    scanner.scan_int(false).and_then(|v| i64::try_from(v).ok())
}
