//! Numeric-aware ordering for OS version strings
//!
//! Digit runs compare by value and everything else compares ordinally, so
//! "17.4" > "16.0" > "9.0" and "17.10" > "17.4".

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Number(&'a str),
    Text(&'a str),
}

/// Compare two version strings the way a human reads them
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left = segments(a);
    let right = segments(b);

    for (l, r) in left.iter().zip(right.iter()) {
        let ord = match (l, r) {
            (Segment::Number(x), Segment::Number(y)) => compare_digits(x, y),
            (Segment::Text(x), Segment::Text(y)) => x.cmp(y),
            (Segment::Number(_), Segment::Text(_)) => Ordering::Less,
            (Segment::Text(_), Segment::Number(_)) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    left.len().cmp(&right.len())
}

/// Compare two ASCII digit runs by value without parsing (no overflow)
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Split into alternating digit / non-digit runs
fn segments(s: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;

    for (i, c) in s.char_indices() {
        let is_digit = c.is_ascii_digit();
        if let Some(prev) = current {
            if prev != is_digit {
                out.push(segment(&s[start..i], prev));
                start = i;
            }
        }
        current = Some(is_digit);
    }

    if let Some(prev) = current {
        out.push(segment(&s[start..], prev));
    }

    out
}

fn segment(run: &str, is_digit: bool) -> Segment<'_> {
    if is_digit {
        Segment::Number(run)
    } else {
        Segment::Text(run)
    }
}
