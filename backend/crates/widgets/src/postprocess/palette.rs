//! Fixed colour tables referenced by widgets instead of inline hex values.

use serde::Serialize;

/// Primary and secondary shade of one status colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorPair(pub &'static str, pub &'static str);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Failure,
    Warning,
}

const STATUS_DARK: [ColorPair; 3] = [
    ColorPair("#009C5B", "#62CA9D"),
    ColorPair("#D32227", "#FB6E72"),
    ColorPair("#F2A414", "#FFE6C1"),
];

const STATUS_LIGHT: [ColorPair; 3] = [
    ColorPair("#0C9E61", "#79CAA8"),
    ColorPair("#E83D39", "#F39492"),
    ColorPair("#F2A414", "#FFE6C1"),
];

fn index(tone: Tone) -> usize {
    match tone {
        Tone::Success => 0,
        Tone::Failure => 1,
        Tone::Warning => 2,
    }
}

pub fn dark(tone: Tone) -> ColorPair {
    STATUS_DARK[index(tone)]
}

pub fn light(tone: Tone) -> ColorPair {
    STATUS_LIGHT[index(tone)]
}

/// Severity order used by every vulnerability widget, most severe first.
pub const SEVERITIES: [&str; 4] = ["VERY_HIGH", "HIGH", "MEDIUM", "LOW"];

pub fn severity_title(severity: &str) -> &'static str {
    match severity.to_ascii_uppercase().as_str() {
        "VERY_HIGH" => "Very high",
        "HIGH" => "High",
        "MEDIUM" => "Medium",
        "LOW" => "Low",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tables_differ_by_scheme() {
        assert_eq!(dark(Tone::Success), ColorPair("#009C5B", "#62CA9D"));
        assert_eq!(light(Tone::Failure), ColorPair("#E83D39", "#F39492"));
        assert_eq!(dark(Tone::Warning), light(Tone::Warning));
    }

    #[test]
    fn severity_lookup_ignores_case() {
        assert_eq!(severity_title("medium"), "Medium");
        assert_eq!(severity_title("VERY_HIGH"), "Very high");
        assert_eq!(severity_title("none"), "Unknown");
    }
}
