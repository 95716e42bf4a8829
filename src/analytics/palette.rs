//! Deterministic chart colors

use serde::Serialize;

const FALLBACK: &str = "#4E79A7";

/// Series colors assigned by rank, cycling when there are more series than
/// colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    pub fn new(colors: Vec<String>) -> Self {
        Self { colors }
    }

    /// Color of the series at `rank` (0 = largest)
    pub fn color(&self, rank: usize) -> &str {
        if self.colors.is_empty() {
            return FALLBACK;
        }
        &self.colors[rank % self.colors.len()]
    }
}

/// Shorten a value for chart-axis display, counting characters rather than
/// bytes
pub fn truncate_label(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut label: String = value.chars().take(max_chars).collect();
    label.push_str("...");
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_cycles() {
        let palette = Palette::new(vec!["#111".into(), "#222".into()]);
        assert_eq!(palette.color(0), "#111");
        assert_eq!(palette.color(1), "#222");
        assert_eq!(palette.color(2), "#111");
        assert_eq!(Palette::new(vec![]).color(7), FALLBACK);
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Pump", 10), "Pump");
        assert_eq!(truncate_label("Hospital Regional", 8), "Hospital...");
        assert_eq!(truncate_label("Manutenção", 7), "Manuten...");
    }
}
