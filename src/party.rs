use std::collections::BTreeMap;

use ratatui::style::Color;
use serde::Deserialize;

/// Neutral gray used for parties missing from the table.
pub const FALLBACK_COLOR: &str = "#808080";

const DEFAULT_PARTIES: [(&str, &str); 9] = [
    ("自由民主党", "#d70035"),
    ("立憲民主党", "#004098"),
    ("日本維新の会", "#88c900"),
    ("公明党", "#f55883"),
    ("日本共産党", "#5a2e87"),
    ("国民民主党", "#fdbd02"),
    ("れいわ新選組", "#e954a4"),
    ("社民党", "#1ca9e9"),
    ("無所属", "#999999"),
];

/// Party name → display color (hex), read-only once built.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PartyColors {
    pub fallback: String,
    pub parties: BTreeMap<String, String>,
}

impl Default for PartyColors {
    fn default() -> Self {
        Self {
            fallback: FALLBACK_COLOR.to_string(),
            parties: DEFAULT_PARTIES
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect(),
        }
    }
}

impl PartyColors {
    pub fn new(parties: BTreeMap<String, String>, fallback: impl Into<String>) -> Self {
        Self { fallback: fallback.into(), parties }
    }

    /// Color for `party`, or the fallback when the party is unknown.
    pub fn resolve(&self, party: &str) -> &str {
        self.parties
            .get(party)
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    /// Known parties with their colors, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parties.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.parties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }
}

/// Parses `#rrggbb` (or `rrggbb`) into a terminal color.
pub fn parse_hex(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Terminal color for a hex string, gray when it does not parse.
pub fn terminal_color(hex: &str) -> Color {
    parse_hex(hex).unwrap_or(Color::Gray)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_party_resolves_to_its_color() {
        let colors = PartyColors::default();
        assert_eq!(colors.resolve("自由民主党"), "#d70035");
        assert_eq!(colors.resolve("無所属"), "#999999");
    }

    #[test]
    fn unknown_party_falls_back_to_gray() {
        let colors = PartyColors::default();
        assert_eq!(colors.resolve("架空党"), FALLBACK_COLOR);
    }

    #[test]
    fn custom_table_replaces_defaults() {
        let mut parties = BTreeMap::new();
        parties.insert("Green".to_string(), "#00ff00".to_string());
        let colors = PartyColors::new(parties, "#000000");
        assert_eq!(colors.resolve("Green"), "#00ff00");
        assert_eq!(colors.resolve("自由民主党"), "#000000");
        assert_eq!(colors.len(), 1);
    }

    #[test]
    fn parse_hex_accepts_with_and_without_hash() {
        assert_eq!(parse_hex("#d70035"), Some(Color::Rgb(0xd7, 0x00, 0x35)));
        assert_eq!(parse_hex("004098"), Some(Color::Rgb(0x00, 0x40, 0x98)));
    }

    #[test]
    fn parse_hex_rejects_garbage() {
        assert_eq!(parse_hex("#12345"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
        assert_eq!(parse_hex("#ああ"), None);
        assert_eq!(terminal_color("nope"), Color::Gray);
    }
}
