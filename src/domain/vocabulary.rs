//! Fixed lookup tables for the signage output.
//!
//! Built once at start-up and handed to the resolver, the grouping engine and
//! the renderer. The output is French only.

use std::collections::{HashMap, HashSet};

/// Problem type used upstream when no specific avalanche problem applies.
pub const NO_DISTINCT_PROBLEM: &str = "no_distinct_avalanche_problem";

/// Upstream aspect codes in their canonical order.
pub const CANONICAL_ASPECTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Fixed phrases of the rendered page.
#[derive(Debug, Clone)]
pub struct Phrases {
    pub title: &'static str,
    pub danger_level: &'static str,
    pub beacon_title: &'static str,
    pub elevation_heading: &'static str,
    pub exposure_heading: &'static str,
    pub comment_heading: &'static str,
    pub all_elevations: &'static str,
    pub below: &'static str,
    pub above: &'static str,
    pub all_exposures: &'static str,
    pub no_distinct_problem: &'static str,
    pub unknown_problem: &'static str,
    pub no_comment: &'static str,
    pub last_updated: &'static str,
}

#[derive(Debug, Clone)]
pub struct Vocabulary {
    lang: &'static str,
    severity_ranks: HashMap<&'static str, u8>,
    severity_words: HashMap<u8, &'static str>,
    severity_colors: HashMap<u8, &'static str>,
    light_colors: HashSet<&'static str>,
    subdivision_signs: HashMap<&'static str, &'static str>,
    problem_labels: HashMap<&'static str, &'static str>,
    aspect_labels: HashMap<&'static str, &'static str>,
    pub phrases: Phrases,
}

impl Vocabulary {
    pub fn french() -> Self {
        Self {
            lang: "fr",
            severity_ranks: HashMap::from([
                ("low", 1),
                ("moderate", 2),
                ("considerable", 3),
                ("high", 4),
                ("very high", 5),
            ]),
            severity_words: HashMap::from([
                (1, "faible"),
                (2, "limité"),
                (3, "marqué"),
                (4, "fort"),
                (5, "très fort"),
            ]),
            severity_colors: HashMap::from([
                (1, "#ccff66"),
                (2, "#ffff00"),
                (3, "#ff9900"),
                (4, "#ff0000"),
                (5, "#ff0000"),
            ]),
            light_colors: HashSet::from(["#ccff66", "#ffff00"]),
            subdivision_signs: HashMap::from([
                ("neutral", "="),
                ("equal", "="),
                ("minus", "-"),
                ("plus", "+"),
            ]),
            problem_labels: HashMap::from([
                ("new_snow", "Neige fraîche"),
                ("wind_slab", "Neige soufflée"),
                ("gliding_snow", "Avalanches de glissement"),
                ("wet_snow", "Neige mouillée"),
                ("persistent_weak_layers", "Neige ancienne"),
            ]),
            aspect_labels: HashMap::from([
                ("N", "N"),
                ("NE", "NE"),
                ("E", "E"),
                ("SE", "SE"),
                ("S", "S"),
                ("SW", "SO"),
                ("W", "O"),
                ("NW", "NO"),
            ]),
            phrases: Phrases {
                title: "Bulletin d'avalanche",
                danger_level: "Niveau de danger",
                beacon_title: "Signal d'alerte",
                elevation_heading: "Plage d'altitude:",
                exposure_heading: "Exposition:",
                comment_heading: "Description des dangers:",
                all_elevations: "toutes les altitudes",
                below: "en dessous de",
                above: "à plus de",
                all_exposures: "toutes les expositions",
                no_distinct_problem: "Pas de problème avalancheux particulier",
                unknown_problem: "Problème non spécifié",
                no_comment: "aucune description disponible",
                last_updated: "Dernière mise à jour:",
            },
        }
    }

    pub fn lang(&self) -> &'static str {
        self.lang
    }

    pub fn severity_rank(&self, label: &str) -> Option<u8> {
        self.severity_ranks.get(label).copied()
    }

    pub fn severity_word(&self, rank: u8) -> Option<&'static str> {
        self.severity_words.get(&rank).copied()
    }

    pub fn severity_color(&self, rank: u8) -> Option<&'static str> {
        self.severity_colors.get(&rank).copied()
    }

    /// Yellow-family colours need dark text on a coloured background.
    pub fn is_light_color(&self, color: &str) -> bool {
        self.light_colors.contains(color)
    }

    /// Unknown subdivisions pass through unchanged.
    pub fn subdivision_sign<'a>(&self, subdivision: &'a str) -> &'a str {
        match self.subdivision_signs.get(subdivision) {
            Some(sign) => *sign,
            None => subdivision,
        }
    }

    pub fn problem_label(&self, problem_type: Option<&str>) -> String {
        match problem_type {
            Some(pt) => self
                .problem_labels
                .get(pt)
                .map(|label| label.to_string())
                .unwrap_or_else(|| pt.to_string()),
            None => self.phrases.unknown_problem.to_string(),
        }
    }

    pub fn aspect_label<'a>(&self, aspect: &'a str) -> &'a str {
        match self.aspect_labels.get(aspect) {
            Some(label) => *label,
            None => aspect,
        }
    }

    /// Canonical aspects in display language, N first, clockwise.
    pub fn display_aspects(&self) -> [&'static str; 8] {
        CANONICAL_ASPECTS.map(|a| self.aspect_labels.get(a).copied().unwrap_or(a))
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::french()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_aspects_are_french() {
        let vocab = Vocabulary::french();
        assert_eq!(
            vocab.display_aspects(),
            ["N", "NE", "E", "SE", "S", "SO", "O", "NO"]
        );
    }

    #[test]
    fn test_lookups_fall_back_to_input() {
        let vocab = Vocabulary::french();
        assert_eq!(vocab.aspect_label("SW"), "SO");
        assert_eq!(vocab.aspect_label("NNW"), "NNW");
        assert_eq!(vocab.subdivision_sign("plus"), "+");
        assert_eq!(vocab.subdivision_sign("weird"), "weird");
        assert_eq!(vocab.problem_label(Some("wind_slab")), "Neige soufflée");
        assert_eq!(vocab.problem_label(Some("cornices")), "cornices");
        assert_eq!(vocab.problem_label(None), "Problème non spécifié");
    }

    #[test]
    fn test_light_colors() {
        let vocab = Vocabulary::french();
        assert!(vocab.is_light_color(vocab.severity_color(1).unwrap()));
        assert!(vocab.is_light_color(vocab.severity_color(2).unwrap()));
        assert!(!vocab.is_light_color(vocab.severity_color(3).unwrap()));
    }
}
