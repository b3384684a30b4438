//! Compass-rose icon for the exposure row of a problem card.

use crate::render::html::{Element, Node};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Pixels per unit radius in the generated SVG.
const SCALE: f64 = 100.0;

#[derive(Debug, Clone)]
pub struct CompassStyle {
    pub r_inner: f64,
    pub r_outer: f64,
    pub gap_deg: f64,
    pub tip_len_diag: f64,
    pub tip_len_card: f64,
    pub face_on: &'static str,
    pub face_off: &'static str,
    pub edge: &'static str,
    pub line_width: f64,
    pub label_size: f64,
    pub label_offset: f64,
}

impl Default for CompassStyle {
    fn default() -> Self {
        Self {
            r_inner: 0.30,
            r_outer: 1.0,
            gap_deg: 3.0,
            tip_len_diag: 0.28,
            tip_len_card: 0.40,
            face_on: "#9fb7ff",
            face_off: "#e7e7e7",
            edge: "#333333",
            line_width: 3.0,
            label_size: 23.0,
            label_offset: 1.6,
        }
    }
}

/// Eight petals, N at the top, clockwise, labelled in display language.
#[derive(Debug, Clone)]
pub struct CompassRose {
    labels: [&'static str; 8],
    style: CompassStyle,
}

/// A generated icon, named by content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconFile {
    pub file_name: String,
    pub svg: String,
}

impl CompassRose {
    pub fn new(labels: [&'static str; 8]) -> Self {
        Self::with_style(labels, CompassStyle::default())
    }

    pub fn with_style(labels: [&'static str; 8], style: CompassStyle) -> Self {
        Self { labels, style }
    }

    /// Render the rose with every direction in `active` highlighted.
    /// Matching is case-insensitive; unknown directions are ignored.
    pub fn render<S: AsRef<str>>(&self, active: &[S]) -> String {
        let active: HashSet<String> = active.iter().map(|d| d.as_ref().to_uppercase()).collect();
        let s = &self.style;

        let petals = self.labels.iter().enumerate().map(|(i, label)| {
            let theta = center_angle(i);
            // 正方位的尖角較長
            let tip = if i % 2 == 0 { s.tip_len_card } else { s.tip_len_diag };
            let fill = if active.contains(&label.to_uppercase()) {
                s.face_on
            } else {
                s.face_off
            };
            Element::empty("polygon")
                .attr("points", petal_points(theta, s.r_inner, s.r_outer, s.gap_deg, tip))
                .attr("fill", fill)
                .attr("stroke", s.edge)
                .attr("stroke-width", fmt_num(s.line_width))
                .attr("stroke-linejoin", "round")
        });

        let labels = self.labels.iter().enumerate().map(|(i, label)| {
            let (x, y) = point(s.label_offset * s.r_outer, center_angle(i));
            Element::new("text")
                .attr("x", fmt_num(x))
                .attr("y", fmt_num(y))
                .attr("text-anchor", "middle")
                .attr("dominant-baseline", "central")
                .attr("font-family", "Helvetica, Arial, sans-serif")
                .attr("font-size", fmt_num(s.label_size))
                .attr("fill", s.edge)
                .text(*label)
        });

        let extent = (s.label_offset + 0.3) * s.r_outer * SCALE;
        let svg: Node = Element::new("svg")
            .attr("xmlns", "http://www.w3.org/2000/svg")
            .attr(
                "viewBox",
                format!("{} {} {} {}", fmt_num(-extent), fmt_num(-extent), fmt_num(2.0 * extent), fmt_num(2.0 * extent)),
            )
            .attr("width", "288")
            .attr("height", "288")
            .children(petals)
            .child(
                Element::empty("circle")
                    .attr("cx", "0")
                    .attr("cy", "0")
                    .attr("r", fmt_num(s.r_inner * 0.22 * SCALE))
                    .attr("fill", s.edge),
            )
            .children(labels)
            .into();

        format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}\n", svg.render())
    }

    /// Render and name the icon for `directions` in one go.
    pub fn icon<S: AsRef<str>>(&self, prefix: &str, directions: &[S]) -> IconFile {
        IconFile {
            file_name: file_name(prefix, directions),
            svg: self.render(directions),
        }
    }
}

/// Content-addressed icon name: `{prefix}{10 hex chars}.svg`.
///
/// The digest covers the sorted, uppercased directions, so input order
/// does not matter.
pub fn file_name<S: AsRef<str>>(prefix: &str, directions: &[S]) -> String {
    let mut keys: Vec<String> = directions.iter().map(|d| d.as_ref().to_uppercase()).collect();
    keys.sort();
    let digest = Sha256::digest(keys.join(",").as_bytes());
    let hash = hex::encode(digest);
    format!("{}{}.svg", prefix, &hash[..10])
}

fn center_angle(index: usize) -> f64 {
    90.0 - index as f64 * 45.0
}

/// SVG coordinates; y grows downwards.
fn point(r: f64, angle_deg: f64) -> (f64, f64) {
    let a = angle_deg.to_radians();
    (r * a.cos() * SCALE, -r * a.sin() * SCALE)
}

fn petal_points(theta: f64, r_in: f64, r_out: f64, gap_deg: f64, tip_len: f64) -> String {
    let half = 22.5 - gap_deg / 2.0;
    let (start, end) = (theta - half, theta + half);
    [
        point(r_in, start),
        point(r_out, start),
        point(r_out + tip_len, theta),
        point(r_out, end),
        point(r_in, end),
    ]
    .iter()
    .map(|(x, y)| format!("{},{}", fmt_num(*x), fmt_num(*y)))
    .collect::<Vec<_>>()
    .join(" ")
}

fn fmt_num(v: f64) -> String {
    if v.abs() < 0.005 {
        return "0".to_string();
    }
    let s = format!("{:.2}", v);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FR: [&str; 8] = ["N", "NE", "E", "SE", "S", "SO", "O", "NO"];

    #[test]
    fn test_file_name_ignores_order_and_case() {
        let a = file_name("compass_fr_", &["N", "E"]);
        let b = file_name("compass_fr_", &["E", "N"]);
        let c = file_name("compass_fr_", &["e", "n"]);
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_ne!(a, file_name("compass_fr_", &["N"]));
        assert!(a.starts_with("compass_fr_"));
        assert!(a.ends_with(".svg"));
        assert_eq!(a.len(), "compass_fr_".len() + 10 + ".svg".len());
    }

    #[test]
    fn test_render_highlights_active_petals() {
        let rose = CompassRose::new(FR);
        let svg = rose.render(&["n", "SO"]);
        assert_eq!(svg.matches("fill=\"#9fb7ff\"").count(), 2);
        assert_eq!(svg.matches("fill=\"#e7e7e7\"").count(), 6);
        assert_eq!(svg.matches("<polygon").count(), 8);
        assert!(svg.contains(">SO</text>"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let rose = CompassRose::new(FR);
        assert_eq!(rose.render(&["N", "NE"]), rose.render(&["NE", "N"]));
    }

    #[test]
    fn test_north_petal_points_up() {
        // 北方尖端在 y 軸負方向
        let points = petal_points(90.0, 0.3, 1.0, 3.0, 0.4);
        let tip = points.split(' ').nth(2).unwrap();
        assert_eq!(tip, "0,-140");
    }

    #[test]
    fn test_icon_bundles_name_and_svg() {
        let rose = CompassRose::new(FR);
        let icon = rose.icon("compass_fr_", &["O"]);
        assert_eq!(icon.file_name, file_name("compass_fr_", &["O"]));
        assert!(icon.svg.starts_with("<?xml"));
    }
}
