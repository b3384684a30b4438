//! Signage page: danger header, problem cards, update footer.

use crate::core::grouping::{GroupedProblems, ProblemGroup};
use crate::domain::vocabulary::{Vocabulary, NO_DISTINCT_PROBLEM};
use crate::render::html::{Element, Node};
use crate::utils::dates::footer_stamp;
use chrono::{DateTime, FixedOffset};

const STYLESHEET: &str = r#"
body {
  font-family: Helvetica, Arial, sans-serif;
  font-size: 16px;
  font-weight: 300;
  line-height: 1.5;
  padding: 20px;
  max-width: 2000px;
  margin: auto;
}
h1, h2, h3, h4, h5, h6 {
  font-family: Mark, Arial, sans-serif;
  font-weight: 700;
  letter-spacing: .02em;
  margin-top: 1em;
}
.alert-beacon {
  position: fixed;
  top: 16px;
  right: 20px;
  width: 16px;
  height: 16px;
  border-radius: 50%;
  background: #ff3b30;
  box-shadow: 0 0 0 3px rgba(255,59,48,.25), 0 0 12px rgba(255,59,48,.6);
  z-index: 9999;
  animation: beacon-blink 1.2s steps(2, end) infinite;
}
@keyframes beacon-blink {
  0%, 49% { opacity: 1; }
  50%, 100% { opacity: .15; }
}
"#;

/// Level from which the blinking beacon is shown.
pub const BEACON_LEVEL: u8 = 3;

const TEXT_STYLE: &str = "margin:0; overflow-wrap:anywhere; word-break:break-word;";
const ICON_STYLE: &str = "max-height:60px; max-width:60px; margin-right:10px;";

/// Renders the page pieces with fixed phrases and image locations.
pub struct DocumentRenderer<'a> {
    vocab: &'a Vocabulary,
    image_prefix: String,
}

impl<'a> DocumentRenderer<'a> {
    pub fn new(vocab: &'a Vocabulary, image_href_prefix: &str) -> Self {
        Self {
            vocab,
            image_prefix: image_href_prefix.trim_end_matches('/').to_string(),
        }
    }

    fn image(&self, name: &str) -> String {
        if self.image_prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.image_prefix, name)
        }
    }

    pub fn render_header(&self, level: u8, modifier: &str) -> Vec<Node> {
        let phrases = &self.vocab.phrases;
        let mut nodes: Vec<Node> = vec![Element::new("h1").style("margin:0;").text(phrases.title).into()];

        if level >= BEACON_LEVEL {
            nodes.push(
                Element::new("div")
                    .attr("class", "alert-beacon alert")
                    .attr("aria-hidden", "true")
                    .attr("title", phrases.beacon_title)
                    .into(),
            );
        }

        let word = self
            .vocab
            .severity_word(level)
            .map(str::to_string)
            .unwrap_or_else(|| level.to_string());
        let color = self.vocab.severity_color(level).unwrap_or("#000000");
        let label_style = if self.vocab.is_light_color(color) {
            format!(
                "font-size:1.4em; font-weight:700; background-color:{}; color:#000000; padding:2px 6px; border-radius:4px;",
                color
            )
        } else {
            format!("font-size:1.4em; font-weight:700; color:{};", color)
        };

        let headline = Element::new("div")
            .style("display:flex; align-items:center; gap:10px;")
            .child(
                Element::new("img")
                    .attr("src", self.image(&format!("{}.png", level)))
                    .style("height:60px;"),
            )
            .child(Element::new("span").style(label_style).text(format!(
                "{}: {} ({}{})",
                phrases.danger_level, word, level, modifier
            )));

        nodes.push(
            Element::new("div")
                .style("display:flex; align-items:center; justify-content:space-between; margin-bottom:30px;")
                .child(headline)
                .into(),
        );
        nodes
    }

    pub fn render_group_card(&self, group: &ProblemGroup) -> Node {
        let phrases = &self.vocab.phrases;

        let type_rows = group.entries.iter().map(|entry| {
            let row = Element::new("div").style("display:flex; align-items:center; gap:10px; margin-bottom:6px;");
            let (row, label) = match entry.problem_type.as_deref() {
                Some(pt) if pt != NO_DISTINCT_PROBLEM => (
                    row.child(
                        Element::new("img")
                            .attr("src", self.image(&format!("{}.jpg", pt)))
                            .style("max-height:48px; max-width:48px;"),
                    ),
                    entry.label.as_str(),
                ),
                Some(_) => (spacer(row), phrases.no_distinct_problem),
                None => (spacer(row), entry.label.as_str()),
            };
            row.child(
                Element::new("span")
                    .style("display:inline-block; padding:2px 8px; border-radius:12px; background:#f2f2f2; font-weight:700;")
                    .text(label),
            )
        });

        let elevation_row = Element::new("div")
            .style("display:flex; align-items:center;")
            .child(
                Element::new("img")
                    .attr("src", self.image(group.mountain_icon.file_name()))
                    .style(ICON_STYLE),
            )
            .child(labelled(phrases.elevation_heading, &group.elevation_text));

        let exposure_row = Element::new("div")
            .style("display:flex; align-items:center;")
            .child(
                Element::new("img")
                    .attr("src", self.image(&group.compass_file))
                    .style(ICON_STYLE),
            )
            .child(labelled(phrases.exposure_heading, &group.exposure_text));

        let left = Element::new("div")
            .style("display:flex; flex-direction:column; gap:8px;")
            .children(type_rows)
            .child(elevation_row)
            .child(exposure_row);

        let comment = group.display_comment().unwrap_or_else(|| phrases.no_comment.to_string());
        let right = Element::new("div")
            .style("flex:1; min-width:140px;")
            .child(labelled(phrases.comment_heading, &comment));

        Element::new("div")
            .style("min-width:0; box-sizing:border-box;")
            .child(
                Element::new("div")
                    .style("display:flex; align-items:flex-start; gap:16px;")
                    .child(left)
                    .child(right),
            )
            .into()
    }

    pub fn render_footer(&self, at: &DateTime<FixedOffset>) -> Node {
        Element::new("div")
            .style("position:fixed; bottom:10px; right:20px; font-size:0.9em; color:#555;")
            .text(format!("{} {}", self.vocab.phrases.last_updated, footer_stamp(at)))
            .into()
    }

    /// Full page. Ordinary groups come first, then "no distinct problem" groups.
    pub fn render_page(
        &self,
        level: u8,
        modifier: &str,
        groups: &GroupedProblems,
        at: &DateTime<FixedOffset>,
    ) -> String {
        let head = Element::new("head")
            .child(Element::new("meta").attr("charset", "UTF-8"))
            .child(Element::new("title").text(self.vocab.phrases.title))
            .child(Element::new("style").child(Node::Trusted(STYLESHEET)));

        let grid = Element::new("div")
            .style("display:grid; grid-template-columns:repeat(2, minmax(0, 1fr)); gap:40px; align-items:start; margin-bottom:30px;")
            .children(groups.iter().map(|g| self.render_group_card(g)));

        let body = Element::new("body")
            .children(self.render_header(level, modifier))
            .child(grid)
            .child(self.render_footer(at));

        let html: Node = Element::new("html")
            .attr("lang", self.vocab.lang())
            .child(head)
            .child(body)
            .into();

        format!("<!DOCTYPE html>\n{}\n", html.render())
    }
}

fn spacer(row: Element) -> Element {
    row.child(Element::new("div").style("width:48px; height:48px; flex:0 0 48px;"))
}

fn labelled(heading: &str, text: &str) -> Element {
    Element::new("p")
        .style(TEXT_STYLE)
        .child(Element::new("b").style("font-weight:700;").text(heading))
        .text(format!(" {}", text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn renderer(vocab: &Vocabulary) -> DocumentRenderer<'_> {
        DocumentRenderer::new(vocab, "static/images/")
    }

    fn header_html(level: u8, modifier: &str) -> String {
        let vocab = Vocabulary::french();
        renderer(&vocab)
            .render_header(level, modifier)
            .iter()
            .map(Node::render)
            .collect()
    }

    #[test]
    fn test_header_beacon_from_level_three() {
        assert!(!header_html(2, "").contains("alert-beacon"));
        assert!(header_html(3, "+").contains("alert-beacon"));
        assert!(header_html(5, "").contains("alert-beacon"));
    }

    #[test]
    fn test_header_light_colors_use_dark_text() {
        let moderate = header_html(2, "-");
        assert!(moderate.contains("background-color:#ffff00; color:#000000"));
        assert!(moderate.contains("Niveau de danger: limité (2-)"));

        let considerable = header_html(3, "+");
        assert!(considerable.contains("color:#ff9900;"));
        assert!(!considerable.contains("background-color"));
        assert!(considerable.contains("Niveau de danger: marqué (3+)"));
        assert!(considerable.contains("src=\"static/images/3.png\""));
    }

    #[test]
    fn test_footer_stamp() {
        let vocab = Vocabulary::french();
        let at = DateTime::parse_from_rfc3339("2025-03-02T08:00:00+01:00").unwrap();
        let footer = renderer(&vocab).render_footer(&at).render();
        assert!(footer.contains("Dernière mise à jour: 02.03.2025, 08:00"));
        assert!(footer.contains("position:fixed"));
    }
}
