//! Groups avalanche problems that share elevation, exposure and comment.

use crate::domain::model::{AvalancheProblem, ElevationBound, ElevationRange};
use crate::domain::vocabulary::{Vocabulary, CANONICAL_ASPECTS, NO_DISTINCT_PROBLEM};
use crate::render::compass::{CompassRose, IconFile};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid space pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElevationKey {
    All,
    Range {
        lower: Option<ElevationBound>,
        upper: Option<ElevationBound>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AspectKey {
    All,
    /// 保留上游順序，不排序
    Listed(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub elevation: ElevationKey,
    pub aspects: AspectKey,
    pub comment: String,
}

impl GroupKey {
    pub fn of(problem: &AvalancheProblem) -> Self {
        Self {
            elevation: normalize_elevation(problem.elevation.as_ref()),
            aspects: normalize_aspects(problem.aspects.as_deref()),
            comment: normalize_comment(problem.comment.as_deref()),
        }
    }
}

/// Absent ranges and ranges without any bound both mean "all elevations".
pub fn normalize_elevation(range: Option<&ElevationRange>) -> ElevationKey {
    match range {
        Some(ElevationRange {
            lower_bound: None,
            upper_bound: None,
        })
        | None => ElevationKey::All,
        Some(range) => ElevationKey::Range {
            lower: range.lower_bound.clone(),
            upper: range.upper_bound.clone(),
        },
    }
}

/// Absent, empty and the full canonical set collapse to `AspectKey::All`.
pub fn normalize_aspects(aspects: Option<&[String]>) -> AspectKey {
    match aspects {
        None | Some([]) => AspectKey::All,
        Some(list) if list.iter().map(String::as_str).eq(CANONICAL_ASPECTS) => AspectKey::All,
        Some(list) => AspectKey::Listed(list.to_vec()),
    }
}

pub fn normalize_comment(comment: Option<&str>) -> String {
    comment.map(str::trim).unwrap_or_default().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountainIcon {
    Below,
    Above,
    All,
}

impl MountainIcon {
    pub fn file_name(&self) -> &'static str {
        match self {
            MountainIcon::Below => "below_mountain.png",
            MountainIcon::Above => "above_mountain.png",
            MountainIcon::All => "all_mountain.png",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemEntry {
    pub problem_type: Option<String>,
    pub label: String,
}

impl ProblemEntry {
    pub fn is_no_distinct_problem(&self) -> bool {
        self.problem_type.as_deref() == Some(NO_DISTINCT_PROBLEM)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupClass {
    Ordinary,
    Other,
}

#[derive(Debug, Clone)]
pub struct ProblemGroup {
    pub key: GroupKey,
    pub entries: Vec<ProblemEntry>,
    pub elevation_text: String,
    pub mountain_icon: MountainIcon,
    pub exposure_text: String,
    pub exposure_directions: Vec<String>,
    pub compass_file: String,
    pub comment: Option<String>,
}

impl ProblemGroup {
    /// A group is "other" when every entry is the no-distinct-problem tag.
    pub fn class(&self) -> GroupClass {
        if self.entries.iter().all(ProblemEntry::is_no_distinct_problem) {
            GroupClass::Other
        } else {
            GroupClass::Ordinary
        }
    }

    /// Comment as plain text: markup stripped, whitespace collapsed.
    pub fn display_comment(&self) -> Option<String> {
        let raw = self.comment.as_deref()?;
        let text = TAG_RE.replace_all(raw, " ");
        let text = text
            .replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&");
        let text = SPACE_RE.replace_all(&text, " ").trim().to_string();
        (!text.is_empty()).then_some(text)
    }

    fn push_entry(&mut self, entry: ProblemEntry) {
        if !self.entries.contains(&entry) {
            self.entries.push(entry);
        }
    }
}

/// Groups in display order: ordinary first, then "other", each in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct GroupedProblems {
    pub ordinary: Vec<ProblemGroup>,
    pub other: Vec<ProblemGroup>,
    /// One compass icon per distinct exposure set.
    pub icons: Vec<IconFile>,
}

impl GroupedProblems {
    pub fn iter(&self) -> impl Iterator<Item = &ProblemGroup> {
        self.ordinary.iter().chain(self.other.iter())
    }

    pub fn len(&self) -> usize {
        self.ordinary.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct GroupingEngine<'a> {
    vocab: &'a Vocabulary,
    compass: &'a CompassRose,
    icon_prefix: String,
}

impl<'a> GroupingEngine<'a> {
    pub fn new(vocab: &'a Vocabulary, compass: &'a CompassRose) -> Self {
        Self {
            vocab,
            compass,
            icon_prefix: format!("compass_{}_", vocab.lang()),
        }
    }

    pub fn group(&self, problems: &[AvalancheProblem]) -> GroupedProblems {
        let mut index: HashMap<GroupKey, usize> = HashMap::new();
        let mut groups: Vec<ProblemGroup> = Vec::new();
        let mut icons: Vec<IconFile> = Vec::new();
        let mut icon_names: HashSet<String> = HashSet::new();

        for problem in problems {
            let key = GroupKey::of(problem);
            let slot = match index.get(&key) {
                Some(slot) => *slot,
                None => {
                    // 每組只計算一次文字與圖示
                    let group = self.new_group(key.clone(), problem);
                    if icon_names.insert(group.compass_file.clone()) {
                        icons.push(self.compass.icon(&self.icon_prefix, group.exposure_directions.as_slice()));
                    }
                    tracing::debug!(
                        "New problem group: {} / {}",
                        group.elevation_text,
                        group.exposure_text
                    );
                    groups.push(group);
                    index.insert(key, groups.len() - 1);
                    groups.len() - 1
                }
            };

            let problem_type = problem.problem_type.clone();
            let label = self.vocab.problem_label(problem_type.as_deref());
            groups[slot].push_entry(ProblemEntry { problem_type, label });
        }

        let (ordinary, other): (Vec<_>, Vec<_>) = groups
            .into_iter()
            .partition(|g| g.class() == GroupClass::Ordinary);

        GroupedProblems {
            ordinary,
            other,
            icons,
        }
    }

    fn new_group(&self, key: GroupKey, problem: &AvalancheProblem) -> ProblemGroup {
        let (elevation_text, mountain_icon) = self.elevation_text(&key.elevation);
        let (exposure_text, exposure_directions) = self.exposure(&key.aspects);
        let compass_file = crate::render::compass::file_name(&self.icon_prefix, exposure_directions.as_slice());

        ProblemGroup {
            key,
            entries: Vec::new(),
            elevation_text,
            mountain_icon,
            exposure_text,
            exposure_directions,
            compass_file,
            comment: problem.comment.clone(),
        }
    }

    pub fn elevation_text(&self, key: &ElevationKey) -> (String, MountainIcon) {
        let phrases = &self.vocab.phrases;
        match key {
            ElevationKey::Range {
                lower: None,
                upper: Some(upper),
            } => (format!("{} {}", phrases.below, upper.with_unit()), MountainIcon::Below),
            ElevationKey::Range {
                lower: Some(lower),
                upper: None,
            } => (format!("{} {}", phrases.above, lower.with_unit()), MountainIcon::Above),
            ElevationKey::Range {
                lower: Some(lower),
                upper: Some(upper),
            } if lower.is_numeric() && upper.is_numeric() => {
                (format!("{}-{}m", lower, upper), MountainIcon::All)
            }
            ElevationKey::Range {
                lower: Some(lower),
                upper: Some(upper),
            } => (
                format!("{}-{}", lower.with_unit(), upper.with_unit()),
                MountainIcon::All,
            ),
            _ => (phrases.all_elevations.to_string(), MountainIcon::All),
        }
    }

    /// Display text and the translated directions drawn on the compass.
    pub fn exposure(&self, key: &AspectKey) -> (String, Vec<String>) {
        match key {
            AspectKey::All => (
                self.vocab.phrases.all_exposures.to_string(),
                self.vocab.display_aspects().iter().map(|a| a.to_string()).collect(),
            ),
            AspectKey::Listed(aspects) => {
                let translated: Vec<String> = aspects
                    .iter()
                    .map(|a| self.vocab.aspect_label(a).to_string())
                    .collect();
                (translated.join(", "), translated)
            }
        }
    }
}
