use crate::domain::model::DangerRating;
use crate::domain::vocabulary::Vocabulary;
use crate::utils::error::{BulletinError, Result};

pub const MIN_RANK: u8 = 1;
pub const MAX_RANK: u8 = 5;

/// Resolves the headline danger level of one region's ratings.
pub struct DangerResolver<'a> {
    vocab: &'a Vocabulary,
}

impl<'a> DangerResolver<'a> {
    pub fn new(vocab: &'a Vocabulary) -> Self {
        Self { vocab }
    }

    /// Highest rank across all ratings.
    ///
    /// Labels outside the table are accepted only when they are already a
    /// rank ("3"). Fails with `NoRatingData` when nothing could be ranked.
    pub fn highest_level(&self, region_id: &str, ratings: &[DangerRating]) -> Result<u8> {
        let mut highest: Option<u8> = None;

        for rating in ratings {
            let Some(label) = rating.main_value.as_deref() else {
                tracing::debug!("Danger rating without mainValue ignored");
                continue;
            };
            let Some(rank) = self.rank(label) else {
                tracing::warn!("Unknown danger level '{}' ignored", label);
                continue;
            };
            highest = Some(highest.map_or(rank, |h| h.max(rank)));
        }

        highest.ok_or_else(|| BulletinError::NoRatingData {
            region_id: region_id.to_string(),
        })
    }

    fn rank(&self, label: &str) -> Option<u8> {
        self.vocab.severity_rank(label).or_else(|| {
            label
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|r| (MIN_RANK..=MAX_RANK).contains(r))
        })
    }

    /// `+`, `-` or `=` from the first rating only; empty when absent.
    ///
    /// Only `ratings[0]` is consulted, even when a later rating carries the
    /// highest level.
    pub fn subdivision_modifier(&self, ratings: &[DangerRating]) -> String {
        ratings
            .first()
            .and_then(DangerRating::subdivision)
            .map(|sub| self.vocab.subdivision_sign(sub).to_string())
            .unwrap_or_default()
    }
}
