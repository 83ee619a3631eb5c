//! Cover-crop candidate scoring and goal-based ranking

use std::collections::{BTreeSet, HashMap};

use log::debug;
use serde::{Deserialize, Serialize};

/// Candidates kept by [`ScoringFilter::score`] unless told otherwise
pub const DEFAULT_TARGET_TOP_K: usize = 5;

/// Mix size kept by [`IntersectionRanker::rank`] unless told otherwise
pub const DEFAULT_MIX_TOP_K: usize = 3;

/// When a cover crop fits relative to its cash crop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timing {
    Before,
    After,
    Both,
}

impl Timing {
    pub fn fits_before(&self) -> bool {
        matches!(self, Self::Before | Self::Both)
    }

    pub fn fits_after(&self) -> bool {
        matches!(self, Self::After | Self::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingRow {
    pub cash_crop: String,
    pub cover_crop: String,
    pub timing: Timing,
}

/// Three-season cash-crop rotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub current: String,
    pub next: String,
    pub after_next: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredCoverCrop {
    pub name: String,
    pub score: u32,
}

/// Scores cover crops by how well they fit around a rotation
#[derive(Debug, Clone, Default)]
pub struct ScoringFilter {
    rows: Vec<TimingRow>,
}

impl ScoringFilter {
    pub fn new(rows: Vec<TimingRow>) -> Self {
        Self { rows }
    }

    /// Top `top_k` candidates by descending score, ties in table order
    pub fn score(&self, rotation: &Rotation, top_k: usize) -> Vec<ScoredCoverCrop> {
        let mut scored: Vec<ScoredCoverCrop> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for row in &self.rows {
            let slot = *index.entry(row.cover_crop.as_str()).or_insert_with(|| {
                scored.push(ScoredCoverCrop {
                    name: row.cover_crop.clone(),
                    score: 0,
                });
                scored.len() - 1
            });

            let mut credit = 0;
            if row.cash_crop == rotation.current && row.timing.fits_after() {
                credit += 1;
            }
            if row.cash_crop == rotation.next && row.timing.fits_before() {
                credit += 1;
            }
            if row.cash_crop == rotation.next && row.timing.fits_after() {
                credit += 1;
            }
            if row.cash_crop == rotation.after_next && row.timing.fits_before() {
                credit += 1;
            }
            scored[slot].score += credit;
        }

        // sort_by is stable: equal scores keep first-seen order
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(top_k);
        debug!("score: {} candidates kept for {:?}", scored.len(), rotation);
        scored
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalTag {
    pub cover_crop: String,
    pub goal: String,
}

/// A cover crop with the goals it serves from the matched set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverCropMatch {
    pub name: String,
    pub matched_goals: Vec<String>,
}

/// Ranks candidates by overlap between their tagged goals and the matched goals
#[derive(Debug, Clone, Default)]
pub struct IntersectionRanker {
    tags: Vec<GoalTag>,
}

impl IntersectionRanker {
    pub fn new(tags: Vec<GoalTag>) -> Self {
        Self { tags }
    }

    pub fn tagged_goals<'a>(&'a self, cover_crop: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.tags
            .iter()
            .filter(move |t| t.cover_crop == cover_crop)
            .map(|t| t.goal.as_str())
    }

    pub fn rank<S: AsRef<str>>(
        &self,
        candidates: &[S],
        matched_goals: &BTreeSet<String>,
        top_k: usize,
    ) -> Vec<CoverCropMatch> {
        let mut results: Vec<CoverCropMatch> = candidates
            .iter()
            .filter_map(|candidate| {
                let name = candidate.as_ref();
                let matched: Vec<String> = self
                    .tagged_goals(name)
                    .filter(|g| matched_goals.contains(*g))
                    .map(str::to_string)
                    .collect();
                (!matched.is_empty()).then(|| CoverCropMatch {
                    name: name.to_string(),
                    matched_goals: matched,
                })
            })
            .collect();

        results.sort_by(|a, b| b.matched_goals.len().cmp(&a.matched_goals.len()));
        results.truncate(top_k);
        debug!("rank: {} of {} candidates kept", results.len(), candidates.len());
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cash: &str, cover: &str, timing: Timing) -> TimingRow {
        TimingRow {
            cash_crop: cash.to_string(),
            cover_crop: cover.to_string(),
            timing,
        }
    }

    fn rotation(current: &str, next: &str, after_next: &str) -> Rotation {
        Rotation {
            current: current.to_string(),
            next: next.to_string(),
            after_next: after_next.to_string(),
        }
    }

    #[test]
    fn test_score_current_after_and_next_before() {
        let filter = ScoringFilter::new(vec![
            row("maize", "vetch", Timing::After),
            row("soybean", "vetch", Timing::Before),
        ]);
        let scored = filter.score(&rotation("maize", "soybean", "potato"), DEFAULT_TARGET_TOP_K);
        assert_eq!(
            scored,
            vec![ScoredCoverCrop {
                name: "vetch".to_string(),
                score: 2
            }]
        );
    }

    #[test]
    fn test_next_crop_with_both_timing_earns_two() {
        let filter = ScoringFilter::new(vec![row("soybean", "rye", Timing::Both)]);
        let scored = filter.score(&rotation("maize", "soybean", "potato"), 5);
        assert_eq!(scored[0].score, 2);
    }

    #[test]
    fn test_after_next_crop_counts_before_timing_only() {
        let rot = rotation("maize", "soybean", "potato");
        for (timing, expected) in [(Timing::Before, 1), (Timing::Both, 1), (Timing::After, 0)] {
            let filter = ScoringFilter::new(vec![row("potato", "mustard", timing)]);
            assert_eq!(filter.score(&rot, 5)[0].score, expected, "timing {:?}", timing);
        }
    }

    #[test]
    fn test_next_crop_with_after_timing_earns_one() {
        let filter = ScoringFilter::new(vec![row("soybean", "buckwheat", Timing::After)]);
        let scored = filter.score(&rotation("maize", "soybean", "potato"), 5);
        assert_eq!(scored[0].score, 1);
    }

    #[test]
    fn test_zero_score_candidates_are_kept_and_ties_are_stable() {
        let filter = ScoringFilter::new(vec![
            row("wheat", "clover", Timing::After),
            row("wheat", "radish", Timing::After),
            row("maize", "oats", Timing::After),
        ]);
        let scored = filter.score(&rotation("maize", "soybean", "potato"), 5);
        let names: Vec<&str> = scored.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["oats", "clover", "radish"]);
    }

    #[test]
    fn test_score_truncates() {
        let filter = ScoringFilter::new(vec![
            row("maize", "a", Timing::After),
            row("maize", "b", Timing::After),
            row("maize", "c", Timing::After),
        ]);
        assert_eq!(filter.score(&rotation("maize", "x", "y"), 2).len(), 2);
    }

    fn tag(cover: &str, goal: &str) -> GoalTag {
        GoalTag {
            cover_crop: cover.to_string(),
            goal: goal.to_string(),
        }
    }

    #[test]
    fn test_rank_by_intersection_size() {
        let ranker = IntersectionRanker::new(vec![
            tag("vetch", "Nitrogen fixation"),
            tag("rye", "Erosion control"),
            tag("rye", "Nitrogen scavenging"),
            tag("radish", "Compaction relief"),
            tag("clover", "Nitrogen fixation"),
        ]);
        let goals: BTreeSet<String> = ["Nitrogen fixation", "Erosion control", "Nitrogen scavenging"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let ranked = ranker.rank(&["vetch", "radish", "rye", "clover"], &goals, DEFAULT_MIX_TOP_K);
        let names: Vec<&str> = ranked.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["rye", "vetch", "clover"]);
        assert_eq!(ranked[0].matched_goals.len(), 2);
    }

    #[test]
    fn test_rank_drops_unmatched() {
        let ranker = IntersectionRanker::new(vec![tag("radish", "Compaction relief")]);
        let goals = BTreeSet::from(["Nitrogen fixation".to_string()]);
        assert!(ranker.rank(&["radish", "unknown"], &goals, 3).is_empty());
    }

    #[test]
    fn test_timing_parses_lowercase() {
        let t: Timing = serde_yaml::from_str("both").unwrap();
        assert_eq!(t, Timing::Both);
    }
}
