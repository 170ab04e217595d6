//! Clip selection policy.
//!
//! Each script segment gets a share of the narration duration proportional to
//! its estimate; candidates are ranked by resolution tier first, then by how
//! tightly they cover the segment's allotment without falling short.

use std::collections::HashSet;

use reelsmith_types::{Clip, FootageSet, Script};

use crate::error::{FootageError, Result};

/// Split the measured narration duration across segments, proportional to
/// their estimates. Degenerate estimates (all zero) split evenly.
pub fn allot_segments(script: &Script, narration_secs: f64) -> Vec<f64> {
    let estimated = script.estimated_secs();
    let count = script.segments.len();
    if count == 0 {
        return Vec::new();
    }
    if estimated <= 0.0 {
        return vec![narration_secs / count as f64; count];
    }
    script
        .segments
        .iter()
        .map(|s| narration_secs * s.estimated_secs / estimated)
        .collect()
}

/// Pick the best unused candidate for one segment.
///
/// Preference order: clips long enough to cover the allotment beat clips that
/// fall short; among those, higher resolution tier wins; ties go to the
/// duration closest to the allotment (least wasted footage), with falling-short
/// clips ranked by how close they come.
pub fn choose_clip(candidates: &[Clip], allotted_secs: f64, used: &HashSet<u64>) -> Option<Clip> {
    candidates
        .iter()
        .filter(|c| !used.contains(&c.id))
        .max_by(|a, b| {
            let a_covers = a.duration_secs >= allotted_secs;
            let b_covers = b.duration_secs >= allotted_secs;
            a_covers
                .cmp(&b_covers)
                .then(a.tier.cmp(&b.tier))
                .then_with(|| {
                    let a_gap = (a.duration_secs - allotted_secs).abs();
                    let b_gap = (b.duration_secs - allotted_secs).abs();
                    b_gap.total_cmp(&a_gap)
                })
        })
        .cloned()
}

/// Extend an undersized footage set from a candidate pool until it covers the
/// narration, preferring higher tiers and longer clips and never reusing an id.
///
/// Fails with the accumulated total when the pool runs dry first; the set is
/// never returned undersized.
pub fn top_up(
    set: &mut FootageSet,
    candidates: Vec<Clip>,
    used: &mut HashSet<u64>,
    narration_secs: f64,
) -> Result<()> {
    let mut pool: Vec<Clip> = candidates
        .into_iter()
        .filter(|c| !used.contains(&c.id))
        .collect();
    pool.sort_by(|a, b| {
        b.tier
            .cmp(&a.tier)
            .then(b.duration_secs.total_cmp(&a.duration_secs))
    });

    for clip in pool {
        if set.total_secs() >= narration_secs {
            break;
        }
        used.insert(clip.id);
        set.clips.push(clip);
    }

    let accumulated = set.total_secs();
    if accumulated < narration_secs {
        return Err(FootageError::Insufficient {
            accumulated,
            needed: narration_secs,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelsmith_types::{QualityTier, Segment};

    fn clip(id: u64, duration_secs: f64, tier: QualityTier) -> Clip {
        let (width, height) = match tier {
            QualityTier::Uhd => (3840, 2160),
            QualityTier::Hd => (1920, 1080),
            QualityTier::Sd => (1280, 720),
        };
        Clip {
            id,
            url: format!("https://example.com/{}.mp4", id),
            width,
            height,
            duration_secs,
            tier,
        }
    }

    #[test]
    fn test_allotment_is_proportional() {
        let script = Script::new(vec![
            Segment::new("a", 10.0),
            Segment::new("b", 30.0),
        ]);
        let shares = allot_segments(&script, 60.0);
        assert!((shares[0] - 15.0).abs() < 1e-9);
        assert!((shares[1] - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_allotment_splits_evenly_without_estimates() {
        let script = Script::new(vec![Segment::new("a", 0.0), Segment::new("b", 0.0)]);
        let shares = allot_segments(&script, 30.0);
        assert_eq!(shares, vec![15.0, 15.0]);
    }

    #[test]
    fn test_covering_clip_beats_short_clip() {
        let candidates = vec![
            clip(1, 8.0, QualityTier::Uhd),
            clip(2, 12.0, QualityTier::Hd),
        ];
        let chosen = choose_clip(&candidates, 10.0, &HashSet::new()).unwrap();
        assert_eq!(chosen.id, 2);
    }

    #[test]
    fn test_higher_tier_wins_among_covering_clips() {
        let candidates = vec![
            clip(1, 11.0, QualityTier::Hd),
            clip(2, 14.0, QualityTier::Uhd),
        ];
        let chosen = choose_clip(&candidates, 10.0, &HashSet::new()).unwrap();
        assert_eq!(chosen.id, 2);
    }

    #[test]
    fn test_closest_duration_breaks_tier_ties() {
        let candidates = vec![
            clip(1, 25.0, QualityTier::Hd),
            clip(2, 11.0, QualityTier::Hd),
        ];
        let chosen = choose_clip(&candidates, 10.0, &HashSet::new()).unwrap();
        assert_eq!(chosen.id, 2);
    }

    #[test]
    fn test_used_clips_are_skipped() {
        let candidates = vec![clip(1, 12.0, QualityTier::Hd)];
        let used: HashSet<u64> = [1].into_iter().collect();
        assert!(choose_clip(&candidates, 10.0, &used).is_none());
    }

    #[test]
    fn test_top_up_covers_shortfall_best_clips_first() {
        let mut set = FootageSet::new(vec![clip(1, 20.0, QualityTier::Hd)]);
        let mut used: HashSet<u64> = [1].into_iter().collect();
        let pool = vec![
            clip(2, 15.0, QualityTier::Hd),
            clip(3, 10.0, QualityTier::Uhd),
            clip(4, 30.0, QualityTier::Sd),
        ];

        top_up(&mut set, pool, &mut used, 40.0).unwrap();

        // The UHD clip goes first, then the longer HD clip closes the gap.
        let ids: Vec<u64> = set.clips.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
        assert!(set.total_secs() >= 40.0);
    }

    #[test]
    fn test_top_up_stops_once_covered() {
        let mut set = FootageSet::new(vec![clip(1, 50.0, QualityTier::Hd)]);
        let mut used: HashSet<u64> = [1].into_iter().collect();
        let pool = vec![clip(2, 10.0, QualityTier::Uhd)];

        top_up(&mut set, pool, &mut used, 40.0).unwrap();

        assert_eq!(set.clips.len(), 1);
        assert!(!used.contains(&2));
    }

    #[test]
    fn test_top_up_never_reuses_a_clip() {
        let mut set = FootageSet::new(vec![clip(1, 20.0, QualityTier::Hd)]);
        let mut used: HashSet<u64> = [1].into_iter().collect();
        // The pool repeats an already-selected id; only the fresh clip counts.
        let pool = vec![
            clip(1, 20.0, QualityTier::Hd),
            clip(2, 25.0, QualityTier::Hd),
        ];

        top_up(&mut set, pool, &mut used, 40.0).unwrap();

        let ids: Vec<u64> = set.clips.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_top_up_fails_when_pool_runs_dry() {
        let mut set = FootageSet::new(vec![clip(1, 20.0, QualityTier::Hd)]);
        let mut used: HashSet<u64> = [1].into_iter().collect();
        let pool = vec![clip(2, 11.0, QualityTier::Hd)];

        let err = top_up(&mut set, pool, &mut used, 58.5).unwrap_err();

        match err {
            FootageError::Insufficient {
                accumulated,
                needed,
            } => {
                assert!((accumulated - 31.0).abs() < 1e-9);
                assert!((needed - 58.5).abs() < 1e-9);
            }
            other => panic!("expected insufficiency, got {}", other),
        }
        // Everything usable was still taken before giving up.
        assert_eq!(set.clips.len(), 2);
    }
}
