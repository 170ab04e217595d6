//! Deterministic timeline planning.
//!
//! Pure function from clip durations to an ordered cut list matching the
//! narration duration exactly. Clips are taken in order and the last one is
//! trimmed; a sub-second shortfall is absorbed by looping the shortest clip.
//! Larger shortfalls are the footage stage's failure to prevent, so they are
//! rejected here rather than stretched over.

use crate::error::{MediaError, Result};

/// Shortfall the planner will absorb by looping rather than rejecting.
const LOOP_TOLERANCE_SECS: f64 = 1.0;

/// One cut in the planned timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    /// Index into the footage set's clip list.
    pub clip_index: usize,
    /// Seconds of this clip to use, from its start.
    pub take_secs: f64,
}

/// Plan an ordered cut list covering exactly `target_secs`.
pub fn plan_timeline(clip_durations: &[f64], target_secs: f64) -> Result<Vec<TimelineEntry>> {
    if clip_durations.is_empty() {
        return Err(MediaError::EmptyInput("no clips to merge".to_string()));
    }
    if target_secs <= 0.0 {
        return Err(MediaError::EmptyInput(
            "narration has no duration".to_string(),
        ));
    }

    let mut entries = Vec::new();
    let mut remaining = target_secs;

    for (clip_index, &duration) in clip_durations.iter().enumerate() {
        if remaining <= 0.0 {
            break;
        }
        let take_secs = duration.min(remaining);
        if take_secs > 0.0 {
            entries.push(TimelineEntry {
                clip_index,
                take_secs,
            });
            remaining -= take_secs;
        }
    }

    // Absorb sub-second drift by looping the shortest clip; audio timing is
    // never altered to compensate.
    while remaining > f64::EPSILON {
        if remaining > LOOP_TOLERANCE_SECS {
            return Err(MediaError::Shortfall {
                covered: target_secs - remaining,
                needed: target_secs,
            });
        }
        let (shortest_index, &shortest) = clip_durations
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .expect("non-empty checked above");
        let take_secs = shortest.min(remaining);
        entries.push(TimelineEntry {
            clip_index: shortest_index,
            take_secs,
        });
        remaining -= take_secs;
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_last_clip_to_target() {
        let plan = plan_timeline(&[10.0, 10.0, 10.0], 25.0).unwrap();
        assert_eq!(plan.len(), 3);
        assert!((plan[2].take_secs - 5.0).abs() < f64::EPSILON);
        let total: f64 = plan.iter().map(|e| e.take_secs).sum();
        assert!((total - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_skips_unneeded_trailing_clips() {
        let plan = plan_timeline(&[30.0, 30.0], 20.0).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].clip_index, 0);
        assert!((plan[0].take_secs - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_loops_shortest_clip_on_small_shortfall() {
        let plan = plan_timeline(&[12.0, 4.0, 8.0], 24.5).unwrap();
        // All three clips in order, then the shortest again for the drift.
        assert_eq!(plan.len(), 4);
        assert_eq!(plan[3].clip_index, 1);
        assert!((plan[3].take_secs - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_large_shortfall() {
        let err = plan_timeline(&[10.0, 10.0], 40.0).unwrap_err();
        match err {
            MediaError::Shortfall { covered, needed } => {
                assert!((covered - 20.0).abs() < 1e-9);
                assert!((needed - 40.0).abs() < 1e-9);
            }
            other => panic!("expected shortfall, got {}", other),
        }
    }

    #[test]
    fn test_rejects_empty_inputs() {
        assert!(plan_timeline(&[], 30.0).is_err());
        assert!(plan_timeline(&[10.0], 0.0).is_err());
    }
}
