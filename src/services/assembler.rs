//! Timeline assembly and gap validation.
//!
//! Merges a day's landmark and meal blocks into one time-ordered
//! sequence, distributing landmarks around the fixed meal anchors across
//! the active window, then scans the result for oversized gaps. A gap
//! above the configured threshold signals that the day needs
//! regeneration; the engine drives that loop through [`DayState`], capped
//! at a fixed number of attempts, after which the day is accepted with
//! the residual gap recorded.

use tracing::debug;

use crate::api::{Block, DayMode, DayPlan, Mealtime};
use crate::config::EngineConfig;
use crate::models::TimeOfDay;

/// Per-day build state. Terminal state is `Accepted`, possibly with a
/// logged-but-not-rejected residual gap once attempts are exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayState {
    Collecting,
    Merging,
    Validating,
    Regenerating,
    Accepted,
}

/// A positive idle stretch between two adjacent blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Gap {
    /// Name of the block the gap follows.
    pub after: String,
    /// Name of the block the gap precedes.
    pub before: String,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub minutes: u32,
}

/// Landmark placement relative to the lunch anchor.
pub(crate) struct LandmarkSplit {
    /// Start time per landmark, parallel to the input order.
    pub starts: Vec<TimeOfDay>,
    /// End of the last afternoon landmark; lunch end when the afternoon
    /// holds none.
    pub last_afternoon_end: TimeOfDay,
}

/// Distribute landmark durations into morning and afternoon slots around
/// the lunch anchor. Landmarks keep their input order; one that no longer
/// fits before lunch moves to the afternoon together with everything
/// after it.
pub(crate) fn split_landmarks(
    durations: &[u32],
    breakfast_end: TimeOfDay,
    lunch_start: TimeOfDay,
    lunch_end: TimeOfDay,
    config: &EngineConfig,
) -> LandmarkSplit {
    let buffer = config.travel_buffer_minutes;
    let mut starts = Vec::with_capacity(durations.len());

    let mut cursor = TimeOfDay::from_minutes(
        config
            .window_start
            .minutes()
            .max(breakfast_end.minutes() + buffer),
    );
    let mut morning = true;
    let mut last_afternoon_end = lunch_end;

    for &duration in durations {
        if morning && cursor.plus_minutes(duration) <= lunch_start {
            starts.push(cursor);
            cursor = cursor.plus_minutes(duration + buffer);
        } else {
            if morning {
                morning = false;
                cursor = lunch_end.plus_minutes(buffer);
            }
            starts.push(cursor);
            last_afternoon_end = cursor.plus_minutes(duration);
            cursor = last_afternoon_end.plus_minutes(buffer);
        }
    }

    LandmarkSplit {
        starts,
        last_afternoon_end,
    }
}

/// Merge landmark and meal blocks into a time-ordered day plan.
///
/// Normal days re-derive landmark start times from the meal anchors the
/// planner fixed, so both components agree on the same split. Theme-park
/// days keep the single anchor block as-is: the lunch block deliberately
/// falls inside the park's span, since the meal is taken inside the
/// venue.
pub fn assemble(
    day: u32,
    mode: DayMode,
    landmarks: Vec<Block>,
    meals: Vec<Block>,
    config: &EngineConfig,
) -> DayPlan {
    let mut blocks = match mode {
        DayMode::ThemeParkAnchored => {
            let mut blocks = landmarks;
            blocks.extend(meals);
            blocks
        }
        DayMode::Normal => {
            let breakfast_end = meals
                .iter()
                .find(|m| m.mealtime == Some(Mealtime::Breakfast))
                .map(|m| m.end_time())
                .unwrap_or(config.window_start);
            let (lunch_start, lunch_end) = meals
                .iter()
                .find(|m| m.mealtime == Some(Mealtime::Lunch))
                .map(|m| (m.start_time, m.end_time()))
                .unwrap_or_else(|| {
                    let start = TimeOfDay::new(12, 30).unwrap();
                    (start, start.plus_minutes(60))
                });

            let durations: Vec<u32> = landmarks.iter().map(|b| b.duration.minutes()).collect();
            let split = split_landmarks(&durations, breakfast_end, lunch_start, lunch_end, config);

            let mut blocks: Vec<Block> = landmarks
                .into_iter()
                .zip(split.starts)
                .map(|(mut block, start)| {
                    block.start_time = start;
                    block
                })
                .collect();
            blocks.extend(meals);
            blocks
        }
    };

    blocks.sort_by_key(|b| b.start_time);
    if mode == DayMode::Normal {
        fix_timing_overlaps(&mut blocks);
    }

    DayPlan { day, mode, blocks }
}

/// Push any block that starts before the previous one ends forward to the
/// previous end. The layout should never produce overlaps; this is the
/// normalization pass that keeps the ordering invariant under odd inputs.
fn fix_timing_overlaps(blocks: &mut [Block]) {
    for i in 1..blocks.len() {
        let prev_end = blocks[i - 1].end_time();
        if blocks[i].start_time < prev_end {
            debug!(
                name = %blocks[i].name,
                from = %blocks[i].start_time,
                to = %prev_end,
                "shifting overlapping block"
            );
            blocks[i].start_time = prev_end;
        }
    }
}

/// Scan a day plan for gaps above the configured threshold.
///
/// Theme-park days are exempt: the anchor block spans the whole day and
/// in-park meals overlap it, so adjacent-block arithmetic is meaningless
/// there.
pub fn validate(plan: &DayPlan, config: &EngineConfig) -> Vec<Gap> {
    if plan.mode == DayMode::ThemeParkAnchored {
        return Vec::new();
    }

    let mut sorted: Vec<&Block> = plan.blocks.iter().collect();
    sorted.sort_by_key(|b| b.start_time);

    let mut gaps = Vec::new();
    for pair in sorted.windows(2) {
        let end = pair[0].end_time();
        let gap = end.minutes_until(pair[1].start_time);
        if gap > config.max_gap_minutes {
            gaps.push(Gap {
                after: pair[0].name.clone(),
                before: pair[1].name.clone(),
                start: end,
                end: pair[1].start_time,
                minutes: gap,
            });
        }
    }
    gaps
}
