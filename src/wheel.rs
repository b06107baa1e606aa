//! Topic wheel: spin planning, eased animation frames and sector resolution.
//!
//! Angles are whole degrees. The pointer sits at the top of the wheel and the
//! sectors are laid out clockwise, so the sector under the pointer after a
//! rotation is counted backwards from the last topic.

use rand::Rng;

use crate::error::WheelError;

pub const DEGREES: u32 = 360;
pub const FRAME_COUNT: usize = 100;
pub const FRAME_DELAY_MS: u64 = 30;
pub const MIN_SPIN_DEGREES: u32 = 1080;
pub const MAX_EXTRA_DEGREES: u32 = 1080;

/// Segment counts offered by the wheel; each divides 360 evenly.
pub const SEGMENT_CHOICES: [usize; 13] = [3, 4, 5, 6, 8, 9, 10, 12, 15, 18, 20, 24, 30];

pub fn choose_segment_count<R: Rng + ?Sized>(rng: &mut R) -> usize {
    SEGMENT_CHOICES[rng.gen_range(0..SEGMENT_CHOICES.len())]
}

fn segment_degrees(segments: usize) -> Result<u32, WheelError> {
    if segments == 0 {
        return Err(WheelError::Empty);
    }
    if DEGREES as usize % segments != 0 {
        return Err(WheelError::UnalignedSegments(segments));
    }
    Ok(DEGREES / segments as u32)
}

/// Index of the sector under the pointer once the wheel has turned `angle` degrees.
pub fn resolve_index(angle: u32, segments: usize) -> Result<usize, WheelError> {
    let width = segment_degrees(segments)?;
    let sector = ((angle % DEGREES) / width) as usize;
    Ok(segments - 1 - sector)
}

/// Cubic ease-out: fast start, gentle stop.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// A planned spin: where the wheel will stop and how it gets there.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinPlan {
    pub target_angle: u32,
    pub frames: Vec<f64>,
    /// Frames already shown.
    pub shown: usize,
}

impl SpinPlan {
    pub fn new(target_angle: u32) -> Self {
        let frames = (0..FRAME_COUNT)
            .map(|i| {
                let t = (i + 1) as f64 / FRAME_COUNT as f64;
                ease_out_cubic(t) * target_angle as f64
            })
            .collect();
        Self {
            target_angle,
            frames,
            shown: 0,
        }
    }

    /// Angle currently displayed, in whole degrees.
    pub fn current_angle(&self) -> u32 {
        match self.shown {
            0 => 0,
            n => self.frames[n.min(self.frames.len()) - 1].round() as u32,
        }
    }

    pub fn advance(&mut self) {
        self.shown = (self.shown + 1).min(self.frames.len());
    }

    pub fn is_finished(&self) -> bool {
        self.shown >= self.frames.len()
    }
}

/// Topics laid out on the wheel, one equal sector each.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicWheel {
    topics: Vec<String>,
    segment_degrees: u32,
}

impl TopicWheel {
    pub fn new(topics: Vec<String>) -> Result<Self, WheelError> {
        let segment_degrees = segment_degrees(topics.len())?;
        Ok(Self {
            topics,
            segment_degrees,
        })
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn segment_degrees(&self) -> u32 {
        self.segment_degrees
    }

    /// Pick a stopping angle between three and six full turns, never exactly on a
    /// sector boundary.
    pub fn plan_spin<R: Rng + ?Sized>(&self, rng: &mut R) -> SpinPlan {
        let mut angle = MIN_SPIN_DEGREES + rng.gen_range(0..=MAX_EXTRA_DEGREES);
        if angle % self.segment_degrees == 0 {
            angle += 1;
        }
        SpinPlan::new(angle)
    }

    pub fn index_at(&self, angle: u32) -> usize {
        // Construction already rejected empty and unaligned wheels.
        resolve_index(angle, self.topics.len()).unwrap_or(0)
    }

    pub fn topic_under_pointer(&self, angle: u32) -> &str {
        &self.topics[self.index_at(angle)]
    }
}
