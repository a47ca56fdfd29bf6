//! Wheel-of-fortune category selection.
//!
//! The wheel is split into equal segments, one per eligible category, laid out
//! clockwise in display order starting at the pointer. Spinning adds to the
//! wheel's total rotation; the segment under the pointer wins.

use rand::Rng;

use crate::model::{Category, CategoryId};
use crate::rules::GameRules;

const FULL_TURN: f64 = 360.0;

/// Random rotation produced by one spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinRoll {
    pub turns: u32,
    pub offset_degrees: f64,
}

impl SpinRoll {
    /// Whole turns within the rules' bounds plus an offset in `[0, 360)`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, rules: &GameRules) -> Self {
        Self {
            turns: rng.random_range(rules.min_turns()..=rules.max_turns()),
            offset_degrees: rng.random_range(0.0..FULL_TURN),
        }
    }

    #[must_use]
    pub fn degrees(&self) -> f64 {
        f64::from(self.turns) * FULL_TURN + self.offset_degrees
    }
}

/// Segments of the wheel for one spin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wheel {
    segments: Vec<CategoryId>,
}

impl Wheel {
    /// Build a wheel from the categories eligible for this spin.
    #[must_use]
    pub fn new<'a>(eligible: impl IntoIterator<Item = &'a Category>) -> Self {
        Self {
            segments: eligible.into_iter().map(|c| c.id().clone()).collect(),
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[CategoryId] {
        &self.segments
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// `floor((360 - normalized) / (360 / n)) mod n`, or `None` for an empty wheel.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn segment_index(&self, rotation_degrees: f64) -> Option<usize> {
        let n = self.segments.len();
        if n == 0 {
            return None;
        }
        let normalized = rotation_degrees.rem_euclid(FULL_TURN);
        let segment = FULL_TURN / n as f64;
        let raw = ((FULL_TURN - normalized) / segment).floor() as usize;
        Some(raw % n)
    }

    /// Category under the pointer after the wheel reaches `rotation_degrees`.
    #[must_use]
    pub fn resolve(&self, rotation_degrees: f64) -> Option<&CategoryId> {
        self.segment_index(rotation_degrees)
            .and_then(|index| self.segments.get(index))
    }
}
