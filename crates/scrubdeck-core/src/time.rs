// crates/scrubdeck-core/src/time.rs
//
// RationalTime / TimeRange — the vocabulary OpenTimelineIO itself uses
// (see DESIGN.md: we ground the naming on `otio-rs`'s types.rs/traits.rs
// without taking its FFI/cmake dependency).
//
// `value` is a frame count at `rate` frames per second. Comparisons rescale
// both operands to the higher rate and compare rounded frame counts — never
// a raw `to_seconds()` float equality — so drift at odd rates (23.976,
// 29.97) can't produce a false mismatch.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RationalTime {
    pub value: f64,
    pub rate:  f64,
}

impl RationalTime {
    pub fn new(value: f64, rate: f64) -> Self {
        debug_assert!(rate > 0.0, "rate must be positive");
        Self { value, rate }
    }

    pub fn zero(rate: f64) -> Self {
        Self::new(0.0, rate)
    }

    pub fn to_seconds(self) -> f64 {
        self.value / self.rate
    }

    pub fn from_seconds(seconds: f64, rate: f64) -> Self {
        Self::new(seconds * rate, rate)
    }

    /// Rescale to `rate`, rounding the frame count to the nearest integer —
    /// this is the one place float division is allowed to leak in, and only
    /// because the destination is itself an integer frame count.
    pub fn rescaled_to(self, rate: f64) -> Self {
        if (self.rate - rate).abs() < f64::EPSILON {
            return self;
        }
        let value = (self.value * rate / self.rate).round();
        Self::new(value, rate)
    }

    /// Frame count at the higher of the two rates, for cross-rate comparison
    /// without ever computing `to_seconds()`.
    fn common_frames(a: RationalTime, b: RationalTime) -> (i64, i64) {
        let rate = a.rate.max(b.rate);
        let a = a.rescaled_to(rate);
        let b = b.rescaled_to(rate);
        (a.value.round() as i64, b.value.round() as i64)
    }

    pub fn add(self, other: RationalTime) -> RationalTime {
        let rate = self.rate.max(other.rate);
        let a = self.rescaled_to(rate);
        let b = other.rescaled_to(rate);
        RationalTime::new(a.value + b.value, rate)
    }

    pub fn sub(self, other: RationalTime) -> RationalTime {
        let rate = self.rate.max(other.rate);
        let a = self.rescaled_to(rate);
        let b = other.rescaled_to(rate);
        RationalTime::new(a.value - b.value, rate)
    }

    pub fn one_frame(rate: f64) -> RationalTime {
        RationalTime::new(1.0, rate)
    }
}

impl PartialEq for RationalTime {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = Self::common_frames(*self, *other);
        a == b
    }
}

impl PartialOrd for RationalTime {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        let (a, b) = Self::common_frames(*self, *other);
        Some(a.cmp(&b))
    }
}

/// Half-open `[start_time, start_time + duration)` range in a rational rate.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_time: RationalTime,
    pub duration:   RationalTime,
}

impl TimeRange {
    pub fn new(start_time: RationalTime, duration: RationalTime) -> Self {
        Self { start_time, duration }
    }

    /// Exclusive end: `start_time + duration`. The range never includes this instant.
    pub fn end_time_exclusive(&self) -> RationalTime {
        self.start_time.add(self.duration)
    }

    /// Inclusive end: the last frame the range actually covers.
    pub fn end_time_inclusive(&self) -> RationalTime {
        self.end_time_exclusive().sub(RationalTime::one_frame(self.duration.rate))
    }

    pub fn contains_time(&self, t: RationalTime) -> bool {
        t >= self.start_time && t < self.end_time_exclusive()
    }

    pub fn contains_range(&self, other: &TimeRange) -> bool {
        other.start_time >= self.start_time
            && other.end_time_exclusive() <= self.end_time_exclusive()
    }

    pub fn intersects(&self, other: &TimeRange) -> bool {
        self.start_time < other.end_time_exclusive() && other.start_time < self.end_time_exclusive()
    }

    pub fn intersection(&self, other: &TimeRange) -> Option<TimeRange> {
        if !self.intersects(other) {
            return None;
        }
        let start = if self.start_time > other.start_time { self.start_time } else { other.start_time };
        let end_a = self.end_time_exclusive();
        let end_b = other.end_time_exclusive();
        let end = if end_a < end_b { end_a } else { end_b };
        Some(TimeRange::new(start, end.sub(start)))
    }

    /// Smallest range containing both `self` and `other`.
    pub fn extended_by(&self, other: &TimeRange) -> TimeRange {
        let start = if self.start_time < other.start_time { self.start_time } else { other.start_time };
        let end_a = self.end_time_exclusive();
        let end_b = other.end_time_exclusive();
        let end = if end_a > end_b { end_a } else { end_b };
        TimeRange::new(start, end.sub(start))
    }

    pub fn rescaled_to(&self, rate: f64) -> TimeRange {
        TimeRange::new(self.start_time.rescaled_to(rate), self.duration.rescaled_to(rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rescale_rounds_to_nearest_frame() {
        let t = RationalTime::new(24.0, 24.0); // 1.0s @ 24fps
        let r = t.rescaled_to(30.0);
        assert_eq!(r.value, 30.0);
    }

    #[test]
    fn equality_is_rate_independent() {
        let a = RationalTime::new(24.0, 24.0);
        let b = RationalTime::new(30.0, 30.0);
        assert_eq!(a, b);
    }

    #[test]
    fn contains_time_is_half_open() {
        let r = TimeRange::new(RationalTime::new(0.0, 24.0), RationalTime::new(24.0, 24.0));
        assert!(r.contains_time(RationalTime::new(0.0, 24.0)));
        assert!(r.contains_time(RationalTime::new(23.0, 24.0)));
        assert!(!r.contains_time(RationalTime::new(24.0, 24.0)));
    }

    #[test]
    fn intersection_of_overlapping_ranges() {
        let a = TimeRange::new(RationalTime::new(0.0, 24.0), RationalTime::new(10.0, 24.0));
        let b = TimeRange::new(RationalTime::new(5.0, 24.0), RationalTime::new(10.0, 24.0));
        let i = a.intersection(&b).unwrap();
        assert_eq!(i.start_time, RationalTime::new(5.0, 24.0));
        assert_eq!(i.duration, RationalTime::new(5.0, 24.0));
    }

    #[test]
    fn disjoint_ranges_do_not_intersect() {
        let a = TimeRange::new(RationalTime::new(0.0, 24.0), RationalTime::new(5.0, 24.0));
        let b = TimeRange::new(RationalTime::new(10.0, 24.0), RationalTime::new(5.0, 24.0));
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn end_time_inclusive_is_one_frame_before_exclusive() {
        let r = TimeRange::new(RationalTime::new(0.0, 24.0), RationalTime::new(24.0, 24.0));
        assert_eq!(r.end_time_inclusive(), RationalTime::new(23.0, 24.0));
    }
}
