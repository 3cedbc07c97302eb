// crates/scrubdeck-core/src/edit_engine/geometry.rs
//
// §4.G: `timeToPos(t) = trackOrigin + (t - trackStart) * pxPerSecond`,
// rounded to an integer pixel; the inverse rounds to the nearest frame in
// the track rate. Kept as free functions (not methods) so §8 property 4
// (round-trip within one frame) can test them directly without an engine.

use crate::time::RationalTime;

#[derive(Clone, Copy, Debug)]
pub struct RibbonScale {
    pub track_origin_px: f64,
    pub track_start:     RationalTime,
    pub px_per_second:   f64,
}

impl RibbonScale {
    pub fn time_to_pos(&self, t: RationalTime) -> i64 {
        let elapsed = t.sub(self.track_start).to_seconds();
        (self.track_origin_px + elapsed * self.px_per_second).round() as i64
    }

    pub fn pos_to_time(&self, pos: i64, rate: f64) -> RationalTime {
        let elapsed_seconds = (pos as f64 - self.track_origin_px) / self.px_per_second;
        let absolute_seconds = self.track_start.to_seconds() + elapsed_seconds;
        RationalTime::from_seconds(absolute_seconds, rate).rescaled_to(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale() -> RibbonScale {
        RibbonScale {
            track_origin_px: 0.0,
            track_start: RationalTime::zero(24.0),
            px_per_second: 100.0,
        }
    }

    #[test]
    fn time_to_pos_scales_linearly() {
        let s = scale();
        let t = RationalTime::new(48.0, 24.0); // 2s
        assert_eq!(s.time_to_pos(t), 200);
    }

    #[test]
    fn round_trip_within_one_frame() {
        let s = scale();
        let rate = 24.0;
        for frame in [0.0, 5.0, 23.0, 100.0, 1001.0] {
            let t = RationalTime::new(frame, rate);
            let pos = s.time_to_pos(t);
            let back = s.pos_to_time(pos, rate);
            let delta = (back.to_seconds() - t.to_seconds()).abs();
            assert!(delta <= 1.0 / rate + 1e-9, "frame {frame} drifted by {delta}");
        }
    }
}
