use strata_world::worldgen::{Rgb, Sky};

const SECONDS_PER_DAY: f64 = 60.0 * 60.0 * 24.0;

/// Colors the renderer needs for the current time of day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkySample {
    pub sky_color: Rgb,
    pub outdoor_light: Rgb,
    pub indoor_light: Rgb,
}

#[inline]
fn lerp_rgb(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let ch = |i: usize| (f32::from(a[i]) + (f32::from(b[i]) - f32::from(a[i])) * t).round() as u8;
    [ch(0), ch(1), ch(2)]
}

/// World clock measured in days. Whole days are irrelevant to color; only the
/// fraction matters, with 0.5 at noon.
#[derive(Clone, Debug)]
pub struct DayCycle {
    time: f64,
    scale: f32,
    colors: Sky,
}

impl DayCycle {
    pub fn new(sky: &Sky) -> Self {
        Self {
            time: f64::from(sky.start_time),
            scale: sky.world_time_scale,
            colors: sky.clone(),
        }
    }

    /// Advances by `dt` real seconds scaled by `world_time_scale`.
    pub fn advance(&mut self, dt: f32) -> SkySample {
        self.time += f64::from(dt) * f64::from(self.scale) / SECONDS_PER_DAY;
        self.sample()
    }

    #[inline]
    pub fn world_time(&self) -> f64 {
        self.time
    }

    /// Fraction of the current day in `[0, 1)`.
    #[inline]
    pub fn time_of_day(&self) -> f32 {
        self.time.rem_euclid(1.0) as f32
    }

    pub fn sample(&self) -> SkySample {
        let c = &self.colors;
        let frac = self.time_of_day();
        let (sky_color, outdoor_light) = if !(0.25..=0.75).contains(&frac) {
            (c.night_sky_color, c.night_outdoor_light)
        } else if frac < 0.5 {
            let t = (frac - 0.25) / 0.25;
            (
                lerp_rgb(c.night_sky_color, c.day_sky_color, t),
                lerp_rgb(c.night_outdoor_light, c.day_outdoor_light, t),
            )
        } else {
            let t = (frac - 0.5) / 0.25;
            (
                lerp_rgb(c.day_sky_color, c.night_sky_color, t),
                lerp_rgb(c.day_outdoor_light, c.night_outdoor_light, t),
            )
        };
        SkySample {
            sky_color,
            outdoor_light,
            indoor_light: c.indoor_light,
        }
    }

    /// 12-hour wall clock, e.g. `"12:00 PM"` at noon.
    pub fn clock_string(&self) -> String {
        let hour24 = self.time_of_day() * 24.0;
        let mut hour = hour24 as u32;
        let minutes = ((hour24 - hour as f32) * 60.0) as u32;
        let suffix = if hour < 12 || hour == 24 { "AM" } else { "PM" };
        if hour > 12 {
            hour -= 12;
        }
        if hour == 0 {
            hour = 12;
        }
        format!("{hour:02}:{minutes:02} {suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle_at(time: f32) -> DayCycle {
        DayCycle::new(&Sky {
            start_time: time,
            ..Sky::default()
        })
    }

    #[test]
    fn starts_at_noon_with_day_colors() {
        let sky = Sky::default();
        let cycle = DayCycle::new(&sky);
        assert_eq!(cycle.clock_string(), "12:00 PM");
        let s = cycle.sample();
        assert_eq!(s.sky_color, sky.day_sky_color);
        assert_eq!(s.outdoor_light, sky.day_outdoor_light);
        assert_eq!(s.indoor_light, sky.indoor_light);
    }

    #[test]
    fn night_outside_the_daylight_window() {
        let sky = Sky::default();
        for t in [0.0, 0.1, 0.24, 0.76, 0.99, 3.1] {
            let s = cycle_at(t).sample();
            assert_eq!(s.sky_color, sky.night_sky_color, "t={t}");
            assert_eq!(s.outdoor_light, sky.night_outdoor_light, "t={t}");
        }
    }

    #[test]
    fn dawn_and_dusk_interpolate() {
        let sky = Sky::default();
        let dawn = cycle_at(0.375).sample();
        let dusk = cycle_at(0.625).sample();
        let mid = lerp_rgb(sky.night_sky_color, sky.day_sky_color, 0.5);
        assert_eq!(dawn.sky_color, mid);
        assert_eq!(dusk.sky_color, mid);
    }

    #[test]
    fn advancing_scales_by_the_time_scale() {
        let mut cycle = cycle_at(0.0);
        // 200x: 432 real seconds is one game day.
        cycle.advance(216.0);
        assert!((cycle.world_time() - 0.5).abs() < 1e-9);
        assert_eq!(cycle.clock_string(), "12:00 PM");
        cycle.advance(216.0);
        assert!((cycle.time_of_day()).abs() < 1e-6 || (cycle.time_of_day() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn clock_wraps_to_twelve_hour_form() {
        assert_eq!(cycle_at(0.0).clock_string(), "12:00 AM");
        assert_eq!(cycle_at(0.25).clock_string(), "06:00 AM");
        assert_eq!(cycle_at(0.75).clock_string(), "06:00 PM");
        assert_eq!(cycle_at(0.5625).clock_string(), "01:30 PM");
    }
}
