//! Noise sources used by generation: fractal Perlin fields and integer hashes.

use fastnoise_lite::{FastNoiseLite, NoiseType};

/// Fractal Perlin noise over the XY plane.
///
/// Octaves are summed by hand with `1 / scale` as the base frequency so that
/// `scale` reads as "blocks per feature", then normalized by the total
/// amplitude and pushed back toward `[-1, 1]` with a smoothstep.
pub struct NoiseField {
    noise: FastNoiseLite,
    scale: f32,
    octaves: u32,
    persistence: f32,
    lacunarity: f32,
}

impl NoiseField {
    pub fn perlin(seed: u32, scale: f32, octaves: u32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed as i32);
        noise.set_noise_type(Some(NoiseType::Perlin));
        noise.set_frequency(Some(1.0));
        Self {
            noise,
            scale,
            octaves,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }

    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let mut amp = 1.0_f32;
        let mut freq = 1.0_f32 / self.scale.max(0.0001);
        let mut sum = 0.0_f32;
        let mut max_amp = 0.0_f32;
        for octave in 0..self.octaves.max(1) {
            // Offset each octave so lattice points don't line up at the origin.
            let shift = octave as f32 * 31.7;
            sum += self.noise.get_noise_2d(x * freq + shift, y * freq - shift) * amp;
            max_amp += amp;
            amp *= self.persistence;
            freq *= self.lacunarity;
        }
        let n = if max_amp > 0.0 { sum / max_amp } else { sum };
        let unit = ((n + 1.0) * 0.5).clamp(0.0, 1.0);
        smoothstep3(unit) * 2.0 - 1.0
    }

    /// `0.5 + 0.5 * sample`, in `[0, 1]`.
    #[inline]
    pub fn sample01(&self, x: f32, y: f32) -> f32 {
        0.5 + 0.5 * self.sample(x, y)
    }
}

#[inline]
pub fn smoothstep3(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Linear remap of `v` from `[a0, a1]` to `[b0, b1]`, clamped to the output range.
pub fn remap_clamped(v: f32, a0: f32, a1: f32, b0: f32, b1: f32) -> f32 {
    let t = ((v - a0) / (a1 - a0)).clamp(0.0, 1.0);
    b0 + (b1 - b0) * t
}

#[inline]
pub fn remap(v: f32, a0: f32, a1: f32, b0: f32, b1: f32) -> f32 {
    b0 + (b1 - b0) * ((v - a0) / (a1 - a0))
}

#[inline]
pub fn uhash32(mut a: u32) -> u32 {
    a ^= a >> 16;
    a = a.wrapping_mul(0x7feb_352d);
    a ^= a >> 15;
    a = a.wrapping_mul(0x846c_a68b);
    a ^= a >> 16;
    a
}

#[inline]
pub fn hash2(x: i32, y: i32, seed: u32) -> u32 {
    let h = (x as u32).wrapping_mul(0x85eb_ca6b)
        ^ (y as u32).wrapping_mul(0xc2b2_ae35)
        ^ seed.wrapping_mul(0x27d4_eb2d);
    uhash32(h)
}

/// Hash of a 2D lattice point mapped to `[0, 1)`.
#[inline]
pub fn hash2_01(x: i32, y: i32, seed: u32) -> f32 {
    unit_f32(hash2(x, y, seed))
}

#[inline]
fn unit_f32(h: u32) -> f32 {
    (h >> 8) as f32 / (1u32 << 24) as f32
}

/// Small counter-based generator. Same seed, same sequence.
#[derive(Clone, Debug)]
pub struct HashRng {
    seed: u32,
    counter: u32,
}

impl HashRng {
    pub fn new(seed: u32) -> Self {
        Self { seed, counter: 0 }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.counter = self.counter.wrapping_add(1);
        uhash32(self.seed ^ uhash32(self.counter.wrapping_mul(0x9e37_79b9)))
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        unit_f32(self.next_u32())
    }

    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Uniform integer in `lo..=hi`.
    pub fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo) as u32 + 1;
        lo + (self.next_u32() % span) as i32
    }

    /// Uniform in `[lo, hi)`.
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_is_bounded_and_deterministic() {
        let a = NoiseField::perlin(7, 200.0, 7);
        let b = NoiseField::perlin(7, 200.0, 7);
        for i in 0..200 {
            let x = i as f32 * 13.7 - 900.0;
            let y = i as f32 * -5.3 + 40.0;
            let v = a.sample(x, y);
            assert!((-1.0..=1.0).contains(&v));
            assert_eq!(v, b.sample(x, y));
        }
    }

    #[test]
    fn rng_ranges_are_inclusive_and_bounded() {
        let mut rng = HashRng::new(99);
        let mut seen = [false; 2];
        for _ in 0..256 {
            let v = rng.range_i32(3, 4);
            assert!((3..=4).contains(&v));
            seen[(v - 3) as usize] = true;
            let f = rng.range_f32(-30.0, 30.0);
            assert!((-30.0..30.0).contains(&f));
        }
        assert!(seen[0] && seen[1]);
    }

    #[test]
    fn hash01_stays_in_unit_interval() {
        for x in -50..50 {
            let v = hash2_01(x, x * 7, 21);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn remap_clamps() {
        assert_eq!(remap_clamped(-1.0, 0.0, 0.4, 20.0, 0.0), 20.0);
        assert_eq!(remap_clamped(0.2, 0.0, 0.4, 20.0, 0.0), 10.0);
        assert_eq!(remap_clamped(0.9, 0.0, 0.4, 20.0, 0.0), 0.0);
        assert_eq!(remap(0.0, -1.0, 1.0, 0.0, 1.0), 0.5);
    }
}
