use strata_blocks::BlockRegistry;
use strata_chunk::{BlockIter, ChunkMap};
use strata_geom::Vec3;
use strata_world::{CHUNK_SIZE_Z, Face};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub block: BlockIter,
    /// Point where the ray entered the block.
    pub position: Vec3,
    pub distance: f32,
    /// Face of the struck block the ray came through.
    pub face: Face,
}

#[inline]
fn inv_or_max(v: f32) -> f32 {
    if v.abs() < 1e-8 { f32::MAX } else { 1.0 / v.abs() }
}

fn dominant_axis(d: Vec3) -> usize {
    let (ax, ay, az) = (d.x.abs(), d.y.abs(), d.z.abs());
    if ax >= ay && ax >= az {
        0
    } else if ay >= az {
        1
    } else {
        2
    }
}

/// First opaque block along the ray within `max_distance`.
///
/// Grid traversal visits every block the ray passes through, crossing chunk
/// borders through the map's neighbor links. A ray starting above the world
/// and heading down is clipped to the top of the column first. The ray gives
/// up when it leaves the active chunks or the vertical range of the world.
pub fn raycast(
    map: &ChunkMap,
    reg: &BlockRegistry,
    start: Vec3,
    dir: Vec3,
    max_distance: f32,
) -> Option<RayHit> {
    let len = dir.length();
    if !(len > 1e-6) || !(start.z >= 0.0) {
        return None;
    }
    let d = dir / len;

    let top = CHUNK_SIZE_Z as f32;
    let t0 = if start.z < top {
        0.0
    } else if d.z < 0.0 {
        (start.z - top) / -d.z
    } else {
        return None;
    };
    if t0 > max_distance {
        return None;
    }
    let origin = start + d * t0;
    let cell = [
        origin.x.floor() as i32,
        origin.y.floor() as i32,
        (origin.z.floor() as i32).min(CHUNK_SIZE_Z as i32 - 1),
    ];
    let mut it = map.iter_at(cell[0], cell[1], cell[2])?;
    let is_opaque = |it: BlockIter| map.block(it).is_some_and(|b| reg.is_opaque(b.id));

    if is_opaque(it) {
        let face = if t0 > 0.0 {
            Face::Up
        } else {
            let axis = dominant_axis(d);
            Face::from_axis(axis, d.axis(axis) < 0.0)
        };
        return Some(RayHit {
            block: it,
            position: origin,
            distance: t0,
            face,
        });
    }

    let mut step = [0i32; 3];
    let mut t_delta = [f32::MAX; 3];
    let mut t_max = [f32::MAX; 3];
    for axis in 0..3 {
        let v = d.axis(axis);
        let frac = origin.axis(axis) - cell[axis] as f32;
        let inv = inv_or_max(v);
        if v > 0.0 {
            step[axis] = 1;
            t_delta[axis] = inv;
            t_max[axis] = (1.0 - frac) * inv;
        } else if v < 0.0 {
            step[axis] = -1;
            t_delta[axis] = inv;
            t_max[axis] = frac * inv;
        }
    }

    loop {
        let axis = if t_max[0] < t_max[1] {
            if t_max[0] < t_max[2] { 0 } else { 2 }
        } else if t_max[1] < t_max[2] {
            1
        } else {
            2
        };
        let t = t0 + t_max[axis];
        if t > max_distance {
            return None;
        }
        let exit = Face::from_axis(axis, step[axis] > 0);
        it = map.step(it, exit)?;
        t_max[axis] += t_delta[axis];
        if is_opaque(it) {
            return Some(RayHit {
                block: it,
                position: start + d * t,
                distance: t,
                face: exit.opposite(),
            });
        }
    }
}
