use proptest::num::f32::NORMAL;
use proptest::prelude::*;
use proptest::strategy::Strategy;
use strata_geom::{Aabb, Vec3, distance_to_segment};

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn bounded_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e3)
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (bounded_f32(), bounded_f32(), bounded_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    // Normalizing a non-degenerate vector yields unit length
    #[test]
    fn normalized_has_unit_length(v in arb_vec3()) {
        prop_assume!(v.length() > 1e-3);
        prop_assert!(approx(v.normalized().length(), 1.0, 1e-4));
    }

    // Cross product is orthogonal to both inputs
    #[test]
    fn cross_is_orthogonal(a in arb_vec3(), b in arb_vec3()) {
        let c = a.cross(b);
        let scale = (a.length() * b.length()).max(1.0);
        prop_assert!(c.dot(a).abs() <= 1e-3 * scale * a.length().max(1.0));
        prop_assert!(c.dot(b).abs() <= 1e-3 * scale * b.length().max(1.0));
    }

    // A point never lies farther from a segment than from either endpoint
    #[test]
    fn segment_distance_bounded_by_endpoints(p in arb_vec3(), a in arb_vec3(), b in arb_vec3()) {
        let d = distance_to_segment(p, a, b);
        let da = (p - a).length();
        let db = (p - b).length();
        let tol = 1e-3 * (da + db).max(1.0);
        prop_assert!(d <= da + tol);
        prop_assert!(d <= db + tol);
    }

    // The capsule bound contains both endpoints
    #[test]
    fn segment_bound_contains_endpoints(a in arb_vec3(), b in arb_vec3(), r in 0.5f32..10.0) {
        let bb = Aabb::around_segment(a, b, r);
        prop_assert!(bb.contains(a));
        prop_assert!(bb.contains(b));
    }
}
