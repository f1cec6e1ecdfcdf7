use nspace_geom::{Aabb, Vec2, Vec3};

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn vec3_approx_eq(a: Vec3, b: Vec3, eps: f32) -> bool {
    approx_eq(a.x, b.x, eps) && approx_eq(a.y, b.y, eps) && approx_eq(a.z, b.z, eps)
}

#[test]
fn direction_constants_are_unit_axes() {
    for (v, axis, sign) in [
        (Vec3::LEFT, 0, -1.0),
        (Vec3::RIGHT, 0, 1.0),
        (Vec3::DOWN, 1, -1.0),
        (Vec3::UP, 1, 1.0),
        (Vec3::BACK, 2, -1.0),
        (Vec3::FORWARD, 2, 1.0),
    ] {
        assert!(approx_eq(v.length(), 1.0, 1e-6));
        assert!(approx_eq(v[axis], sign, 1e-6));
    }
    assert!(vec3_approx_eq(-Vec3::LEFT, Vec3::RIGHT, 1e-6));
}

#[test]
fn from_grid_and_index() {
    let p = Vec3::from_grid((3, -2, 7));
    assert!(vec3_approx_eq(p, Vec3::new(3.0, -2.0, 7.0), 1e-6));
    assert_eq!(p[0], 3.0);
    assert_eq!(p[1], -2.0);
    assert_eq!(p[2], 7.0);
    assert_eq!(p.to_array(), [3.0, -2.0, 7.0]);
}

#[test]
fn vec3_dot_length_normalized() {
    let v = Vec3::new(3.0, 4.0, 0.0);
    assert!(approx_eq(v.dot(v), 25.0, 1e-6));
    assert!(approx_eq(v.length(), 5.0, 1e-6));
    assert!(approx_eq(v.distance(Vec3::ZERO), 5.0, 1e-6));

    let n = v.normalized();
    assert!(vec3_approx_eq(n, Vec3::new(0.6, 0.8, 0.0), 1e-6));

    // Zero vector normalization is a no-op (not NaN)
    assert!(vec3_approx_eq(Vec3::ZERO.normalized(), Vec3::ZERO, 1e-6));
}

#[test]
fn vec3_cross_basis() {
    let i = Vec3::RIGHT;
    let j = Vec3::UP;
    let k = Vec3::FORWARD;
    assert!(vec3_approx_eq(i.cross(j), k, 1e-6));
    assert!(vec3_approx_eq(j.cross(k), i, 1e-6));
    assert!(vec3_approx_eq(k.cross(i), j, 1e-6));
}

#[test]
fn vec2_add_sub() {
    let a = Vec2::new(1.0, 2.0) + Vec2::ONE;
    assert_eq!(a, Vec2::new(2.0, 3.0));
    assert_eq!(a - Vec2::RIGHT, Vec2::new(1.0, 3.0));
}

#[test]
fn aabb_center_size_contains() {
    let b = Aabb::from_center_size(Vec3::new(0.5, 0.5, 0.5), Vec3::ONE);
    assert!(vec3_approx_eq(b.min, Vec3::ZERO, 1e-6));
    assert!(vec3_approx_eq(b.max, Vec3::ONE, 1e-6));
    assert!(vec3_approx_eq(b.center(), Vec3::new(0.5, 0.5, 0.5), 1e-6));
    assert!(vec3_approx_eq(b.size(), Vec3::ONE, 1e-6));
    assert!(b.contains(Vec3::new(1.0, 0.0, 0.5)));
    assert!(!b.contains(Vec3::new(1.01, 0.0, 0.5)));

    // Zero-thickness boxes still contain their own plane
    let flat = Aabb::from_center_size(Vec3::new(0.0, 0.5, 0.5), Vec3::new(0.0, 1.0, 1.0));
    assert!(flat.contains(Vec3::new(0.0, 0.25, 0.75)));

    let moved = b.translated(Vec3::new(2.0, 0.0, 0.0));
    assert!(vec3_approx_eq(moved.center(), Vec3::new(2.5, 0.5, 0.5), 1e-6));
}
