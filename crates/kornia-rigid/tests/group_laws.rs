use approx::assert_relative_eq;
use glam::DVec3;
use kornia_rigid::{Deriv, Quaternion, Rigid3};
use rand::{rngs::StdRng, Rng, SeedableRng};

const NUM_SAMPLES: usize = 100;
const EPSILON: f64 = 1e-9;

fn random_vec<R: Rng>(rng: &mut R, scale: f64) -> DVec3 {
    DVec3::new(
        rng.random_range(-scale..scale),
        rng.random_range(-scale..scale),
        rng.random_range(-scale..scale),
    )
}

/// Tangent vector with a norm in `[0, max_angle)`.
fn random_angular<R: Rng>(rng: &mut R, max_angle: f64) -> DVec3 {
    let axis = Quaternion::from_rng(rng).transform(DVec3::X);
    axis * rng.random_range(0.0..max_angle)
}

fn random_pose<R: Rng>(rng: &mut R) -> Rigid3 {
    Rigid3::new(random_vec(rng, 5.0), Quaternion::from_rng(rng))
}

fn assert_vec_eq(a: DVec3, b: DVec3, epsilon: f64) {
    assert_relative_eq!(a.x, b.x, epsilon = epsilon);
    assert_relative_eq!(a.y, b.y, epsilon = epsilon);
    assert_relative_eq!(a.z, b.z, epsilon = epsilon);
}

fn assert_same_pose(a: &Rigid3, b: &Rigid3, epsilon: f64) {
    assert_vec_eq(a.center, b.center, epsilon);
    assert_relative_eq!(a.orient.dot(&b.orient).abs(), 1.0, epsilon = epsilon);
}

#[test]
fn quaternion_exp_log_roundtrip() {
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..NUM_SAMPLES {
        // stay clear of π, where the axis sign becomes ambiguous
        let x = random_angular(&mut rng, 3.0);
        assert_vec_eq(Quaternion::exp(x).log(), x, EPSILON);
    }
}

#[test]
fn rigid_log_exp_roundtrip() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..NUM_SAMPLES {
        let g = random_pose(&mut rng);
        assert_same_pose(&Rigid3::exp(&g.log()), &g, EPSILON);
    }
}

#[test]
fn rigid_exp_log_roundtrip() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..NUM_SAMPLES {
        let twist = Deriv::new(random_vec(&mut rng, 5.0), random_angular(&mut rng, 3.0));
        let back = Rigid3::exp(&twist).log();
        assert_vec_eq(back.linear, twist.linear, 1e-8);
        assert_vec_eq(back.angular, twist.angular, EPSILON);
    }
}

#[test]
fn quaternion_group_laws() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..NUM_SAMPLES {
        let a = Quaternion::from_rng(&mut rng);
        let b = Quaternion::from_rng(&mut rng);
        let c = Quaternion::from_rng(&mut rng);

        let left = (a * b) * c;
        let right = a * (b * c);
        assert_vec_eq(left.imag, right.imag, EPSILON);
        assert_relative_eq!(left.real, right.real, epsilon = EPSILON);

        for ident in [a * a.inv(), a.inv() * a] {
            assert_vec_eq(ident.imag, DVec3::ZERO, EPSILON);
            assert_relative_eq!(ident.real, 1.0, epsilon = EPSILON);
        }
    }
}

#[test]
fn rigid_group_laws() {
    let mut rng = StdRng::seed_from_u64(4);
    for _ in 0..NUM_SAMPLES {
        let a = random_pose(&mut rng);
        let b = random_pose(&mut rng);
        let c = random_pose(&mut rng);

        assert_same_pose(&((a * b) * c), &(a * (b * c)), EPSILON);
        assert_same_pose(&(a * a.inv()), &Rigid3::IDENTITY, EPSILON);
        assert_same_pose(&(a.inv() * a), &Rigid3::IDENTITY, EPSILON);
    }
}

#[test]
fn double_cover() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..NUM_SAMPLES {
        let x = random_angular(&mut rng, 3.0);
        if x.length() < 1e-3 {
            continue;
        }

        let q1 = Quaternion::exp(x);
        let q2 = Quaternion::exp(x + x.normalize() * (2.0 * std::f64::consts::PI));
        assert_relative_eq!(q1.dot(&q2), -1.0, epsilon = EPSILON);

        let v = random_vec(&mut rng, 2.0);
        assert_vec_eq(q1.transform(v), q2.transform(v), EPSILON);
    }
}

#[test]
fn adjoint_matches_conjugation() {
    let mut rng = StdRng::seed_from_u64(6);
    let eps = 1e-3;

    for _ in 0..NUM_SAMPLES {
        let g = random_pose(&mut rng);
        let twist = Deriv::new(random_vec(&mut rng, 1.0), random_vec(&mut rng, 1.0));

        let small = Deriv::new(twist.linear * eps, twist.angular * eps);
        let conjugated = (g * Rigid3::exp(&small) * g.inv()).log();

        let expected = g.adjoint_map(&twist);
        assert_vec_eq(conjugated.linear / eps, expected.linear, 1e-6);
        assert_vec_eq(conjugated.angular / eps, expected.angular, 1e-6);
    }
}

#[test]
fn slerp_endpoints_and_norm() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..NUM_SAMPLES {
        let q1 = Quaternion::from_rng(&mut rng);
        let q2 = Quaternion::from_rng(&mut rng);

        let start = q1.slerp(&q2, 0.0);
        assert_relative_eq!(start.dot(&q1), 1.0, epsilon = EPSILON);

        let end = q1.slerp(&q2, 1.0);
        assert_relative_eq!(end.dot(&q2).abs(), 1.0, epsilon = EPSILON);

        for i in 1..10 {
            let q = q1.slerp(&q2, i as f64 / 10.0);
            assert_relative_eq!(q.norm(), 1.0, epsilon = EPSILON);
        }
    }
}

#[test]
fn hat_is_cross_product() {
    let mut rng = StdRng::seed_from_u64(8);
    for _ in 0..NUM_SAMPLES {
        let v = random_vec(&mut rng, 10.0);
        let w = random_vec(&mut rng, 10.0);
        assert_vec_eq(Quaternion::hat(v) * w, v.cross(w), EPSILON);
    }
}

#[test]
fn matrix_matches_transform() {
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..NUM_SAMPLES {
        let g = random_pose(&mut rng);
        let x = random_vec(&mut rng, 3.0);
        assert_vec_eq(g.matrix().transform_point3(x), g.transform(x), EPSILON);
        assert_vec_eq(g.orient.matrix() * x, g.orient.transform(x), EPSILON);
    }
}

#[test]
fn from_vectors_maps_x_onto_y() {
    let mut rng = StdRng::seed_from_u64(10);
    for _ in 0..NUM_SAMPLES {
        let x = random_vec(&mut rng, 1.0).normalize();
        let y = random_vec(&mut rng, 1.0).normalize();
        let q = Quaternion::from_vectors(x, y);
        assert_vec_eq(q.transform(x), y, 1e-8);

        // antiparallel
        let q = Quaternion::from_vectors(x, -x);
        assert_vec_eq(q.transform(x), -x, 1e-8);
    }

    let diagonal = DVec3::new(1.0, 1.0, 0.0) / 2f64.sqrt();
    for x in [diagonal, -diagonal, DVec3::Y, -DVec3::Y] {
        let q = Quaternion::from_vectors(x, -x);
        assert_relative_eq!(q.norm(), 1.0, epsilon = EPSILON);
        assert_vec_eq(q.transform(x), -x, EPSILON);
    }
}
