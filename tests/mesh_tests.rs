//! Boolean operations and measures on the polygon-soup kernel.

use manamesh::mesh::Mesh;
use nalgebra::Vector3;

fn ball(radius: f64) -> Mesh<()> {
    Mesh::sphere(radius, 16, 8, None)
}

#[test]
fn difference_of_concentric_spheres_leaves_a_shell() {
    let outer = ball(2.0);
    let inner = ball(1.0);
    let shell = outer.difference(&inner);
    assert!(!shell.polygons.is_empty());

    let expected = outer.volume() - inner.volume();
    let got = shell.volume();
    assert!(
        (got - expected).abs() < 1e-6 * expected,
        "shell volume {} vs expected {}",
        got,
        expected
    );
}

#[test]
fn union_of_overlapping_spheres_is_less_than_the_sum() {
    let a = ball(1.0);
    let b = ball(1.0).translate_vector(Vector3::new(1.0, 0.0, 0.0));
    let joined = a.union(&b);
    let v = joined.volume();
    assert!(v > a.volume());
    assert!(v < a.volume() + b.volume());
}

#[test]
fn union_of_disjoint_spheres_adds_volumes() {
    let a = ball(1.0);
    let b = ball(1.0).translate_vector(Vector3::new(5.0, 0.0, 0.0));
    let joined = a.union(&b);
    let expected = a.volume() + b.volume();
    assert!((joined.volume() - expected).abs() < 1e-9 * expected);
}

#[test]
fn intersection_of_nested_spheres_is_the_inner_one() {
    let outer = ball(2.0);
    let inner = ball(1.0);
    let overlap = outer.intersection(&inner);
    let expected = inner.volume();
    assert!((overlap.volume() - expected).abs() < 1e-6 * expected);
}

#[test]
fn translation_moves_the_bounding_box() {
    let moved = ball(1.0).translate(3.0, -2.0, 0.5);
    let bb = moved.bounding_box();
    assert!((bb.mins.x - 2.0).abs() < 1e-9);
    assert!((bb.maxs.y + 1.0).abs() < 1e-9);
    assert!((bb.maxs.z - 1.5).abs() < 1e-9);
}

#[test]
fn sphere_mesh_is_manifold_and_boolean_outputs_are_not_empty() {
    let a = ball(1.5);
    assert!(a.is_manifold());
    let b = ball(1.0).translate_vector(Vector3::new(1.0, 0.0, 0.0));
    assert!(!a.difference(&b).polygons.is_empty());
    assert!(!a.intersection(&b).polygons.is_empty());
}
