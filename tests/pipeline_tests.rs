//! End-to-end generation runs and the files they produce.

use manamesh::document::Document;
use manamesh::pipeline::{self, OrnamentParams};
use std::fs;
use std::path::PathBuf;

fn quick_params() -> OrnamentParams {
    OrnamentParams {
        path_samples: 60,
        profile_segments: 8,
        sphere_segments: 12,
        sphere_stacks: 6,
        ..OrnamentParams::default()
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("manamesh-tests")
        .join(format!("{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn export_writes_both_stls_and_the_document() {
    let dir = scratch_dir("export");
    let doc = pipeline::export(&quick_params(), &dir).unwrap();

    let coarse = dir.join("mana_item.stl");
    let fine = dir.join("mana_item_fine.stl");
    let project = dir.join("mana_item.json");
    assert!(coarse.is_file());
    assert!(fine.is_file());
    assert!(project.is_file());
    assert_eq!(doc.outputs.len(), 2);

    // binary STL: 80-byte header, u32 triangle count, 50 bytes per triangle
    let coarse_bytes = fs::read(&coarse).unwrap();
    assert!(coarse_bytes.len() > 84);
    let tri_count =
        u32::from_le_bytes([coarse_bytes[80], coarse_bytes[81], coarse_bytes[82], coarse_bytes[83]]);
    assert_eq!(coarse_bytes.len(), 84 + 50 * tri_count as usize);

    // two levels of subdivision quadruple the triangle count twice
    let fine_bytes = fs::read(&fine).unwrap();
    let fine_count =
        u32::from_le_bytes([fine_bytes[80], fine_bytes[81], fine_bytes[82], fine_bytes[83]]);
    assert_eq!(fine_count, tri_count * 16);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn project_document_reloads_with_the_run_parameters() {
    let dir = scratch_dir("document");
    let params = quick_params();
    pipeline::export(&params, &dir).unwrap();

    let doc = Document::load(&dir.join("mana_item.json")).unwrap();
    assert_eq!(doc.name, "mana_item");
    assert_eq!(doc.params, params);
    assert!(doc.outputs.iter().any(|o| o.ends_with("mana_item.stl")));
    assert!(
        doc.outputs
            .iter()
            .any(|o| o.ends_with("mana_item_fine.stl"))
    );
    assert_eq!(doc.solids.len(), 2);
    assert!(doc.solids.iter().any(|s| s.name == "tube"));
    assert!(doc.solids.iter().all(|s| s.volume > 0.0 && s.polygons > 0));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn the_tube_solid_is_watertight() {
    let solids = pipeline::generate_solids(&quick_params()).unwrap();
    assert!(solids.tube.is_manifold());
    assert!(!solids.ornament.polygons.is_empty());
}

#[test]
fn generation_is_deterministic() {
    let params = quick_params();
    let a = pipeline::generate(&params).unwrap();
    let b = pipeline::generate(&params).unwrap();
    assert_eq!(a.polygons.len(), b.polygons.len());
    assert!((a.volume() - b.volume()).abs() < 1e-12);
}
