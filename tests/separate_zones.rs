//! End-to-end tests for the GLB zone separation pipeline.
//!
//! Each test writes a garment GLB with the crate's own exporter, runs the
//! pipeline on it and inspects the result with the `gltf` crate.

#![allow(clippy::unwrap_used)]

use std::path::Path;

use approx::assert_relative_eq;
use tempfile::tempdir;

use garment_zones::error::{GeometryError, OperationError, ZonesError};
use garment_zones::io::{ExportGlb, ImportGlb};
use garment_zones::operations::classify::Zone;
use garment_zones::operations::creation::MakeMesh;
use garment_zones::operations::query::BoundingBox;
use garment_zones::pipeline::{SeparateConfig, SeparateZones, Strategy};
use garment_zones::topology::{MaterialData, MeshData, MeshStore};

/// Writes a 10 x 4 grid of unit quads (split into triangles) spanning
/// X in [-5, 5] and Y in [-2, 2] in the modeling frame.
fn write_garment(path: &Path) {
    let mut store = MeshStore::new();
    let (nx, ny) = (10u32, 4u32);
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    for j in 0..=ny {
        for i in 0..=nx {
            positions.push([f64::from(i) - 5.0, f64::from(j) - 2.0, 0.25]);
            normals.push([0.0, 0.0, 1.0]);
        }
    }
    let mut triangles = Vec::new();
    for j in 0..ny {
        for i in 0..nx {
            let a = j * (nx + 1) + i;
            triangles.push([a, a + 1, a + nx + 2]);
            triangles.push([a, a + nx + 2, a + nx + 1]);
        }
    }
    let material = store.add_material(MaterialData {
        name: Some("fabric".to_string()),
        base_color: [0.8, 0.1, 0.1, 1.0],
        metallic: 0.0,
        roughness: 0.9,
        double_sided: true,
        base_color_texture: None,
    });
    let shirt = MakeMesh::new("shirt")
        .positions(&positions)
        .normals(&normals)
        .triangles(&triangles)
        .material(material)
        .execute(&mut store)
        .unwrap();

    // A second mesh object that must be ignored.
    let decoy = MakeMesh::new("decoy")
        .positions(&[[50.0, 0.0, 0.0], [51.0, 0.0, 0.0], [50.0, 1.0, 0.0]])
        .triangles(&[[0, 1, 2]])
        .execute(&mut store)
        .unwrap();

    ExportGlb::new(path)
        .with_mesh(shirt)
        .with_mesh(decoy)
        .execute(&store)
        .unwrap();
}

fn triangle_count(mesh: &gltf::Mesh<'_>, buffers: &[gltf::buffer::Data]) -> usize {
    mesh.primitives()
        .map(|p| {
            p.reader(|b| Some(&buffers[b.index()]))
                .read_indices()
                .unwrap()
                .into_u32()
                .count()
                / 3
        })
        .sum()
}

#[test]
fn writes_three_named_zone_meshes() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("shirt.glb");
    let output = dir.path().join("out").join("shirt-zones.glb");
    write_garment(&input);

    let report = SeparateZones::new(
        SeparateConfig::default()
            .with_input(&input)
            .with_output(&output),
    )
    .execute()
    .unwrap();

    assert_eq!(report.zone(Zone::Sleeves).polygons, 32);
    assert_eq!(report.zone(Zone::Front).polygons, 24);
    assert_eq!(report.zone(Zone::Back).polygons, 24);
    assert_eq!(report.discarded, 0);
    assert_relative_eq!(report.bounds.min.x, -5.0);
    assert_relative_eq!(report.bounds.max.y, 2.0);

    let (document, buffers, _) = gltf::import(&output).unwrap();
    let names: Vec<_> = document.nodes().map(|n| n.name().unwrap().to_string()).collect();
    assert_eq!(names, ["sleeves", "front_torso", "back_torso"]);
    assert_eq!(document.meshes().count(), 3);

    for (node, zone) in document.nodes().zip(Zone::ALL) {
        let mesh = node.mesh().unwrap();
        assert_eq!(mesh.name(), Some(zone.object_name()));
        assert_eq!(triangle_count(&mesh, &buffers), report.zone(zone).polygons);

        let primitive = mesh.primitives().next().unwrap();
        assert!(primitive.get(&gltf::Semantic::Normals).is_some());
        assert_eq!(primitive.material().name(), Some("fabric"));
    }
    assert_eq!(document.materials().count(), 1);
}

#[test]
fn strategies_write_identical_counts() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("shirt.glb");
    write_garment(&input);

    let run = |strategy, name: &str| {
        SeparateZones::new(
            SeparateConfig::default()
                .with_input(&input)
                .with_output(dir.path().join(name))
                .with_strategy(strategy),
        )
        .execute()
        .unwrap()
    };
    let partition = run(Strategy::Partition, "a.glb");
    let trimmed = run(Strategy::DuplicateAndTrim, "b.glb");

    assert_eq!(partition.zones, trimmed.zones);
    assert_eq!(partition.loose_removed, 0);
    assert!(trimmed.loose_removed > 0);
}

#[test]
fn import_restores_modeling_frame() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("shirt.glb");
    write_garment(&input);

    let mut store = MeshStore::new();
    let imported = ImportGlb::new(&input).execute(&mut store).unwrap();
    assert_eq!(imported.mesh_objects, 2);
    assert_eq!(store.mesh(imported.mesh).unwrap().name, "shirt");

    let bounds = BoundingBox::new(imported.mesh).execute(&store).unwrap();
    assert_relative_eq!(bounds.min.x, -5.0);
    assert_relative_eq!(bounds.min.y, -2.0);
    assert_relative_eq!(bounds.max.z, 0.25);

    // On disk the depth axis is glTF's -Z.
    let (document, buffers, _) = gltf::import(&input).unwrap();
    let mesh = document.meshes().next().unwrap();
    let primitive = mesh.primitives().next().unwrap();
    let first = primitive
        .reader(|b| Some(&buffers[b.index()]))
        .read_positions()
        .unwrap()
        .next()
        .unwrap();
    assert_eq!(first, [-5.0, 0.25, 2.0]);
}

#[test]
fn scene_without_mesh_fails_before_export() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("empty.glb");
    let output = dir.path().join("zones.glb");

    let mut store = MeshStore::new();
    let empty = store.add_mesh(MeshData::new("Empty"));
    ExportGlb::new(&input).with_mesh(empty).execute(&store).unwrap();

    let err = SeparateZones::new(
        SeparateConfig::default()
            .with_input(&input)
            .with_output(&output),
    )
    .execute()
    .unwrap_err();

    assert!(matches!(
        err,
        ZonesError::Operation(OperationError::NoMeshFound)
    ));
    assert!(!output.exists());
}

#[test]
fn flat_garment_fails_before_export() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("flat.glb");
    let output = dir.path().join("zones.glb");

    let mut store = MeshStore::new();
    // Zero depth along the classification Y axis.
    let flat = MakeMesh::new("flat")
        .positions(&[[-1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 2.0]])
        .triangles(&[[0, 1, 2]])
        .execute(&mut store)
        .unwrap();
    ExportGlb::new(&input).with_mesh(flat).execute(&store).unwrap();

    let err = SeparateZones::new(
        SeparateConfig::default()
            .with_input(&input)
            .with_output(&output),
    )
    .execute()
    .unwrap_err();

    assert!(matches!(
        err,
        ZonesError::Geometry(GeometryError::DegenerateBounds { axis: "y", .. })
    ));
    assert!(!output.exists());
}
