#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
//! Picks faces, vertices and edges of a small polygon mesh without a window.
//!
//! Uses a headless wgpu device for color-ID picking when one is available and
//! falls back to ray casting otherwise. Run with `RUST_LOG=debug` to see the
//! pick target being created.

use meshpick::{Camera, PickTarget, Projection, SurfaceMesh, SurfaceMeshPicker, Vec2, Vec3};

/// A raised square in the middle of a flat frame of quads and triangles.
fn build_mesh() -> SurfaceMesh {
    let positions = vec![
        Vec3::new(-2.0, -2.0, 0.0),
        Vec3::new(0.0, -2.0, 0.0),
        Vec3::new(2.0, -2.0, 0.0),
        Vec3::new(-2.0, 0.0, 0.0),
        Vec3::new(-1.0, -1.0, 0.5),
        Vec3::new(1.0, -1.0, 0.5),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.5),
        Vec3::new(-1.0, 1.0, 0.5),
        Vec3::new(-2.0, 2.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        Vec3::new(2.0, 2.0, 0.0),
    ];
    let faces = vec![
        vec![0, 1, 5, 4],
        vec![1, 2, 6, 5],
        vec![0, 4, 8, 3],
        vec![4, 5, 7, 8],
        vec![5, 6, 7],
        vec![6, 11, 10, 7],
        vec![3, 8, 10, 9],
        vec![8, 7, 10],
    ];
    SurfaceMesh::from_polygons(positions, &faces).expect("Failed to build demo mesh")
}

fn main() {
    env_logger::init();

    let mut mesh = build_mesh();
    if let Err(err) = mesh.update_triangles_drawable() {
        eprintln!("cannot triangulate mesh: {err}");
        return;
    }

    let mut camera = Camera::new(640, 480);
    if let Some((min, max)) = mesh.bounding_box() {
        camera.look_at_box(min, max);
    }

    let mut picker = match pollster::block_on(PickTarget::new_headless()) {
        Ok(target) => SurfaceMeshPicker::new(target),
        Err(err) => {
            println!("no GPU available ({err}), ray casting only");
            SurfaceMeshPicker::cpu_only()
        }
    };
    println!("strategy: {:?}", picker.strategy());

    for face in mesh.faces() {
        let screen = camera.project(mesh.face_centroid(face));
        let picked = picker.pick_face(&mesh, &camera, screen);
        println!(
            "face {:>2} at ({:6.1}, {:6.1}) -> {:?}, point {:?}",
            face.index(),
            screen.x,
            screen.y,
            picked.map(|f| f.index()),
            picker.last_hit().map(|hit| hit.point),
        );
    }

    // Click a few pixels away from a corner and an edge midpoint.
    let corner = camera.project(Vec3::new(1.0, 1.0, 0.5)) + Vec2::new(-4.0, 3.0);
    let vertex = picker.pick_vertex_at(&mesh, &camera, corner);
    println!("vertex near {corner}: {:?}", vertex.map(|v| v.index()));

    let midpoint = camera.project(Vec3::new(0.0, -1.0, 0.5)) + Vec2::new(0.0, -3.0);
    if let Some(h) = picker.pick_edge_at(&mesh, &camera, midpoint) {
        println!(
            "edge near {midpoint}: {} -> {}",
            mesh.from_vertex(h).index(),
            mesh.to_vertex(h).index()
        );
    } else {
        println!("edge near {midpoint}: none");
    }

    let miss = Vec2::new(2.0, 2.0);
    println!("corner of the view: {:?}", picker.pick_face(&mesh, &camera, miss));
}
