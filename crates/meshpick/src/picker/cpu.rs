//! Ray-cast face picking.
//!
//! The broad phase tests the pick ray against every face in parallel and
//! fills a candidate mask; the narrow phase walks the mask in face order and
//! keeps the plane intersection nearest to the near plane.

use glam::{Vec2, Vec3};
use meshpick_core::{OrientedLine3, PickRay, Projection};
use meshpick_mesh::{Face, SurfaceMesh};
use rayon::prelude::*;

use super::FaceHit;

/// Returns true if `line` passes through the fan triangulation of `face`.
///
/// The fan is the same one the GPU proxy is built from, so both strategies
/// agree on which faces a screen point covers.
pub(super) fn crosses_face(mesh: &SurfaceMesh, face: Face, line: &OrientedLine3) -> bool {
    let mut corners = mesh.face_vertices(face).map(|v| mesh.position(v));
    let (Some(apex), Some(mut prev)) = (corners.next(), corners.next()) else {
        return false;
    };
    corners.any(|next| {
        let crossed = line.crosses_triangle(apex, prev, next);
        prev = next;
        crossed
    })
}

/// Casts the ray under `screen` through `mesh`.
///
/// Faces whose plane is parallel to the ray are skipped, as are hits behind
/// the near plane. On equal distances the lower face index wins.
pub(super) fn cast_ray<P: Projection + ?Sized>(
    mesh: &SurfaceMesh,
    camera: &P,
    screen: Vec2,
) -> Option<FaceHit> {
    if mesh.is_empty() {
        return None;
    }

    let ray = PickRay::from_screen(camera, screen);
    if !ray.is_valid() {
        log::debug!("degenerate pick ray at {screen}");
        return None;
    }

    let oriented = ray.oriented_line();
    let candidates: Vec<bool> = (0..mesh.n_faces() as u32)
        .into_par_iter()
        .map(|i| crosses_face(mesh, Face::new(i), &oriented))
        .collect();

    let line = ray.line();
    let mut best: Option<(f32, FaceHit)> = None;
    for face in mesh.faces().filter(|f| candidates[f.idx()]) {
        let Some(point) = mesh.face_plane(face).intersect(&line) else {
            continue;
        };
        if line.parameter(point) < 0.0 {
            continue;
        }
        let score = point.distance_squared(ray.near);
        if best.as_ref().is_none_or(|(best_score, _)| score < *best_score) {
            best = Some((score, FaceHit { face, point }));
        }
    }

    best.map(|(_, hit)| hit)
}

/// Intersection of the ray under `screen` with the plane of `face`, or the
/// face centroid when the ray runs parallel to it.
pub(super) fn face_point<P: Projection + ?Sized>(
    mesh: &SurfaceMesh,
    camera: &P,
    face: Face,
    screen: Vec2,
) -> Vec3 {
    let line = PickRay::from_screen(camera, screen).line();
    mesh.face_plane(face)
        .intersect(&line)
        .unwrap_or_else(|| mesh.face_centroid(face))
}
