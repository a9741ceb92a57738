use approx::assert_relative_eq;
use orbit3d_core::pipeline::{ndc_to_screen, ndc_to_screen_flipped};
use orbit3d_core::transform::{align_to_direction, rotation_y, scaling, translation};
use orbit3d_core::{Camera, Matrix4, Mesh, Pipeline, Rgb, Triangle, Vector3};

fn pipeline() -> Pipeline {
    Pipeline::new(1000, 800, 90.0)
}

fn camera_at_origin() -> Camera {
    Camera::with_pose(Vector3::zero(), 0.0, 0.0)
}

fn facing(z: f32) -> Triangle {
    Triangle::new(
        Vector3::new(-1.0, -1.0, z),
        Vector3::new(-1.0, 1.0, z),
        Vector3::new(1.0, -1.0, z),
    )
}

fn reversed(t: &Triangle) -> Triangle {
    let [p0, p1, p2] = t.points;
    Triangle::new(p0, p2, p1)
}

#[test]
fn facing_triangle_at_depth_five() {
    let mut mesh = Mesh::new();
    mesh.add_triangle(facing(5.0));
    let rows = pipeline().process_mesh(&mesh, &camera_at_origin(), &Matrix4::identity(), Rgb::WHITE);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].depth, 5.0);
}

#[test]
fn reversed_winding_is_culled() {
    let mut mesh = Mesh::new();
    mesh.add_triangle(reversed(&facing(5.0)));
    let rows = pipeline().process_mesh(&mesh, &camera_at_origin(), &Matrix4::identity(), Rgb::WHITE);
    assert!(rows.is_empty());
}

#[test]
fn near_plane_violations_never_appear() {
    let near_cases = [
        [0.05, 5.0, 5.0],
        [5.0, 0.09, 5.0],
        [5.0, 5.0, -2.0],
        [-1.0, -1.0, -1.0],
    ];
    for zs in near_cases {
        let base = Triangle::new(
            Vector3::new(-1.0, -1.0, zs[0]),
            Vector3::new(-1.0, 1.0, zs[1]),
            Vector3::new(1.0, -1.0, zs[2]),
        );
        let mut mesh = Mesh::new();
        mesh.add_triangle(reversed(&base));
        mesh.add_triangle(base);
        let rows =
            pipeline().process_mesh(&mesh, &camera_at_origin(), &Matrix4::identity(), Rgb::WHITE);
        assert!(rows.is_empty(), "z values {zs:?} produced output");
    }
}

#[test]
fn output_is_farthest_first() {
    let mut mesh = Mesh::new();
    mesh.add_triangle(facing(3.0));
    mesh.add_triangle(facing(10.0));
    let rows = pipeline().process_mesh(&mesh, &camera_at_origin(), &Matrix4::identity(), Rgb::WHITE);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].depth, 10.0);
    assert_eq!(rows[1].depth, 3.0);
}

#[test]
fn edge_flags_pass_through() {
    let t = facing(5.0);
    let [p0, p1, p2] = t.points;
    let mut mesh = Mesh::new();
    mesh.add_triangle(Triangle::with_edge_flags(p0, p1, p2, [false, true, false]));
    let rows = pipeline().process_mesh(&mesh, &camera_at_origin(), &Matrix4::identity(), Rgb::WHITE);
    assert_eq!(rows[0].edge_flags, [false, true, false]);
}

#[test]
fn cube_in_front_shows_only_front_faces() {
    let cube = Mesh::cube();
    let camera = Camera::new();
    let rows = pipeline().process_mesh(&cube, &camera, &Matrix4::identity(), Rgb::new(0, 0, 200));
    // Looking down +Z from (0, 0, -10): only the -Z face is visible.
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.color, Rgb::new(0, 0, 200));
        assert_relative_eq!(row.depth, 9.5, epsilon = 1e-4);
    }
}

#[test]
fn rotated_cube_is_sorted_and_shaded() {
    let cube = Mesh::cube();
    let camera = Camera::new();
    let world = translation(0.0, 0.0, 5.0) * rotation_y(45.0) * scaling(2.0, 2.0, 2.0);
    let rows = pipeline().process_mesh(&cube, &camera, &world, Rgb::WHITE);

    assert_eq!(rows.len(), 4);
    for pair in rows.windows(2) {
        assert!(pair[0].depth >= pair[1].depth);
    }
    for row in &rows {
        // Side faces at 45 degrees to the light: 255 * cos(45)
        assert_eq!(row.color, Rgb::new(180, 180, 180));
    }
}

#[test]
fn project_point_behind_camera_is_none() {
    let camera = camera_at_origin();
    let p = pipeline();
    assert!(p.project_point(&Vector3::new(0.0, 0.0, -3.0), &camera).is_none());
    assert!(p.project_point(&Vector3::new(0.0, 0.0, 0.99), &camera).is_none());
    assert!(p.project_point(&Vector3::new(0.0, 0.0, 1.0), &camera).is_some());
}

#[test]
fn overlay_and_mesh_paths_agree_on_center_only() {
    assert_eq!(ndc_to_screen(0.0, 0.0, 1000.0, 800.0), (500.0, 400.0));
    assert_eq!(ndc_to_screen_flipped(0.0, 0.0, 1000.0, 800.0), (500.0, 400.0));

    let (_, mesh_y) = ndc_to_screen(0.0, 0.5, 1000.0, 800.0);
    let (_, overlay_y) = ndc_to_screen_flipped(0.0, 0.5, 1000.0, 800.0);
    assert_ne!(mesh_y, overlay_y);
}

#[test]
fn gizmo_arrow_points_along_vector() {
    let vector = Vector3::new(0.0, 0.0, 4.0);
    let world = translation(0.0, 0.0, 20.0) * align_to_direction(&vector);
    let arrow = Mesh::pyramid(0.5, 2.0);
    let tip = world.multiply_vector(&arrow.triangles[0].points[0]);
    assert_relative_eq!(tip.x, 0.0, epsilon = 1e-5);
    assert_relative_eq!(tip.y, 0.0, epsilon = 1e-5);
    assert_relative_eq!(tip.z, 22.0, epsilon = 1e-5);
}
