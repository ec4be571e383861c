use phys_kernel::{
    BodyFlags, BoundaryPlane, MassProperties, Mesh, OctreeConfig, PhysicsWorld, Pruning, RigidBody,
    SimulationConfig, resolve_plane,
    math::{Aabb, Quaternion, Transform, Vector3},
    spatial::Octree,
};
use approx::assert_relative_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn cube() -> Arc<Mesh> {
    Arc::new(Mesh::cuboid(Vector3::splat(0.5)))
}

fn lowest_vertex(body: &RigidBody) -> f32 {
    body.contact_offsets()
        .map(|offset| body.get_position().y + offset.y)
        .fold(f32::INFINITY, f32::min)
}

#[test]
fn test_mass_properties_of_random_clouds() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let count = rng.gen_range(1..64);
        let vertices: Vec<Vector3> = (0..count)
            .map(|_| Vector3::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0)))
            .collect();
        let scale = Vector3::new(rng.gen_range(0.1..3.0), rng.gen_range(0.1..3.0), rng.gen_range(0.1..3.0));

        let props = MassProperties::from_vertices(&vertices, scale, 0.001);

        assert!(props.mass > 0.0);
        assert_relative_eq!(props.mass, count as f32 * 0.001, epsilon = 1e-5);
        assert!(props.inertia_reference.is_symmetric(1e-6));
        for eigenvalue in props.inertia_reference.symmetric_eigenvalues() {
            assert!(eigenvalue >= -1e-4, "negative principal moment {}", eigenvalue);
        }
    }
}

#[test]
fn test_rotation_stays_unit_length() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(11);
    let boundaries = BoundaryPlane::room();

    let mut body = RigidBody::from_mesh(
        Arc::new(Mesh::uv_sphere(0.7, 8, 6)),
        Transform::from_position(Vector3::new(0.0, 4.0, 0.0)),
        &SimulationConfig::default(),
    )
    .unwrap();

    for step in 0..400 {
        if step % 50 == 0 {
            body.set_angular_velocity(Vector3::new(
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
            ));
        }
        body.advance(1.0 / 60.0, &boundaries);
        assert_relative_eq!(body.get_rotation().length(), 1.0, epsilon = 1e-5);
    }
}

#[test]
fn test_resting_body_does_not_sink() {
    init_logging();
    let boundaries = BoundaryPlane::room();
    let mut body = RigidBody::new_dynamic(cube(), Vector3::new(0.0, -1.0, 0.0)).unwrap();

    for _ in 0..600 {
        body.advance(1.0 / 60.0, &boundaries);
        assert!(lowest_vertex(&body) > -1.5 - 0.01);
    }

    assert_relative_eq!(body.get_position().y, -1.0, epsilon = 0.01);
}

#[test]
fn test_dropped_cube_settles_on_floor() {
    init_logging();
    let boundaries = BoundaryPlane::room();
    let tilt = Quaternion::from_axis_angle(Vector3::new(1.0, 0.0, 1.0).normalize(), 0.6);
    let transform = Transform::from_position(Vector3::new(0.0, 5.0, 0.0)).with_rotation(tilt);
    let mut body = RigidBody::from_mesh(cube(), transform, &SimulationConfig::default()).unwrap();

    for _ in 0..900 {
        body.advance(1.0 / 60.0, &boundaries);
        assert!(lowest_vertex(&body) > -1.5 - 0.15);
    }

    assert!(body.get_linear_velocity().length() < 0.1);
    assert!(body.get_position().y > -1.2 && body.get_position().y < -0.8);
}

#[test]
fn test_plane_resolution_without_contact_is_a_no_op() {
    let floor = BoundaryPlane::new(Vector3::zero(), Vector3::unit_y()).unwrap();

    // entirely above the plane
    let mut body = RigidBody::new_dynamic(cube(), Vector3::new(0.0, 3.0, 0.0)).unwrap();
    body.set_linear_velocity(Vector3::new(1.0, -10.0, 0.5));
    assert!(resolve_plane(&body, &floor).is_none());

    // penetrating but moving away
    body.set_position(Vector3::new(0.0, 0.2, 0.0));
    body.set_linear_velocity(Vector3::new(0.0, 2.0, 0.0));
    let before = body.clone();
    body.resolve_boundaries(&[floor]);
    assert_eq!(body.get_linear_velocity(), before.get_linear_velocity());
    assert_eq!(body.get_angular_velocity(), before.get_angular_velocity());
    assert_eq!(body.get_restitution(), before.get_restitution());
}

#[test]
fn test_restitution_never_increases_without_injection() {
    let boundaries = BoundaryPlane::room();
    let mut body = RigidBody::new_dynamic(cube(), Vector3::new(2.0, 3.0, -1.0)).unwrap();
    body.set_linear_velocity(Vector3::new(4.0, 0.0, -3.0));
    body.set_angular_velocity(Vector3::new(1.0, 2.0, 0.5));

    let mut previous = body.get_restitution();
    for _ in 0..600 {
        body.advance(1.0 / 60.0, &boundaries);
        assert!(body.get_restitution() <= previous);
        previous = body.get_restitution();
    }
    assert!(previous < 0.5);
}

#[test]
fn test_collinear_body_stays_bounded_in_room() {
    init_logging();
    let boundaries = BoundaryPlane::room();
    let mesh = Mesh::from_vertices(vec![
        Vector3::new(0.3, 0.7, -0.2),
        Vector3::new(-0.3, -0.7, 0.2),
        Vector3::new(0.6, 1.4, -0.4),
    ]);
    let mut body = RigidBody::new_dynamic(Arc::new(mesh), Vector3::new(0.0, -1.2, 0.0)).unwrap();
    body.set_linear_velocity(Vector3::new(1.0, -3.0, 0.5));

    for _ in 0..300 {
        body.advance(1.0 / 60.0, &boundaries);
        let v = body.get_linear_velocity();
        let w = body.get_angular_velocity();
        assert!(v.is_finite() && w.is_finite());
        assert!(v.length() < 50.0, "linear velocity blew up: {:?}", v);
        assert!(w.length() < 50.0, "angular velocity blew up: {:?}", w);
    }
}

#[test]
fn test_free_fall_velocity() {
    let mut body = RigidBody::new_dynamic(cube(), Vector3::new(0.0, 5.0, 0.0)).unwrap();
    body.advance(0.1, &BoundaryPlane::room());

    let v = body.get_linear_velocity();
    assert_relative_eq!(v.x, 0.0);
    assert_relative_eq!(v.y, -0.98, epsilon = 1e-5);
    assert_relative_eq!(v.z, 0.0);
}

#[test]
fn test_octree_leaf_count_per_depth() {
    let bounds = Aabb::new(Vector3::splat(-1.0), Vector3::splat(1.0));

    for depth in 1..=4u32 {
        let config = OctreeConfig { max_depth: depth, pruning: Pruning::Retain };
        let tree = Octree::build(bounds, &[], config).unwrap();
        assert_eq!(tree.leaf_count(), 8usize.pow(depth - 1));
        assert_eq!(tree.wireframe_lines().len(), tree.leaf_count() * 24);
    }
}

#[test]
fn test_body_octree_covers_mesh() {
    let body = RigidBody::new_dynamic(Arc::new(Mesh::uv_sphere(1.0, 12, 8)), Vector3::zero()).unwrap();
    let tree = body.get_octree();

    assert_eq!(tree.max_depth(), 5);
    assert!(tree.leaf_count() > 0);
    for vertex in body.get_mesh().get_vertices() {
        let leaf = tree.leaf_containing(*vertex).unwrap();
        assert_eq!(tree.node(leaf).unwrap().depth, 5);
    }
}

#[test]
fn test_velocity_injection_resets_restitution() {
    let boundaries = BoundaryPlane::room();
    let mut body = RigidBody::new_dynamic(cube(), Vector3::new(0.0, -1.0, 0.0)).unwrap();
    for _ in 0..30 {
        body.advance(1.0 / 60.0, &boundaries);
    }
    assert!(body.get_restitution() < 0.5);

    let before = body.get_linear_velocity();
    body.add_default_velocity();

    assert_eq!(body.get_restitution(), 0.5);
    assert_relative_eq!(body.get_linear_velocity().y, before.y + 7.0, epsilon = 1e-6);
    assert_relative_eq!(body.get_linear_velocity().x, before.x);
}

#[test]
fn test_world_steps_bodies_in_room() {
    init_logging();
    let mut world = PhysicsWorld::new();
    let mesh = cube();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let position = Vector3::new(-3.0 + 2.0 * i as f32, 2.0 + i as f32, 0.0);
            world.create_body(mesh.clone(), Transform::from_position(position)).unwrap()
        })
        .collect();

    for _ in 0..600 {
        world.step(1.0 / 60.0);
    }

    assert_relative_eq!(world.get_time(), 10.0, epsilon = 1e-9);
    for handle in handles {
        let body = world.get_body(handle).unwrap();
        assert!(lowest_vertex(body) > -1.5 - 0.15);
        assert!(body.get_position().y < 0.0);
    }
}

#[test]
fn test_stacked_bodies_exchange_impulse() {
    let mut world = PhysicsWorld::with_config(SimulationConfig::default(), BoundaryPlane::room()).unwrap();
    let lower = world.create_body(cube(), Transform::from_position(Vector3::new(0.0, -1.0, 0.0))).unwrap();
    let upper = world.create_body(cube(), Transform::from_position(Vector3::new(0.0, 0.2, 0.0))).unwrap();
    world.get_body_mut(upper).unwrap().set_linear_velocity(Vector3::new(0.0, -6.0, 0.0));

    let mut collided = false;
    for _ in 0..30 {
        world.step(1.0 / 60.0);
        collided |= !world.get_events().get_collision_events_for_body(lower).is_empty();
    }

    assert!(collided);
    let upper_body = world.get_body(upper).unwrap();
    assert!(upper_body.get_position().y > world.get_body(lower).unwrap().get_position().y);
}

#[test]
fn test_body_flags_control_gravity() {
    let mut body = RigidBody::new_dynamic(cube(), Vector3::new(0.0, 5.0, 0.0)).unwrap();
    body.set_flags(BodyFlags::COLLIDES_WITH_BOUNDARIES);

    body.advance(0.5, &[]);

    assert_eq!(body.get_position(), Vector3::new(0.0, 5.0, 0.0));
    assert!(!body.has_flag(BodyFlags::AFFECTED_BY_GRAVITY));
}
