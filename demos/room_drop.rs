use phys_kernel::{
    Mesh, PhysicsWorld, Quaternion, Transform, Vector3,
    core::BodyHandle,
};
use rand::Rng;
use std::sync::Arc;

const FRAME_TIME: f64 = 1.0 / 60.0;
const TOTAL_FRAMES: usize = 60 * 12;

fn main() {
    env_logger::init();

    let mut world = PhysicsWorld::new();
    let mut rng = rand::thread_rng();

    let cube = Arc::new(Mesh::cuboid(Vector3::splat(0.5)));
    let ball = Arc::new(Mesh::uv_sphere(0.6, 12, 8));

    let mut handles: Vec<BodyHandle> = Vec::new();
    for i in 0..6 {
        let mesh = if i % 2 == 0 { cube.clone() } else { ball.clone() };
        let position = Vector3::new(rng.gen_range(-8.0..8.0), rng.gen_range(2.0..8.0), rng.gen_range(-8.0..8.0));
        let axis = Vector3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
        let rotation = Quaternion::from_axis_angle(axis.normalize(), rng.gen_range(0.0..3.0));

        match world.create_body(mesh, Transform::from_position(position).with_rotation(rotation)) {
            Ok(handle) => handles.push(handle),
            Err(e) => eprintln!("skipping body {}: {}", i, e),
        }
    }

    for frame in 1..=TOTAL_FRAMES {
        world.step(FRAME_TIME);

        // jump every four seconds
        if frame % 240 == 0 {
            world.add_default_velocity_to_all();
        }

        if frame % 60 == 0 {
            println!("t = {:5.2}s", world.get_time());
            for handle in &handles {
                if let Ok(body) = world.get_body(*handle) {
                    println!(
                        "  body {:>2}: pos {}  |v| {:6.3}  e {:.3}  octree leaves {}",
                        handle.id(),
                        body.get_position(),
                        body.get_linear_velocity().length(),
                        body.get_restitution(),
                        body.get_octree().leaf_count()
                    );
                }
            }
        }
    }
}
