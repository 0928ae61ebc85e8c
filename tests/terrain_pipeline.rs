use cgmath::{InnerSpace, Point3, Vector3, Vector4};

use voxel_terrain::application_state::input_manager::InputManager;
use voxel_terrain::config::{EngineConfig, KeyBinding, TerrainConfig, WorldConfig};
use voxel_terrain::engine_state::camera_state::CameraState;
use voxel_terrain::engine_state::voxels::block::Block;
use voxel_terrain::engine_state::voxels::height_map::HeightMap;
use voxel_terrain::engine_state::voxels::noise_field::OctaveNoise;
use voxel_terrain::engine_state::voxels::world::VoxelGrid;
use voxel_terrain::error::EngineError;
use winit::keyboard::KeyCode;

#[test]
fn default_world_generates_a_surface_in_every_column() {
    let config = EngineConfig::with_default_bindings();
    let grid = VoxelGrid::generate(&config.world, &config.terrain).unwrap();
    assert_eq!(grid.dimensions(), (64, 64, 16));

    for x in 0..64 {
        for y in 0..64 {
            // The floor is always solid, and each column is one contiguous run.
            assert_eq!(grid.block_at(Point3::new(x, y, 0)).unwrap(), Block::Solid);
            let mut seen_empty = false;
            for z in 0..16 {
                let block = grid.block_at(Point3::new(x, y, z)).unwrap();
                if block.is_transparent() {
                    seen_empty = true;
                } else {
                    assert!(!seen_empty, "floating block at ({x}, {y}, {z})");
                }
            }
        }
    }

    // The highest column reaches the top of the grid.
    assert!((0..64).any(|x| (0..64).any(|y| grid.block_at(Point3::new(x, y, 15)).unwrap() == Block::Solid)));
}

#[test]
fn generation_is_deterministic() {
    let world = WorldConfig { width: 32, height: 24, depth: 16 };
    let terrain = TerrainConfig::default();
    let first = VoxelGrid::generate(&world, &terrain).unwrap();
    let second = VoxelGrid::generate(&world, &terrain).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.visible_instances(), second.visible_instances());
}

#[test]
fn grid_matches_height_map_columns() {
    let noise = OctaveNoise::new(&TerrainConfig::default());
    let heights = HeightMap::build(20, 10, &noise);
    let grid = VoxelGrid::build(20, 10, 8, &heights).unwrap();

    for x in 0..20 {
        for y in 0..10 {
            let h = heights.get(x, y).unwrap();
            let solid = (0..8)
                .filter(|&z| grid.block_at(Point3::new(x as i32, y as i32, z)).unwrap().is_solid())
                .count();
            assert_eq!(solid, ((h * 8.0).floor() as usize + 1).min(8));
        }
    }
}

#[test]
fn instances_are_ordered_and_in_bounds() {
    let grid = VoxelGrid::generate(&WorldConfig { width: 8, height: 8, depth: 4 }, &TerrainConfig::default())
        .unwrap();
    let instances = grid.visible_instances();

    let key = |p: &Point3<i32>| (p.x, p.y, p.z);
    assert!(instances.windows(2).all(|pair| key(&pair[0]) < key(&pair[1])));
    assert!(instances
        .iter()
        .all(|p| (0..8).contains(&p.x) && (0..8).contains(&p.y) && (0..4).contains(&p.z)));
    assert!(matches!(
        grid.block_at(Point3::new(0, 0, -1)),
        Err(EngineError::OutOfBounds { .. })
    ));
}

#[test]
fn input_drives_the_camera_through_a_frame() {
    let config = EngineConfig::with_default_bindings();
    let mut camera = CameraState::new(&config.camera, 800, 600).unwrap();
    let mut input = InputManager::new(&config.key_bindings);

    // Mouse motion is ignored until the pointer is captured.
    if let Some((dx, dy)) = input.filter_mouse_motion((600.0, 0.0)) {
        camera.apply_mouse_delta(dx, dy);
    }
    assert_eq!(camera.orientation.yaw(), 90.0);

    input.set_pointer_captured(true);
    // Turn 90 degrees: yaw 90 -> 180, now facing +x.
    if let Some((dx, dy)) = input.filter_mouse_motion((600.0, 0.0)) {
        camera.apply_mouse_delta(dx, dy);
    }
    assert!((camera.orientation.yaw() - 180.0).abs() < 1e-3);

    input.intake_key(KeyCode::KeyW, true);
    camera.update(0.0, input.move_flags());
    assert_eq!(camera.camera.position, Point3::new(7.0, 3.0, 7.0));

    camera.update(320.0, input.move_flags());
    let moved = camera.camera.position - Point3::new(7.0, 3.0, 7.0);
    assert!((moved - Vector3::new(2.0, 0.0, 0.0)).magnitude() < 1e-4);

    // A point straight ahead lands on the view axis, in front of the camera.
    let view = camera.camera_uniform.view();
    let ahead = view * Vector4::new(camera.camera.position.x + 3.0, camera.camera.position.y, camera.camera.position.z, 1.0);
    assert!(ahead.x.abs() < 1e-4 && ahead.y.abs() < 1e-4);
    assert!((ahead.z + 3.0).abs() < 1e-4);
}

#[test]
fn shipped_config_matches_defaults() {
    let json = std::fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/config/terrain.json")).unwrap();
    let shipped = EngineConfig::from_json(&json).unwrap();
    let defaults = EngineConfig::with_default_bindings();

    assert_eq!(shipped.world, defaults.world);
    assert_eq!(shipped.terrain, defaults.terrain);
    assert_eq!(shipped.window, defaults.window);
    assert_eq!(shipped.key_bindings, KeyBinding::defaults());
    assert!((shipped.camera.walk_speed - defaults.camera.walk_speed).abs() < 1e-9);
    assert_eq!(shipped.camera.start_position, defaults.camera.start_position);
    assert!(shipped.validate().is_ok());
}
