use strata::{ChunkCoord, Face, GenerationMode, Vec3, World, WorldConfig};

/// Flat world (grass at z = 20) with the 3x3 chunks around the origin chunk
/// active and lit.
fn settled_world() -> World {
    let mut cfg = WorldConfig::default();
    cfg.activation_range = 24.0;
    cfg.generation.mode = GenerationMode::Flat;
    cfg.load_saved_chunks = false;
    cfg.save_modified_chunks = false;
    cfg.runtime.generation_threads = Some(2);
    let mut world = World::with_builtin(cfg).unwrap();
    world.set_viewpoint(Vec3::new(8.0, 8.0, 80.0));
    for _ in 0..9 {
        world.update(0.0).unwrap();
        world.finish_pending_jobs().unwrap();
    }
    world.update(0.0).unwrap();
    world
}

#[test]
fn activation_lights_and_meshes_the_surrounded_chunk() {
    let mut world = settled_world();
    assert_eq!(world.active().len(), 9);
    assert_eq!(world.pending_light_updates(), 0);

    let above = world.block_at(3, 3, 21).unwrap();
    assert!(above.is_sky());
    assert_eq!(above.outdoor_light(), 15);
    let ground = world.block_at(3, 3, 20).unwrap();
    assert!(!ground.is_sky());

    // Only the center chunk has all four neighbors.
    let uploads = world.drain_mesh_uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].0, ChunkCoord::new(0, 0));
    assert!(!uploads[0].1.is_empty());
    assert!(world.drain_mesh_uploads().is_empty());
}

#[test]
fn column_top_placement_and_digging() {
    let mut world = settled_world();
    let stone = world.registry().id_by_name("stone").unwrap();
    let grass = world.registry().id_by_name("grass").unwrap();

    assert_eq!(world.highest_solid_in_column(3, 3), Some(20));
    assert!(world.place_on_column_top(3, 3, stone));
    assert_eq!(world.block_at(3, 3, 21).map(|b| b.id), Some(stone));
    assert_eq!(world.highest_solid_in_column(3, 3), Some(21));
    // Unknown ids and inactive columns are refused.
    assert!(!world.place_on_column_top(3, 3, 250));
    assert!(!world.place_on_column_top(500, 500, stone));
    assert_eq!(world.highest_solid_in_column(500, 500), None);

    assert_eq!(world.dig(3, 3, 21), Some(stone));
    assert_eq!(world.dig(3, 3, 21), None);
    assert_eq!(world.dig(3, 3, 20), Some(grass));
    world.update(0.0).unwrap();
    let opened = world.block_at(3, 3, 20).unwrap();
    assert!(opened.is_sky());
    assert_eq!(opened.outdoor_light(), 15);
}

#[test]
fn targeted_edits_follow_the_ray() {
    let mut world = settled_world();
    let stone = world.registry().id_by_name("stone").unwrap();
    let grass = world.registry().id_by_name("grass").unwrap();
    let down = Vec3::new(0.0, 0.0, -1.0);

    let hit = world.raycast(Vec3::new(5.5, 5.5, 25.5), down).unwrap();
    assert_eq!(hit.block.world_pos(), (5, 5, 20));
    assert_eq!(hit.face, Face::Up);
    // Out of reach.
    assert!(world.raycast(Vec3::new(5.5, 5.5, 60.5), down).is_none());

    let placed = world.place_targeted(Vec3::new(5.5, 5.5, 25.5), down, stone).unwrap();
    assert_eq!(placed.world_pos(), (5, 5, 21));
    assert_eq!(world.block_at(5, 5, 21).map(|b| b.id), Some(stone));
    world.update(0.0).unwrap();
    assert!(!world.block_at(5, 5, 21).unwrap().is_sky());

    let (dug, removed) = world.dig_targeted(Vec3::new(5.5, 5.5, 25.5), down).unwrap();
    assert_eq!(dug.world_pos(), (5, 5, 21));
    assert_eq!(removed, stone);
    let (dug, removed) = world.dig_targeted(Vec3::new(5.5, 5.5, 25.5), down).unwrap();
    assert_eq!(dug.world_pos(), (5, 5, 20));
    assert_eq!(removed, grass);
}

#[test]
fn edits_remesh_the_owning_chunk() {
    let mut world = settled_world();
    world.drain_mesh_uploads();
    assert!(world.dig(4, 4, 20).is_some());
    let report = world.update(0.0).unwrap();
    assert!(report.light_updates > 0);
    assert!(report.meshes_rebuilt >= 1);
    let uploads = world.drain_mesh_uploads();
    assert!(uploads.iter().any(|(coord, _)| *coord == ChunkCoord::new(0, 0)));
}

#[test]
fn day_cycle_advances_with_updates() {
    let mut cfg = WorldConfig::default();
    cfg.auto_create_chunks = false;
    cfg.runtime.generation_threads = Some(1);
    let mut world = World::with_builtin(cfg).unwrap();
    assert_eq!(world.day_cycle().clock_string(), "12:00 PM");
    // 200x time scale: 108 real seconds is a quarter day.
    world.update(108.0).unwrap();
    assert_eq!(world.day_cycle().clock_string(), "06:00 PM");
    assert_eq!(world.sky().sky_color, world.config().sky.night_sky_color);
    assert!(world.active().is_empty());
}
