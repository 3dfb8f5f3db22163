use playfield_engine::PhysicsWorld;

#[test]
fn perf_smoke_step() {
    let mut world = PhysicsWorld::new(0.0, 600.0, 32.0).unwrap();
    world.set_bounds(0.0, 0.0, 640.0, 480.0).unwrap();
    world.enable_perf_metrics(true);
    world
        .add_body(r#"{"id":"ground","x":0,"y":460,"width":640,"height":20,"static":true}"#.to_string())
        .unwrap();
    for i in 0..200u32 {
        let (x, y) = ((i % 40) as f32 * 16.0, (i / 40) as f32 * 16.0);
        world.add_box(format!("box-{i}"), x, y, 12.0, 12.0, false).unwrap();
    }

    for _ in 0..10 {
        world.step(1.0 / 60.0);
    }
    let stats = world.get_perf_stats();
    assert!(stats.step_ms() >= 0.0);
    assert_eq!(stats.bodies(), 201);
    assert_eq!(stats.dynamic_bodies(), 200);
    assert_eq!(world.render_len(), 201 * 4);
    assert_eq!(world.body_ids().len(), 201);
}
