use sceneplay_core::{
    render_frame, AppConfig, DrawCommand, FrameStyle, Layer, LayerKind, LinearAnimation,
    ManualClock, PlaybackController, PlaybackState, QueueScheduler, RecordingSurface, Scene,
    ScenePlayError, SceneDescription,
};

type Controller = PlaybackController<RecordingSurface, QueueScheduler, ManualClock>;

fn new_controller() -> (Controller, ManualClock) {
    let clock = ManualClock::new();
    let mut config = AppConfig::default();
    config.playback.autoplay = false;
    let controller = PlaybackController::new(
        RecordingSurface::new(),
        QueueScheduler::new(),
        clock.clone(),
        &config,
    );
    (controller, clock)
}

fn sliding_scene(duration: f64) -> Scene {
    Scene::new(duration).with_layer(
        Layer::new("dot", LayerKind::Circle)
            .with_animation(LinearAnimation::new("x", 0.0, 100.0, 0.0, duration)),
    )
}

/// Drives ticks at ~60 Hz until the scheduler runs dry or `max_ticks` is hit.
fn run(controller: &mut Controller, clock: &ManualClock, max_ticks: usize) -> Vec<f64> {
    let mut times = Vec::new();
    for _ in 0..max_ticks {
        clock.advance(16.0);
        if !controller.pump().expect("tick should render") {
            break;
        }
        times.push(controller.current_time());
    }
    times
}

fn frame_at(scene: &Scene, t: f64) -> Vec<DrawCommand> {
    let mut surface = RecordingSurface::new();
    render_frame(&mut surface, scene, t, &FrameStyle::default()).unwrap();
    surface.take()
}

#[test]
fn natural_completion_parks_on_final_frame() {
    let (mut controller, clock) = new_controller();
    let scene = sliding_scene(2000.0);
    controller.load(scene.clone()).unwrap();
    controller.play();

    let times = run(&mut controller, &clock, 1000);

    assert!(!controller.is_playing());
    assert_eq!(controller.state(), PlaybackState::Paused);
    assert_eq!(controller.current_time(), 2000.0);
    assert_eq!(times.last(), Some(&2000.0));
    assert!(times.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(controller.scheduler().is_idle());

    let last_frame = controller.surface_mut().take();
    assert!(last_frame.ends_with(&frame_at(&scene, 2000.0)));
}

#[test]
fn reset_renders_exactly_one_frame_at_zero() {
    let (mut controller, clock) = new_controller();
    let scene = sliding_scene(2000.0);
    controller.load(scene.clone()).unwrap();
    controller.play();
    run(&mut controller, &clock, 20);
    assert!(controller.current_time() > 0.0);

    controller.surface_mut().clear();
    let before = controller.frames_rendered();
    controller.reset().unwrap();

    assert_eq!(controller.current_time(), 0.0);
    assert!(!controller.is_playing());
    assert_eq!(controller.state(), PlaybackState::Stopped);
    assert_eq!(controller.frames_rendered(), before + 1);
    assert_eq!(controller.surface().commands(), frame_at(&scene, 0.0).as_slice());
    assert!(controller.scheduler().is_idle());
}

#[test]
fn stale_tick_after_reset_does_not_paint() {
    let (mut controller, clock) = new_controller();
    controller.load(sliding_scene(1000.0)).unwrap();
    controller.play();
    let stale = controller.pending_tick().unwrap();

    controller.reset().unwrap();
    controller.surface_mut().clear();
    clock.advance(500.0);
    controller.on_frame(stale).unwrap();

    assert!(controller.surface().commands().is_empty());
    assert_eq!(controller.current_time(), 0.0);
}

#[test]
fn clock_stepping_backwards_never_rewinds_playback() {
    let (mut controller, clock) = new_controller();
    let scene = sliding_scene(2000.0);
    controller.load(scene.clone()).unwrap();
    clock.set(500.0);
    controller.play();

    clock.set(800.0);
    assert!(controller.pump().unwrap());
    assert_eq!(controller.current_time(), 300.0);

    clock.set(600.0);
    controller.surface_mut().clear();
    assert!(controller.pump().unwrap());
    assert_eq!(controller.current_time(), 300.0);
    assert_eq!(controller.surface().commands(), frame_at(&scene, 300.0).as_slice());

    // Earlier than the moment play was pressed.
    clock.set(100.0);
    controller.surface_mut().clear();
    assert!(controller.pump().unwrap());
    assert_eq!(controller.current_time(), 300.0);
    assert_eq!(controller.surface().commands(), frame_at(&scene, 300.0).as_slice());
    assert!(controller.is_playing());
}

#[test]
fn seek_while_paused_renders_requested_time() {
    let (mut controller, clock) = new_controller();
    let scene = sliding_scene(1000.0);
    controller.load(scene.clone()).unwrap();
    controller.play();
    run(&mut controller, &clock, 5);
    controller.pause();

    controller.surface_mut().clear();
    controller.set_time(250.0).unwrap();
    assert_eq!(controller.current_time(), 250.0);
    assert_eq!(controller.state(), PlaybackState::Paused);
    assert_eq!(controller.surface().commands(), frame_at(&scene, 250.0).as_slice());

    // Seeking backwards is fine; each render stands on its own.
    controller.surface_mut().clear();
    controller.set_time(100.0).unwrap();
    assert_eq!(controller.surface().commands(), frame_at(&scene, 100.0).as_slice());
}

#[test]
fn surface_failure_pauses_without_advancing() {
    let (mut controller, clock) = new_controller();
    controller.load(sliding_scene(1000.0)).unwrap();
    controller.play();
    run(&mut controller, &clock, 3);
    let last_good = controller.current_time();

    controller.surface_mut().detach();
    clock.advance(100.0);
    let err = controller.pump().unwrap_err();

    assert!(matches!(err, ScenePlayError::Surface(_)));
    assert_eq!(controller.state(), PlaybackState::Paused);
    assert_eq!(controller.current_time(), last_good);
    assert!(controller.scheduler().is_idle());
}

#[test]
fn unknown_kind_plays_like_a_circle() {
    let raw = r#"{
        "duration": 1000,
        "layers": [
            { "id": "a", "type": "blob", "props": { "x": 10, "r": 5 },
              "animations": [ { "property": "x", "from": 10, "to": 110, "start": 0, "end": 1000 } ] }
        ]
    }"#;
    let (mut controller, _) = new_controller();
    controller
        .load_scene(SceneDescription::from_json_str(raw).unwrap())
        .unwrap();
    controller.surface_mut().clear();
    controller.set_time(500.0).unwrap();

    let circle = Scene::new(1000.0).with_layer(
        Layer::new("a", LayerKind::Circle)
            .with_property("x", 10.0)
            .with_property("r", 5.0)
            .with_animation(LinearAnimation::new("x", 10.0, 110.0, 0.0, 1000.0)),
    );
    assert_eq!(controller.surface().commands(), frame_at(&circle, 500.0).as_slice());
}

#[test]
fn hydrogen_electron_orbits_the_nucleus() {
    let (mut controller, _) = new_controller();
    controller.load(Scene::preset("hydrogen").unwrap()).unwrap();
    controller.surface_mut().clear();
    controller.set_time(750.0).unwrap();

    let commands = controller.surface().commands();
    let DrawCommand::FillCircle { center, radius, .. } = &commands[2] else {
        panic!("electron should be a filled circle, got {:?}", commands[2]);
    };
    assert_eq!(*radius, 8.0);
    assert!((center.x - 300.0).abs() < 1e-6);
    assert!((center.y - 250.0).abs() < 1e-6);
}
