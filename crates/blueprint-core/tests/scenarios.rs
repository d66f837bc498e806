// End-to-end behaviour of the globe core, driven on the host with a virtual
// clock and seeded randomness.

use blueprint_core::constants::*;
use blueprint_core::*;
use glam::{Vec2, Vec3};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn fibonacci_sphere_projects_centered_at_rest() {
    let set = PointSet::new("sphere", sphere_points(900));
    assert_eq!(set.len(), 900);
    for p in &set.points {
        assert!((p.length() - 1.0).abs() < 1e-5);
    }

    let center = Vec2::new(400.0, 300.0);
    let radius = 200.0;
    let frame = FrameInputs {
        time: 0.0,
        spin: 0.0,
        tilt: 0.0,
        progress: 0.0,
        center,
        radius,
        dpr: 1.0,
        bands: FrequencyBands::SILENT,
        waves: None,
        opacity_scale: 1.0,
    };
    let mut dots = Vec::new();
    project_set(&set, &SetStyle::SPHERE, &frame, &mut dots);
    assert_eq!(dots.len(), 900);

    let mut mean = Vec2::ZERO;
    for (p, d) in set.points.iter().zip(&dots) {
        // no deformation at t = 0, so this is a plain orthographic projection
        assert!((d.x - (center.x + p.x * radius)).abs() < 1e-3);
        assert!((d.y - (center.y - p.y * radius)).abs() < 1e-3);
        assert!(d.alpha >= 0.0 && d.alpha <= OPACITY_CEILING);
        assert!(d.size >= 1.0);
        mean += Vec2::new(d.x, d.y);
    }
    mean /= dots.len() as f32;
    assert!((mean - center).length() < 2.0, "mean {mean:?}");
}

#[test]
fn front_points_are_brighter_than_back_points() {
    let set = PointSet::new("pair", vec![Vec3::Z, -Vec3::Z]);
    let frame = FrameInputs {
        time: 0.0,
        spin: 0.0,
        tilt: 0.0,
        progress: 1.0,
        center: Vec2::ZERO,
        radius: 100.0,
        dpr: 1.0,
        bands: FrequencyBands::SILENT,
        waves: None,
        opacity_scale: 1.0,
    };
    let mut dots = Vec::new();
    project_set(&set, &SetStyle::PLANET, &frame, &mut dots);
    assert!(dots[0].alpha > dots[1].alpha);
}

#[test]
fn single_onset_in_bass_sequence() {
    let mut detector = OnsetDetector::new(0.35, 0.0);
    let fired: Vec<usize> = [0.0, 0.1, 0.4, 0.5, 0.2]
        .iter()
        .enumerate()
        .filter(|(i, b)| detector.observe(**b, *i as f32 / 60.0))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(fired, vec![2]);
}

#[test]
fn morph_progress_midway() {
    let sched = ManualScheduler::new();
    let phase = Rc::new(PhaseMachine::new(1200));
    assert!(phase.begin_transition(sched.now()));
    sched.advance(600.0);
    let expected = 1.0 - 2f32.powi(-5);
    assert!((phase.progress(sched.now()) - expected).abs() < 1e-5);
    assert_eq!(phase.evaluate(sched.now()), GlobePhase::Transitioning);
    sched.advance(600.0);
    assert_eq!(phase.evaluate(sched.now()), GlobePhase::Ready);
    assert_eq!(phase.progress(sched.now()), 1.0);
}

#[test]
fn ready_is_never_reached_without_transitioning() {
    let sched = ManualScheduler::new();
    let phase = Rc::new(PhaseMachine::default());
    let seen = Rc::new(RefCell::new(vec![phase.phase()]));
    let s = seen.clone();
    phase.observable().subscribe(move |p| s.borrow_mut().push(*p));

    // nothing happens before the morph is started
    assert_eq!(phase.evaluate(10_000.0), GlobePhase::Loading);
    assert_eq!(phase.settle(), GlobePhase::Loading);

    let loader = PageLoader::new(phase.clone(), sched.clone(), LoaderTimings::default());
    loader.start();
    sched.advance(LOADER_INITIAL_DELAY_MS as f64 - 1.0);
    assert_eq!(phase.phase(), GlobePhase::Loading);
    sched.advance(1.0);
    assert_eq!(phase.phase(), GlobePhase::Transitioning);
    assert!(loader.visible().get());
    phase.evaluate(sched.now() + phase.morph_ms());
    sched.advance(phase.morph_ms());
    assert!(!loader.visible().get());

    assert_eq!(
        *seen.borrow(),
        vec![
            GlobePhase::Loading,
            GlobePhase::Transitioning,
            GlobePhase::Ready
        ]
    );
}

#[test]
fn second_navigation_during_exit_is_dropped() {
    let sched = ManualScheduler::new();
    let coord = TransitionCoordinator::new(sched.clone(), TransitionTimings::default());
    let navs = Rc::new(RefCell::new(Vec::<String>::new()));
    let n = navs.clone();
    coord.set_navigator(move |href| n.borrow_mut().push(href.to_string()));

    let phases = Rc::new(RefCell::new(Vec::new()));
    let p = phases.clone();
    coord.observable().subscribe(move |ph| p.borrow_mut().push(*ph));

    assert!(coord.request("/about", "/", false).is_ok());
    sched.advance(100.0);
    assert_eq!(
        coord.request("/projects", "/", false),
        Err(NavigationRejected::Busy {
            phase: TransitionPhase::Exiting
        })
    );

    sched.advance(500.0);
    assert_eq!(*navs.borrow(), vec!["/about".to_string()]);
    coord.location_changed("/about");
    sched.advance(REVEAL_DELAY_MS as f64);

    assert_eq!(coord.target(), "/about");
    assert_eq!(
        *phases.borrow(),
        vec![
            TransitionPhase::Exiting,
            TransitionPhase::Entering,
            TransitionPhase::Idle
        ]
    );
    assert_eq!(navs.borrow().len(), 1);
}

#[test]
fn observers_run_in_registration_order() {
    let ctx = GlobeContext::new(ManualScheduler::new());
    let log = Rc::new(RefCell::new(Vec::new()));
    for tag in ["a", "b", "c"] {
        let l = log.clone();
        ctx.show_markers.subscribe(move |v| l.borrow_mut().push((tag, *v)));
    }
    ctx.show_markers.set(false);
    ctx.show_markers.set(false);
    assert_eq!(
        *log.borrow(),
        vec![("a", false), ("b", false), ("c", false)]
    );
}

#[test]
fn marker_click_reaches_projects_slide_handler() {
    let ctx = GlobeContext::new(ManualScheduler::new());
    ctx.slide.set(SlideTarget::Projects);
    let clicked = Rc::new(RefCell::new(None));
    let c = clicked.clone();
    ctx.marker_click.set(move |i| *c.borrow_mut() = Some(i));

    let mut scene = GlobeScene::new(5);
    let mut out = DrawList::default();
    let env = FrameEnv {
        viewport: Viewport::new(1600.0, 900.0, 2.0),
        phase: GlobePhase::Ready,
        progress: 1.0,
        slide: ctx.slide.get(),
        markers_wanted: ctx.markers_wanted(),
        bands: FrequencyBands::SILENT,
        dt: 0.0,
        static_frame: true,
    };
    scene.frame(&env, &mut out);
    let hit = scene.orbits().hits()[1];
    assert_eq!(
        ctx.marker_click
            .dispatch(scene.orbits(), hit.center.x, hit.center.y),
        Some(1)
    );
    assert_eq!(*clicked.borrow(), Some(1));
}
