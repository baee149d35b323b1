use super::{Layer, LayerKind, LinearAnimation, OrbitAnimation, Scene};

pub(super) const NAMES: &[&str] = &["basic", "hydrogen", "water"];

pub(super) fn by_name(name: &str) -> Option<Scene> {
    match name {
        "basic" => Some(basic()),
        "hydrogen" => Some(hydrogen()),
        "water" => Some(water()),
        _ => None,
    }
}

/// A single dot sliding to the right.
fn basic() -> Scene {
    let mut scene = Scene::new(4000.0).with_layer(
        atom("element1", 100.0, 200.0, 20.0, "#3498db")
            .with_animation(LinearAnimation::new("x", 100.0, 400.0, 0.0, 3000.0)),
    );
    scene.id = Some("basic".to_string());
    scene
}

/// Nucleus with one electron circling it every three seconds.
fn hydrogen() -> Scene {
    let mut scene = Scene::new(4000.0)
        .with_layer(atom("atom", 300.0, 200.0, 30.0, "#e74c3c"))
        .with_layer(
            atom("electron", 250.0, 200.0, 8.0, "#3498db")
                .with_animation(OrbitAnimation::new(300.0, 200.0, 50.0, 3000.0)),
        );
    scene.id = Some("hydrogen".to_string());
    scene
}

fn water() -> Scene {
    let mut scene = Scene::new(5000.0)
        .with_layer(atom("oxygen", 300.0, 200.0, 25.0, "#e74c3c"))
        .with_layer(atom("hydrogen1", 270.0, 180.0, 15.0, "#3498db"))
        .with_layer(atom("hydrogen2", 270.0, 220.0, 15.0, "#3498db"));
    scene.id = Some("water".to_string());
    scene
}

fn atom(id: &str, x: f64, y: f64, r: f64, fill: &str) -> Layer {
    Layer::new(id, LayerKind::Circle)
        .with_property("x", x)
        .with_property("y", y)
        .with_property("r", r)
        .with_property("fill", fill)
}
