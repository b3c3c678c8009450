//! Demo showing basic neuroscope-rs usage.
//!
//! Builds a few synthetic neurons, colours them from a palette, cycles
//! through them and writes a screenshot of each step.

use neuroscope_rs::*;

/// A soma with a few straight dendrites radiating in the XY plane.
fn synthetic_neuron(id: &str, origin: Vec3, branches: usize) -> Vec<Visual> {
    let mut visuals = vec![Visual::new(
        Part::Soma,
        Geometry::Points {
            positions: vec![origin],
            size: 6.0,
        },
    )
    .with_entity(id)
    .with_name(format!("neuron {id}"))];

    for b in 0..branches {
        let angle = std::f32::consts::TAU * b as f32 / branches as f32;
        let tip = origin + Vec3::new(angle.cos(), angle.sin(), 0.1 * b as f32);
        visuals.push(
            Visual::new(Part::Body, Geometry::polyline(vec![origin, (origin + tip) * 0.5, tip]))
                .with_entity(id)
                .with_name(format!("neuron {id}")),
        );
    }
    visuals.push(
        Visual::new(
            Part::Connector(ConnectorKind::Presynapse),
            Geometry::Points {
                positions: vec![origin + Vec3::new(0.5, 0.0, 0.0)],
                size: 3.0,
            },
        )
        .with_entity(id),
    );
    visuals
}

fn main() -> Result<()> {
    init_logging();

    let mut viewer = Viewer::headless(640, 480).with_opener(LogOpener);

    let mut visuals = Vec::new();
    for (i, id) in ["16", "42", "2333"].into_iter().enumerate() {
        visuals.extend(synthetic_neuron(id, Vec3::new(2.5 * i as f32, 0.0, 0.0), 5));
    }
    viewer.add(visuals, &AddOptions::default().with_color("hls"))?;
    viewer.set_show_legend(true);
    viewer.set_view("XY")?;

    let options = ScreenshotOptions {
        hide_overlay: false,
        ..ScreenshotOptions::default()
    };
    for step in 0..viewer.registry().entity_ids().len() {
        let focus = viewer.cycle(1);
        viewer.screenshot(format!("neurons_{step}.png"), &options)?;
        println!("step {step}: focus on {focus:?}");
    }

    viewer.unhide(None, true);
    viewer.select([EntityId::from("42")]);
    println!("Status: {}", viewer.overlay().status());
    viewer.close();
    Ok(())
}
