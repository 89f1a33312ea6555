//! Interactive viewer: partitions a scene into a BSP tree and draws it with
//! the software rasterizer.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bsp_raster::{
    BuildOptions, Color, Geometry, LeastSplits, Partitioned, RenderOptions, Scene,
    TraversalOptions, ON_PLANE_EPSILON,
};
use bsp_viz::loader::load_obj;
use bsp_viz::{demo_scene, parse_hex_color, FlyCamera, Screen, TreeNavigator};
use clap::Parser;
use log::{error, info};
use macroquad::prelude::{
    draw_text, get_fps, is_key_pressed, next_frame, screen_height, screen_width, Conf, KeyCode,
    DARKGRAY, GRAY, WHITE,
};
use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser, Debug)]
#[command(name = "bsp-viz")]
#[command(about = "Software-rendered BSP tree viewer", long_about = None)]
struct Args {
    /// Wavefront .obj files to show instead of the demo scene
    models: Vec<PathBuf>,

    /// Window width in pixels
    #[arg(long, default_value_t = 800)]
    width: u16,

    /// Window height in pixels
    #[arg(long, default_value_t = 600)]
    height: u16,

    /// Seed for face colors and the demo scene layout
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Extra random cubes in the demo scene
    #[arg(long, default_value_t = 0)]
    cubes: usize,

    /// Plane value within which a point counts as on a plane. Planes keep
    /// unnormalized normals, so this scales with each splitting triangle's
    /// area. The default only treats exact zeros as on-plane.
    #[arg(long, default_value_t = ON_PLANE_EPSILON)]
    epsilon: f32,

    /// Background color as #rrggbb
    #[arg(long, default_value = "#14141e", value_parser = parse_hex_color)]
    background: Color,

    /// Camera movement speed in units per second
    #[arg(long, default_value_t = 3.0)]
    speed: f32,

    /// Start with back-face culling off
    #[arg(long)]
    no_cull: bool,
}

fn window_conf() -> Conf {
    let args = Args::parse();
    Conf {
        window_title: "BSP Viewer".to_owned(),
        window_width: args.width.into(),
        window_height: args.height.into(),
        ..Default::default()
    }
}

/// Builds the world-space geometry from the model files, or the demo scene
/// when none are given.
fn setup(args: &Args) -> Result<Geometry> {
    let scene = if args.models.is_empty() {
        demo_scene(args.seed, args.cubes)
    } else {
        let mut rng = StdRng::seed_from_u64(args.seed);
        let mut scene = Scene::new();
        for path in &args.models {
            let model = load_obj(path, &mut rng)
                .with_context(|| format!("loading {}", path.display()))?;
            info!(
                "Loaded {}: {} points, {} triangles",
                model.name,
                model.points.len(),
                model.triangles.len()
            );
            scene.push(model);
        }
        scene
    };
    scene.generate().context("assembling scene")
}

fn partition(geometry: &Geometry, options: &BuildOptions) -> Partitioned {
    info!("Building BSP tree...");
    let partitioned = geometry.partition(&LeastSplits, options);
    let tree = &partitioned.tree;
    info!(
        "BSP tree built: {} triangles (from {}), {} nodes, depth {}",
        tree.triangle_count(),
        geometry.triangles.len(),
        tree.node_count(),
        tree.depth()
    );
    partitioned
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let geometry = match setup(&args) {
        Ok(geometry) => geometry,
        Err(err) => {
            error!("{err:#}; showing the demo scene instead");
            demo_scene(args.seed, args.cubes)
                .generate()
                .unwrap_or_default()
        }
    };
    info!(
        "Scene has {} points and {} triangles",
        geometry.points.len(),
        geometry.triangles.len()
    );

    let build = BuildOptions::default().with_epsilon(args.epsilon);
    let mut partitioned = partition(&geometry, &build);
    let mut cull = !args.no_cull;

    let mut camera = FlyCamera::new(Point3::new(0.0, 0.5, 5.0)).with_move_speed(args.speed);
    let mut navigator = TreeNavigator::new();
    let mut screen = Screen::new(args.width, args.height);

    loop {
        let window = (screen_width() as u16, screen_height() as u16);
        if window != screen.size() && window.0 > 0 && window.1 > 0 {
            screen.resize(window.0, window.1);
        }
        let size = screen.size();

        camera.update();
        navigator.update(&partitioned.tree);

        if is_key_pressed(KeyCode::G) {
            partitioned = partition(&geometry, &build);
            navigator.revalidate(&partitioned.tree);
        }
        if is_key_pressed(KeyCode::C) {
            cull = !cull;
            info!("Back-face culling {}", if cull { "on" } else { "off" });
        }

        let options = RenderOptions::default()
            .with_traversal(
                TraversalOptions::default()
                    .with_culling(cull)
                    .with_epsilon(args.epsilon),
            )
            .with_background(Some(args.background));
        let view = camera
            .camera
            .view_matrix(usize::from(size.0), usize::from(size.1));
        let stats = navigator.render(
            &partitioned.tree,
            &partitioned.points,
            camera.eye_point(),
            &view,
            screen.framebuffer_mut(),
            &options,
        );
        screen.present();

        let tree = &partitioned.tree;
        draw_text(
            &format!("BSP Viewer - Total: {} triangles", tree.triangle_count()),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text(
            &format!(
                "Tree depth: {} | Nodes: {} | Drawn: {} | Culling: {}",
                tree.depth(),
                tree.node_count(),
                stats.drawn,
                if cull { "on" } else { "off" }
            ),
            10.0,
            45.0,
            18.0,
            GRAY,
        );

        navigator.draw_ui(tree, 70.0);

        draw_text(
            "Drag mouse or arrows to look, WASD/Space/Shift to move, [G] rebuild, [C] culling",
            10.0,
            175.0,
            16.0,
            DARKGRAY,
        );
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 195.0, 16.0, DARKGRAY);

        next_frame().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_library() {
        let args = Args::parse_from(["bsp-viz"]);
        assert_eq!(args.epsilon, ON_PLANE_EPSILON);
        assert_eq!(args.background.to_rgb8(), [20, 20, 30]);
        assert!(args.models.is_empty());
        assert!(!args.no_cull);
    }

    #[test]
    fn parses_viewer_flags() {
        let args = Args::parse_from([
            "bsp-viz",
            "--background",
            "#ff0080",
            "--epsilon",
            "0.001",
            "--speed",
            "6",
            "a.obj",
        ]);
        assert_eq!(args.background.to_rgb8(), [255, 0, 128]);
        assert_eq!(args.epsilon, 0.001);
        assert_eq!(args.speed, 6.0);
        assert_eq!(args.models, vec![PathBuf::from("a.obj")]);

        assert!(Args::try_parse_from(["bsp-viz", "--background", "red"]).is_err());
    }
}
