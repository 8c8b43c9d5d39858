/// Marionette Terminal Demo - Animated Robot
///
/// Loads the five robot meshes and animates them as ASCII art.
/// Controls:
///   - A/D / Left/Right: Orbit the camera
///   - W/S / Up/Down: Zoom
///   - P: Toggle shading model
///   - 1/2/3: Toggle directional, point and spot lights
///   - Space: Pause animation
///   - Q/ESC: Quit

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use marionette_core::{Camera, DirectorySource, ProjectionMode, Robot, Transform};
use marionette_terminal::{AppConfig, DrawCounter, TerminalApp};

#[derive(Debug, Parser)]
#[command(name = "marionette-terminal", about = "Render an animated robot in the terminal")]
struct Args {
    /// Directory holding body_s.obj, head_s.obj, limb_s.obj, eyeball_s.obj and antenna_s.obj
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/assets"))]
    assets: PathBuf,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Uniform scale applied to the robot placement
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Use an orthographic projection
    #[arg(long)]
    orthographic: bool,

    /// Load the robot, report what would be drawn and exit
    #[arg(long)]
    check: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let source = DirectorySource::new(&args.assets);
    let placement = Transform::scale_matrix(args.scale, args.scale, args.scale);
    let robot = Robot::new(&source, placement)
        .with_context(|| format!("failed to build robot from {}", args.assets.display()))?;

    let mut camera = Camera::default();
    if args.orthographic {
        camera.mode = ProjectionMode::Orthographic;
    }

    if args.check {
        let mut counter = DrawCounter::default();
        robot.draw(&camera.render_context(&Default::default(), Default::default()), &mut counter);
        println!("{} draw calls, {} triangles", counter.calls, counter.triangles);
        return Ok(());
    }

    log::info!("starting terminal renderer at {} fps", args.fps);
    let mut app = TerminalApp::new(robot, AppConfig { fps: args.fps, camera })?;
    app.run()?;

    Ok(())
}
