/// Example: Load a single OBJ file and spin it in the terminal
///
/// Usage: cargo run --example load_obj -- path/to/file.obj

use std::env;
use std::path::Path;

use anyhow::Context;
use marionette_core::{
    AnimationRule, DirectorySource, MaterialPreset, MeshLeaf, MeshLoader, TransformNode,
};
use marionette_terminal::{AppConfig, FreeScene, TerminalApp};
use nalgebra::{Matrix4, Vector3};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    let path = match args.get(1) {
        Some(path) => Path::new(path).to_path_buf(),
        None => {
            eprintln!("Usage: {} <obj-file>", args[0]);
            eprintln!("\nNo OBJ file provided, using the bundled head mesh...");
            Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/head_s.obj")
        }
    };

    let directory = path.parent().unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .context("path has no file name")?;

    println!("Loading OBJ file: {}", path.display());
    let source = DirectorySource::new(directory);
    let mesh = MeshLoader::new(&source).load(name)?;
    println!("Loaded {} triangles", mesh.triangle_count());

    let spin = AnimationRule::spin(Vector3::new(0.2, 1.0, 0.0), 0.03).context("spin axis")?;
    let mut root = TransformNode::new("model", Matrix4::identity()).with_animation(spin);
    root.add_mesh(MeshLeaf::new(mesh, MaterialPreset::Silver));

    let mut app = TerminalApp::new(FreeScene { root }, AppConfig::default())?;
    app.run()?;

    Ok(())
}
