/// Terminal front-end that animates a scene graph as ASCII art
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use marionette_core::{
    Camera, DrawCall, LightKind, LightRig, Renderer, RenderContext, Robot, ShadingModel, TransformNode,
};
use nalgebra::Matrix4;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Anything the frame loop can animate and draw
pub trait Scene {
    fn update(&mut self);
    fn draw(&self, context: &RenderContext, renderer: &mut dyn Renderer);
}

impl Scene for Robot {
    fn update(&mut self) {
        Robot::update(self);
    }

    fn draw(&self, context: &RenderContext, renderer: &mut dyn Renderer) {
        Robot::draw(self, context, renderer);
    }
}

/// A bare tree that spins its whole subtree on every update
pub struct FreeScene {
    pub root: TransformNode,
}

impl Scene for FreeScene {
    fn update(&mut self) {
        self.root.update_subtree();
    }

    fn draw(&self, context: &RenderContext, renderer: &mut dyn Renderer) {
        self.root.draw(&Matrix4::identity(), context, renderer);
    }
}

/// Frame loop settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub fps: u32,
    pub camera: Camera,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            camera: Camera::default(),
        }
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp<S: Scene> {
    scene: S,
    camera: Camera,
    lights: LightRig,
    shading: ShadingModel,
    renderer: AsciiRenderer,
    fps_target: u32,
    paused: bool,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl<S: Scene> TerminalApp<S> {
    pub fn new(scene: S, config: AppConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let mut camera = config.camera;
        camera.aspect = aspect(width, height);

        Ok(Self {
            scene,
            camera,
            lights: LightRig::default(),
            shading: ShadingModel::default(),
            renderer: AsciiRenderer::new(width as usize, height.saturating_sub(1) as usize),
            fps_target: config.fps.max(1),
            paused: false,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / self.fps_target as u64);

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            // All updates for a frame finish before it is drawn
            if !self.paused {
                self.scene.update();
            }

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        match event::read()? {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Char('a') | KeyCode::Left => self.camera.orbit(-0.1),
                KeyCode::Char('d') | KeyCode::Right => self.camera.orbit(0.1),
                KeyCode::Char('w') | KeyCode::Up => self.camera.zoom(0.9),
                KeyCode::Char('s') | KeyCode::Down => self.camera.zoom(1.1),
                KeyCode::Char(' ') => self.paused = !self.paused,
                KeyCode::Char('p') => {
                    self.shading = match self.shading {
                        ShadingModel::NormalColor => ShadingModel::Phong,
                        ShadingModel::Phong => ShadingModel::NormalColor,
                    };
                    log::debug!("shading model: {:?}", self.shading);
                }
                KeyCode::Char('1') => self.toggle_light(LightKind::Directional),
                KeyCode::Char('2') => self.toggle_light(LightKind::Point),
                KeyCode::Char('3') => self.toggle_light(LightKind::Spot),
                _ => {}
            },
            Event::Resize(width, height) => {
                self.camera.aspect = aspect(width, height);
                self.renderer
                    .resize(width as usize, height.saturating_sub(1) as usize);
            }
            _ => {}
        }
        Ok(())
    }

    fn toggle_light(&mut self, kind: LightKind) {
        let enabled = self.lights.toggle(kind);
        log::debug!("{:?} light {}", kind, if enabled { "on" } else { "off" });
    }

    fn render(&mut self) -> io::Result<()> {
        let context = self.camera.render_context(&self.lights, self.shading);

        self.renderer.clear();
        self.scene.draw(&context, &mut self.renderer);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 1))?;
        self.renderer.present(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Marionette | FPS: {:.1} | tris: {} | {:?} | A/D orbit W/S zoom P shading 1-3 lights SPACE pause Q quit",
                self.fps,
                self.renderer.triangles_drawn(),
                self.shading,
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

fn aspect(width: u16, height: u16) -> f32 {
    // Terminal cells are roughly twice as tall as they are wide
    width as f32 / (height.max(1) as f32 * 2.0)
}

/// Counts draw calls; useful for headless runs
#[derive(Debug, Default)]
pub struct DrawCounter {
    pub calls: usize,
    pub triangles: usize,
}

impl Renderer for DrawCounter {
    fn draw(&mut self, call: DrawCall<'_>) {
        self.calls += 1;
        self.triangles += call.mesh.triangle_count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marionette_core::{parse_obj, AnimationRule, MaterialPreset, MeshLeaf};
    use nalgebra::Vector3;

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nvn 0 0 1\nvn 0 0 1\nf 1 2 3";

    #[test]
    fn test_free_scene_updates_whole_tree() {
        let rule = AnimationRule::spin(Vector3::y(), 0.1).unwrap();
        let mut child = TransformNode::new("child", Matrix4::identity()).with_animation(rule);
        child.add_mesh(MeshLeaf::new(parse_obj(TRIANGLE).unwrap(), MaterialPreset::Pearl));
        let mut root = TransformNode::new("root", Matrix4::identity()).with_animation(rule);
        root.add_child(child);

        let mut scene = FreeScene { root };
        scene.update();
        assert!((scene.root.node(&[0]).unwrap().phase() - 0.1).abs() < 1e-6);

        let mut counter = DrawCounter::default();
        scene.draw(&RenderContext::default(), &mut counter);
        assert_eq!(counter.calls, 1);
        assert_eq!(counter.triangles, 1);
    }

    #[test]
    fn test_bundled_assets_build_robot() {
        let source = marionette_core::DirectorySource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"));
        let mut robot = Robot::new(&source, Matrix4::identity()).unwrap();
        Scene::update(&mut robot);

        let mut counter = DrawCounter::default();
        Scene::draw(&robot, &RenderContext::default(), &mut counter);
        assert_eq!(counter.calls, 10);
        // Eight boxes of 12 triangles, two octahedra of 8
        assert_eq!(counter.triangles, 8 * 12 + 2 * 8);
    }

    #[test]
    fn test_robot_renders_in_view() {
        let source = marionette_core::DirectorySource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"));
        let robot = Robot::new(&source, Matrix4::identity()).unwrap();

        let mut renderer = AsciiRenderer::new(120, 40);
        let mut camera = Camera::new(120, 40);
        camera.aspect = aspect(120, 40);
        robot.draw(&camera.render_context(&LightRig::default(), ShadingModel::Phong), &mut renderer);

        assert!(renderer.triangles_drawn() > 0);
        assert!(renderer.coverage() > 0);
    }
}
