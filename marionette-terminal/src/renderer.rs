/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Vector3};
use std::io::Write;
use marionette_core::{DrawCall, Renderer, ShadingModel, Triangle};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Light used when every light in the rig is switched off
const HEADLIGHT: Vector3<f32> = Vector3::new(0.0, 0.0, 1.0);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    color: Color,
}

const BLANK: Cell = Cell {
    character: ' ',
    color: Color::Reset,
};

/// ASCII renderer that converts draw calls to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
    triangles_drawn: usize,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![BLANK; size],
            triangles_drawn: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(BLANK);
        self.triangles_drawn = 0;
    }

    /// Triangles rasterized since the last clear
    pub fn triangles_drawn(&self) -> usize {
        self.triangles_drawn
    }

    /// Number of non-blank cells
    pub fn coverage(&self) -> usize {
        self.cells.iter().filter(|cell| cell.character != ' ').count()
    }

    pub fn character_at(&self, x: usize, y: usize) -> Option<char> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y * self.width + x].character)
    }

    fn render_triangle(&mut self, triangle: &Triangle, call: &DrawCall<'_>) {
        let context = call.context;

        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (coords, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match context.project_to_screen(&vertex.position, call.world, self.width as u32, self.height as u32) {
                Some(projected) => *coords = projected,
                None => return, // Triangle is clipped
            }
        }

        let Some(normal) = triangle.calculate_normal() else {
            return;
        };
        let normal = world_normal(call.world, &normal);

        let brightness = match context.shading {
            ShadingModel::NormalColor => 0.35 + 0.65 * normal.dot(&HEADLIGHT).abs(),
            ShadingModel::Phong => phong_brightness(call, &normal),
        };

        // Map brightness to character
        let char_index = (brightness.clamp(0.0, 1.0) * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.min(LUMINOSITY_RAMP.len() - 1);

        let rgb = triangle.color() * 255.0;
        let cell = Cell {
            character: LUMINOSITY_RAMP[char_index],
            color: Color::Rgb {
                r: rgb.x as u8,
                g: rgb.y as u8,
                b: rgb.z as u8,
            },
        };

        self.triangles_drawn += 1;
        self.rasterize_triangle(&screen_coords, cell);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], cell: Cell) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) = barycentric(
                    (v0.0, v0.1),
                    (v1.0, v1.1),
                    (v2.0, v2.1),
                    (px, py),
                ) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.cells[idx] = cell;
                        }
                    }
                }
            }
        }
    }

    pub fn present<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in self.cells.chunks(self.width.max(1)) {
            for cell in row {
                writer.queue(SetForegroundColor(cell.color))?;
                writer.queue(Print(cell.character))?;
            }
            writer.queue(Print("\r\n"))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Renderer for AsciiRenderer {
    fn draw(&mut self, call: DrawCall<'_>) {
        for triangle in call.mesh.triangles() {
            self.render_triangle(&triangle, &call);
        }
    }
}

/// Rotate an object-space normal into world space
fn world_normal(world: &Matrix4<f32>, normal: &Vector3<f32>) -> Vector3<f32> {
    let linear = world.fixed_view::<3, 3>(0, 0).into_owned();
    let transformed = linear
        .try_inverse()
        .map(|inverse| inverse.transpose() * normal)
        .unwrap_or(*normal);
    transformed.try_normalize(f32::EPSILON).unwrap_or(*normal)
}

/// Ambient plus diffuse from the enabled lights, folded to a single intensity
fn phong_brightness(call: &DrawCall<'_>, normal: &Vector3<f32>) -> f32 {
    let lights = &call.context.lights;
    let material = call.material;

    let mut directions = Vec::with_capacity(3);
    if lights.directional.enabled {
        directions.push(-lights.directional.direction);
    }
    if lights.point.enabled {
        directions.push(lights.point.position.coords);
    }
    if lights.spot.enabled {
        directions.push(-lights.spot.direction);
    }
    if directions.is_empty() {
        directions.push(HEADLIGHT);
    }

    let diffuse: f32 = directions
        .iter()
        .filter_map(|direction| direction.try_normalize(f32::EPSILON))
        .map(|direction| normal.dot(&direction).max(0.0))
        .sum::<f32>()
        / directions.len() as f32;

    let ambient = material.ambient.mean();
    let reflect = (material.diffuse.mean() + material.specular.mean()).max(0.5);
    ambient + reflect * diffuse
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use marionette_core::{parse_obj, Camera, LightRig, MaterialPreset, MeshLeaf, TransformNode};

    const QUAD: &str = "\
v -1 -1 0
v 1 -1 0
v 1 1 0
v -1 1 0
vn 0 0 1
vn 0 0 1
vn 0 0 1
vn 0 0 1
f 1 2 3
f 1 3 4
";

    fn scene() -> TransformNode {
        let mut root = TransformNode::new("root", Matrix4::identity());
        root.add_mesh(MeshLeaf::new(parse_obj(QUAD).unwrap(), MaterialPreset::Silver));
        root
    }

    #[test]
    fn test_visible_mesh_covers_cells() {
        let mut renderer = AsciiRenderer::new(80, 40);
        let mut camera = Camera::new(80, 40);
        camera.position.z = 8.0;
        let context = camera.render_context(&LightRig::default(), ShadingModel::NormalColor);

        scene().draw(&Matrix4::identity(), &context, &mut renderer);

        assert_eq!(renderer.triangles_drawn(), 2);
        assert!(renderer.coverage() > 0);
        assert_ne!(renderer.character_at(40, 20), Some(' '));
        assert_eq!(renderer.character_at(0, 0), Some(' '));

        renderer.clear();
        assert_eq!(renderer.coverage(), 0);
    }

    #[test]
    fn test_mesh_behind_camera_is_skipped() {
        let mut renderer = AsciiRenderer::new(40, 20);
        let context = Camera::new(40, 20).render_context(&LightRig::default(), ShadingModel::Phong);
        let behind = marionette_core::Transform::translation_matrix(0.0, 0.0, 40.0);

        scene().draw(&behind, &context, &mut renderer);
        assert_eq!(renderer.triangles_drawn(), 0);
    }

    #[test]
    fn test_present_writes_every_row() {
        let renderer = AsciiRenderer::new(4, 3);
        let mut out = Vec::new();
        renderer.present(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches("\r\n").count(), 3);
    }

    #[test]
    fn test_barycentric_degenerate() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }
}
