/// Surface material constants handed unchanged to the renderer
use nalgebra::Vector3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub shininess: f32,
}

/// Named material presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaterialPreset {
    /// Dark red with a strong specular highlight and no diffuse term
    #[default]
    Ruby,
    /// Bright matte pearl without specular
    Pearl,
    Silver,
    /// Emits nothing; only visible against a lit background
    Black,
}

impl MaterialPreset {
    pub fn material(self) -> Material {
        match self {
            Self::Ruby => Material {
                ambient: Vector3::new(0.1745, 0.01175, 0.01175),
                diffuse: Vector3::zeros(),
                specular: Vector3::new(0.727811, 0.626959, 0.626959),
                shininess: 1.0,
            },
            Self::Pearl => Material {
                ambient: Vector3::new(0.25, 0.20725, 0.20725),
                diffuse: Vector3::new(1.0, 0.829, 0.829),
                specular: Vector3::zeros(),
                shininess: 0.0,
            },
            Self::Silver => Material {
                ambient: Vector3::repeat(0.19225),
                diffuse: Vector3::repeat(0.50754),
                specular: Vector3::repeat(0.508273),
                shininess: 0.4,
            },
            Self::Black => Material {
                ambient: Vector3::zeros(),
                diffuse: Vector3::zeros(),
                specular: Vector3::zeros(),
                shininess: 0.0,
            },
        }
    }
}

impl From<MaterialPreset> for Material {
    fn from(preset: MaterialPreset) -> Self {
        preset.material()
    }
}

impl Default for Material {
    fn default() -> Self {
        MaterialPreset::default().material()
    }
}
