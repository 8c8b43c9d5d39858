/// Articulated robot figure assembled from five mesh sources
use std::collections::BTreeMap;

use nalgebra::{Matrix4, Point3, Unit, Vector3};

use crate::animation::AnimationRule;
use crate::error::Result;
use crate::loader::{AssetSource, MeshLoader};
use crate::material::MaterialPreset;
use crate::projection::RenderContext;
use crate::scene::{MeshLeaf, NodePath, Renderer, TransformNode};
use crate::transform::Transform;

/// Names of the mesh sources a robot is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotAssets {
    pub body: String,
    pub head: String,
    /// Shared by both arms and both legs
    pub limb: String,
    pub eyeball: String,
    pub antenna: String,
}

impl Default for RobotAssets {
    fn default() -> Self {
        Self {
            body: "body_s.obj".to_string(),
            head: "head_s.obj".to_string(),
            limb: "limb_s.obj".to_string(),
            eyeball: "eyeball_s.obj".to_string(),
            antenna: "antenna_s.obj".to_string(),
        }
    }
}

/// Animation parameters, angles in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub limb_amplitude: f32,
    pub head_amplitude: f32,
    /// Phase advanced per update
    pub rate: f32,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            limb_amplitude: 30f32.to_radians(),
            head_amplitude: 20f32.to_radians(),
            rate: 0.05,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RobotConfig {
    pub assets: RobotAssets,
    pub motion: Motion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Part {
    Root,
    Head,
    Body,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
    LeftEye,
    RightEye,
    LeftAntenna,
    RightAntenna,
}

impl Part {
    pub const ALL: [Part; 11] = [
        Part::Root,
        Part::Head,
        Part::Body,
        Part::LeftArm,
        Part::RightArm,
        Part::LeftLeg,
        Part::RightLeg,
        Part::LeftEye,
        Part::RightEye,
        Part::LeftAntenna,
        Part::RightAntenna,
    ];

    /// Parts advanced by [`Robot::update`]
    pub const ANIMATED: [Part; 5] = [
        Part::Head,
        Part::LeftArm,
        Part::RightArm,
        Part::LeftLeg,
        Part::RightLeg,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Part::Root => "robot",
            Part::Head => "head",
            Part::Body => "body",
            Part::LeftArm => "left_arm",
            Part::RightArm => "right_arm",
            Part::LeftLeg => "left_leg",
            Part::RightLeg => "right_leg",
            Part::LeftEye => "left_eye",
            Part::RightEye => "right_eye",
            Part::LeftAntenna => "left_antenna",
            Part::RightAntenna => "right_antenna",
        }
    }
}

/// Robot figure: head with eyes and antennae, body, two arms and two legs.
///
/// The tree shape is fixed at construction. `placement` positions the whole
/// figure in world space and cannot be changed afterwards.
#[derive(Debug, Clone)]
pub struct Robot {
    root: TransformNode,
    parts: BTreeMap<Part, NodePath>,
    placement: Matrix4<f32>,
}

impl Robot {
    /// Build a robot with the default asset names and motion
    pub fn new<S: AssetSource + ?Sized>(source: &S, placement: Matrix4<f32>) -> Result<Self> {
        Self::with_config(source, &RobotConfig::default(), placement)
    }

    /// Build a robot, failing if any mesh fails to load
    pub fn with_config<S: AssetSource + ?Sized>(
        source: &S,
        config: &RobotConfig,
        placement: Matrix4<f32>,
    ) -> Result<Self> {
        let loader = MeshLoader::new(source);
        let assets = &config.assets;
        let motion = config.motion;
        let ruby = MaterialPreset::Ruby;
        let pearl = MaterialPreset::Pearl;

        let limb_scale = Vector3::repeat(1.5);
        let tilt = 15f32.to_radians();
        let forward = Vector3::z_axis();
        let backward = Unit::new_normalize(-Vector3::z());
        let shoulder = Point3::new(0.0, 0.5, 0.0);

        let limb = |name: Part, offset: Vector3<f32>, rotation: Option<(Unit<Vector3<f32>>, f32)>, swing: Vector3<f32>| {
            let mut node = TransformNode::new(name.name(), Transform::trs(offset, rotation, limb_scale));
            if let Some(rule) = AnimationRule::swing(swing, shoulder, motion.limb_amplitude, motion.rate) {
                node = node.with_animation(rule);
            }
            node.add_mesh(MeshLeaf::new(loader.load(&assets.limb)?, ruby));
            Ok::<_, crate::error::Error>(node)
        };

        // The head sways about y in place
        let mut head = TransformNode::new(Part::Head.name(), Matrix4::identity());
        if let Some(rule) = AnimationRule::swing(Vector3::y(), Point3::origin(), motion.head_amplitude, motion.rate) {
            head = head.with_animation(rule);
        }

        for (part, x) in [(Part::LeftEye, -0.2), (Part::RightEye, 0.2)] {
            let mut eye = TransformNode::new(
                part.name(),
                Transform::trs(Vector3::new(x, 0.5, 0.8), None, Vector3::repeat(1.5)),
            );
            eye.add_mesh(MeshLeaf::new(loader.load(&assets.eyeball)?, pearl));
            head.add_child(eye);
        }

        for (part, x, axis) in [
            (Part::LeftAntenna, -0.5, forward),
            (Part::RightAntenna, 0.5, backward),
        ] {
            let mut antenna = TransformNode::new(
                part.name(),
                Transform::trs(Vector3::new(x, 0.5, 0.0), Some((axis, tilt)), Vector3::repeat(0.5)),
            );
            antenna.add_mesh(MeshLeaf::new(loader.load(&assets.antenna)?, ruby));
            head.add_child(antenna);
        }
        head.add_mesh(MeshLeaf::new(loader.load(&assets.head)?, ruby));

        let mut body = TransformNode::new(Part::Body.name(), Transform::translation_matrix(0.0, -1.0, 0.0));
        body.add_mesh(MeshLeaf::new(loader.load(&assets.body)?, ruby));

        // Opposite swing axes keep each pair out of phase
        let left_arm = limb(Part::LeftArm, Vector3::new(-1.3, -0.9, 0.0), Some((backward, tilt)), Vector3::x())?;
        let right_arm = limb(Part::RightArm, Vector3::new(1.3, -0.9, 0.0), Some((forward, tilt)), -Vector3::x())?;
        let left_leg = limb(Part::LeftLeg, Vector3::new(-0.6, -2.5, 0.0), None, -Vector3::x())?;
        let right_leg = limb(Part::RightLeg, Vector3::new(0.6, -2.5, 0.0), None, Vector3::x())?;

        let mut root = TransformNode::new(Part::Root.name(), Matrix4::identity());
        root.add_child(head);
        root.add_child(body);
        root.add_child(left_arm);
        root.add_child(right_arm);
        root.add_child(left_leg);
        root.add_child(right_leg);

        let parts = Part::ALL
            .iter()
            .filter_map(|&part| Some((part, root.find(part.name())?)))
            .collect();

        log::info!(
            "assembled robot: {} nodes, {} meshes",
            root.node_count(),
            root.mesh_count()
        );

        Ok(Self {
            root,
            parts,
            placement,
        })
    }

    /// Advance head, arms and legs by one step
    pub fn update(&mut self) {
        for part in Part::ANIMATED {
            if let Some(node) = self.parts.get(&part).and_then(|path| self.root.node_mut(path)) {
                node.update();
            }
        }
    }

    pub fn draw<R: Renderer + ?Sized>(&self, context: &RenderContext, renderer: &mut R) {
        self.root.draw(&self.placement, context, renderer);
    }

    pub fn part(&self, part: Part) -> Option<&TransformNode> {
        self.root.node(self.parts.get(&part)?)
    }

    pub fn root(&self) -> &TransformNode {
        &self.root
    }

    pub fn placement(&self) -> &Matrix4<f32> {
        &self.placement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::loader::MemorySource;
    use crate::scene::DrawCall;

    const CUBE: &str = "\
v -1 -1 -1
v 1 -1 -1
v 1 1 -1
v -1 1 -1
v -1 -1 1
v 1 -1 1
v 1 1 1
v -1 1 1
vn -1 -1 -1
vn 1 -1 -1
vn 1 1 -1
vn -1 1 -1
vn -1 -1 1
vn 1 -1 1
vn 1 1 1
vn -1 1 1
f 1 3 2
f 1 4 3
f 5 6 7
f 5 7 8
f 1 2 6
f 1 6 5
f 4 7 3
f 4 8 7
f 2 3 7
f 2 7 6
f 1 5 8
f 1 8 4
";

    fn assets() -> MemorySource {
        let names = RobotAssets::default();
        MemorySource::new()
            .with(names.body, CUBE)
            .with(names.head, CUBE)
            .with(names.limb, CUBE)
            .with(names.eyeball, CUBE)
            .with(names.antenna, CUBE)
    }

    fn phases(robot: &Robot) -> Vec<(Part, f32)> {
        Part::ALL
            .iter()
            .map(|&part| (part, robot.part(part).unwrap().phase()))
            .collect()
    }

    #[test]
    fn test_robot_shape() {
        let robot = Robot::new(&assets(), Matrix4::identity()).unwrap();
        assert_eq!(robot.root().node_count(), 11);
        assert_eq!(robot.root().mesh_count(), 10);
        for part in Part::ALL {
            assert_eq!(robot.part(part).unwrap().name(), part.name());
        }
        // Eyes and antennae hang off the head
        let head = robot.part(Part::Head).unwrap();
        assert_eq!(head.node_count(), 5);
        assert_eq!(head.mesh_count(), 5);
    }

    #[test]
    fn test_update_touches_only_animated_parts() {
        let mut robot = Robot::new(&assets(), Matrix4::identity()).unwrap();
        robot.update();
        robot.update();

        let rate = Motion::default().rate;
        for (part, phase) in phases(&robot) {
            if Part::ANIMATED.contains(&part) {
                assert!((phase - 2.0 * rate).abs() < 1e-6, "{:?}", part);
            } else {
                assert_eq!(phase, 0.0, "{:?}", part);
            }
        }
    }

    #[test]
    fn test_head_has_no_offset() {
        let mut robot = Robot::new(&assets(), Matrix4::identity()).unwrap();
        let head = robot.part(Part::Head).unwrap();
        assert!((head.local_transform() - Matrix4::identity()).norm() < 1e-6);

        // Swaying about y through the origin keeps the head's origin fixed
        for _ in 0..10 {
            robot.update();
        }
        let head = robot.part(Part::Head).unwrap();
        let origin = head.local_transform().transform_point(&Point3::origin());
        assert!((origin - Point3::origin()).norm() < 1e-6);
        assert!((head.local_transform() - Matrix4::identity()).norm() > 1e-3);
    }

    #[test]
    fn test_draw_applies_placement() {
        let placement = Transform::translation_matrix(10.0, 0.0, 0.0);
        let robot = Robot::new(&assets(), placement).unwrap();

        let mut worlds = Vec::new();
        let mut renderer = |call: DrawCall<'_>| worlds.push(*call.world);
        robot.draw(&RenderContext::default(), &mut renderer);

        assert_eq!(worlds.len(), 10);
        // The body sits one unit below the placement origin
        let body = Transform::translation_matrix(10.0, -1.0, 0.0);
        assert!(worlds.iter().any(|world| (world - body).norm() < 1e-6));
    }

    #[test]
    fn test_limbs_swing_in_opposite_directions() {
        let mut robot = Robot::new(&assets(), Matrix4::identity()).unwrap();
        for _ in 0..10 {
            robot.update();
        }
        let angle = |part: Part| {
            let node = robot.part(part).unwrap();
            match node.animation().unwrap() {
                AnimationRule::Swing { axis, .. } => axis.x * node.animation().unwrap().angle(node.phase()),
                AnimationRule::Spin { .. } => unreachable!(),
            }
        };
        assert!((angle(Part::LeftArm) + angle(Part::RightArm)).abs() < 1e-6);
        assert!((angle(Part::LeftArm) + angle(Part::LeftLeg)).abs() < 1e-6);
    }

    #[test]
    fn test_missing_asset_aborts_construction() {
        let mut source = assets();
        source.insert(RobotAssets::default().antenna, "v 1 1 1\nvn 0 1 0\n");
        let result = Robot::new(&source, Matrix4::identity());
        assert!(matches!(result, Err(Error::Parse { ref name, .. }) if name == "antenna_s.obj"));

        let empty = MemorySource::new();
        assert!(matches!(Robot::new(&empty, Matrix4::identity()), Err(Error::Io { .. })));
    }

    #[test]
    fn test_custom_asset_names() {
        let config = RobotConfig {
            assets: RobotAssets {
                body: "cube.obj".to_string(),
                head: "cube.obj".to_string(),
                limb: "cube.obj".to_string(),
                eyeball: "cube.obj".to_string(),
                antenna: "cube.obj".to_string(),
            },
            motion: Motion::default(),
        };
        let source = MemorySource::new().with("cube.obj", CUBE);
        let robot = Robot::with_config(&source, &config, Matrix4::identity()).unwrap();
        assert_eq!(robot.root().mesh_count(), 10);
    }
}
