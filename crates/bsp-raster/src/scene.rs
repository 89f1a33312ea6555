//! Scene assembly: models in local space become one shared world-space pool.

use log::{debug, warn};
use nalgebra::{Matrix4, Point3, Rotation3, Vector3};
use thiserror::Error;

use crate::bsp::{BspTree, BuildOptions, PlaneSelector};
use crate::render::{self, Camera, FrameStats, PixelSurface, RenderOptions};
use crate::{PointPool, Triangle};

/// Errors raised while generating a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// A triangle refers to a point its model does not have.
    #[error("model `{model}`: triangle {triangle} refers to point {index}, but the model has {len} points")]
    PointOutOfRange {
        model: String,
        triangle: usize,
        index: u32,
        len: usize,
    },

    /// The combined point count does not fit the `u32` index space.
    #[error("scene has {0} points, more than a u32 index can address")]
    TooManyPoints(usize),
}

/// A named triangle mesh with its own placement in the world.
///
/// Triangle indices refer to the model's own `points`.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: String,
    pub points: Vec<Point3<f32>>,
    pub triangles: Vec<Triangle>,
    pub position: Vector3<f32>,
    /// Euler angles (roll, pitch, yaw) about x, y and z, in radians.
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Model {
    /// Creates a model at the origin with unit scale and no rotation.
    pub fn new(name: impl Into<String>, points: Vec<Point3<f32>>, triangles: Vec<Triangle>) -> Self {
        Self {
            name: name.into(),
            points,
            triangles,
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: Vector3::repeat(1.0),
        }
    }

    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vector3<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vector3<f32>) -> Self {
        self.scale = scale;
        self
    }

    /// Local-to-world matrix: scale, then rotate, then translate.
    pub fn transform(&self) -> Matrix4<f32> {
        let rotation =
            Rotation3::from_euler_angles(self.rotation.x, self.rotation.y, self.rotation.z);
        Matrix4::new_translation(&self.position)
            * rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }

    /// Checks every triangle index against the model's points.
    fn validate(&self) -> Result<(), SceneError> {
        let len = self.points.len();
        for (triangle, t) in self.triangles.iter().enumerate() {
            if let Some(&index) = t.indices().iter().find(|&&i| i as usize >= len) {
                return Err(SceneError::PointOutOfRange {
                    model: self.name.clone(),
                    triangle,
                    index,
                    len,
                });
            }
        }
        Ok(())
    }
}

/// An editable list of models.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub models: Vec<Model>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, model: Model) {
        self.models.push(model);
    }

    /// Transforms every model into world space and concatenates them.
    ///
    /// Point indices are offset by the number of points of the models before
    /// them. Triangles that collapse to zero area in world space are dropped
    /// with a warning.
    pub fn generate(&self) -> Result<Geometry, SceneError> {
        let total: usize = self.models.iter().map(|m| m.points.len()).sum();
        if u32::try_from(total).is_err() {
            return Err(SceneError::TooManyPoints(total));
        }

        let mut points = PointPool::with_capacity(total);
        let mut triangles = Vec::new();
        for model in &self.models {
            model.validate()?;

            // Fits: the total was checked above.
            let offset = points.len() as u32;
            let transform = model.transform();
            for p in &model.points {
                points.push(transform.transform_point(p));
            }

            let mut dropped = 0;
            for t in &model.triangles {
                let t = t.offset(offset);
                if t.is_degenerate(&points) {
                    dropped += 1;
                } else {
                    triangles.push(t);
                }
            }
            if dropped > 0 {
                warn!("model `{}`: dropped {dropped} degenerate triangles", model.name);
            }
        }

        debug!(
            "generated scene: {} models, {} points, {} triangles",
            self.models.len(),
            points.len(),
            triangles.len()
        );
        Ok(Geometry { points, triangles })
    }
}

/// World-space points and triangles, ready to be partitioned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub points: PointPool,
    pub triangles: Vec<Triangle>,
}

impl Geometry {
    /// Builds a tree from a snapshot of the geometry.
    ///
    /// The pool is cloned so that points created by splitting stay with the
    /// returned tree and every rebuild starts from the same input.
    pub fn partition<S: PlaneSelector>(&self, selector: &S, options: &BuildOptions) -> Partitioned {
        let mut points = self.points.clone();
        let tree = BspTree::build(&mut points, self.triangles.clone(), selector, options);
        Partitioned { points, tree }
    }
}

/// A BSP tree together with the point pool its triangles index into.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partitioned {
    pub points: PointPool,
    pub tree: BspTree,
}

impl Partitioned {
    /// Renders the tree as seen from `camera`.
    pub fn render<S: PixelSurface + ?Sized>(
        &self,
        camera: &Camera,
        surface: &mut S,
        options: &RenderOptions,
    ) -> FrameStats {
        render::render(&self.tree, &self.points, camera, surface, options)
    }
}
