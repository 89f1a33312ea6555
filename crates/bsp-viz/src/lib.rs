//! Shared pieces of the BSP viewer: demo geometry, camera control and
//! presenting the software framebuffer in a macroquad window.

use bsp_raster::{Camera, Color, Framebuffer, Model, PixelFormat, Scene, Triangle};
use macroquad::prelude::{
    draw_texture, get_frame_time, is_key_down, is_mouse_button_down, mouse_delta_position,
    FilterMode, Image, KeyCode, MouseButton, Texture2D, WHITE,
};
use nalgebra::{Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

pub mod loader;
pub mod navigator;
pub use navigator::TreeNavigator;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("expected six hex digits like #14141e, got {0:?}")]
    Format(String),
}

/// Parses `#rrggbb` (the `#` is optional) into a color.
pub fn parse_hex_color(text: &str) -> Result<Color, ColorParseError> {
    let digits = text.strip_prefix('#').unwrap_or(text);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorParseError::Format(text.to_owned()));
    }
    let channel = |at: usize| {
        u8::from_str_radix(&digits[at..at + 2], 16)
            .map(|c| f32::from(c) / 255.0)
            .map_err(|_| ColorParseError::Format(text.to_owned()))
    };
    Ok(Color::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Picks a random color that is not too dark to see on the background.
pub fn random_color<R: Rng>(rng: &mut R) -> Color {
    Color::new(
        rng.random_range(0.15..=1.0),
        rng.random_range(0.15..=1.0),
        rng.random_range(0.15..=1.0),
    )
}

/// Builds a cube of edge length `size` centered on the model origin.
///
/// Each face is two triangles wound counter-clockwise when seen from
/// outside, sharing one random color.
pub fn cube_model<R: Rng>(name: &str, size: f32, rng: &mut R) -> Model {
    let half = size / 2.0;

    // 8 corners of the cube
    let points = vec![
        Point3::new(-half, -half, -half), // 0: left-bottom-back
        Point3::new(half, -half, -half),  // 1: right-bottom-back
        Point3::new(half, half, -half),   // 2: right-top-back
        Point3::new(-half, half, -half),  // 3: left-top-back
        Point3::new(-half, -half, half),  // 4: left-bottom-front
        Point3::new(half, -half, half),   // 5: right-bottom-front
        Point3::new(half, half, half),    // 6: right-top-front
        Point3::new(-half, half, half),   // 7: left-top-front
    ];

    // 6 faces with counter-clockwise winding (viewed from outside)
    let faces: [[u32; 4]; 6] = [
        [4, 5, 6, 7], // front (+Z)
        [1, 0, 3, 2], // back (-Z)
        [0, 4, 7, 3], // left (-X)
        [5, 1, 2, 6], // right (+X)
        [7, 6, 2, 3], // top (+Y)
        [0, 1, 5, 4], // bottom (-Y)
    ];

    let triangles = faces
        .iter()
        .flat_map(|&[a, b, c, d]| {
            let color = random_color(rng);
            [Triangle::new(a, b, c, color), Triangle::new(a, c, d, color)]
        })
        .collect();

    Model::new(name, points, triangles)
}

/// A square floor of edge length `size` facing up.
pub fn floor_model(size: f32, color: Color) -> Model {
    let half = size / 2.0;
    Model::new(
        "floor",
        vec![
            Point3::new(-half, 0.0, -half),
            Point3::new(half, 0.0, -half),
            Point3::new(half, 0.0, half),
            Point3::new(-half, 0.0, half),
        ],
        vec![
            Triangle::new(0, 3, 2, color),
            Triangle::new(0, 2, 1, color),
        ],
    )
}

/// The demo scene: a tilted cube, an axis-aligned cube, `extra` randomly
/// placed cubes and a floor underneath.
pub fn demo_scene(seed: u64, extra: usize) -> Scene {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut scene = Scene::new();

    scene.push(
        cube_model("tilted cube", 0.8, &mut rng)
            .with_position(Vector3::new(-1.0, 0.0, 0.0))
            .with_rotation(Vector3::new(0.3, 0.4, 0.25)),
    );
    scene.push(cube_model("cube", 0.8, &mut rng).with_position(Vector3::new(1.0, 0.0, 0.0)));

    for i in 0..extra {
        let position = Vector3::new(
            rng.random_range(-3.0..3.0),
            rng.random_range(-0.5..1.5),
            rng.random_range(-3.0..3.0),
        );
        let rotation = Vector3::new(
            rng.random_range(0.0..std::f32::consts::TAU),
            rng.random_range(0.0..std::f32::consts::TAU),
            rng.random_range(0.0..std::f32::consts::TAU),
        );
        let size = rng.random_range(0.3..0.9);
        scene.push(
            cube_model(&format!("cube {}", i + 2), size, &mut rng)
                .with_position(position)
                .with_rotation(rotation),
        );
    }

    scene.push(
        floor_model(8.0, Color::new(0.35, 0.35, 0.4)).with_position(Vector3::new(0.0, -1.0, 0.0)),
    );
    scene
}

/// First-person camera driven by mouse and keyboard.
pub struct FlyCamera {
    pub camera: Camera,
    /// Units per second
    pub move_speed: f32,
    /// Radians per unit of normalized mouse movement
    pub look_speed: f32,
}

impl FlyCamera {
    /// Creates a camera at `position` looking down `-z`.
    pub fn new(position: Point3<f32>) -> Self {
        Self {
            camera: Camera::new(position),
            move_speed: 3.0,
            look_speed: 2.0,
        }
    }

    pub fn with_move_speed(mut self, move_speed: f32) -> Self {
        self.move_speed = move_speed;
        self
    }

    /// Updates camera state from user input (mouse drag, WASD, arrow keys).
    pub fn update(&mut self) {
        // Mouse drag to look around
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.camera.yaw -= delta.x * self.look_speed;
            self.camera.pitch += delta.y * self.look_speed;
        }

        // Arrow keys for rotation
        if is_key_down(KeyCode::Left) {
            self.camera.yaw -= 0.02;
        }
        if is_key_down(KeyCode::Right) {
            self.camera.yaw += 0.02;
        }
        if is_key_down(KeyCode::Up) {
            self.camera.pitch -= 0.02;
        }
        if is_key_down(KeyCode::Down) {
            self.camera.pitch += 0.02;
        }

        // Clamp pitch to avoid flipping over
        self.camera.pitch = self.camera.pitch.clamp(-1.5, 1.5);

        let forward = self.camera.forward();
        let right = self.camera.right();
        let mut step = Vector3::zeros();
        if is_key_down(KeyCode::W) {
            step += forward;
        }
        if is_key_down(KeyCode::S) {
            step -= forward;
        }
        if is_key_down(KeyCode::D) {
            step += right;
        }
        if is_key_down(KeyCode::A) {
            step -= right;
        }
        if is_key_down(KeyCode::Space) {
            step += Vector3::y();
        }
        if is_key_down(KeyCode::LeftShift) {
            step -= Vector3::y();
        }
        if step.norm_squared() > 0.0 {
            self.camera.position += step.normalize() * self.move_speed * get_frame_time();
        }
    }

    /// Returns the eye point for BSP traversal.
    pub fn eye_point(&self) -> Point3<f32> {
        self.camera.position
    }
}

/// A framebuffer plus the texture it is shown through.
pub struct Screen {
    framebuffer: Framebuffer,
    image: Image,
    texture: Texture2D,
}

impl Screen {
    /// Creates a `width` x `height` screen; both must fit in a `u16`.
    pub fn new(width: u16, height: u16) -> Self {
        let framebuffer = Framebuffer::new(width.into(), height.into(), PixelFormat::Abgr8888);
        let (image, texture) = upload(&framebuffer, width, height);
        Self {
            framebuffer,
            image,
            texture,
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.image.width, self.image.height)
    }

    /// Resizes the framebuffer in place and replaces the texture behind it.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.framebuffer.resize(width.into(), height.into());
        (self.image, self.texture) = upload(&self.framebuffer, width, height);
    }

    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }

    /// Uploads the framebuffer and draws it at the window's top-left corner.
    pub fn present(&mut self) {
        self.image.bytes = self.framebuffer.to_rgba8();
        self.texture.update(&self.image);
        draw_texture(&self.texture, 0.0, 0.0, WHITE);
    }
}

fn upload(framebuffer: &Framebuffer, width: u16, height: u16) -> (Image, Texture2D) {
    let image = Image {
        bytes: framebuffer.to_rgba8(),
        width,
        height,
    };
    let texture = Texture2D::from_image(&image);
    texture.set_filter(FilterMode::Nearest);
    (image, texture)
}
