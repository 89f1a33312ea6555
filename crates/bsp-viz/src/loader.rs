//! Minimal Wavefront `.obj` loading.
//!
//! Only `v` and `f` statements are read; everything else (normals, texture
//! coordinates, groups, materials) is skipped. Faces with more than three
//! corners are fan-triangulated, and every face gets a random color.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use bsp_raster::{Model, Triangle};
use nalgebra::Point3;
use rand::Rng;
use thiserror::Error;

use crate::random_color;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read model: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: incorrectly formatted vertex")]
    Vertex { line: usize },

    #[error("line {line}: incorrectly formatted face")]
    Face { line: usize },

    #[error("line {line}: vertex index {index} is out of range")]
    IndexOutOfRange { line: usize, index: i64 },
}

/// Loads the model at `path`, named after the file stem.
pub fn load_obj<R: Rng>(path: &Path, rng: &mut R) -> Result<Model, LoadError> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    let file = File::open(path)?;
    parse_obj(BufReader::new(file), name, rng)
}

/// Parses `.obj` text into a model.
pub fn parse_obj<B: BufRead, R: Rng>(
    reader: B,
    name: impl Into<String>,
    rng: &mut R,
) -> Result<Model, LoadError> {
    let mut points = Vec::new();
    let mut triangles = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = number + 1;
        let mut fields = line.split_whitespace();

        match fields.next() {
            Some("v") => {
                let coords: Vec<f32> = fields
                    .take(3)
                    .map(str::parse)
                    .collect::<Result<_, _>>()
                    .map_err(|_| LoadError::Vertex { line: line_no })?;
                let &[x, y, z] = coords.as_slice() else {
                    return Err(LoadError::Vertex { line: line_no });
                };
                points.push(Point3::new(x, y, z));
            }
            Some("f") => {
                let corners = fields
                    .map(|field| resolve_index(field, points.len(), line_no))
                    .collect::<Result<Vec<u32>, _>>()?;
                if corners.len() < 3 {
                    return Err(LoadError::Face { line: line_no });
                }
                let color = random_color(rng);
                for pair in corners[1..].windows(2) {
                    triangles.push(Triangle::new(corners[0], pair[0], pair[1], color));
                }
            }
            _ => {}
        }
    }

    Ok(Model::new(name, points, triangles))
}

/// Turns one face corner (`7`, `7/1`, `7//3`, `-1`) into a 0-based index.
///
/// Negative indices count back from the last vertex read so far.
fn resolve_index(field: &str, len: usize, line: usize) -> Result<u32, LoadError> {
    let vertex = field.split('/').next().unwrap_or_default();
    let index: i64 = vertex.parse().map_err(|_| LoadError::Face { line })?;

    let resolved = match index {
        0 => None,
        i if i > 0 => Some(i - 1),
        i => i64::try_from(len).ok().map(|len| len + i),
    };
    resolved
        .filter(|&i| i >= 0 && (i as u64) < len as u64)
        .and_then(|i| u32::try_from(i).ok())
        .ok_or(LoadError::IndexOutOfRange { line, index })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    fn parse(text: &str) -> Result<Model, LoadError> {
        let mut rng = StdRng::seed_from_u64(1);
        parse_obj(Cursor::new(text), "test", &mut rng)
    }

    #[test]
    fn parses_vertices_and_faces() {
        let model = parse(
            "# a triangle\n\
             v 0 0 0\n\
             v 1 0 0\n\
             v 0 1 0\n\
             vn 0 0 1\n\
             f 1 2 3\n",
        )
        .unwrap();

        assert_eq!(model.name, "test");
        assert_eq!(model.points.len(), 3);
        assert_eq!(model.points[1], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(model.triangles.len(), 1);
        assert_eq!(model.triangles[0].indices(), [0, 1, 2]);
    }

    #[test]
    fn fans_polygons_and_reads_slashed_corners() {
        let model = parse(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
             f 1/1/1 2/2/1 3//1 4\n",
        )
        .unwrap();

        let indices: Vec<[u32; 3]> = model.triangles.iter().map(|t| t.indices()).collect();
        assert_eq!(indices, vec![[0, 1, 2], [0, 2, 3]]);
        // One face, one color.
        assert_eq!(model.triangles[0].color(), model.triangles[1].color());
    }

    #[test]
    fn negative_indices_are_relative() {
        let model = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(model.triangles[0].indices(), [0, 1, 2]);
    }

    #[test]
    fn reports_bad_lines() {
        assert!(matches!(
            parse("v 0 0\n"),
            Err(LoadError::Vertex { line: 1 })
        ));
        assert!(matches!(
            parse("v 0 zero 0\n"),
            Err(LoadError::Vertex { line: 1 })
        ));
        assert!(matches!(
            parse("v 0 0 0\nv 1 0 0\nf 1 2\n"),
            Err(LoadError::Face { line: 3 })
        ));
        assert!(matches!(
            parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 x\n"),
            Err(LoadError::Face { line: 4 })
        ));
        assert!(matches!(
            parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n"),
            Err(LoadError::IndexOutOfRange { line: 4, index: 4 })
        ));
        assert!(matches!(
            parse("v 0 0 0\nf 0 1 1\n"),
            Err(LoadError::IndexOutOfRange { line: 2, index: 0 })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = load_obj(Path::new("/nonexistent/model.obj"), &mut rng);
        assert!(matches!(result, Err(LoadError::Io(_))));
    }
}
