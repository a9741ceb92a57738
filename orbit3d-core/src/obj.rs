/// Wavefront OBJ loader
///
/// Only vertex positions and faces are read. N-gon faces are fan-triangulated
/// around their first vertex, with the inner diagonals marked as hidden edges.
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use nom::{
    bytes::complete::take_till,
    character::complete::{i64 as integer, space0, space1},
    multi::separated_list1,
    number::complete::float,
    sequence::preceded,
    IResult,
};
use thiserror::Error;

use crate::geometry::{Mesh, Triangle};
use crate::math::Vector3;

/// Errors raised while loading an OBJ model
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: vertex index {index} out of range ({count} vertices defined)")]
    IndexOutOfRange { line: usize, index: i64, count: usize },
}

/// Read and parse an OBJ file.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, ObjError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ObjError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = parse_obj(&text)?;
    info!("Loaded {}: {} triangles", path.display(), mesh.len());
    Ok(mesh)
}

/// Parse OBJ text into a mesh.
pub fn parse_obj(input: &str) -> Result<Mesh, ObjError> {
    let mut verts: Vec<Vector3> = Vec::new();
    let mut mesh = Mesh::new();

    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        let Some((keyword, rest)) = split_keyword(content) else {
            continue;
        };

        match keyword {
            "v" => {
                let (_, v) = parse_vertex(rest).map_err(|e| parse_error(line, "vertex", e))?;
                verts.push(v);
            }
            "f" => {
                let (_, raw_indices) =
                    parse_face(rest).map_err(|e| parse_error(line, "face", e))?;
                let indices = raw_indices
                    .into_iter()
                    .map(|index| resolve_index(index, verts.len(), line))
                    .collect::<Result<Vec<_>, _>>()?;

                if indices.len() < 3 {
                    warn!("line {line}: face with {} vertices skipped", indices.len());
                    continue;
                }
                triangulate_fan(&verts, &indices, &mut mesh);
            }
            // Normals, texture coordinates, groups and materials are not used.
            _ => {}
        }
    }

    Ok(mesh)
}

/// Fan-triangulate one polygon.
///
/// Edge 1 of every fan triangle walks the polygon rim. Edge 0 is only the rim on
/// the first triangle and edge 2 only on the last; everything else is a diagonal.
fn triangulate_fan(verts: &[Vector3], indices: &[usize], mesh: &mut Mesh) {
    let count = indices.len();
    for k in 2..count {
        let flags = [k == 2, true, k == count - 1];
        mesh.add_triangle(Triangle::with_edge_flags(
            verts[indices[0]],
            verts[indices[k - 1]],
            verts[indices[k]],
            flags,
        ));
    }
}

fn split_keyword(content: &str) -> Option<(&str, &str)> {
    if content.is_empty() {
        return None;
    }
    match content.find(char::is_whitespace) {
        Some(pos) => Some((&content[..pos], &content[pos..])),
        None => Some((content, "")),
    }
}

/// 1-based index, or negative relative to the vertices read so far.
fn resolve_index(index: i64, count: usize, line: usize) -> Result<usize, ObjError> {
    let resolved = if index > 0 {
        index - 1
    } else {
        count as i64 + index
    };
    if index == 0 || resolved < 0 || resolved >= count as i64 {
        return Err(ObjError::IndexOutOfRange { line, index, count });
    }
    Ok(resolved as usize)
}

fn parse_error(line: usize, what: &str, err: nom::Err<nom::error::Error<&str>>) -> ObjError {
    ObjError::Parse {
        line,
        message: format!("malformed {what}: {err:?}"),
    }
}

fn parse_vertex(input: &str) -> IResult<&str, Vector3> {
    let (input, x) = preceded(space0, float)(input)?;
    let (input, y) = preceded(space1, float)(input)?;
    let (input, z) = preceded(space1, float)(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

/// `i`, `i/t`, `i//n` or `i/t/n`; only the position index is kept.
fn parse_face_index(input: &str) -> IResult<&str, i64> {
    let (input, index) = integer(input)?;
    let (input, _) = take_till(|c: char| c.is_whitespace())(input)?;
    Ok((input, index))
}

fn parse_face(input: &str) -> IResult<&str, Vec<i64>> {
    preceded(space0, separated_list1(space1, parse_face_index))(input)
}
