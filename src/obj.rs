//! Reading and writing the indexed OBJ subset used for mesh assets.
//!
//! Written documents are laid out as a `v` block, a `vt` block, a `vn` block and
//! then one `f` line per triangle. Every face corner repeats the same 1-based index
//! in all three slots, since the attribute arrays are parallel. Coordinates use
//! six decimals, like C's `%f`.
//!
//! The reader also accepts documents whose corners mix indices (`f 1/4/2 ...`),
//! producing one vertex per distinct position/texture/normal combination.

use std::collections::HashMap;
use std::io::{BufRead, Write};
use glam::{Vec2, Vec3};
use crate::error::{Error, Result};
use crate::mesh::MeshData;

pub fn write_obj<W: Write>(mesh: &MeshData, writer: &mut W) -> Result<()> {
    for p in &mesh.positions {
        writeln!(writer, "v {:.6} {:.6} {:.6}", p.x, p.y, p.z)?;
    }

    for uv in &mesh.tex_coords {
        writeln!(writer, "vt {:.6} {:.6}", uv.x, uv.y)?;
    }

    for n in &mesh.normals {
        writeln!(writer, "vn {:.6} {:.6} {:.6}", n.x, n.y, n.z)?;
    }

    // OBJ is 1-based
    for [i0, i1, i2] in mesh.triangles() {
        writeln!(
            writer,
            "f {0}/{0}/{0} {1}/{1}/{1} {2}/{2}/{2}",
            i0 + 1,
            i1 + 1,
            i2 + 1
        )?;
    }

    Ok(())
}

/// 0-based position, texture and normal index of one face corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Corner {
    position: u32,
    tex_coord: Option<u32>,
    normal: Option<u32>,
}

impl Corner {
    /// True when the texture and normal slots are absent or point at the position's own index.
    fn is_parallel(&self) -> bool {
        self.tex_coord.is_none_or(|t| t == self.position)
            && self.normal.is_none_or(|n| n == self.position)
    }
}

pub fn read_obj<R: BufRead>(reader: R) -> Result<MeshData> {
    let mut positions = Vec::new();
    let mut tex_coords = Vec::new();
    let mut normals = Vec::new();
    let mut faces: Vec<(usize, [Corner; 3])> = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let [x, y, z] = parse_floats::<3>(&mut tokens, line_no)?;
                positions.push(Vec3::new(x, y, z));
            }
            Some("vt") => {
                let [s, t] = parse_floats::<2>(&mut tokens, line_no)?;
                tex_coords.push(Vec2::new(s, t));
            }
            Some("vn") => {
                let [x, y, z] = parse_floats::<3>(&mut tokens, line_no)?;
                normals.push(Vec3::new(x, y, z));
            }
            Some("f") => {
                let corners: Vec<&str> = tokens.collect();
                if corners.len() != 3 {
                    return Err(Error::Parse {
                        line: line_no,
                        message: format!("expected a triangle, found {} corners", corners.len()),
                    });
                }
                let mut triangle = [Corner { position: 0, tex_coord: None, normal: None }; 3];
                for (slot, corner) in triangle.iter_mut().zip(&corners) {
                    *slot = parse_corner(corner, line_no)?;
                }
                faces.push((line_no, triangle));
            }
            // Comments, object/group names, materials and smoothing groups carry nothing we keep
            _ => {}
        }
    }

    for (line_no, triangle) in &faces {
        for corner in triangle {
            check_index("position", Some(corner.position), positions.len(), *line_no)?;
            check_index("texture", corner.tex_coord, tex_coords.len(), *line_no)?;
            check_index("normal", corner.normal, normals.len(), *line_no)?;
        }
    }

    if faces.iter().all(|(_, t)| t.iter().all(Corner::is_parallel)) {
        // Attribute arrays already line up with positions; keep the vertex order as written
        let vertex_count = positions.len();
        tex_coords.resize(vertex_count, Vec2::ZERO);
        normals.resize(vertex_count, Vec3::ZERO);
        let indices = faces
            .iter()
            .flat_map(|(_, t)| t.iter().map(|c| c.position))
            .collect();

        return Ok(MeshData {
            positions,
            normals,
            tex_coords,
            indices,
        });
    }

    let mut mesh = MeshData::new();
    let mut vertices: HashMap<Corner, u32> = HashMap::new();
    for (_, triangle) in &faces {
        let mut indices = [0u32; 3];
        for (index, corner) in indices.iter_mut().zip(triangle) {
            *index = *vertices.entry(*corner).or_insert_with(|| {
                mesh.push_vertex(
                    positions[corner.position as usize],
                    corner.normal.map_or(Vec3::ZERO, |n| normals[n as usize]),
                    corner.tex_coord.map_or(Vec2::ZERO, |t| tex_coords[t as usize]),
                )
            });
        }
        mesh.push_triangle(indices[0], indices[1], indices[2]);
    }

    Ok(mesh)
}

fn check_index(kind: &str, index: Option<u32>, len: usize, line: usize) -> Result<()> {
    match index {
        Some(index) if index as usize >= len => Err(Error::Parse {
            line,
            message: format!("{} index {} out of range for {} entries", kind, index + 1, len),
        }),
        _ => Ok(()),
    }
}

fn parse_floats<'a, const N: usize>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<[f32; N]> {
    let mut values = [0.0f32; N];
    for value in values.iter_mut() {
        let token = tokens.next().ok_or_else(|| Error::Parse {
            line,
            message: format!("expected {} components", N),
        })?;
        *value = token.parse().map_err(|_| Error::Parse {
            line,
            message: format!("invalid number '{}'", token),
        })?;
    }
    Ok(values)
}

/// Parses a face corner written as `p`, `p/t`, `p//n` or `p/t/n`.
fn parse_corner(corner: &str, line: usize) -> Result<Corner> {
    let mut slots = corner.split('/');
    let position = parse_slot(slots.next(), corner, line)?.ok_or_else(|| Error::Parse {
        line,
        message: format!("face corner '{}' has no position", corner),
    })?;
    let tex_coord = parse_slot(slots.next(), corner, line)?;
    let normal = parse_slot(slots.next(), corner, line)?;

    Ok(Corner {
        position,
        tex_coord,
        normal,
    })
}

/// Empty or missing slots are `None`; present ones are converted to 0-based.
fn parse_slot(slot: Option<&str>, corner: &str, line: usize) -> Result<Option<u32>> {
    let Some(slot) = slot.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let index: u32 = slot.parse().map_err(|_| Error::Parse {
        line,
        message: format!("invalid face index '{}'", corner),
    })?;
    index.checked_sub(1).map(Some).ok_or_else(|| Error::Parse {
        line,
        message: "face indices are 1-based".to_string(),
    })
}
