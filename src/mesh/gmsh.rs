//! Gmsh mesh file I/O.
//!
//! Supports reading and writing Gmsh MSH format version 2.2 (ASCII) for
//! surface meshes embedded in 3-D.
//!
//! ## Supported Element Types
//! - 2 = Triangle (3-node)
//! - 3 = Quadrilateral (4-node)
//!
//! Other element types (points, lines, volumes) are skipped. Node ids may be
//! arbitrary positive integers; they are renumbered to 0-based vertex
//! indices in file order.
//!
//! ## Example
//! ```no_run
//! use gllmeta_rs::mesh::gmsh::read_gmsh_mesh;
//! use std::path::Path;
//!
//! let mesh = read_gmsh_mesh(Path::new("cube_sphere.msh")).expect("Failed to read mesh");
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use super::error::MeshError;
use super::sphere_mesh::SphereMesh;

/// Gmsh element types we keep as faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GmshElementType {
    Triangle = 2,
    Quadrilateral = 3,
}

impl GmshElementType {
    fn from_code(code: i32) -> Option<Self> {
        match code {
            2 => Some(GmshElementType::Triangle),
            3 => Some(GmshElementType::Quadrilateral),
            _ => None,
        }
    }

    fn n_nodes(self) -> usize {
        match self {
            GmshElementType::Triangle => 3,
            GmshElementType::Quadrilateral => 4,
        }
    }
}

/// Read a Gmsh MSH file (format 2.2).
///
/// # Returns
/// * `Ok(SphereMesh)` - The parsed mesh with face areas computed
/// * `Err(MeshError)` - If reading or parsing fails
pub fn read_gmsh_mesh(path: &Path) -> Result<SphereMesh, MeshError> {
    let file = File::open(path)?;
    parse_gmsh(BufReader::new(file))
}

/// Parse MSH 2.2 content from any buffered reader.
pub fn parse_gmsh<R: BufRead>(reader: R) -> Result<SphereMesh, MeshError> {
    let mut lines = reader.lines();
    let mut nodes: Option<(Vec<[f64; 3]>, HashMap<usize, usize>)> = None;
    let mut elements: Vec<Vec<usize>> = Vec::new();

    while let Some(line_result) = lines.next() {
        let line = line_result?;
        let line = line.trim();

        if line.starts_with("$MeshFormat") {
            parse_mesh_format(&mut lines)?;
        } else if line.starts_with("$Nodes") {
            nodes = Some(parse_nodes(&mut lines)?);
        } else if line.starts_with("$Elements") {
            elements = parse_elements(&mut lines)?;
        }
    }

    let (vertices, id_to_index) =
        nodes.ok_or_else(|| MeshError::MissingSection("Nodes".to_string()))?;
    if elements.is_empty() {
        return Err(MeshError::MissingSection(
            "Elements (triangles or quadrilaterals)".to_string(),
        ));
    }

    let faces = elements
        .into_iter()
        .enumerate()
        .map(|(k, ids)| {
            ids.iter()
                .map(|id| {
                    id_to_index.get(id).copied().ok_or_else(|| {
                        MeshError::invalid_face(k, format!("unknown node id {id}"))
                    })
                })
                .collect::<Result<Vec<usize>, MeshError>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    SphereMesh::new(vertices, faces)
}

/// Parse the $MeshFormat section.
fn parse_mesh_format<I>(lines: &mut I) -> Result<(), MeshError>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    if let Some(line_result) = lines.next() {
        let line = line_result?;
        let version = line
            .split_whitespace()
            .next()
            .ok_or_else(|| MeshError::Parse("Empty MeshFormat line".to_string()))?;

        if !version.starts_with("2.") {
            return Err(MeshError::UnsupportedVersion(version.to_string()));
        }

        skip_to(lines, "$EndMeshFormat")?;
    }
    Ok(())
}

/// Parse the $Nodes section into coordinates and an id → index map.
fn parse_nodes<I>(lines: &mut I) -> Result<(Vec<[f64; 3]>, HashMap<usize, usize>), MeshError>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    let n_nodes = parse_count(lines, "node")?;
    let mut vertices = Vec::with_capacity(n_nodes);
    let mut id_to_index = HashMap::with_capacity(n_nodes);

    for _ in 0..n_nodes {
        let line = lines
            .next()
            .ok_or_else(|| MeshError::Parse("Unexpected end of $Nodes".to_string()))??;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(MeshError::Parse(format!("Invalid node line: {}", line)));
        }

        // Format: node_id x y z
        let id: usize = parse_field(parts[0], "node id")?;
        let x: f64 = parse_field(parts[1], "x coordinate")?;
        let y: f64 = parse_field(parts[2], "y coordinate")?;
        let z: f64 = parse_field(parts[3], "z coordinate")?;

        if id_to_index.insert(id, vertices.len()).is_some() {
            return Err(MeshError::Parse(format!("Duplicate node id {id}")));
        }
        vertices.push([x, y, z]);
    }

    skip_to(lines, "$EndNodes")?;
    Ok((vertices, id_to_index))
}

/// Parse the $Elements section, keeping triangles and quadrilaterals as
/// lists of node ids.
fn parse_elements<I>(lines: &mut I) -> Result<Vec<Vec<usize>>, MeshError>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    let n_elements = parse_count(lines, "element")?;
    let mut faces = Vec::with_capacity(n_elements);

    for _ in 0..n_elements {
        let line = lines
            .next()
            .ok_or_else(|| MeshError::Parse("Unexpected end of $Elements".to_string()))??;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            return Err(MeshError::Parse(format!("Invalid element line: {}", line)));
        }

        // Format: elem_id elem_type n_tags tag1 ... tagN node1 node2 ...
        let code: i32 = parse_field(parts[1], "element type")?;
        let n_tags: usize = parse_field(parts[2], "tag count")?;

        let Some(elem_type) = GmshElementType::from_code(code) else {
            continue;
        };

        let node_start = 3 + n_tags;
        let n = elem_type.n_nodes();
        if parts.len() < node_start + n {
            return Err(MeshError::Parse(format!(
                "{:?} needs {} nodes: {}",
                elem_type, n, line
            )));
        }

        let ids = parts[node_start..node_start + n]
            .iter()
            .map(|p| parse_field::<usize>(p, "node id"))
            .collect::<Result<Vec<_>, _>>()?;
        faces.push(ids);
    }

    skip_to(lines, "$EndElements")?;
    Ok(faces)
}

fn parse_count<I>(lines: &mut I, what: &str) -> Result<usize, MeshError>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    match lines.next() {
        Some(line) => parse_field(line?.trim(), &format!("{what} count")),
        None => Err(MeshError::Parse(format!("Missing {what} count"))),
    }
}

fn parse_field<T: std::str::FromStr>(token: &str, what: &str) -> Result<T, MeshError> {
    token
        .parse()
        .map_err(|_| MeshError::Parse(format!("Invalid {what}: {token}")))
}

fn skip_to<I>(lines: &mut I, marker: &str) -> Result<(), MeshError>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    for line_result in lines.by_ref() {
        if line_result?.trim().starts_with(marker) {
            break;
        }
    }
    Ok(())
}

/// Write a SphereMesh to Gmsh MSH format 2.2.
///
/// Triangles and quadrilaterals are written with their native element type;
/// other polygons cannot be represented and are rejected.
pub fn write_gmsh_mesh(mesh: &SphereMesh, path: &Path) -> Result<(), MeshError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "$MeshFormat")?;
    writeln!(writer, "2.2 0 8")?;
    writeln!(writer, "$EndMeshFormat")?;

    writeln!(writer, "$Nodes")?;
    writeln!(writer, "{}", mesh.vertices.len())?;
    for (i, &[x, y, z]) in mesh.vertices.iter().enumerate() {
        writeln!(writer, "{} {:.17e} {:.17e} {:.17e}", i + 1, x, y, z)?;
    }
    writeln!(writer, "$EndNodes")?;

    writeln!(writer, "$Elements")?;
    writeln!(writer, "{}", mesh.faces.len())?;
    for (k, face) in mesh.faces.iter().enumerate() {
        let code = match face.n_vertices() {
            3 => GmshElementType::Triangle as i32,
            4 => GmshElementType::Quadrilateral as i32,
            n => {
                return Err(MeshError::invalid_face(
                    k,
                    format!("{n}-gon cannot be written as a Gmsh element"),
                ));
            }
        };
        // Format: elem_id type n_tags physical_tag geometrical_tag nodes...
        write!(writer, "{} {} 2 0 0", k + 1, code)?;
        for &v in &face.vertices {
            write!(writer, " {}", v + 1)?;
        }
        writeln!(writer)?;
    }
    writeln!(writer, "$EndElements")?;

    writer.flush()?;
    Ok(())
}
