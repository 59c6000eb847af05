//! Exodus II mesh input.
//!
//! Exodus files are NetCDF containers. The reader understands the subset
//! written by spherical mesh generators:
//!
//! - coordinates in a single `coord` variable of shape `[num_dim][num_nodes]`,
//!   or split across `coordx`, `coordy`, `coordz`
//! - one or more element blocks `connect1`, `connect2`, ... of shape
//!   `[num_el_in_blk][num_nod_per_el]` with 1-based node numbers
//!
//! Blocks are concatenated in order. Zero entries in a connectivity row are
//! treated as padding, so blocks of mixed polygons are accepted.

use std::path::Path;

use super::error::MeshError;
use super::sphere_mesh::SphereMesh;

/// Read an Exodus II mesh file.
pub fn read_exodus_mesh(path: &Path) -> Result<SphereMesh, MeshError> {
    let file = netcdf::open(path)?;

    let vertices = read_coordinates(&file)?;
    let mut faces: Vec<Vec<usize>> = Vec::new();

    for block in 1.. {
        let name = format!("connect{block}");
        let Some(var) = file.variable(&name) else {
            break;
        };

        let dims = var.dimensions();
        if dims.len() != 2 {
            return Err(MeshError::Parse(format!(
                "{name} must be two-dimensional, has {} dimensions",
                dims.len()
            )));
        }
        let n_per_elem = dims[1].len();
        if n_per_elem == 0 {
            return Err(MeshError::Parse(format!("{name} has no nodes per element")));
        }
        let connect: Vec<i64> = var.get_values::<i64, _>(..)?;

        for (row, nodes) in connect.chunks(n_per_elem).enumerate() {
            let face = nodes
                .iter()
                .filter(|&&n| n != 0)
                .map(|&n| {
                    usize::try_from(n - 1).map_err(|_| {
                        MeshError::invalid_face(
                            faces.len(),
                            format!("{name} row {row}: invalid node number {n}"),
                        )
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            faces.push(face);
        }
    }

    if faces.is_empty() {
        return Err(MeshError::MissingSection("connect1".to_string()));
    }

    SphereMesh::new(vertices, faces)
}

fn read_coordinates(file: &netcdf::File) -> Result<Vec<[f64; 3]>, MeshError> {
    if let Some(var) = file.variable("coord") {
        let dims = var.dimensions();
        if dims.len() != 2 || dims[0].len() != 3 {
            return Err(MeshError::Parse(
                "coord must have shape [3][num_nodes]".to_string(),
            ));
        }
        let n_nodes = dims[1].len();
        let coord: Vec<f64> = var.get_values::<f64, _>(..)?;
        return Ok((0..n_nodes)
            .map(|i| [coord[i], coord[n_nodes + i], coord[2 * n_nodes + i]])
            .collect());
    }

    let component = |name: &str| -> Result<Vec<f64>, MeshError> {
        let var = file
            .variable(name)
            .ok_or_else(|| MeshError::MissingSection(format!("coord or {name}")))?;
        Ok(var.get_values::<f64, _>(..)?)
    };
    let x = component("coordx")?;
    let y = component("coordy")?;
    let z = component("coordz")?;

    if x.len() != y.len() || x.len() != z.len() {
        return Err(MeshError::Parse(
            "coordx, coordy and coordz differ in length".to_string(),
        ));
    }

    Ok(x.into_iter()
        .zip(y)
        .zip(z)
        .map(|((x, y), z)| [x, y, z])
        .collect())
}
