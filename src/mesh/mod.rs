//! Mesh representation.
//!
//! Provides the read-only surface mesh consumed by the metadata generator:
//! - [`SphereMesh`]: polygonal faces on the unit sphere with geometric areas
//! - Equiangular cubed-sphere generation
//! - Gmsh MSH 2.2 reading and writing
//! - Exodus II reading (requires the `netcdf` feature)

mod cubed_sphere;
mod error;
#[cfg(feature = "netcdf")]
mod exodus;
pub mod gmsh;
mod sphere_mesh;

use std::path::Path;

pub use error::MeshError;
#[cfg(feature = "netcdf")]
pub use exodus::read_exodus_mesh;
pub use gmsh::{read_gmsh_mesh, write_gmsh_mesh};
pub use sphere_mesh::{Face, SphereMesh, spherical_polygon_area, spherical_triangle_area};

/// Read a mesh file, choosing the reader from the file extension.
///
/// - `.msh` → Gmsh MSH 2.2
/// - `.g`, `.exo`, `.nc` → Exodus II (requires the `netcdf` feature)
pub fn read_mesh(path: &Path) -> Result<SphereMesh, MeshError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "msh" => read_gmsh_mesh(path),
        "g" | "exo" | "nc" => read_exodus(path),
        other => Err(MeshError::UnsupportedFormat(if other.is_empty() {
            path.display().to_string()
        } else {
            format!(".{other}")
        })),
    }
}

#[cfg(feature = "netcdf")]
fn read_exodus(path: &Path) -> Result<SphereMesh, MeshError> {
    read_exodus_mesh(path)
}

#[cfg(not(feature = "netcdf"))]
fn read_exodus(_path: &Path) -> Result<SphereMesh, MeshError> {
    Err(MeshError::FeatureDisabled("Exodus"))
}
