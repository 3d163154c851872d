/// Triangle meshes built from surface grids, ready for rasterization
use nalgebra::{Point3, Vector3};

use crate::mesh::SurfaceGrid;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    /// Build a triangle whose vertices all carry the face normal.
    pub fn flat(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        let normal = face_normal(&a, &b, &c);
        Self {
            vertices: [
                Vertex::new(a, normal),
                Vertex::new(b, normal),
                Vertex::new(c, normal),
            ],
        }
    }

    /// Face normal from the winding order; zero for degenerate triangles.
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let [v0, v1, v2] = &self.vertices;
        face_normal(&v0.position, &v1.position, &v2.position)
    }

    /// True when the vertices are collinear or coincide.
    pub fn is_degenerate(&self) -> bool {
        self.calculate_normal() == Vector3::zeros()
    }
}

fn face_normal(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> Vector3<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    edge1
        .cross(&edge2)
        .try_normalize(1e-12)
        .unwrap_or_else(Vector3::zeros)
}

/// Whether to close the top ring of a surface with a disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cap {
    None,
    /// Fan of triangles around the axis at the top ring (free liquid surface).
    Top,
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Split every quad of the grid into two triangles, dropping the
    /// degenerate ones that appear where the radius is zero.
    pub fn from_surface(grid: &SurfaceGrid, cap: Cap) -> Self {
        let points: Vec<Point3<f32>> = grid.points().iter().map(|p| p.cast::<f32>()).collect();
        let mut mesh = Self::with_capacity(grid.rows() * grid.cols() * 2);

        for [a, b, c, d] in grid.quads() {
            for triangle in [
                Triangle::flat(points[a], points[b], points[c]),
                Triangle::flat(points[a], points[c], points[d]),
            ] {
                if !triangle.is_degenerate() {
                    mesh.add_triangle(triangle);
                }
            }
        }

        if cap == Cap::Top && grid.rows() > 0 {
            mesh.add_top_cap(&points[(grid.rows() - 1) * grid.cols()..]);
        }

        mesh
    }

    fn add_top_cap(&mut self, ring: &[Point3<f32>]) {
        let Some(first) = ring.first() else {
            return;
        };
        let center = Point3::new(0.0, 0.0, first.z);
        for pair in ring.windows(2) {
            let triangle = Triangle::flat(center, pair[0], pair[1]);
            if !triangle.is_degenerate() {
                self.add_triangle(triangle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frustum::Frustum;
    use crate::mesh::{liquid_surface, vessel_surface, MeshResolution};
    use approx::assert_relative_eq;

    #[test]
    fn test_two_triangles_per_quad() {
        let frustum = Frustum::new(2.0, 0.5, 2.0).unwrap();
        let grid = vessel_surface(&frustum, MeshResolution::new(3, 9)).unwrap();
        let mesh = Mesh::from_surface(&grid, Cap::None);
        assert_eq!(mesh.triangles.len(), 2 * 2 * 8);
    }

    #[test]
    fn test_wall_normals_point_outwards() {
        let frustum = Frustum::new(2.0, 1.0, 2.0).unwrap();
        let grid = vessel_surface(&frustum, MeshResolution::new(4, 16)).unwrap();
        let mesh = Mesh::from_surface(&grid, Cap::None);
        for triangle in &mesh.triangles {
            let centroid = triangle
                .vertices
                .iter()
                .fold(Vector3::zeros(), |acc, v| acc + v.position.coords)
                / 3.0;
            let radial = Vector3::new(centroid.x, centroid.y, 0.0);
            assert!(triangle.calculate_normal().dot(&radial) > 0.0);
            // Shading reads the per-vertex normal.
            for vertex in &triangle.vertices {
                assert_eq!(vertex.normal, triangle.calculate_normal());
            }
        }
    }

    #[test]
    fn test_top_cap_faces_up() {
        let frustum = Frustum::new(2.0, 1.0, 2.0).unwrap();
        let grid = liquid_surface(&frustum, 1.0, MeshResolution::new(3, 12)).unwrap();
        let walls = Mesh::from_surface(&grid, Cap::None).triangles.len();
        let mesh = Mesh::from_surface(&grid, Cap::Top);
        assert_eq!(mesh.triangles.len(), walls + 11);
        let cap = mesh.triangles.last().unwrap();
        assert_relative_eq!(cap.calculate_normal().z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_flat_grid_gives_only_cap() {
        let frustum = Frustum::new(2.0, 1.0, 2.0).unwrap();
        let grid = liquid_surface(&frustum, 0.0, MeshResolution::LIQUID).unwrap();
        assert!(Mesh::from_surface(&grid, Cap::None).is_empty());
        assert_eq!(Mesh::from_surface(&grid, Cap::Top).triangles.len(), 49);
    }

    #[test]
    fn test_pointed_cone_drops_degenerate_triangles() {
        let frustum = Frustum::new(2.0, 0.0, 2.0).unwrap();
        let grid = vessel_surface(&frustum, MeshResolution::new(2, 5)).unwrap();
        let mesh = Mesh::from_surface(&grid, Cap::None);
        assert_eq!(mesh.triangles.len(), 4);
        assert!(mesh.triangles.iter().all(|t| !t.is_degenerate()));
    }
}
