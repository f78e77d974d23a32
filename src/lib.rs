//! xsect is a geometric intersection engine for 3D space.
//!
//! It answers the question *where do two shapes meet?* for free-form curves,
//! surfaces, triangle meshes and polylines. Curves and surfaces enter the
//! engine through the evaluator traits in `geometry`, meshes and polylines
//! as plain data ([`PolygonMesh`](prelude::PolygonMesh),
//! [`Polyline`](prelude::Polyline)).
//!
//! Candidate regions are pruned with lazily subdivided bounding box trees,
//! approximate incidences are refined numerically (a quasi-Newton minimizer
//! for curve pairs and curve/surface pairs, a three-plane Newton step for
//! surface pairs), and unordered mesh intersection segments are stitched into
//! coherent polylines.
//!
//! ## Example
//!
//! ```
//! use nalgebra::{Point3, Vector2};
//! use xsect::prelude::*;
//!
//! // A unit square in the z = 0 plane
//! let ground = PolygonMesh::new(
//!     vec![
//!         Point3::new(0., 0., 0.),
//!         Point3::new(1., 0., 0.),
//!         Point3::new(1., 1., 0.),
//!         Point3::new(0., 1., 0.),
//!     ],
//!     vec![[0, 1, 2], [0, 2, 3]],
//!     vec![
//!         Vector2::new(0., 0.),
//!         Vector2::new(1., 0.),
//!         Vector2::new(1., 1.),
//!         Vector2::new(0., 1.),
//!     ],
//! );
//!
//! // A polyline piercing the square from below
//! let needle = Polyline::new(vec![
//!     Point3::new(0.5, 0.25, -1.),
//!     Point3::new(0.5, 0.25, 1.),
//! ]);
//!
//! let hits = needle.find_intersection(&ground, None).unwrap();
//! assert_eq!(hits.len(), 1);
//! assert!((hits[0].point() - Point3::new(0.5, 0.25, 0.)).norm() < 1e-10);
//! ```

mod bounding_box;
mod geometry;
mod intersects;
mod misc;
mod polygon_mesh;
mod polyline;

pub mod prelude {
    pub use crate::bounding_box::*;
    pub use crate::geometry::*;
    pub use crate::intersects::*;
    pub use crate::misc::*;
    pub use crate::polygon_mesh::*;
    pub use crate::polyline::*;
}
