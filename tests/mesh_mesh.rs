use nalgebra::{Point3, Vector2};
use xsect::prelude::*;

/// A unit square in the z = 0 plane, two triangles, UVs matching x/y.
fn ground() -> PolygonMesh<f64> {
    PolygonMesh::new(
        vec![
            Point3::new(0., 0., 0.),
            Point3::new(1., 0., 0.),
            Point3::new(1., 1., 0.),
            Point3::new(0., 1., 0.),
        ],
        vec![[0, 1, 2], [0, 2, 3]],
        vec![
            Vector2::new(0., 0.),
            Vector2::new(1., 0.),
            Vector2::new(1., 1.),
            Vector2::new(0., 1.),
        ],
    )
}

/// A vertical quad in the y = 0.4 plane spanning x in [0, 1], z in [-0.5, 0.5].
fn wall() -> PolygonMesh<f64> {
    PolygonMesh::new(
        vec![
            Point3::new(0., 0.4, -0.5),
            Point3::new(1., 0.4, -0.5),
            Point3::new(1., 0.4, 0.5),
            Point3::new(0., 0.4, 0.5),
        ],
        vec![[0, 1, 2], [0, 2, 3]],
        vec![
            Vector2::new(0., 0.),
            Vector2::new(1., 0.),
            Vector2::new(1., 1.),
            Vector2::new(0., 1.),
        ],
    )
}

/// Four vertical quads forming an open square tube crossing z = 0, with
/// corners at (0.2, 0.2), (0.8, 0.2), (0.8, 0.8), (0.2, 0.8).
fn tube() -> PolygonMesh<f64> {
    let mut vertices = vec![];
    let mut faces = vec![];
    let mut uvs = vec![];
    let corners = [
        (Point3::new(0.2, 0.2, 0.), Point3::new(0.8, 0.2, 0.)),
        (Point3::new(0.8, 0.2, 0.), Point3::new(0.8, 0.8, 0.)),
        (Point3::new(0.8, 0.8, 0.), Point3::new(0.2, 0.8, 0.)),
        (Point3::new(0.2, 0.8, 0.), Point3::new(0.2, 0.2, 0.)),
    ];
    for (i, (a, b)) in corners.into_iter().enumerate() {
        let base = vertices.len();
        vertices.push(Point3::new(a.x, a.y, -0.5));
        vertices.push(Point3::new(b.x, b.y, -0.5));
        vertices.push(Point3::new(b.x, b.y, 0.5));
        vertices.push(Point3::new(a.x, a.y, 0.5));
        let offset = i as f64;
        uvs.push(Vector2::new(offset, 0.));
        uvs.push(Vector2::new(offset + 1., 0.));
        uvs.push(Vector2::new(offset + 1., 1.));
        uvs.push(Vector2::new(offset, 1.));
        faces.push([base, base + 1, base + 2]);
        faces.push([base, base + 2, base + 3]);
    }
    PolygonMesh::new(vertices, faces, uvs)
}

#[test]
fn crossing_quads_stitch_into_a_single_open_polyline() {
    let ground = ground();
    let wall = wall();

    let polylines = ground.find_intersection(&wall, ()).unwrap();
    assert_eq!(polylines.len(), 1);

    // The diagonals of both quads split the crossing into three segments
    let polyline = &polylines[0];
    assert_eq!(polyline.len(), 4);

    for pt in polyline {
        assert!((pt.point().y - 0.4).abs() < 1e-9);
        assert!(pt.point().z.abs() < 1e-9);
        // The ground's UVs follow x/y
        assert!((pt.uv0() - Vector2::new(pt.point().x, 0.4)).norm() < 1e-9);
    }

    let mut xs: Vec<_> = polyline.iter().map(|pt| pt.point().x).collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    for (x, expected) in xs.iter().zip([0., 0.4, 0.5, 1.]) {
        assert!((x - expected).abs() < 1e-9);
    }

    // An open crossing starts and ends at the quad boundary
    let first = polyline.first().unwrap().point();
    let last = polyline.last().unwrap().point();
    assert!((first - last).norm() > 0.5);
}

#[test]
fn tube_crossing_forms_a_closed_loop() {
    let ground = ground();
    let tube = tube();

    let polylines = ground.find_intersection(&tube, ()).unwrap();
    assert_eq!(polylines.len(), 1);

    // Eight segments (each wall is split by its diagonal) close into a ring
    let polyline = &polylines[0];
    assert_eq!(polyline.len(), 9);

    let first = polyline.first().unwrap().point();
    let last = polyline.last().unwrap().point();
    assert!((first - last).norm() < 1e-6);

    for pt in polyline {
        let p = pt.point();
        assert!(p.z.abs() < 1e-9);
        let on_x_wall = (p.x - 0.2).abs() < 1e-9 || (p.x - 0.8).abs() < 1e-9;
        let on_y_wall = (p.y - 0.2).abs() < 1e-9 || (p.y - 0.8).abs() < 1e-9;
        assert!(on_x_wall || on_y_wall);
    }

    // Interior junctions are simple: consecutive points never coincide
    for pair in polyline.windows(2) {
        assert!((pair[0].point() - pair[1].point()).norm() > 1e-6);
    }
}

#[test]
fn disjoint_meshes_produce_nothing() {
    let ground = ground();
    let wall = wall();
    let far = PolygonMesh::new(
        wall.vertices()
            .iter()
            .map(|p| Point3::new(p.x, p.y, p.z + 10.))
            .collect(),
        wall.faces().to_vec(),
        wall.uvs().to_vec(),
    );

    let polylines = ground.find_intersection(&far, ()).unwrap();
    assert!(polylines.is_empty());
}

#[test]
fn traversal_only_emits_overlapping_leaf_pairs() {
    let ground = ground();
    let tube = tube();

    let ta = MeshBoundingBoxTree::new(&ground);
    let tb = MeshBoundingBoxTree::new(&tube);
    let traversed = BoundingBoxTraversal::try_traverse(ta, tb, Some(0.)).unwrap();

    let pairs: Vec<_> = traversed.into_pairs();
    assert!(!pairs.is_empty());
    for (a, b) in &pairs {
        assert!(a.bounding_box().intersects(&b.bounding_box(), Some(0.)));
    }

    // Pruning is conservative: every truly crossing face pair survives
    for f0 in 0..ground.faces().len() {
        for f1 in 0..tube.faces().len() {
            if find_triangle_intersection(&ground, f0, &tube, f1).is_some() {
                assert!(pairs
                    .iter()
                    .any(|(a, b)| a.faces() == [f0].as_slice() && b.faces() == [f1].as_slice()));
            }
        }
    }
}
