use approx::assert_relative_eq;
use nalgebra::{Matrix3, Point3, Vector2, Vector3};
use xsect::prelude::*;

/// A straight line over the parameter domain [0, 1].
struct LineCurve {
    a: Point3<f64>,
    b: Point3<f64>,
}

impl LineCurve {
    fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self { a, b }
    }
}

impl ParametricCurve<f64> for LineCurve {
    fn domain(&self) -> (f64, f64) {
        (0., 1.)
    }

    fn point_at(&self, t: f64) -> Point3<f64> {
        self.a + (self.b - self.a) * t
    }

    fn derivatives(&self, t: f64, order: usize) -> Vec<Vector3<f64>> {
        let mut ders = vec![self.point_at(t).coords];
        if order >= 1 {
            ders.push(self.b - self.a);
            for _ in 1..order {
                ders.push(Vector3::zeros());
            }
        }
        ders
    }

    fn interval_bounds(&self, interval: (f64, f64)) -> BoundingBox<f64> {
        BoundingBox::new_with_points([self.point_at(interval.0), self.point_at(interval.1)])
    }
}

/// An affine patch `origin + u * du + v * dv` over [0, 1] x [0, 1].
struct PlanePatch {
    origin: Point3<f64>,
    du: Vector3<f64>,
    dv: Vector3<f64>,
}

impl PlanePatch {
    fn new(origin: Point3<f64>, du: Vector3<f64>, dv: Vector3<f64>) -> Self {
        Self { origin, du, dv }
    }
}

impl ParametricSurface<f64> for PlanePatch {
    fn domain(&self) -> ((f64, f64), (f64, f64)) {
        ((0., 1.), (0., 1.))
    }

    fn point_at(&self, u: f64, v: f64) -> Point3<f64> {
        self.origin + self.du * u + self.dv * v
    }

    fn derivatives(&self, u: f64, v: f64, order: usize) -> Vec<Vec<Vector3<f64>>> {
        let mut ders = vec![vec![self.point_at(u, v).coords]];
        if order >= 1 {
            ders[0].push(self.dv);
            ders.push(vec![self.du, Vector3::zeros()]);
        }
        ders
    }

    fn interval_bounds(&self, u: (f64, f64), v: (f64, f64)) -> BoundingBox<f64> {
        BoundingBox::new_with_points([
            self.point_at(u.0, v.0),
            self.point_at(u.1, v.0),
            self.point_at(u.1, v.1),
            self.point_at(u.0, v.1),
        ])
    }
}

impl TessellateAdaptive<f64> for PlanePatch {
    fn tessellate_adaptive(&self, _tolerance: Option<f64>) -> PolygonMesh<f64> {
        let corners = [(0., 0.), (1., 0.), (1., 1.), (0., 1.)];
        PolygonMesh::new(
            corners
                .iter()
                .map(|&(u, v)| self.point_at(u, v))
                .collect(),
            vec![[0, 1, 2], [0, 2, 3]],
            corners.iter().map(|&(u, v)| Vector2::new(u, v)).collect(),
        )
    }
}

/// The paraboloid `z = u^2 + v^2` over [-1, 1] x [-1, 1].
struct Paraboloid;

impl ParametricSurface<f64> for Paraboloid {
    fn domain(&self) -> ((f64, f64), (f64, f64)) {
        ((-1., 1.), (-1., 1.))
    }

    fn point_at(&self, u: f64, v: f64) -> Point3<f64> {
        Point3::new(u, v, u * u + v * v)
    }

    fn derivatives(&self, u: f64, v: f64, order: usize) -> Vec<Vec<Vector3<f64>>> {
        let mut ders = vec![vec![self.point_at(u, v).coords]];
        if order >= 1 {
            ders[0].push(Vector3::new(0., 1., 2. * v));
            ders.push(vec![Vector3::new(1., 0., 2. * u), Vector3::zeros()]);
        }
        ders
    }

    fn interval_bounds(&self, u: (f64, f64), v: (f64, f64)) -> BoundingBox<f64> {
        let square_range = |(lo, hi): (f64, f64)| {
            let min = if lo <= 0. && 0. <= hi {
                0.
            } else {
                lo.abs().min(hi.abs()).powi(2)
            };
            (min, lo.abs().max(hi.abs()).powi(2))
        };
        let (zu_min, zu_max) = square_range(u);
        let (zv_min, zv_max) = square_range(v);
        BoundingBox::new(
            Vector3::new(u.0, v.0, zu_min + zv_min),
            Vector3::new(u.1, v.1, zu_max + zv_max),
        )
    }
}

#[test]
fn crossing_lines_intersect_once() {
    let a = LineCurve::new(Point3::new(0., 0., 0.), Point3::new(1., 0., 0.));
    let b = LineCurve::new(Point3::new(0.5, -0.5, 0.), Point3::new(0.5, 0.5, 0.));

    let intersections = find_curve_intersections(&a, &b, None).unwrap();
    assert_eq!(intersections.len(), 1);

    let it = &intersections[0];
    assert_relative_eq!(it.a().1, 0.5, epsilon = 1e-4);
    assert_relative_eq!(it.b().1, 0.5, epsilon = 1e-4);
    assert_relative_eq!(it.a().0, Point3::new(0.5, 0., 0.), epsilon = 1e-5);
    assert!((&it.a().0 - &it.b().0).norm() < 1e-5);
}

#[test]
fn parallel_lines_do_not_intersect() {
    let a = LineCurve::new(Point3::new(0., 0., 0.), Point3::new(1., 0., 0.));
    let b = LineCurve::new(Point3::new(0., 1., 0.), Point3::new(1., 1., 0.));

    let intersections = find_curve_intersections(&a, &b, None).unwrap();
    assert!(intersections.is_empty());
}

#[test]
fn line_pierces_plane_patch() {
    let patch = PlanePatch::new(Point3::origin(), Vector3::x(), Vector3::y());
    let needle = LineCurve::new(Point3::new(0.3, 0.4, -1.), Point3::new(0.3, 0.4, 1.));

    let intersections = find_surface_curve_intersections(&patch, &needle, None).unwrap();
    assert_eq!(intersections.len(), 1);

    let it = &intersections[0];
    let (u, v) = it.a().1;
    assert_relative_eq!(u, 0.3, epsilon = 1e-4);
    assert_relative_eq!(v, 0.4, epsilon = 1e-4);
    assert_relative_eq!(it.b().1, 0.5, epsilon = 1e-4);
    assert_relative_eq!(it.a().0, Point3::new(0.3, 0.4, 0.), epsilon = 1e-5);
}

#[test]
fn line_missing_the_patch_is_rejected_by_domain() {
    let patch = PlanePatch::new(Point3::origin(), Vector3::x(), Vector3::y());
    let needle = LineCurve::new(Point3::new(2.5, 2.5, -1.), Point3::new(2.5, 2.5, 1.));

    let intersections = find_surface_curve_intersections(&patch, &needle, None).unwrap();
    assert!(intersections.is_empty());
}

#[test]
fn plane_pair_refinement_matches_direct_linear_solve() {
    // Two skewed plane patches
    let s0 = PlanePatch::new(
        Point3::new(0., 0., 0.),
        Vector3::new(1., 0., 0.),
        Vector3::new(0.3, 1., 0.),
    );
    let s1 = PlanePatch::new(
        Point3::new(0.4, 0., -0.5),
        Vector3::new(0., 1., 0.),
        Vector3::new(0.2, 0., 1.),
    );

    let uv0 = Vector2::new(0.3, 0.3);
    let uv1 = Vector2::new(0.3, 0.3);
    let refined = refine_surface_point(&s0, &s1, uv0, uv1, 1e-10).unwrap();
    assert!(refined.distance() < 1e-10);

    // The same first step written as a dense 3x3 solve
    let p = s0.point_at(uv0.x, uv0.y);
    let q = s1.point_at(uv1.x, uv1.y);
    let pn = s0.du.cross(&s0.dv).normalize();
    let qn = s1.du.cross(&s1.dv).normalize();
    let fnormal = pn.cross(&qn).normalize();
    let system = Matrix3::from_rows(&[pn.transpose(), qn.transpose(), fnormal.transpose()]);
    let rhs = Vector3::new(
        pn.dot(&p.coords),
        qn.dot(&q.coords),
        fnormal.dot(&p.coords),
    );
    let expected = system.lu().solve(&rhs).unwrap();
    assert!((refined.point().coords - expected).norm() < 1e-9);

    // The reported parameters reproduce the reported point & distance
    let p0 = s0.point_at(refined.uv0().x, refined.uv0().y);
    let p1 = s1.point_at(refined.uv1().x, refined.uv1().y);
    assert!((p0 - refined.point()).norm() < 1e-12);
    assert!(((p0 - p1).norm() - refined.distance()).abs() < 1e-12);
}

#[test]
fn refinement_lands_on_the_paraboloid_section_circle() {
    // The paraboloid meets the z = 0.25 plane in the circle of radius 0.5
    let paraboloid = Paraboloid;
    let section = PlanePatch::new(
        Point3::new(-1., -1., 0.25),
        Vector3::new(2., 0., 0.),
        Vector3::new(0., 2., 0.),
    );

    let refined = refine_surface_point(
        &paraboloid,
        &section,
        Vector2::new(0.6, 0.1),
        Vector2::new(0.8, 0.55),
        1e-12,
    )
    .unwrap();

    assert!(refined.distance() < 1e-12);
    let p = refined.point();
    assert!((p.z - 0.25).abs() < 1e-9);
    assert!((p.x * p.x + p.y * p.y - 0.25).abs() < 1e-9);

    let on_surface = paraboloid.point_at(refined.uv0().x, refined.uv0().y);
    assert!((on_surface - p).norm() < 1e-12);
}

#[test]
fn plane_patches_intersect_in_a_refined_polyline() {
    let ground = PlanePatch::new(Point3::origin(), Vector3::x(), Vector3::y());
    let wall = PlanePatch::new(
        Point3::new(0.4, 0., -0.5),
        Vector3::new(0., 1., 0.),
        Vector3::new(0., 0., 1.),
    );

    let polylines = find_surface_intersections(&ground, &wall, Some(1e-8)).unwrap();
    assert_eq!(polylines.len(), 1);

    let polyline = &polylines[0];
    assert!(polyline.len() >= 2);
    for pt in polyline {
        assert!(pt.distance() < 1e-8);
        assert!((pt.point().x - 0.4).abs() < 1e-8);
        assert!(pt.point().z.abs() < 1e-8);

        let p0 = ground.point_at(pt.uv0().x, pt.uv0().y);
        let p1 = wall.point_at(pt.uv1().x, pt.uv1().y);
        assert!((p0 - pt.point()).norm() < 1e-9);
        assert!((p1 - pt.point()).norm() < 1e-7);
    }
}

#[test]
fn polyline_pair_remaps_parameters_into_global_domains() {
    let a = Polyline::new(vec![Point3::new(0., 0., 0.), Point3::new(2., 0., 0.)]);
    let b = Polyline::new(vec![
        Point3::new(0.5, -1., 0.),
        Point3::new(0.5, 1., 0.),
        Point3::new(1.5, 1., 0.),
        Point3::new(1.5, -1., 0.),
    ]);

    let mut intersections = a.find_intersection(&b, None).unwrap();
    intersections.sort_by(|x, y| x.a().1.partial_cmp(&y.a().1).unwrap());
    assert_eq!(intersections.len(), 2);

    let first = &intersections[0];
    assert_relative_eq!(first.a().1, 0.5, epsilon = 1e-9);
    assert_relative_eq!(first.b().1, 1., epsilon = 1e-9);
    assert_relative_eq!(first.a().0, Point3::new(0.5, 0., 0.), epsilon = 1e-9);

    let second = &intersections[1];
    assert_relative_eq!(second.a().1, 1.5, epsilon = 1e-9);
    assert_relative_eq!(second.b().1, 4., epsilon = 1e-9);
    assert_relative_eq!(second.a().0, Point3::new(1.5, 0., 0.), epsilon = 1e-9);
}

#[test]
fn polyline_mesh_interpolates_the_global_parameter() {
    let mesh = PolygonMesh::new(
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
    );
    let needle = Polyline::new(vec![
        Point3::new(0.5, 0.25, -1.),
        Point3::new(0.5, 0.25, 1.),
    ]);

    let hits = needle.find_intersection(&mesh, None).unwrap();
    assert_eq!(hits.len(), 1);

    let hit = &hits[0];
    // Chord length parameterization spans [0, 2]
    assert_relative_eq!(hit.parameter(), 1., epsilon = 1e-9);
    assert_relative_eq!(hit.uv(), Vector2::new(0.5, 0.25), epsilon = 1e-9);
    assert_relative_eq!(*hit.point(), Point3::new(0.5, 0.25, 0.), epsilon = 1e-9);
}

#[test]
fn curve_tree_pruning_is_conservative() {
    let a = Polyline::new(vec![
        Point3::new(0., 0., 0.),
        Point3::new(1., 1., 0.),
        Point3::new(2., 0., 0.),
    ]);
    let b = Polyline::new(vec![Point3::new(0., 0.5, 0.), Point3::new(2., 0.5, 0.)]);

    let ta = CurveBoundingBoxTree::new(&a, Some(a.domain_interval() / 16.));
    let tb = CurveBoundingBoxTree::new(&b, Some(b.domain_interval() / 16.));
    let traversed = BoundingBoxTraversal::try_traverse(ta, tb, None).unwrap();

    let pairs = traversed.into_pairs();
    assert!(!pairs.is_empty());
    for (ta, tb) in &pairs {
        assert!(ta
            .bounding_box()
            .intersects(&tb.bounding_box(), None));
    }

    // Both true crossings are covered by some candidate pair
    for crossing in [Point3::new(0.5, 0.5, 0.), Point3::new(1.5, 0.5, 0.)] {
        let covered = pairs.iter().any(|(ta, tb)| {
            let ia = ta.interval();
            let ib = tb.interval();
            let pa = a.point_at((ia.0 + ia.1) * 0.5);
            let pb = b.point_at((ib.0 + ib.1) * 0.5);
            (pa - crossing).norm() < 0.2 && (pb - crossing).norm() < 0.2
        });
        assert!(covered);
    }
}
