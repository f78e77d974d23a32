pub mod curve_curve_intersection_problem;

pub use curve_curve_intersection_problem::*;

use std::cmp::Ordering;

use argmin::core::{ArgminFloat, Executor, State};
use itertools::Itertools;
use nalgebra::{Point3, Vector2};
use num_traits::Float;

use crate::bounding_box::{BoundingBoxTraversal, BoundingBoxTree, CurveBoundingBoxTree};
use crate::geometry::ParametricCurve;
use crate::intersects::{
    CurveCurveIntersection, HasIntersection, Intersection, IntersectionBFGS,
    IntersectionSolverOptions,
};
use crate::misc::FloatingPoint;

/// Find the intersection points between two parametric curves.
///
/// Candidate parameter ranges come from a pairwise bounding box tree
/// traversal; each candidate seeds a quasi-Newton minimization of the
/// squared distance at the start of its sub-domains. Solutions leaving the
/// curve domains or farther apart than `minimum_distance` are rejected, and
/// near-parameter duplicates are merged keeping the closest representative.
///
/// * `a` - The first curve
/// * `b` - The other curve to intersect with
/// * `option` - Hyperparameters for the intersection solver
pub fn find_curve_intersections<'a, T, C0, C1>(
    a: &'a C0,
    b: &'a C1,
    option: Option<IntersectionSolverOptions<T>>,
) -> anyhow::Result<Vec<CurveCurveIntersection<Point3<T>, T>>>
where
    T: FloatingPoint + ArgminFloat,
    C0: ParametricCurve<T>,
    C1: ParametricCurve<T>,
{
    let options = option.unwrap_or_default();

    let div = T::from_usize(options.knot_domain_division).unwrap();
    let ta = CurveBoundingBoxTree::new(a, Some(a.domain_interval() / div));
    let tb = CurveBoundingBoxTree::new(b, Some(b.domain_interval() / div));

    let traversed = BoundingBoxTraversal::try_traverse(ta, tb, None)?;

    let a_domain = a.domain();
    let b_domain = b.domain();

    let intersections = traversed
        .into_pairs_iter()
        .filter_map(|(ta, tb)| {
            let ia = ta.into_item();
            let ib = tb.into_item();

            let problem = CurveCurveIntersectionProblem::new(a, b, ia, ib);

            // Seed at the start of each candidate sub-domain
            let init_param = Vector2::<T>::new(ia.0, ib.0);

            let solver = IntersectionBFGS::<T>::new()
                .with_step_size_tolerance(options.step_size_tolerance)
                .with_cost_tolerance(options.cost_tolerance);

            let res = Executor::new(problem, solver)
                .configure(|state| state.param(init_param).max_iters(options.max_iters))
                .run();

            match res {
                Ok(r) => r.state().get_best_param().and_then(|param| {
                    if (a_domain.0..=a_domain.1).contains(&param.x)
                        && (b_domain.0..=b_domain.1).contains(&param.y)
                    {
                        let p0 = a.point_at(param.x);
                        let p1 = b.point_at(param.y);
                        Some(Intersection::new((p0, param.x), (p1, param.y)))
                    } else {
                        None
                    }
                }),
                Err(_) => None,
            }
        })
        .filter(|it| {
            // filter out solutions that did not actually meet
            let d = (&it.a().0 - &it.b().0).norm();
            d < options.minimum_distance
        })
        .collect_vec();

    Ok(group_and_extract_closest_intersections(intersections))
}

/// Group intersections by parameter and extract the closest intersection in
/// each group
fn group_and_extract_closest_intersections<T>(
    intersections: Vec<CurveCurveIntersection<Point3<T>, T>>,
) -> Vec<CurveCurveIntersection<Point3<T>, T>>
where
    T: FloatingPoint + ArgminFloat,
{
    let sorted = intersections
        .into_iter()
        .sorted_by(|x, y| x.a().1.partial_cmp(&y.a().1).unwrap_or(Ordering::Equal))
        .collect_vec();

    let parameter_minimum_distance = T::from_f64(1e-3).unwrap();
    let groups = sorted
        .into_iter()
        .map(|pt| vec![pt])
        .coalesce(|x, y| {
            let x0 = &x[x.len() - 1];
            let y0 = &y[y.len() - 1];
            let da = Float::abs(x0.a().1 - y0.a().1);
            let db = Float::abs(x0.b().1 - y0.b().1);
            if da < parameter_minimum_distance || db < parameter_minimum_distance {
                // merge near parameter results
                Ok([x, y].concat())
            } else {
                Err((x, y))
            }
        })
        .collect_vec();

    groups
        .into_iter()
        .filter_map(|group| match group.len() {
            1 => Some(group[0].clone()),
            _ => {
                // find the closest intersection in the group
                group
                    .iter()
                    .map(|it| {
                        let delta = &it.a().0 - &it.b().0;
                        (it, delta.norm_squared())
                    })
                    .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
                    .map(|closest| closest.0.clone())
            }
        })
        .collect_vec()
}
