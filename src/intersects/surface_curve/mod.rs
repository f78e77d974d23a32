pub mod surface_curve_intersection_problem;

pub use surface_curve_intersection_problem::*;

use std::cmp::Ordering;

use argmin::core::{ArgminFloat, Executor, State};
use itertools::Itertools;
use nalgebra::{Point3, Vector3};
use num_traits::Float;

use crate::bounding_box::{
    BoundingBoxTraversal, BoundingBoxTree, CurveBoundingBoxTree, SurfaceBoundingBoxTree,
    UVDirection,
};
use crate::geometry::{ParametricCurve, ParametricSurface};
use crate::intersects::{
    HasIntersection, Intersection, IntersectionBFGS, IntersectionSolverOptions,
    SurfaceCurveIntersection,
};
use crate::misc::FloatingPoint;

/// Find the intersection points between a parametric surface and a
/// parametric curve.
///
/// Candidate sub-domain pairs come from a pairwise bounding box tree
/// traversal; each candidate seeds a quasi-Newton minimization of the
/// squared distance at the midpoints of its sub-domains.
///
/// * `surface` - The surface
/// * `curve` - The curve to intersect with
/// * `option` - Hyperparameters for the intersection solver
pub fn find_surface_curve_intersections<'a, T, S, C>(
    surface: &'a S,
    curve: &'a C,
    option: Option<IntersectionSolverOptions<T>>,
) -> anyhow::Result<Vec<SurfaceCurveIntersection<Point3<T>, T>>>
where
    T: FloatingPoint + ArgminFloat,
    S: ParametricSurface<T>,
    C: ParametricCurve<T>,
{
    let options = option.unwrap_or_default();

    let div = T::one() / T::from_usize(options.knot_domain_division).unwrap();
    let interval = surface.domain_interval();
    let ta = SurfaceBoundingBoxTree::new(
        surface,
        UVDirection::U,
        Some((interval.0 * div, interval.1 * div)),
    );
    let tb = CurveBoundingBoxTree::new(curve, Some(curve.domain_interval() * div));

    let traversed = BoundingBoxTraversal::try_traverse(ta, tb, None)?;

    let (u_domain, v_domain) = surface.domain();
    let curve_domain = curve.domain();

    let intersections = traversed
        .into_pairs_iter()
        .filter_map(|(a, b)| {
            let (iu, iv) = a.into_item();
            let ic = b.into_item();

            let problem = SurfaceCurveIntersectionProblem::new(surface, curve, (iu, iv), ic);

            // Seed at the midpoints of the candidate sub-domains
            let half = T::from_f64(0.5).unwrap();
            let init_param = Vector3::<T>::new(
                (ic.0 + ic.1) * half,
                (iu.0 + iu.1) * half,
                (iv.0 + iv.1) * half,
            );

            let solver = IntersectionBFGS::<T>::new()
                .with_step_size_tolerance(options.step_size_tolerance)
                .with_cost_tolerance(options.cost_tolerance);

            let res = Executor::new(problem, solver)
                .configure(|state| state.param(init_param).max_iters(options.max_iters))
                .run();

            match res {
                Ok(r) => r.state().get_best_param().and_then(|param| {
                    if (u_domain.0..=u_domain.1).contains(&param.y)
                        && (v_domain.0..=v_domain.1).contains(&param.z)
                        && (curve_domain.0..=curve_domain.1).contains(&param.x)
                    {
                        let p0 = surface.point_at(param.y, param.z);
                        let p1 = curve.point_at(param.x);
                        Some(Intersection::new((p0, (param.y, param.z)), (p1, param.x)))
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

    let sorted = intersections
        .into_iter()
        .sorted_by(|x, y| x.b().1.partial_cmp(&y.b().1).unwrap_or(Ordering::Equal))
        .collect_vec();

    // group near parameter results & extract the closest one in each group
    let parameter_minimum_distance = T::from_f64(1e-3).unwrap();
    let groups = sorted
        .into_iter()
        .map(|pt| vec![pt])
        .coalesce(|x, y| {
            let x0 = &x[x.len() - 1];
            let y0 = &y[y.len() - 1];
            let xs = x0.a().1;
            let ys = y0.a().1;
            let da0 = Float::abs(xs.0 - ys.0);
            let da1 = Float::abs(xs.1 - ys.1);
            let db = Float::abs(x0.b().1 - y0.b().1);
            if da0 < parameter_minimum_distance
                || da1 < parameter_minimum_distance
                || db < parameter_minimum_distance
            {
                // merge near parameter results
                Ok([x, y].concat())
            } else {
                Err((x, y))
            }
        })
        .collect_vec();

    let pts = groups
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
        .collect_vec();

    Ok(pts)
}
