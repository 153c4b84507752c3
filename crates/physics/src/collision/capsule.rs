//! Capsule queries built on point projection.
//!
//! Support-mapping queries lose the contact between a capsule and a large box
//! when the capsule sits on the box's centre axis. Capsules are answered here
//! from their inner segment instead: the segment point closest to a body is
//! found by minimising the signed distance along the segment, and the capsule
//! touches the body when that distance drops below the radius.
//!
//! Signed distance to a convex body is convex along any line, so a golden
//! section search finds the minimum and a bisection finds the first contact
//! of a sweep.

use glam::Vec3;
use parry3d::math::{Isometry, Point, Real};
use parry3d::query::{self, PointQuery};
use parry3d::shape::{Ball, Shape};

use super::query::Penetration;
use super::world::{to_vec3, translation};

/// Golden section steps per line search.
const LINE_SEARCH_STEPS: usize = 24;

/// Bisection steps when locating the first contact of a sweep.
const BISECTION_STEPS: usize = 24;

const INV_PHI: f32 = 0.618_034;

/// A vertical capsule: a segment of `2 * half_segment` plus `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Capsule {
    pub half_segment: f32,
    pub radius: f32,
}

/// Where a capsule comes closest to a body.
#[derive(Debug, Clone, Copy)]
pub(super) struct Approach {
    /// Point on the inner segment.
    pub center: Vec3,
    /// Closest point on the body's surface.
    pub surface: Vec3,
    /// Distance from `center` to the surface, negative inside the body.
    pub signed_distance: f32,
}

/// First contact of a capsule sweep.
#[derive(Debug, Clone, Copy)]
pub(super) struct SweepHit {
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

impl Capsule {
    /// Capsule for a shape of total `height`, with both the radius and the
    /// segment scaled by `shrink`.
    pub fn new(radius: f32, height: f32, shrink: f32) -> Self {
        Self {
            half_segment: (height * 0.5 - radius).max(0.0) * shrink,
            radius: radius * shrink,
        }
    }

    pub fn approach(&self, origin: Vec3, shape: &dyn Shape, transform: &Isometry<Real>) -> Approach {
        let bottom = origin - Vec3::Y * self.half_segment;
        let top = origin + Vec3::Y * self.half_segment;

        let (s, _) = line_min(0.0, 1.0, |s| {
            signed_distance(shape, transform, bottom.lerp(top, s)).0
        });
        let center = bottom.lerp(top, s);
        let (distance, surface) = signed_distance(shape, transform, center);

        Approach {
            center,
            surface,
            signed_distance: distance,
        }
    }

    /// Separation between the capsule surface and the body.
    pub fn gap(&self, origin: Vec3, shape: &dyn Shape, transform: &Isometry<Real>) -> f32 {
        self.approach(origin, shape, transform).signed_distance - self.radius
    }

    pub fn penetration(
        &self,
        origin: Vec3,
        shape: &dyn Shape,
        transform: &Isometry<Real>,
    ) -> Option<Penetration> {
        let approach = self.approach(origin, shape, transform);
        let depth = self.radius - approach.signed_distance;
        if depth <= 0.0 {
            return None;
        }

        let outward = if approach.signed_distance < 0.0 {
            approach.surface - approach.center
        } else {
            approach.center - approach.surface
        };
        let direction = match outward.try_normalize() {
            Some(direction) => direction,
            // Segment point on the surface itself, ask parry for the face normal
            None => {
                let ball = Ball::new(self.radius);
                let contact =
                    query::contact(&translation(approach.center), &ball, transform, shape, 0.0)
                        .ok()
                        .flatten()?;
                -to_vec3(&contact.normal1.into_inner())
            }
        };

        Some(Penetration {
            direction,
            distance: depth,
        })
    }

    /// Sweep from `start` along the unit `direction` for `max_distance`.
    ///
    /// Bodies the capsule already touches at `start` are not reported.
    pub fn sweep(
        &self,
        start: Vec3,
        direction: Vec3,
        max_distance: f32,
        shape: &dyn Shape,
        transform: &Isometry<Real>,
    ) -> Option<SweepHit> {
        let gap_at = |t: f32| self.gap(start + direction * t, shape, transform);

        if gap_at(0.0) <= 0.0 {
            return None;
        }

        let mut hi = max_distance;
        if gap_at(hi) > 0.0 {
            let (closest, gap) = line_min(0.0, max_distance, &gap_at);
            if gap > 0.0 {
                return None;
            }
            hi = closest;
        }

        let mut lo = 0.0;
        for _ in 0..BISECTION_STEPS {
            let mid = 0.5 * (lo + hi);
            if gap_at(mid) > 0.0 {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        let approach = self.approach(start + direction * lo, shape, transform);
        Some(SweepHit {
            distance: lo,
            point: approach.surface,
            normal: (approach.center - approach.surface).normalize_or_zero(),
        })
    }
}

fn signed_distance(shape: &dyn Shape, transform: &Isometry<Real>, point: Vec3) -> (f32, Vec3) {
    let projection = shape.project_point(transform, &Point::new(point.x, point.y, point.z), false);
    let surface = to_vec3(&projection.point.coords);
    let distance = point.distance(surface);

    if projection.is_inside {
        (-distance, surface)
    } else {
        (distance, surface)
    }
}

/// Minimise a convex `f` over `[lo, hi]`. Returns the argument and value.
fn line_min(lo: f32, hi: f32, mut f: impl FnMut(f32) -> f32) -> (f32, f32) {
    let (mut a, mut b) = (lo, hi);
    let mut x1 = b - INV_PHI * (b - a);
    let mut x2 = a + INV_PHI * (b - a);
    let mut f1 = f(x1);
    let mut f2 = f(x2);

    for _ in 0..LINE_SEARCH_STEPS {
        if f1 <= f2 {
            b = x2;
            x2 = x1;
            f2 = f1;
            x1 = b - INV_PHI * (b - a);
            f1 = f(x1);
        } else {
            a = x1;
            x1 = x2;
            f1 = f2;
            x2 = a + INV_PHI * (b - a);
            f2 = f(x2);
        }
    }

    // The search never samples the ends of the interval
    [(lo, f(lo)), (hi, f(hi)), (x1, f1), (x2, f2)]
        .into_iter()
        .fold((x1, f1), |best, candidate| {
            if candidate.1 < best.1 {
                candidate
            } else {
                best
            }
        })
}
