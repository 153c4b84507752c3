//! Scripted collision backend for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use glam::Vec3;

use crate::collision::{
    BodyId, BodyKind, CollisionError, CollisionQuery, CollisionShape, ContentFlags, Penetration,
    TraceResult,
};

/// Replays canned trace results in order, then reports open space.
#[derive(Default)]
pub struct ScriptedQuery {
    traces: RefCell<VecDeque<TraceResult>>,
    pub trace_calls: Cell<usize>,
}

impl ScriptedQuery {
    /// Every trace is unobstructed.
    pub fn open() -> Self {
        Self::default()
    }

    pub fn with_traces(traces: Vec<TraceResult>) -> Self {
        Self {
            traces: RefCell::new(traces.into()),
            trace_calls: Cell::new(0),
        }
    }
}

/// A hit against body 0 at `fraction` with the given plane normal.
pub fn hit(fraction: f32, normal: Vec3) -> TraceResult {
    TraceResult {
        fraction,
        hit_body: Some(BodyId(0)),
        plane_normal: normal,
        hit_contents: ContentFlags::SOLID,
        ..TraceResult::no_hit(Vec3::ZERO, Vec3::ZERO)
    }
}

impl CollisionQuery for ScriptedQuery {
    fn trace_shape(
        &self,
        shape: &CollisionShape,
        start: Vec3,
        end: Vec3,
        _mask: ContentFlags,
        _scale: f32,
    ) -> Result<TraceResult, CollisionError> {
        if *shape == CollisionShape::Point {
            return Err(CollisionError::unsupported(shape));
        }

        self.trace_calls.set(self.trace_calls.get() + 1);
        let scripted = self.traces.borrow_mut().pop_front();
        Ok(match scripted {
            Some(trace) => TraceResult {
                start,
                end,
                distance: (end - start).length() * trace.fraction,
                ..trace
            },
            None => TraceResult::no_hit(start, end),
        })
    }

    fn overlap_shape(
        &self,
        _shape: &CollisionShape,
        _origin: Vec3,
        _mask: ContentFlags,
        _max_results: usize,
        results: &mut Vec<BodyId>,
    ) -> Result<usize, CollisionError> {
        results.clear();
        Ok(0)
    }

    fn compute_penetration(
        &self,
        _shape: &CollisionShape,
        _origin: Vec3,
        _body: BodyId,
    ) -> Result<Option<Penetration>, CollisionError> {
        Ok(None)
    }

    fn body_kind(&self, _body: BodyId) -> BodyKind {
        BodyKind::Static
    }
}
