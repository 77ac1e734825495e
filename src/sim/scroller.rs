//! Infinite ground
//!
//! Ground segments form a gapless chain ordered by X. New segments are
//! appended ahead of the camera and old ones dropped once fully behind it.
//! The same front-only eviction serves every other X-ordered container.

use std::collections::VecDeque;

use super::entity::{Entity, GroundSegment};
use super::physics::{EntityIds, PhysicsWorld};
use crate::Viewport;
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct WorldScroller {
    segments: VecDeque<GroundSegment>,
    viewport: Viewport,
    segment_width_px: f32,
    ground_height_px: f32,
    lookahead_px: f32,
    initial_segments: usize,
}

impl WorldScroller {
    pub fn new(viewport: Viewport, tuning: &Tuning) -> Self {
        Self {
            segments: VecDeque::new(),
            viewport,
            segment_width_px: tuning.ground_segment_width_px,
            ground_height_px: tuning.ground_height_px,
            lookahead_px: tuning.lookahead_px,
            initial_segments: tuning.initial_ground_segments,
        }
    }

    /// Drop all ground and lay the starting chain from X = 0
    pub fn regenerate(&mut self, physics: &mut PhysicsWorld, ids: &mut EntityIds) {
        self.clear(physics);
        let mut left = 0.0;
        for _ in 0..self.initial_segments {
            self.push_segment(physics, ids, left);
            left = self.last_right_edge().unwrap_or(left);
        }
    }

    /// Extend ahead of the camera, then evict behind it
    pub fn update(&mut self, physics: &mut PhysicsWorld, ids: &mut EntityIds, camera_x: f32) {
        let horizon = camera_x + self.viewport.width + self.lookahead_px;
        while let Some(right) = self.last_right_edge() {
            if right >= horizon {
                break;
            }
            self.push_segment(physics, ids, right);
        }

        while self.segments.len() > 1
            && self
                .segments
                .front()
                .is_some_and(|s| s.right_edge_x() < camera_x)
        {
            if let Some(segment) = self.segments.pop_front() {
                segment.despawn(physics);
            }
        }
    }

    pub fn clear(&mut self, physics: &mut PhysicsWorld) {
        for segment in self.segments.drain(..) {
            segment.despawn(physics);
        }
    }

    fn push_segment(&mut self, physics: &mut PhysicsWorld, ids: &mut EntityIds, left_px: f32) {
        let segment = GroundSegment::spawn(
            physics,
            ids.next_id(),
            left_px,
            self.segment_width_px,
            self.ground_height_px,
            self.viewport.height,
        );
        self.segments.push_back(segment);
    }

    fn last_right_edge(&self) -> Option<f32> {
        self.segments.back().map(|s| s.right_edge_x())
    }

    pub fn segments(&self) -> &VecDeque<GroundSegment> {
        &self.segments
    }

    /// Y of the walkable ground top, in pixels
    pub fn ground_surface_y(&self) -> f32 {
        self.viewport.height - self.ground_height_px
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

/// Pop entities from the front while their right edge is behind the camera.
///
/// Entities must be kept in ascending X order. Returns how many were evicted.
pub fn evict_behind<E: Entity>(
    entities: &mut VecDeque<E>,
    physics: &mut PhysicsWorld,
    camera_x: f32,
) -> usize {
    let mut evicted = 0;
    while entities
        .front()
        .is_some_and(|e| e.right_edge_px(physics) < camera_x)
    {
        if let Some(entity) = entities.pop_front() {
            entity.despawn(physics);
            evicted += 1;
        }
    }
    evicted
}
