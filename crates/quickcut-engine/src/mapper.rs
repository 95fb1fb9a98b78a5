//! Pointer-space to timeline-space conversion.
//!
//! "Content" coordinates are screen coordinates already corrected for the
//! horizontal scroll offset and the pointer's grab offset within a segment,
//! so a segment's left edge (not the pointer) defines its position. The
//! mapper has no hidden state: the same inputs always produce the same
//! outputs. Out-of-range input is clamped here and never reaches the model.

use glam::Vec2;
use quickcut_core::Seconds;

/// Horizontal scale at zoom 1.0.
pub const BASE_PIXELS_PER_SECOND: f32 = 50.0;

/// Stateless pixel/time/track converter.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
    /// Zoom-scaled horizontal resolution
    pub pixels_per_second: f32,
    /// Height of one track lane
    pub track_height: f32,
    /// Vertical gap between lanes
    pub track_margin: f32,
    /// Number of tracks the timeline shows
    pub num_tracks: usize,
}

impl CoordinateMapper {
    /// Create a mapper at the given zoom factor.
    pub fn new(zoom: f32, track_height: f32, track_margin: f32, num_tracks: usize) -> Self {
        Self {
            pixels_per_second: BASE_PIXELS_PER_SECOND * zoom,
            track_height,
            track_margin,
            num_tracks,
        }
    }

    /// Timeline time at a content-space x. Negative x clamps to zero.
    pub fn time_from_content_x(&self, x: f32) -> Seconds {
        Seconds::from_f64((x.max(0.0) / self.pixels_per_second) as f64)
    }

    /// Track index at a content-space y, clamped into `[0, num_tracks)`.
    pub fn track_from_content_y(&self, y: f32) -> usize {
        let lane = self.track_height + self.track_margin;
        let index = (y / lane).floor() as i64;
        index.clamp(0, self.num_tracks.saturating_sub(1) as i64) as usize
    }

    /// Content-space x of a timeline time.
    pub fn content_x_from_time(&self, time: Seconds) -> f32 {
        time.to_f64() as f32 * self.pixels_per_second
    }

    /// Content-space y of a track's top edge.
    pub fn content_y_from_track(&self, track_index: usize) -> f32 {
        track_index as f32 * (self.track_height + self.track_margin)
    }

    /// Content-space position of a segment placed at (time, track).
    pub fn content_pos(&self, time: Seconds, track_index: usize) -> Vec2 {
        Vec2::new(
            self.content_x_from_time(time),
            self.content_y_from_track(track_index),
        )
    }
}
