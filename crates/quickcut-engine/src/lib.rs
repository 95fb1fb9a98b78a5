//! QuickCut Engine - Multi-track timeline arrangement
//!
//! Implements the arrangement model for clip editing:
//! - Segments placed on a fixed set of parallel tracks
//! - Pure pointer-to-timeline coordinate mapping
//! - A single-session drag state machine with exact cancellation
//! - Four collision policies for drops onto occupied intervals
//! - An aggregate exposing the committed view that export consumes
//!
//! The engine only ever manipulates references to probed sources; it never
//! touches media bytes, playback, or encoding.

pub mod error;
pub mod mapper;
pub mod resolve;
pub mod segment;
pub mod session;
pub mod source;
pub mod timeline;

pub use error::ArrangeError;
pub use mapper::CoordinateMapper;
pub use resolve::ResolvePolicy;
pub use segment::{Segment, MIN_DURATION};
pub use session::{Arranger, DropOutcome, PendingCollision, ResolveOutcome, SplitPreview};
pub use source::{MemoryCatalog, Source, SourceCatalog};
pub use timeline::Timeline;
