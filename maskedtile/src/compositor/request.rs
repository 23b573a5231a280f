//! Tile composition requests and their lifecycle states.

use std::fmt;

use super::state::LayerSnapshot;
use crate::coord::TileCoord;
use crate::source::SourceTemplate;

/// Everything fixed at the moment a tile is requested.
///
/// Only the source is captured here. Mask and filter are read from the
/// layer when compositing runs, so changes made while the fetch is in
/// flight still apply to its result.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionRequest {
    coord: TileCoord,
    source: Option<SourceTemplate>,
    source_version: u64,
}

impl CompositionRequest {
    pub fn new(coord: TileCoord, snapshot: &LayerSnapshot) -> Self {
        Self {
            coord,
            source: snapshot.source.clone(),
            source_version: snapshot.source_version,
        }
    }

    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    pub fn source(&self) -> Option<&SourceTemplate> {
        self.source.as_ref()
    }

    pub fn source_version(&self) -> u64 {
        self.source_version
    }
}

/// Lifecycle of one tile request.
///
/// ```text
/// Pending → Loaded → Clipped → Filtered → Ready
///    ↘ Failed → Blank
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileState {
    Pending,
    Loaded,
    Clipped,
    Filtered,
    Ready,
    Failed,
    Blank,
}

impl TileState {
    /// True for the two states a request ends in.
    pub fn is_terminal(self) -> bool {
        matches!(self, TileState::Ready | TileState::Blank)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: TileState) -> bool {
        use TileState::*;
        matches!(
            (self, next),
            (Pending, Loaded)
                | (Loaded, Clipped)
                | (Clipped, Filtered)
                | (Filtered, Ready)
                | (Pending, Failed)
                | (Loaded, Failed)
                | (Clipped, Failed)
                | (Failed, Blank)
        )
    }
}

impl fmt::Display for TileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TileState::Pending => "PENDING",
            TileState::Loaded => "LOADED",
            TileState::Clipped => "CLIPPED",
            TileState::Filtered => "FILTERED",
            TileState::Ready => "READY",
            TileState::Failed => "FAILED",
            TileState::Blank => "BLANK",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_captures_source() {
        let snapshot = LayerSnapshot {
            version: 4,
            source_version: 3,
            source: Some(SourceTemplate::new("tiles/{z}/{x}/{y}.png").unwrap()),
            ..LayerSnapshot::default()
        };
        let request = CompositionRequest::new(TileCoord::new(2, 1, 1), &snapshot);

        assert_eq!(request.coord(), TileCoord::new(2, 1, 1));
        assert_eq!(request.source_version(), 3);
        assert_eq!(request.source().unwrap().as_str(), "tiles/{z}/{x}/{y}.png");
    }

    #[test]
    fn test_success_path_transitions() {
        use TileState::*;
        let path = [Pending, Loaded, Clipped, Filtered, Ready];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
        assert!(Ready.is_terminal());
    }

    #[test]
    fn test_failure_path_transitions() {
        use TileState::*;
        assert!(Pending.can_transition_to(Failed));
        assert!(Failed.can_transition_to(Blank));
        assert!(Blank.is_terminal());
        assert!(!Failed.is_terminal());
    }

    #[test]
    fn test_illegal_transitions() {
        use TileState::*;
        assert!(!Pending.can_transition_to(Ready));
        assert!(!Ready.can_transition_to(Pending));
        assert!(!Blank.can_transition_to(Ready));
        assert!(!Filtered.can_transition_to(Blank));
    }
}
