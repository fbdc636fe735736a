//! Viewer lifecycle
//!
//! `Uninitialized -> AwaitingAsset -> Framed`, with `LoadFailed` reachable only
//! from `AwaitingAsset`. Both `Framed` and `LoadFailed` are terminal.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewerPhase {
    #[default]
    Uninitialized,
    AwaitingAsset,
    /// Asset centered, scaled, framed and animating
    Framed,
    LoadFailed,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid viewer transition: {from:?} -> {to:?}")]
pub struct PhaseError {
    pub from: ViewerPhase,
    pub to: ViewerPhase,
}

impl ViewerPhase {
    fn transition(&mut self, expected: ViewerPhase, to: ViewerPhase) -> Result<(), PhaseError> {
        if *self != expected {
            return Err(PhaseError { from: *self, to });
        }
        *self = to;
        Ok(())
    }

    /// The load request has been issued
    pub fn begin_loading(&mut self) -> Result<(), PhaseError> {
        self.transition(ViewerPhase::Uninitialized, ViewerPhase::AwaitingAsset)
    }

    pub fn frame(&mut self) -> Result<(), PhaseError> {
        self.transition(ViewerPhase::AwaitingAsset, ViewerPhase::Framed)
    }

    pub fn fail(&mut self) -> Result<(), PhaseError> {
        self.transition(ViewerPhase::AwaitingAsset, ViewerPhase::LoadFailed)
    }

    pub fn is_animating(&self) -> bool {
        *self == ViewerPhase::Framed
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ViewerPhase::Framed | ViewerPhase::LoadFailed)
    }
}
