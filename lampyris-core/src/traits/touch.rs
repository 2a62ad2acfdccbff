//! Touch source trait
//!
//! The badge's capacitive sensing is handled by an external library;
//! the core only consumes its state reports. Modelling the library as
//! an injected source keeps the core free of any compile-time
//! dependency on a specific sensing implementation.

/// One state report from the touch sensing library.
///
/// The core derives press/release edges from the XOR of the two
/// booleans; a report where both match is not an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchReport {
    /// Electrode currently read as touched.
    pub touched: bool,
    /// Electrode state at the previous report.
    pub previously_touched: bool,
}

/// Trait for the touch sensing collaborator.
///
/// The dispatcher calls [`update`](Self::update) when the library's own
/// housekeeping timer flag is pending. The implementation runs its
/// measurement/debounce routine and reports the electrode state; the
/// core turns that into button edges.
pub trait TouchSource {
    /// Run one housekeeping pass. Returns the current state report, or
    /// `None` when no measurement completed this pass.
    fn update(&mut self) -> Option<TouchReport>;
}
