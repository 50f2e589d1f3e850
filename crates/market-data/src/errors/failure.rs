/// How the comparison engine treats a failed fetch.
///
/// # Behavior Summary
///
/// | Class | Aborts the run? | Engine sees |
/// |-------|-----------------|-------------|
/// | `DataUnavailable` | No | an empty session window |
/// | `Hard` | Yes | the error, propagated to the caller |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureClass {
    /// The instrument simply has no usable sessions for this request.
    ///
    /// Unknown symbol, empty range, or an upstream timeout. The instrument
    /// is excluded from the comparison and the run continues.
    DataUnavailable,

    /// Transport or provider failure distinct from "no data".
    ///
    /// The current run is aborted; the caller decides whether to retry.
    Hard,
}
