use crate::statelib::membership::PendingToggle;

/// Outcome of a single add/remove request. The pending toggle is handed back unchanged so that the
/// receiving component can tell whether the response is still the latest one for its pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SetMembershipResponse {
    pub pending: PendingToggle,
    pub result: Result<(), String>,
}
