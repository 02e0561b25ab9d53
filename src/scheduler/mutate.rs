use super::types::PlanError;
use crate::calendar::{ShiftType, SlotKey};
use crate::model::StaffId;
use crate::state::PlanState;
use chrono::NaiveDate;

/// Entorse aux règles constatée sur une assignation manuelle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Le membre n'est pas habilité à ce type de garde.
    NotCapable,
    /// Le membre est indisponible sur une période du créneau.
    Unavailable,
}

/// Assignation manuelle (admin) : écrit sans condition, mais remonte les
/// entorses pour que l'appelant avertisse. Le générateur automatique, lui,
/// ne produit jamais d'assignation en entorse.
pub(super) fn assign_manual(
    state: &mut PlanState,
    key: SlotKey,
    staff: &StaffId,
) -> Result<Vec<Violation>, PlanError> {
    let member = state
        .roster
        .find_by_id(staff)
        .ok_or_else(|| PlanError::UnknownStaff(staff.as_str().to_string()))?;

    let mut violations = Vec::new();
    if !member.can_work(key.shift_type) {
        violations.push(Violation::NotCapable);
    }
    if state.unavailability.blocks_slot(staff, key.date, key.slot) {
        violations.push(Violation::Unavailable);
    }

    state.schedule.set(key, staff.clone());
    Ok(violations)
}

pub(super) fn clear_slot(state: &mut PlanState, key: &SlotKey) -> Option<StaffId> {
    state.schedule.clear(key)
}

pub(super) fn close(state: &mut PlanState, date: NaiveDate, shift_type: ShiftType) {
    state.closures.close(date, shift_type);
}

pub(super) fn reopen(state: &mut PlanState, date: NaiveDate, shift_type: ShiftType) {
    state.closures.reopen(date, shift_type);
}
