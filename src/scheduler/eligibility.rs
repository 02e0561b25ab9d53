use crate::calendar::{ShiftType, SlotKey, TimeSlot};
use crate::model::Staff;
use crate::state::PlanState;
use chrono::Datelike;

/// Catégorie généraliste admise en repli sur la RAP.
const GENERALIST_SPECIALTY: &str = "Cardiologo";

/// Sous-ensemble de l'effectif légalement assignable à la case.
///
/// Tous les prédicats doivent tenir : habilitation au type, disponibilité
/// sur les périodes du créneau, plafond mensuel non atteint, pas de garde le
/// lendemain d'une nuit, et la règle spéciale RAP.
pub(super) fn eligible_staff<'a>(key: &SlotKey, state: &'a PlanState) -> Vec<&'a Staff> {
    let year = key.date.year();
    let month = key.date.month();
    state
        .roster
        .staff
        .iter()
        .filter(|staff| {
            if !staff.can_work(key.shift_type) {
                return false;
            }
            if state.unavailability.blocks_slot(&staff.id, key.date, key.slot) {
                return false;
            }
            if reached_limit(staff, key, state, year, month) {
                return false;
            }
            if state.schedule.had_night_before(&staff.id, key.date) {
                return false;
            }
            if key.shift_type == ShiftType::Rap {
                return rap_eligible(staff, key, state);
            }
            true
        })
        .collect()
}

fn reached_limit(
    staff: &Staff,
    key: &SlotKey,
    state: &PlanState,
    year: i32,
    month: u32,
) -> bool {
    match staff.max_for(key.shift_type) {
        Some(max) => state.schedule.count_for_type(&staff.id, key.shift_type, year, month) >= max,
        None => false,
    }
}

/// Règle RAP : les habilités REP passent toujours ; un cardiologue ne passe
/// que si la nuit PS/RAP du même jour est déjà tenue par un habilité REP.
fn rap_eligible(staff: &Staff, key: &SlotKey, state: &PlanState) -> bool {
    if staff.can_do_rep {
        return true;
    }
    if rep_covered_night(key, state) {
        return staff.specialty == GENERALIST_SPECIALTY;
    }
    false
}

fn rep_covered_night(key: &SlotKey, state: &PlanState) -> bool {
    [ShiftType::Ps, ShiftType::Rap].iter().any(|&shift_type| {
        let night = SlotKey::new(key.date, shift_type, TimeSlot::Ntt);
        state
            .schedule
            .get(&night)
            .and_then(|id| state.roster.find_by_id(id))
            .is_some_and(|assigned| assigned.can_do_rep)
    })
}
