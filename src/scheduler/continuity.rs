use crate::calendar::{ShiftType, SlotKey, TimeSlot};
use crate::model::StaffId;
use crate::state::Schedule;
use chrono::{Datelike, Days, Weekday};

/// Candidat imposé par une règle de continuité, s'il existe.
///
/// - RAP week-end : le bloc vendredi-nuit → lundi-matin reste au même
///   membre ; samedi comme dimanche relisent la nuit du vendredi. Pas la
///   nuit du samedi pour le dimanche : son titulaire sort de nuit et le
///   repos post-nuit l'exclurait systématiquement.
/// - UTIC week-end : l'après-midi revient au titulaire du matin.
///
/// Un candidat épinglé devenu inéligible est ignoré par l'appelant, sans
/// erreur.
pub(super) fn pinned_candidate(key: &SlotKey, schedule: &Schedule) -> Option<StaffId> {
    match key.shift_type {
        ShiftType::Rap => weekend_rap_pin(key, schedule),
        ShiftType::Utic => weekend_utic_pin(key, schedule),
        _ => None,
    }
}

fn weekend_rap_pin(key: &SlotKey, schedule: &Schedule) -> Option<StaffId> {
    let back = match key.date.weekday() {
        Weekday::Sat => 1,
        Weekday::Sun => 2,
        _ => return None,
    };
    let previous = key.date.checked_sub_days(Days::new(back))?;
    let night = SlotKey::new(previous, ShiftType::Rap, TimeSlot::Ntt);
    schedule.get(&night).cloned()
}

fn weekend_utic_pin(key: &SlotKey, schedule: &Schedule) -> Option<StaffId> {
    if key.slot != TimeSlot::Pom || !crate::calendar::is_weekend(key.date) {
        return None;
    }
    let morning = SlotKey::new(key.date, ShiftType::Utic, TimeSlot::Matt);
    schedule.get(&morning).cloned()
}
