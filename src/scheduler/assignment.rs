use super::types::{PlanError, RunMode, RunOptions, RunReport, UnassignedReason, UnassignedSlot};
use super::{balance, continuity, eligibility};
use crate::calendar::{self, ShiftType, SlotKey};
use crate::model::StaffId;
use crate::state::PlanState;
use chrono::NaiveDate;
use rand::Rng;

/// Remplit la grille du mois. Jours dans l'ordre, types par priorité (PS et
/// RAP d'abord), nuits avant le reste d'un même type. Une case sans candidat
/// est consignée et le run continue.
pub(super) fn run<R: Rng + ?Sized>(
    state: &mut PlanState,
    year: i32,
    month: u32,
    options: &RunOptions,
    rng: &mut R,
) -> Result<RunReport, PlanError> {
    if options.shift_types.is_empty() {
        return Err(PlanError::EmptySelection);
    }
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(PlanError::InvalidMonth { year, month })?;

    if options.mode == RunMode::Regenerate {
        state
            .schedule
            .clear_month_types(year, month, &options.shift_types);
    }

    let order: Vec<ShiftType> = ShiftType::priority_order()
        .into_iter()
        .filter(|t| options.shift_types.contains(t))
        .collect();

    #[cfg(feature = "logging")]
    tracing::debug!(year, month, types = order.len(), "starting assignment run");

    let mut report = RunReport::default();

    for date in calendar::month_days(year, month) {
        for &shift_type in &order {
            if state.closures.is_closed(date, shift_type) {
                continue;
            }
            let mut slots = shift_type.time_slots().to_vec();
            slots.sort_by_key(|slot| !slot.is_night());

            for slot in slots {
                let key = SlotKey::new(date, shift_type, slot);
                if state.schedule.is_assigned(&key) {
                    continue;
                }

                let chosen: Option<StaffId> = {
                    let pinned = continuity::pinned_candidate(&key, &state.schedule);
                    let mut candidates = eligibility::eligible_staff(&key, state);
                    if let Some(pin) = pinned {
                        if let Some(&preferred) = candidates.iter().find(|s| s.id == pin) {
                            candidates = vec![preferred];
                        }
                    }
                    balance::select_candidate(&candidates, &key, &state.schedule, rng)
                        .map(|staff| staff.id.clone())
                };

                match chosen {
                    Some(staff) => {
                        state.schedule.set(key, staff);
                        report.assigned += 1;
                    }
                    None => report.unassigned.push(UnassignedSlot {
                        key,
                        reason: UnassignedReason::NoEligibleStaff,
                    }),
                }
            }
        }
    }

    #[cfg(feature = "logging")]
    tracing::debug!(
        assigned = report.assigned,
        unassigned = report.unassigned.len(),
        "assignment run finished"
    );

    Ok(report)
}
