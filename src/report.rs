use crate::model::{Roster, StaffId};
use crate::scheduler::UnassignedSlot;
use crate::state::Schedule;

/// Charge d'un membre sur le mois cible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffLoad {
    pub id: StaffId,
    pub code: String,
    pub shifts: u32,
}

/// Bilan d'un run, purement dérivé de l'état.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub assigned: u32,
    pub unassigned: u32,
    /// Part des cases traitées effectivement remplies, dans [0, 1].
    pub success_rate: f64,
    pub per_staff: Vec<StaffLoad>,
}

/// Résume un run : compteurs plus distribution par membre. Seules les
/// assignations datées du mois cible comptent, la grille pouvant contenir
/// d'autres mois.
pub fn summarize(
    schedule: &Schedule,
    unassigned: &[UnassignedSlot],
    roster: &Roster,
    assigned: u32,
    year: i32,
    month: u32,
) -> RunSummary {
    let errors = unassigned.len() as u32;
    let attempted = assigned + errors;
    let success_rate = if attempted == 0 {
        1.0
    } else {
        f64::from(assigned) / f64::from(attempted)
    };

    let mut per_staff: Vec<StaffLoad> = roster
        .staff
        .iter()
        .map(|member| StaffLoad {
            id: member.id.clone(),
            code: member.code.clone(),
            shifts: schedule.count_total(&member.id, year, month),
        })
        .collect();
    per_staff.sort_by(|a, b| b.shifts.cmp(&a.shifts).then_with(|| a.code.cmp(&b.code)));

    RunSummary {
        assigned,
        unassigned: errors,
        success_rate,
        per_staff,
    }
}
