mod assignment;
mod balance;
mod continuity;
mod eligibility;
mod mutate;
mod types;

pub use mutate::Violation;
pub use types::{PlanError, RunMode, RunOptions, RunReport, UnassignedReason, UnassignedSlot};

use crate::calendar::{ShiftType, SlotKey};
use crate::model::StaffId;
use crate::state::PlanState;
use chrono::NaiveDate;
use rand::Rng;

/// Planner : encapsule le snapshot d'état en cours de construction
#[derive(Debug, Default)]
pub struct Planner {
    state: PlanState,
}

impl Planner {
    pub fn new() -> Self {
        Self {
            state: PlanState::default(),
        }
    }

    pub fn with_state(state: PlanState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &PlanState {
        &self.state
    }
    pub fn state_mut(&mut self) -> &mut PlanState {
        &mut self.state
    }
    pub fn into_state(self) -> PlanState {
        self.state
    }

    /// Remplit la grille du mois cible. Un seul run à la fois sur un état
    /// donné ; l'appelant sérialise les invocations.
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        year: i32,
        month: u32,
        options: &RunOptions,
        rng: &mut R,
    ) -> Result<RunReport, PlanError> {
        assignment::run(&mut self.state, year, month, options, rng)
    }

    pub fn assign_manual(
        &mut self,
        key: SlotKey,
        staff: &StaffId,
    ) -> Result<Vec<Violation>, PlanError> {
        mutate::assign_manual(&mut self.state, key, staff)
    }

    pub fn clear_slot(&mut self, key: &SlotKey) -> Option<StaffId> {
        mutate::clear_slot(&mut self.state, key)
    }

    pub fn close(&mut self, date: NaiveDate, shift_type: ShiftType) {
        mutate::close(&mut self.state, date, shift_type);
    }

    pub fn reopen(&mut self, date: NaiveDate, shift_type: ShiftType) {
        mutate::reopen(&mut self.state, date, shift_type);
    }
}
