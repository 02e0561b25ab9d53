#![forbid(unsafe_code)]
//! Turni — bibliothèque de planification mensuelle des gardes hospitalières (sans BD).
//!
//! - Stockage fichiers (JSON/CSV).
//! - Assignation automatique sous contraintes (habilitations, indisponibilités,
//!   plafonds mensuels, continuité week-end, équilibrage de charge).
//! - Calcul sur dates civiles ; affichage en dehors de la lib.

pub mod calendar;
pub mod io;
pub mod model;
pub mod report;
pub mod scheduler;
pub mod state;
pub mod storage;

pub use calendar::{Period, ShiftType, SlotKey, TimeSlot};
pub use model::{Role, Roster, ShiftLimit, Staff, StaffId};
pub use report::{summarize, RunSummary, StaffLoad};
pub use scheduler::{
    PlanError, Planner, RunMode, RunOptions, RunReport, UnassignedReason, UnassignedSlot,
    Violation,
};
pub use state::{Closures, PlanState, Schedule, Unavailability};
pub use storage::{JsonStorage, Storage};
