use crate::calendar::{ShiftType, SlotKey};
use thiserror::Error;

/// Mode d'exécution du générateur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Ne touche que les cases vides.
    FillRemaining,
    /// Vide d'abord les cases du mois pour les types sélectionnés, puis remplit.
    Regenerate,
}

/// Options d'un run d'assignation automatique.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub mode: RunMode,
    /// Types de garde traités, dans n'importe quel ordre ; le générateur
    /// applique son propre ordre de priorité. Vide = configuration invalide.
    pub shift_types: Vec<ShiftType>,
}

impl RunOptions {
    pub fn fill_remaining() -> Self {
        Self {
            mode: RunMode::FillRemaining,
            shift_types: ShiftType::ALL.to_vec(),
        }
    }

    pub fn regenerate(shift_types: Vec<ShiftType>) -> Self {
        Self {
            mode: RunMode::Regenerate,
            shift_types,
        }
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::fill_remaining()
    }
}

/// Case restée vide faute de candidat : donnée du résultat, pas une erreur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnassignedSlot {
    pub key: SlotKey,
    pub reason: UnassignedReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnassignedReason {
    /// Aucun membre ne passe le filtre d'éligibilité.
    NoEligibleStaff,
}

impl UnassignedReason {
    pub fn label(self) -> &'static str {
        match self {
            UnassignedReason::NoEligibleStaff => "nessun utente disponibile",
        }
    }
}

/// Résultat d'un run : compteurs plus la liste des cases non remplies.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub assigned: u32,
    pub unassigned: Vec<UnassignedSlot>,
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("no shift type selected for generation")]
    EmptySelection,
    #[error("invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("unknown staff member: {0}")]
    UnknownStaff(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
