use crate::calendar::ShiftType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Identifiant fort pour Staff
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StaffId(String);

impl StaffId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rôle applicatif (l'admin seul déclenche les régénérations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "user")]
    User,
}

/// Bornes mensuelles d'assignation pour un type de garde.
/// `min` est déclaratif (jamais imposé par le générateur) ; `max` absent =
/// illimité.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftLimit {
    #[serde(default)]
    pub min: u32,
    #[serde(default)]
    pub max: Option<u32>,
}

/// Membre du personnel médical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub name: String,
    /// Code court affiché dans la grille (ex. "BRA").
    pub code: String,
    pub role: Role,
    /// Spécialité libre ; "Cardiologo" est la catégorie généraliste que la
    /// règle de repli RAP reconnaît.
    #[serde(default)]
    pub specialty: String,
    pub capabilities: BTreeSet<ShiftType>,
    /// Habilitation à la réperibilité (garde RAP à domicile).
    #[serde(default)]
    pub can_do_rep: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub limits: BTreeMap<ShiftType, ShiftLimit>,
}

impl Staff {
    pub fn new<N: Into<String>, C: Into<String>>(name: N, code: C) -> Self {
        Self {
            id: StaffId::random(),
            name: name.into(),
            code: code.into(),
            role: Role::User,
            specialty: String::new(),
            capabilities: BTreeSet::new(),
            can_do_rep: false,
            limits: BTreeMap::new(),
        }
    }

    pub fn can_work(&self, shift_type: ShiftType) -> bool {
        self.capabilities.contains(&shift_type)
    }

    pub fn max_for(&self, shift_type: ShiftType) -> Option<u32> {
        self.limits.get(&shift_type).and_then(|l| l.max)
    }
}

/// Effectif complet du service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    pub staff: Vec<Staff>,
}

impl Roster {
    pub fn find_by_id<'a>(&'a self, id: &StaffId) -> Option<&'a Staff> {
        self.staff.iter().find(|s| &s.id == id)
    }
    pub fn find_by_code<'a>(&'a self, code: &str) -> Option<&'a Staff> {
        self.staff.iter().find(|s| s.code == code)
    }
    pub fn find_mut_by_id(&mut self, id: &StaffId) -> Option<&mut Staff> {
        self.staff.iter_mut().find(|s| &s.id == id)
    }
}
