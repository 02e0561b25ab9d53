use crate::calendar::{self, Period, ShiftType, SlotKey, TimeSlot};
use crate::model::{Roster, StaffId};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Grille d'assignation : une case au plus par `SlotKey`.
///
/// Sérialisée comme liste d'enregistrements (une clé JSON ne peut pas être
/// une structure).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<AssignmentRecord>", into = "Vec<AssignmentRecord>")]
pub struct Schedule {
    map: HashMap<SlotKey, StaffId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AssignmentRecord {
    date: NaiveDate,
    shift_type: ShiftType,
    slot: TimeSlot,
    staff: StaffId,
}

impl From<Vec<AssignmentRecord>> for Schedule {
    fn from(records: Vec<AssignmentRecord>) -> Self {
        let map = records
            .into_iter()
            .map(|r| (SlotKey::new(r.date, r.shift_type, r.slot), r.staff))
            .collect();
        Self { map }
    }
}

impl From<Schedule> for Vec<AssignmentRecord> {
    fn from(schedule: Schedule) -> Self {
        let mut records: Vec<AssignmentRecord> = schedule
            .map
            .into_iter()
            .map(|(key, staff)| AssignmentRecord {
                date: key.date,
                shift_type: key.shift_type,
                slot: key.slot,
                staff,
            })
            .collect();
        records.sort_by_key(|r| (r.date, r.shift_type, r.slot));
        records
    }
}

impl Schedule {
    pub fn get(&self, key: &SlotKey) -> Option<&StaffId> {
        self.map.get(key)
    }

    pub fn is_assigned(&self, key: &SlotKey) -> bool {
        self.map.contains_key(key)
    }

    pub fn set(&mut self, key: SlotKey, staff: StaffId) {
        self.map.insert(key, staff);
    }

    pub fn clear(&mut self, key: &SlotKey) -> Option<StaffId> {
        self.map.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotKey, &StaffId)> {
        self.map.iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Nombre d'assignations du membre pour ce type sur le mois.
    pub fn count_for_type(&self, staff: &StaffId, shift_type: ShiftType, year: i32, month: u32) -> u32 {
        self.map
            .iter()
            .filter(|(key, id)| {
                key.shift_type == shift_type && in_month(key, year, month) && *id == staff
            })
            .count() as u32
    }

    /// Nombre total d'assignations du membre sur le mois, tous types.
    pub fn count_total(&self, staff: &StaffId, year: i32, month: u32) -> u32 {
        self.map
            .iter()
            .filter(|(key, id)| in_month(key, year, month) && *id == staff)
            .count() as u32
    }

    /// Le membre tenait-il un créneau de nuit la veille ? Le 1er du mois est
    /// exempt : la veille appartient au snapshot du mois précédent.
    pub fn had_night_before(&self, staff: &StaffId, date: NaiveDate) -> bool {
        if date.day() == 1 {
            return false;
        }
        let Some(previous) = date.checked_sub_days(Days::new(1)) else {
            return false;
        };
        ShiftType::ALL.iter().any(|&shift_type| {
            shift_type
                .time_slots()
                .iter()
                .filter(|slot| slot.is_night())
                .any(|&slot| {
                    self.get(&SlotKey::new(previous, shift_type, slot)) == Some(staff)
                })
        })
    }

    /// Efface, dans le mois cible, toutes les cases des types sélectionnés
    /// (mode régénération).
    pub fn clear_month_types(&mut self, year: i32, month: u32, shift_types: &[ShiftType]) {
        self.map
            .retain(|key, _| !(in_month(key, year, month) && shift_types.contains(&key.shift_type)));
    }
}

fn in_month(key: &SlotKey, year: i32, month: u32) -> bool {
    key.date.year() == year && key.date.month() == month
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
struct ClosureKey {
    date: NaiveDate,
    shift_type: ShiftType,
}

/// Fermetures d'ambulatoires : explicites, plus la fermeture automatique du
/// week-end pour les types hors liste blanche (réouvrable explicitement).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Closures {
    #[serde(default)]
    closed: BTreeSet<ClosureKey>,
    #[serde(default)]
    weekend_open: BTreeSet<ClosureKey>,
}

impl Closures {
    pub fn close(&mut self, date: NaiveDate, shift_type: ShiftType) {
        self.weekend_open.remove(&ClosureKey { date, shift_type });
        self.closed.insert(ClosureKey { date, shift_type });
    }

    /// Lève une fermeture explicite et, le week-end, la fermeture automatique.
    pub fn reopen(&mut self, date: NaiveDate, shift_type: ShiftType) {
        let key = ClosureKey { date, shift_type };
        self.closed.remove(&key);
        if calendar::is_weekend(date) && !shift_type.open_on_weekend() {
            self.weekend_open.insert(key);
        }
    }

    pub fn is_closed(&self, date: NaiveDate, shift_type: ShiftType) -> bool {
        let key = ClosureKey { date, shift_type };
        if self.closed.contains(&key) {
            return true;
        }
        calendar::is_weekend(date)
            && !shift_type.open_on_weekend()
            && !self.weekend_open.contains(&key)
    }
}

/// Indisponibilités déclarées : membre → date → périodes bloquées.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Unavailability {
    by_staff: HashMap<StaffId, BTreeMap<NaiveDate, BTreeSet<Period>>>,
}

impl Unavailability {
    pub fn mark(&mut self, staff: StaffId, date: NaiveDate, period: Period) {
        self.by_staff
            .entry(staff)
            .or_default()
            .entry(date)
            .or_default()
            .insert(period);
    }

    pub fn unmark(&mut self, staff: &StaffId, date: NaiveDate, period: Period) {
        if let Some(days) = self.by_staff.get_mut(staff) {
            if let Some(periods) = days.get_mut(&date) {
                periods.remove(&period);
                if periods.is_empty() {
                    days.remove(&date);
                }
            }
        }
    }

    pub fn is_marked(&self, staff: &StaffId, date: NaiveDate, period: Period) -> bool {
        self.by_staff
            .get(staff)
            .and_then(|days| days.get(&date))
            .is_some_and(|periods| periods.contains(&period))
    }

    /// Un créneau est bloqué dès qu'une de ses périodes l'est.
    pub fn blocks_slot(&self, staff: &StaffId, date: NaiveDate, slot: TimeSlot) -> bool {
        slot.periods()
            .iter()
            .any(|&period| self.is_marked(staff, date, period))
    }
}

/// Snapshot complet manipulé par un run : chargé en début, sauvé en fin.
/// Pas d'état global ; la structure est passée explicitement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanState {
    #[serde(default)]
    pub roster: Roster,
    #[serde(default)]
    pub schedule: Schedule,
    #[serde(default)]
    pub closures: Closures,
    #[serde(default)]
    pub unavailability: Unavailability,
}
