use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catégories de garde du service (configuration statique, jamais mutée).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShiftType {
    #[serde(rename = "SALA Senior")]
    SalaSenior,
    #[serde(rename = "SALA Junior")]
    SalaJunior,
    #[serde(rename = "REPARTO")]
    Reparto,
    #[serde(rename = "UTIC")]
    Utic,
    #[serde(rename = "PS")]
    Ps,
    #[serde(rename = "RAP")]
    Rap,
    #[serde(rename = "ENI")]
    Eni,
    #[serde(rename = "VIS 201")]
    Vis201,
    #[serde(rename = "VISITE 208")]
    Visite208,
    #[serde(rename = "TDS 207")]
    Tds207,
    #[serde(rename = "ECOTT 205")]
    Ecott205,
    #[serde(rename = "ECO 206")]
    Eco206,
    #[serde(rename = "ECO spec 204")]
    EcoSpec204,
    #[serde(rename = "ECO INT")]
    EcoInt,
    #[serde(rename = "CARDIOCHIR")]
    Cardiochir,
    #[serde(rename = "Vicenza")]
    Vicenza,
    #[serde(rename = "Ricerca")]
    Ricerca,
    #[serde(rename = "RISERVE")]
    Riserve,
}

impl ShiftType {
    pub const ALL: [ShiftType; 18] = [
        ShiftType::SalaSenior,
        ShiftType::SalaJunior,
        ShiftType::Reparto,
        ShiftType::Utic,
        ShiftType::Ps,
        ShiftType::Rap,
        ShiftType::Eni,
        ShiftType::Vis201,
        ShiftType::Visite208,
        ShiftType::Tds207,
        ShiftType::Ecott205,
        ShiftType::Eco206,
        ShiftType::EcoSpec204,
        ShiftType::EcoInt,
        ShiftType::Cardiochir,
        ShiftType::Vicenza,
        ShiftType::Ricerca,
        ShiftType::Riserve,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ShiftType::SalaSenior => "SALA Senior",
            ShiftType::SalaJunior => "SALA Junior",
            ShiftType::Reparto => "REPARTO",
            ShiftType::Utic => "UTIC",
            ShiftType::Ps => "PS",
            ShiftType::Rap => "RAP",
            ShiftType::Eni => "ENI",
            ShiftType::Vis201 => "VIS 201",
            ShiftType::Visite208 => "VISITE 208",
            ShiftType::Tds207 => "TDS 207",
            ShiftType::Ecott205 => "ECOTT 205",
            ShiftType::Eco206 => "ECO 206",
            ShiftType::EcoSpec204 => "ECO spec 204",
            ShiftType::EcoInt => "ECO INT",
            ShiftType::Cardiochir => "CARDIOCHIR",
            ShiftType::Vicenza => "Vicenza",
            ShiftType::Ricerca => "Ricerca",
            ShiftType::Riserve => "RISERVE",
        }
    }

    /// Créneaux du type, dans l'ordre d'affichage du planning.
    pub fn time_slots(self) -> &'static [TimeSlot] {
        use TimeSlot::*;
        match self {
            ShiftType::SalaSenior
            | ShiftType::SalaJunior
            | ShiftType::Utic
            | ShiftType::Visite208
            | ShiftType::Tds207
            | ShiftType::Ecott205
            | ShiftType::EcoInt
            | ShiftType::Cardiochir
            | ShiftType::Riserve => &[Matt, Pom],
            ShiftType::Reparto => &[Matt1, Matt2, Matt3, Pom1, Pom2, Pom3],
            ShiftType::Ps | ShiftType::Rap => &[Gg, Ntt],
            ShiftType::Eni => &[H8_13, Spec, H14_18],
            ShiftType::Vis201 => &[Spec],
            ShiftType::Eco206 | ShiftType::EcoSpec204 => &[Matt, Pom, Ss],
            ShiftType::Vicenza | ShiftType::Ricerca => &[Gg],
        }
    }

    /// Seuls UTIC, PS et RAP tournent le week-end sans réouverture explicite.
    pub fn open_on_weekend(self) -> bool {
        matches!(self, ShiftType::Utic | ShiftType::Ps | ShiftType::Rap)
    }

    /// Ordre de traitement du générateur : PS et RAP d'abord (la règle de
    /// repli des cardiologues sur la RAP lit l'assignation de nuit du jour).
    pub fn priority_order() -> Vec<ShiftType> {
        let mut order = vec![ShiftType::Ps, ShiftType::Rap];
        order.extend(
            Self::ALL
                .iter()
                .copied()
                .filter(|t| !matches!(t, ShiftType::Ps | ShiftType::Rap)),
        );
        order
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ShiftType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown shift type: {s}"))
    }
}

/// Créneau horaire d'un type de garde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "MATT")]
    Matt,
    #[serde(rename = "MATT 1")]
    Matt1,
    #[serde(rename = "MATT 2")]
    Matt2,
    #[serde(rename = "MATT 3")]
    Matt3,
    #[serde(rename = "POM")]
    Pom,
    #[serde(rename = "POM 1")]
    Pom1,
    #[serde(rename = "POM 2")]
    Pom2,
    #[serde(rename = "POM 3")]
    Pom3,
    #[serde(rename = "GG")]
    Gg,
    #[serde(rename = "NTT")]
    Ntt,
    #[serde(rename = "h 8-13")]
    H8_13,
    #[serde(rename = "h 14-18")]
    H14_18,
    #[serde(rename = "SPEC")]
    Spec,
    #[serde(rename = "SS")]
    Ss,
}

impl TimeSlot {
    pub fn label(self) -> &'static str {
        match self {
            TimeSlot::Matt => "MATT",
            TimeSlot::Matt1 => "MATT 1",
            TimeSlot::Matt2 => "MATT 2",
            TimeSlot::Matt3 => "MATT 3",
            TimeSlot::Pom => "POM",
            TimeSlot::Pom1 => "POM 1",
            TimeSlot::Pom2 => "POM 2",
            TimeSlot::Pom3 => "POM 3",
            TimeSlot::Gg => "GG",
            TimeSlot::Ntt => "NTT",
            TimeSlot::H8_13 => "h 8-13",
            TimeSlot::H14_18 => "h 14-18",
            TimeSlot::Spec => "SPEC",
            TimeSlot::Ss => "SS",
        }
    }

    pub fn is_night(self) -> bool {
        matches!(self, TimeSlot::Ntt)
    }

    /// Périodes de disponibilité couvertes par le créneau. GG couvre la
    /// journée entière (matin + après-midi).
    pub fn periods(self) -> &'static [Period] {
        match self {
            TimeSlot::Matt
            | TimeSlot::Matt1
            | TimeSlot::Matt2
            | TimeSlot::Matt3
            | TimeSlot::H8_13 => &[Period::Mattina],
            TimeSlot::Pom
            | TimeSlot::Pom1
            | TimeSlot::Pom2
            | TimeSlot::Pom3
            | TimeSlot::H14_18
            | TimeSlot::Spec
            | TimeSlot::Ss => &[Period::Pomeriggio],
            TimeSlot::Ntt => &[Period::Notte],
            TimeSlot::Gg => &[Period::Mattina, Period::Pomeriggio],
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [TimeSlot; 14] = [
            TimeSlot::Matt,
            TimeSlot::Matt1,
            TimeSlot::Matt2,
            TimeSlot::Matt3,
            TimeSlot::Pom,
            TimeSlot::Pom1,
            TimeSlot::Pom2,
            TimeSlot::Pom3,
            TimeSlot::Gg,
            TimeSlot::Ntt,
            TimeSlot::H8_13,
            TimeSlot::H14_18,
            TimeSlot::Spec,
            TimeSlot::Ss,
        ];
        ALL.iter()
            .copied()
            .find(|slot| slot.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown time slot: {s}"))
    }
}

/// Période de disponibilité déclarée par le personnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "mattina")]
    Mattina,
    #[serde(rename = "pomeriggio")]
    Pomeriggio,
    #[serde(rename = "notte")]
    Notte,
}

impl Period {
    pub fn label(self) -> &'static str {
        match self {
            Period::Mattina => "mattina",
            Period::Pomeriggio => "pomeriggio",
            Period::Notte => "notte",
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mattina" | "matt" | "m" => Ok(Period::Mattina),
            "pomeriggio" | "pom" | "p" => Ok(Period::Pomeriggio),
            "notte" | "ntt" | "n" => Ok(Period::Notte),
            _ => Err(format!("unknown period: {s}")),
        }
    }
}

/// Identité d'une case du planning : (date, type de garde, créneau).
/// Clé structurée, pas de concaténation de chaînes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub date: NaiveDate,
    pub shift_type: ShiftType,
    pub slot: TimeSlot,
}

impl SlotKey {
    pub fn new(date: NaiveDate, shift_type: ShiftType, slot: TimeSlot) -> Self {
        Self {
            date,
            shift_type,
            slot,
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.date, self.shift_type, self.slot)
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or_else(|| panic!("invalid year/month: {year}-{month}"));
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("valid first of next month");
    next.signed_duration_since(first).num_days() as u32
}

/// Itère tous les jours du mois, dans l'ordre.
pub fn month_days(year: i32, month: u32) -> impl Iterator<Item = NaiveDate> {
    (1..=days_in_month(year, month))
        .map(move |day| NaiveDate::from_ymd_opt(year, month, day).expect("valid day of month"))
}
