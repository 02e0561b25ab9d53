use crate::calendar::{self, Period, ShiftType};
use crate::model::{Role, ShiftLimit, Staff, StaffId};
use crate::state::PlanState;
use anyhow::{bail, Context};
use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Import de l'effectif depuis CSV: header
/// `id,name,code,role,specialty,capabilities[,can_do_rep][,limits]`.
/// `capabilities` et `limits` utilisent `|` comme séparateur interne ;
/// un id vide est généré.
pub fn import_staff_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Staff>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(1).context("missing name")?.trim();
        let code = rec.get(2).context("missing code")?.trim();
        if name.is_empty() || code.is_empty() {
            bail!("invalid staff row (empty name or code)");
        }
        let mut member = Staff::new(name.to_string(), code.to_string());
        if let Some(id) = rec.get(0) {
            let id = id.trim();
            if !id.is_empty() {
                member.id = StaffId::new(id);
            }
        }
        member.role = match rec.get(3).map(str::trim) {
            Some("admin") => Role::Admin,
            Some("user") | Some("") | None => Role::User,
            Some(other) => bail!("invalid role for {code}: {other}"),
        };
        if let Some(specialty) = rec.get(4) {
            member.specialty = specialty.trim().to_string();
        }
        let caps = rec.get(5).context("missing capabilities")?;
        member.capabilities = parse_capabilities(caps)
            .with_context(|| format!("invalid capabilities for {code}"))?;
        if let Some(flag) = rec.get(6) {
            let flag = flag.trim();
            if !flag.is_empty() {
                member.can_do_rep = parse_bool(flag)
                    .with_context(|| format!("invalid can_do_rep value for {code}"))?;
            }
        }
        if let Some(raw) = rec.get(7) {
            let raw = raw.trim();
            if !raw.is_empty() {
                member.limits =
                    parse_limits(raw).with_context(|| format!("invalid limits for {code}"))?;
            }
        }
        out.push(member);
    }
    Ok(out)
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "si" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

fn parse_capabilities(raw: &str) -> anyhow::Result<std::collections::BTreeSet<ShiftType>> {
    raw.split('|')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| ShiftType::from_str(chunk).map_err(anyhow::Error::msg))
        .collect()
}

/// Bornes au format `TYPE=min..max` ; `min` vide vaut 0, `max` vide vaut
/// illimité. Exemple: `PS=0..4|REPARTO=1..`.
fn parse_limits(raw: &str) -> anyhow::Result<std::collections::BTreeMap<ShiftType, ShiftLimit>> {
    let mut out = std::collections::BTreeMap::new();
    for chunk in raw.split('|').map(str::trim).filter(|c| !c.is_empty()) {
        let (type_raw, bounds) = chunk
            .split_once('=')
            .with_context(|| format!("expected TYPE=min..max, got {chunk}"))?;
        let shift_type = ShiftType::from_str(type_raw).map_err(anyhow::Error::msg)?;
        let (min_raw, max_raw) = bounds
            .split_once("..")
            .with_context(|| format!("expected min..max bounds, got {bounds}"))?;
        let min = if min_raw.trim().is_empty() {
            0
        } else {
            min_raw.trim().parse().context("invalid min bound")?
        };
        let max = if max_raw.trim().is_empty() {
            None
        } else {
            Some(max_raw.trim().parse().context("invalid max bound")?)
        };
        out.insert(shift_type, ShiftLimit { min, max });
    }
    Ok(out)
}

/// Une ligne d'indisponibilité importée.
#[derive(Debug, Clone)]
pub struct UnavailabilityEntry {
    pub staff: StaffId,
    pub date: NaiveDate,
    pub periods: Vec<Period>,
}

/// Import d'indisponibilités: header `staff_id,date,periods` ; `periods`
/// est une liste `|`-séparée parmi mattina/pomeriggio/notte.
pub fn import_unavailability_csv<P: AsRef<Path>>(
    path: P,
) -> anyhow::Result<Vec<UnavailabilityEntry>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let staff = rec.get(0).context("missing staff_id")?.trim();
        let date = rec.get(1).context("missing date")?.trim();
        let periods = rec.get(2).context("missing periods")?.trim();
        if staff.is_empty() {
            bail!("invalid unavailability row (empty staff_id)");
        }
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("invalid date: {date}"))?;
        let periods: Vec<Period> = periods
            .split('|')
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| Period::from_str(chunk).map_err(anyhow::Error::msg))
            .collect::<anyhow::Result<_>>()?;
        if periods.is_empty() {
            bail!("invalid unavailability row (no period) for {staff}");
        }
        out.push(UnavailabilityEntry {
            staff: StaffId::new(staff),
            date,
            periods,
        });
    }
    Ok(out)
}

/// Export CSV de la grille du mois: une ligne par jour, une colonne par
/// (type, créneau). Code du membre assigné, `CHIUSO` si fermé, vide sinon.
pub fn export_schedule_csv<P: AsRef<Path>>(
    path: P,
    state: &PlanState,
    year: i32,
    month: u32,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(false).from_path(path)?;

    let mut header = vec!["Data".to_string()];
    for shift_type in ShiftType::ALL {
        for slot in shift_type.time_slots() {
            header.push(format!("{shift_type} {slot}"));
        }
    }
    w.write_record(&header)?;

    for date in calendar::month_days(year, month) {
        let mut row = vec![format!("{} {}", date.day(), date.weekday())];
        for shift_type in ShiftType::ALL {
            let closed = state.closures.is_closed(date, shift_type);
            for &slot in shift_type.time_slots() {
                if closed {
                    row.push("CHIUSO".to_string());
                    continue;
                }
                let key = calendar::SlotKey::new(date, shift_type, slot);
                let code = state
                    .schedule
                    .get(&key)
                    .and_then(|id| state.roster.find_by_id(id))
                    .map(|member| member.code.clone())
                    .unwrap_or_default();
                row.push(code);
            }
        }
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}

/// Export JSON de l'état complet (jolie mise en forme)
pub fn export_state_json<P: AsRef<Path>>(path: P, state: &PlanState) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(state)?;
    fs::write(path, s)?;
    Ok(())
}
