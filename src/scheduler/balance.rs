use crate::calendar::SlotKey;
use crate::model::Staff;
use crate::state::Schedule;
use chrono::Datelike;
use rand::Rng;

/// Choisit le candidat le moins chargé.
///
/// Tri croissant sur (assignations du type sur le mois, assignations totales
/// sur le mois), départagé par un tirage uniforme pour ne pas favoriser
/// l'ordre de déclaration de l'effectif. Le générateur est injecté : les
/// tests le fixent, la production le sème depuis l'entropie.
pub(super) fn select_candidate<'a, R: Rng + ?Sized>(
    candidates: &[&'a Staff],
    key: &SlotKey,
    schedule: &Schedule,
    rng: &mut R,
) -> Option<&'a Staff> {
    let year = key.date.year();
    let month = key.date.month();
    let mut ranked: Vec<(u32, u32, u64, &Staff)> = candidates
        .iter()
        .map(|staff| {
            let by_type = schedule.count_for_type(&staff.id, key.shift_type, year, month);
            let total = schedule.count_total(&staff.id, year, month);
            (by_type, total, rng.gen::<u64>(), *staff)
        })
        .collect();
    ranked.sort_by_key(|&(by_type, total, tie, _)| (by_type, total, tie));
    ranked.first().map(|&(_, _, _, staff)| staff)
}
