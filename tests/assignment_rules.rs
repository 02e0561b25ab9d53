#![forbid(unsafe_code)]
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use turni::{
    calendar::month_days, Period, Planner, RunMode, RunOptions, ShiftLimit, ShiftType, SlotKey,
    Staff, StaffId, TimeSlot, UnassignedReason,
};

#[test]
fn produced_assignments_are_valid() {
    let mut planner = Planner::new();
    planner.state_mut().roster.staff.extend(vec![
        rep_member("GAS", &[ShiftType::Ps, ShiftType::Rap, ShiftType::Utic, ShiftType::Reparto]),
        rep_member("DEL", &[ShiftType::Ps, ShiftType::Rap, ShiftType::Reparto]),
        cardiologo("BRA", &[ShiftType::Ps, ShiftType::Utic, ShiftType::Reparto, ShiftType::Eco206]),
        cardiologo("GUE", &[ShiftType::Reparto, ShiftType::Eco206, ShiftType::Visite208]),
    ]);
    let gue = planner.state().roster.find_by_code("GUE").unwrap().id.clone();
    for day in [3u32, 4, 10] {
        let date = NaiveDate::from_ymd_opt(2026, 6, day).unwrap();
        planner.state_mut().unavailability.mark(gue.clone(), date, Period::Mattina);
        planner.state_mut().unavailability.mark(gue.clone(), date, Period::Pomeriggio);
    }

    let mut rng = StdRng::seed_from_u64(3);
    planner.run(2026, 6, &RunOptions::fill_remaining(), &mut rng).unwrap();

    let state = planner.state();
    for (key, staff) in state.schedule.iter() {
        let member = state.roster.find_by_id(staff).expect("assignee in roster");
        assert!(member.can_work(key.shift_type), "{key} -> {}", member.code);
        assert!(
            !state.unavailability.blocks_slot(staff, key.date, key.slot),
            "{key} assigned to unavailable {}",
            member.code
        );
    }
    assert_no_shift_after_night(&planner);
}

#[test]
fn weekend_rap_continuity_holds_when_pinned_is_eligible() {
    let mut planner = Planner::new();
    planner.state_mut().roster.staff.extend(vec![
        rep_member("DEL", &[ShiftType::Rap]),
        rep_member("GOR", &[ShiftType::Rap]),
    ]);
    let del = planner.state().roster.find_by_code("DEL").unwrap().id.clone();

    // Vendredi 31 juillet, nuit RAP déjà tenue par DEL ; le 1er août est un
    // samedi, exempté de la règle lendemain-de-nuit (pas de veille consultée).
    let friday = NaiveDate::from_ymd_opt(2026, 7, 31).unwrap();
    planner
        .state_mut()
        .schedule
        .set(SlotKey::new(friday, ShiftType::Rap, TimeSlot::Ntt), del.clone());

    let options = RunOptions {
        mode: RunMode::FillRemaining,
        shift_types: vec![ShiftType::Rap],
    };
    let mut rng = StdRng::seed_from_u64(5);
    planner.run(2026, 8, &options, &mut rng).unwrap();

    let schedule = &planner.state().schedule;
    let saturday = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
    let sunday = NaiveDate::from_ymd_opt(2026, 8, 2).unwrap();

    // Samedi : épinglé sur DEL, toujours éligible
    assert_eq!(schedule.get(&SlotKey::new(saturday, ShiftType::Rap, TimeSlot::Ntt)), Some(&del));
    assert_eq!(schedule.get(&SlotKey::new(saturday, ShiftType::Rap, TimeSlot::Gg)), Some(&del));

    // Dimanche : DEL sort d'une nuit, l'épingle est ignorée sans erreur
    let gor = planner.state().roster.find_by_code("GOR").unwrap().id.clone();
    assert_eq!(schedule.get(&SlotKey::new(sunday, ShiftType::Rap, TimeSlot::Ntt)), Some(&gor));
    assert_eq!(schedule.get(&SlotKey::new(sunday, ShiftType::Rap, TimeSlot::Gg)), Some(&gor));
}

#[test]
fn sunday_home_call_follows_friday_night_assignee() {
    let mut planner = Planner::new();
    planner.state_mut().roster.staff.extend(vec![
        rep_member("DEL", &[ShiftType::Rap]),
        rep_member("GOR", &[ShiftType::Rap]),
        rep_member("TESTA", &[ShiftType::Rap]),
    ]);
    let del = planner.state().roster.find_by_code("DEL").unwrap().id.clone();

    // Vendredi 5 juin : nuit RAP tenue par DEL. Samedi, DEL sort de nuit et
    // le créneau part ailleurs ; dimanche, DEL est de nouveau éligible et
    // l'épingle remonte à la nuit du vendredi, pas à celle du samedi.
    let friday = NaiveDate::from_ymd_opt(2026, 6, 5).unwrap();
    planner
        .state_mut()
        .schedule
        .set(SlotKey::new(friday, ShiftType::Rap, TimeSlot::Ntt), del.clone());

    let options = RunOptions {
        mode: RunMode::FillRemaining,
        shift_types: vec![ShiftType::Rap],
    };
    let mut rng = StdRng::seed_from_u64(5);
    planner.run(2026, 6, &options, &mut rng).unwrap();

    let schedule = &planner.state().schedule;
    let saturday = NaiveDate::from_ymd_opt(2026, 6, 6).unwrap();
    let sunday = NaiveDate::from_ymd_opt(2026, 6, 7).unwrap();

    assert_ne!(
        schedule.get(&SlotKey::new(saturday, ShiftType::Rap, TimeSlot::Ntt)),
        Some(&del),
        "DEL sort de la nuit du vendredi"
    );
    assert_eq!(schedule.get(&SlotKey::new(sunday, ShiftType::Rap, TimeSlot::Ntt)), Some(&del));
    assert_eq!(schedule.get(&SlotKey::new(sunday, ShiftType::Rap, TimeSlot::Gg)), Some(&del));
}

#[test]
fn weekend_utic_keeps_same_person_all_day() {
    let mut planner = Planner::new();
    planner.state_mut().roster.staff.extend(vec![
        cardiologo("BRA", &[ShiftType::Utic]),
        cardiologo("TESTA", &[ShiftType::Utic]),
        cardiologo("VELLA", &[ShiftType::Utic]),
    ]);

    let options = RunOptions {
        mode: RunMode::FillRemaining,
        shift_types: vec![ShiftType::Utic],
    };
    let mut rng = StdRng::seed_from_u64(9);
    planner.run(2026, 6, &options, &mut rng).unwrap();

    let schedule = &planner.state().schedule;
    for date in month_days(2026, 6).filter(|d| turni::calendar::is_weekend(*d)) {
        let matt = schedule.get(&SlotKey::new(date, ShiftType::Utic, TimeSlot::Matt));
        let pom = schedule.get(&SlotKey::new(date, ShiftType::Utic, TimeSlot::Pom));
        assert!(matt.is_some() && pom.is_some(), "UTIC vide le {date}");
        assert_eq!(matt, pom, "UTIC partagé le {date}");
    }
}

#[test]
fn monthly_limit_is_respected() {
    let mut planner = Planner::new();
    let mut ale = cardiologo("ALE", &[ShiftType::Ps]);
    ale.limits.clear();
    let mut bea = cardiologo("BEA", &[ShiftType::Ps]);
    bea.limits.insert(ShiftType::Ps, ShiftLimit { min: 0, max: Some(1) });
    planner.state_mut().roster.staff.extend(vec![ale, bea]);

    // Seuls les 1er et 2 juin restent ouverts : deux nuits PS à pourvoir
    for date in month_days(2026, 6).skip(2) {
        planner.close(date, ShiftType::Ps);
    }

    let options = RunOptions {
        mode: RunMode::FillRemaining,
        shift_types: vec![ShiftType::Ps],
    };
    let mut rng = StdRng::seed_from_u64(13);
    let report = planner.run(2026, 6, &options, &mut rng).unwrap();

    let state = planner.state();
    let bea_id = state.roster.find_by_code("BEA").unwrap().id.clone();
    assert!(state.schedule.count_for_type(&bea_id, ShiftType::Ps, 2026, 6) <= 1);

    let day1 = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
    let day2 = NaiveDate::from_ymd_opt(2026, 6, 2).unwrap();
    let night1 = state
        .schedule
        .get(&SlotKey::new(day1, ShiftType::Ps, TimeSlot::Ntt))
        .expect("first night filled")
        .clone();

    // La deuxième nuit revient à l'autre membre, ou reste vide si le repos
    // post-nuit et le plafond excluent tout le monde
    let night2_key = SlotKey::new(day2, ShiftType::Ps, TimeSlot::Ntt);
    match state.schedule.get(&night2_key) {
        Some(assignee) => assert_ne!(assignee, &night1),
        None => assert!(report.unassigned.iter().any(|u| u.key == night2_key)),
    }
    assert_no_shift_after_night(&planner);
}

#[test]
fn fill_remaining_is_idempotent_and_nondestructive() {
    let mut planner = Planner::new();
    planner.state_mut().roster.staff.extend(vec![
        rep_member("GAS", &[ShiftType::Ps, ShiftType::Rap]),
        cardiologo("BRA", &[ShiftType::Utic, ShiftType::Eco206]),
    ]);

    // Case posée à la main : fill-remaining ne doit jamais la toucher
    let day5 = NaiveDate::from_ymd_opt(2026, 6, 5).unwrap();
    let manual_key = SlotKey::new(day5, ShiftType::Eco206, TimeSlot::Matt);
    let bra = planner.state().roster.find_by_code("BRA").unwrap().id.clone();
    planner.state_mut().schedule.set(manual_key, bra.clone());

    let mut rng = StdRng::seed_from_u64(11);
    planner.run(2026, 6, &RunOptions::fill_remaining(), &mut rng).unwrap();

    let first: Vec<(SlotKey, StaffId)> = planner
        .state()
        .schedule
        .iter()
        .map(|(k, v)| (*k, v.clone()))
        .collect();
    assert_eq!(planner.state().schedule.get(&manual_key), Some(&bra));

    // Deuxième passe, graine différente : aucun changement
    let mut rng = StdRng::seed_from_u64(99);
    let second = planner.run(2026, 6, &RunOptions::fill_remaining(), &mut rng).unwrap();
    assert_eq!(second.assigned, 0);
    assert_eq!(planner.state().schedule.len(), first.len());
    for (key, staff) in &first {
        assert_eq!(planner.state().schedule.get(key), Some(staff));
    }
}

#[test]
fn regenerate_only_clears_selected_types() {
    let mut planner = Planner::new();
    planner.state_mut().roster.staff.extend(vec![
        rep_member("GAS", &[ShiftType::Ps]),
        cardiologo("BRA", &[ShiftType::Ps, ShiftType::Eco206]),
    ]);
    let bra = planner.state().roster.find_by_code("BRA").unwrap().id.clone();

    let day5 = NaiveDate::from_ymd_opt(2026, 6, 5).unwrap();
    let eco_key = SlotKey::new(day5, ShiftType::Eco206, TimeSlot::Matt);
    let ps_key = SlotKey::new(day5, ShiftType::Ps, TimeSlot::Gg);
    planner.state_mut().schedule.set(eco_key, bra.clone());
    planner.state_mut().schedule.set(ps_key, bra.clone());

    let mut rng = StdRng::seed_from_u64(21);
    planner
        .run(2026, 6, &RunOptions::regenerate(vec![ShiftType::Ps]), &mut rng)
        .unwrap();

    // ECO 206 hors sélection : intacte ; la grille PS est repartie de zéro
    assert_eq!(planner.state().schedule.get(&eco_key), Some(&bra));
    assert!(planner.state().schedule.is_assigned(&ps_key));
}

#[test]
fn weekend_closed_type_is_skipped_silently() {
    let mut planner = Planner::new();
    planner.state_mut().roster.staff.push(cardiologo("STE", &[ShiftType::Eco206]));

    let options = RunOptions {
        mode: RunMode::FillRemaining,
        shift_types: vec![ShiftType::Eco206],
    };
    let mut rng = StdRng::seed_from_u64(17);
    let report = planner.run(2026, 6, &options, &mut rng).unwrap();

    for date in month_days(2026, 6).filter(|d| turni::calendar::is_weekend(*d)) {
        for &slot in ShiftType::Eco206.time_slots() {
            let key = SlotKey::new(date, ShiftType::Eco206, slot);
            assert!(!planner.state().schedule.is_assigned(&key), "assigned on weekend: {key}");
            assert!(
                !report.unassigned.iter().any(|u| u.key == key),
                "error recorded for closed slot: {key}"
            );
        }
    }
}

#[test]
fn sole_candidate_unavailable_is_recorded_and_run_continues() {
    let mut planner = Planner::new();
    planner.state_mut().roster.staff.push(cardiologo("BRA", &[ShiftType::Utic]));
    let bra = planner.state().roster.find_by_code("BRA").unwrap().id.clone();

    let monday = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
    planner.state_mut().unavailability.mark(bra.clone(), monday, Period::Mattina);

    let options = RunOptions {
        mode: RunMode::FillRemaining,
        shift_types: vec![ShiftType::Utic],
    };
    let mut rng = StdRng::seed_from_u64(29);
    let report = planner.run(2026, 6, &options, &mut rng).unwrap();

    let matt = SlotKey::new(monday, ShiftType::Utic, TimeSlot::Matt);
    let pom = SlotKey::new(monday, ShiftType::Utic, TimeSlot::Pom);
    let missing = report
        .unassigned
        .iter()
        .find(|u| u.key == matt)
        .expect("morning slot reported");
    assert_eq!(missing.reason, UnassignedReason::NoEligibleStaff);
    assert_eq!(planner.state().schedule.get(&pom), Some(&bra));
}

#[test]
fn rap_fallback_opens_to_cardiologi_after_rep_night() {
    let mut planner = Planner::new();
    let mut eco = cardiologo("ECO", &[ShiftType::Rap]);
    eco.specialty = "Ecocardiografista".to_string();
    planner.state_mut().roster.staff.extend(vec![
        rep_member("REP1", &[ShiftType::Rap]),
        cardiologo("CARD", &[ShiftType::Rap]),
        eco,
    ]);
    let rep1 = planner.state().roster.find_by_code("REP1").unwrap().id.clone();
    let card = planner.state().roster.find_by_code("CARD").unwrap().id.clone();

    let options = RunOptions {
        mode: RunMode::FillRemaining,
        shift_types: vec![ShiftType::Rap],
    };
    let mut rng = StdRng::seed_from_u64(31);
    let report = planner.run(2026, 6, &options, &mut rng).unwrap();

    // Lundi 1er : la nuit part au seul habilité REP ; le jour s'ouvre alors
    // au cardiologue (moins chargé), jamais à l'échographiste
    let day1 = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
    let schedule = &planner.state().schedule;
    assert_eq!(schedule.get(&SlotKey::new(day1, ShiftType::Rap, TimeSlot::Ntt)), Some(&rep1));
    assert_eq!(schedule.get(&SlotKey::new(day1, ShiftType::Rap, TimeSlot::Gg)), Some(&card));

    // Mardi 2 : REP1 sort de nuit, personne ne couvre la nuit, donc pas de
    // repli possible pour le jour non plus
    let day2 = NaiveDate::from_ymd_opt(2026, 6, 2).unwrap();
    for &slot in [TimeSlot::Ntt, TimeSlot::Gg].iter() {
        let key = SlotKey::new(day2, ShiftType::Rap, slot);
        assert!(!schedule.is_assigned(&key));
        assert!(report.unassigned.iter().any(|u| u.key == key), "not reported: {key}");
    }
}

fn assert_no_shift_after_night(planner: &Planner) {
    let schedule = &planner.state().schedule;
    for (key, staff) in schedule.iter() {
        if !key.slot.is_night() {
            continue;
        }
        let next = key.date.checked_add_days(Days::new(1)).unwrap();
        let offending: Vec<&SlotKey> = schedule
            .iter()
            .filter(|(k, id)| k.date == next && *id == staff)
            .map(|(k, _)| k)
            .collect();
        assert!(
            offending.is_empty(),
            "{} works {offending:?} the day after night {key}",
            staff.as_str()
        );
    }
}

fn cardiologo(code: &str, caps: &[ShiftType]) -> Staff {
    let mut staff = Staff::new(format!("Dott. {code}"), code);
    staff.specialty = "Cardiologo".to_string();
    staff.capabilities = caps.iter().copied().collect();
    staff
}

fn rep_member(code: &str, caps: &[ShiftType]) -> Staff {
    let mut staff = cardiologo(code, caps);
    staff.specialty = "Emodinamista".to_string();
    staff.can_do_rep = true;
    staff
}
