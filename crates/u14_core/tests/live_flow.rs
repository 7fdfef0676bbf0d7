//! End-to-end match day: sheet, live tracking across both halves, export.

use proptest::prelude::*;

use u14_core::{
    build_export, ClockTick, FileStore, Half, LiveSession, MatchDocument, MatchSheet, MatchStore,
    MemoryStore, FIELD_SLOTS, HALF_DURATION_SECS,
};

fn finalized_sheet(match_id: u32) -> MatchSheet {
    let mut sheet = MatchSheet::new(match_id);
    sheet.opponent = "AS Visiteurs".into();
    sheet.selected = (1..=14).collect();
    sheet.xi = (1..=11).collect();
    sheet.validate().expect("sheet must be valid");
    sheet
}

fn seeded_store(match_id: u32) -> MemoryStore {
    let mut store = MemoryStore::new();
    store.seed(
        match_id,
        MatchDocument { sheet: Some(finalized_sheet(match_id)), live: None, saved_at: None },
    );
    store
}

fn run_seconds(session: &mut LiveSession<impl MatchStore>, seconds: u32) {
    session.start_clock().unwrap();
    for _ in 0..seconds {
        session.tick().unwrap();
    }
}

#[test]
fn full_match_day_produces_the_expected_export() {
    let mut session = LiveSession::open(seeded_store(31), 31).unwrap();

    // First half: player 1 comes off for player 12 at 10:00, half taken at
    // the 35-minute limit.
    run_seconds(&mut session, 600);
    assert!(session.propose_swap(1, 12));
    assert!(session.confirm_swap().unwrap());
    assert_eq!(session.live_seconds(1), 600);
    assert_eq!(session.live_seconds(12), 0);

    session.start_clock().unwrap();
    loop {
        match session.tick().unwrap() {
            ClockTick::LimitReached => break,
            ClockTick::Advanced(_) => {}
            ClockTick::Ignored => panic!("clock stopped before the limit"),
        }
    }
    assert!(!session.is_running());
    assert_eq!(session.current_time(), HALF_DURATION_SECS);

    session.halftime_transition().unwrap();
    assert_eq!(session.current_half(), Half::Second);
    assert_eq!(session.current_time(), 0);

    // Second half: finish at 30:00.
    run_seconds(&mut session, 1800);
    session.finish().unwrap();

    // Player 2 played the whole match: 2100 + 1800 seconds -> 65 minutes.
    assert_eq!(session.live_seconds(2), HALF_DURATION_SECS + 1800);

    let doc = MatchDocument {
        sheet: Some(session.sheet().clone()),
        live: Some(session.state().clone()),
        saved_at: None,
    };
    let export = build_export(31, &doc).unwrap();

    let minutes = |id: u32| export.players.iter().find(|p| p.player_id == id).unwrap().minutes;
    assert_eq!(minutes(2), 65);
    assert_eq!(minutes(1), 10); // 600s in half 1
    assert_eq!(minutes(12), 55); // 1500s of half 1 + all of half 2
    assert_eq!(minutes(13), 0);
    assert_eq!(export.meta.opponent, "AS Visiteurs");
    assert!(export.players.windows(2).all(|w| w[0].player_id < w[1].player_id));
}

#[test]
fn a_session_survives_a_restart_through_the_file_store() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut store = FileStore::new(dir.path()).unwrap();
        store
            .save(
                8,
                &MatchDocument { sheet: Some(finalized_sheet(8)), live: None, saved_at: None },
            )
            .unwrap();
        let mut session = LiveSession::open(store, 8).unwrap();
        run_seconds(&mut session, 300);
        assert!(session.propose_swap(3, 13));
        assert!(session.confirm_swap().unwrap());
    }

    // A fresh process resumes the last saved match, paused, with the ledger
    // intact.
    let store = FileStore::new(dir.path()).unwrap();
    let session = LiveSession::resume_last(store).unwrap();
    assert_eq!(session.match_id(), 8);
    assert!(!session.is_running());
    assert_eq!(session.current_time(), 300);
    assert_eq!(session.live_seconds(3), 300);
    assert!(!session.state().players[&3].on_field);
    assert!(session.state().players[&13].on_field);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// With eleven on-field slots always filled, total playing time across
    /// the squad equals elapsed time times eleven, whatever the swap
    /// pattern.
    #[test]
    fn playing_time_is_conserved_across_swaps(
        steps in prop::collection::vec((0u32..180, 0usize..32, 0usize..32), 1..10),
        trailing in 0u32..180,
    ) {
        let mut session = LiveSession::open(seeded_store(55), 55).unwrap();
        let mut elapsed = 0u32;

        for (gap, out_pick, in_pick) in steps {
            run_seconds(&mut session, gap);
            elapsed += gap;

            let on_field: Vec<u32> = session.state().players.iter()
                .filter(|(_, p)| p.on_field).map(|(&id, _)| id).collect();
            let bench: Vec<u32> = session.state().players.iter()
                .filter(|(_, p)| !p.on_field).map(|(&id, _)| id).collect();
            let out_id = on_field[out_pick % on_field.len()];
            let in_id = bench[in_pick % bench.len()];

            prop_assert!(session.propose_swap(out_id, in_id));
            prop_assert!(session.confirm_swap().unwrap());
        }
        run_seconds(&mut session, trailing);
        elapsed += trailing;
        prop_assert!(elapsed < HALF_DURATION_SECS, "scenario must stay inside half 1");

        let total: u32 = session.state().players.keys()
            .map(|&id| session.live_seconds(id)).sum();
        prop_assert_eq!(total, elapsed * FIELD_SLOTS as u32);

        let on_field_count = session.state().players.values().filter(|p| p.on_field).count();
        prop_assert_eq!(on_field_count, FIELD_SLOTS);
    }
}
