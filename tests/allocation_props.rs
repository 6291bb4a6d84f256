#![forbid(unsafe_code)]
use careplan::{allocate, Allocation, ChildId, ClockTime, StaffId, StaffIdentity, TimeBlock};
use chrono::{Days, NaiveDate};
use proptest::prelude::*;

/// (jour 0..3, début en minutes, durée) ; la fin reste avant minuit.
fn raw_blocks() -> impl Strategy<Value = Vec<(u64, u32, u32)>> {
    prop::collection::vec((0u64..3, 0u32..1380, 1u32..60), 0..40)
}

fn to_blocks(raw: &[(u64, u32, u32)]) -> Vec<TimeBlock> {
    let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
    raw.iter()
        .enumerate()
        .map(|(i, &(day, start, len))| TimeBlock {
            // l'index d'entrée sert d'identifiant pour vérifier la stabilité
            child_id: ChildId(i as u32),
            date: monday.checked_add_days(Days::new(day)).unwrap(),
            start: ClockTime::from_minutes(start).unwrap(),
            end: ClockTime::from_minutes(start + len).unwrap(),
        })
        .collect()
}

fn to_staff(ids: &[u32]) -> Vec<StaffIdentity> {
    ids.iter()
        .map(|&id| StaffIdentity { id: StaffId(id), name: format!("S{id}") })
        .collect()
}

fn overlapping(a: &Allocation, b: &Allocation) -> bool {
    a.staff_id == b.staff_id && a.date == b.date && a.start.max(b.start) < a.end.min(b.end)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn every_block_is_allocated_once(
        ids in prop::collection::vec(1u32..6, 0..5),
        raw in raw_blocks(),
    ) {
        let blocks = to_blocks(&raw);
        let out = allocate(&to_staff(&ids), &blocks);
        if ids.is_empty() {
            prop_assert!(out.is_empty());
        } else {
            prop_assert_eq!(out.len(), blocks.len());
            let mut children: Vec<u32> = out.iter().map(|a| a.child_id.get()).collect();
            children.sort_unstable();
            prop_assert!(children.iter().copied().eq(0..blocks.len() as u32));
        }
    }

    #[test]
    fn unflagged_allocations_never_overlap(
        ids in prop::collection::vec(1u32..6, 1..5),
        raw in raw_blocks(),
    ) {
        let out = allocate(&to_staff(&ids), &to_blocks(&raw));
        let clean: Vec<&Allocation> = out.iter().filter(|a| !a.conflict).collect();
        for (i, a) in clean.iter().enumerate() {
            for b in &clean[i + 1..] {
                prop_assert!(!overlapping(a, b), "{:?} overlaps {:?}", a, b);
            }
        }
        for a in out.iter().filter(|a| a.conflict) {
            prop_assert_eq!(a.staff_id, StaffId(ids[0]));
        }
    }

    #[test]
    fn output_is_sorted_and_stable(
        ids in prop::collection::vec(1u32..6, 1..5),
        raw in raw_blocks(),
    ) {
        let out = allocate(&to_staff(&ids), &to_blocks(&raw));
        for pair in out.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!((a.date, a.start) <= (b.date, b.start));
            if (a.date, a.start) == (b.date, b.start) {
                prop_assert!(a.child_id < b.child_id);
            }
        }
    }
}
