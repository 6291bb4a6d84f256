use super::{util, Allocation, Conflict, ConflictKind};
use crate::model::StaffId;
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub(super) fn detect_conflicts(allocations: &[Allocation]) -> Vec<Conflict> {
    let mut out = Vec::new();

    let mut groups: BTreeMap<(StaffId, NaiveDate), Vec<&Allocation>> = BTreeMap::new();
    for a in allocations {
        groups.entry((a.staff_id, a.date)).or_default().push(a);
    }

    for ((staff, date), mut group) in groups {
        group.sort_by_key(|a| a.start);

        for (idx, a) in group.iter().enumerate() {
            if a.conflict {
                out.push(Conflict {
                    staff,
                    date,
                    child_a: a.child_id,
                    child_b: None,
                    kind: ConflictKind::Forced,
                });
            }
            for b in group.iter().skip(idx + 1) {
                if util::overlaps(a.start, a.end, b.start, b.end) {
                    out.push(Conflict {
                        staff,
                        date,
                        child_a: a.child_id,
                        child_b: Some(b.child_id),
                        kind: ConflictKind::Overlap,
                    });
                }
            }
        }
    }

    out
}
