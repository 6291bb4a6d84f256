use super::{util, Allocation, StaffIdentity, TimeBlock};
use crate::model::StaffId;
use std::collections::HashMap;

pub(super) fn allocate(staff: &[StaffIdentity], blocks: &[TimeBlock]) -> Vec<Allocation> {
    let mut out: Vec<Allocation> = Vec::with_capacity(blocks.len());
    let Some(fallback) = staff.first() else {
        return out;
    };

    // index des allocations déjà produites (dans `out`) par membre
    let mut by_staff: HashMap<StaffId, Vec<usize>> = HashMap::new();

    // sort_by_key est stable : à (date, start) égal, l'ordre d'entrée est conservé
    let mut sorted: Vec<&TimeBlock> = blocks.iter().collect();
    sorted.sort_by_key(|b| (b.date, b.start));

    for block in sorted {
        let free = staff.iter().find(|member| {
            by_staff.get(&member.id).map_or(true, |taken| {
                !taken.iter().map(|&i| &out[i]).any(|a| {
                    a.date == block.date && util::overlaps(a.start, a.end, block.start, block.end)
                })
            })
        });

        let (staff_id, conflict) = match free {
            Some(member) => (member.id, false),
            None => (fallback.id, true),
        };
        if conflict {
            crate::debug_event!(
                staff = %staff_id,
                child = %block.child_id,
                date = %block.date,
                "no free staff member, forcing assignment"
            );
        }

        by_staff.entry(staff_id).or_default().push(out.len());
        out.push(Allocation {
            child_id: block.child_id,
            staff_id,
            date: block.date,
            start: block.start,
            end: block.end,
            conflict,
        });
    }

    out
}
