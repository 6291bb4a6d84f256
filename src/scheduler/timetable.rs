use super::{ActivityTemplateInput, GeneratedBlock, ScheduleOptions, TimeWindow};
use crate::clock::ClockTime;

pub(super) fn generate(
    window: TimeWindow,
    templates: &[ActivityTemplateInput],
    opts: ScheduleOptions,
) -> Vec<GeneratedBlock> {
    let mut out = Vec::new();
    let end = window.end.minutes();
    let mut cursor = window.start.minutes();
    if cursor >= end || templates.is_empty() {
        return out;
    }

    // avance d'un cran par bloc accepté, jamais par tentative
    let mut turn = 0usize;
    while cursor < end && out.len() < opts.max_blocks {
        let template = &templates[turn % templates.len()];
        let next = cursor.saturating_add(template.duration_mins);
        if next > end {
            break;
        }
        // next <= end < 1440 : les deux bornes sont des heures valides
        let (Ok(start_at), Ok(end_at)) =
            (ClockTime::from_minutes(cursor), ClockTime::from_minutes(next))
        else {
            break;
        };
        out.push(GeneratedBlock {
            start: start_at,
            end: end_at,
            activity: template.title.clone(),
        });
        cursor = next;
        turn += 1;
    }

    if out.len() == opts.max_blocks {
        crate::debug_event!(max_blocks = opts.max_blocks, "schedule truncated at block ceiling");
    }
    out
}
