use crate::model::CarePlan;
use crate::storage::write_atomic;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Import d'enfants: header `name[,birth_date][,notes]`. Renvoie le nombre importé.
pub fn import_children_csv<P: AsRef<Path>>(path: P, plan: &mut CarePlan) -> anyhow::Result<usize> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut count = 0;
    for rec in rdr.records() {
        let rec = rec?;
        let name = required(&rec, 0, "name")?;
        let birth_date = optional(&rec, 1)
            .map(|raw| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .with_context(|| format!("invalid birth_date for {name}: {raw}"))
            })
            .transpose()?;
        let notes = optional(&rec, 2).map(str::to_string);
        plan.add_child(name, birth_date, notes);
        count += 1;
    }
    Ok(count)
}

/// Import du personnel: header `name[,role]`
pub fn import_staff_csv<P: AsRef<Path>>(path: P, plan: &mut CarePlan) -> anyhow::Result<usize> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut count = 0;
    for rec in rdr.records() {
        let rec = rec?;
        let name = required(&rec, 0, "name")?;
        let role = optional(&rec, 1).map(str::to_string);
        plan.add_staff(name, role);
        count += 1;
    }
    Ok(count)
}

/// Import de templates: header `title,duration_mins[,description]`
pub fn import_templates_csv<P: AsRef<Path>>(path: P, plan: &mut CarePlan) -> anyhow::Result<usize> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut count = 0;
    for rec in rdr.records() {
        let rec = rec?;
        let title = required(&rec, 0, "title")?;
        let raw = required(&rec, 1, "duration_mins")?;
        let duration: u32 = raw
            .parse()
            .with_context(|| format!("invalid duration_mins for {title}: {raw}"))?;
        let description = optional(&rec, 2).map(str::to_string);
        plan.add_template(title, duration, description)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("template {title}"))?;
        count += 1;
    }
    Ok(count)
}

fn required<'r>(rec: &'r StringRecord, idx: usize, field: &str) -> anyhow::Result<&'r str> {
    let value = rec.get(idx).with_context(|| format!("missing {field}"))?.trim();
    if value.is_empty() {
        bail!("invalid row (empty {field})");
    }
    Ok(value)
}

fn optional(rec: &StringRecord, idx: usize) -> Option<&str> {
    rec.get(idx).map(str::trim).filter(|v| !v.is_empty())
}

/// Export JSON du plan (jolie mise en forme)
pub fn export_plan_json<P: AsRef<Path>>(path: P, plan: &CarePlan) -> anyhow::Result<()> {
    write_atomic(path.as_ref(), &serde_json::to_vec_pretty(plan)?)
}

/// Export CSV de l'emploi du temps d'une date:
/// header `child_id,date,start,end,activity,staff_id`
pub fn export_timetable_csv<W: Write>(out: W, plan: &CarePlan, date: NaiveDate) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(out);
    w.write_record(["child_id", "date", "start", "end", "activity", "staff_id"])?;
    let day = date.to_string();
    for e in plan.timetable_for(date) {
        let mut child = itoa::Buffer::new();
        let mut staff = itoa::Buffer::new();
        let start = e.start.to_string();
        let end = e.end.to_string();
        let staff_id = match e.staff_id {
            Some(id) => staff.format(id.get()),
            None => "",
        };
        w.write_record([
            child.format(e.child_id.get()),
            day.as_str(),
            start.as_str(),
            end.as_str(),
            e.activity.as_str(),
            staff_id,
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des allocations d'une date:
/// header `child_id,staff_id,date,start,end,conflict`
pub fn export_allocations_csv<W: Write>(out: W, plan: &CarePlan, date: NaiveDate) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(out);
    w.write_record(["child_id", "staff_id", "date", "start", "end", "conflict"])?;
    let day = date.to_string();
    let mut rows = plan.allocations_for(date);
    rows.sort_by_key(|r| (r.allocation.start, r.allocation.child_id));
    for r in rows {
        let a = &r.allocation;
        let mut child = itoa::Buffer::new();
        let mut staff = itoa::Buffer::new();
        let start = a.start.to_string();
        let end = a.end.to_string();
        w.write_record([
            child.format(a.child_id.get()),
            staff.format(a.staff_id.get()),
            day.as_str(),
            start.as_str(),
            end.as_str(),
            if a.conflict { "true" } else { "false" },
        ])?;
    }
    w.flush()?;
    Ok(())
}

pub fn export_timetable_csv_to_path<P: AsRef<Path>>(
    path: P,
    plan: &CarePlan,
    date: NaiveDate,
) -> anyhow::Result<()> {
    let file = fs::File::create(path.as_ref())
        .with_context(|| format!("creating {}", path.as_ref().display()))?;
    export_timetable_csv(file, plan, date)
}

pub fn export_allocations_csv_to_path<P: AsRef<Path>>(
    path: P,
    plan: &CarePlan,
    date: NaiveDate,
) -> anyhow::Result<()> {
    let file = fs::File::create(path.as_ref())
        .with_context(|| format!("creating {}", path.as_ref().display()))?;
    export_allocations_csv(file, plan, date)
}
