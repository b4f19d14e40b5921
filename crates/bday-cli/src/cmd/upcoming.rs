//! `bday upcoming`: the soonest few birthdays with day-count badges.

use std::io::{self, Write};

use bday_core::Upcoming;
use bday_core::view::days_label;
use clap::Args;
use serde::Serialize;

use crate::context::AppContext;
use crate::output::{Renderable, render_list};

#[derive(Args, Debug)]
pub struct UpcomingArgs {
    /// How many to show. Defaults to `roster.upcoming` from the config (3).
    #[arg(short = 'n', long)]
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct UpcomingRow(pub Upcoming);

impl Renderable for UpcomingRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let marker = if self.0.is_today() { "🎂" } else { " " };
        writeln!(
            w,
            "{marker} {:<20} [{}]",
            self.0.record.name,
            days_label(self.0.days_until)
        )
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}\t{}\t{}",
            self.0.record.name, self.0.days_until, self.0.next_occurrence
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["NAME", "DAYS", "NEXT"]
    }
}

pub fn run_upcoming(args: &UpcomingArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let count = args.count.unwrap_or(ctx.config.roster.upcoming);
    let rows: Vec<UpcomingRow> = ctx
        .roster()
        .next_upcoming(count, ctx.today)
        .into_iter()
        .map(UpcomingRow)
        .collect();
    render_list(&rows, ctx.output, "No birthdays yet.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bday_core::BirthdayRecord;
    use chrono::NaiveDate;

    fn row(days: u32) -> UpcomingRow {
        let date = NaiveDate::from_ymd_opt(2000, 11, 9).expect("valid date");
        UpcomingRow(Upcoming {
            record: BirthdayRecord::new("Argha", date),
            next_occurrence: NaiveDate::from_ymd_opt(2024, 11, 9).expect("valid date"),
            days_until: days,
        })
    }

    fn human(row: &UpcomingRow) -> String {
        let mut buf = Vec::new();
        row.render_human(&mut buf).expect("render");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn badge_pluralizes() {
        assert!(human(&row(1)).contains("[1 day]"));
        assert!(human(&row(5)).contains("[5 days]"));
        assert!(human(&row(0)).contains("[0 days]"));
    }

    #[test]
    fn json_row_is_flat() {
        let value = serde_json::to_value(row(1)).expect("serialize");
        assert_eq!(value["name"], "Argha");
        assert_eq!(value["days_until"], 1);
        assert_eq!(value["next_occurrence"], "2024-11-09");
    }
}
