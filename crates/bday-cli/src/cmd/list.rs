//! `bday list`: the roster grid, in calendar order.

use std::io::{self, Write};

use bday_core::date_math::format_display_date;
use bday_core::{BirthdayRecord, ListFilter, MonthFilter};
use clap::Args;
use serde::Serialize;

use crate::context::AppContext;
use crate::output::{Renderable, render_list};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only names containing this text (case-insensitive).
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// Month: `all`, 0-11 (0 = January), or a month name.
    #[arg(short, long, default_value = "all")]
    pub month: MonthFilter,
}

impl ListArgs {
    fn filter(&self) -> ListFilter {
        ListFilter::new(self.name.clone(), self.month)
    }
}

/// One card in the grid.
#[derive(Debug, Serialize)]
pub struct ListRow {
    pub name: String,
    pub date: String,
    pub display_date: String,
}

impl From<&BirthdayRecord> for ListRow {
    fn from(record: &BirthdayRecord) -> Self {
        Self {
            name: record.name.clone(),
            date: record.date.to_string(),
            display_date: format_display_date(record.date),
        }
    }
}

impl Renderable for ListRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{:<20} {}", self.name, self.display_date)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}\t{}\t{}", self.name, self.date, self.display_date)
    }

    fn table_headers() -> &'static [&'static str] {
        &["NAME", "DATE", "DISPLAY"]
    }
}

fn build_rows(ctx: &AppContext, args: &ListArgs) -> Vec<ListRow> {
    ctx.roster()
        .list(&args.filter())
        .into_iter()
        .map(ListRow::from)
        .collect()
}

pub fn run_list(args: &ListArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let rows = build_rows(ctx, args);
    render_list(&rows, ctx.output, "No birthdays match.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn list_args_defaults() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: ListArgs,
        }
        let w = Wrapper::parse_from(["test"]);
        assert!(w.args.name.is_empty());
        assert_eq!(w.args.month, MonthFilter::All);

        let w = Wrapper::parse_from(["test", "--month", "jul", "-n", "iq"]);
        assert_eq!(w.args.month, MonthFilter::Month(6));
        assert_eq!(w.args.filter(), ListFilter::new("iq", MonthFilter::Month(6)));

        assert!(Wrapper::try_parse_from(["test", "--month", "12"]).is_err());
    }

    #[test]
    fn row_from_record() {
        let record = BirthdayRecord::new(
            "Argha",
            NaiveDate::from_ymd_opt(2000, 11, 9).expect("valid date"),
        );
        let row = ListRow::from(&record);
        assert_eq!(row.date, "2000-11-09");
        assert_eq!(row.display_date, "9th November");

        let mut buf = Vec::new();
        row.render_table(&mut buf).expect("render");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "Argha\t2000-11-09\t9th November\n");
    }
}
