//! `bday add`: add a birthday to the roster.

use bday_core::date_math::format_display_date;
use bday_core::session::SaveOutcome;
use bday_core::view::{banner_text, stored_counter};
use clap::Args;
use serde::Serialize;

use crate::context::AppContext;
use crate::output::{CliError, pretty_kv, render_error, render_mode, render_warning};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Person's name. Must be unique (case-insensitive).
    pub name: String,

    /// Birth date as YYYY-MM-DD. Use any year if unknown.
    pub date: String,
}

#[derive(Debug, Serialize)]
struct AddedPayload {
    name: String,
    date: String,
    display_date: String,
    saved: bool,
    stored: usize,
    capacity: usize,
    next: String,
}

pub fn run_add(args: &AddArgs, ctx: &mut AppContext) -> anyhow::Result<()> {
    let added = match ctx.session.add(&args.name, &args.date) {
        Ok(added) => added,
        Err(err) => {
            render_error(ctx.output, &CliError::from(&err))?;
            anyhow::bail!("{err}");
        }
    };

    if let SaveOutcome::Failed(reason) = &added.save {
        render_warning(
            ctx.quiet,
            &format!("added for this run only, could not save roster: {reason}"),
        )?;
    }

    let roster = ctx.roster();
    let payload = AddedPayload {
        name: added.record.name.clone(),
        date: added.record.date.to_string(),
        display_date: format_display_date(added.record.date),
        saved: added.save.is_saved(),
        stored: roster.len(),
        capacity: roster.capacity(),
        next: banner_text(roster.single_next(ctx.today).as_ref()),
    };

    render_mode(
        ctx.output,
        &payload,
        |p, w| writeln!(w, "{}\t{}\t{}/{}", p.name, p.date, p.stored, p.capacity),
        |p, w| {
            writeln!(w, "✓ Added {} ({})", p.name, p.display_date)?;
            pretty_kv(w, "Stored", stored_counter(p.stored, p.capacity))?;
            pretty_kv(w, "Next", &p.next)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_args_are_positional() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: AddArgs,
        }
        let w = Wrapper::parse_from(["test", "Ann", "1999-03-14"]);
        assert_eq!(w.args.name, "Ann");
        assert_eq!(w.args.date, "1999-03-14");
    }
}
