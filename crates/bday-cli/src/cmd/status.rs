//! `bday status`: roster size, store location, and the next birthday.

use bday_core::view::{banner_text, stored_counter};
use clap::Args;
use serde::Serialize;

use crate::context::AppContext;
use crate::output::{pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug, Default)]
pub struct StatusArgs {}

#[derive(Debug, Serialize)]
struct StatusPayload {
    stored: usize,
    capacity: usize,
    counter: String,
    store: String,
    today: String,
    next: String,
}

pub fn run_status(_args: &StatusArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let roster = ctx.roster();
    let payload = StatusPayload {
        stored: roster.len(),
        capacity: roster.capacity(),
        counter: stored_counter(roster.len(), roster.capacity()),
        store: ctx.store_path().display().to_string(),
        today: ctx.today.to_string(),
        next: banner_text(roster.single_next(ctx.today).as_ref()),
    };

    render_mode(
        ctx.output,
        &payload,
        |p, w| {
            writeln!(w, "{}", p.counter)?;
            writeln!(w, "{}", p.next)
        },
        |p, w| {
            pretty_section(w, "Birthday roster")?;
            pretty_kv(w, "Stored", &p.counter)?;
            pretty_kv(w, "Store", &p.store)?;
            pretty_kv(w, "Today", &p.today)?;
            pretty_kv(w, "Next", &p.next)
        },
    )
}
