//! `bday next`: the "next birthday" banner.

use bday_core::Upcoming;
use bday_core::view::banner_text;
use clap::Args;
use serde::Serialize;

use crate::context::AppContext;
use crate::output::{pretty_section, render_mode};

/// Arguments for `bday next`.
#[derive(Args, Debug, Default)]
pub struct NextArgs {}

#[derive(Debug, Serialize)]
struct NextPayload {
    next: Option<Upcoming>,
    banner: String,
}

pub fn run_next(_args: &NextArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let next = ctx.roster().single_next(ctx.today);
    let payload = NextPayload {
        banner: banner_text(next.as_ref()),
        next,
    };

    render_mode(
        ctx.output,
        &payload,
        |p, w| writeln!(w, "{}", p.banner),
        |p, w| {
            pretty_section(w, "Next birthday")?;
            writeln!(w, "{}", p.banner)
        },
    )
}
