use crate::forks::ForkAhead;
use crate::rate_limit::Quota;
use crate::stars::StarCount;
use crate::stats::Summary;
use std::io::{self, Write};

pub fn write_summary<W: Write>(out: &mut W, user: &str, summary: &Summary) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{user} total stars received {}", summary.total_stars)?;
    writeln!(out, "{user} total other users forked {}", summary.total_forks)?;
    writeln!(out)?;

    let width = summary
        .rows
        .iter()
        .map(|r| r.name.len())
        .max()
        .unwrap_or(0)
        .max("name".len());
    writeln!(out, "{:<width$}  {:>6}  {:>6}", "name", "stars", "forks")?;
    for row in &summary.rows {
        writeln!(out, "{:<width$}  {:>6}  {:>6}", row.name, row.stars, row.forks)?;
    }
    Ok(())
}

pub fn write_forks_ahead<W: Write>(out: &mut W, user: &str, ahead: &[ForkAhead]) -> io::Result<()> {
    if ahead.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "{user} Forks that are ahead by N commits")?;
    for a in ahead {
        writeln!(out, "{a}")?;
    }
    Ok(())
}

pub fn write_star_count<W: Write>(out: &mut W, count: &StarCount) -> io::Result<()> {
    for r in &count.repos {
        writeln!(out, "{:>6}  {}  {}", r.stars, r.name, r.url)?;
    }
    writeln!(out, "{} total stars {}", count.login, count.total)
}

pub fn write_quota<W: Write>(out: &mut W, quota: &Quota) -> io::Result<()> {
    writeln!(
        out,
        "{} / {} remaining, resets {} UTC",
        quota.remaining,
        quota.limit,
        quota.reset.format(crate::error::RESET_FORMAT)
    )
}
