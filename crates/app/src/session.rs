//! Console session - runs parsed commands against one registry

use std::io::Write;

use anyhow::Result;
use booth_core::{Booth, BoothId, BoothRegistry, Decision, Error, Statistics};
use chrono::NaiveDate;

use crate::command::{Command, HELP};

/// Whether the console keeps reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Output settings plus the registry being driven
pub struct Session {
    registry: BoothRegistry,
    json: bool,
}

impl Session {
    pub fn new(registry: BoothRegistry, json: bool) -> Self {
        Self { registry, json }
    }

    pub fn registry(&self) -> &BoothRegistry {
        &self.registry
    }

    /// Run one command; registry errors are printed, not returned
    pub fn execute(
        &mut self,
        command: Command,
        today: NaiveDate,
        out: &mut impl Write,
    ) -> Result<Flow> {
        let outcome = match command {
            Command::List => self.print_booths(out, &self.registry.all()),
            Command::Show(id) => match self.registry.get(id) {
                Ok(booth) => self.print_booth(out, booth),
                Err(e) => Err(e.into()),
            },
            Command::Register {
                id,
                name,
                description,
            } => match self.registry.register(id, &name, &description) {
                Ok(booth) => {
                    writeln!(
                        out,
                        "Registered booth {} as {}, awaiting review",
                        booth.id,
                        booth.address().unwrap_or_default()
                    )?;
                    Ok(())
                }
                Err(e) => Err(e.into()),
            },
            Command::Approve(id) => self.moderate(out, id, Decision::Approve),
            Command::Reject(id) => self.moderate(out, id, Decision::Reject),
            Command::Pending => self.print_booths(out, &self.registry.pending()),
            Command::Stats => self.print_stats(out, &self.registry.statistics()),
            Command::Top(n) => self.print_booths(out, &self.registry.top_by_popularity(n)),
            Command::Recent(n) => self.print_booths(out, &self.registry.recent_submissions(n)),
            Command::Views => {
                let ranks = self.registry.rank_by_views();
                if self.json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&ranks)?)?;
                } else {
                    for rank in &ranks {
                        writeln!(
                            out,
                            "#{:<3} {:<24} {:>6} views  {:>4.1}",
                            rank.rank,
                            rank.booth.label(),
                            rank.booth.views.unwrap_or(0),
                            rank.booth.popularity.unwrap_or(0.0)
                        )?;
                    }
                }
                Ok(())
            }
            Command::Occupancy => {
                let occupancy = self.registry.occupancy();
                if self.json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&occupancy)?)?;
                } else {
                    writeln!(
                        out,
                        "registered: {}  empty: {}",
                        occupancy.registered, occupancy.vacant
                    )?;
                }
                Ok(())
            }
            Command::Resolve(address) => match self.registry.find_by_address(&address) {
                Some(booth) => {
                    self.print_booth(out, booth)?;
                    if !self.registry.is_address_active(&address, today) {
                        writeln!(out, "(address not active on {})", today)?;
                    }
                    Ok(())
                }
                None => {
                    writeln!(out, "No registered booth has address '{}'", address)?;
                    Ok(())
                }
            },
            Command::Schedule => {
                match self.registry.schedule() {
                    Some(schedule) if self.json => {
                        writeln!(out, "{}", serde_json::to_string_pretty(schedule)?)?
                    }
                    Some(schedule) => {
                        let (opens, closes) = schedule.address_window();
                        writeln!(out, "event:   {} to {}", schedule.starts_on, schedule.ends_on)?;
                        writeln!(out, "address: {} to {}", opens, closes)?;
                    }
                    None => writeln!(out, "No schedule configured")?,
                }
                Ok(())
            }
            Command::Help => {
                writeln!(out, "{}", HELP)?;
                Ok(())
            }
            Command::Quit => return Ok(Flow::Quit),
        };

        if let Err(e) = outcome {
            match e.downcast_ref::<Error>() {
                Some(err) => writeln!(out, "{}", user_message(err))?,
                None => return Err(e),
            }
        }

        Ok(Flow::Continue)
    }

    fn moderate(&mut self, out: &mut impl Write, id: BoothId, decision: Decision) -> Result<()> {
        let booth = self.registry.set_status(id, decision)?;
        writeln!(
            out,
            "Booth {} ({}) is now {}",
            booth.id,
            booth.label(),
            booth.status()
        )?;
        Ok(())
    }

    fn print_booth(&self, out: &mut impl Write, booth: &Booth) -> Result<()> {
        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(booth)?)?;
            return Ok(());
        }

        writeln!(out, "{}", booth_line(booth))?;
        if let Some(claim) = booth.claim() {
            writeln!(out, "  address:   {}", claim.address)?;
            if !claim.description.is_empty() {
                writeln!(out, "  about:     {}", claim.description)?;
            }
            writeln!(out, "  submitted: {}", claim.submitted_at)?;
        }
        Ok(())
    }

    fn print_booths(&self, out: &mut impl Write, booths: &[Booth]) -> Result<()> {
        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(booths)?)?;
            return Ok(());
        }

        if booths.is_empty() {
            writeln!(out, "(none)")?;
        }
        for booth in booths {
            writeln!(out, "{}", booth_line(booth))?;
        }
        Ok(())
    }

    fn print_stats(&self, out: &mut impl Write, stats: &Statistics) -> Result<()> {
        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(stats)?)?;
            return Ok(());
        }

        writeln!(out, "total booths:          {}", stats.total_booths)?;
        writeln!(out, "registered:            {}", stats.registered_booths)?;
        writeln!(out, "pending review:        {}", stats.pending_booths)?;
        writeln!(out, "total views:           {}", stats.total_views)?;
        writeln!(out, "average popularity:    {:.1}", stats.average_popularity)?;
        writeln!(out, "approval rate:         {:.1}%", stats.approval_rate)?;
        writeln!(
            out,
            "views per booth:       {:.0}",
            stats.average_views_per_registered_booth
        )?;
        Ok(())
    }
}

/// One-line summary: id, grid slot, status, label
fn booth_line(booth: &Booth) -> String {
    format!(
        "{:>3}  row {} col {}  {:<9} {}",
        booth.id,
        booth.row,
        booth.col,
        booth.status().to_string(),
        booth.label()
    )
}

/// Registry errors phrased for the person at the prompt
pub fn user_message(err: &Error) -> String {
    match err {
        Error::NotFound(id) => format!("No booth with id {}", id),
        Error::InvalidInput(msg) => format!("Invalid input: {}", msg),
        Error::AlreadyRegistered(id) => {
            format!("Booth {} is already registered, pick an empty booth", id)
        }
        Error::InvalidTransition { id, from, .. } => {
            format!("Booth {} is {}, only pending booths can be reviewed", id, from)
        }
        other => other.to_string(),
    }
}
