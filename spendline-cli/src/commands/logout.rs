//! Logout command - clear the stored session

use anyhow::Result;
use colored::Colorize;

use super::{get_context, get_logger, log_command, log_event};
use crate::output;

pub fn run() -> Result<()> {
    let logger = get_logger();
    log_command(&logger, "logout");

    let ctx = get_context()?;
    let mut session = ctx.session()?;
    let was_logged_in = session.is_authenticated();

    ctx.auth_service.logout(&mut session)?;

    if was_logged_in {
        log_event(&logger, "logged_out", "logout");
        output::success("✓ Logged out");
    } else {
        println!("{}", "Not logged in".dimmed());
    }

    Ok(())
}
