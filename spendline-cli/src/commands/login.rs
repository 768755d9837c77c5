//! Login command - start a session

use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use spendline_core::Session;

use super::{get_context, get_logger, log_command, log_event, log_failure, password_or_prompt, value_or_prompt};

pub fn run(email: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let logger = get_logger();
    log_command(&logger, "login");

    let ctx = get_context()?;

    let email = value_or_prompt(email, "Email", "email")?;
    let password = password_or_prompt(password, false)?;

    let mut session = Session::anonymous();
    let user = ctx
        .auth_service
        .login(&mut session, &email, &password)
        .inspect_err(|e| {
            log_failure(&logger, "login_failed", "login", e);
        })?;

    log_event(&logger, "login_succeeded", "login");

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "id": user.id,
                "name": user.name,
                "email": user.email,
                "expenses": session.expenses().len(),
            }))?
        );
    } else {
        println!("\n{} Login successful!", "✓".green());
        println!("  Welcome back, {}\n", user.name.bold());
    }

    Ok(())
}
