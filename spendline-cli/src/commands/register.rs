//! Register command - create an account and log in

use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use spendline_core::Session;

use super::{get_context, get_logger, log_command, log_event, log_failure, password_or_prompt, value_or_prompt};

pub fn run(
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let logger = get_logger();
    log_command(&logger, "register");

    let ctx = get_context()?;

    let name = value_or_prompt(name, "Name", "name")?;
    let email = value_or_prompt(email, "Email", "email")?;
    let password = password_or_prompt(password, true)?;

    let mut session = Session::anonymous();
    let user = ctx
        .auth_service
        .register(&mut session, &name, &email, &password)
        .inspect_err(|e| {
            log_failure(&logger, "register_failed", "register", e);
        })?;

    log_event(&logger, "user_registered", "register");

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "id": user.id,
                "name": user.name,
                "email": user.email,
            }))?
        );
    } else {
        println!("\n{} Registration successful!", "✓".green());
        println!("  Logged in as {} ({})\n", user.name.bold(), user.email);
    }

    Ok(())
}
