//! Provisions an active administrator account from the terminal.

use std::io::{self, BufRead, Write};

use anyhow::{Context, anyhow};
use blog_be::{
    domain::user::NewUserInput,
    init::{
        config::DbConfig,
        server_init::{build_pool, load_env},
    },
    repository::PgBlogStore,
    services::user_service::provision_admin,
    util::string::validations::PASSWORD_MIN_CHARS,
};

fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
) -> anyhow::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let line = lines
        .next()
        .ok_or_else(|| anyhow!("stdin closed"))?
        .context("could not read stdin")?;
    Ok(line.trim().to_owned())
}

fn prompt_until(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
    accept: impl Fn(&str) -> Result<(), &'static str>,
) -> anyhow::Result<String> {
    loop {
        let value = prompt(lines, label)?;
        match accept(&value) {
            Ok(()) => return Ok(value),
            Err(reason) => eprintln!("{reason}"),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    load_env()?;
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    println!("--- Create admin account ---");
    println!("Input is echoed; run this on a trusted terminal.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let user_name = prompt_until(&mut lines, "Username", |v| {
        if v.is_empty() {
            Err("Username cannot be empty.")
        } else {
            Ok(())
        }
    })?;
    let user_email = prompt_until(&mut lines, "Email", |v| {
        if email_address::EmailAddress::is_valid(v) {
            Ok(())
        } else {
            Err("Invalid email.")
        }
    })?;
    let password_label = format!("Password (at least {PASSWORD_MIN_CHARS} characters)");
    let password = loop {
        let password = prompt(&mut lines, &password_label)?;
        if password.chars().count() < PASSWORD_MIN_CHARS {
            eprintln!("Password must be at least {PASSWORD_MIN_CHARS} characters.");
            continue;
        }
        if prompt(&mut lines, "Confirm password")? != password {
            eprintln!("Passwords do not match.");
            continue;
        }
        break password;
    };
    let full_name = prompt(&mut lines, "Full name (optional)")?;

    let pool = build_pool(&DbConfig::from_env()?).await?;
    let store = PgBlogStore::new(pool);

    let admin = provision_admin(
        &store,
        NewUserInput {
            user_name,
            user_email,
            password,
            user_full_name: (!full_name.is_empty()).then_some(full_name),
            user_bio: None,
        },
    )
    .await
    .map_err(|e| anyhow!("could not create admin: {e}"))?;

    println!("Admin account '{}' created ({}).", admin.user_name, admin.user_id);
    Ok(())
}
