use std::path::Path;

use anyhow::{Context, anyhow, bail};
use inquire::validator::Validation;

use crate::config::{Config, defaults};
use crate::error::Error;
use crate::gateway::Gateway;
use crate::store;
use crate::types::UserUpdate;

const MIN_PASSWORD_LEN: usize = 8;

fn open_gateway(config_path: Option<&Path>) -> anyhow::Result<Gateway> {
    let config = Config::load(config_path)?;
    let store = store::connect(&config.store)
        .context("Store not configured. Set STORE_URL and STORE_KEY or pass --config")?;
    Ok(Gateway::new(store))
}

fn prompt_password(message: &str) -> anyhow::Result<String> {
    let password = inquire::Password::new(message)
        .with_validator(|input: &str| {
            if input.chars().count() < MIN_PASSWORD_LEN {
                Ok(Validation::Invalid(
                    format!("Password must be at least {MIN_PASSWORD_LEN} characters").into(),
                ))
            } else {
                Ok(Validation::Valid)
            }
        })
        .prompt()?;
    Ok(password)
}

/// Creates the schema and seeds the admin account.
pub async fn run_admin_init(
    email: Option<String>,
    password: Option<String>,
    config_path: Option<&Path>,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let gateway = open_gateway(config_path)?;

    let email = match email {
        Some(email) => email,
        None if non_interactive => defaults::ADMIN_EMAIL.to_string(),
        None => inquire::Text::new("Admin email:")
            .with_default(defaults::ADMIN_EMAIL)
            .prompt()?,
    };

    let password = match password {
        Some(password) => password,
        None if non_interactive => bail!("--password is required with --non-interactive"),
        None => prompt_password("Admin password:")?,
    };

    let user = gateway.seed_admin(email, password).await?;

    println!();
    println!("========================================");
    println!("Admin account created: {}", user.email);
    println!("Sign in with POST /api/auth/login");
    println!("========================================");
    println!();

    Ok(())
}

pub async fn run_set_password(
    password: Option<String>,
    config_path: Option<&Path>,
) -> anyhow::Result<()> {
    let gateway = open_gateway(config_path)?;

    let password = match password {
        Some(password) => password,
        None => prompt_password("New password:")?,
    };

    let user = gateway
        .update_user(UserUpdate {
            password: Some(password),
            ..UserUpdate::default()
        })
        .await
        .map_err(|e| match e {
            Error::NotFound => anyhow!("No admin account. Run 'sleepos admin init' first"),
            e => e.into(),
        })?;

    println!("Password updated for {}", user.email);
    Ok(())
}
