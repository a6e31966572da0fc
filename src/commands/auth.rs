// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};

use super::Context;
use crate::auth::AuthSession;
use crate::db;
use crate::notify::Notification;
use crate::utils::{maybe_print_json, pretty_table};
use crate::validation::{FieldError, LoginForm, RegisterForm, ResetPasswordForm, summarize};

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    let mut session = AuthSession::new(db::load_auth(&ctx.conn)?, ctx.clock.clone(), ctx.bus.clone());
    match m.subcommand() {
        Some(("login", sub)) => login(ctx, &mut session, sub)?,
        Some(("register", sub)) => register(ctx, &mut session, sub)?,
        Some(("logout", _)) => session.logout(),
        Some(("reset-password", sub)) => reset_password(ctx, &mut session, sub)?,
        Some(("whoami", sub)) => return whoami(&session, sub),
        _ => return Ok(()),
    }
    ctx.persisted(db::save_auth(&ctx.conn, session.snapshot()))
}

fn arg(sub: &clap::ArgMatches, name: &str) -> String {
    sub.get_one::<String>(name).cloned().unwrap_or_default()
}

fn check(ctx: &Context, title: &str, outcome: Result<(), Vec<FieldError>>) -> Result<()> {
    if let Err(errors) = outcome {
        let message = summarize(&errors);
        ctx.bus.publish(Notification::error(title, message.clone()));
        bail!(message);
    }
    Ok(())
}

fn login(ctx: &Context, session: &mut AuthSession, sub: &clap::ArgMatches) -> Result<()> {
    let form = LoginForm {
        email: arg(sub, "email").trim().to_string(),
        password: arg(sub, "password"),
    };
    check(ctx, "Sign-in failed", form.validate())?;
    let user = session.login(&form.email, &form.password)?;
    println!("Signed in as {} <{}>", user.name, user.email);
    Ok(())
}

fn register(ctx: &Context, session: &mut AuthSession, sub: &clap::ArgMatches) -> Result<()> {
    let form = RegisterForm {
        name: arg(sub, "name").trim().to_string(),
        email: arg(sub, "email").trim().to_string(),
        password: arg(sub, "password"),
        confirm_password: arg(sub, "confirm"),
    };
    check(ctx, "Registration failed", form.validate())?;
    let user = session.register(&form.email, &form.password, &form.name)?;
    println!("Registered {} <{}>", user.name, user.email);
    Ok(())
}

fn reset_password(ctx: &Context, session: &mut AuthSession, sub: &clap::ArgMatches) -> Result<()> {
    let form = ResetPasswordForm {
        email: arg(sub, "email").trim().to_string(),
    };
    check(ctx, "Password reset failed", form.validate())?;
    session.reset_password(&form.email)?;
    Ok(())
}

fn whoami(session: &AuthSession, sub: &clap::ArgMatches) -> Result<()> {
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), session.snapshot())? {
        return Ok(());
    }
    match session.current_user() {
        Some(user) if session.is_authenticated() => println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Email"],
                vec![vec![user.id.clone(), user.name.clone(), user.email.clone()]],
            )
        ),
        _ => println!("Not signed in"),
    }
    Ok(())
}
