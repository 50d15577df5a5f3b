use anyhow::{Result, bail};
use chrono::Utc;
use daybook_core::Credentials;
use daybook_session::{AppSession, Identity, UnlockOutcome};
use serde_json::json;

use crate::cli::OutputFormat;
use crate::context::AppContext;
use crate::input;

/// Exit status when the biometric prompt was dismissed.
pub(crate) const EXIT_CANCELLED: i32 = 1;

pub(crate) async fn handle_sign_up(
    ctx: &AppContext,
    email: String,
    password: Option<String>,
    format: OutputFormat,
) -> Result<i32> {
    let credentials = Credentials::new(email, input::read_password(password)?)?;
    let identity = ctx.identity_provider().sign_up(&credentials).await?;
    start_session(ctx, identity, format).await
}

pub(crate) async fn handle_sign_in(
    ctx: &AppContext,
    email: String,
    password: Option<String>,
    format: OutputFormat,
) -> Result<i32> {
    let credentials = Credentials::new(email, input::read_password(password)?)?;
    let identity = ctx.identity_provider().sign_in(&credentials).await?;
    start_session(ctx, identity, format).await
}

/// Persist a fresh session, then run the lock gate once if it is enabled.
async fn start_session(ctx: &AppContext, identity: Identity, format: OutputFormat) -> Result<i32> {
    let mut session = AppSession::new(identity, ctx.backend());
    ctx.sessions.save(&session)?;
    if format == OutputFormat::Text {
        eprintln!("Signed in as {}", session.identity.email);
    }
    if !ctx.config.lock.enabled {
        print_session(&session, ctx, format)?;
        return Ok(0);
    }
    let outcome = run_gate(ctx, &mut session).await?;
    report_unlock(&outcome, &session, ctx, format)
}

pub(crate) async fn handle_unlock(ctx: &AppContext, format: OutputFormat) -> Result<i32> {
    let mut session = ctx.sessions.require(ctx.backend())?;
    if !ctx.config.lock.enabled {
        if format == OutputFormat::Text {
            eprintln!("The journal lock is disabled (lock.enabled = false).");
        }
        print_session(&session, ctx, format)?;
        return Ok(0);
    }
    let outcome = run_gate(ctx, &mut session).await?;
    report_unlock(&outcome, &session, ctx, format)
}

async fn run_gate(ctx: &AppContext, session: &mut AppSession) -> Result<UnlockOutcome> {
    let outcome = ctx.gate().unlock().await?;
    if outcome.grants_access() {
        session.unlocked_at = Some(Utc::now());
        ctx.sessions.save(session)?;
    }
    Ok(outcome)
}

fn report_unlock(
    outcome: &UnlockOutcome,
    session: &AppSession,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<i32> {
    match outcome {
        UnlockOutcome::Unlocked => {
            if format == OutputFormat::Text {
                eprintln!("Journal unlocked.");
            }
        }
        UnlockOutcome::PassedThrough => {
            if format == OutputFormat::Text {
                eprintln!("Biometric authentication is not available; journal opened without it.");
            }
        }
        UnlockOutcome::Cancelled => return Ok(EXIT_CANCELLED),
        UnlockOutcome::Denied => bail!(
            "Biometric authentication is not available on this device and lock.on_unavailable = \"deny\"."
        ),
        UnlockOutcome::Failed(reason) => bail!("Authentication failed: {reason}"),
    }
    print_session(session, ctx, format)?;
    Ok(0)
}

pub(crate) fn handle_lock(ctx: &AppContext) -> Result<()> {
    let mut session = ctx.sessions.require(ctx.backend())?;
    session.unlocked_at = None;
    ctx.sessions.save(&session)?;
    eprintln!("Journal locked.");
    Ok(())
}

pub(crate) fn handle_sign_out(ctx: &AppContext) -> Result<()> {
    if ctx.sessions.clear()? {
        eprintln!("Signed out.");
    } else {
        eprintln!("Not signed in.");
    }
    Ok(())
}

pub(crate) fn handle_whoami(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let session = ctx.sessions.require(ctx.backend())?;
    print_session(&session, ctx, format)
}

fn print_session(session: &AppSession, ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let locked = session.ensure_unlocked(ctx.config.lock.enabled).is_err();
    match format {
        OutputFormat::Json => {
            let value = json!({
                "user_id": session.identity.user_id,
                "email": session.identity.email,
                "backend": session.backend.to_string(),
                "signed_in_at": session.signed_in_at,
                "locked": locked,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            println!("{}", session.identity.email);
            println!("  User:      {}", session.identity.user_id);
            println!("  Backend:   {}", session.backend);
            println!(
                "  Signed in: {}",
                session.signed_in_at.format("%Y-%m-%d %H:%M UTC")
            );
            println!("  Journal:   {}", if locked { "locked" } else { "unlocked" });
        }
    }
    Ok(())
}
