//! Biometric lock in front of the journal.

use anyhow::{Context, Result};
use async_trait::async_trait;
use daybook_config::{LockConfig, UnavailablePolicy};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Exit status of a verifier interrupted with Ctrl-C.
const EXIT_INTERRUPTED: i32 = 130;
const SIGINT: i32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BiometricOutcome {
    Success,
    /// The user dismissed the prompt.
    Cancelled,
    Failed(String),
}

#[async_trait]
pub trait Biometrics: Send + Sync {
    async fn has_hardware(&self) -> Result<bool>;

    async fn is_enrolled(&self) -> Result<bool>;

    async fn authenticate(&self, prompt: &str) -> Result<BiometricOutcome>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockOutcome {
    /// The challenge succeeded.
    Unlocked,
    /// No usable sensor; the policy let the user in.
    PassedThrough,
    /// No usable sensor; the policy kept the journal locked.
    Denied,
    Cancelled,
    Failed(String),
}

impl UnlockOutcome {
    pub fn grants_access(&self) -> bool {
        matches!(self, Self::Unlocked | Self::PassedThrough)
    }
}

pub struct BiometricGate {
    biometrics: Box<dyn Biometrics>,
    policy: UnavailablePolicy,
    prompt: String,
}

impl BiometricGate {
    pub fn new(
        biometrics: Box<dyn Biometrics>,
        policy: UnavailablePolicy,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            biometrics,
            policy,
            prompt: prompt.into(),
        }
    }

    /// Gate built from `[lock]`: a configured verifier command, or no sensor.
    pub fn from_config(config: &LockConfig) -> Self {
        let biometrics: Box<dyn Biometrics> = match config.command.as_deref() {
            Some(command) => Box::new(CommandBiometrics {
                command: command.to_string(),
                args: config.args.clone(),
                enrolled_command: config.enrolled_command.clone(),
                enrolled_args: config.enrolled_args.clone(),
            }),
            None => Box::new(NoBiometrics),
        };
        Self::new(biometrics, config.on_unavailable, config.prompt.clone())
    }

    pub async fn unlock(&self) -> Result<UnlockOutcome> {
        let available = self.biometrics.has_hardware().await?
            && self.biometrics.is_enrolled().await?;
        if !available {
            let outcome = match self.policy {
                UnavailablePolicy::Allow => UnlockOutcome::PassedThrough,
                UnavailablePolicy::Deny => UnlockOutcome::Denied,
            };
            info!(policy = %self.policy, ?outcome, "biometrics unavailable");
            return Ok(outcome);
        }

        let outcome = match self.biometrics.authenticate(&self.prompt).await? {
            BiometricOutcome::Success => UnlockOutcome::Unlocked,
            BiometricOutcome::Cancelled => UnlockOutcome::Cancelled,
            BiometricOutcome::Failed(reason) => {
                warn!(%reason, "biometric authentication failed");
                UnlockOutcome::Failed(reason)
            }
        };
        debug!(?outcome, "biometric challenge finished");
        Ok(outcome)
    }
}

/// A device without a sensor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBiometrics;

#[async_trait]
impl Biometrics for NoBiometrics {
    async fn has_hardware(&self) -> Result<bool> {
        Ok(false)
    }

    async fn is_enrolled(&self) -> Result<bool> {
        Ok(false)
    }

    async fn authenticate(&self, _prompt: &str) -> Result<BiometricOutcome> {
        Ok(BiometricOutcome::Failed("no biometric hardware".to_string()))
    }
}

/// Delegates the challenge to an external verifier such as `fprintd-verify`.
///
/// `{prompt}` in the argument list is replaced with the unlock prompt.
#[derive(Debug, Clone)]
pub struct CommandBiometrics {
    pub command: String,
    pub args: Vec<String>,
    pub enrolled_command: Option<String>,
    pub enrolled_args: Vec<String>,
}

#[async_trait]
impl Biometrics for CommandBiometrics {
    async fn has_hardware(&self) -> Result<bool> {
        let found = which::which(&self.command).is_ok();
        if !found {
            debug!(command = %self.command, "verifier not found on PATH");
        }
        Ok(found)
    }

    async fn is_enrolled(&self) -> Result<bool> {
        let Some(command) = self.enrolled_command.as_deref() else {
            return Ok(true);
        };
        let output = Command::new(command)
            .args(&self.enrolled_args)
            .output()
            .await
            .with_context(|| format!("Failed to run enrolment check '{command}'"))?;
        Ok(output.status.success())
    }

    async fn authenticate(&self, prompt: &str) -> Result<BiometricOutcome> {
        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| arg.replace("{prompt}", prompt))
            .collect();
        let status = Command::new(&self.command)
            .args(&args)
            .status()
            .await
            .with_context(|| format!("Failed to run verifier '{}'", self.command))?;
        Ok(classify_exit(status.code(), exit_signal(&status)))
    }
}

#[cfg(unix)]
fn exit_signal(status: &std::process::ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &std::process::ExitStatus) -> Option<i32> {
    None
}

fn classify_exit(code: Option<i32>, signal: Option<i32>) -> BiometricOutcome {
    match (code, signal) {
        (Some(0), _) => BiometricOutcome::Success,
        (Some(EXIT_INTERRUPTED), _) | (_, Some(SIGINT)) => BiometricOutcome::Cancelled,
        (Some(code), _) => BiometricOutcome::Failed(format!("verifier exited with status {code}")),
        (None, Some(signal)) => {
            BiometricOutcome::Failed(format!("verifier killed by signal {signal}"))
        }
        (None, None) => BiometricOutcome::Failed("verifier exited abnormally".to_string()),
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
