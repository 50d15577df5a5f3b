use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct FakeBiometrics {
    hardware: bool,
    enrolled: bool,
    result: BiometricOutcome,
    challenges: Arc<AtomicUsize>,
}

impl FakeBiometrics {
    fn boxed(hardware: bool, enrolled: bool, result: BiometricOutcome) -> Box<dyn Biometrics> {
        Box::new(Self {
            hardware,
            enrolled,
            result,
            challenges: Arc::new(AtomicUsize::new(0)),
        })
    }
}

#[async_trait]
impl Biometrics for FakeBiometrics {
    async fn has_hardware(&self) -> Result<bool> {
        Ok(self.hardware)
    }

    async fn is_enrolled(&self) -> Result<bool> {
        Ok(self.enrolled)
    }

    async fn authenticate(&self, _prompt: &str) -> Result<BiometricOutcome> {
        self.challenges.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.clone())
    }
}

struct BrokenSensor;

#[async_trait]
impl Biometrics for BrokenSensor {
    async fn has_hardware(&self) -> Result<bool> {
        anyhow::bail!("sensor bus error")
    }

    async fn is_enrolled(&self) -> Result<bool> {
        Ok(true)
    }

    async fn authenticate(&self, _prompt: &str) -> Result<BiometricOutcome> {
        Ok(BiometricOutcome::Success)
    }
}

fn gate(biometrics: Box<dyn Biometrics>, policy: UnavailablePolicy) -> BiometricGate {
    BiometricGate::new(biometrics, policy, "Unlock Your Journal")
}

#[tokio::test]
async fn test_missing_hardware_follows_policy() {
    let allow = gate(
        FakeBiometrics::boxed(false, false, BiometricOutcome::Success),
        UnavailablePolicy::Allow,
    );
    assert_eq!(allow.unlock().await.unwrap(), UnlockOutcome::PassedThrough);

    let deny = gate(
        FakeBiometrics::boxed(false, false, BiometricOutcome::Success),
        UnavailablePolicy::Deny,
    );
    assert_eq!(deny.unlock().await.unwrap(), UnlockOutcome::Denied);
}

#[tokio::test]
async fn test_not_enrolled_skips_challenge() {
    let challenges = Arc::new(AtomicUsize::new(0));
    let fake = FakeBiometrics {
        hardware: true,
        enrolled: false,
        result: BiometricOutcome::Success,
        challenges: Arc::clone(&challenges),
    };
    let gate = gate(Box::new(fake), UnavailablePolicy::Allow);

    assert_eq!(gate.unlock().await.unwrap(), UnlockOutcome::PassedThrough);
    assert_eq!(challenges.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_challenge_results_map_to_outcomes() {
    let cases = [
        (BiometricOutcome::Success, UnlockOutcome::Unlocked),
        (BiometricOutcome::Cancelled, UnlockOutcome::Cancelled),
        (
            BiometricOutcome::Failed("no match".into()),
            UnlockOutcome::Failed("no match".into()),
        ),
    ];
    for (result, expected) in cases {
        let gate = gate(
            FakeBiometrics::boxed(true, true, result),
            UnavailablePolicy::Deny,
        );
        assert_eq!(gate.unlock().await.unwrap(), expected);
    }
}

#[tokio::test]
async fn test_sensor_errors_propagate() {
    let gate = gate(Box::new(BrokenSensor), UnavailablePolicy::Allow);
    let err = gate.unlock().await.unwrap_err();
    assert!(err.to_string().contains("sensor bus error"));
}

#[test]
fn test_grants_access() {
    assert!(UnlockOutcome::Unlocked.grants_access());
    assert!(UnlockOutcome::PassedThrough.grants_access());
    assert!(!UnlockOutcome::Denied.grants_access());
    assert!(!UnlockOutcome::Cancelled.grants_access());
    assert!(!UnlockOutcome::Failed("x".into()).grants_access());
}

#[test]
fn test_classify_exit() {
    assert_eq!(classify_exit(Some(0), None), BiometricOutcome::Success);
    assert_eq!(classify_exit(Some(130), None), BiometricOutcome::Cancelled);
    assert_eq!(classify_exit(None, Some(2)), BiometricOutcome::Cancelled);
    assert!(matches!(
        classify_exit(Some(1), None),
        BiometricOutcome::Failed(_)
    ));
    assert!(matches!(
        classify_exit(None, Some(9)),
        BiometricOutcome::Failed(_)
    ));
}

#[tokio::test]
async fn test_missing_verifier_counts_as_no_hardware() {
    let config = LockConfig {
        command: Some("daybook-no-such-verifier-xyz".into()),
        on_unavailable: UnavailablePolicy::Deny,
        ..LockConfig::default()
    };
    let gate = BiometricGate::from_config(&config);
    assert_eq!(gate.unlock().await.unwrap(), UnlockOutcome::Denied);
}

#[tokio::test]
async fn test_no_command_configured_uses_no_biometrics() {
    let gate = BiometricGate::from_config(&LockConfig::default());
    assert_eq!(gate.unlock().await.unwrap(), UnlockOutcome::PassedThrough);
}

#[cfg(unix)]
#[tokio::test]
async fn test_command_verifier_exit_codes() {
    let verifier = |script: &str| CommandBiometrics {
        command: "sh".into(),
        args: vec!["-c".into(), script.into()],
        enrolled_command: None,
        enrolled_args: Vec::new(),
    };

    assert_eq!(
        verifier("exit 0").authenticate("p").await.unwrap(),
        BiometricOutcome::Success
    );
    assert_eq!(
        verifier("exit 130").authenticate("p").await.unwrap(),
        BiometricOutcome::Cancelled
    );
    assert!(matches!(
        verifier("exit 1").authenticate("p").await.unwrap(),
        BiometricOutcome::Failed(_)
    ));
}

#[cfg(unix)]
#[tokio::test]
async fn test_command_verifier_substitutes_prompt() {
    let verifier = CommandBiometrics {
        command: "sh".into(),
        args: vec!["-c".into(), "test \"$0\" = 'Unlock now'".into(), "{prompt}".into()],
        enrolled_command: None,
        enrolled_args: Vec::new(),
    };
    assert_eq!(
        verifier.authenticate("Unlock now").await.unwrap(),
        BiometricOutcome::Success
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_enrolment_command() {
    let with_check = |check: &str| CommandBiometrics {
        command: "sh".into(),
        args: Vec::new(),
        enrolled_command: Some("sh".into()),
        enrolled_args: vec!["-c".into(), check.into()],
    };
    assert!(with_check("exit 0").is_enrolled().await.unwrap());
    assert!(!with_check("exit 3").is_enrolled().await.unwrap());
}
