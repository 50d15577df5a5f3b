//! Signed-in application state: identity, the persisted session, the
//! biometric gate, and the journal and todo views bound to one user.

pub mod firebase_auth;
pub mod gate;
pub mod identity;
pub mod journal;
pub mod session;
pub mod todos;

#[cfg(test)]
mod test_support;

pub use firebase_auth::FirebaseAuthClient;
pub use gate::{
    BiometricGate, BiometricOutcome, Biometrics, CommandBiometrics, NoBiometrics, UnlockOutcome,
};
pub use identity::{Identity, IdentityProvider, LocalIdentityProvider};
pub use journal::JournalBook;
pub use session::{AppSession, SessionStore};
pub use todos::TodoBoard;
