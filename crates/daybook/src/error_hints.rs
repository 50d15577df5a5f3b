//! User-facing hints for common CLI failures.

use anyhow::Error;
use daybook_core::JournalError;

const HINT_SIGN_IN: &str =
    "hint: sign in with 'daybook sign-in --email <EMAIL>' or create an account with 'daybook sign-up --email <EMAIL>'";
const HINT_UNLOCK: &str = "hint: run 'daybook unlock'";
const HINT_LIST_ENTRIES: &str = "hint: list entry ids with 'daybook entry list'";
const HINT_LIST_TODOS: &str = "hint: list task ids with 'daybook todo list' (add --completed for done tasks)";
const HINT_LONGER_ID: &str = "hint: type more characters of the id";
const HINT_CONFIG: &str =
    "hint: check settings with 'daybook config show' or write a fresh file with 'daybook config init --force'";

pub fn suggest_fix(err: &Error) -> Option<&'static str> {
    for cause in err.chain() {
        if let Some(journal_err) = cause.downcast_ref::<JournalError>() {
            return match journal_err {
                JournalError::NotSignedIn => Some(HINT_SIGN_IN),
                JournalError::Locked => Some(HINT_UNLOCK),
                JournalError::AmbiguousId { .. } => Some(HINT_LONGER_ID),
                JournalError::NotFound { kind: "entry", .. } => Some(HINT_LIST_ENTRIES),
                JournalError::NotFound { kind: "todo", .. } => Some(HINT_LIST_TODOS),
                _ => None,
            };
        }
    }

    let chain_text = err
        .chain()
        .map(|cause| cause.to_string().to_lowercase())
        .collect::<Vec<_>>()
        .join(" | ");
    if chain_text.contains("config") || chain_text.contains("firebase.") || chain_text.contains("lock.") {
        return Some(HINT_CONFIG);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_hint_for_not_signed_in() {
        let err: Error = JournalError::NotSignedIn.into();
        assert_eq!(suggest_fix(&err), Some(HINT_SIGN_IN));
    }

    #[test]
    fn test_hint_for_locked_with_context() {
        let err = Error::from(JournalError::Locked).context("loading journal");
        assert_eq!(suggest_fix(&err), Some(HINT_UNLOCK));
    }

    #[test]
    fn test_hint_for_missing_ids() {
        let entry: Error = JournalError::NotFound {
            kind: "entry",
            id: "01H".into(),
        }
        .into();
        assert_eq!(suggest_fix(&entry), Some(HINT_LIST_ENTRIES));

        let todo: Error = JournalError::NotFound {
            kind: "todo",
            id: "01H".into(),
        }
        .into();
        assert_eq!(suggest_fix(&todo), Some(HINT_LIST_TODOS));
    }

    #[test]
    fn test_hint_for_config_errors() {
        let err = anyhow!("firebase.api_key is required when store.backend = \"firestore\"");
        assert_eq!(suggest_fix(&err), Some(HINT_CONFIG));
    }

    #[test]
    fn test_validation_errors_have_no_hint() {
        let err: Error = JournalError::EmptyEntry.into();
        assert_eq!(suggest_fix(&err), None);
        assert_eq!(suggest_fix(&anyhow!("connection reset")), None);
    }
}
