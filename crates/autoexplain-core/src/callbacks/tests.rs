//! Tests for the callback registry

use super::*;

fn noop() -> Arc<dyn Callback> {
    Arc::new(FnCallback(|_: &mut Statement| {}))
}

mod registration {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_names_follow_registration_order() {
        let callbacks = Callbacks::new();
        callbacks
            .register(ExecutionPath::Query, Stage::Before, "first", noop())
            .unwrap();
        callbacks
            .register(ExecutionPath::Query, Stage::Before, "second", noop())
            .unwrap();
        callbacks
            .register(ExecutionPath::Query, Stage::After, "third", noop())
            .unwrap();

        assert_eq!(
            callbacks.names(ExecutionPath::Query, Stage::Before),
            vec!["first".to_string(), "second".to_string()]
        );
        assert_eq!(
            callbacks.names(ExecutionPath::Query, Stage::After),
            vec!["third".to_string()]
        );
        assert!(callbacks.names(ExecutionPath::Raw, Stage::Before).is_empty());
    }

    #[test]
    fn test_duplicate_name_rejected_across_stages() {
        let callbacks = Callbacks::new();
        callbacks
            .register(ExecutionPath::Raw, Stage::Before, "timer", noop())
            .unwrap();

        let err = callbacks
            .register(ExecutionPath::Raw, Stage::After, "timer", noop())
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::DuplicateCallback { path: ExecutionPath::Raw, ref name } if name == "timer"
        ));
        assert!(callbacks.names(ExecutionPath::Raw, Stage::After).is_empty());
    }

    #[test]
    fn test_same_name_allowed_on_other_path() {
        let callbacks = Callbacks::new();
        for path in ExecutionPath::ALL {
            callbacks
                .register(path, Stage::After, "shared", noop())
                .unwrap();
        }
        for path in ExecutionPath::ALL {
            assert_eq!(callbacks.names(path, Stage::After), vec!["shared".to_string()]);
        }
    }

    #[test]
    fn test_remove() {
        let callbacks = Callbacks::new();
        callbacks
            .register(ExecutionPath::Row, Stage::After, "gone", noop())
            .unwrap();

        assert!(callbacks.remove(ExecutionPath::Row, "gone"));
        assert!(!callbacks.remove(ExecutionPath::Row, "gone"));
        assert!(callbacks.names(ExecutionPath::Row, Stage::After).is_empty());

        // Name is free again after removal
        callbacks
            .register(ExecutionPath::Row, Stage::Before, "gone", noop())
            .unwrap();
    }
}

mod plugins {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_claim_and_release() {
        let callbacks = Callbacks::new();
        callbacks.claim_plugin("p").unwrap();
        assert!(callbacks.has_plugin("p"));
        assert!(matches!(
            callbacks.claim_plugin("p"),
            Err(DbError::DuplicatePlugin(name)) if name == "p"
        ));

        callbacks.release_plugin("p");
        assert!(!callbacks.has_plugin("p"));
        callbacks.claim_plugin("p").unwrap();
    }
}
