use std::sync::RwLock;

/// Process-wide validation-error handler.
pub type ValidationErrorHandler = Box<dyn Fn(&str) + Send + Sync>;

static GLOBAL_HANDLER: RwLock<Option<ValidationErrorHandler>> = RwLock::new(None);

/// Install (or clear, with `None`) the process-wide validation-error handler.
///
/// Validation errors are spec-level diagnostics; parsing continues after
/// reporting them. Every message arrives prefixed with `"Validation Error: "`.
/// A handler injected per parse (see [`crate::Url::parse_with_handler`])
/// takes precedence over the process-wide one.
pub fn set_validation_error_handler(handler: Option<ValidationErrorHandler>) {
    if let Ok(mut guard) = GLOBAL_HANDLER.write() {
        *guard = handler;
    }
}

/// Reporting channel threaded through the parser. Holds an optional local
/// handler and falls back to the process-wide one.
#[derive(Default, Clone, Copy)]
pub(crate) struct Reporter<'a> {
    handler: Option<&'a dyn Fn(&str)>,
}

impl<'a> Reporter<'a> {
    pub(crate) fn new(handler: &'a dyn Fn(&str)) -> Self {
        Self {
            handler: Some(handler),
        }
    }

    pub(crate) fn report(&self, message: &str) {
        if let Some(handler) = self.handler {
            handler(&format!("Validation Error: {message}"));
            return;
        }
        if let Ok(guard) = GLOBAL_HANDLER.read() {
            if let Some(handler) = guard.as_ref() {
                handler(&format!("Validation Error: {message}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn test_local_handler_receives_prefixed_messages() {
        let messages = Mutex::new(Vec::new());
        let sink = |message: &str| {
            if let Ok(mut guard) = messages.lock() {
                guard.push(message.to_string());
            }
        };
        let reporter = Reporter::new(&sink);
        reporter.report("something looked off");

        let collected = messages.into_inner().unwrap_or_default();
        assert_eq!(collected, ["Validation Error: something looked off"]);
    }

    #[test]
    fn test_absent_handler_discards_messages() {
        // Must not panic or block with no handler installed
        let reporter = Reporter::default();
        reporter.report("discarded");
    }

    #[test]
    fn test_local_handler_shadows_global() {
        static GLOBAL_HITS: AtomicUsize = AtomicUsize::new(0);
        // Count only this test's marker so concurrently running parses
        // cannot trip the assertion below.
        set_validation_error_handler(Some(Box::new(|message| {
            if message.contains("local only") {
                GLOBAL_HITS.fetch_add(1, Ordering::SeqCst);
            }
        })));

        let local_hits = AtomicUsize::new(0);
        let sink = |_: &str| {
            local_hits.fetch_add(1, Ordering::SeqCst);
        };
        Reporter::new(&sink).report("local only");

        set_validation_error_handler(None);
        assert_eq!(local_hits.load(Ordering::SeqCst), 1);
        assert_eq!(GLOBAL_HITS.load(Ordering::SeqCst), 0);
    }
}
