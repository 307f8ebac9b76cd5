use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::frame::{self, CallSite, ErrorInfo};
use crate::loader::ResourceLoader;
use crate::options::Options;
use crate::support::{ResolvedPosition, SourceMapSupport};

/// A function that renders the stack trace of an error.
pub type StackFormatter = Rc<dyn Fn(&ErrorInfo, &[&dyn CallSite]) -> String>;

/// The host's slot for the global stack trace formatter.
pub trait StackTraceHook {
    /// Installs `formatter` (or the host default for `None`), returning the
    /// previously installed formatter.
    fn swap(&mut self, formatter: Option<StackFormatter>) -> Option<StackFormatter>;
}

/// A [`StackTraceHook`] backed by a shared cell.
///
/// Clones refer to the same slot.
#[derive(Clone, Default)]
pub struct FormatterSlot(Rc<RefCell<Option<StackFormatter>>>);

impl FormatterSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_installed(&self) -> bool {
        self.0.borrow().is_some()
    }

    /// Formats with the installed formatter, `None` if there is none.
    pub fn format(&self, error: &ErrorInfo, sites: &[&dyn CallSite]) -> Option<String> {
        let formatter = self.0.borrow().clone()?;
        Some(formatter(error, sites))
    }
}

impl fmt::Debug for FormatterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatterSlot")
            .field("installed", &self.is_installed())
            .finish()
    }
}

impl StackTraceHook for FormatterSlot {
    fn swap(&mut self, formatter: Option<StackFormatter>) -> Option<StackFormatter> {
        self.0.replace(formatter)
    }
}

/// An Error that can happen when starting a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Another session is still alive.
    #[error("source map support is already initialized")]
    AlreadyInitialized,
}

thread_local! {
    static ACTIVE: Cell<bool> = const { Cell::new(false) };
}

/// Whether a [`Session`] is alive on the current thread.
pub fn is_active() -> bool {
    ACTIVE.with(Cell::get)
}

/// An active source map support session.
///
/// While the session is alive, stack traces formatted through the host hook
/// are mapped to their original sources. Only one session can be alive at a
/// time per thread, as hosts run all scripts of a runtime on a single thread.
/// Dropping the session (or calling [`disable`](Self::disable)) restores the
/// formatter that was installed before.
pub struct Session<L, H: StackTraceHook> {
    support: Rc<RefCell<SourceMapSupport<L>>>,
    hook: H,
    previous: Option<StackFormatter>,
}

impl<L: ResourceLoader + 'static, H: StackTraceHook> Session<L, H> {
    /// Creates the source map support and installs it into `hook`.
    pub fn initialize(options: Options, loader: L, mut hook: H) -> Result<Self, SessionError> {
        if ACTIVE.with(|active| active.replace(true)) {
            tracing::warn!("source map support is already initialized");
            return Err(SessionError::AlreadyInitialized);
        }

        let debug = options.debug;
        if debug {
            tracing::debug!("initializing source map support");
        }

        let support = Rc::new(RefCell::new(SourceMapSupport::new(loader, options)));
        let formatter: StackFormatter = {
            let support = Rc::clone(&support);
            Rc::new(move |error: &ErrorInfo, sites: &[&dyn CallSite]| {
                match support.try_borrow_mut() {
                    Ok(mut support) => support.format_stack_trace(error, sites),
                    // re-entered while resolving, the caches are in use
                    Err(_) => {
                        let frames = sites.iter().map(|site| frame::format_raw(*site));
                        frame::format_trace(error, frames)
                    }
                }
            })
        };
        let previous = hook.swap(Some(formatter));

        if debug {
            tracing::debug!("source map support initialized successfully");
        }

        Ok(Self {
            support,
            hook,
            previous,
        })
    }
}

impl<L: ResourceLoader, H: StackTraceHook> Session<L, H> {
    /// See [`SourceMapSupport::resolve`].
    pub fn resolve(
        &self,
        generated_file: &str,
        line: u32,
        column: u32,
    ) -> Option<ResolvedPosition> {
        self.support
            .borrow_mut()
            .resolve(generated_file, line, column)
    }

    /// See [`SourceMapSupport::format_stack_trace`].
    pub fn format_stack_trace(&self, error: &ErrorInfo, sites: &[&dyn CallSite]) -> String {
        self.support.borrow_mut().format_stack_trace(error, sites)
    }

    pub fn clear_caches(&self) {
        self.support.borrow_mut().clear_caches();
    }

    pub fn enable_debug(&self) {
        self.support.borrow_mut().set_debug(true);
    }

    pub fn disable_debug(&self) {
        self.support.borrow_mut().set_debug(false);
    }

    /// Ends the session, restoring the previous formatter.
    pub fn disable(self) {}
}

impl<L, H: StackTraceHook> Drop for Session<L, H> {
    fn drop(&mut self) {
        self.hook.swap(self.previous.take());

        if let Ok(mut support) = self.support.try_borrow_mut() {
            support.clear_caches();
            if support.options().debug {
                tracing::debug!("source map support disabled");
            }
        }

        ACTIVE.with(|active| active.set(false));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::InMemoryLoader;
    use crate::Frame;

    const MAP: &str =
        r#"{"version":3,"sources":["main.ts"],"names":[],"mappings":"AAAA;AACA"}"#;

    fn loader() -> InMemoryLoader {
        InMemoryLoader::new("app").with_file("main.js.map", MAP)
    }

    #[test]
    fn installs_and_restores_formatter() {
        let previous: StackFormatter =
            Rc::new(|error: &ErrorInfo, _: &[&dyn CallSite]| format!("host: {}", error.message));
        let mut slot = FormatterSlot::new();
        slot.swap(Some(previous));

        let error = ErrorInfo::new("Error", "boom");
        let frame = Frame::new("main.js", 2, 3).with_function("main");
        let sites: [&dyn CallSite; 1] = [&frame];

        let session = Session::initialize(Options::default(), loader(), slot.clone()).unwrap();
        assert!(is_active());
        assert_eq!(
            slot.format(&error, &sites).unwrap(),
            "Error: boom\n    at main (main.ts:2:1)"
        );

        session.disable();
        assert!(!is_active());
        assert_eq!(slot.format(&error, &sites).unwrap(), "host: boom");
    }

    #[test]
    fn rejects_second_session() {
        let slot = FormatterSlot::new();
        let session = Session::initialize(Options::default(), loader(), slot.clone()).unwrap();

        let err = Session::initialize(Options::default(), loader(), slot.clone())
            .err()
            .unwrap();
        assert_eq!(err, SessionError::AlreadyInitialized);
        // the failed attempt leaves the running session alone
        assert!(slot.is_installed());

        drop(session);
        assert!(!slot.is_installed());

        let session = Session::initialize(Options::default(), loader(), slot.clone()).unwrap();
        assert_eq!(session.resolve("main.js", 1, 1).unwrap().source, "main.ts");
    }

    #[test]
    fn clears_caches() {
        let loader: &'static InMemoryLoader = Box::leak(Box::new(loader()));
        let session =
            Session::initialize(Options::default(), loader, FormatterSlot::new()).unwrap();

        assert!(session.resolve("main.js", 1, 1).is_some());
        loader.set_unavailable(true);
        assert!(session.resolve("main.js", 1, 1).is_some());

        session.clear_caches();
        assert!(session.resolve("main.js", 1, 1).is_none());
    }

    #[test]
    fn formats_unmapped_frames_when_reentered() {
        let slot = FormatterSlot::new();
        let session = Session::initialize(Options::default(), loader(), slot.clone()).unwrap();

        let error = ErrorInfo::new("Error", "boom");
        let frame = Frame::new("main.js", 2, 3);
        let sites: [&dyn CallSite; 1] = [&frame];

        let _guard = session.support.borrow_mut();
        assert_eq!(
            slot.format(&error, &sites).unwrap(),
            "Error: boom\n    at <anonymous> (main.js:2:3)"
        );
    }
}
