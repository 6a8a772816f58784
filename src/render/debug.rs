// debug.rs - Per-call OpenGL error checking
//
// Every GL call made through `gl_call!` drains the error queue before the call,
// runs it, then drains again. Anything found afterwards was raised by that call.

use std::fmt;
use thiserror::Error;

/// Source of pending error flags. `0` means the queue is empty.
pub trait ErrorQueue {
    fn next_error(&mut self) -> u32;
}

/// The error queue of the GL context current on this thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlErrorQueue;

impl ErrorQueue for GlErrorQueue {
    fn next_error(&mut self) -> u32 {
        unsafe { gl::GetError() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlErrorKind {
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    InvalidFramebufferOperation,
    OutOfMemory,
    StackUnderflow,
    StackOverflow,
    Unknown,
}

impl GlErrorKind {
    pub fn from_code(code: u32) -> Self {
        match code {
            gl::INVALID_ENUM => GlErrorKind::InvalidEnum,
            gl::INVALID_VALUE => GlErrorKind::InvalidValue,
            gl::INVALID_OPERATION => GlErrorKind::InvalidOperation,
            gl::INVALID_FRAMEBUFFER_OPERATION => GlErrorKind::InvalidFramebufferOperation,
            gl::OUT_OF_MEMORY => GlErrorKind::OutOfMemory,
            gl::STACK_UNDERFLOW => GlErrorKind::StackUnderflow,
            gl::STACK_OVERFLOW => GlErrorKind::StackOverflow,
            _ => GlErrorKind::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GlErrorKind::InvalidEnum => "invalid-enum",
            GlErrorKind::InvalidValue => "invalid-value",
            GlErrorKind::InvalidOperation => "invalid-operation",
            GlErrorKind::InvalidFramebufferOperation => "invalid-framebuffer-operation",
            GlErrorKind::OutOfMemory => "out-of-memory",
            GlErrorKind::StackUnderflow => "stack-underflow",
            GlErrorKind::StackOverflow => "stack-overflow",
            GlErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for GlErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a guarded call was written, and what it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub call: &'static str,
    pub file: &'static str,
    pub line: u32,
}

impl CallSite {
    pub const fn new(call: &'static str, file: &'static str, line: u32) -> Self {
        Self { call, file, line }
    }
}

/// One error flag observed after a guarded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlErrorRecord {
    pub code: u32,
    pub kind: GlErrorKind,
    pub call: &'static str,
    pub file: &'static str,
    pub line: u32,
}

impl GlErrorRecord {
    pub fn new(code: u32, site: &CallSite) -> Self {
        Self {
            code,
            kind: GlErrorKind::from_code(code),
            call: site.call,
            file: site.file,
            line: site.line,
        }
    }
}

impl fmt::Display for GlErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[OpenGL error 0x{:04X} {}] {} at {}:{}",
            self.code, self.kind, self.call, self.file, self.line
        )
    }
}

#[derive(Debug, Error)]
#[error("{} OpenGL error(s) after {}", .records.len(), self.first_call())]
pub struct GlCallError {
    pub records: Vec<GlErrorRecord>,
}

impl GlCallError {
    fn first_call(&self) -> &'static str {
        self.records.first().map_or("<unknown call>", |r| r.call)
    }
}

/// Drains the queue and drops whatever was there. Returns how many flags were dropped.
pub fn clear_pending_errors<Q: ErrorQueue + ?Sized>(queue: &mut Q) -> usize {
    let mut dropped = 0;
    while queue.next_error() != gl::NO_ERROR {
        dropped += 1;
    }
    if dropped > 0 {
        log::trace!("Discarded {} stale OpenGL error flag(s)", dropped);
    }
    dropped
}

/// Drains the queue, attributing every flag to `site`.
pub fn drain_errors<Q: ErrorQueue + ?Sized>(queue: &mut Q, site: &CallSite) -> Vec<GlErrorRecord> {
    let mut records = Vec::new();
    loop {
        let code = queue.next_error();
        if code == gl::NO_ERROR {
            break;
        }
        records.push(GlErrorRecord::new(code, site));
    }
    records
}

/// Drains the queue and logs each flag. `true` if the queue was already empty.
pub fn report_and_check<Q: ErrorQueue + ?Sized>(queue: &mut Q, site: &CallSite) -> bool {
    let records = drain_errors(queue, site);
    for record in &records {
        log::error!("{}", record);
    }
    records.is_empty()
}

/// Runs `work` with a clean queue before it and a check after it.
pub fn guarded_call<Q, T, F>(queue: &mut Q, site: CallSite, work: F) -> Result<T, GlCallError>
where
    Q: ErrorQueue + ?Sized,
    F: FnOnce() -> T,
{
    clear_pending_errors(queue);
    let value = work();

    let records = drain_errors(queue, &site);
    if records.is_empty() {
        Ok(value)
    } else {
        for record in &records {
            log::error!("{}", record);
        }
        Err(GlCallError { records })
    }
}

/// A failed GL call is a programming error: report it and stop the process.
pub fn halt(err: &GlCallError) -> ! {
    for record in &err.records {
        log::error!("fatal: {}", record);
    }
    log::logger().flush();
    std::process::abort()
}

/// Wraps an (unsafe) GL call in a [`guarded_call`] against the current context,
/// halting on any error it raised.
///
/// ```ignore
/// gl_call!(gl::BindBuffer(gl::ARRAY_BUFFER, id));
/// let location = gl_call!(gl::GetUniformLocation(program, name.as_ptr()));
/// ```
#[macro_export]
macro_rules! gl_call {
    ($call:expr) => {
        $crate::render::debug::guarded_call(
            &mut $crate::render::debug::GlErrorQueue,
            $crate::render::debug::CallSite::new(stringify!($call), file!(), line!()),
            || unsafe { $call },
        )
        .unwrap_or_else(|err| $crate::render::debug::halt(&err))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Shared fake queue: the test pushes flags through one handle while
    /// the guarded call drains through another.
    #[derive(Clone, Default)]
    struct FakeQueue {
        pending: Rc<RefCell<VecDeque<u32>>>,
        polls: Rc<RefCell<usize>>,
    }

    impl FakeQueue {
        fn push(&self, code: u32) {
            self.pending.borrow_mut().push_back(code);
        }

        fn polls(&self) -> usize {
            *self.polls.borrow()
        }

        fn is_empty(&self) -> bool {
            self.pending.borrow().is_empty()
        }
    }

    impl ErrorQueue for FakeQueue {
        fn next_error(&mut self) -> u32 {
            *self.polls.borrow_mut() += 1;
            self.pending.borrow_mut().pop_front().unwrap_or(gl::NO_ERROR)
        }
    }

    const SITE: CallSite = CallSite::new("gl::DrawArrays(gl::TRIANGLES, 0, 3)", "src/scene.rs", 42);

    #[test]
    fn test_classification_table() {
        let table = [
            (gl::INVALID_ENUM, "invalid-enum"),
            (gl::INVALID_VALUE, "invalid-value"),
            (gl::INVALID_OPERATION, "invalid-operation"),
            (gl::INVALID_FRAMEBUFFER_OPERATION, "invalid-framebuffer-operation"),
            (gl::OUT_OF_MEMORY, "out-of-memory"),
            (gl::STACK_UNDERFLOW, "stack-underflow"),
            (gl::STACK_OVERFLOW, "stack-overflow"),
            (0x1234, "unknown"),
        ];
        for (code, expected) in table {
            assert_eq!(GlErrorKind::from_code(code).as_str(), expected);
        }
    }

    #[test]
    fn test_clean_call_succeeds() {
        let queue = FakeQueue::default();
        let mut handle = queue.clone();

        let value = guarded_call(&mut handle, SITE, || 7).unwrap();

        assert_eq!(value, 7);
        // One empty poll before the work and one after.
        assert_eq!(queue.polls(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_stale_errors_are_not_blamed_on_the_call() {
        let queue = FakeQueue::default();
        queue.push(gl::INVALID_ENUM);
        queue.push(gl::INVALID_VALUE);
        let mut handle = queue.clone();

        assert!(guarded_call(&mut handle, SITE, || ()).is_ok());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_invalid_operation_would_halt() {
        let queue = FakeQueue::default();
        let pusher = queue.clone();
        let mut handle = queue.clone();

        let err = guarded_call(&mut handle, SITE, move || pusher.push(gl::INVALID_OPERATION))
            .unwrap_err();

        assert_eq!(err.records.len(), 1);
        let record = &err.records[0];
        assert_eq!(record.code, gl::INVALID_OPERATION);
        assert_eq!(record.kind, GlErrorKind::InvalidOperation);
        assert_eq!(record.kind.as_str(), "invalid-operation");
        assert_eq!(record.call, SITE.call);
        assert_eq!(record.file, "src/scene.rs");
        assert_eq!(record.line, 42);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_unknown_code_still_fails() {
        let queue = FakeQueue::default();
        let pusher = queue.clone();
        let mut handle = queue.clone();

        let err = guarded_call(&mut handle, SITE, move || pusher.push(0xBEEF)).unwrap_err();
        assert_eq!(err.records[0].kind, GlErrorKind::Unknown);
    }

    #[test]
    fn test_report_and_check() {
        let mut queue = FakeQueue::default();
        assert!(report_and_check(&mut queue, &SITE));

        queue.push(gl::OUT_OF_MEMORY);
        queue.push(gl::STACK_OVERFLOW);
        assert!(!report_and_check(&mut queue, &SITE));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clear_counts_dropped_flags() {
        let mut queue = FakeQueue::default();
        queue.push(gl::INVALID_VALUE);
        queue.push(gl::INVALID_VALUE);
        assert_eq!(clear_pending_errors(&mut queue), 2);
        assert_eq!(clear_pending_errors(&mut queue), 0);
    }

    #[test]
    fn test_record_display_has_every_field() {
        let record = GlErrorRecord::new(gl::INVALID_OPERATION, &SITE);
        let text = record.to_string();
        assert!(text.contains("0x0502"));
        assert!(text.contains("invalid-operation"));
        assert!(text.contains("gl::DrawArrays"));
        assert!(text.contains("src/scene.rs:42"));
    }
}
