use std::{cell::RefCell, io, rc::Rc};

/// An in-memory output sink that can be shared with an interpreter.
///
/// Clones refer to the same buffer, so a host keeps one handle, gives another
/// to [`Interpreter::with_output`](crate::interpreter::evaluator::core::Interpreter::with_output)
/// and reads everything the program printed afterwards.
///
/// ## Example
/// ```
/// use std::io::Write;
///
/// use volt::util::output::SharedOutput;
///
/// let out = SharedOutput::new();
/// let mut writer = out.clone();
/// writeln!(writer, "hello").unwrap();
///
/// assert_eq!(out.contents(), "hello\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedOutput {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl SharedOutput {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, decoded lossily as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.borrow()).into_owned()
    }

    /// Discards everything written so far.
    pub fn clear(&self) {
        self.buffer.borrow_mut().clear();
    }
}

impl io::Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
