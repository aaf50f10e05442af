use std::cell::RefCell;
use std::io::{Result as IoResult, Write};
use std::rc::Rc;

/// Memory-backed writer for capturing what a console prints.
///
/// Clones share the same buffer, so one clone can be handed to a console while
/// another is kept to read the output back.
#[derive(Clone, Default)]
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return inner Rc so caller can read collected bytes after the console ran.
    pub fn into_inner(self) -> Rc<RefCell<Vec<u8>>> {
        self.buf
    }

    /// Convenience: create writer and return (writer, rc_handle).
    pub fn with_handle() -> (Self, Rc<RefCell<Vec<u8>>>) {
        let mw = MemWriter::new();
        let rc = mw.buf.clone();
        (mw, rc)
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.borrow()).into_owned()
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}
