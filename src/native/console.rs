//! Native console output
//!
//! Lines go to stdout unless the calling thread has an active capture,
//! in which case they are appended to the capture buffer instead.

use std::cell::RefCell;
use std::io::Write;

thread_local! {
    static CAPTURE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Write one line of native output
pub fn write_line(line: &str) {
    let captured = CAPTURE.with(|capture| match capture.borrow_mut().as_mut() {
        Some(buf) => {
            buf.push_str(line);
            buf.push('\n');
            true
        }
        None => false,
    });

    if !captured {
        // A closed stdout is not worth failing a native call over.
        let _ = writeln!(std::io::stdout().lock(), "{}", line);
    }
}

/// Run `f` and collect everything it writes on this thread
pub fn capture<R>(f: impl FnOnce() -> R) -> (R, String) {
    struct Restore(Option<Option<String>>);

    impl Drop for Restore {
        fn drop(&mut self) {
            if let Some(previous) = self.0.take() {
                CAPTURE.with(|capture| *capture.borrow_mut() = previous);
            }
        }
    }

    let previous = CAPTURE.with(|capture| capture.replace(Some(String::new())));
    let mut restore = Restore(Some(previous));

    let result = f();

    let output = CAPTURE
        .with(|capture| capture.replace(restore.0.take().flatten()))
        .unwrap_or_default();
    (result, output)
}
