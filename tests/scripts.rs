use std::{cell::RefCell, fs, io::Cursor, rc::Rc};

use cflat::Interpreter;
use walkdir::WalkDir;

#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl std::io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Runs every `.cflat` fixture under `tests/scripts` and compares what it
/// prints against the sibling `.out` file.
#[test]
fn script_fixtures_match_their_expected_output() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| {
                                         e.path().extension().is_some_and(|ext| ext == "cflat")
                                     })
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("failed to read {path:?}: {e}"));

        let expected_path = path.with_extension("out");
        let expected = fs::read_to_string(&expected_path).unwrap_or_else(|e| {
                           panic!("failed to read {expected_path:?}: {e}")
                       });

        let buffer = SharedBuffer::default();
        let mut interpreter = Interpreter::with_io(Box::new(buffer.clone()),
                                                   Box::new(Cursor::new(String::new())));

        if let Err(error) = interpreter.run_source(&source, "fixture.cflat") {
            panic!("fixture {path:?} failed:\n{error}");
        }

        let output = String::from_utf8(buffer.0.borrow().clone()).expect("output is UTF-8");
        assert_eq!(output, expected, "wrong output for fixture {path:?}");

        count += 1;
    }

    assert!(count > 0, "no .cflat fixtures under tests/scripts");
}
