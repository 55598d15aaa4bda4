use std::io::{self, Write};

pub fn write_stdout_text(text: &str) -> io::Result<()> {
    tolerate_closed_pipe(write_and_flush(&mut io::stdout().lock(), text.as_bytes(), false))
}

pub fn write_stdout_line(text: &str) -> io::Result<()> {
    tolerate_closed_pipe(write_and_flush(&mut io::stdout().lock(), text.as_bytes(), true))
}

fn write_and_flush(writer: &mut impl Write, bytes: &[u8], newline: bool) -> io::Result<()> {
    writer.write_all(bytes)?;
    if newline {
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// A reader closing the pipe early (`spendlens report x.csv | head`) is not an error.
fn tolerate_closed_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use super::{tolerate_closed_pipe, write_and_flush};

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn broken_pipe_is_swallowed() {
        assert!(tolerate_closed_pipe(write_and_flush(&mut ClosedPipe, b"row", true)).is_ok());
    }

    #[test]
    fn newline_is_appended_on_request() {
        let mut buffer = Vec::new();
        assert!(write_and_flush(&mut buffer, b"row", true).is_ok());
        assert_eq!(buffer, b"row\n");
    }
}
