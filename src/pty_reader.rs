use crate::screen::SharedScreen;
use std::io::Read;
use std::thread;
use tokio::sync::oneshot;
use tracing::{debug, trace};

/// Spawns a background thread draining a PTY into `screen`.
///
/// The returned receiver resolves once the PTY reaches end-of-stream (the
/// program exited or was killed).
pub fn spawn_reader<R: Read + Send + 'static>(
    mut reader: R,
    screen: SharedScreen,
) -> std::io::Result<oneshot::Receiver<()>> {
    let (tx, rx) = oneshot::channel();

    thread::Builder::new()
        .name("pty-reader".to_string())
        .spawn(move || {
            let mut buffer = [0u8; 4096];
            loop {
                match reader.read(&mut buffer) {
                    Ok(0) => break, // EOF
                    Ok(n) => {
                        trace!(bytes = n, "pty output");
                        screen.write(&buffer[..n]);
                    }
                    // Linux reports a closed PTY as EIO.
                    Err(e) => {
                        debug!("pty read ended: {e}");
                        break;
                    }
                }
            }
            let _ = tx.send(());
        })?;

    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, ColorScheme, Palette};
    use crate::vterm::VirtualTerminal;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_drains_reader_and_signals_eof() {
        let scheme = ColorScheme::new(Palette::default(), Color::rgb(1, 1, 1), Color::rgb(0, 0, 0));
        let screen = SharedScreen::new(VirtualTerminal::new(20, 2, scheme));
        let done = spawn_reader(Cursor::new(b"from the pty".to_vec()), screen.clone()).unwrap();
        done.await.unwrap();
        assert!(screen.contains("from the pty"));
    }
}
