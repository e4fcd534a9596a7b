//! ブラウザのコンソールへ `tracing` イベントを流すサブスクライバ。
//!
//! wasm32 には stdout も `SystemTime` も無いので、fmt レイヤーの出力を
//! 1 イベント 1 行で `console.log` / `console.warn` に渡し、時刻は付けない。

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Default filter: engine events at info and above.
const FILTER: &str = "allay_clicker=info";

/// Buffers one formatted event and emits it when dropped.
pub struct ConsoleWriter {
    buf: Vec<u8>,
    warn: bool,
}

impl ConsoleWriter {
    fn line(&self) -> String {
        String::from_utf8_lossy(&self.buf).trim_end().to_string()
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = self.line();
        if line.is_empty() {
            return;
        }
        #[cfg(target_arch = "wasm32")]
        {
            if self.warn {
                web_sys::console::warn_1(&line.into());
            } else {
                web_sys::console::log_1(&line.into());
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        eprintln!("{line}");
    }
}

pub struct MakeConsoleWriter;

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            buf: Vec::new(),
            warn: false,
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            buf: Vec::new(),
            warn: *meta.level() <= Level::WARN,
        }
    }
}

/// Install the console subscriber. Safe to call more than once.
pub fn init() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(FILTER)
        .with_writer(MakeConsoleWriter)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .try_init();
    if installed.is_ok() {
        tracing::info!("allay-clicker starting");
    }
}
