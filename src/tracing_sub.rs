use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Writer handed out per event: the shared log file when one is open,
/// stderr otherwise. The dashboard owns the terminal, so it logs to a file.
pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    File(Arc<Mutex<File>>),
    Stderr(io::Stderr),
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            DelegatingInner::File(file) => file
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .write(buf),
            DelegatingInner::Stderr(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            DelegatingInner::File(file) => file
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .flush(),
            DelegatingInner::Stderr(s) => s.flush(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SubscriberMakeWriter {
    file: Option<Arc<Mutex<File>>>,
}

impl SubscriberMakeWriter {
    pub fn stderr() -> Self {
        Self::default()
    }

    pub fn file(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Some(Arc::new(Mutex::new(file))),
        })
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        let inner = match &self.file {
            Some(file) => DelegatingInner::File(Arc::clone(file)),
            None => DelegatingInner::Stderr(io::stderr()),
        };
        DelegatingWriter { inner }
    }
}

fn filter_for(config: &LoggingConfig, fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.filter.as_deref().unwrap_or(fallback)))
        .unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install the global subscriber. `RUST_LOG` overrides the configured
/// filter. When `prefer_file` is set (the dashboard) and no file is
/// configured, logging stays off unless `RUST_LOG` asks. Safe to call more
/// than once; later calls are no-ops.
pub fn init(config: &LoggingConfig, prefer_file: bool) {
    let writer = match config.file.as_deref().map(SubscriberMakeWriter::file) {
        Some(Ok(writer)) => writer,
        Some(Err(err)) => {
            eprintln!("multispace: cannot open log file: {err}");
            SubscriberMakeWriter::stderr()
        }
        None => SubscriberMakeWriter::stderr(),
    };
    let fallback = if prefer_file && config.file.is_none() {
        "off"
    } else {
        "multispace=info,warn"
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(config, fallback))
        .with_writer(writer)
        .with_ansi(config.file.is_none())
        .with_target(false)
        .with_thread_names(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn file_writer_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("multispace.log");
        let make = SubscriberMakeWriter::file(&path).unwrap();
        make.make_writer().write_all(b"one\n").unwrap();
        make.make_writer().write_all(b"two\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn init_twice_is_harmless() {
        let config = LoggingConfig::default();
        init(&config, false);
        init(&config, false);
        tracing::debug!("still fine");
    }
}
