//! Do some preparations for integration tests

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock, Once, RwLock};

use clap::Parser;
use mpvss::cli::Cli;

pub static CAPTURED: LazyLock<Arc<RwLock<String>>> =
    LazyLock::new(|| Arc::new(RwLock::new(String::new())));
static LOGGER: Once = Once::new();

struct Capturer {
    content: Arc<RwLock<String>>,
}
impl std::io::Write for Capturer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut locked = self.content.write().unwrap();
        let got = std::str::from_utf8(buf).unwrap();
        locked.push_str(got);
        Ok(got.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn setup() {
    LOGGER.call_once(|| {
        let cap = Capturer {
            content: CAPTURED.clone(),
        };
        env_logger::builder()
            .is_test(true)
            .format(|buf, record| writeln!(buf, "{}", record.args()))
            .filter_level(log::LevelFilter::Trace)
            .target(env_logger::Target::Pipe(Box::new(cap)))
            .init();
    });
}

/// A cache directory private to one test.
pub fn cache_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("mpvss-test-{name}"))
}

/// Parses `args` as if they followed `mpvss` on the command line.
pub fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("mpvss").chain(args.iter().copied()))
        .expect("test arguments should parse")
}

pub fn finalise(name: &str) {
    let dir = cache_dir(name);
    if dir.exists() {
        std::fs::remove_dir_all(dir).expect("Cannot remove test cache directory");
    }
}
