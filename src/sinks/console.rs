//! Interactive console sink

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use super::Sink;

const TIMESTAMP_COLOR: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Mirrors each tick block to stdout for a watching operator.
///
/// With color enabled, the leading timestamp line is wrapped in ANSI markers;
/// the body is always plain text identical to the durable log.
pub struct ConsoleSink {
    color: bool,
}

impl ConsoleSink {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn render(&self, block: &str) -> String {
        if !self.color {
            return block.to_string();
        }

        match block.split_once('\n') {
            Some((timestamp_line, body)) => {
                format!("{TIMESTAMP_COLOR}{timestamp_line}{RESET}\n{body}")
            }
            None => block.to_string(),
        }
    }
}

#[async_trait]
impl Sink for ConsoleSink {
    async fn emit(&mut self, block: &str) -> std::io::Result<()> {
        let rendered = self.render(block);

        let mut stdout = tokio::io::stdout();
        stdout.write_all(rendered.as_bytes()).await?;
        stdout.flush().await
    }
}
