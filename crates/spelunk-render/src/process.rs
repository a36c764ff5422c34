//! Renderer backed by an external process.
//!
//! The markup is written to the child's stdin while stdout is read in
//! fixed-size chunks and forwarded through a bounded channel. All three
//! pipes are serviced concurrently so neither side can stall the other.

use std::process::Stdio;

use bytes::Bytes;
use futures::StreamExt;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use spelunk_error::{Error, Result};
use spelunk_uml::DiagramFormat;

use crate::DiagramRenderer;
use crate::stream::{ChunkStream, abandoned, forward};

/// Bytes read from the renderer per chunk.
const CHUNK_SIZE: usize = 8 * 1024;
/// Chunks buffered between the pump and a slow consumer.
const CHANNEL_DEPTH: usize = 16;
/// Stderr kept for error reports.
const STDERR_LIMIT: usize = 4 * 1024;

/// Command line of the renderer process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl RendererConfig {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The stock command for a diagram dialect: `plantuml -pipe -tsvg` or `dot -Tsvg`.
    pub fn for_format(format: DiagramFormat) -> Self {
        let (program, args) = format.default_command();
        Self::new(program, args.iter().copied())
    }

    /// Parse a whitespace separated command line such as `java -jar plantuml.jar -pipe -tsvg`.
    pub fn parse(command: &str) -> Result<Self> {
        let mut words = command.split_whitespace();
        let program = words
            .next()
            .ok_or_else(|| Error::config_invalid("renderer command is empty"))?;
        Ok(Self::new(program, words))
    }

    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Renders by piping markup through a child process.
#[derive(Debug, Clone)]
pub struct ProcessRenderer {
    config: RendererConfig,
}

impl ProcessRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    fn spawn(&self) -> Result<Child> {
        Command::new(&self.config.program)
            .args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                Error::renderer_unavailable(self.config.program.clone())
                    .with_operation("render::spawn")
                    .with_context("command", self.config.display())
                    .set_source(err)
            })
    }
}

impl DiagramRenderer for ProcessRenderer {
    fn render(&self, markup: String) -> Result<ChunkStream> {
        let child = self.spawn()?;
        debug!(
            program = %self.config.program,
            pid = ?child.id(),
            bytes = markup.len(),
            "renderer started"
        );

        let (tx, rx) = mpsc::channel(CHANNEL_DEPTH);
        let pump = tokio::spawn(pump(child, markup, self.config.program.clone(), tx));
        Ok(ChunkStream::new(rx, pump))
    }
}

/// How the stdout side of a render ended.
enum Forwarded {
    Eof,
    ConsumerGone,
    ReadFailed(std::io::Error),
}

/// Drive one render to completion.
///
/// The child is owned here; when the stream aborts this task the child is
/// dropped and killed.
async fn pump(mut child: Child, markup: String, program: String, tx: mpsc::Sender<Result<Bytes>>) {
    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let feed = async move {
        if let Some(mut stdin) = stdin {
            stdin.write_all(markup.as_bytes()).await?;
            stdin.shutdown().await?;
        }
        Ok::<(), std::io::Error>(())
    };

    let drain_stderr = async move {
        let mut text = String::new();
        if let Some(stderr) = stderr {
            let mut limited = stderr.take(STDERR_LIMIT as u64);
            if let Err(err) = limited.read_to_string(&mut text).await {
                warn!(error = %err, "could not read renderer stderr");
            }
            // Keep draining so the child never blocks on a full pipe.
            let mut rest = limited.into_inner();
            let _ = tokio::io::copy(&mut rest, &mut tokio::io::sink()).await;
        }
        text
    };

    let relay = async {
        let Some(stdout) = stdout else {
            return Forwarded::Eof;
        };
        let mut chunks = ReaderStream::with_capacity(stdout, CHUNK_SIZE);
        while let Some(chunk) = chunks.next().await {
            match chunk {
                Ok(chunk) => {
                    if !forward(&tx, Ok(chunk)).await {
                        return Forwarded::ConsumerGone;
                    }
                }
                Err(err) => return Forwarded::ReadFailed(err),
            }
        }
        Forwarded::Eof
    };

    let (fed, stderr_text, forwarded) = tokio::join!(feed, drain_stderr, relay);

    match forwarded {
        Forwarded::ConsumerGone => {
            debug!(program = %program, "render cancelled by consumer");
            return;
        }
        Forwarded::ReadFailed(err) => {
            let err = Error::from(err)
                .with_operation("render::read")
                .with_context("program", program.clone());
            forward(&tx, Err(err)).await;
            return;
        }
        Forwarded::Eof => {}
    }

    let status = match child.wait().await {
        Ok(status) => status,
        Err(err) => {
            let err = Error::from(err)
                .with_operation("render::wait")
                .with_context("program", program.clone());
            forward(&tx, Err(err)).await;
            return;
        }
    };

    if !status.success() {
        let code = status.code().map_or_else(|| "signal".to_string(), |code| code.to_string());
        let mut err = Error::render_failed(format!("renderer exited with status {code}"))
            .with_operation("render::exit")
            .with_context("program", program.clone())
            .with_context("exit_code", code);
        let stderr_text = stderr_text.trim();
        if !stderr_text.is_empty() {
            err = err.with_context("stderr", stderr_text.to_string());
        }
        forward(&tx, Err(err)).await;
        return;
    }

    if let Err(err) = fed {
        // The renderer exited cleanly without consuming all of its input.
        let err = abandoned(&program)
            .with_operation("render::write")
            .set_source(err);
        forward(&tx, Err(err)).await;
        return;
    }

    debug!(program = %program, "renderer finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_for_format() {
        assert_eq!(
            RendererConfig::for_format(DiagramFormat::PlantUml),
            RendererConfig::new("plantuml", ["-pipe", "-tsvg"])
        );
        assert_eq!(
            RendererConfig::for_format(DiagramFormat::Dot),
            RendererConfig::new("dot", ["-Tsvg"])
        );
    }

    #[test]
    fn test_config_parse() {
        let config = RendererConfig::parse("  java -jar plantuml.jar  -pipe -tsvg ").unwrap();
        assert_eq!(config.program, "java");
        assert_eq!(config.args, vec!["-jar", "plantuml.jar", "-pipe", "-tsvg"]);
        assert_eq!(config.display(), "java -jar plantuml.jar -pipe -tsvg");

        let err = RendererConfig::parse("   ").unwrap_err();
        assert_eq!(err.kind(), spelunk_error::ErrorKind::ConfigInvalid);
    }
}
