use crate::config::Config;
use crate::core::session::failure_message;
use crate::core::{DownloadSession, Outcome};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use tracing::debug;

#[derive(Parser)]
#[command(name = "yt-grab")]
#[command(about = "Download a YouTube video or its audio track into ./downloads")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            verbose: self.verbose,
            ..Config::default()
        }
    }

    pub async fn run(&self, config: &Config) -> Result<()> {
        let mut stdout = io::stdout();

        let (url, file_type) = {
            let mut input = io::stdin().lock();
            let url = prompt(&mut input, &mut stdout, "Enter YouTube video URL: ")?;
            let file_type = prompt(&mut input, &mut stdout, "Enter file type ('video' or 'audio'): ")?;
            (url, file_type.to_lowercase())
        };

        let outcome = match DownloadSession::from_config(config) {
            Ok(session) => session.run(&url, &file_type, &mut stdout).await?,
            Err(err) => {
                writeln!(stdout, "{}", failure_message(&err))?;
                Outcome::Failed(err)
            }
        };
        debug!("Finished with {:?}", outcome);

        Ok(())
    }
}

/// Prints `label` and reads one trimmed line.
pub fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<String> {
    write!(out, "{}", label)?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line).context("failed to read from stdin")?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn prompt_trims_answer() {
        let mut input = Cursor::new("  https://youtu.be/dQw4w9WgXcQ \nVIDEO\n");
        let mut out = Vec::new();

        let url = prompt(&mut input, &mut out, "Enter YouTube video URL: ").unwrap();
        let kind = prompt(&mut input, &mut out, "Enter file type ('video' or 'audio'): ").unwrap();

        assert_eq!(url, "https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(kind, "VIDEO");
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Enter YouTube video URL: Enter file type ('video' or 'audio'): "
        );
    }

    #[test]
    fn prompt_at_eof_is_empty() {
        let mut input = Cursor::new("");
        let mut out = Vec::new();
        assert_eq!(prompt(&mut input, &mut out, "> ").unwrap(), "");
    }

    #[test]
    fn verbose_flag_reaches_config() {
        let cli = Cli::parse_from(["yt-grab", "--verbose"]);
        assert!(cli.config().verbose);
        assert!(!Cli::parse_from(["yt-grab"]).config().verbose);
    }
}
