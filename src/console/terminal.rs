use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::console::commands::{dispatch, parse_command, Flow};
use crate::console::render;
use crate::core::drive::{
    DriveApi, DriveBrowser, IdentityError, IdentityProvider, Notice, Notifier, TokenStore,
};
use crate::infra::google_drive::RedirectPrompt;

/// Shared line reader over stdin.
///
/// Both the command loop and the login prompt read from it, one line at a time.
pub struct ConsoleIo {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleIo {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// `Ok(None)` on end of input.
    pub async fn read_line(&self, prompt: &str) -> std::io::Result<Option<String>> {
        print!("{}", prompt);
        std::io::stdout().flush()?;
        self.lines.lock().await.next_line().await
    }
}

impl Default for ConsoleIo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RedirectPrompt for ConsoleIo {
    async fn ask_for_redirect(
        &self,
        authorization_url: &Url,
    ) -> Result<Option<String>, IdentityError> {
        println!("🔐 Open this URL in your browser and sign in with Google:\n");
        println!("    {}\n", authorization_url);
        println!("After consenting you'll be redirected. Paste the full redirect URL below");
        println!("(leave empty to cancel).");

        let line = self.read_line("redirect> ").await?;
        Ok(line
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty()))
    }
}

/// Prints notices straight to the terminal.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        tracing::debug!(?notice, "Showing notice");
        println!("⚠️  {}", notice.message());
    }
}

/// Reads commands until `quit` or end of input.
pub async fn run<P, A, S>(
    browser: Arc<DriveBrowser<P, A, S>>,
    io: Arc<ConsoleIo>,
) -> anyhow::Result<()>
where
    P: IdentityProvider + 'static,
    A: DriveApi + 'static,
    S: TokenStore + 'static,
{
    println!("📁 Google Drive Integration");
    println!("{}", render::render_welcome(&browser.snapshot().await));
    println!("Type `help` for the list of commands.");

    while let Some(line) = io.read_line("> ").await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        tracing::debug!(?command, "Running command");
        if dispatch(&browser, command).await == Flow::Exit {
            break;
        }
    }

    println!("Bye!");
    Ok(())
}
