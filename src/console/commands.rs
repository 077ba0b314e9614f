use std::sync::Arc;

use crate::console::render;
use crate::core::drive::{
    BrowserError, DriveApi, DriveBrowser, IdentityProvider, PageSize, TokenStore,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login,
    Logout,
    WhoAmI,
    PageSize(PageSize),
    List,
    Search(String),
    Help,
    Quit,
}

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Parses one input line. Blank lines give `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "login" => Command::Login,
        "logout" => Command::Logout,
        "whoami" | "me" => Command::WhoAmI,
        "pagesize" | "page-size" => {
            let size = rest.parse::<PageSize>().map_err(|e| e.to_string())?;
            Command::PageSize(size)
        }
        "list" | "files" => Command::List,
        "search" => {
            if rest.is_empty() {
                return Err("Usage: search <text>".to_string());
            }
            Command::Search(rest.to_string())
        }
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command '{}'. Type `help`.", other)),
    };

    Ok(Some(command))
}

/// Runs a command against the browser.
///
/// Listing and searching are spawned so the prompt stays usable while the
/// request is in flight; a `logout` typed meanwhile wins over the late result.
pub async fn dispatch<P, A, S>(browser: &Arc<DriveBrowser<P, A, S>>, command: Command) -> Flow
where
    P: IdentityProvider + 'static,
    A: DriveApi + 'static,
    S: TokenStore + 'static,
{
    match command {
        Command::Login => match browser.login().await {
            Ok(()) => println!("{}", render::render_welcome(&browser.snapshot().await)),
            Err(e) => report(e),
        },
        Command::Logout => match browser.logout().await {
            Ok(()) => println!("👋 Logged out."),
            Err(e) => report(e),
        },
        Command::WhoAmI => {
            let view = browser.snapshot().await;
            if view.logged_in && view.profile.is_none() {
                if let Err(e) = browser.refresh_profile().await {
                    report(e);
                }
            }
            println!("{}", render::render_whoami(&browser.snapshot().await));
        }
        Command::PageSize(size) => {
            browser.set_page_size(size).await;
            println!("Number of files to fetch: {}", size);
        }
        Command::List => {
            let browser = Arc::clone(browser);
            tokio::spawn(async move {
                match browser.list_current_page().await {
                    Ok(_) => println!("{}", render::render_files(&browser.snapshot().await.files)),
                    Err(e) => report(e),
                }
            });
        }
        Command::Search(query) => {
            let browser = Arc::clone(browser);
            tokio::spawn(async move {
                match browser.search(&query).await {
                    Ok(_) => {
                        if let Some(text) = render::render_search(&browser.snapshot().await.search)
                        {
                            println!("{}", text);
                        }
                    }
                    Err(e) => report(e),
                }
            });
        }
        Command::Help => println!("{}", render::render_help()),
        Command::Quit => return Flow::Exit,
    }

    Flow::Continue
}

/// Notices already reached the user through the notifier; only the rest is printed.
fn report(error: BrowserError) {
    match error {
        BrowserError::LoginRequired
        | BrowserError::SessionExpired
        | BrowserError::Api(_)
        | BrowserError::Stale => {}
        other => println!("❌ {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("login"), Ok(Some(Command::Login)));
        assert_eq!(parse_command("  LOGOUT "), Ok(Some(Command::Logout)));
        assert_eq!(parse_command("files"), Ok(Some(Command::List)));
        assert_eq!(parse_command("exit"), Ok(Some(Command::Quit)));
        assert_eq!(parse_command(""), Ok(None));
    }

    #[test]
    fn test_parse_page_size() {
        assert_eq!(
            parse_command("pagesize 50"),
            Ok(Some(Command::PageSize(PageSize::Fifty)))
        );
        assert!(parse_command("pagesize 7").is_err());
        assert!(parse_command("pagesize").is_err());
    }

    #[test]
    fn test_parse_search_keeps_whole_query() {
        assert_eq!(
            parse_command("search  quarterly report 'final' "),
            Ok(Some(Command::Search("quarterly report 'final'".to_string())))
        );
        assert!(parse_command("search").is_err());
    }

    #[test]
    fn test_parse_unknown_command() {
        let err = parse_command("upload foo").unwrap_err();
        assert!(err.contains("upload"));
    }
}
