// Turns session snapshots into the text the user sees.

use crate::core::drive::{FileRecord, SearchResult, SessionView};

pub fn render_file(file: &FileRecord) -> String {
    if file.web_view_link.is_empty() {
        format!("{} ({})", file.name, file.mime_type)
    } else {
        format!("{} ({}) - {}", file.name, file.mime_type, file.web_view_link)
    }
}

pub fn render_welcome(view: &SessionView) -> String {
    match (&view.profile, view.logged_in) {
        (Some(profile), _) => format!("Welcome, {}", profile.name),
        (None, true) => "Signed in (profile not loaded yet)".to_string(),
        (None, false) => "Not signed in. Type `login` to sign in with Google.".to_string(),
    }
}

pub fn render_files(files: &[FileRecord]) -> String {
    let mut out = String::from("Your Google Drive Files:\n");
    if files.is_empty() {
        out.push_str("No files found.\n");
        return out;
    }
    for file in files {
        out.push_str(&format!("  • {}\n", render_file(file)));
    }
    out
}

/// Nothing is shown until a search has actually run.
pub fn render_search(search: &SearchResult) -> Option<String> {
    let files = search.files()?;
    let mut out = String::from("Search Results:\n");
    if files.is_empty() {
        out.push_str("No such file found in your drive.\n");
    } else {
        for file in files {
            out.push_str(&format!("  • {}\n", render_file(file)));
        }
    }
    Some(out)
}

pub fn render_whoami(view: &SessionView) -> String {
    let mut out = render_welcome(view);
    if let Some(email) = view.profile.as_ref().and_then(|p| p.email.as_deref()) {
        out.push_str(&format!(" <{}>", email));
    }
    if let Some(at) = view.logged_in_at {
        out.push_str(&format!("\nSigned in at {}", at.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    out.push_str(&format!("\nPage size: {}", view.page_size));
    if let Some(error) = &view.last_error {
        out.push_str(&format!("\nLast error: {}", error));
    }
    out
}

pub fn render_help() -> &'static str {
    "Commands:
  login                 Sign in with Google
  logout                Sign out and forget the stored token
  whoami                Show the signed-in user
  pagesize <n>          Number of files to fetch (10, 20, 50 or 100)
  list                  Fetch your Google Drive files
  search <text>         Find files whose name contains <text>
  help                  Show this help
  quit                  Exit"
}
