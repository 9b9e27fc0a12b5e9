//! scanview - a terminal client for a file-scanning service.
//!
//! Fetches file reports and user profiles from the remote API, keeps the
//! last-seen snapshots cached for offline viewing, and enforces the same
//! route access rules as the web front end.

mod actions;
mod api;
mod app;
mod auth;
mod cache;
mod config;
mod models;
mod router;
mod store;
mod utils;

use std::io;

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use auth::CredentialStore;
use router::{match_path, NavigationOutcome, RouteId};
use utils::{is_sha256, short_hash, truncate_string};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn usage() {
    eprintln!("Usage: scanview <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  login <username> [--remember]   authenticate (password from");
    eprintln!("                                  SCANVIEW_PASSWORD or the OS keychain)");
    eprintln!("  logout [--forget]               clear the stored credential (and the");
    eprintln!("                                  remembered password with --forget)");
    eprintln!("  signup <username> <email>       create an account");
    eprintln!("  passwd <username>               change password (new one from");
    eprintln!("                                  SCANVIEW_NEW_PASSWORD)");
    eprintln!("  file <sha256> [fields]          show a file report (fields comma-separated)");
    eprintln!("  comments <sha256>               show the comments on a file");
    eprintln!("  like <sha256>                   toggle a like on a file");
    eprintln!("  user <username>                 show a user profile");
    eprintln!("  following <username>            show who a user follows");
    eprintln!("  open <path>                     resolve a path through the route guard");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        usage();
        return Ok(());
    }

    let mut app = App::new()?;

    match args[1].as_str() {
        "login" => {
            let Some(username) = args.get(2) else {
                usage();
                return Ok(());
            };
            let remember = args.iter().any(|a| a == "--remember");
            let password = match std::env::var("SCANVIEW_PASSWORD") {
                Ok(p) => p,
                Err(_) => match CredentialStore::get_password(username) {
                    Ok(p) => p,
                    Err(_) => {
                        eprintln!(
                            "No password available: set SCANVIEW_PASSWORD or log in with --remember once"
                        );
                        return Ok(());
                    }
                },
            };
            match app.login(username, &password, remember).await {
                Ok(()) => println!("Logged in as {}", app.store.username().unwrap_or(username)),
                Err(e) => eprintln!("Login failed: {}", e),
            }
        }
        "logout" => {
            if args.iter().any(|a| a == "--forget") {
                if let Some(username) = app.config.last_username.clone() {
                    if CredentialStore::has_credentials(&username) {
                        if let Err(e) = CredentialStore::delete(&username) {
                            eprintln!("Could not remove remembered password: {}", e);
                        }
                    }
                }
            }
            app.log_out();
            println!("Logged out");
        }
        "signup" => {
            let (Some(username), Some(email)) = (args.get(2), args.get(3)) else {
                usage();
                return Ok(());
            };
            let Ok(password) = std::env::var("SCANVIEW_PASSWORD") else {
                eprintln!("Set SCANVIEW_PASSWORD to choose a password");
                return Ok(());
            };
            match app.api.register(username, email, &password).await {
                Ok(()) => println!("Account created, check {} for a confirmation link", email),
                Err(e) => eprintln!("Signup failed: {}", e),
            }
        }
        "passwd" => {
            let Some(username) = args.get(2) else {
                usage();
                return Ok(());
            };
            if !app.store.logged_in() {
                eprintln!("Log in first");
                return Ok(());
            }
            let Ok(password) = std::env::var("SCANVIEW_NEW_PASSWORD") else {
                eprintln!("Set SCANVIEW_NEW_PASSWORD to the new password");
                return Ok(());
            };
            match app.api.change_password(username, &password).await {
                Ok(()) => println!("Password changed"),
                Err(e) => eprintln!("Password change failed: {}", e),
            }
        }
        "file" => {
            let Some(sha256) = args.get(2) else {
                usage();
                return Ok(());
            };
            if !is_sha256(sha256) {
                eprintln!("Not a sha256 digest: {}", sha256);
                return Ok(());
            }
            if let NavigationOutcome::Redirect { to, next_url } =
                app.navigate(RouteId::Summary, Some(sha256.as_str()))
            {
                print_redirect(to, next_url);
                return Ok(());
            }
            let fields: Option<Vec<&str>> = args.get(3).map(|f| f.split(',').collect());
            app.fetch_report(sha256, fields.as_deref()).await;
            print_report(&app);
        }
        "comments" => {
            let Some(sha256) = args.get(2) else {
                usage();
                return Ok(());
            };
            if !is_sha256(sha256) {
                eprintln!("Not a sha256 digest: {}", sha256);
                return Ok(());
            }
            if let NavigationOutcome::Redirect { to, next_url } =
                app.navigate(RouteId::Comments, Some(sha256.as_str()))
            {
                print_redirect(to, next_url);
                return Ok(());
            }
            actions::update_comments(&mut app.store, &app.api, sha256).await;
            print_comments(&app);
        }
        "like" => {
            let Some(sha256) = args.get(2) else {
                usage();
                return Ok(());
            };
            if !is_sha256(sha256) {
                eprintln!("Not a sha256 digest: {}", sha256);
                return Ok(());
            }
            if !app.store.logged_in() {
                eprintln!("Log in first");
                return Ok(());
            }
            actions::add_remove_like(&mut app.store, &app.api, sha256).await;
            if let Some(alert) = app.store.alert() {
                eprintln!("Warning: {}", alert);
            } else {
                let liked = app
                    .store
                    .user_data()
                    .map(|u| u.has_liked(sha256))
                    .unwrap_or(false);
                println!(
                    "{} {}",
                    if liked { "Liked" } else { "Unliked" },
                    short_hash(sha256)
                );
            }
        }
        "user" => {
            let Some(username) = args.get(2) else {
                usage();
                return Ok(());
            };
            if let NavigationOutcome::Redirect { to, next_url } =
                app.navigate(RouteId::Profile, Some(username.as_str()))
            {
                print_redirect(to, next_url);
                return Ok(());
            }
            app.fetch_profile(username).await;
            print_profile(&app);
        }
        "following" => {
            let Some(username) = args.get(2) else {
                usage();
                return Ok(());
            };
            actions::update_following(&mut app.store, &app.api, username).await;
            if let Some(alert) = app.store.alert() {
                eprintln!("Warning: {}", alert);
            } else if let Some(user) = app.store.user_data() {
                for followed in &user.following {
                    println!("{}", followed);
                }
            }
        }
        "open" => {
            let Some(path) = args.get(2) else {
                usage();
                return Ok(());
            };
            match match_path(path) {
                Some((route, param)) => {
                    match app.navigate(route, param.as_deref()) {
                        NavigationOutcome::Allow => {
                            println!("Allowed: {} ({})", path, route.spec().title);
                        }
                        NavigationOutcome::Redirect { to, next_url } => {
                            print_redirect(to, next_url);
                        }
                    }
                }
                None => eprintln!("No such route: {}", path),
            }
        }
        _ => usage(),
    }

    Ok(())
}

fn print_redirect(to: RouteId, next_url: Option<String>) {
    match next_url {
        Some(next_url) => println!(
            "Redirected to {} (nextUrl={})",
            to.spec().path,
            next_url
        ),
        None => println!("Redirected to {}", to.spec().path),
    }
}

fn print_report(app: &App) {
    if let Some(alert) = app.store.alert() {
        eprintln!("Warning: {}", alert);
    }
    let Some(record) = app.store.file_data() else {
        println!("No report to show, upload the file first");
        return;
    };

    if let Some(ref filename) = record.filename {
        println!("File:       {}", filename);
    }
    if let Some(ref sha256) = record.sha256 {
        println!("SHA-256:    {}", sha256);
    }
    if let Some(ref md5) = record.md5 {
        println!("MD5:        {}", md5);
    }
    if let Some(size) = record.size {
        println!("Size:       {} bytes", size);
    }
    if let Some(ref magic) = record.magic {
        println!("Type:       {}", magic);
    }
    if let Some(first_seen) = record.first_seen {
        println!("First seen: {}", first_seen.format("%b %d, %Y"));
    }
    if !record.tags.is_empty() {
        println!("Tags:       {}", record.tags.join(", "));
    }
    if record.engines() > 0 {
        println!("Detection:  {}", record.detection_ratio());
        let mut engines: Vec<_> = record.multiav.iter().collect();
        engines.sort_by(|a, b| a.0.cmp(b.0));
        for (engine, verdict) in engines {
            let output = match (&verdict.infected, &verdict.output) {
                (true, Some(output)) => output.as_str(),
                (true, None) => "infected",
                (false, _) => "clean",
            };
            println!("  {:<16} {}", engine, output);
        }
    }
}

fn print_comments(app: &App) {
    if let Some(alert) = app.store.alert() {
        eprintln!("Warning: {}", alert);
        return;
    }
    if app.store.comments().is_empty() {
        println!("No comments");
        return;
    }
    for comment in app.store.comments() {
        let author = comment.username.as_deref().unwrap_or("anonymous");
        println!("{}: {}", author, truncate_string(&comment.body, 200));
    }
}

fn print_profile(app: &App) {
    let Some(user) = app.store.user_data() else {
        println!("No profile to show");
        return;
    };
    println!("User:     {}", user.display_name());
    if let Some(ref bio) = user.bio {
        println!("Bio:      {}", bio);
    }
    if let Some(member_since) = user.member_since {
        println!("Member:   since {}", member_since.format("%b %Y"));
    }
    println!(
        "Likes:    {}  Following: {}  Followers: {}",
        user.likes.len(),
        user.following.len(),
        user.followers.len()
    );
    if user.avatar.is_some() {
        println!("Avatar:   present");
    }
}
