use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::{
    cli::{open_app, open_logged_in},
    error, info, success,
    utils::spinner,
    warning,
};

pub async fn login(email: Option<String>, password: Option<String>) {
    let mut app = open_app().await;

    let email = match email {
        Some(email) => email,
        None => prompt("Email: ").await,
    };
    let password = match password {
        Some(password) => password,
        None => prompt("Password: ").await,
    };

    let pb = spinner("Logging in...");
    let result = app.login(&email, &password).await;
    pb.finish_and_clear();

    let session = match result {
        Ok(session) => session,
        Err(e) => error!("Login failed: {}", e),
    };
    success!("Logged in as {}", session.user.email);

    let pb = spinner("Loading artists...");
    let home = app.load_home().await;
    pb.finish_and_clear();
    match home {
        Ok(_) => info!("{}", app.catalog().lock().await.subtitle()),
        Err(e) => warning!("Could not load artists: {}", e),
    }
}

pub async fn logout() {
    let mut app = open_app().await;
    if app.current_session().is_none() {
        info!("No session stored.");
        return;
    }

    match app.logout().await {
        Ok(()) => success!("Logged out."),
        Err(e) => error!("Failed to remove stored session. Err: {}", e),
    }
}

pub async fn whoami() {
    let app = open_logged_in().await;
    if let Some(session) = app.current_session() {
        info!("Logged in as {} (user {})", session.user.email, session.user.id);
    }
}

async fn prompt(label: &str) -> String {
    let mut stdout = tokio::io::stdout();
    if stdout.write_all(label.as_bytes()).await.is_err() || stdout.flush().await.is_err() {
        error!("Cannot write to terminal.");
    }

    let mut line = String::new();
    match BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
        Ok(_) => line.trim_end_matches(['\r', '\n']).to_string(),
        Err(e) => error!("Cannot read input. Err: {}", e),
    }
}
