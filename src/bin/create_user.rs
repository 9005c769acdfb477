//! Interactive account creation. There is no public sign-up route, so this
//! is how users get into the system.

use anyhow::{bail, Context};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use macroplan::{
    auth::{
        password::{hash_password, is_valid_email, normalize_email, MIN_PASSWORD_LEN},
        repo_types::User,
    },
    config::AppConfig,
    db,
};

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> anyhow::Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(label.as_bytes()).await?;
    stdout.flush().await?;
    let line = lines
        .next_line()
        .await
        .context("read stdin")?
        .context("stdin closed")?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "macroplan=info".to_string()),
        )
        .init();

    let config = AppConfig::from_env()?;
    let pool = db::connect(&config).await?;
    db::migrate(&pool).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let email = normalize_email(&prompt(&mut lines, "Email: ").await?);
    if !is_valid_email(&email) {
        bail!("invalid email address: {}", email);
    }
    if User::find_by_email(&pool, &email).await?.is_some() {
        bail!("a user with email {} already exists", email);
    }

    let name = prompt(&mut lines, "Name (optional): ").await?;
    let name = Some(name.as_str()).filter(|n| !n.is_empty());

    let password = prompt(&mut lines, "Password: ").await?;
    if password.len() < MIN_PASSWORD_LEN {
        bail!("password must be at least {} characters", MIN_PASSWORD_LEN);
    }
    let confirm = prompt(&mut lines, "Confirm password: ").await?;
    if password != confirm {
        bail!("passwords do not match");
    }

    let hash = hash_password(&password)?;
    let user = User::create(&pool, &email, name, &hash).await?;
    tracing::info!(user_id = %user.id, email = %user.email, "user created");
    println!("Created user {} ({})", user.email, user.id);
    Ok(())
}
