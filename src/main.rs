use std::{env, sync::Arc};

use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use studysync_client::{
    config::ClientConfig,
    connect,
    planner::{SessionPlanner, Severity},
    refresh::{BoardView, ChatView},
};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ClientConfig::from_env()?;
    let group_id = env::var("STUDYSYNC_GROUP_ID")
        .wrap_err("STUDYSYNC_GROUP_ID environment variable must be set")?;
    let follow_chat = env::var("STUDYSYNC_FOLLOW_CHAT")
        .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let client = connect(config)?;
    let planner = Arc::new(SessionPlanner::from_client(&group_id, client.clone()));

    // Build the board once and report it
    let board_view = BoardView::new(planner);
    board_view.refresh().await?;
    if let Some(board) = board_view.current() {
        info!("{} sessions in group {}", board.sessions.len(), group_id);
        for session in &board.sessions {
            info!(
                "{} starts {} ({})",
                session.id,
                session.start_at,
                session.topic.as_deref().unwrap_or("no topic")
            );
        }
        if let Some(user_id) = client.auth().user_id().await {
            let mine: Vec<_> = board.deletable_by(&user_id).map(|s| s.id.as_str()).collect();
            if !mine.is_empty() {
                info!("You created (and may delete): {}", mine.join(", "));
            }
        }
        for warning in board.warnings() {
            match warning.severity {
                Severity::Confirm => warn!("{}", warning.message),
                Severity::Advisory => info!("{}", warning.message),
            }
        }
    }

    if !follow_chat {
        return Ok(());
    }

    // Follow the group chat until interrupted
    let limit = client.config().message_limit;
    let period = client.config().chat_poll_period();
    let chat = Arc::new(ChatView::new(client, &group_id, limit));
    let mut updates = chat.subscribe();
    let poller = chat.follow(period);
    let mut seen = 0i64;

    info!("Following chat for group {} (Ctrl-C to stop)", group_id);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let messages = updates.borrow_and_update().clone().unwrap_or_default();
                for message in messages.iter().filter(|m| m.id > seen) {
                    info!(
                        "[{}] {}: {}{}",
                        message.created_at.format("%H:%M"),
                        message.display_sender(),
                        message.content.as_deref().unwrap_or(""),
                        if message.attachment_url.is_some() { " [attachment]" } else { "" }
                    );
                }
                seen = messages.iter().map(|m| m.id).max().unwrap_or(seen).max(seen);
            }
        }
    }

    poller.stop().await;
    info!("Stopped following chat");

    Ok(())
}
