use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use assistant_client::{AssistantClient, ChatSession};
use models::ChatRole;

#[derive(Parser, Debug)]
#[command(name = "ask", about = "Send one message to the assistant and print the reply bubbles.")]
struct Args {
    /// The message to send
    #[arg(required = true)]
    message: Vec<String>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let message = args.message.join(" ");

    let client = AssistantClient::from_env()?;
    let mut session = ChatSession::new(client);
    session.send(&message);

    for bubble in session.messages() {
        let speaker = match bubble.role {
            ChatRole::User => "you",
            ChatRole::Assistant => "clanky",
        };
        println!("[{speaker}] {}", bubble.content);
        println!();
    }

    Ok(())
}
