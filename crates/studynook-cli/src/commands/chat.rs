use clap::Subcommand;
use studynook_core::chat::normalize_bullets;
use studynook_core::{ChatMessage, ChatRole, CohereClient, Config, Store, StudyBot};

use super::{load_json, open_store, print_json, save_json, CmdResult};

const HISTORY_KEY: &str = "chat_history";

#[derive(Subcommand)]
pub enum ChatAction {
    /// Ask StudyBot something
    Send {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Print the conversation so far
    History {
        #[arg(long)]
        json: bool,
    },
    /// Forget the conversation
    Clear,
}

pub fn run(action: ChatAction) -> CmdResult {
    let config = Config::load()?;
    let store = open_store(&config)?;
    let history: Vec<ChatMessage> = load_json(&store, HISTORY_KEY).unwrap_or_default();

    match action {
        ChatAction::Send { message } => {
            let client = CohereClient::from_config(config.chat.clone())?;
            let mut bot = StudyBot::from_history(client, history);
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let reply = runtime.block_on(bot.send(&message.join(" ")))?;
            save_json(&store, HISTORY_KEY, &bot.messages())?;
            println!("{}", normalize_bullets(&reply.content));
        }
        ChatAction::History { json } => {
            if json {
                print_json(&history)?;
            } else {
                for msg in &history {
                    let who = match msg.role {
                        ChatRole::User => "you",
                        ChatRole::Bot => "bot",
                    };
                    println!("{who}: {}", normalize_bullets(&msg.content));
                }
            }
        }
        ChatAction::Clear => {
            store.inner().remove(HISTORY_KEY)?;
            println!("ok");
        }
    }
    Ok(())
}
