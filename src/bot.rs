//! Discord gateway wiring and event dispatch.

use std::error::Error as StdError;
use std::sync::Arc;

use log::{debug, error, info};
use poise::{
    Framework, FrameworkOptions,
    serenity_prelude::{ClientBuilder, Context, FullEvent, GatewayIntents, Message},
};

use crate::config::Config;
use crate::discord::{DiscordPlatform, thread_snapshot};
use crate::error::Result;
use crate::openai::OpenAiClient;
use crate::responder::{PostedMessage, ResponderSettings, ResponderWorkflow, local_now};

type EventResult = std::result::Result<(), Box<dyn StdError + Send + Sync>>;

type Responder = ResponderWorkflow<DiscordPlatform, OpenAiClient>;

pub struct Data {
    responder: Arc<Responder>,
}

/// Run the Discord bot until the gateway closes or ctrl-c is received.
pub async fn run() -> Result<()> {
    info!("Initializing bot");
    let config = Config::from_env()?;
    let settings = ResponderSettings::from(&config);

    debug!("Setting up gateway intents");
    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;

    let Config {
        discord_token,
        openai_api_key,
        openai_model,
        ..
    } = config;

    debug!("Building framework");
    let framework = Framework::builder()
        .options(FrameworkOptions {
            event_handler: |ctx, event, _framework, data| Box::pin(event_handler(ctx, event, data)),
            ..Default::default()
        })
        .setup(move |ctx, ready, _framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.tag());

                debug!("Initializing OpenAI client with model {openai_model}");
                let provider = OpenAiClient::new(openai_api_key, openai_model);
                let platform = DiscordPlatform::new(Arc::clone(&ctx.http));
                let responder = Arc::new(ResponderWorkflow::new(
                    platform, provider, settings, local_now,
                ));

                let scanner = Arc::clone(&responder);
                tokio::spawn(async move {
                    if let Err(e) = scanner.startup_scan().await {
                        error!("Startup scan failed: {e}");
                    }
                });

                Ok(Data { responder })
            })
        })
        .build();

    debug!("Creating Discord client");
    let mut client = ClientBuilder::new(discord_token, intents)
        .framework(framework)
        .await?;

    info!("Starting Discord client");

    tokio::select! {
        result = client.start() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down...");
        }
    }

    Ok(())
}

/// Regular guild channels are cached separately from threads, so a cache hit
/// means the message cannot belong to a thread.
fn is_known_non_thread(ctx: &Context, message: &Message) -> bool {
    let Some(guild_id) = message.guild_id else {
        return true;
    };
    ctx.cache
        .guild(guild_id)
        .is_some_and(|guild| guild.channels.contains_key(&message.channel_id))
}

async fn event_handler(ctx: &Context, event: &FullEvent, data: &Data) -> EventResult {
    match event {
        FullEvent::ThreadCreate { thread } => {
            debug!(
                "Thread {} created in channel {:?}",
                thread.id, thread.parent_id
            );
            data.responder.on_thread_created(thread_snapshot(thread)).await;
        }
        FullEvent::Message { new_message } => {
            if is_known_non_thread(ctx, new_message) {
                return Ok(());
            }
            let posted = PostedMessage {
                channel_id: new_message.channel_id,
                author_is_bot: new_message.author.bot,
                mentions_bot: new_message.mentions_user_id(ctx.cache.current_user().id),
            };
            data.responder.on_message(posted).await;
        }
        _ => {}
    }
    Ok(())
}
