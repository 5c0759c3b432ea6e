use assistant_rs::prelude::*;
use assistant_rs::{BearerTokenAuthenticator, NoAuthAuthenticator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let assistant_id = std::env::var("ASSISTANT_ID")?;

    // Bearer token when one is set, otherwise no auth (local or proxied)
    let assistant = match std::env::var("ASSISTANT_BEARER_TOKEN") {
        Ok(token) => AssistantV2::new("2020-04-01", BearerTokenAuthenticator::new(token)?)?,
        Err(_) => AssistantV2::new("2020-04-01", NoAuthAuthenticator)?,
    };
    let assistant = match std::env::var("ASSISTANT_URL") {
        Ok(url) => assistant.with_service_url(url)?,
        Err(_) => assistant,
    };

    let session = assistant
        .create_session(CreateSessionParams::new(&assistant_id))
        .await?;
    let session_id = session.result.session_id;
    println!("Session: {}", session_id);

    let mut context: Option<MessageContext> = None;
    for text in ["Hello", "What can you do?"] {
        let mut params = MessageParams::new(&assistant_id, &session_id).input(
            MessageInput::text(text).with_options(assistant_rs::MessageInputOptions {
                return_context: Some(true),
                ..Default::default()
            }),
        );
        if let Some(ctx) = context.take() {
            params = params.context(ctx);
        }

        let reply = assistant.message(params).await?;
        println!("> {}", text);
        println!("{}", reply.result.text().unwrap_or_default());
        context = reply.result.context;
    }

    assistant
        .delete_session(DeleteSessionParams::new(&assistant_id, &session_id))
        .await?;
    Ok(())
}
