use assistant_rs::prelude::*;
use assistant_rs::NoAuthAuthenticator;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let assistant = AssistantV2::new("2020-04-01", NoAuthAuthenticator)?;

    // Validation errors come back through the future; nothing is sent
    match assistant.delete_session(DeleteSessionParams::default()).await {
        Err(AssistantError::MissingRequiredParameters { missing }) => {
            println!("Missing: {}", missing.join(", "));
        }
        other => println!("Unexpected: {:?}", other),
    }

    // A bad version is caught at construction
    if let Err(e) = AssistantV2::new("", NoAuthAuthenticator) {
        println!("Construction failed: {}", e);
    }

    // Service errors carry the HTTP status
    let result = assistant
        .create_session(CreateSessionParams::new("does-not-exist"))
        .await;
    match result {
        Ok(session) => println!("Session: {}", session.result.session_id),
        Err(AssistantError::RateLimited { retry_after }) => {
            println!("Rate limited, retry after {:?}", retry_after);
        }
        Err(e) => println!("Request failed (status {:?}): {}", e.status(), e),
    }

    Ok(())
}
