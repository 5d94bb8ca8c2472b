//! Basic chat completion against OpenAI, then Perplexity.

use openai_client::{ChatRequest, Message, OpenAIClient, OpenAIConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = OpenAIClient::from_env()?;

    println!("=== OpenAI ===");
    let response = client
        .chat_completion(
            ChatRequest::new("gpt-4o")
                .message(Message::system("Tu es un assistant concis."))
                .message(Message::user("Qu'est-ce qu'un numéro SIREN ?"))
                .temperature(0.2)
                .top_p(0.9),
        )
        .await?;
    println!("{}", response.content);

    if let Ok(key) = std::env::var("PERPLEXITY_API_KEY") {
        println!("\n=== Perplexity ===");
        let perplexity = OpenAIClient::new(OpenAIConfig::perplexity(key))?;
        let response = perplexity
            .chat_completion(
                ChatRequest::new("sonar-pro")
                    .message(Message::user("Qu'est-ce que le RNE ?"))
                    .extra("return_citations", serde_json::json!(true)),
            )
            .await?;
        println!("{}", response.content);
        for url in &response.citations {
            println!("  - {url}");
        }
    }

    Ok(())
}
