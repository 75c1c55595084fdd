use anyhow::{Result, anyhow};
use serde_json::{Value, json};

pub async fn check_server_health(server_url: &str) -> Result<()> {
    let client = reqwest::Client::new();

    println!("🔍 Checking server health at: {server_url}/health");

    let response = client
        .get(format!("{server_url}/health"))
        .send()
        .await
        .map_err(|e| anyhow!("Failed to connect to server: {}", e))?;

    if response.status().is_success() {
        println!("✅ Server is healthy");
        Ok(())
    } else {
        Err(anyhow!("Server health check failed: {}", response.status()))
    }
}

async fn post_json(client: &reqwest::Client, url: &str, body: &Value) -> Result<Value> {
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| anyhow!("Failed to send request: {}", e))?;

    let status = response.status();
    let response_text = response
        .text()
        .await
        .map_err(|e| anyhow!("Failed to read response: {}", e))?;

    if !status.is_success() {
        return Err(anyhow!(
            "Server returned error {}: {}",
            status,
            response_text
        ));
    }

    serde_json::from_str(&response_text)
        .map_err(|e| anyhow!("Failed to parse JSON response: {}", e))
}

pub async fn run_transcribe(server_url: &str, video_url: &str) -> Result<()> {
    println!("🎬 Tube Digest Client");
    println!("=====================");
    println!("📺 Video: {video_url}");
    println!();

    if let Err(e) = check_server_health(server_url).await {
        eprintln!("❌ {e}");
        eprintln!("💡 Make sure the server is running: tube-digest serve");
        return Err(e);
    }

    let client = reqwest::Client::new();
    println!("🚀 Sending transcription request to: {server_url}/api/transcription/youtube");

    match post_json(
        &client,
        &format!("{server_url}/api/transcription/youtube"),
        &json!({ "videoUrl": video_url }),
    )
    .await
    {
        Ok(result) => {
            println!("\n✅ Transcription completed!");
            println!("📝 Result:");
            match result["transcription"].as_str() {
                Some(transcription) => println!("{transcription}"),
                None => println!("{}", serde_json::to_string_pretty(&result)?),
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Transcription failed: {e}");
            Err(e)
        }
    }
}

pub async fn run_summarize(
    server_url: &str,
    url: Option<String>,
    text: Option<String>,
    language: &str,
    max_length: u32,
) -> Result<()> {
    println!("🎬 Tube Digest Client");
    println!("=====================");

    if url.is_none() && text.is_none() {
        return Err(anyhow!("Either --url or --text is required"));
    }

    if let Some(ref url) = url {
        println!("📺 Video: {url}");
    } else {
        println!("📄 Summarizing provided text");
    }
    println!("   Language: {language}, max length: {max_length} tokens");
    println!();

    if let Err(e) = check_server_health(server_url).await {
        eprintln!("❌ {e}");
        eprintln!("💡 Make sure the server is running: tube-digest serve");
        return Err(e);
    }

    let client = reqwest::Client::new();
    println!("🚀 Sending summary request to: {server_url}/api/summary/youtube");

    match post_json(
        &client,
        &format!("{server_url}/api/summary/youtube"),
        &json!({
            "url": url,
            "transcription": text,
            "language_code": language,
            "max_length": max_length,
        }),
    )
    .await
    {
        Ok(result) => {
            println!("\n✅ Summary completed!");
            println!("📝 Result:");
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Summary failed: {e}");
            Err(e)
        }
    }
}
