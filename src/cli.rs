use clap::{Parser, Subcommand};

use crate::proxy::{DEFAULT_PROXY_PORT, DEFAULT_UPSTREAM};

#[derive(Parser)]
#[command(
    name = "tube-digest",
    about = "Tube Digest - YouTube transcription & summary backend",
    long_about = "Backend service exposing simulated YouTube transcription and Qwen-powered summaries, with a built-in local CORS relay for development.",
    after_help = "EXAMPLES:\n    # Start the API service (PORT env var, default 3001)\n    tube-digest serve\n\n    # Start the local CORS relay for the Qwen API\n    tube-digest proxy\n\n    # Transcribe a video against a running server\n    tube-digest transcribe https://www.youtube.com/watch?v=dQw4w9WgXcQ\n\n    # Summarize a video in English with a shorter budget\n    tube-digest summarize --url https://youtu.be/dQw4w9WgXcQ --language en --max-length 200\n\n    # Use a different server when in client mode\n    tube-digest transcribe https://youtu.be/abc --server-url http://my-server:3001"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(name = "serve")]
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
    #[command(name = "proxy")]
    Proxy {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = DEFAULT_PROXY_PORT)]
        port: u16,

        #[arg(long, default_value = DEFAULT_UPSTREAM)]
        upstream: String,
    },
    #[command(name = "transcribe")]
    Transcribe {
        video_url: String,

        #[arg(long, default_value = "http://localhost:3001")]
        server_url: String,
    },
    #[command(name = "summarize")]
    Summarize {
        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        text: Option<String>,

        #[arg(long, default_value = "es")]
        language: String,

        #[arg(long, default_value = "500")]
        max_length: u32,

        #[arg(long, default_value = "http://localhost:3001")]
        server_url: String,
    },
}
