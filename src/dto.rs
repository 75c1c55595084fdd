#[derive(Debug, Default, serde::Deserialize)]
pub struct TranscribeRequest {
    #[serde(rename = "videoUrl")]
    pub video_url: Option<String>,
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct TranscribeResponse {
    pub transcription: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct SummaryRequest {
    pub url: Option<String>,
    pub transcription: Option<String>,
    pub language_code: Option<String>,
    pub max_length: Option<u32>,
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
    pub video_id: Option<String>,
    pub video_url: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct AutoSummaryRequest {
    pub url: Option<String>,
    pub language_code: Option<String>,
    pub max_length: Option<u32>,
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct AutoSummaryResponse {
    pub transcription: String,
    pub summary: String,
    pub video_id: String,
    pub video_url: String,
}
