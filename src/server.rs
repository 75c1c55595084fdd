use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, post, web};
use chrono::{SecondsFormat, Utc};
use log::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::dto::{
    AutoSummaryRequest, AutoSummaryResponse, SummaryRequest, SummaryResponse, TranscribeRequest,
    TranscribeResponse,
};
use crate::summary::{self, QwenClient};
use crate::transcript;

pub struct AppState {
    pub config: AppConfig,
    pub qwen: QwenClient,
}

#[get("/health")]
pub async fn health_check() -> impl Responder {
    debug!("Health check endpoint called");
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

#[post("/api/transcription/youtube")]
pub async fn transcribe_youtube(data: web::Data<AppState>, body: web::Bytes) -> impl Responder {
    debug!("Transcription request received");

    // Tolerate empty or malformed bodies so the missing-URL error stays uniform.
    let request: TranscribeRequest = serde_json::from_slice(&body).unwrap_or_default();

    let video_url = match request.video_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => {
            warn!("Transcription request without a video URL");
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Video URL is required"
            }));
        }
    };

    info!("Transcribing video: {video_url}");

    match transcript::transcribe(&video_url, data.config.simulated_delay).await {
        Ok(transcription) => {
            info!("Transcription completed: {} characters", transcription.len());
            HttpResponse::Ok().json(TranscribeResponse { transcription })
        }
        Err(e) => {
            error!("Transcription failed: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to transcribe video"
            }))
        }
    }
}

#[post("/api/summary/youtube")]
pub async fn summarize_youtube(
    data: web::Data<AppState>,
    payload: web::Json<SummaryRequest>,
) -> impl Responder {
    debug!("Summary request received");
    let request = payload.into_inner();

    let language_code = request.language_code.unwrap_or_else(|| "es".to_string());
    let max_length = request.max_length.unwrap_or(500);

    let transcription = request.transcription.filter(|t| !t.trim().is_empty());
    let url = request.url.filter(|u| !u.trim().is_empty());

    let (text, video_id, video_url) = if let Some(text) = transcription {
        (text, None, None)
    } else if let Some(url) = url {
        let video_id = match transcript::video_id(&url) {
            Ok(id) => id,
            Err(e) => {
                warn!("Rejected summary request: {e}");
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": e.to_string()
                }));
            }
        };
        match transcript::transcribe(&url, data.config.simulated_delay).await {
            Ok(text) => (text, Some(video_id), Some(url)),
            Err(e) => {
                error!("Transcription failed during summary: {e}");
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Failed to summarize content"
                }));
            }
        }
    } else {
        warn!("Summary request without a URL or transcription");
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "A video URL or a transcription is required"
        }));
    };

    let summary = summarize_or_fallback(&data.qwen, &text, &language_code, max_length).await;

    HttpResponse::Ok().json(SummaryResponse {
        summary,
        video_id,
        video_url,
    })
}

#[post("/api/summary/youtube/auto")]
pub async fn summarize_youtube_auto(
    data: web::Data<AppState>,
    payload: web::Json<AutoSummaryRequest>,
) -> impl Responder {
    debug!("Transcribe-and-summarize request received");
    let request = payload.into_inner();

    let video_url = match request.url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => {
            warn!("Auto summary request without a video URL");
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Video URL is required"
            }));
        }
    };

    let video_id = match transcript::video_id(&video_url) {
        Ok(id) => id,
        Err(e) => {
            warn!("Rejected auto summary request: {e}");
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.to_string()
            }));
        }
    };

    let language_code = request.language_code.unwrap_or_else(|| "es".to_string());
    let max_length = request.max_length.unwrap_or(500);

    let transcription = match transcript::transcribe(&video_url, data.config.simulated_delay).await {
        Ok(text) => text,
        Err(e) => {
            error!("Transcription failed during auto summary: {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to transcribe video"
            }));
        }
    };

    let summary =
        summarize_or_fallback(&data.qwen, &transcription, &language_code, max_length).await;

    HttpResponse::Ok().json(AutoSummaryResponse {
        transcription,
        summary,
        video_id,
        video_url,
    })
}

async fn summarize_or_fallback(
    qwen: &QwenClient,
    text: &str,
    language_code: &str,
    max_length: u32,
) -> String {
    match qwen.summarize(text, language_code, max_length).await {
        Ok(summary) => summary,
        Err(e) => {
            warn!("Qwen summary failed, using local fallback: {e}");
            summary::fallback_summary(text)
        }
    }
}

pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    info!("Starting tube-digest API service");
    info!("Qwen endpoint: {}", config.qwen_api_url);

    if config.qwen_api_key.is_none() {
        warn!("QWEN_API_KEY is not set; summary requests go out unauthenticated");
    }
    if config.database_url.is_some() {
        debug!("DATABASE_URL is set; not used by this service");
    }

    let qwen = QwenClient::new(config.qwen_api_url.clone(), config.qwen_api_key.clone());
    let app_state = web::Data::new(AppState {
        config: config.clone(),
        qwen,
    });

    info!("Starting HTTP server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(web::JsonConfig::default().limit(1024 * 1024)) // 1MB
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health_check)
            .service(transcribe_youtube)
            .service(summarize_youtube)
            .service(summarize_youtube_auto)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use actix_web::{App, test, web};
    use serde_json::Value;

    use super::*;
    use crate::config::{DEFAULT_HOST, DEFAULT_PORT};

    fn test_state() -> web::Data<AppState> {
        // Unroutable Qwen endpoint so summary tests exercise the fallback path.
        let config = AppConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: None,
            qwen_api_url: "http://127.0.0.1:1/generation".to_string(),
            qwen_api_key: None,
            simulated_delay: Duration::ZERO,
        };
        let qwen = QwenClient::new(config.qwen_api_url.clone(), None);
        web::Data::new(AppState { config, qwen })
    }

    #[actix_web::test]
    async fn health_reports_ok_with_parseable_timestamp() {
        let app = test::init_service(App::new().service(health_check)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert!(resp.status().is_success());

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok");
        let timestamp = body["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[actix_web::test]
    async fn transcription_requires_video_url() {
        let app = test::init_service(
            App::new().app_data(test_state()).service(transcribe_youtube),
        )
        .await;

        for payload in ["{}", r#"{"videoUrl": ""}"#, ""] {
            let req = test::TestRequest::post()
                .uri("/api/transcription/youtube")
                .insert_header(("content-type", "application/json"))
                .set_payload(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status().as_u16(), 400);

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "Video URL is required");
        }
    }

    #[actix_web::test]
    async fn transcription_embeds_requested_url() {
        let app = test::init_service(
            App::new().app_data(test_state()).service(transcribe_youtube),
        )
        .await;

        let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
        let req = test::TestRequest::post()
            .uri("/api/transcription/youtube")
            .set_json(serde_json::json!({ "videoUrl": url }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: TranscribeResponse = test::read_body_json(resp).await;
        assert!(body.transcription.contains(url));
    }

    #[actix_web::test]
    async fn summary_requires_url_or_transcription() {
        let app = test::init_service(
            App::new().app_data(test_state()).service(summarize_youtube),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/summary/youtube")
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);
    }

    #[actix_web::test]
    async fn summary_rejects_non_youtube_url() {
        let app = test::init_service(
            App::new().app_data(test_state()).service(summarize_youtube),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/summary/youtube")
            .set_json(serde_json::json!({ "url": "https://vimeo.com/12345" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);
    }

    #[actix_web::test]
    async fn summary_falls_back_when_qwen_is_unreachable() {
        let app = test::init_service(
            App::new().app_data(test_state()).service(summarize_youtube),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/summary/youtube")
            .set_json(serde_json::json!({ "transcription": "line one\nline two" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: SummaryResponse = test::read_body_json(resp).await;
        assert!(body.summary.starts_with("Automatic summary"));
        assert!(body.summary.contains("line one"));
        assert!(body.video_id.is_none());
    }

    #[actix_web::test]
    async fn auto_summary_returns_transcript_and_video_id() {
        let app = test::init_service(
            App::new()
                .app_data(test_state())
                .service(summarize_youtube_auto),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/summary/youtube/auto")
            .set_json(serde_json::json!({ "url": "https://youtu.be/dQw4w9WgXcQ" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: AutoSummaryResponse = test::read_body_json(resp).await;
        assert_eq!(body.video_id, "dQw4w9WgXcQ");
        assert!(body.transcription.contains("https://youtu.be/dQw4w9WgXcQ"));
        assert!(!body.summary.is_empty());
    }
}
