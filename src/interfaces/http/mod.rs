use crate::application::{EvaluateUseCase, PhrasesUseCase};
use crate::domain::error::AppError;
use crate::domain::practice::{EvaluateRequest, PhrasesRequest};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::llm_clients::LLMClient;
use actix_cors::Cors;
use actix_web::error::JsonPayloadError;
use actix_web::middleware::Logger;
use actix_web::{
    dev::Server, get, post, web, App, HttpRequest, HttpResponse, HttpServer, Responder,
    ResponseError,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;
use validator::Validate;

pub struct AppState {
    pub config: AppConfig,
    pub evaluate_use_case: EvaluateUseCase,
    pub phrases_use_case: PhrasesUseCase,
}

impl AppState {
    pub fn new(config: AppConfig, llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self {
            config,
            evaluate_use_case: EvaluateUseCase::new(llm_client.clone()),
            phrases_use_case: PhrasesUseCase::new(llm_client),
        }
    }
}

#[post("/evaluate")]
async fn evaluate(data: web::Data<AppState>, req: web::Json<EvaluateRequest>) -> impl Responder {
    let span = info_span!("evaluate", request_id = %Uuid::new_v4());

    async move {
        if let Err(errors) = req.validate() {
            let err = AppError::from(errors);
            warn!(error = %err, "Rejected evaluation request");
            return err.error_response();
        }

        let original_phrase = req.original_phrase.as_deref().unwrap_or_default();
        let attempt = req.prompt.as_deref().unwrap_or_default();
        info!(
            phrase_chars = original_phrase.chars().count(),
            attempt_chars = attempt.chars().count(),
            "Evaluating translation"
        );

        match data
            .evaluate_use_case
            .execute(&data.config.gemini, original_phrase, attempt)
            .await
        {
            Ok(response) => HttpResponse::Ok().json(response),
            Err(e) => {
                error!(error = %e, "Evaluation failed");
                e.error_response()
            }
        }
    }
    .instrument(span)
    .await
}

#[post("/phrases")]
async fn phrases(data: web::Data<AppState>, body: web::Bytes) -> impl Responder {
    let span = info_span!("phrases", request_id = %Uuid::new_v4());

    async move {
        // An empty body means "all defaults".
        let req = if body.iter().all(u8::is_ascii_whitespace) {
            PhrasesRequest::default()
        } else {
            match serde_json::from_slice::<PhrasesRequest>(&body) {
                Ok(req) => req,
                Err(e) => {
                    warn!(error = %e, "Rejected phrases request body");
                    return AppError::ValidationError(format!("Invalid JSON body: {}", e))
                        .error_response();
                }
            }
        };

        let count = req.count();
        let level = req.level();
        info!(count, level = level.as_str(), "Generating practice phrases");

        match data
            .phrases_use_case
            .execute(
                &data.config.gemini,
                &data.config.practice.language,
                count,
                level,
            )
            .await
        {
            Ok(response) => HttpResponse::Ok().json(response),
            Err(e) => {
                error!(error = %e, "Phrase generation failed");
                e.error_response()
            }
        }
    }
    .instrument(span)
    .await
}

#[get("/health")]
async fn health(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "upstreamConfigured": data.config.gemini.credential().is_some(),
        "model": data.config.gemini.model,
    }))
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!(error = %err, "Rejected request body");
    AppError::ValidationError(format!("Invalid JSON body: {}", err)).into()
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(json_error_handler)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(evaluate)
            .service(phrases)
            .service(health),
    );
}

pub fn start_server(state: AppState) -> std::io::Result<Server> {
    let bind = (state.config.server.host.clone(), state.config.server.port);
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .app_data(json_config())
            .configure(configure_routes)
    })
    .bind(bind.clone())?
    .run();

    info!(host = %bind.0, port = bind.1, "HTTP server listening");

    Ok(server)
}
