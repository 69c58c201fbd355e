use std::collections::HashMap;

use actix_web::http::header;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use anyhow::Context;
use askama::Template;
use chrono::Utc;
use log::{debug, error, info, warn};
use serde::Serialize;

use crate::color::{hex_to_hsl, HexColor, Hsl};
use crate::config::Config;
use crate::palette::{Palette, RandomJitter};
use crate::share::{parse_colors_param, query_params, share_text, PaletteExport, COLORS_PARAM, EXPORT_FILE_NAME, SHARE_TITLE};
use crate::state::AppState;
use crate::templates::{IndexTemplate, PresetLink, SharedPaletteTemplate, Swatch};

const BASE_PARAM: &str = "base";

#[derive(Serialize)]
struct PaletteResponse {
    base: HexColor,
    colors: Palette,
}

#[derive(Serialize)]
struct HslResponse {
    color: HexColor,
    #[serde(flatten)]
    hsl: Hsl,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index_handler))
        .route("/generate", web::get().to(generate_handler))
        .route("/palette", web::get().to(shared_palette_handler))
        .route("/export", web::get().to(export_handler))
        .route("/api/palette", web::get().to(api_palette_handler))
        .route("/api/hsl", web::get().to(api_hsl_handler));
}

pub async fn run_api_server() -> anyhow::Result<()> {
    let config = Config::from_env();
    let address = (config.bind_address.clone(), config.port);

    info!("Starting server on {}:{}", address.0, address.1);
    info!("Share links use origin {}, default base color {}", config.public_origin, config.default_base_color);

    let config = web::Data::new(config);
    HttpServer::new(move || App::new().app_data(config.clone()).configure(configure))
        .bind(address.clone())
        .with_context(|| format!("failed to bind {}:{}", address.0, address.1))?
        .run()
        .await
        .context("server terminated with an error")
}

/// `path?k=v&...` with form-encoded values.
fn page_href(path: &str, pairs: &[(&str, String)]) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        query.append_pair(key, value);
    }
    format!("{}?{}", path, query.finish())
}

fn state_href(base: HexColor, palette: &Palette) -> String {
    let mut pairs = vec![(BASE_PARAM, base.to_string())];
    if !palette.is_empty() {
        pairs.push((COLORS_PARAM, palette.to_query_value()));
    }
    page_href("/", &pairs)
}

fn base_param(params: &HashMap<String, String>) -> Result<HexColor, String> {
    let value = params
        .get(BASE_PARAM)
        .ok_or_else(|| format!("missing '{}' parameter", BASE_PARAM))?;
    HexColor::parse(value).map_err(|e| e.to_string())
}

fn render_html<T: Template>(template: &T) -> HttpResponse {
    match template.render() {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(e) => {
            error!("Template error: {}", e);
            HttpResponse::InternalServerError().body(format!("Template error: {}", e))
        }
    }
}

fn json_error(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
}

async fn index_handler(req: HttpRequest, config: web::Data<Config>) -> impl Responder {
    let params = query_params(req.query_string());
    let base_color = match params.get(BASE_PARAM).map(|v| HexColor::parse(v)) {
        Some(Ok(color)) => color,
        Some(Err(e)) => {
            warn!("Falling back to default base color: {}", e);
            config.default_base_color
        }
        None => config.default_base_color,
    };
    let state = AppState::with_palette(base_color, parse_colors_param(&params));

    let share_url = if state.has_palette() {
        match state.share_url(&config.public_origin) {
            Ok(url) => url.to_string(),
            Err(e) => {
                error!("Could not build share link from origin '{}': {}", config.public_origin, e);
                String::new()
            }
        }
    } else {
        String::new()
    };
    let presets = config
        .preset_colors
        .iter()
        .map(|&preset| PresetLink {
            hex: preset.to_string(),
            href: state_href(preset, &state.palette),
            selected: preset == state.base_color,
        })
        .collect();
    let template = IndexTemplate {
        base_color: state.base_color.to_string(),
        presets,
        swatches: Swatch::from_palette(&state.palette),
        has_palette: state.has_palette(),
        share_url,
        share_text: share_text(&state.palette),
        export_href: page_href("/export", &[(COLORS_PARAM, state.palette.to_query_value())]),
        export_file_name: EXPORT_FILE_NAME,
    };
    render_html(&template)
}

async fn generate_handler(req: HttpRequest) -> impl Responder {
    let params = query_params(req.query_string());
    let base_color = match base_param(&params) {
        Ok(color) => color,
        Err(e) => {
            warn!("Rejected /generate request: {}", e);
            return HttpResponse::BadRequest().body(e);
        }
    };
    let mut state = AppState::new(base_color);
    state.generate(&mut RandomJitter::thread_local());
    info!("Generated palette from {}", base_color);
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, state_href(state.base_color, &state.palette)))
        .finish()
}

async fn shared_palette_handler(req: HttpRequest) -> impl Responder {
    let params = query_params(req.query_string());
    let palette = parse_colors_param(&params);
    if palette.is_empty() {
        debug!("Shared palette request without colors");
    }
    render_html(&SharedPaletteTemplate {
        title: SHARE_TITLE,
        swatches: Swatch::from_palette(&palette),
    })
}

async fn export_handler(req: HttpRequest) -> impl Responder {
    let params = query_params(req.query_string());
    let palette = parse_colors_param(&params);
    let export = match PaletteExport::new(&palette, Utc::now()) {
        Ok(export) => export,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };
    match export.to_json() {
        Ok(body) => HttpResponse::Ok()
            .content_type("application/json")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ))
            .body(body),
        Err(e) => {
            error!("Failed to serialize palette export: {}", e);
            HttpResponse::InternalServerError().body(format!("Export error: {}", e))
        }
    }
}

async fn api_palette_handler(req: HttpRequest) -> impl Responder {
    let params = query_params(req.query_string());
    match base_param(&params) {
        Ok(base) => {
            let mut state = AppState::new(base);
            state.generate(&mut RandomJitter::thread_local());
            HttpResponse::Ok().json(PaletteResponse { base, colors: state.palette })
        }
        Err(e) => json_error(e),
    }
}

async fn api_hsl_handler(req: HttpRequest) -> impl Responder {
    let params = query_params(req.query_string());
    let color = match params.get("color").map(|v| HexColor::parse(v)) {
        Some(Ok(color)) => color,
        Some(Err(e)) => return json_error(e.to_string()),
        None => return json_error("missing 'color' parameter".to_string()),
    };
    HttpResponse::Ok().json(HslResponse { color, hsl: hex_to_hsl(color) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;

    fn test_config() -> Config {
        Config {
            public_origin: "https://colorfly.example".to_string(),
            ..Config::default()
        }
    }

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().app_data(web::Data::new(test_config())).configure(configure)
    }

    async fn get_text(uri: &str) -> (StatusCode, String) {
        let app = test::init_service(test_app()).await;
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[actix_web::test]
    async fn test_shared_palette_renders_swatches() {
        let (status, body) = get_text("/palette?colors=%23ff0000%2C%2300ff00").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Your Shared Palette"));
        assert!(body.contains("#ff0000"));
        assert!(body.contains("#00ff00"));
        assert!(body.contains("hsl(120, 100%, 50%)"));
    }

    #[actix_web::test]
    async fn test_shared_palette_without_colors_falls_back() {
        for uri in ["/palette", "/palette?colors=", "/palette?colors=nonsense"] {
            let (status, body) = get_text(uri).await;
            assert_eq!(status, StatusCode::OK);
            assert!(body.contains("No Palette Found"), "{}", uri);
        }
    }

    #[actix_web::test]
    async fn test_index_without_palette() {
        let (status, body) = get_text("/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("value=\"#ff0000\""));
        assert!(body.contains("Generate Palette"));
        assert!(!body.contains("Shareable link"));
        assert!(body.contains("#9900ef"));
    }

    #[actix_web::test]
    async fn test_index_with_palette_offers_sharing() {
        let (status, body) = get_text("/?base=%230693E3&colors=%23ff0000%2C%2300ff00").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("value=\"#0693e3\""));
        assert!(body.contains("Shareable link"));
        assert!(body.contains("Check out this color palette: #ff0000, #00ff00"));
        assert!(body.contains("colorfly-palette.json"));
    }

    #[actix_web::test]
    async fn test_index_invalid_base_uses_default() {
        let (status, body) = get_text("/?base=blue").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("value=\"#ff0000\""));
    }

    #[actix_web::test]
    async fn test_generate_redirects_with_new_palette() {
        let app = test::init_service(test_app()).await;
        let req = test::TestRequest::get().uri("/generate?base=%23ff0000&colors=%23000000").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let location = resp.headers().get(header::LOCATION).unwrap().to_str().unwrap();
        let (path, query) = location.split_once('?').unwrap();
        assert_eq!(path, "/");
        let params = query_params(query);
        assert_eq!(params.get(BASE_PARAM).map(String::as_str), Some("#ff0000"));
        let palette = parse_colors_param(&params);
        assert_eq!(palette.len(), crate::palette::PALETTE_SIZE);
        assert!(!palette.colors().contains(&HexColor::new(0, 0, 0)));
    }

    #[actix_web::test]
    async fn test_generate_rejects_bad_base() {
        let (status, _) = get_text("/generate").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, body) = get_text("/generate?base=%23zzzzzz").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("invalid color format"));
    }

    #[actix_web::test]
    async fn test_export_download() {
        let app = test::init_service(test_app()).await;
        let req = test::TestRequest::get().uri("/export?colors=%23ff0000%2C%2300ff00").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp.headers().get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap();
        assert!(disposition.contains("attachment"));
        assert!(disposition.contains(EXPORT_FILE_NAME));

        let export: PaletteExport = test::read_body_json(resp).await;
        assert_eq!(export.colors, vec![HexColor::new(0xff, 0, 0), HexColor::new(0, 0xff, 0)]);
        assert!(export.timestamp.ends_with('Z'));
    }

    #[actix_web::test]
    async fn test_export_without_palette() {
        let (status, body) = get_text("/export").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Please generate a palette first.");
    }

    #[actix_web::test]
    async fn test_api_palette() {
        let app = test::init_service(test_app()).await;
        let req = test::TestRequest::get().uri("/api/palette?base=%23FCB900").to_request();
        let value: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(value["base"], "#fcb900");
        let colors = value["colors"].as_array().unwrap();
        assert_eq!(colors.len(), 5);
        for color in colors {
            assert!(HexColor::parse(color.as_str().unwrap()).is_ok());
        }
    }

    #[actix_web::test]
    async fn test_api_palette_rejects_missing_base() {
        let app = test::init_service(test_app()).await;
        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/palette").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let value: serde_json::Value = test::read_body_json(resp).await;
        assert!(value["error"].as_str().unwrap().contains("base"));
    }

    #[actix_web::test]
    async fn test_api_hsl() {
        let app = test::init_service(test_app()).await;
        let req = test::TestRequest::get().uri("/api/hsl?color=%230000ff").to_request();
        let value: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(value["color"], "#0000ff");
        assert_eq!(value["h"], 240.0);
        assert_eq!(value["s"], 100.0);
        assert_eq!(value["l"], 50.0);
    }
}
