//! Single binary web server exposing the bracket engine over a REST API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT. Set BRACKET_SEED (u64) for reproducible draws.

use actix_web::{
    get, post, put,
    web::{Data, Json, Path, ServiceConfig},
    App, HttpResponse, HttpServer, Responder,
};
use bracket_engine::{
    advance_round, bracket_overview, seed_first_round, BracketError, CareerId, ErrorKind, Gender,
    HierarchyOrdering, MatchId, MemoryStore, PlayerRef, Team, Tournament, TournamentFormat,
    TournamentId, TournamentStore, TournamentType,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::sync::RwLock;

/// Store plus the random source used for first-round draws.
struct Engine {
    store: MemoryStore,
    rng: StdRng,
}

/// One lock for the whole engine: every seeding/progression call runs alone.
type AppState = Data<RwLock<Engine>>;

/// Server settings read from the environment.
struct ServerConfig {
    host: String,
    port: u16,
    bracket_seed: Option<u64>,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| default_host()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(default_port),
            bracket_seed: std::env::var("BRACKET_SEED")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }
}

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    format: TournamentFormat,
    gender: Gender,
    year: i32,
    semester: u8,
    #[serde(rename = "type")]
    kind: TournamentType,
}

#[derive(Deserialize)]
struct PlayerBody {
    name: String,
    career_id: Option<CareerId>,
}

#[derive(Deserialize)]
struct AddTeamBody {
    name: String,
    career_id: Option<CareerId>,
    #[serde(default)]
    roster: Vec<PlayerBody>,
}

#[derive(Deserialize)]
struct ResultBody {
    score_a: u32,
    score_b: u32,
}

#[derive(Deserialize)]
struct AdvanceBody {
    from_round: Option<String>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

fn error_response(e: BracketError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e.kind() {
        ErrorKind::Validation => HttpResponse::BadRequest().json(body),
        ErrorKind::State => HttpResponse::Conflict().json(body),
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
        ErrorKind::Store => {
            log::error!("{}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-engine",
    })
}

/// Register a new tournament in `creado` state.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let tournament = Tournament::new(body.format, body.gender, body.year, body.semester, body.kind);
    g.store.insert_tournament(tournament.clone());
    HttpResponse::Ok().json(tournament)
}

/// Tournament record plus its teams.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let result = g
        .store
        .tournament(path.id)
        .and_then(|t| g.store.teams(path.id).map(|teams| (t, teams)));
    match result {
        Ok((tournament, teams)) => {
            HttpResponse::Ok().json(serde_json::json!({ "tournament": tournament, "teams": teams }))
        }
        Err(e) => error_response(e),
    }
}

/// Register a team with its roster (tournament must be `creado`).
#[post("/api/tournaments/{id}/teams")]
async fn api_add_team(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddTeamBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let body = body.into_inner();
    let roster = body
        .roster
        .into_iter()
        .map(|p| PlayerRef::new(p.name.trim(), p.career_id))
        .collect();
    let team = Team::new(path.id, body.name.trim(), body.career_id, roster);
    match g.store.insert_team(team.clone()) {
        Ok(_) => HttpResponse::Ok().json(team),
        Err(e) => error_response(e),
    }
}

/// Draw the first round (creado -> en_juego).
#[post("/api/tournaments/{id}/seed")]
async fn api_seed(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let Engine { store, rng } = &mut *g;
    match seed_first_round(store, path.id, rng) {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => error_response(e),
    }
}

/// Enter a final score for one match.
#[put("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_record_result(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<ResultBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let belongs = g
        .store
        .get_match(path.match_id)
        .map(|m| m.tournament_id == path.id);
    match belongs {
        Ok(true) => {}
        Ok(false) => return error_response(BracketError::MatchNotFound(path.match_id)),
        Err(e) => return error_response(e),
    }
    match g.store.record_result(path.match_id, body.score_a, body.score_b) {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => error_response(e),
    }
}

/// Advance the given round (or the latest one) to the next, or finish the tournament.
#[post("/api/tournaments/{id}/advance")]
async fn api_advance(
    state: AppState,
    path: Path<TournamentPath>,
    body: Option<Json<AdvanceBody>>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let from_round = body.and_then(|b| b.into_inner().from_round);
    match advance_round(&mut g.store, path.id, from_round.as_deref(), &HierarchyOrdering) {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => error_response(e),
    }
}

/// All rounds with their matches, earliest first.
#[get("/api/tournaments/{id}/bracket")]
async fn api_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match bracket_overview(&g.store, path.id, &HierarchyOrdering) {
        Ok(overview) => HttpResponse::Ok().json(overview),
        Err(e) => error_response(e),
    }
}

#[post("/api/tournaments/{id}/cancel")]
async fn api_cancel(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if let Err(e) = g.store.cancel_tournament(path.id) {
        return error_response(e);
    }
    log::info!("Tournament {} cancelled", path.id);
    match g.store.tournament(path.id) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(e),
    }
}

fn routes(cfg: &mut ServiceConfig) {
    cfg.service(api_health)
        .service(api_create_tournament)
        .service(api_get_tournament)
        .service(api_add_team)
        .service(api_seed)
        .service(api_record_result)
        .service(api_advance)
        .service(api_bracket)
        .service(api_cancel);
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let rng = match config.bracket_seed {
        Some(seed) => {
            log::info!("Using fixed bracket seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = Data::new(RwLock::new(Engine {
        store: MemoryStore::new(),
        rng,
    }));

    HttpServer::new(move || {
        App::new().app_data(state.clone()).configure(routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
