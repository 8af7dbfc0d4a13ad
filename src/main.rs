//! Demo host for the pipeline router.
//!
//! Builds a small movie API, dispatches each `METHOD URL` pair given on the
//! command line against it and prints the resulting status and body.
//!
//! ```text
//! pipeline-router GET /api/movies GET /api/movies/2 DELETE /api/movies/1
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde::{Deserialize, Serialize};

use pipeline_router::config::{Configuration, RouterSettings};
use pipeline_router::http::{ApiResult, PagedResult, Request, Response};
use pipeline_router::observability::logging;
use pipeline_router::routing::{from_fn, BoxedMiddleware, MiddlewareError, Outcome, Router};

#[derive(Parser)]
#[command(name = "pipeline-router")]
#[command(about = "Dispatch requests against a sample pipeline router", long_about = None)]
struct Cli {
    /// key=value configuration file (defaults to $APP_CONFIG or ./app.cfg)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON body sent with every request
    #[arg(short, long)]
    body: Option<String>,

    /// Requests as METHOD URL pairs
    #[arg(value_names = ["METHOD", "URL"], num_args = 2.., required = true)]
    requests: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Movie {
    id: u32,
    title: String,
    release_year: u16,
}

fn catalog() -> Vec<Movie> {
    vec![
        Movie { id: 1, title: "Alien".into(), release_year: 1979 },
        Movie { id: 2, title: "Heat".into(), release_year: 1995 },
        Movie { id: 3, title: "Arrival".into(), release_year: 2016 },
    ]
}

fn powered_by() -> BoxedMiddleware {
    from_fn(|req, res, props, next| {
        Box::pin(async move {
            res.set_header("x-powered-by", "pipeline-router");
            if let Some(id) = props.request_id() {
                res.set_header("x-request-id", id.to_string());
            }
            next.run(req, res, props).await
        })
    })
}

fn list_movies() -> BoxedMiddleware {
    from_fn(|_req, res, _props, _next| {
        Box::pin(async move {
            let movies = catalog();
            let page = PagedResult::new(movies.len() as u64, movies);
            res.send_result(&ApiResult::ok(page)).map_err(MiddlewareError::new)
        })
    })
}

fn get_movie() -> BoxedMiddleware {
    from_fn(|_req, res, props, _next| {
        Box::pin(async move {
            let id = props.get_str("id").and_then(|id| id.parse::<u32>().ok());
            let result = match catalog().into_iter().find(|m| Some(m.id) == id) {
                Some(movie) => ApiResult::ok(movie),
                None => ApiResult::error_with_status("movie not found", 404),
            };
            res.send_result(&result).map_err(MiddlewareError::new)
        })
    })
}

fn create_movie() -> BoxedMiddleware {
    from_fn(|req, res, _props, _next| {
        Box::pin(async move {
            let movie: Movie = req
                .json()
                .map_err(|e| MiddlewareError::with_status(400, e))?;
            res.send_result(&ApiResult::ok_with_status(movie, 201))
                .map_err(MiddlewareError::new)
        })
    })
}

fn delete_movie() -> BoxedMiddleware {
    from_fn(|_req, _res, _props, _next| {
        Box::pin(async move { Err(MiddlewareError::with_status(403, "movies are read-only")) })
    })
}

fn build_router(settings: &RouterSettings) -> Router {
    let movies = settings
        .apply(Router::builder())
        .map_get("/movies", [list_movies()])
        .map_get("/movies/:id", [get_movie()])
        .map_post("/movies", [create_movie()])
        .map_delete("/movies/:id", [delete_movie()])
        .build();

    settings
        .apply(Router::builder())
        .use_middleware(powered_by())
        .use_router("/api", Arc::new(movies))
        .build()
}

fn print_response(method: &str, url: &str, result: Result<Outcome, MiddlewareError>, res: &Response) {
    match result {
        Ok(Outcome::Handled(status)) => println!("{method} {url} -> {status} {}", res.body_text()),
        Ok(Outcome::Unhandled) => println!("{method} {url} -> 404 (no response, code {})", Outcome::Unhandled.code()),
        Err(err) => println!("{method} {url} -> {} {}", err.status(), err.source_error()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Configuration::load(path)?,
        None => Configuration::from_default_locations()?,
    };
    let settings = RouterSettings::from_config(&config);
    logging::init(&settings.log_filter, settings.log_format);

    tracing::info!(matching = ?settings.matching, "pipeline-router demo starting");

    if cli.requests.len() % 2 != 0 {
        return Err("requests must be given as METHOD URL pairs".into());
    }

    let router = build_router(&settings);

    for pair in cli.requests.chunks(2) {
        let (method, url) = (pair[0].to_uppercase(), &pair[1]);

        let mut req = Request::new(method.clone(), url.clone());
        if let Some(body) = &cli.body {
            req = req
                .with_header("content-type", "application/json")
                .with_body(body.clone());
        }
        let mut res = Response::new();

        let result = router.handle(&mut req, &mut res).await;
        print_response(&method, url, result, &res);
    }

    Ok(())
}
