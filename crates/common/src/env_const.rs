use beam_env::Environment;

pub const BEAM_SERVER_PORT: &str = "BEAM_SERVER_PORT";
pub const BEAM_SERVER_HOST: &str = "BEAM_SERVER_HOST";

pub const BEAM_CORS_DOMAINS: &str = "BEAM_CORS_DOMAINS";

pub const BEAM_GRAPHQL_HTTP_PATH: &str = "BEAM_GRAPHQL_HTTP_PATH";

pub const BEAM_API_TOKEN: &str = "BEAM_API_TOKEN";
pub const BEAM_API_BASE_URL: &str = "BEAM_API_BASE_URL";
pub const BEAM_UPSTREAM_TIMEOUT_SECS: &str = "BEAM_UPSTREAM_TIMEOUT_SECS";

pub const DEFAULT_API_BASE_URL: &str = "https://app.chartbeam.io";

pub fn get_graphql_http_path(env: &dyn Environment) -> String {
    env.get(BEAM_GRAPHQL_HTTP_PATH)
        .unwrap_or_else(|| "/graphql".to_string())
}
