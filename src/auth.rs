use crate::config::GitHubConfig;

/// Try to run a CLI command and capture stdout as a token
fn try_cli_token(command: &str) -> Option<String> {
    let output = std::process::Command::new("sh")
        .args(["-c", command])
        .output()
        .ok()?;

    if output.status.success() {
        non_empty(&String::from_utf8_lossy(&output.stdout))
    } else {
        None
    }
}

fn non_empty(token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Look for a token, trying:
/// 1. The env var named in config
/// 2. The configured CLI command
///
/// None means the client runs unauthenticated.
pub fn load_token(config: &GitHubConfig) -> Option<String> {
    if let Some(env_var) = &config.token_env {
        if let Some(token) = std::env::var(env_var).ok().as_deref().and_then(non_empty) {
            tracing::debug!(env_var, "using token from environment");
            return Some(token);
        }
    }

    if let Some(cmd) = &config.token_command {
        if let Some(token) = try_cli_token(cmd) {
            tracing::debug!(cmd, "using token from command");
            return Some(token);
        }
    }

    tracing::debug!("no token found, continuing anonymously");
    None
}
