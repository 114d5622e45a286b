use crate::{config::Config, error, success};

pub async fn auth(config: &Config) {
    let tokens = super::token_manager(config);
    match tokens.authorize().await {
        Ok(_) => success!(
            "Authentication successful! Credentials stored at {}",
            config.token_path.display()
        ),
        Err(e) => error!("Authentication failed: {}", e),
    }
}
