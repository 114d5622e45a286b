use crate::{config::Config, error, errors::Error, spotify::player::PlaybackClient, success};

pub async fn play(config: &Config, track_uri: Option<String>) {
    let tokens = super::token_manager(config);
    let player = PlaybackClient::new(config, &tokens);

    match player.resume_or_play(track_uri.as_deref()).await {
        Ok(outcome) => success!("{}", outcome),
        Err(e @ Error::NoActiveDevice) => error!("{}", e),
        Err(e) => error!("Failed to play/resume track: {}", e),
    }
}

pub async fn pause(config: &Config) {
    let tokens = super::token_manager(config);
    let player = PlaybackClient::new(config, &tokens);

    match player.pause().await {
        Ok(outcome) => success!("{}", outcome),
        Err(e @ Error::NoActiveDevice) => error!("{}", e),
        Err(e) => error!("Failed to pause playback: {}", e),
    }
}
