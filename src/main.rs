use clap_complete::generate;

use spotplay::{
    cli::{self, Command},
    config, error, warning,
};

fn load_config() -> config::Config {
    match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("{}", e),
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env() {
        warning!("Cannot load environment file. Err: {}", e);
    }

    let Some(command) = cli::parse(std::env::args_os()) else {
        return cli::usage();
    };

    match command {
        Command::Play(opt) => cli::play(&load_config(), opt.uri).await,
        Command::Pause => cli::pause(&load_config()).await,
        Command::Auth => cli::auth(&load_config()).await,
        Command::Completions(opt) => {
            let mut cmd = cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
