use crate::cli::{Config, actions::Action, commands, dispatch, globals::GlobalArgs};
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub fn get_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().map_or_else(|| PathBuf::from("/tmp"), |h| h);

    let config_path = Path::new(&home_dir).join(".config").join("teambeam");
    fs::create_dir_all(&config_path)
        .context(format!("unable to create: {}", &config_path.display()))?;

    Ok(config_path)
}

/// # Errors
/// Will return an error if the config file can not be parsed or the arguments are invalid
pub fn start() -> Result<(Config, Action, GlobalArgs)> {
    let config_path = get_config_path()?;

    // start the command line interface
    let cmd = commands::new(&config_path);

    // get the matches
    let matches = cmd.get_matches();

    let verbosity_level =
        match matches
            .get_one::<u8>("verbose")
            .map_or(0, |&v| if v > 1 { 4 } else { v })
        {
            0 => log::LevelFilter::Off,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        };

    env_logger::Builder::new()
        .filter_level(verbosity_level)
        .init();

    log::info!("config path: {}", config_path.display());

    // define global args
    let mut global_args = GlobalArgs::new();

    //  define retries
    let retries: usize = matches
        .get_one::<usize>("retries")
        .map_or(10, |size| *size);
    global_args.set_retries(retries);

    global_args.quiet = matches.get_one::<bool>("quiet").copied().unwrap_or(false);

    global_args.config_file = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| config_path.join("config.yml"));

    // load the config file
    let config = Config::new(&global_args.config_file)?;

    log::debug!("host: {}, email: {:?}", config.host, config.email);

    // create the action
    let action = dispatch::dispatch(&matches)?;

    log::debug!("globals: {global_args:#?}, action: {action:#?}");

    Ok((config, action, global_args))
}
