use clap::Subcommand;
use zenlock_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the full configuration as TOML
    Show,
    /// Get a value by dot-separated key
    Get { key: String },
    /// Set a value by dot-separated key
    Set { key: String, value: String },
    /// Print the config file location
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let cfg = Config::load()?;
            print!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigAction::Get { key } => {
            let cfg = Config::load()?;
            match cfg.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut cfg = Config::load()?;
            cfg.set(&key, &value)?;
            cfg.save()?;
            println!("{key} = {value}");
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
    }
    Ok(())
}
