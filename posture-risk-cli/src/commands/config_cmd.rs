use anyhow::Result;
use posture_risk::AssessmentConfig;

use crate::config::ConfigLocation;

pub async fn show_config(location: &ConfigLocation) -> Result<()> {
    let config = location.load()?;
    config.validate()?;

    println!("Current Configuration");
    println!("────────────────────────────────");
    println!("# {}", location.path().display());
    println!();
    println!("{}", config.to_toml()?);

    Ok(())
}

pub async fn init_config(location: &ConfigLocation, force: bool) -> Result<()> {
    let config_file = location.path();

    if config_file.exists() && !force {
        println!(
            "Configuration file already exists at: {}",
            config_file.display()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    location.save(&AssessmentConfig::default())?;

    println!("✓ Configuration initialized at: {}", config_file.display());

    Ok(())
}
